//! Service layer: statistics aggregation.
//!
//! [`StatsService`] composes the store's aggregate primitives into the four
//! statistics response contracts, deriving rates and averages and turning
//! empty filtered sets into NotFound.

pub mod stats;

pub use stats::StatsService;
