//! Persistence layer: PostgreSQL battle log storage and aggregate queries.
//!
//! [`postgres::BattleStore`] owns the only shared resource in the system,
//! the `battle_logs` table, and exposes filtered retrieval plus the
//! grouped-aggregate primitives the statistics service composes. The table
//! is append-only from the ingestion process's side and strictly read-only
//! from this service's side.

pub mod models;
pub mod postgres;

pub use postgres::BattleStore;
