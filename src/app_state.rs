//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use crate::persistence::BattleStore;
use crate::service::StatsService;

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Battle log store for raw record retrieval.
    pub store: Arc<BattleStore>,
    /// Statistics service for all aggregation endpoints.
    pub stats: Arc<StatsService>,
}
