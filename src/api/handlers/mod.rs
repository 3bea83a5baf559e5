//! REST endpoint handlers organized by resource.

pub mod battles;
pub mod statistics;
pub mod system;

use axum::Router;

use crate::app_state::AppState;

/// Composes the battle data and statistics routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(battles::routes())
        .merge(statistics::routes())
}
