//! Statistics endpoints: overall, daily trophy progress, per-brawler, and
//! per-game-mode aggregations.
//!
//! All four share the same optional query parameters (player tag plus an
//! inclusive time range) and all return 404 when the filtered record set is
//! empty — a range with no battles has no meaningful statistics.

use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};

use crate::api::dto::{
    BattleStatisticsResponse, BrawlerStatisticsResponse, GameModeStatisticsResponse,
    StatsQueryParams, TrophyProgressResponse,
};
use crate::app_state::AppState;
use crate::error::{ApiError, ErrorResponse};

/// `GET /battle-statistics` — Overall statistics for the filtered set.
///
/// # Errors
///
/// Returns [`ApiError::NotFound`] when no records match the filter.
#[utoipa::path(
    get,
    path = "/battle-statistics",
    tag = "Statistics",
    summary = "Overall battle statistics",
    description = "First/last battle, battle and player counts, and per-day averages over the inclusive day span between the first and last battle.",
    params(StatsQueryParams),
    responses(
        (status = 200, description = "Overall statistics", body = BattleStatisticsResponse),
        (status = 404, description = "No records match the filter", body = ErrorResponse),
    )
)]
pub async fn battle_statistics(
    State(state): State<AppState>,
    Query(params): Query<StatsQueryParams>,
) -> Result<impl IntoResponse, ApiError> {
    let filter = params.to_filter();
    let stats = state.stats.battle_statistics(&filter).await?;
    Ok(Json(stats))
}

/// `GET /trophy-progress` — Daily trophy progress for the filtered set.
///
/// # Errors
///
/// Returns [`ApiError::NotFound`] when no records match the filter.
#[utoipa::path(
    get,
    path = "/trophy-progress",
    tag = "Statistics",
    summary = "Daily trophy progress",
    description = "Battles, victories, win rate, and net trophy change per UTC calendar day, ascending, with totals across the range.",
    params(StatsQueryParams),
    responses(
        (status = 200, description = "Daily trophy progress", body = TrophyProgressResponse),
        (status = 404, description = "No records match the filter", body = ErrorResponse),
    )
)]
pub async fn trophy_progress(
    State(state): State<AppState>,
    Query(params): Query<StatsQueryParams>,
) -> Result<impl IntoResponse, ApiError> {
    let filter = params.to_filter();
    let progress = state.stats.trophy_progress(&filter).await?;
    Ok(Json(progress))
}

/// `GET /brawler-statistics` — Per-brawler statistics for the filtered set.
///
/// # Errors
///
/// Returns [`ApiError::NotFound`] when no records match the filter.
#[utoipa::path(
    get,
    path = "/brawler-statistics",
    tag = "Statistics",
    summary = "Per-brawler statistics",
    description = "Battles, victories, win rate, and net trophy change grouped by brawler, descending by battle count (name ascending on ties).",
    params(StatsQueryParams),
    responses(
        (status = 200, description = "Per-brawler statistics", body = BrawlerStatisticsResponse),
        (status = 404, description = "No records match the filter", body = ErrorResponse),
    )
)]
pub async fn brawler_statistics(
    State(state): State<AppState>,
    Query(params): Query<StatsQueryParams>,
) -> Result<impl IntoResponse, ApiError> {
    let filter = params.to_filter();
    let stats = state.stats.brawler_statistics(&filter).await?;
    Ok(Json(stats))
}

/// `GET /gamemode-statistics` — Per-game-mode statistics for the filtered
/// set.
///
/// # Errors
///
/// Returns [`ApiError::NotFound`] when no records match the filter.
#[utoipa::path(
    get,
    path = "/gamemode-statistics",
    tag = "Statistics",
    summary = "Per-game-mode statistics",
    description = "Battles, victories, win rate, trophy change, average duration, and efficiency metrics grouped by battle mode, descending by battle count (mode ascending on ties).",
    params(StatsQueryParams),
    responses(
        (status = 200, description = "Per-game-mode statistics", body = GameModeStatisticsResponse),
        (status = 404, description = "No records match the filter", body = ErrorResponse),
    )
)]
pub async fn game_mode_statistics(
    State(state): State<AppState>,
    Query(params): Query<StatsQueryParams>,
) -> Result<impl IntoResponse, ApiError> {
    let filter = params.to_filter();
    let stats = state.stats.game_mode_statistics(&filter).await?;
    Ok(Json(stats))
}

/// Statistics routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/battle-statistics", get(battle_statistics))
        .route("/trophy-progress", get(trophy_progress))
        .route("/brawler-statistics", get(brawler_statistics))
        .route("/gamemode-statistics", get(game_mode_statistics))
}
