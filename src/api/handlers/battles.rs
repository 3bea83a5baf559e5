//! Raw battle record endpoints.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use chrono::{DateTime, NaiveDateTime, Utc};

use crate::api::dto::BattleRecordDto;
use crate::app_state::AppState;
use crate::error::{ApiError, ErrorResponse};

/// `GET /battle-data` — Every record in the battle log.
///
/// # Errors
///
/// Returns [`ApiError::Persistence`] on database failure.
#[utoipa::path(
    get,
    path = "/battle-data",
    tag = "Battle Data",
    summary = "List all battle records",
    description = "Returns every record in the battle log, ordered by battle time, player tag, and brawler id.",
    responses(
        (status = 200, description = "All battle records", body = Vec<BattleRecordDto>),
    )
)]
pub async fn list_battle_data(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    let records = state.store.fetch_all().await?;
    let data: Vec<BattleRecordDto> = records.into_iter().map(BattleRecordDto::from).collect();
    Ok(Json(data))
}

/// `GET /battle-data/{player_tag}` — Records for one player.
///
/// # Errors
///
/// Returns [`ApiError::NotFound`] if the player has no records.
#[utoipa::path(
    get,
    path = "/battle-data/{player_tag}",
    tag = "Battle Data",
    summary = "List battle records for one player",
    description = "Returns every record with the given player tag, ordered by battle time.",
    params(
        ("player_tag" = String, Path, description = "Exact player tag (e.g. `#2G0QY8LJC`, URL-encoded)"),
    ),
    responses(
        (status = 200, description = "The player's battle records", body = Vec<BattleRecordDto>),
        (status = 404, description = "No records for this player", body = ErrorResponse),
    )
)]
pub async fn battle_data_by_player(
    State(state): State<AppState>,
    Path(player_tag): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let records = state.store.fetch_by_player(&player_tag).await?;
    if records.is_empty() {
        return Err(ApiError::NotFound(format!(
            "no battle records found for player {player_tag}"
        )));
    }
    let data: Vec<BattleRecordDto> = records.into_iter().map(BattleRecordDto::from).collect();
    Ok(Json(data))
}

/// `GET /battle-data/{player_tag}/{battle_time}/{brawler_id}` — One record
/// by its composite key.
///
/// # Errors
///
/// Returns [`ApiError::InvalidRequest`] on a malformed timestamp and
/// [`ApiError::NotFound`] if no record matches the key.
#[utoipa::path(
    get,
    path = "/battle-data/{player_tag}/{battle_time}/{brawler_id}",
    tag = "Battle Data",
    summary = "Get one battle record by composite key",
    description = "Looks up a single record by `(player_tag, battle_time, brawler_id)`. The timestamp is ISO-8601 without offset, e.g. `2023-05-06T15:30:00`, interpreted as UTC.",
    params(
        ("player_tag" = String, Path, description = "Exact player tag"),
        ("battle_time" = String, Path, description = "Battle timestamp, `YYYY-MM-DDTHH:MM:SS`"),
        ("brawler_id" = i32, Path, description = "Numeric brawler identifier"),
    ),
    responses(
        (status = 200, description = "The battle record", body = BattleRecordDto),
        (status = 400, description = "Malformed battle_time", body = ErrorResponse),
        (status = 404, description = "No record for this key", body = ErrorResponse),
    )
)]
pub async fn battle_data_by_key(
    State(state): State<AppState>,
    Path((player_tag, battle_time, brawler_id)): Path<(String, String, i32)>,
) -> Result<impl IntoResponse, ApiError> {
    let battle_time = parse_battle_time(&battle_time)?;
    let record = state
        .store
        .fetch_by_key(&player_tag, battle_time, brawler_id)
        .await?
        .ok_or_else(|| {
            ApiError::NotFound(format!(
                "no battle record for player {player_tag} at {battle_time} with brawler {brawler_id}"
            ))
        })?;
    Ok(Json(BattleRecordDto::from(record)))
}

/// Parses a `YYYY-MM-DDTHH:MM:SS` path segment as a UTC timestamp.
fn parse_battle_time(raw: &str) -> Result<DateTime<Utc>, ApiError> {
    raw.parse::<NaiveDateTime>()
        .map(|t| t.and_utc())
        .map_err(|_| {
            ApiError::InvalidRequest(format!(
                "battle_time must be ISO-8601 (YYYY-MM-DDTHH:MM:SS), got `{raw}`"
            ))
        })
}

/// Raw battle record routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/battle-data", get(list_battle_data))
        .route("/battle-data/{player_tag}", get(battle_data_by_player))
        .route(
            "/battle-data/{player_tag}/{battle_time}/{brawler_id}",
            get(battle_data_by_key),
        )
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn parse_battle_time_accepts_iso_8601() {
        let Ok(parsed) = parse_battle_time("2023-05-06T15:30:00") else {
            panic!("expected parse to succeed");
        };
        assert_eq!(parsed.to_rfc3339(), "2023-05-06T15:30:00+00:00");
    }

    #[test]
    fn parse_battle_time_rejects_garbage() {
        let result = parse_battle_time("06.05.2023 15:30");
        assert!(matches!(result, Err(ApiError::InvalidRequest(_))));
    }
}
