//! OpenAPI document aggregating every endpoint and schema.

use utoipa::OpenApi;

use crate::api::dto::{
    BattleRecordDto, BattleStatisticsResponse, BrawlerStatisticsResponse, BrawlerStatsDto,
    DailyTrophyDto, GameModeStatisticsResponse, GameModeStatsDto, TrophyProgressResponse,
};
use crate::api::handlers::system::HealthResponse;
use crate::error::{ErrorBody, ErrorResponse};

/// OpenAPI specification for the battlelog API.
#[derive(Debug, OpenApi)]
#[openapi(
    info(
        title = "battlelog-api",
        description = "Read-only analytics API over an append-only Brawl Stars battle log."
    ),
    paths(
        crate::api::handlers::battles::list_battle_data,
        crate::api::handlers::battles::battle_data_by_player,
        crate::api::handlers::battles::battle_data_by_key,
        crate::api::handlers::statistics::battle_statistics,
        crate::api::handlers::statistics::trophy_progress,
        crate::api::handlers::statistics::brawler_statistics,
        crate::api::handlers::statistics::game_mode_statistics,
        crate::api::handlers::system::health_handler,
    ),
    components(schemas(
        BattleRecordDto,
        BattleStatisticsResponse,
        TrophyProgressResponse,
        DailyTrophyDto,
        BrawlerStatisticsResponse,
        BrawlerStatsDto,
        GameModeStatisticsResponse,
        GameModeStatsDto,
        HealthResponse,
        ErrorResponse,
        ErrorBody,
    )),
    tags(
        (name = "Battle Data", description = "Raw battle log records"),
        (name = "Statistics", description = "Aggregated battle statistics"),
        (name = "System", description = "Service health"),
    )
)]
pub struct ApiDoc;

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_every_endpoint() {
        let doc = ApiDoc::openapi();
        for path in [
            "/battle-data",
            "/battle-data/{player_tag}",
            "/battle-data/{player_tag}/{battle_time}/{brawler_id}",
            "/battle-statistics",
            "/trophy-progress",
            "/brawler-statistics",
            "/gamemode-statistics",
            "/health",
        ] {
            assert!(
                doc.paths.paths.contains_key(path),
                "missing path: {path}"
            );
        }
    }
}
