//! Statistics query parameters and response contracts.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::BattleFilter;

/// Shared query parameters for all statistics endpoints.
///
/// Timestamps are ISO-8601 without an offset (`YYYY-MM-DDTHH:MM:SS`) and
/// are interpreted as UTC. Both bounds are inclusive.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct StatsQueryParams {
    /// Exact-match player identifier.
    pub player_tag: Option<String>,
    /// Inclusive lower bound on `battle_time`.
    pub start_date: Option<NaiveDateTime>,
    /// Inclusive upper bound on `battle_time`.
    pub end_date: Option<NaiveDateTime>,
}

impl StatsQueryParams {
    /// Converts the request parameters into the uniform record filter.
    #[must_use]
    pub fn to_filter(&self) -> BattleFilter {
        BattleFilter::new(
            self.player_tag.clone(),
            self.start_date.map(|t| t.and_utc()),
            self.end_date.map(|t| t.and_utc()),
        )
    }
}

/// Overall statistics for the filtered record set
/// (`GET /battle-statistics`).
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BattleStatisticsResponse {
    /// Earliest battle timestamp in the set.
    pub first_battle: DateTime<Utc>,
    /// Latest battle timestamp in the set.
    pub last_battle: DateTime<Utc>,
    /// Total record count.
    pub total_battles: i64,
    /// Count of distinct players in the set.
    pub unique_players: i64,
    /// Inclusive UTC day span between first and last battle; at least 1.
    pub days_diff: i64,
    /// Victory percentage over the whole set, 2 decimals.
    pub win_rate: f64,
    /// Mean battles per day over the span, 2 decimals.
    pub avg_battles_per_day: f64,
    /// Mean net trophy change per day over the span, 2 decimals.
    pub avg_trophies_per_day: f64,
    /// Mean victories per day over the span, 2 decimals.
    pub avg_victories_per_day: f64,
}

/// One calendar day of trophy progress.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DailyTrophyDto {
    /// UTC calendar date.
    pub date: NaiveDate,
    /// Net trophy change on this day.
    pub trophy_change: i64,
    /// Battles fought on this day.
    pub battles: i64,
    /// Victories on this day.
    pub victories: i64,
    /// Victory percentage on this day, 2 decimals.
    pub win_rate: f64,
}

/// Daily trophy progress over the filtered set
/// (`GET /trophy-progress`), days ascending.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TrophyProgressResponse {
    /// Date of the first day with battles.
    pub start_date: NaiveDate,
    /// Date of the last day with battles.
    pub end_date: NaiveDate,
    /// Net trophy change across all days.
    pub total_trophy_change: i64,
    /// Battle count across all days.
    pub total_battles: i64,
    /// Victory percentage across all days, 2 decimals.
    pub overall_win_rate: f64,
    /// Per-day groups, ascending by date.
    pub days: Vec<DailyTrophyDto>,
}

/// Per-brawler statistics group.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BrawlerStatsDto {
    /// Brawler name; `null` groups records with no recorded name.
    pub brawler_name: Option<String>,
    /// Battles fought with this brawler.
    pub battles: i64,
    /// Victories with this brawler.
    pub victories: i64,
    /// Net trophy change with this brawler.
    pub trophy_change: i64,
    /// Victory percentage with this brawler, 2 decimals.
    pub win_rate: f64,
}

/// Per-brawler statistics over the filtered set
/// (`GET /brawler-statistics`), groups descending by battle count.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BrawlerStatisticsResponse {
    /// Earliest battle timestamp in the filtered set.
    pub first_battle: DateTime<Utc>,
    /// Latest battle timestamp in the filtered set.
    pub last_battle: DateTime<Utc>,
    /// Battle count across all groups.
    pub total_battles: i64,
    /// Net trophy change across all groups.
    pub total_trophy_change: i64,
    /// Victory percentage across all groups, 2 decimals.
    pub overall_win_rate: f64,
    /// Per-brawler groups, descending by battle count (name ascending on
    /// ties).
    pub brawlers: Vec<BrawlerStatsDto>,
}

/// Per-game-mode statistics group.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct GameModeStatsDto {
    /// Battle mode; `null` groups records with no recorded mode.
    pub battle_mode: Option<String>,
    /// Battles fought in this mode.
    pub battles: i64,
    /// Victories in this mode.
    pub victories: i64,
    /// Net trophy change in this mode.
    pub trophy_change: i64,
    /// Victory percentage in this mode, 2 decimals.
    pub win_rate: f64,
    /// Mean battle duration in seconds over records that carry one; `null`
    /// when none do.
    pub avg_duration: Option<f64>,
    /// Mean net trophy change per battle, 2 decimals.
    pub avg_trophies_per_battle: f64,
    /// Approximate seconds spent per trophy gained, 2 decimals. Absent
    /// unless the mode has a known average duration and a positive net
    /// trophy change.
    pub seconds_per_trophy: Option<f64>,
}

/// Per-game-mode statistics over the filtered set
/// (`GET /gamemode-statistics`), groups descending by battle count.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct GameModeStatisticsResponse {
    /// Earliest battle timestamp in the filtered set.
    pub first_battle: DateTime<Utc>,
    /// Latest battle timestamp in the filtered set.
    pub last_battle: DateTime<Utc>,
    /// Battle count across all groups.
    pub total_battles: i64,
    /// Net trophy change across all groups.
    pub total_trophy_change: i64,
    /// Victory percentage across all groups, 2 decimals.
    pub overall_win_rate: f64,
    /// Per-mode groups, descending by battle count (mode name ascending on
    /// ties).
    pub modes: Vec<GameModeStatsDto>,
}
