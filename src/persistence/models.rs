//! Aggregate row types returned by the store's grouped queries.
//!
//! These are raw accumulator outputs (counts, conditional sums, extremes)
//! with no derived ratios. Rate and average computation happens in the
//! statistics service so it can be tested without a database.

use chrono::{DateTime, NaiveDate, Utc};

/// Whole-filtered-set accumulator row for the overall statistics query.
///
/// `first_battle`/`last_battle` are NULL (and `total_battles` zero) when the
/// filtered set is empty.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct OverallRow {
    /// Earliest `battle_time` in the filtered set.
    pub first_battle: Option<DateTime<Utc>>,
    /// Latest `battle_time` in the filtered set.
    pub last_battle: Option<DateTime<Utc>>,
    /// Total record count.
    pub total_battles: i64,
    /// Count of distinct `player_tag` values.
    pub unique_players: i64,
    /// Sum of `trophy_change` with NULLs contributing 0.
    pub trophy_change: i64,
    /// Count of records classified as victories.
    pub victories: i64,
}

/// One calendar-day group from the daily trophy progress query.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct DailyRow {
    /// UTC calendar date of the group.
    pub day: NaiveDate,
    /// Battles fought on this day.
    pub battles: i64,
    /// Victories on this day.
    pub victories: i64,
    /// Net trophy change on this day (NULLs as 0).
    pub trophy_change: i64,
}

/// One brawler group from the per-brawler statistics query.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct BrawlerRow {
    /// Group key; NULL names form their own group.
    pub brawler_name: Option<String>,
    /// Battles fought with this brawler.
    pub battles: i64,
    /// Victories with this brawler.
    pub victories: i64,
    /// Net trophy change with this brawler (NULLs as 0).
    pub trophy_change: i64,
}

/// One battle-mode group from the per-game-mode statistics query.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct GameModeRow {
    /// Group key; NULL modes form their own group.
    pub battle_mode: Option<String>,
    /// Battles fought in this mode.
    pub battles: i64,
    /// Victories in this mode.
    pub victories: i64,
    /// Net trophy change in this mode (NULLs as 0).
    pub trophy_change: i64,
    /// Mean `battle_duration` over records where it is non-NULL; NULL when
    /// no record in the group carries a duration.
    pub avg_duration: Option<f64>,
}

/// Min/max `battle_time` over the entire filtered set, independent of any
/// grouping.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct TimeRangeRow {
    /// Earliest `battle_time`, NULL on an empty set.
    pub first_battle: Option<DateTime<Utc>>,
    /// Latest `battle_time`, NULL on an empty set.
    pub last_battle: Option<DateTime<Utc>>,
}
