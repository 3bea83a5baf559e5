//! Statistics aggregation over the filtered battle log.
//!
//! Each public method is one statistics endpoint: fetch the store's
//! accumulator rows for the active filter, then assemble the response
//! contract. Assembly is split into pure functions so the derived-metric
//! rules (day spans, rates, guards) are testable without a database.
//!
//! Every aggregation is stateless and independent: no cross-request
//! state, no caching; identical queries recompute from scratch. Division
//! is always guarded by the emptiness check: an empty filtered set becomes
//! [`ApiError::NotFound`] before any ratio is computed, and emitted groups
//! always hold at least one record.
//!
//! Day bucketing uses UTC calendar dates on both sides: the store groups
//! by `(battle_time AT TIME ZONE 'UTC')::DATE` and the day-span math here
//! uses [`chrono::DateTime::date_naive`] on UTC timestamps.

use std::sync::Arc;

use crate::api::dto::{
    BattleStatisticsResponse, BrawlerStatisticsResponse, BrawlerStatsDto, DailyTrophyDto,
    GameModeStatisticsResponse, GameModeStatsDto, TrophyProgressResponse,
};
use crate::domain::BattleFilter;
use crate::error::ApiError;
use crate::persistence::BattleStore;
use crate::persistence::models::{BrawlerRow, DailyRow, GameModeRow, OverallRow, TimeRangeRow};

/// Read-only aggregation facade over the battle store.
#[derive(Debug, Clone)]
pub struct StatsService {
    store: Arc<BattleStore>,
}

impl StatsService {
    /// Creates a new `StatsService`.
    #[must_use]
    pub fn new(store: Arc<BattleStore>) -> Self {
        Self { store }
    }

    /// Overall statistics for the filtered set.
    ///
    /// # Errors
    ///
    /// [`ApiError::NotFound`] when the filtered set is empty;
    /// [`ApiError::Persistence`] on database failure.
    pub async fn battle_statistics(
        &self,
        filter: &BattleFilter,
    ) -> Result<BattleStatisticsResponse, ApiError> {
        let row = self.store.overall(filter).await?;
        assemble_overall(&row)
    }

    /// Daily trophy progress for the filtered set.
    ///
    /// # Errors
    ///
    /// [`ApiError::NotFound`] when the filtered set is empty;
    /// [`ApiError::Persistence`] on database failure.
    pub async fn trophy_progress(
        &self,
        filter: &BattleFilter,
    ) -> Result<TrophyProgressResponse, ApiError> {
        let rows = self.store.daily(filter).await?;
        assemble_trophy_progress(&rows)
    }

    /// Per-brawler statistics for the filtered set.
    ///
    /// Issues two round-trips on the same filter: the grouped query and the
    /// ungrouped time range (see [`BattleStore::time_range`] for the
    /// accepted consistency gap).
    ///
    /// # Errors
    ///
    /// [`ApiError::NotFound`] when the filtered set is empty;
    /// [`ApiError::Persistence`] on database failure.
    pub async fn brawler_statistics(
        &self,
        filter: &BattleFilter,
    ) -> Result<BrawlerStatisticsResponse, ApiError> {
        let rows = self.store.by_brawler(filter).await?;
        let range = self.store.time_range(filter).await?;
        assemble_brawler_statistics(rows, &range)
    }

    /// Per-game-mode statistics for the filtered set.
    ///
    /// Issues the same two round-trips as
    /// [`StatsService::brawler_statistics`].
    ///
    /// # Errors
    ///
    /// [`ApiError::NotFound`] when the filtered set is empty;
    /// [`ApiError::Persistence`] on database failure.
    pub async fn game_mode_statistics(
        &self,
        filter: &BattleFilter,
    ) -> Result<GameModeStatisticsResponse, ApiError> {
        let rows = self.store.by_game_mode(filter).await?;
        let range = self.store.time_range(filter).await?;
        assemble_game_mode_statistics(rows, &range)
    }
}

// ── Assembly ────────────────────────────────────────────────────────────

/// Rounds to two decimal places.
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Victory percentage, 2 decimals. Callers guarantee `battles > 0`.
#[allow(clippy::cast_precision_loss)]
fn win_rate(victories: i64, battles: i64) -> f64 {
    round2(victories as f64 / battles as f64 * 100.0)
}

#[allow(clippy::cast_precision_loss)]
fn assemble_overall(row: &OverallRow) -> Result<BattleStatisticsResponse, ApiError> {
    let (Some(first), Some(last)) = (row.first_battle, row.last_battle) else {
        return Err(ApiError::NotFound(
            "no battle records match the requested filter".to_string(),
        ));
    };

    // Inclusive UTC day span; 1 when first and last fall on the same day.
    let days_diff = (last.date_naive() - first.date_naive()).num_days() + 1;
    let days = days_diff as f64;

    Ok(BattleStatisticsResponse {
        first_battle: first,
        last_battle: last,
        total_battles: row.total_battles,
        unique_players: row.unique_players,
        days_diff,
        win_rate: win_rate(row.victories, row.total_battles),
        avg_battles_per_day: round2(row.total_battles as f64 / days),
        avg_trophies_per_day: round2(row.trophy_change as f64 / days),
        avg_victories_per_day: round2(row.victories as f64 / days),
    })
}

fn assemble_trophy_progress(rows: &[DailyRow]) -> Result<TrophyProgressResponse, ApiError> {
    let (Some(first), Some(last)) = (rows.first(), rows.last()) else {
        return Err(ApiError::NotFound(
            "no trophy progress for the requested filter".to_string(),
        ));
    };

    let total_battles: i64 = rows.iter().map(|r| r.battles).sum();
    let total_victories: i64 = rows.iter().map(|r| r.victories).sum();
    let total_trophy_change: i64 = rows.iter().map(|r| r.trophy_change).sum();

    let days = rows
        .iter()
        .map(|r| DailyTrophyDto {
            date: r.day,
            trophy_change: r.trophy_change,
            battles: r.battles,
            victories: r.victories,
            win_rate: win_rate(r.victories, r.battles),
        })
        .collect();

    Ok(TrophyProgressResponse {
        start_date: first.day,
        end_date: last.day,
        total_trophy_change,
        total_battles,
        overall_win_rate: win_rate(total_victories, total_battles),
        days,
    })
}

fn assemble_brawler_statistics(
    rows: Vec<BrawlerRow>,
    range: &TimeRangeRow,
) -> Result<BrawlerStatisticsResponse, ApiError> {
    let (Some(first), Some(last)) = (range.first_battle, range.last_battle) else {
        return Err(ApiError::NotFound(
            "no brawler statistics for the requested filter".to_string(),
        ));
    };
    if rows.is_empty() {
        return Err(ApiError::NotFound(
            "no brawler statistics for the requested filter".to_string(),
        ));
    }

    let total_battles: i64 = rows.iter().map(|r| r.battles).sum();
    let total_victories: i64 = rows.iter().map(|r| r.victories).sum();
    let total_trophy_change: i64 = rows.iter().map(|r| r.trophy_change).sum();

    let brawlers = rows
        .into_iter()
        .map(|r| BrawlerStatsDto {
            win_rate: win_rate(r.victories, r.battles),
            brawler_name: r.brawler_name,
            battles: r.battles,
            victories: r.victories,
            trophy_change: r.trophy_change,
        })
        .collect();

    Ok(BrawlerStatisticsResponse {
        first_battle: first,
        last_battle: last,
        total_battles,
        total_trophy_change,
        overall_win_rate: win_rate(total_victories, total_battles),
        brawlers,
    })
}

#[allow(clippy::cast_precision_loss)]
fn assemble_game_mode_statistics(
    rows: Vec<GameModeRow>,
    range: &TimeRangeRow,
) -> Result<GameModeStatisticsResponse, ApiError> {
    let (Some(first), Some(last)) = (range.first_battle, range.last_battle) else {
        return Err(ApiError::NotFound(
            "no game mode statistics for the requested filter".to_string(),
        ));
    };
    if rows.is_empty() {
        return Err(ApiError::NotFound(
            "no game mode statistics for the requested filter".to_string(),
        ));
    }

    let total_battles: i64 = rows.iter().map(|r| r.battles).sum();
    let total_victories: i64 = rows.iter().map(|r| r.victories).sum();
    let total_trophy_change: i64 = rows.iter().map(|r| r.trophy_change).sum();

    let modes = rows
        .into_iter()
        .map(|r| {
            // Seconds-per-trophy is undefined without a known duration or
            // with a non-positive net trophy change.
            let seconds_per_trophy = match r.avg_duration {
                Some(avg) if r.trophy_change > 0 => {
                    Some(round2(avg * r.battles as f64 / r.trophy_change as f64))
                }
                _ => None,
            };
            GameModeStatsDto {
                win_rate: win_rate(r.victories, r.battles),
                avg_trophies_per_battle: round2(r.trophy_change as f64 / r.battles as f64),
                seconds_per_trophy,
                battle_mode: r.battle_mode,
                battles: r.battles,
                victories: r.victories,
                trophy_change: r.trophy_change,
                avg_duration: r.avg_duration,
            }
        })
        .collect();

    Ok(GameModeStatisticsResponse {
        first_battle: first,
        last_battle: last,
        total_battles,
        total_trophy_change,
        overall_win_rate: win_rate(total_victories, total_battles),
        modes,
    })
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use chrono::{DateTime, NaiveDate, TimeZone, Utc};

    use super::*;
    use crate::domain::BattleRecord;

    fn ts(y: i32, mo: u32, d: u32, h: u32) -> DateTime<Utc> {
        let Some(t) = Utc.with_ymd_and_hms(y, mo, d, h, 0, 0).single() else {
            panic!("valid timestamp");
        };
        t
    }

    fn date(y: i32, mo: u32, d: u32) -> NaiveDate {
        let Some(day) = NaiveDate::from_ymd_opt(y, mo, d) else {
            panic!("valid date");
        };
        day
    }

    fn showdown_record(rank: i32, trophy_change: i32) -> BattleRecord {
        BattleRecord {
            player_tag: "#ABC123".to_string(),
            battle_time: ts(2023, 5, 6, 12),
            brawler_id: 16_000_000,
            brawler_name: Some("SHELLY".to_string()),
            brawler_power: Some(9),
            brawler_trophies: Some(520),
            brawler_trophy_change: Some(trophy_change),
            player_name: Some("Player".to_string()),
            event_id: Some(15_000_010),
            event_mode: Some("duoShowdown".to_string()),
            event_map: Some("Skull Creek".to_string()),
            battle_mode: Some("duoShowdown".to_string()),
            battle_type: Some("ranked".to_string()),
            battle_result: None,
            battle_duration: None,
            trophy_change: Some(trophy_change),
            rank: Some(rank),
            is_star_player: Some(false),
        }
    }

    fn empty_range() -> TimeRangeRow {
        TimeRangeRow {
            first_battle: None,
            last_battle: None,
        }
    }

    fn range(first: DateTime<Utc>, last: DateTime<Utc>) -> TimeRangeRow {
        TimeRangeRow {
            first_battle: Some(first),
            last_battle: Some(last),
        }
    }

    // ── Overall ─────────────────────────────────────────────────────────

    #[test]
    fn overall_empty_set_is_not_found() {
        let row = OverallRow {
            first_battle: None,
            last_battle: None,
            total_battles: 0,
            unique_players: 0,
            trophy_change: 0,
            victories: 0,
        };
        let result = assemble_overall(&row);
        assert!(matches!(result, Err(ApiError::NotFound(_))));
    }

    #[test]
    fn overall_same_day_span_is_one() {
        let row = OverallRow {
            first_battle: Some(ts(2023, 5, 6, 9)),
            last_battle: Some(ts(2023, 5, 6, 23)),
            total_battles: 4,
            unique_players: 1,
            trophy_change: 12,
            victories: 2,
        };
        let Ok(stats) = assemble_overall(&row) else {
            panic!("expected stats");
        };
        assert_eq!(stats.days_diff, 1);
        assert_eq!(stats.avg_battles_per_day, 4.0);
        assert_eq!(stats.win_rate, 50.0);
    }

    #[test]
    fn overall_duo_showdown_scenario() {
        // Two duoShowdown battles on one day: rank 1 (+20) and rank 4 (-10).
        let records = [showdown_record(1, 20), showdown_record(4, -10)];
        let victories = records.iter().filter(|r| r.is_victory()).count() as i64;
        assert_eq!(victories, 1);

        let row = OverallRow {
            first_battle: records.first().map(|r| r.battle_time),
            last_battle: records.last().map(|r| r.battle_time),
            total_battles: records.len() as i64,
            unique_players: 1,
            trophy_change: records
                .iter()
                .map(|r| i64::from(r.trophy_change.unwrap_or(0)))
                .sum(),
            victories,
        };
        let Ok(stats) = assemble_overall(&row) else {
            panic!("expected stats");
        };
        assert_eq!(stats.total_battles, 2);
        assert_eq!(stats.win_rate, 50.0);
        assert_eq!(stats.avg_trophies_per_day, 10.0);
        assert_eq!(stats.avg_victories_per_day, 1.0);
    }

    #[test]
    fn overall_rounds_to_two_decimals() {
        let row = OverallRow {
            first_battle: Some(ts(2023, 5, 1, 0)),
            last_battle: Some(ts(2023, 5, 3, 0)),
            total_battles: 2,
            unique_players: 1,
            trophy_change: 10,
            victories: 1,
        };
        let Ok(stats) = assemble_overall(&row) else {
            panic!("expected stats");
        };
        assert_eq!(stats.days_diff, 3);
        assert_eq!(stats.avg_battles_per_day, 0.67);
        assert_eq!(stats.avg_trophies_per_day, 3.33);
        assert_eq!(stats.avg_victories_per_day, 0.33);
    }

    // ── Trophy progress ─────────────────────────────────────────────────

    #[test]
    fn progress_empty_set_is_not_found() {
        let result = assemble_trophy_progress(&[]);
        assert!(matches!(result, Err(ApiError::NotFound(_))));
    }

    #[test]
    fn progress_totals_sum_across_days() {
        let rows = vec![
            DailyRow {
                day: date(2023, 5, 1),
                battles: 3,
                victories: 2,
                trophy_change: 15,
            },
            DailyRow {
                day: date(2023, 5, 2),
                battles: 1,
                victories: 0,
                trophy_change: -8,
            },
        ];
        let Ok(progress) = assemble_trophy_progress(&rows) else {
            panic!("expected progress");
        };
        assert_eq!(progress.total_battles, 4);
        assert_eq!(progress.total_trophy_change, 7);
        assert_eq!(progress.overall_win_rate, 50.0);
        assert_eq!(progress.start_date, date(2023, 5, 1));
        assert_eq!(progress.end_date, date(2023, 5, 2));

        let per_day_battles: i64 = progress.days.iter().map(|d| d.battles).sum();
        assert_eq!(per_day_battles, progress.total_battles);
    }

    #[test]
    fn progress_per_day_win_rates_are_bounded() {
        let rows = vec![
            DailyRow {
                day: date(2023, 5, 1),
                battles: 2,
                victories: 2,
                trophy_change: 16,
            },
            DailyRow {
                day: date(2023, 5, 2),
                battles: 3,
                victories: 0,
                trophy_change: -12,
            },
        ];
        let Ok(progress) = assemble_trophy_progress(&rows) else {
            panic!("expected progress");
        };
        for day in &progress.days {
            assert!(day.win_rate >= 0.0);
            assert!(day.win_rate <= 100.0);
        }
        let Some(first) = progress.days.first() else {
            panic!("expected days");
        };
        assert_eq!(first.win_rate, 100.0);
    }

    #[test]
    fn progress_all_null_trophy_day_yields_zero() {
        // A day whose every record had NULL trophy_change arrives from the
        // store as a zero sum, not a NULL.
        let rows = vec![DailyRow {
            day: date(2023, 5, 1),
            battles: 2,
            victories: 1,
            trophy_change: 0,
        }];
        let Ok(progress) = assemble_trophy_progress(&rows) else {
            panic!("expected progress");
        };
        assert_eq!(progress.total_trophy_change, 0);
    }

    // ── Per-brawler ─────────────────────────────────────────────────────

    #[test]
    fn brawler_empty_set_is_not_found() {
        let result = assemble_brawler_statistics(vec![], &empty_range());
        assert!(matches!(result, Err(ApiError::NotFound(_))));
    }

    #[test]
    fn brawler_totals_and_group_order_survive_assembly() {
        let rows = vec![
            BrawlerRow {
                brawler_name: Some("SHELLY".to_string()),
                battles: 5,
                victories: 3,
                trophy_change: 22,
            },
            BrawlerRow {
                brawler_name: Some("COLT".to_string()),
                battles: 2,
                victories: 0,
                trophy_change: -9,
            },
            BrawlerRow {
                brawler_name: None,
                battles: 1,
                victories: 1,
                trophy_change: 8,
            },
        ];
        let result =
            assemble_brawler_statistics(rows, &range(ts(2023, 5, 1, 8), ts(2023, 5, 9, 21)));
        let Ok(stats) = result else {
            panic!("expected stats");
        };
        assert_eq!(stats.total_battles, 8);
        assert_eq!(stats.total_trophy_change, 21);
        assert_eq!(stats.overall_win_rate, 50.0);

        let group_battles: i64 = stats.brawlers.iter().map(|b| b.battles).sum();
        assert_eq!(group_battles, stats.total_battles);

        // Store ordering (battles descending) is preserved as-is.
        let names: Vec<Option<&str>> = stats
            .brawlers
            .iter()
            .map(|b| b.brawler_name.as_deref())
            .collect();
        assert_eq!(names, vec![Some("SHELLY"), Some("COLT"), None]);
    }

    // ── Per-game-mode ───────────────────────────────────────────────────

    #[test]
    fn game_mode_empty_set_is_not_found() {
        let result = assemble_game_mode_statistics(vec![], &empty_range());
        assert!(matches!(result, Err(ApiError::NotFound(_))));
    }

    fn mode_row(
        mode: &str,
        battles: i64,
        victories: i64,
        trophy_change: i64,
        avg_duration: Option<f64>,
    ) -> GameModeRow {
        GameModeRow {
            battle_mode: Some(mode.to_string()),
            battles,
            victories,
            trophy_change,
            avg_duration,
        }
    }

    #[test]
    fn seconds_per_trophy_requires_duration_and_positive_gain() {
        let rows = vec![
            // Known duration, positive gain: present.
            mode_row("gemGrab", 4, 2, 16, Some(120.0)),
            // Known duration, net loss: absent.
            mode_row("heist", 2, 0, -5, Some(90.0)),
            // Known duration, zero net: absent.
            mode_row("bounty", 2, 1, 0, Some(100.0)),
            // Positive gain, no duration recorded: absent.
            mode_row("soloShowdown", 3, 1, 9, None),
        ];
        let result =
            assemble_game_mode_statistics(rows, &range(ts(2023, 5, 1, 8), ts(2023, 5, 2, 21)));
        let Ok(stats) = result else {
            panic!("expected stats");
        };

        let by_mode = |name: &str| {
            stats
                .modes
                .iter()
                .find(|m| m.battle_mode.as_deref() == Some(name))
        };
        let Some(gem_grab) = by_mode("gemGrab") else {
            panic!("expected gemGrab group");
        };
        // 120 s average over 4 battles for 16 trophies.
        assert_eq!(gem_grab.seconds_per_trophy, Some(30.0));
        assert_eq!(gem_grab.avg_trophies_per_battle, 4.0);

        for name in ["heist", "bounty", "soloShowdown"] {
            let Some(group) = by_mode(name) else {
                panic!("expected group");
            };
            assert!(group.seconds_per_trophy.is_none());
        }
    }

    #[test]
    fn game_mode_averages_round_to_two_decimals() {
        let rows = vec![mode_row("gemGrab", 3, 2, 10, Some(95.5))];
        let result =
            assemble_game_mode_statistics(rows, &range(ts(2023, 5, 1, 8), ts(2023, 5, 1, 21)));
        let Ok(stats) = result else {
            panic!("expected stats");
        };
        let Some(group) = stats.modes.first() else {
            panic!("expected group");
        };
        assert_eq!(group.avg_trophies_per_battle, 3.33);
        // 95.5 * 3 / 10 = 28.65
        assert_eq!(group.seconds_per_trophy, Some(28.65));
        assert_eq!(group.win_rate, 66.67);
    }

    // ── Helpers ─────────────────────────────────────────────────────────

    #[test]
    fn round2_behaves_at_boundaries() {
        assert_eq!(round2(1.0 / 3.0 * 100.0), 33.33);
        assert_eq!(round2(2.0 / 3.0 * 100.0), 66.67);
        assert_eq!(round2(0.005), 0.01);
        assert_eq!(round2(-3.335), -3.33);
    }

    #[test]
    fn win_rate_bounds() {
        assert_eq!(win_rate(0, 7), 0.0);
        assert_eq!(win_rate(7, 7), 100.0);
        assert_eq!(win_rate(1, 3), 33.33);
    }
}
