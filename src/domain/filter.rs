//! Query filter shared by every aggregation and retrieval path.
//!
//! [`BattleFilter`] translates the optional `player_tag` / `start_date` /
//! `end_date` request parameters into a conjunctive SQL predicate. It is
//! applied identically to every query in this layer — there is no
//! per-query variation.

use chrono::{DateTime, Utc};
use sqlx::{Postgres, QueryBuilder};

/// Optional bounds narrowing the battle log to a filtered record set.
///
/// A record satisfies the filter iff all supplied bounds hold; absent
/// bounds impose no constraint. Both time bounds are inclusive. A range
/// with `start_date > end_date` is not an error — it legitimately matches
/// nothing.
#[derive(Debug, Clone, Default)]
pub struct BattleFilter {
    /// Exact-match player identifier.
    pub player_tag: Option<String>,
    /// Inclusive lower bound on `battle_time`.
    pub start_date: Option<DateTime<Utc>>,
    /// Inclusive upper bound on `battle_time`.
    pub end_date: Option<DateTime<Utc>>,
}

impl BattleFilter {
    /// Creates a filter from the optional request parameters.
    #[must_use]
    pub fn new(
        player_tag: Option<String>,
        start_date: Option<DateTime<Utc>>,
        end_date: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            player_tag,
            start_date,
            end_date,
        }
    }

    /// Appends the filter's conditions to a query as bound `AND` clauses.
    ///
    /// Queries start from `WHERE TRUE` so every condition can be appended
    /// uniformly regardless of which bounds are present.
    pub fn apply(&self, builder: &mut QueryBuilder<'_, Postgres>) {
        if let Some(tag) = &self.player_tag {
            builder.push(" AND player_tag = ").push_bind(tag.clone());
        }
        if let Some(start) = self.start_date {
            builder.push(" AND battle_time >= ").push_bind(start);
        }
        if let Some(end) = self.end_date {
            builder.push(" AND battle_time <= ").push_bind(end);
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ts(y: i32, mo: u32, d: u32) -> DateTime<Utc> {
        let Some(t) = Utc.with_ymd_and_hms(y, mo, d, 0, 0, 0).single() else {
            panic!("valid timestamp");
        };
        t
    }

    fn build(filter: &BattleFilter) -> String {
        let mut qb = QueryBuilder::new("SELECT COUNT(*) FROM battle_logs WHERE TRUE");
        filter.apply(&mut qb);
        qb.sql().to_string()
    }

    #[test]
    fn empty_filter_appends_nothing() {
        let sql = build(&BattleFilter::default());
        assert_eq!(sql, "SELECT COUNT(*) FROM battle_logs WHERE TRUE");
    }

    #[test]
    fn all_bounds_appear_as_conjunction() {
        let filter = BattleFilter::new(
            Some("#ABC123".to_string()),
            Some(ts(2023, 5, 1)),
            Some(ts(2023, 5, 31)),
        );
        let sql = build(&filter);
        assert!(sql.contains("AND player_tag = $1"));
        assert!(sql.contains("AND battle_time >= $2"));
        assert!(sql.contains("AND battle_time <= $3"));
    }

    #[test]
    fn single_bound_binds_first_placeholder() {
        let filter = BattleFilter::new(None, None, Some(ts(2023, 5, 31)));
        let sql = build(&filter);
        assert!(sql.contains("AND battle_time <= $1"));
        assert!(!sql.contains("player_tag"));
        assert!(!sql.contains(">="));
    }

    #[test]
    fn inverted_range_builds_without_error() {
        // start > end is a legitimate empty result set, not a validation
        // failure.
        let filter = BattleFilter::new(None, Some(ts(2023, 6, 1)), Some(ts(2023, 5, 1)));
        let sql = build(&filter);
        assert!(sql.contains("battle_time >= $1"));
        assert!(sql.contains("battle_time <= $2"));
    }
}
