//! PostgreSQL implementation of the battle log store.
//!
//! All queries start from `WHERE TRUE` and let [`BattleFilter::apply`]
//! append the active bounds, so the same conjunctive predicate reaches
//! every retrieval and aggregation path. Victory counting uses the
//! case-when accumulator from [`crate::domain::victory`].

use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder};

use super::models::{BrawlerRow, DailyRow, GameModeRow, OverallRow, TimeRangeRow};
use crate::domain::victory::victory_sum_sql;
use crate::domain::{BattleFilter, BattleRecord};
use crate::error::ApiError;

/// Explicit schema for the battle log table, applied at startup.
///
/// Mirrors the ingestion side's layout: composite primary key, every other
/// attribute nullable. `battle_time` is `TIMESTAMPTZ`; day bucketing reads
/// it back in UTC.
const SCHEMA_SQL: &str = "CREATE TABLE IF NOT EXISTS battle_logs (\
    player_tag            VARCHAR(50)  NOT NULL,\
    battle_time           TIMESTAMPTZ  NOT NULL,\
    brawler_id            INTEGER      NOT NULL,\
    brawler_name          VARCHAR(50),\
    brawler_power         INTEGER,\
    brawler_trophies      INTEGER,\
    brawler_trophy_change INTEGER,\
    player_name           VARCHAR(50),\
    event_id              INTEGER,\
    event_mode            VARCHAR(50),\
    event_map             VARCHAR(100),\
    battle_mode           VARCHAR(50),\
    battle_type           VARCHAR(50),\
    battle_result         VARCHAR(10),\
    battle_duration       INTEGER,\
    trophy_change         INTEGER,\
    rank                  INTEGER,\
    is_star_player        BOOLEAN,\
    PRIMARY KEY (player_tag, battle_time, brawler_id)\
)";

/// Column list for raw record retrieval, in declaration order.
const RECORD_COLUMNS: &str = "player_tag, battle_time, brawler_id, brawler_name, \
    brawler_power, brawler_trophies, brawler_trophy_change, player_name, event_id, \
    event_mode, event_map, battle_mode, battle_type, battle_result, battle_duration, \
    trophy_change, rank, is_star_player";

/// PostgreSQL-backed battle log store using `sqlx::PgPool`.
#[derive(Debug, Clone)]
pub struct BattleStore {
    pool: PgPool,
}

impl BattleStore {
    /// Creates a new store with the given connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Ensures the `battle_logs` table exists.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Persistence`] on database failure.
    pub async fn init_schema(&self) -> Result<(), ApiError> {
        sqlx::query(SCHEMA_SQL)
            .execute(&self.pool)
            .await
            .map_err(|e| ApiError::Persistence(e.to_string()))?;
        tracing::info!("battle log schema ensured");
        Ok(())
    }

    /// Loads every record in the log, ordered by `(battle_time, player_tag,
    /// brawler_id)`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Persistence`] on database failure.
    pub async fn fetch_all(&self) -> Result<Vec<BattleRecord>, ApiError> {
        let sql = format!(
            "SELECT {RECORD_COLUMNS} FROM battle_logs \
             ORDER BY battle_time ASC, player_tag ASC, brawler_id ASC"
        );
        sqlx::query_as::<_, BattleRecord>(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| ApiError::Persistence(e.to_string()))
    }

    /// Loads every record for one player, ordered by `battle_time`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Persistence`] on database failure.
    pub async fn fetch_by_player(&self, player_tag: &str) -> Result<Vec<BattleRecord>, ApiError> {
        let sql = format!(
            "SELECT {RECORD_COLUMNS} FROM battle_logs WHERE player_tag = $1 \
             ORDER BY battle_time ASC, brawler_id ASC"
        );
        sqlx::query_as::<_, BattleRecord>(&sql)
            .bind(player_tag)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| ApiError::Persistence(e.to_string()))
    }

    /// Loads a single record by its composite key, if present.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Persistence`] on database failure.
    pub async fn fetch_by_key(
        &self,
        player_tag: &str,
        battle_time: DateTime<Utc>,
        brawler_id: i32,
    ) -> Result<Option<BattleRecord>, ApiError> {
        let sql = format!(
            "SELECT {RECORD_COLUMNS} FROM battle_logs \
             WHERE player_tag = $1 AND battle_time = $2 AND brawler_id = $3"
        );
        sqlx::query_as::<_, BattleRecord>(&sql)
            .bind(player_tag)
            .bind(battle_time)
            .bind(brawler_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| ApiError::Persistence(e.to_string()))
    }

    /// Runs the whole-set accumulator query for overall statistics.
    ///
    /// Always returns exactly one row; an empty filtered set comes back as
    /// zero counts with NULL time extremes.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Persistence`] on database failure.
    pub async fn overall(&self, filter: &BattleFilter) -> Result<OverallRow, ApiError> {
        let mut qb = overall_query(filter);
        qb.build_query_as::<OverallRow>()
            .fetch_one(&self.pool)
            .await
            .map_err(|e| ApiError::Persistence(e.to_string()))
    }

    /// Runs the per-UTC-day grouped query, ascending by date.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Persistence`] on database failure.
    pub async fn daily(&self, filter: &BattleFilter) -> Result<Vec<DailyRow>, ApiError> {
        let mut qb = daily_query(filter);
        qb.build_query_as::<DailyRow>()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| ApiError::Persistence(e.to_string()))
    }

    /// Runs the per-brawler grouped query, descending by battle count with
    /// name ascending as the deterministic tie-break.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Persistence`] on database failure.
    pub async fn by_brawler(&self, filter: &BattleFilter) -> Result<Vec<BrawlerRow>, ApiError> {
        let mut qb = brawler_query(filter);
        qb.build_query_as::<BrawlerRow>()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| ApiError::Persistence(e.to_string()))
    }

    /// Runs the per-battle-mode grouped query, descending by battle count
    /// with mode name ascending as the deterministic tie-break.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Persistence`] on database failure.
    pub async fn by_game_mode(&self, filter: &BattleFilter) -> Result<Vec<GameModeRow>, ApiError> {
        let mut qb = game_mode_query(filter);
        qb.build_query_as::<GameModeRow>()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| ApiError::Persistence(e.to_string()))
    }

    /// Returns min/max `battle_time` over the full filtered set.
    ///
    /// This is a second round-trip issued alongside a grouped query on the
    /// same filter. The two are not guaranteed to observe a mutually
    /// consistent snapshot; since records are immutable once written, the
    /// only possible skew is a concurrently ingested record, which is
    /// accepted.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Persistence`] on database failure.
    pub async fn time_range(&self, filter: &BattleFilter) -> Result<TimeRangeRow, ApiError> {
        let mut qb = time_range_query(filter);
        qb.build_query_as::<TimeRangeRow>()
            .fetch_one(&self.pool)
            .await
            .map_err(|e| ApiError::Persistence(e.to_string()))
    }
}

// ── Query Constructors ──────────────────────────────────────────────────
//
// Split from the async wrappers so the generated SQL is testable without a
// database connection.

fn overall_query(filter: &BattleFilter) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new(format!(
        "SELECT MIN(battle_time) AS first_battle, \
         MAX(battle_time) AS last_battle, \
         COUNT(*) AS total_battles, \
         COUNT(DISTINCT player_tag) AS unique_players, \
         COALESCE(SUM(COALESCE(trophy_change, 0)), 0) AS trophy_change, \
         COALESCE({victory}, 0) AS victories \
         FROM battle_logs WHERE TRUE",
        victory = victory_sum_sql()
    ));
    filter.apply(&mut qb);
    qb
}

fn daily_query(filter: &BattleFilter) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new(format!(
        "SELECT (battle_time AT TIME ZONE 'UTC')::DATE AS day, \
         COUNT(*) AS battles, \
         COALESCE({victory}, 0) AS victories, \
         COALESCE(SUM(COALESCE(trophy_change, 0)), 0) AS trophy_change \
         FROM battle_logs WHERE TRUE",
        victory = victory_sum_sql()
    ));
    filter.apply(&mut qb);
    qb.push(" GROUP BY day ORDER BY day ASC");
    qb
}

fn brawler_query(filter: &BattleFilter) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new(format!(
        "SELECT brawler_name, \
         COUNT(*) AS battles, \
         COALESCE({victory}, 0) AS victories, \
         COALESCE(SUM(COALESCE(trophy_change, 0)), 0) AS trophy_change \
         FROM battle_logs WHERE TRUE",
        victory = victory_sum_sql()
    ));
    filter.apply(&mut qb);
    qb.push(" GROUP BY brawler_name ORDER BY battles DESC, brawler_name ASC");
    qb
}

fn game_mode_query(filter: &BattleFilter) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new(format!(
        "SELECT battle_mode, \
         COUNT(*) AS battles, \
         COALESCE({victory}, 0) AS victories, \
         COALESCE(SUM(COALESCE(trophy_change, 0)), 0) AS trophy_change, \
         AVG(battle_duration)::DOUBLE PRECISION AS avg_duration \
         FROM battle_logs WHERE TRUE",
        victory = victory_sum_sql()
    ));
    filter.apply(&mut qb);
    qb.push(" GROUP BY battle_mode ORDER BY battles DESC, battle_mode ASC");
    qb
}

fn time_range_query(filter: &BattleFilter) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new(
        "SELECT MIN(battle_time) AS first_battle, MAX(battle_time) AS last_battle \
         FROM battle_logs WHERE TRUE",
    );
    filter.apply(&mut qb);
    qb
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player_filter() -> BattleFilter {
        BattleFilter::new(Some("#ABC123".to_string()), None, None)
    }

    #[test]
    fn schema_declares_composite_key() {
        assert!(SCHEMA_SQL.contains("PRIMARY KEY (player_tag, battle_time, brawler_id)"));
        assert!(SCHEMA_SQL.contains("CREATE TABLE IF NOT EXISTS battle_logs"));
    }

    #[test]
    fn overall_counts_distinct_players() {
        let sql = overall_query(&player_filter()).sql().to_string();
        assert!(sql.contains("COUNT(DISTINCT player_tag) AS unique_players"));
        assert!(sql.contains("MIN(battle_time) AS first_battle"));
        assert!(sql.contains("AND player_tag = $1"));
    }

    #[test]
    fn overall_null_coalesces_trophy_sum() {
        let sql = overall_query(&BattleFilter::default()).sql().to_string();
        assert!(sql.contains("COALESCE(SUM(COALESCE(trophy_change, 0)), 0)"));
    }

    #[test]
    fn daily_groups_by_utc_date_ascending() {
        let sql = daily_query(&BattleFilter::default()).sql().to_string();
        assert!(sql.contains("(battle_time AT TIME ZONE 'UTC')::DATE AS day"));
        assert!(sql.ends_with("GROUP BY day ORDER BY day ASC"));
    }

    #[test]
    fn brawler_orders_by_battles_then_name() {
        let sql = brawler_query(&BattleFilter::default()).sql().to_string();
        assert!(sql.ends_with("GROUP BY brawler_name ORDER BY battles DESC, brawler_name ASC"));
    }

    #[test]
    fn game_mode_averages_duration() {
        let sql = game_mode_query(&BattleFilter::default()).sql().to_string();
        assert!(sql.contains("AVG(battle_duration)::DOUBLE PRECISION AS avg_duration"));
        assert!(sql.ends_with("GROUP BY battle_mode ORDER BY battles DESC, battle_mode ASC"));
    }

    #[test]
    fn grouped_queries_carry_the_victory_accumulator() {
        for sql in [
            daily_query(&BattleFilter::default()).sql().to_string(),
            brawler_query(&BattleFilter::default()).sql().to_string(),
            game_mode_query(&BattleFilter::default()).sql().to_string(),
        ] {
            assert!(sql.contains("SUM(CASE"));
            assert!(sql.contains("battle_mode = 'duoShowdown'"));
        }
    }

    #[test]
    fn time_range_applies_the_same_filter() {
        let sql = time_range_query(&player_filter()).sql().to_string();
        assert!(sql.contains("MIN(battle_time)"));
        assert!(sql.contains("MAX(battle_time)"));
        assert!(sql.contains("AND player_tag = $1"));
    }
}
