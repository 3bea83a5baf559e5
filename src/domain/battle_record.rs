//! The battle record row model.
//!
//! One [`BattleRecord`] is one brawler's participation outcome in one match
//! instance. Records are created by an external ingestion process, never
//! updated or deleted — this service only reads them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::victory;

/// A single row of the `battle_logs` table.
///
/// Composite identity is `(player_tag, battle_time, brawler_id)`; no two
/// records share all three. Every other attribute is nullable; the upstream
/// game API omits fields freely depending on battle mode and client version.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct BattleRecord {
    /// Player identifier (e.g. `#2G0QY8LJC`). Part of the composite key.
    pub player_tag: String,
    /// Battle timestamp (UTC). Part of the composite key.
    pub battle_time: DateTime<Utc>,
    /// Numeric brawler identifier. Part of the composite key.
    pub brawler_id: i32,

    /// Brawler display name.
    pub brawler_name: Option<String>,
    /// Brawler power level at battle time.
    pub brawler_power: Option<i32>,
    /// Brawler trophy count at battle time.
    pub brawler_trophies: Option<i32>,
    /// Signed trophy delta for this brawler.
    pub brawler_trophy_change: Option<i32>,
    /// Player display name.
    pub player_name: Option<String>,
    /// Rotating event identifier.
    pub event_id: Option<i32>,
    /// Event mode name.
    pub event_mode: Option<String>,
    /// Event map name.
    pub event_map: Option<String>,
    /// Battle mode name. Drives victory classification.
    pub battle_mode: Option<String>,
    /// Battle type (e.g. `ranked`, `friendly`).
    pub battle_type: Option<String>,
    /// Reported outcome (`"victory"` or other). Only meaningful outside
    /// showdown modes.
    pub battle_result: Option<String>,
    /// Battle duration in seconds.
    pub battle_duration: Option<i32>,
    /// Signed trophy delta for the player.
    pub trophy_change: Option<i32>,
    /// 1-based placement. Only meaningful in showdown modes.
    pub rank: Option<i32>,
    /// Whether this player was the star player of the match.
    pub is_star_player: Option<bool>,
}

impl BattleRecord {
    /// Whether this record counts as a win under the mode-dependent
    /// classification rules in [`victory::is_victory`].
    #[must_use]
    pub fn is_victory(&self) -> bool {
        victory::is_victory(
            self.battle_mode.as_deref(),
            self.battle_result.as_deref(),
            self.rank,
        )
    }
}
