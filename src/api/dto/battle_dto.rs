//! Raw battle record DTO.

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::BattleRecord;

/// One battle record as returned by the raw `/battle-data` endpoints.
///
/// Field-for-field view of the stored row; nullable attributes serialize
/// as JSON `null`.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BattleRecordDto {
    /// Player identifier. Part of the composite key.
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
    /// Battle mode name.
    pub battle_mode: Option<String>,
    /// Battle type.
    pub battle_type: Option<String>,
    /// Reported outcome (`"victory"` or other).
    pub battle_result: Option<String>,
    /// Battle duration in seconds.
    pub battle_duration: Option<i32>,
    /// Signed trophy delta for the player.
    pub trophy_change: Option<i32>,
    /// 1-based placement in showdown modes.
    pub rank: Option<i32>,
    /// Whether this player was the star player.
    pub is_star_player: Option<bool>,
}

impl From<BattleRecord> for BattleRecordDto {
    fn from(record: BattleRecord) -> Self {
        Self {
            player_tag: record.player_tag,
            battle_time: record.battle_time,
            brawler_id: record.brawler_id,
            brawler_name: record.brawler_name,
            brawler_power: record.brawler_power,
            brawler_trophies: record.brawler_trophies,
            brawler_trophy_change: record.brawler_trophy_change,
            player_name: record.player_name,
            event_id: record.event_id,
            event_mode: record.event_mode,
            event_map: record.event_map,
            battle_mode: record.battle_mode,
            battle_type: record.battle_type,
            battle_result: record.battle_result,
            battle_duration: record.battle_duration,
            trophy_change: record.trophy_change,
            rank: record.rank,
            is_star_player: record.is_star_player,
        }
    }
}
