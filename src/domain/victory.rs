//! Victory classification.
//!
//! Showdown modes rank several independent participants instead of
//! reporting a binary outcome, so a win must be inferred from placement:
//! top 2 of 5 teams in duo showdown, top 4 of 10 players in solo showdown.
//! Every other mode (including ones this service has never seen) reports
//! its outcome directly through `battle_result`.
//!
//! The predicate exists in two forms that must stay in lockstep:
//! [`is_victory`] for in-memory classification and [`victory_sum_sql`] as
//! the conditional accumulator the store composes into every grouped query.

/// Battle mode that ranks five two-player teams.
pub const DUO_SHOWDOWN_MODE: &str = "duoShowdown";

/// Battle mode that ranks ten individual players.
pub const SOLO_SHOWDOWN_MODE: &str = "soloShowdown";

/// Highest placement that still counts as a win in duo showdown.
pub const DUO_SHOWDOWN_WIN_RANK: i32 = 2;

/// Highest placement that still counts as a win in solo showdown.
pub const SOLO_SHOWDOWN_WIN_RANK: i32 = 4;

/// `battle_result` value reported for a won battle in non-showdown modes.
pub const VICTORY_RESULT: &str = "victory";

/// Classifies one record as a win or a loss.
///
/// - `duoShowdown`: win iff `rank <= 2`.
/// - `soloShowdown`: win iff `rank <= 4`.
/// - any other mode, including `None` and unrecognized names: win iff
///   `battle_result == "victory"`.
///
/// A missing `rank` in a showdown mode is never a win, and a missing
/// `battle_result` elsewhere is never a win.
#[must_use]
pub fn is_victory(
    battle_mode: Option<&str>,
    battle_result: Option<&str>,
    rank: Option<i32>,
) -> bool {
    match battle_mode {
        Some(mode) if mode == DUO_SHOWDOWN_MODE => {
            rank.is_some_and(|r| r <= DUO_SHOWDOWN_WIN_RANK)
        }
        Some(mode) if mode == SOLO_SHOWDOWN_MODE => {
            rank.is_some_and(|r| r <= SOLO_SHOWDOWN_WIN_RANK)
        }
        _ => battle_result == Some(VICTORY_RESULT),
    }
}

/// SQL conditional accumulator counting victories, mirroring [`is_victory`]
/// clause for clause.
///
/// A NULL `rank` makes the showdown comparison NULL, which falls through to
/// the zero arm — the same "never a win" behavior as the in-memory
/// predicate. Callers wrap this in `COALESCE(..., 0)` since `SUM` over zero
/// rows is NULL.
#[must_use]
pub fn victory_sum_sql() -> String {
    format!(
        "SUM(CASE \
         WHEN battle_mode = '{DUO_SHOWDOWN_MODE}' \
         THEN CASE WHEN rank <= {DUO_SHOWDOWN_WIN_RANK} THEN 1 ELSE 0 END \
         WHEN battle_mode = '{SOLO_SHOWDOWN_MODE}' \
         THEN CASE WHEN rank <= {SOLO_SHOWDOWN_WIN_RANK} THEN 1 ELSE 0 END \
         WHEN battle_result = '{VICTORY_RESULT}' THEN 1 \
         ELSE 0 END)"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duo_showdown_rank_two_is_win() {
        assert!(is_victory(Some("duoShowdown"), None, Some(1)));
        assert!(is_victory(Some("duoShowdown"), None, Some(2)));
    }

    #[test]
    fn duo_showdown_rank_three_is_loss() {
        assert!(!is_victory(Some("duoShowdown"), None, Some(3)));
    }

    #[test]
    fn solo_showdown_threshold_is_four() {
        assert!(is_victory(Some("soloShowdown"), None, Some(4)));
        assert!(!is_victory(Some("soloShowdown"), None, Some(5)));
    }

    #[test]
    fn showdown_ignores_battle_result() {
        // Even a reported "victory" does not rescue a bad placement.
        assert!(!is_victory(Some("soloShowdown"), Some("victory"), Some(9)));
    }

    #[test]
    fn showdown_without_rank_is_loss() {
        assert!(!is_victory(Some("duoShowdown"), Some("victory"), None));
        assert!(!is_victory(Some("soloShowdown"), None, None));
    }

    #[test]
    fn other_modes_use_battle_result() {
        assert!(is_victory(Some("gemGrab"), Some("victory"), None));
        assert!(!is_victory(Some("gemGrab"), Some("defeat"), None));
        // Rank is irrelevant outside showdown.
        assert!(is_victory(Some("classic"), Some("victory"), Some(9)));
    }

    #[test]
    fn unrecognized_mode_uses_battle_result() {
        assert!(is_victory(Some("someFutureMode"), Some("victory"), None));
        assert!(!is_victory(Some("someFutureMode"), Some("draw"), None));
    }

    #[test]
    fn missing_mode_uses_battle_result() {
        assert!(is_victory(None, Some("victory"), None));
        assert!(!is_victory(None, None, Some(1)));
    }

    #[test]
    fn sql_mirror_carries_the_same_thresholds() {
        let sql = victory_sum_sql();
        assert!(sql.contains("battle_mode = 'duoShowdown'"));
        assert!(sql.contains("rank <= 2"));
        assert!(sql.contains("battle_mode = 'soloShowdown'"));
        assert!(sql.contains("rank <= 4"));
        assert!(sql.contains("battle_result = 'victory'"));
    }
}
