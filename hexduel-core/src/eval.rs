//! Position evaluation

use serde::{Deserialize, Serialize};

use crate::board::{cell_count, MAX_RADIUS};
use crate::config::GameConfig;
use crate::error::ConfigError;
use crate::game::{mobility, Board, Player};

/// Win value (dominates any heuristic score)
pub const WIN_VALUE: i32 = 1_000_000;

/// Upper bound on any single heuristic term on the largest board
///
/// Six per cell covers crowding (six neighbours per stone) and Dodo
/// mobility (three slides per piece).
const TERM_BOUND: i32 = 6 * cell_count(MAX_RADIUS) as i32;

/// Largest accepted weight magnitude; three maxed terms stay below `WIN_VALUE`
pub const MAX_WEIGHT: i32 = (WIN_VALUE - 1) / (3 * TERM_BOUND);

/// Scores a position from one player's point of view; higher is better
///
/// Implementations must be pure: the same inputs always give the same score.
pub trait Evaluator: Sync {
    fn evaluate(&self, board: &Board, player: Player, config: &GameConfig) -> i32;
}

/// Heuristic weights for position evaluation
///
/// Deserialization rejects weights outside `-MAX_WEIGHT..=MAX_WEIGHT`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawHeuristics")]
pub struct Heuristics {
    /// Weight for own mobility (legal action count)
    pub mobility_weight: i32,
    /// Weight subtracted per opponent legal action
    pub opponent_mobility_weight: i32,
    /// Weight for stones crowding the opponent
    pub crowding_weight: i32,
}

impl Default for Heuristics {
    fn default() -> Self {
        Self {
            mobility_weight: 1,
            opponent_mobility_weight: 0,
            crowding_weight: 0,
        }
    }
}

#[derive(Deserialize)]
#[serde(default)]
struct RawHeuristics {
    mobility_weight: i32,
    opponent_mobility_weight: i32,
    crowding_weight: i32,
}

impl Default for RawHeuristics {
    fn default() -> Self {
        let h = Heuristics::default();
        Self {
            mobility_weight: h.mobility_weight,
            opponent_mobility_weight: h.opponent_mobility_weight,
            crowding_weight: h.crowding_weight,
        }
    }
}

impl TryFrom<RawHeuristics> for Heuristics {
    type Error = ConfigError;

    fn try_from(raw: RawHeuristics) -> Result<Self, Self::Error> {
        let heuristics = Heuristics {
            mobility_weight: raw.mobility_weight,
            opponent_mobility_weight: raw.opponent_mobility_weight,
            crowding_weight: raw.crowding_weight,
        };
        heuristics.validate()?;
        Ok(heuristics)
    }
}

impl Heuristics {
    /// Check every weight against `MAX_WEIGHT`
    pub fn validate(&self) -> Result<(), ConfigError> {
        let weights = [
            ("mobility_weight", self.mobility_weight),
            ("opponent_mobility_weight", self.opponent_mobility_weight),
            ("crowding_weight", self.crowding_weight),
        ];
        for (name, weight) in weights {
            if weight.unsigned_abs() > MAX_WEIGHT as u32 {
                return Err(ConfigError::WeightOutOfRange {
                    name,
                    weight,
                    max: MAX_WEIGHT,
                });
            }
        }
        Ok(())
    }

    /// Opponent suppression only
    pub fn crowding() -> Self {
        Self {
            mobility_weight: 0,
            opponent_mobility_weight: 0,
            crowding_weight: 1,
        }
    }

    /// Own mobility minus opponent mobility
    pub fn mobility_balance() -> Self {
        Self {
            mobility_weight: 1,
            opponent_mobility_weight: 1,
            crowding_weight: 0,
        }
    }
}

impl Evaluator for Heuristics {
    fn evaluate(&self, board: &Board, player: Player, config: &GameConfig) -> i32 {
        evaluate(board, player, config, self)
    }
}

/// Evaluate position from `player`'s perspective
///
/// The result always lies strictly inside `-WIN_VALUE..WIN_VALUE`, even for
/// hand-built weights that skipped validation.
pub fn evaluate(board: &Board, player: Player, config: &GameConfig, heuristics: &Heuristics) -> i32 {
    let opponent = player.opponent();
    let mut score = 0i32;

    if heuristics.mobility_weight != 0 {
        let own = mobility(board, player, config) as i32;
        score = score.saturating_add(heuristics.mobility_weight.saturating_mul(own));
    }

    if heuristics.opponent_mobility_weight != 0 {
        let theirs = mobility(board, opponent, config) as i32;
        score = score.saturating_sub(heuristics.opponent_mobility_weight.saturating_mul(theirs));
    }

    if heuristics.crowding_weight != 0 {
        let crowded = crowding(board, opponent) as i32;
        score = score.saturating_add(heuristics.crowding_weight.saturating_mul(crowded));
    }

    score.clamp(1 - WIN_VALUE, WIN_VALUE - 1)
}

/// Sum over `player`'s stones of their occupied neighbor count
pub fn crowding(board: &Board, player: Player) -> usize {
    board
        .pieces()
        .filter(|&(_, owner)| owner == player)
        .map(|(hex, _)| board.occupied_neighbors(hex))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Hex;
    use crate::game::legal_actions;

    #[test]
    fn test_default_is_own_mobility() {
        let config = GameConfig::dodo(4).unwrap();
        let board = Board::initial(&config);
        let h = Heuristics::default();
        assert_eq!(
            h.evaluate(&board, Player::First, &config),
            legal_actions(&board, Player::First, &config).len() as i32
        );
    }

    #[test]
    fn test_balance_is_zero_on_symmetric_start() {
        let config = GameConfig::dodo(5).unwrap();
        let board = Board::initial(&config);
        let score = Heuristics::mobility_balance().evaluate(&board, Player::Second, &config);
        assert_eq!(score, 0);
    }

    #[test]
    fn test_crowding_counts_opponent_contacts() {
        let config = GameConfig::gopher(4).unwrap();
        let board = Board::from_cells(
            [
                (Hex::new(0, 0), Player::Second),
                (Hex::new(1, 0), Player::First),
                (Hex::new(0, 1), Player::First),
                (Hex::new(-3, 0), Player::Second),
            ],
            &config,
        )
        .unwrap();
        assert_eq!(crowding(&board, Player::Second), 2);
        assert_eq!(Heuristics::crowding().evaluate(&board, Player::First, &config), 2);
    }

    #[test]
    fn test_oversized_weight_is_rejected_on_load() {
        let err = serde_json::from_str::<Heuristics>(r#"{"mobility_weight":100000000}"#).unwrap_err();
        assert!(err.to_string().contains("mobility_weight"));

        let settings = serde_json::from_str::<crate::config::MatchSettings>(
            r#"{"game":{"variant":"gopher","radius":4},"heuristics":{"crowding_weight":-100000}}"#,
        );
        assert!(settings.is_err());

        let ok: Heuristics =
            serde_json::from_str(&format!(r#"{{"opponent_mobility_weight":{}}}"#, -MAX_WEIGHT)).unwrap();
        assert_eq!(ok.opponent_mobility_weight, -MAX_WEIGHT);
        assert_eq!(ok.mobility_weight, 1);
        assert_eq!(
            Heuristics { crowding_weight: MAX_WEIGHT + 1, ..Heuristics::default() }.validate(),
            Err(ConfigError::WeightOutOfRange {
                name: "crowding_weight",
                weight: MAX_WEIGHT + 1,
                max: MAX_WEIGHT,
            })
        );
    }

    #[test]
    fn test_unvalidated_weights_stay_below_win_value() {
        let config = GameConfig::gopher(4).unwrap();
        let board = Board::empty();
        let big = Heuristics { mobility_weight: 100_000, ..Heuristics::default() };
        assert!(big.evaluate(&board, Player::First, &config) < WIN_VALUE);

        let huge = Heuristics {
            mobility_weight: i32::MAX,
            opponent_mobility_weight: i32::MIN,
            crowding_weight: i32::MAX,
        };
        assert_eq!(huge.evaluate(&board, Player::First, &config), WIN_VALUE - 1);
        let negative = Heuristics { mobility_weight: i32::MIN, ..Heuristics::default() };
        assert_eq!(negative.evaluate(&board, Player::Second, &config), 1 - WIN_VALUE);
    }

    #[test]
    fn test_max_weights_cannot_reach_win_value() {
        assert!(MAX_WEIGHT >= 1);
        assert!(3 * MAX_WEIGHT as i64 * (TERM_BOUND as i64) < WIN_VALUE as i64);
    }

    #[test]
    fn test_evaluation_is_idempotent() {
        let config = GameConfig::gopher(4).unwrap();
        let board = Board::empty()
            .with_action(crate::game::Action::Place(Hex::new(1, 1)), Player::First);
        let h = Heuristics::mobility_balance();
        let first = h.evaluate(&board, Player::Second, &config);
        let second = h.evaluate(&board, Player::Second, &config);
        assert_eq!(first, second);
    }
}
