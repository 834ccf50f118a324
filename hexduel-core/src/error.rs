//! Error types for the boundary operations

use crate::board::Hex;
use crate::config::Variant;
use crate::game::{Action, Player};

/// Invalid game configuration, reported before any search starts
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("board radius for {variant} must be in {min}..={max}, got {radius}")]
    InvalidRadius {
        variant: Variant,
        radius: i64,
        min: i8,
        max: i8,
    },

    #[error("unknown game variant: {0:?} (expected \"dodo\" or \"gopher\")")]
    UnknownVariant(String),

    #[error("heuristic weight {name} must be in -{max}..={max}, got {weight}")]
    WeightOutOfRange {
        name: &'static str,
        weight: i32,
        max: i32,
    },
}

/// Rejected board construction or state transition
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GameError {
    #[error("illegal action {action} for {player:?}")]
    InvalidAction { action: Action, player: Player },

    #[error("cell {cell} is outside a board of radius {radius}")]
    CellOutOfBounds { cell: Hex, radius: i8 },

    #[error("cell {0} is listed more than once")]
    DuplicateCell(Hex),
}
