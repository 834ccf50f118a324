//! hexduel core - game engine and AI for Dodo and Gopher
//!
//! This crate provides:
//! - Board geometry (hex grid with axial coordinates)
//! - Board state, per-game move generation and transitions
//! - Position evaluation with mobility heuristics
//! - CPU-based minimax AI with alpha-beta pruning and memoization
//! - A game runner for playing agents against each other

pub mod board;
pub mod config;
pub mod error;
pub mod game;
pub mod eval;
pub mod ai;
pub mod agent;
pub mod game_runner;
pub mod render;

// Re-exports for convenient access
pub use board::{Hex, DIRECTIONS, MAX_RADIUS};
pub use config::{GameConfig, MatchSettings, Variant};
pub use error::{ConfigError, GameError};
pub use game::{apply, game_result, is_terminal, legal_actions, Action, Board, GameResult, Player};
pub use eval::{Evaluator, Heuristics, MAX_WEIGHT, WIN_VALUE};
pub use ai::{best_action, AlphaBetaAI, SearchConfig, SearchOutcome, SearchStats};
pub use agent::{Agent, RandomAgent};
pub use game_runner::{play_game, GameRecord};
pub use render::{render_board, BoardView};
