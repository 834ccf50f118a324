//! Players that pick actions for the game runner

use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

use crate::ai::AlphaBetaAI;
use crate::config::GameConfig;
use crate::eval::Evaluator;
use crate::game::{legal_actions, Action, Board, Player};

/// Something that chooses an action for `player`
///
/// Returning None means the agent has nothing to play.
pub trait Agent {
    fn name(&self) -> String;

    fn choose_action(&mut self, board: &Board, player: Player, game: &GameConfig) -> Option<Action>;
}

impl<E: Evaluator> Agent for AlphaBetaAI<E> {
    fn name(&self) -> String {
        format!("alpha-beta(depth={})", self.config.depth)
    }

    fn choose_action(&mut self, board: &Board, player: Player, game: &GameConfig) -> Option<Action> {
        self.best_action(board, player, game)
    }
}

/// Uniformly random legal actions
pub struct RandomAgent {
    rng: ChaCha8Rng,
}

impl RandomAgent {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }
}

impl Agent for RandomAgent {
    fn name(&self) -> String {
        "random".to_string()
    }

    fn choose_action(&mut self, board: &Board, player: Player, game: &GameConfig) -> Option<Action> {
        legal_actions(board, player, game).choose(&mut self.rng).copied()
    }
}
