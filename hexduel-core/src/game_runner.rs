//! Game runner - plays one game between two agents

use serde::Serialize;

use crate::agent::Agent;
use crate::board::Hex;
use crate::config::GameConfig;
use crate::error::GameError;
use crate::game::{apply, is_terminal, Action, Board, GameResult, Player};

/// Outcome of a single game
#[derive(Clone, Debug, Serialize)]
pub struct GameRecord {
    pub game: GameConfig,
    /// Final game result (Ongoing if the ply limit was hit)
    pub result: GameResult,
    /// Number of actions played
    pub plies: u32,
    /// Action history, first player's action first
    pub actions: Vec<Action>,
    #[serde(serialize_with = "serialize_board")]
    pub final_board: Board,
}

fn serialize_board<S: serde::Serializer>(board: &Board, serializer: S) -> Result<S::Ok, S::Error> {
    let cells: Vec<(Hex, Player)> = board.sorted_cells();
    serde::Serialize::serialize(&cells, serializer)
}

impl GameRecord {
    pub fn winner(&self) -> Option<Player> {
        self.result.winner()
    }

    /// Player whose turn it is on `final_board`
    pub fn next_player(&self) -> Player {
        if self.plies % 2 == 0 {
            Player::First
        } else {
            Player::Second
        }
    }
}

/// Play from the starting position until someone is stuck or `max_plies` is reached
///
/// Every agent action goes through [`apply`], so an agent that returns an
/// illegal action ends the game with an error instead of a corrupted board.
pub fn play_game(
    first: &mut dyn Agent,
    second: &mut dyn Agent,
    game: &GameConfig,
    max_plies: u32,
) -> Result<GameRecord, GameError> {
    play_from(Board::initial(game), first, second, game, max_plies)
}

/// Like [`play_game`] from an arbitrary position, first player to move
pub fn play_from(
    initial: Board,
    first: &mut dyn Agent,
    second: &mut dyn Agent,
    game: &GameConfig,
    max_plies: u32,
) -> Result<GameRecord, GameError> {
    tracing::info!(
        "Starting {} game (radius {}): {} vs {}",
        game.variant(),
        game.radius(),
        first.name(),
        second.name()
    );

    let mut board = initial;
    let mut player = Player::First;
    let mut actions = Vec::new();
    let mut result = GameResult::Ongoing;

    while (actions.len() as u32) < max_plies {
        if is_terminal(&board, player, game) {
            result = GameResult::won_by(player.opponent());
            break;
        }

        let choice = match player {
            Player::First => first.choose_action(&board, player, game),
            Player::Second => second.choose_action(&board, player, game),
        };
        let Some(action) = choice else {
            // Agent gave up with moves still available
            result = GameResult::won_by(player.opponent());
            break;
        };

        board = apply(&board, action, player, game)?;
        tracing::debug!("Ply {}: {:?} plays {}", actions.len() + 1, player, action);
        actions.push(action);
        player = player.opponent();
    }

    if result == GameResult::Ongoing && is_terminal(&board, player, game) {
        result = GameResult::won_by(player.opponent());
    }

    tracing::info!("Game over after {} plies: {:?}", actions.len(), result);

    Ok(GameRecord {
        game: *game,
        result,
        plies: actions.len() as u32,
        actions,
        final_board: board,
    })
}
