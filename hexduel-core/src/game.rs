//! Board state, move generation and state transitions

use std::fmt;
use std::hash::{Hash, Hasher};

use rustc_hash::{FxHashMap, FxHasher};
use serde::{Deserialize, Serialize};

use crate::board::{cells_within, Hex};
use crate::config::{GameConfig, Variant};
use crate::error::GameError;

// ============================================================================
// CONSTANTS
// ============================================================================

/// Dodo slide directions for the first player (toward +q / -r)
const FIRST_DODO_DIRECTIONS: [(i8, i8); 3] = [(1, 0), (1, -1), (0, -1)];

/// Dodo slide directions for the second player (toward -q / +r)
const SECOND_DODO_DIRECTIONS: [(i8, i8); 3] = [(-1, 0), (-1, 1), (0, 1)];

// ============================================================================
// CORE TYPES
// ============================================================================

/// Player color
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Player {
    First = 0,
    Second = 1,
}

impl Player {
    pub fn opponent(self) -> Self {
        match self {
            Player::First => Player::Second,
            Player::Second => Player::First,
        }
    }

    /// Board glyph: Blue for the first player, Red for the second
    pub fn symbol(self) -> char {
        match self {
            Player::First => 'B',
            Player::Second => 'R',
        }
    }

    /// The three directions this player's Dodo pieces may slide in
    pub fn dodo_directions(self) -> &'static [(i8, i8); 3] {
        match self {
            Player::First => &FIRST_DODO_DIRECTIONS,
            Player::Second => &SECOND_DODO_DIRECTIONS,
        }
    }
}

/// Game result
///
/// The player left without a legal action loses; neither game has draws.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameResult {
    Ongoing,
    FirstWins,
    SecondWins,
}

impl GameResult {
    pub fn won_by(player: Player) -> Self {
        match player {
            Player::First => GameResult::FirstWins,
            Player::Second => GameResult::SecondWins,
        }
    }

    pub fn winner(self) -> Option<Player> {
        match self {
            GameResult::Ongoing => None,
            GameResult::FirstWins => Some(Player::First),
            GameResult::SecondWins => Some(Player::Second),
        }
    }

    /// +1 if `player` won, -1 if they lost, 0 while the game is still on
    pub fn score_for(self, player: Player) -> i32 {
        match self.winner() {
            None => 0,
            Some(winner) if winner == player => 1,
            Some(_) => -1,
        }
    }
}

/// A legal action
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Action {
    /// Dodo: move one piece a single step
    Slide { from: Hex, to: Hex },
    /// Gopher: drop a stone on an empty cell
    Place(Hex),
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Slide { from, to } => write!(f, "{} -> {}", from, to),
            Action::Place(cell) => write!(f, "{}", cell),
        }
    }
}

// ============================================================================
// BOARD STATE
// ============================================================================

/// Occupied cells and their owners; absent cells are empty
///
/// Boards are values: transitions return a fresh board and leave the input
/// untouched, so sibling search branches never observe each other's moves.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Board {
    cells: FxHashMap<Hex, Player>,
}

impl Hash for Board {
    fn hash<H: Hasher>(&self, state: &mut H) {
        // Order-independent so equal maps hash equally whatever their layout
        let mut combined = 0u64;
        for (hex, player) in &self.cells {
            let mut h = FxHasher::default();
            hex.hash(&mut h);
            player.hash(&mut h);
            combined = combined.wrapping_add(h.finish());
        }
        state.write_usize(self.cells.len());
        state.write_u64(combined);
    }
}

impl Board {
    // ========================================================================
    // CONSTRUCTORS
    // ========================================================================

    /// Board with no stones
    pub fn empty() -> Self {
        Self::default()
    }

    /// Starting position for the configured game
    pub fn initial(config: &GameConfig) -> Self {
        match config.variant() {
            Variant::Dodo => dodo_layout(config.radius()),
            Variant::Gopher => Self::empty(),
        }
    }

    /// Build a board from explicit placements, rejecting bad cells
    pub fn from_cells<I>(cells: I, config: &GameConfig) -> Result<Self, GameError>
    where
        I: IntoIterator<Item = (Hex, Player)>,
    {
        let radius = config.radius();
        let mut board = Self::empty();
        for (cell, player) in cells {
            if !cell.in_bounds(radius) {
                return Err(GameError::CellOutOfBounds { cell, radius });
            }
            if board.cells.insert(cell, player).is_some() {
                return Err(GameError::DuplicateCell(cell));
            }
        }
        Ok(board)
    }

    // ========================================================================
    // ACCESSORS
    // ========================================================================

    /// Owner of the stone on `hex`, if any
    pub fn get(&self, hex: Hex) -> Option<Player> {
        self.cells.get(&hex).copied()
    }

    pub fn is_occupied(&self, hex: Hex) -> bool {
        self.cells.contains_key(&hex)
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Number of stones on the board
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Iterate stones in arbitrary order
    pub fn pieces(&self) -> impl Iterator<Item = (Hex, Player)> + '_ {
        self.cells.iter().map(|(&hex, &player)| (hex, player))
    }

    /// Cells owned by `player`, sorted
    pub fn pieces_of(&self, player: Player) -> Vec<Hex> {
        let mut cells: Vec<Hex> = self
            .pieces()
            .filter(|&(_, owner)| owner == player)
            .map(|(hex, _)| hex)
            .collect();
        cells.sort_unstable();
        cells
    }

    /// All stones, sorted by cell
    pub fn sorted_cells(&self) -> Vec<(Hex, Player)> {
        let mut cells: Vec<_> = self.pieces().collect();
        cells.sort_unstable();
        cells
    }

    pub fn count(&self, player: Player) -> usize {
        self.cells.values().filter(|&&owner| owner == player).count()
    }

    /// Number of stones (either color) adjacent to `hex`
    pub fn occupied_neighbors(&self, hex: Hex) -> usize {
        hex.neighbors().iter().filter(|n| self.is_occupied(**n)).count()
    }

    // ========================================================================
    // TRANSITIONS
    // ========================================================================

    /// New board with `action` played by `player`; `self` is left unchanged
    ///
    /// The action is trusted to come from the move generator. Use [`apply`]
    /// for anything that crosses the API boundary.
    pub fn with_action(&self, action: Action, player: Player) -> Self {
        let mut next = self.clone();
        match action {
            Action::Slide { from, to } => {
                next.cells.remove(&from);
                next.cells.insert(to, player);
            }
            Action::Place(cell) => {
                next.cells.insert(cell, player);
            }
        }
        next
    }

    /// Check a single action against the current position
    pub fn is_legal(&self, action: Action, player: Player, config: &GameConfig) -> bool {
        let radius = config.radius();
        match (config.variant(), action) {
            (Variant::Dodo, Action::Slide { from, to }) => {
                self.get(from) == Some(player)
                    && player.dodo_directions().iter().any(|&d| from.offset(d) == to)
                    && to.in_bounds(radius)
                    && !self.is_occupied(to)
            }
            (Variant::Gopher, Action::Place(cell)) => {
                cell.in_bounds(radius) && (self.is_empty() || self.gopher_allows(cell, player))
            }
            _ => false,
        }
    }

    // ========================================================================
    // MOVE GENERATION
    // ========================================================================

    fn dodo_actions(&self, player: Player, radius: i8) -> Vec<Action> {
        let mut actions = Vec::new();
        for from in self.pieces_of(player) {
            for &dir in player.dodo_directions() {
                let to = from.offset(dir);
                if to.in_bounds(radius) && !self.is_occupied(to) {
                    actions.push(Action::Slide { from, to });
                }
            }
        }
        actions
    }

    fn gopher_actions(&self, player: Player, radius: i8) -> Vec<Action> {
        if self.is_empty() {
            return cells_within(radius).map(Action::Place).collect();
        }
        cells_within(radius)
            .filter(|&cell| self.gopher_allows(cell, player))
            .map(Action::Place)
            .collect()
    }

    /// Empty cell touching exactly one stone, and that stone is the opponent's
    fn gopher_allows(&self, cell: Hex, player: Player) -> bool {
        if self.is_occupied(cell) {
            return false;
        }
        let mut only_neighbor = None;
        for n in cell.neighbors() {
            if let Some(owner) = self.get(n) {
                if only_neighbor.is_some() {
                    return false;
                }
                only_neighbor = Some(owner);
            }
        }
        only_neighbor == Some(player.opponent())
    }
}

/// Dodo starting camps
///
/// The first player fills the `q <= 0, r >= 0` corner, the second player the
/// point-mirrored corner, each leaving a two-row gap toward the center.
fn dodo_layout(radius: i8) -> Board {
    let mut board = Board::empty();
    for r in 0..radius {
        for q in (1 - radius)..=0 {
            let cell = Hex::new(q, r);
            if q.abs() >= radius - 2 - r && cell.in_bounds(radius) {
                board.cells.insert(cell, Player::First);
                board.cells.insert(Hex::new(-q, -r), Player::Second);
            }
        }
    }
    board
}

// ============================================================================
// BOUNDARY OPERATIONS
// ============================================================================

/// Every action `player` may take, in a stable order
///
/// Dodo actions are ordered by source cell, then by the player's direction
/// order; Gopher placements follow [`cells_within`]. An empty result means the
/// player is stuck and has lost.
pub fn legal_actions(board: &Board, player: Player, config: &GameConfig) -> Vec<Action> {
    match config.variant() {
        Variant::Dodo => board.dodo_actions(player, config.radius()),
        Variant::Gopher => board.gopher_actions(player, config.radius()),
    }
}

/// Validated transition
pub fn apply(
    board: &Board,
    action: Action,
    player: Player,
    config: &GameConfig,
) -> Result<Board, GameError> {
    if !board.is_legal(action, player, config) {
        return Err(GameError::InvalidAction { action, player });
    }
    Ok(board.with_action(action, player))
}

/// True when `player` has no legal action
pub fn is_terminal(board: &Board, player: Player, config: &GameConfig) -> bool {
    legal_actions(board, player, config).is_empty()
}

/// Outcome with `to_move` about to play
pub fn game_result(board: &Board, to_move: Player, config: &GameConfig) -> GameResult {
    if is_terminal(board, to_move, config) {
        GameResult::won_by(to_move.opponent())
    } else {
        GameResult::Ongoing
    }
}

/// Legal action count
pub fn mobility(board: &Board, player: Player, config: &GameConfig) -> usize {
    legal_actions(board, player, config).len()
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rand::prelude::*;
    use rand_chacha::ChaCha8Rng;

    fn dodo4() -> GameConfig {
        GameConfig::dodo(4).unwrap()
    }

    fn gopher4() -> GameConfig {
        GameConfig::gopher(4).unwrap()
    }

    #[test]
    fn test_dodo_layout() {
        let board = Board::initial(&dodo4());
        assert_eq!(board.count(Player::First), 13);
        assert_eq!(board.count(Player::Second), 13);
        assert_eq!(board.get(Hex::new(-3, 3)), Some(Player::First));
        assert_eq!(board.get(Hex::new(-2, 0)), Some(Player::First));
        assert_eq!(board.get(Hex::new(-1, 0)), None);
        assert_eq!(board.get(Hex::new(3, -3)), Some(Player::Second));
        assert_eq!(board.get(Hex::new(2, 0)), Some(Player::Second));
        assert!(board.pieces().all(|(hex, _)| hex.in_bounds(4)));
    }

    #[test]
    fn test_dodo_layout_is_point_symmetric() {
        for radius in 3..=7 {
            let board = Board::initial(&GameConfig::dodo(radius).unwrap());
            for (hex, player) in board.pieces() {
                assert_eq!(board.get(Hex::new(-hex.q, -hex.r)), Some(player.opponent()));
            }
        }
    }

    #[test]
    fn test_gopher_starts_empty() {
        assert!(Board::initial(&gopher4()).is_empty());
    }

    #[test]
    fn test_dodo_opening_mobility_is_symmetric() {
        let config = dodo4();
        let board = Board::initial(&config);
        let first = mobility(&board, Player::First, &config);
        let second = mobility(&board, Player::Second, &config);
        assert!(first > 0);
        assert_eq!(first, second);
    }

    #[test]
    fn test_dodo_actions_respect_rules() {
        let config = dodo4();
        let board = Board::initial(&config);
        for player in [Player::First, Player::Second] {
            for action in legal_actions(&board, player, &config) {
                let Action::Slide { from, to } = action else {
                    panic!("dodo produced {action:?}");
                };
                assert_eq!(board.get(from), Some(player));
                assert!(!board.is_occupied(to));
                assert!(to.in_bounds(4));
                assert!(player.dodo_directions().iter().any(|&d| from.offset(d) == to));
            }
        }
    }

    #[test]
    fn test_blocked_piece_is_terminal() {
        let config = dodo4();
        let board = Board::from_cells(
            [
                (Hex::new(0, 0), Player::First),
                (Hex::new(1, 0), Player::Second),
                (Hex::new(1, -1), Player::Second),
                (Hex::new(0, -1), Player::Second),
            ],
            &config,
        )
        .unwrap();
        assert!(legal_actions(&board, Player::First, &config).is_empty());
        assert!(is_terminal(&board, Player::First, &config));
        assert_eq!(game_result(&board, Player::First, &config), GameResult::SecondWins);
        assert!(!is_terminal(&board, Player::Second, &config));
    }

    #[test]
    fn test_edge_piece_cannot_leave_board() {
        let config = dodo4();
        let board = Board::from_cells([(Hex::new(3, -3), Player::First)], &config).unwrap();
        assert!(legal_actions(&board, Player::First, &config).is_empty());

        let board = Board::from_cells([(Hex::new(3, -1), Player::First)], &config).unwrap();
        assert_eq!(
            legal_actions(&board, Player::First, &config),
            vec![Action::Slide { from: Hex::new(3, -1), to: Hex::new(3, -2) }]
        );
    }

    #[test]
    fn test_gopher_opening_is_unconstrained() {
        let config = gopher4();
        let actions = legal_actions(&Board::empty(), Player::First, &config);
        assert_eq!(actions.len(), 37);
    }

    #[test]
    fn test_gopher_exactly_one_enemy_neighbor() {
        let config = gopher4();
        let board = Board::empty().with_action(Action::Place(Hex::new(0, 0)), Player::First);

        let replies = legal_actions(&board, Player::Second, &config);
        assert_eq!(replies.len(), 6);
        assert!(replies.iter().all(|a| matches!(a, Action::Place(c) if c.distance_to_center() == 1)));

        // Touching only your own stone is not allowed
        assert!(legal_actions(&board, Player::First, &config).is_empty());

        // A cell touching two stones is excluded
        let board = board.with_action(Action::Place(Hex::new(1, 0)), Player::Second);
        let actions = legal_actions(&board, Player::First, &config);
        assert!(!actions.contains(&Action::Place(Hex::new(1, -1))));
        assert!(!actions.contains(&Action::Place(Hex::new(0, 1))));
        assert!(actions.contains(&Action::Place(Hex::new(2, 0))));
        for action in actions {
            let Action::Place(cell) = action else { unreachable!() };
            assert_eq!(board.occupied_neighbors(cell), 1);
        }
    }

    #[test]
    fn test_apply_does_not_mutate_input() {
        let config = dodo4();
        let board = Board::initial(&config);
        let snapshot = board.clone();
        let action = legal_actions(&board, Player::First, &config)[0];
        let next = apply(&board, action, Player::First, &config).unwrap();
        assert_eq!(board, snapshot);
        assert_ne!(next, board);
        assert_eq!(next.len(), board.len());
    }

    #[test]
    fn test_apply_rejects_illegal_actions() {
        let config = dodo4();
        let board = Board::initial(&config);

        // Moving an opponent piece
        let theirs = legal_actions(&board, Player::Second, &config)[0];
        assert!(matches!(
            apply(&board, theirs, Player::First, &config),
            Err(GameError::InvalidAction { .. })
        ));

        // Wrong variant
        assert!(apply(&board, Action::Place(Hex::new(0, 0)), Player::First, &config).is_err());

        // Backward slide
        let back = Action::Slide { from: Hex::new(-2, 0), to: Hex::new(-3, 0) };
        assert!(apply(&board, back, Player::First, &config).is_err());
    }

    #[test]
    fn test_from_cells_validation() {
        let config = gopher4();
        assert_eq!(
            Board::from_cells([(Hex::new(4, 0), Player::First)], &config),
            Err(GameError::CellOutOfBounds { cell: Hex::new(4, 0), radius: 4 })
        );
        assert_eq!(
            Board::from_cells(
                [(Hex::new(0, 0), Player::First), (Hex::new(0, 0), Player::Second)],
                &config
            ),
            Err(GameError::DuplicateCell(Hex::new(0, 0)))
        );
    }

    #[test]
    fn test_extreme_cells_are_rejected_at_the_boundary() {
        let gopher = gopher4();
        let dodo = dodo4();
        let empty = Board::empty();
        let started = empty.with_action(Action::Place(Hex::new(0, 0)), Player::First);

        for cell in [Hex::new(i8::MIN, 0), Hex::new(i8::MAX, i8::MAX)] {
            for board in [&empty, &started] {
                assert_eq!(
                    apply(board, Action::Place(cell), Player::Second, &gopher),
                    Err(GameError::InvalidAction {
                        action: Action::Place(cell),
                        player: Player::Second,
                    })
                );
            }
            assert_eq!(
                Board::from_cells([(cell, Player::First)], &gopher),
                Err(GameError::CellOutOfBounds { cell, radius: 4 })
            );

            let slide = Action::Slide { from: Hex::new(3, -1), to: cell };
            let board = Board::from_cells([(Hex::new(3, -1), Player::First)], &dodo).unwrap();
            assert!(apply(&board, slide, Player::First, &dodo).is_err());
        }

        let wrapping = Action::Slide { from: Hex::new(i8::MAX, 0), to: Hex::new(i8::MIN, 0) };
        assert!(apply(&Board::initial(&dodo), wrapping, Player::First, &dodo).is_err());
    }

    #[test]
    fn test_equal_boards_hash_equal() {
        use std::collections::hash_map::DefaultHasher;

        let config = dodo4();
        let a = Board::initial(&config);
        let b = Board::from_cells(a.sorted_cells().into_iter().rev(), &config).unwrap();
        assert_eq!(a, b);

        let hash = |board: &Board| {
            let mut h = DefaultHasher::new();
            board.hash(&mut h);
            h.finish()
        };
        assert_eq!(hash(&a), hash(&b));
    }

    #[test]
    fn test_terminal_matches_empty_action_set_on_random_playouts() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for config in [dodo4(), gopher4()] {
            for _ in 0..5 {
                let mut board = Board::initial(&config);
                let mut player = Player::First;
                loop {
                    let actions = legal_actions(&board, player, &config);
                    assert_eq!(is_terminal(&board, player, &config), actions.is_empty());
                    let Some(&action) = actions.choose(&mut rng) else { break };
                    board = apply(&board, action, player, &config).unwrap();
                    player = player.opponent();
                }
            }
        }
    }

    #[test]
    fn test_result_scores() {
        assert_eq!(GameResult::FirstWins.score_for(Player::First), 1);
        assert_eq!(GameResult::FirstWins.score_for(Player::Second), -1);
        assert_eq!(GameResult::Ongoing.score_for(Player::Second), 0);
        assert_eq!(GameResult::won_by(Player::Second), GameResult::SecondWins);
    }
}
