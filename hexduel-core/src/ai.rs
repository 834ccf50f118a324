//! Depth-limited minimax with alpha-beta pruning and memoization

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::{Duration, Instant};

use rayon::prelude::*;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::config::GameConfig;
use crate::eval::{Evaluator, Heuristics, WIN_VALUE};
use crate::game::{legal_actions, Action, Board, Player};

// ============================================================================
// CONSTANTS
// ============================================================================

/// Bound used for the open search window
const SCORE_INF: i32 = i32::MAX;

/// Nodes between wall-clock checks
const CLOCK_CHECK_INTERVAL: u64 = 64;

// ============================================================================
// CONFIGURATION
// ============================================================================

/// Search parameters
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Plies to look ahead (at least 1)
    pub depth: u32,
    /// Memoize subtree scores for the duration of one search
    pub use_cache: bool,
    /// Search root actions on the rayon pool
    pub parallel: bool,
    /// Stop after this many visited nodes
    pub max_nodes: Option<u64>,
    /// Stop after this many milliseconds
    pub time_limit_ms: Option<u64>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            depth: 3,
            use_cache: true,
            parallel: false,
            max_nodes: None,
            time_limit_ms: None,
        }
    }
}

impl SearchConfig {
    pub fn with_depth(depth: u32) -> Self {
        Self {
            depth,
            ..Default::default()
        }
    }

    fn is_limited(&self) -> bool {
        self.max_nodes.is_some() || self.time_limit_ms.is_some()
    }
}

/// Counters from one `best_action` call
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SearchStats {
    pub nodes: u64,
    pub cache_hits: u64,
    pub cache_misses: u64,
    /// Deepest root iteration that finished
    pub completed_depth: u32,
    /// A node or time budget cut the search short
    pub aborted: bool,
}

/// Chosen action plus its backed-up score
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchOutcome {
    pub action: Option<Action>,
    pub score: Option<i32>,
    pub stats: SearchStats,
}

// ============================================================================
// MEMOIZATION
// ============================================================================

/// Everything a subtree score depends on
///
/// The window bounds are part of the key, since a pruned score is only valid
/// for the window it was computed under.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct CacheKey {
    board: Board,
    depth: u32,
    maximizing: bool,
    player: Player,
    config: GameConfig,
    alpha: i32,
    beta: i32,
}

/// Write-once score cache, scoped to one top-level search
#[derive(Debug, Default)]
struct SearchCache {
    entries: FxHashMap<CacheKey, i32>,
    hits: u64,
    misses: u64,
}

impl SearchCache {
    fn new() -> Self {
        Self::default()
    }

    fn get(&mut self, key: &CacheKey) -> Option<i32> {
        let found = self.entries.get(key).copied();
        if found.is_some() {
            self.hits += 1;
        } else {
            self.misses += 1;
        }
        found
    }

    fn insert(&mut self, key: CacheKey, score: i32) {
        // First computation wins
        self.entries.entry(key).or_insert(score);
    }
}

// ============================================================================
// BUDGET
// ============================================================================

/// Node and wall-clock limits shared by every branch of one search
struct Budget {
    nodes: AtomicU64,
    max_nodes: Option<u64>,
    deadline: Option<Instant>,
    exhausted: AtomicBool,
}

impl Budget {
    fn new(config: &SearchConfig) -> Self {
        Self {
            nodes: AtomicU64::new(0),
            max_nodes: config.max_nodes,
            deadline: config
                .time_limit_ms
                .map(|ms| Instant::now() + Duration::from_millis(ms)),
            exhausted: AtomicBool::new(false),
        }
    }

    /// Count a node; false once the budget is spent
    fn tick(&self) -> bool {
        if self.exhausted.load(Ordering::Relaxed) {
            return false;
        }
        let visited = self.nodes.fetch_add(1, Ordering::Relaxed) + 1;
        let out_of_nodes = self.max_nodes.is_some_and(|max| visited > max);
        let out_of_time = self.deadline.is_some_and(|deadline| {
            visited % CLOCK_CHECK_INTERVAL == 1 && Instant::now() >= deadline
        });
        if out_of_nodes || out_of_time {
            self.exhausted.store(true, Ordering::Relaxed);
            return false;
        }
        true
    }

    fn visited(&self) -> u64 {
        self.nodes.load(Ordering::Relaxed)
    }
}

// ============================================================================
// ALPHA-BETA AI
// ============================================================================

/// Alpha-Beta AI player
pub struct AlphaBetaAI<E: Evaluator = Heuristics> {
    pub config: SearchConfig,
    evaluator: E,
    last_stats: SearchStats,
}

impl AlphaBetaAI<Heuristics> {
    pub fn new(depth: u32, heuristics: Heuristics) -> Self {
        Self::with_evaluator(SearchConfig::with_depth(depth), heuristics)
    }
}

impl<E: Evaluator> AlphaBetaAI<E> {
    pub fn with_evaluator(config: SearchConfig, evaluator: E) -> Self {
        Self {
            config,
            evaluator,
            last_stats: SearchStats::default(),
        }
    }

    /// Get best action for `player`, or None if they have no legal action
    pub fn best_action(&mut self, board: &Board, player: Player, game: &GameConfig) -> Option<Action> {
        let outcome = self.search(board, player, game);
        self.last_stats = outcome.stats;
        outcome.action
    }

    /// Counters from the most recent `best_action` call
    pub fn last_stats(&self) -> SearchStats {
        self.last_stats
    }

    /// Static evaluation of a position
    pub fn evaluate(&self, board: &Board, player: Player, game: &GameConfig) -> i32 {
        self.evaluator.evaluate(board, player, game)
    }

    /// Run a full search and report the chosen action, its score and counters
    ///
    /// Without a budget the root is searched once at the configured depth.
    /// With one, depths 1, 2, ... are searched in turn and the result of the
    /// deepest finished iteration is kept.
    pub fn search(&self, board: &Board, player: Player, game: &GameConfig) -> SearchOutcome {
        let actions = legal_actions(board, player, game);
        if actions.is_empty() {
            return SearchOutcome {
                action: None,
                score: None,
                stats: SearchStats::default(),
            };
        }

        let started = Instant::now();
        let budget = Budget::new(&self.config);
        let target = self.config.depth.max(1);
        let first_depth = if self.config.is_limited() { 1 } else { target };

        let mut stats = SearchStats::default();
        let mut chosen: Option<(Action, i32)> = None;
        let mut ctx = Search::new(&self.evaluator, *game, player, &budget, self.config.use_cache);

        for depth in first_depth..=target {
            let root = if self.config.parallel {
                self.search_root_parallel(board, &actions, depth, player, game, &budget, &mut stats)
            } else {
                ctx.search_root(board, &actions, depth)
            };

            if root.complete {
                chosen = root.best;
                stats.completed_depth = depth;
            } else {
                if chosen.is_none() {
                    chosen = root.best;
                }
                stats.aborted = true;
                tracing::warn!(
                    "Search budget exhausted at depth {} after {} nodes",
                    depth,
                    budget.visited()
                );
                break;
            }
        }

        if let Some(cache) = &ctx.cache {
            stats.cache_hits += cache.hits;
            stats.cache_misses += cache.misses;
        }
        stats.nodes = budget.visited();

        // A spent budget before any root child finished still yields a move
        let (action, score) = match chosen {
            Some((action, score)) => (action, Some(score)),
            None => (actions[0], None),
        };

        tracing::debug!(
            "Search: depth={} nodes={} cache_hits={} score={:?} elapsed={:?}",
            stats.completed_depth,
            stats.nodes,
            stats.cache_hits,
            score,
            started.elapsed()
        );

        SearchOutcome {
            action: Some(action),
            score,
            stats,
        }
    }

    /// Root children on the rayon pool, each with a full window and own cache
    #[allow(clippy::too_many_arguments)]
    fn search_root_parallel(
        &self,
        board: &Board,
        actions: &[Action],
        depth: u32,
        player: Player,
        game: &GameConfig,
        budget: &Budget,
        stats: &mut SearchStats,
    ) -> RootResult {
        let scored: Vec<(Option<i32>, u64, u64)> = actions
            .par_iter()
            .map(|&action| {
                let mut ctx = Search::new(&self.evaluator, *game, player, budget, self.config.use_cache);
                let child = board.with_action(action, player);
                let score = ctx.minimax(&child, depth - 1, -SCORE_INF, SCORE_INF, false);
                let (hits, misses) = ctx.cache.map_or((0, 0), |c| (c.hits, c.misses));
                (score, hits, misses)
            })
            .collect();

        let mut result = RootResult {
            best: None,
            complete: true,
        };
        for (&action, &(score, hits, misses)) in actions.iter().zip(&scored) {
            stats.cache_hits += hits;
            stats.cache_misses += misses;
            match score {
                Some(score) => result.offer(action, score),
                None => result.complete = false,
            }
        }
        result
    }
}

/// Search with the default heuristics and no budget
pub fn best_action(board: &Board, player: Player, game: &GameConfig, depth: u32) -> Option<Action> {
    AlphaBetaAI::new(depth, Heuristics::default()).best_action(board, player, game)
}

// ============================================================================
// MINIMAX WITH ALPHA-BETA
// ============================================================================

/// Best root action seen so far
struct RootResult {
    best: Option<(Action, i32)>,
    complete: bool,
}

impl RootResult {
    /// Strict comparison: the first action reaching the best score is kept
    fn offer(&mut self, action: Action, score: i32) {
        if self.best.map_or(true, |(_, best)| score > best) {
            self.best = Some((action, score));
        }
    }
}

/// State for one recursive search
struct Search<'a, E: Evaluator> {
    evaluator: &'a E,
    game: GameConfig,
    /// The player whose score is maximized
    player: Player,
    budget: &'a Budget,
    cache: Option<SearchCache>,
}

impl<'a, E: Evaluator> Search<'a, E> {
    fn new(evaluator: &'a E, game: GameConfig, player: Player, budget: &'a Budget, use_cache: bool) -> Self {
        Self {
            evaluator,
            game,
            player,
            budget,
            cache: use_cache.then(SearchCache::new),
        }
    }

    fn search_root(&mut self, board: &Board, actions: &[Action], depth: u32) -> RootResult {
        let mut result = RootResult {
            best: None,
            complete: true,
        };
        let mut alpha = -SCORE_INF;

        for &action in actions {
            let child = board.with_action(action, self.player);
            match self.minimax(&child, depth - 1, alpha, SCORE_INF, false) {
                Some(score) => {
                    result.offer(action, score);
                    alpha = alpha.max(score);
                }
                None => {
                    result.complete = false;
                    break;
                }
            }
        }
        result
    }

    /// Memoized node score; None when the budget ran out below this node
    fn minimax(&mut self, board: &Board, depth: u32, alpha: i32, beta: i32, maximizing: bool) -> Option<i32> {
        if !self.budget.tick() {
            return None;
        }

        let key = self.cache.is_some().then(|| CacheKey {
            board: board.clone(),
            depth,
            maximizing,
            player: self.player,
            config: self.game,
            alpha,
            beta,
        });

        if let (Some(cache), Some(key)) = (self.cache.as_mut(), key.as_ref()) {
            if let Some(score) = cache.get(key) {
                return Some(score);
            }
        }

        let score = self.expand(board, depth, alpha, beta, maximizing)?;

        if let (Some(cache), Some(key)) = (self.cache.as_mut(), key) {
            cache.insert(key, score);
        }
        Some(score)
    }

    fn expand(&mut self, board: &Board, depth: u32, mut alpha: i32, mut beta: i32, maximizing: bool) -> Option<i32> {
        let mover = if maximizing { self.player } else { self.player.opponent() };
        let actions = legal_actions(board, mover, &self.game);

        // Side to move is stuck and loses; sooner is more decisive
        if actions.is_empty() {
            let margin = WIN_VALUE + depth as i32;
            return Some(if maximizing { -margin } else { margin });
        }

        if depth == 0 {
            return Some(self.evaluator.evaluate(board, self.player, &self.game));
        }

        if maximizing {
            let mut best = -SCORE_INF;
            for action in actions {
                let child = board.with_action(action, mover);
                let score = self.minimax(&child, depth - 1, alpha, beta, false)?;
                best = best.max(score);
                alpha = alpha.max(best);
                if beta <= alpha {
                    break;
                }
            }
            Some(best)
        } else {
            let mut best = SCORE_INF;
            for action in actions {
                let child = board.with_action(action, mover);
                let score = self.minimax(&child, depth - 1, alpha, beta, true)?;
                best = best.min(score);
                beta = beta.min(best);
                if beta <= alpha {
                    break;
                }
            }
            Some(best)
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
