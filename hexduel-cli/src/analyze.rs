//! Analyze command - search the starting position once
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: build_search(), report_results()
//! - Level 4: formatting utilities

use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};

use hexduel_core::{
    legal_actions, render_board, AlphaBetaAI, Board, GameConfig, Heuristics, Player, SearchConfig,
    SearchOutcome,
};

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Side {
    First,
    Second,
}

impl From<Side> for Player {
    fn from(side: Side) -> Self {
        match side {
            Side::First => Player::First,
            Side::Second => Player::Second,
        }
    }
}

#[derive(Args)]
pub struct AnalyzeArgs {
    /// Game variant: dodo or gopher
    #[arg(long, default_value = "dodo")]
    pub game: String,

    /// Board radius (cells per side of the hexagon)
    #[arg(long, default_value = "4")]
    pub size: i64,

    /// Search depth in plies
    #[arg(long, default_value = "4")]
    pub depth: u32,

    /// Side to move
    #[arg(long, value_enum, default_value = "first")]
    pub player: Side,

    /// Disable memoization
    #[arg(long)]
    pub no_cache: bool,

    /// Search root actions in parallel
    #[arg(long)]
    pub parallel: bool,

    /// Node budget
    #[arg(long)]
    pub max_nodes: Option<u64>,

    /// Time budget in milliseconds
    #[arg(long)]
    pub time_limit_ms: Option<u64>,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

pub fn run(args: AnalyzeArgs) -> Result<()> {
    let game = GameConfig::parse(&args.game, args.size).context("Invalid game configuration")?;
    let board = Board::initial(&game);
    let player = Player::from(args.player);

    tracing::info!(
        "Analyzing {} opening for {:?} at depth {}",
        game.variant(),
        player,
        args.depth
    );

    let ai = build_search(&args);
    let started = Instant::now();
    let outcome = ai.search(&board, player, &game);
    let elapsed = started.elapsed();

    report_results(&args, &game, &board, player, &outcome, elapsed);

    Ok(())
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

fn build_search(args: &AnalyzeArgs) -> AlphaBetaAI {
    let config = SearchConfig {
        depth: args.depth,
        use_cache: !args.no_cache,
        parallel: args.parallel,
        max_nodes: args.max_nodes,
        time_limit_ms: args.time_limit_ms,
    };
    AlphaBetaAI::with_evaluator(config, Heuristics::default())
}

fn report_results(
    args: &AnalyzeArgs,
    game: &GameConfig,
    board: &Board,
    player: Player,
    outcome: &SearchOutcome,
    elapsed: Duration,
) {
    let legal = legal_actions(board, player, game).len();

    if args.json {
        let output = serde_json::json!({
            "game": game,
            "player": player,
            "legal_actions": legal,
            "action": outcome.action,
            "score": outcome.score,
            "stats": outcome.stats,
            "elapsed_ms": elapsed.as_millis() as u64,
        });
        println!("{}", output);
        return;
    }

    println!("{}", render_board(board, game.radius()));
    println!("=== Analysis ===");
    println!("Player:        {:?} ({} legal actions)", player, legal);
    match outcome.action {
        Some(action) => println!("Best action:   {}", action),
        None => println!("Best action:   none ({:?} loses)", player),
    }
    if let Some(score) = outcome.score {
        println!("Score:         {}", score);
    }
    println!("Depth reached: {}", outcome.stats.completed_depth);
    println!("Nodes:         {}", outcome.stats.nodes);
    println!(
        "Cache:         {} hits / {} misses",
        outcome.stats.cache_hits, outcome.stats.cache_misses
    );
    if outcome.stats.aborted {
        println!("Budget:        exhausted");
    }
    println!("Time:          {}", format_duration(elapsed));
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

fn format_duration(d: Duration) -> String {
    let ms = d.as_millis();
    if ms < 1000 {
        format!("{}ms", ms)
    } else {
        format!("{:.2}s", d.as_secs_f64())
    }
}
