//! Play command - one game between two agents
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: load_settings(), build_agents(), report_results()
//! - Level 3: build_agent()
//! - Level 4: formatting utilities

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};

use hexduel_core::{
    play_game, render_board, Agent, AlphaBetaAI, GameConfig, GameRecord, MatchSettings, RandomAgent,
};

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

/// Who picks the actions for one side
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum AgentKind {
    /// Minimax with alpha-beta pruning
    Ai,
    /// Uniformly random legal actions
    Random,
}

#[derive(Args)]
pub struct PlayArgs {
    /// Game variant: dodo or gopher
    #[arg(long, default_value = "dodo")]
    pub game: String,

    /// Board radius (cells per side of the hexagon)
    #[arg(long, default_value = "4")]
    pub size: i64,

    /// AI search depth in plies
    #[arg(long, default_value = "3")]
    pub depth: u32,

    /// Agent for the first player (Blue)
    #[arg(long, value_enum, default_value = "ai")]
    pub first: AgentKind,

    /// Agent for the second player (Red)
    #[arg(long, value_enum, default_value = "random")]
    pub second: AgentKind,

    /// Maximum plies before the game is abandoned
    #[arg(long)]
    pub max_plies: Option<u32>,

    /// JSON settings file (overrides --game, --size and --depth)
    #[arg(long, value_name = "FILE")]
    pub settings: Option<PathBuf>,

    /// Output the game record as JSON
    #[arg(long)]
    pub json: bool,

    /// Only print the final board
    #[arg(long)]
    pub quiet: bool,

    /// Seed for random agents (drawn at random if omitted)
    #[arg(long)]
    pub seed: Option<u64>,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run play command
///
/// 1. Resolve settings from flags or file
/// 2. Build both agents
/// 3. Play the game
/// 4. Report the result
pub fn run(args: PlayArgs) -> Result<()> {
    let settings = load_settings(&args)?;
    let seed = args.seed.unwrap_or_else(rand::random);

    tracing::info!(
        "Playing {} on radius {} (depth={}, seed={})",
        settings.game.variant(),
        settings.game.radius(),
        settings.search.depth,
        seed
    );

    let (mut first, mut second) = build_agents(&args, &settings, seed);
    let record = play_game(first.as_mut(), second.as_mut(), &settings.game, settings.max_plies)
        .context("Game aborted")?;

    report_results(&record, &args);

    Ok(())
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

/// Settings from file, or assembled from command-line flags
fn load_settings(args: &PlayArgs) -> Result<MatchSettings> {
    let mut settings = match &args.settings {
        Some(path) => MatchSettings::load(path)
            .with_context(|| format!("Failed to load settings: {}", path.display()))?,
        None => {
            let game = GameConfig::parse(&args.game, args.size).context("Invalid game configuration")?;
            let mut settings = MatchSettings::new(game);
            settings.search.depth = args.depth;
            settings
        }
    };

    if let Some(max_plies) = args.max_plies {
        settings.max_plies = max_plies;
    }

    Ok(settings)
}

fn build_agents(args: &PlayArgs, settings: &MatchSettings, seed: u64) -> (Box<dyn Agent>, Box<dyn Agent>) {
    (
        build_agent(args.first, settings, seed),
        build_agent(args.second, settings, seed.wrapping_add(1)),
    )
}

fn report_results(record: &GameRecord, args: &PlayArgs) {
    if args.json {
        print_json_record(record);
    } else {
        print_text_record(record, args.quiet);
    }
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

fn build_agent(kind: AgentKind, settings: &MatchSettings, seed: u64) -> Box<dyn Agent> {
    match kind {
        AgentKind::Ai => Box::new(AlphaBetaAI::with_evaluator(
            settings.search.clone(),
            settings.heuristics.clone(),
        )),
        AgentKind::Random => Box::new(RandomAgent::new(seed)),
    }
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

fn print_json_record(record: &GameRecord) {
    match serde_json::to_string_pretty(record) {
        Ok(json) => println!("{}", json),
        Err(e) => tracing::warn!("Failed to serialize game record: {}", e),
    }
}

/// Replay the record ply by ply, then print the outcome
fn print_text_record(record: &GameRecord, quiet: bool) {
    let radius = record.game.radius();

    if !quiet {
        let mut board = hexduel_core::Board::initial(&record.game);
        let mut player = hexduel_core::Player::First;
        println!("{}", render_board(&board, radius));
        for (ply, action) in record.actions.iter().enumerate() {
            board = board.with_action(*action, player);
            println!("Ply {} - {:?}: {}", ply + 1, player, action);
            println!("{}", render_board(&board, radius));
            player = player.opponent();
        }
    } else {
        println!("{}", render_board(&record.final_board, radius));
    }

    println!("=== Result ===");
    match record.winner() {
        Some(winner) => println!(
            "{:?} wins after {} plies ({:?} has no legal action)",
            winner,
            record.plies,
            winner.opponent()
        ),
        None => println!("No winner after {} plies (ply limit)", record.plies),
    }
}
