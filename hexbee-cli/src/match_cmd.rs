//! Match command - play games between two engine configurations
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: load_configs(), play_match(), report_results()
//! - Level 3: play_single_game(), compute_match_statistics()
//! - Level 4: openings, formatting utilities

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Args;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use hexbee_core::{BeeAI, Board, Cell, EngineConfig, Point, Stone};

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct MatchArgs {
    /// Base engine config JSON file (grid size, depth, beam width)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Interior board size (overrides the config file)
    #[arg(long)]
    pub size: Option<usize>,

    /// Search depth of engine A
    #[arg(long)]
    pub depth_a: Option<u32>,

    /// Beam width of engine A
    #[arg(long)]
    pub beam_a: Option<usize>,

    /// Search depth of engine B
    #[arg(long)]
    pub depth_b: Option<u32>,

    /// Beam width of engine B
    #[arg(long)]
    pub beam_b: Option<usize>,

    /// Number of games to play (engines alternate colours)
    #[arg(long, default_value = "2")]
    pub games: usize,

    /// Random stones placed before the engines take over
    #[arg(long, default_value = "0")]
    pub opening: usize,

    /// Blue moves first instead of Red
    #[arg(long)]
    pub blue_first: bool,

    /// Print each final board
    #[arg(long)]
    pub show: bool,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

/// Engine configurations for both seats
#[derive(Clone, Debug)]
struct MatchConfigs {
    a: EngineConfig,
    b: EngineConfig,
}

/// Result of a single game
#[derive(Clone, Debug)]
struct GameRecord {
    game_number: usize,
    winner: Stone,
    /// "A" or "B"
    red_engine: &'static str,
    moves: Vec<Point>,
    final_board: Board,
}

impl GameRecord {
    fn winning_engine(&self) -> &'static str {
        match (self.winner, self.red_engine) {
            (Stone::Red, engine) => engine,
            (_, "A") => "B",
            _ => "A",
        }
    }
}

/// Aggregated match results
#[derive(Clone, Debug)]
struct MatchResults {
    games: Vec<GameRecord>,
    a_wins: usize,
    b_wins: usize,
    red_wins: usize,
    avg_moves: f32,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run match command
///
/// 1. Resolve both engine configurations
/// 2. Play the match (multiple games)
/// 3. Report results
pub fn run(args: MatchArgs, seed: Option<u64>) -> Result<()> {
    let configs = load_configs(&args)?;

    tracing::info!(
        "Starting match: A(depth={}, beam={}) vs B(depth={}, beam={}) on {}x{} ({} games)",
        configs.a.depth,
        configs.a.beam_width,
        configs.b.depth,
        configs.b.beam_width,
        configs.a.grid_size,
        configs.a.grid_size,
        args.games
    );

    let results = play_match(&configs, &args, seed)?;

    report_results(&results, &args);

    Ok(())
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

/// Base config from file or defaults, with per-engine overrides
fn load_configs(args: &MatchArgs) -> Result<MatchConfigs> {
    let mut base = match &args.config {
        Some(path) => EngineConfig::load(path)
            .with_context(|| format!("Failed to load engine config: {}", path.display()))?,
        None => EngineConfig::default(),
    };
    if let Some(size) = args.size {
        base.grid_size = size;
    }

    let mut a = base.clone();
    let mut b = base;
    if let Some(depth) = args.depth_a {
        a.depth = depth;
    }
    if let Some(beam) = args.beam_a {
        a.beam_width = beam;
    }
    if let Some(depth) = args.depth_b {
        b.depth = depth;
    }
    if let Some(beam) = args.beam_b {
        b.beam_width = beam;
    }

    a.validate().context("Invalid config for engine A")?;
    b.validate().context("Invalid config for engine B")?;
    if args.opening >= a.grid_size * a.grid_size {
        bail!("Opening of {} stones leaves no room to play", args.opening);
    }

    Ok(MatchConfigs { a, b })
}

/// Play all games in the match
fn play_match(configs: &MatchConfigs, args: &MatchArgs, seed: Option<u64>) -> Result<MatchResults> {
    let mut rng = create_rng(seed);
    let first = if args.blue_first { Stone::Blue } else { Stone::Red };
    let mut games = Vec::with_capacity(args.games);

    for game_num in 0..args.games {
        // Alternate colours for fairness
        let swap_colours = game_num % 2 == 1;
        let opening = random_opening(configs.a.grid_size, args.opening, first, &mut rng);

        let record = if swap_colours {
            play_single_game(&configs.b, &configs.a, "B", opening, first, game_num + 1)?
        } else {
            play_single_game(&configs.a, &configs.b, "A", opening, first, game_num + 1)?
        };

        tracing::info!(
            "Game {}: {:?} wins (engine {}) in {} moves",
            record.game_number,
            record.winner,
            record.winning_engine(),
            record.moves.len()
        );

        games.push(record);
    }

    Ok(compute_match_statistics(games))
}

/// Report match results
fn report_results(results: &MatchResults, args: &MatchArgs) {
    if args.json {
        print_json_results(results);
    } else {
        print_text_results(results, args.show);
    }
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

/// Play one game to completion.
///
/// Each engine only hears about the other's moves through `compute_move`;
/// the referee board is kept separately.
fn play_single_game(
    red_config: &EngineConfig,
    blue_config: &EngineConfig,
    red_engine: &'static str,
    opening: Board,
    first: Stone,
    game_number: usize,
) -> Result<GameRecord> {
    let mut red = BeeAI::with_board(Stone::Red, red_config.clone(), opening.clone())?;
    let mut blue = BeeAI::with_board(Stone::Blue, blue_config.clone(), opening.clone())?;

    let mut referee = opening;
    let mut moves = Vec::new();
    let mut last: Option<Point> = None;
    let mut mover = side_to_move(&referee, first);

    let winner = loop {
        if let Some(winner) = referee.winner() {
            break winner;
        }
        let engine = if mover == Stone::Red { &mut red } else { &mut blue };
        let Some(point) = engine.compute_move(last)? else {
            bail!("{:?} found no move on an undecided board", mover);
        };
        let cell = referee
            .to_cell(point)
            .with_context(|| format!("Engine returned off-board move {:?}", point))?;
        if !referee.get(cell).is_empty() {
            bail!("{:?} played on occupied cell {:?}", mover, point);
        }

        referee.set(cell, mover);
        moves.push(point);
        tracing::debug!("{:?} -> ({}, {})", mover, point.x, point.y);

        last = Some(point);
        mover = mover.opponent();
    };

    Ok(GameRecord {
        game_number,
        winner,
        red_engine,
        moves,
        final_board: referee,
    })
}

/// Compute aggregate statistics from game records
fn compute_match_statistics(games: Vec<GameRecord>) -> MatchResults {
    let a_wins = games.iter().filter(|g| g.winning_engine() == "A").count();
    let b_wins = games.len() - a_wins;
    let red_wins = games.iter().filter(|g| g.winner == Stone::Red).count();

    let total_moves: usize = games.iter().map(|g| g.moves.len()).sum();
    let avg_moves = if games.is_empty() {
        0.0
    } else {
        total_moves as f32 / games.len() as f32
    };

    MatchResults {
        games,
        a_wins,
        b_wins,
        red_wins,
        avg_moves,
    }
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

/// Create RNG from seed or random
fn create_rng(seed: Option<u64>) -> ChaCha8Rng {
    match seed {
        Some(s) => ChaCha8Rng::seed_from_u64(s),
        None => ChaCha8Rng::from_entropy(),
    }
}

/// Place `stones` random stones, alternating colours starting with `first`
fn random_opening(grid_size: usize, stones: usize, first: Stone, rng: &mut ChaCha8Rng) -> Board {
    let mut board = Board::new(grid_size);
    let mut cells: Vec<Cell> = board.interior_cells().collect();
    cells.shuffle(rng);

    let mut colour = first;
    for cell in cells.into_iter().take(stones) {
        board.set(cell, colour);
        colour = colour.opponent();
    }
    board
}

/// Whoever has placed fewer stones moves next; `first` breaks ties
fn side_to_move(board: &Board, first: Stone) -> Stone {
    let count = |stone: Stone| board.interior_cells().filter(|&c| board.get(c) == stone).count();
    let (own, other) = (count(first), count(first.opponent()));
    if own > other {
        first.opponent()
    } else {
        first
    }
}

/// Print results as JSON
fn print_json_results(results: &MatchResults) {
    #[derive(serde::Serialize)]
    struct JsonGame {
        game_number: usize,
        winner: Stone,
        red_engine: &'static str,
        moves: Vec<Point>,
    }

    #[derive(serde::Serialize)]
    struct JsonOutput {
        total_games: usize,
        a_wins: usize,
        b_wins: usize,
        red_wins: usize,
        avg_moves: f32,
        games: Vec<JsonGame>,
    }

    let output = JsonOutput {
        total_games: results.games.len(),
        a_wins: results.a_wins,
        b_wins: results.b_wins,
        red_wins: results.red_wins,
        avg_moves: results.avg_moves,
        games: results
            .games
            .iter()
            .map(|g| JsonGame {
                game_number: g.game_number,
                winner: g.winner,
                red_engine: g.red_engine,
                moves: g.moves.clone(),
            })
            .collect(),
    };

    if let Ok(json) = serde_json::to_string_pretty(&output) {
        println!("{}", json);
    }
}

/// Print results as text
fn print_text_results(results: &MatchResults, show_boards: bool) {
    let total = results.games.len();
    let pct = |n: usize| {
        if total > 0 {
            n as f32 / total as f32 * 100.0
        } else {
            0.0
        }
    };

    println!("\n=== Match Results ===");
    println!("Total games: {}", total);
    println!("Engine A:    {} ({:.1}%)", results.a_wins, pct(results.a_wins));
    println!("Engine B:    {} ({:.1}%)", results.b_wins, pct(results.b_wins));
    println!("Red wins:    {} ({:.1}%)", results.red_wins, pct(results.red_wins));
    println!("Avg moves:   {:.1}", results.avg_moves);

    println!("\nGame details:");
    for game in &results.games {
        println!(
            "  Game {}: {:?} (engine {}) in {} moves",
            game.game_number,
            game.winner,
            game.winning_engine(),
            game.moves.len()
        );
        if show_boards {
            println!("{}", game.final_board);
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
