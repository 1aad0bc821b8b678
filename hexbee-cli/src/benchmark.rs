//! Benchmark command - time move requests across search depths
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: run_depth_benchmarks(), report_results()
//! - Level 3: benchmark_depth()
//! - Level 4: timing utilities, formatting

use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Args;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use hexbee_core::{BeeAI, EngineConfig, Point, Stone};

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct BenchmarkArgs {
    /// Interior board size
    #[arg(long, default_value = "7")]
    pub size: usize,

    /// Maximum search depth to test
    #[arg(long, default_value = "3")]
    pub depth: u32,

    /// Beam width for every depth
    #[arg(long, default_value = "10")]
    pub beam: usize,

    /// Engine replies timed per depth
    #[arg(long, default_value = "6")]
    pub moves: usize,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

/// Results for one search depth
#[derive(Clone, Debug, serde::Serialize)]
struct DepthResult {
    depth: u32,
    beam_width: usize,
    moves: usize,
    #[serde(serialize_with = "serialize_millis")]
    total_time: Duration,
    #[serde(serialize_with = "serialize_millis")]
    avg_time_per_move: Duration,
    avg_nodes: f64,
    avg_evaluations: f64,
    cache_hit_rate: f64,
    cache_entries: usize,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run benchmark command
///
/// 1. Draw one sequence of opponent moves
/// 2. Replay it against an engine at each depth
/// 3. Report per-depth timings
pub fn run(args: BenchmarkArgs, seed: Option<u64>) -> Result<()> {
    tracing::info!(
        "Starting benchmarks: {}x{}, depth 1..={}, beam {}",
        args.size,
        args.size,
        args.depth,
        args.beam
    );

    let opponent_moves = draw_opponent_moves(args.size, seed);
    let results = run_depth_benchmarks(&args, &opponent_moves)?;

    report_results(&results, args.json);

    Ok(())
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

fn run_depth_benchmarks(args: &BenchmarkArgs, opponent_moves: &[Point]) -> Result<Vec<DepthResult>> {
    let mut results = Vec::new();
    for depth in 1..=args.depth {
        tracing::info!("Benchmarking depth {}...", depth);
        let config = EngineConfig::new(args.size)
            .with_depth(depth)
            .with_beam_width(args.beam);
        let result = benchmark_depth(config, opponent_moves, args.moves)
            .with_context(|| format!("Benchmark failed at depth {}", depth))?;
        results.push(result);
    }
    Ok(results)
}

fn report_results(results: &[DepthResult], json: bool) {
    if json {
        if let Ok(text) = serde_json::to_string_pretty(results) {
            println!("{}", text);
        }
        return;
    }

    println!("\n=== Benchmark Results ===");
    println!(
        "{:>5} {:>5} {:>6} {:>12} {:>12} {:>10} {:>9}",
        "depth", "beam", "moves", "avg ms/move", "avg nodes", "avg evals", "cache hit"
    );
    for r in results {
        println!(
            "{:>5} {:>5} {:>6} {:>12.2} {:>12.1} {:>10.1} {:>8.1}%",
            r.depth,
            r.beam_width,
            r.moves,
            as_millis(r.avg_time_per_move),
            r.avg_nodes,
            r.avg_evaluations,
            r.cache_hit_rate * 100.0
        );
    }
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

/// Blue engine answering a fixed list of Red moves.
/// Opponent moves landing on occupied cells are skipped.
fn benchmark_depth(config: EngineConfig, opponent_moves: &[Point], moves: usize) -> Result<DepthResult> {
    let beam_width = config.beam_width;
    let depth = config.depth;
    let mut ai = BeeAI::new(Stone::Blue, config)?;

    let mut timed = 0;
    let mut total_time = Duration::ZERO;
    let mut nodes = 0u64;
    let mut evaluations = 0u64;
    let mut hits = 0u64;

    for &point in opponent_moves {
        if timed == moves || ai.board().winner().is_some() {
            break;
        }
        let occupied = ai
            .board()
            .to_cell(point)
            .map_or(true, |cell| !ai.board().get(cell).is_empty());
        if occupied {
            continue;
        }

        let start = Instant::now();
        let reply = ai.compute_move(Some(point))?;
        total_time += start.elapsed();

        let stats = ai.last_stats();
        nodes += stats.nodes;
        evaluations += stats.evaluations;
        hits += stats.cache_hits;
        timed += 1;

        if reply.is_none() {
            break;
        }
    }

    let per_move = |n: u64| if timed > 0 { n as f64 / timed as f64 } else { 0.0 };
    let cache_entries = ai.cache().borrow().len();

    Ok(DepthResult {
        depth,
        beam_width,
        moves: timed,
        total_time,
        avg_time_per_move: if timed > 0 { total_time / timed as u32 } else { Duration::ZERO },
        avg_nodes: per_move(nodes),
        avg_evaluations: per_move(evaluations),
        cache_hit_rate: if evaluations > 0 { hits as f64 / evaluations as f64 } else { 0.0 },
        cache_entries,
    })
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

/// Every cell in a seeded random order
fn draw_opponent_moves(size: usize, seed: Option<u64>) -> Vec<Point> {
    let mut rng = match seed {
        Some(s) => ChaCha8Rng::seed_from_u64(s),
        None => ChaCha8Rng::from_entropy(),
    };
    let mut points: Vec<Point> = (0..size)
        .flat_map(|x| (0..size).map(move |y| Point::new(x, y)))
        .collect();
    points.shuffle(&mut rng);
    points
}

fn as_millis(duration: Duration) -> f64 {
    duration.as_secs_f64() * 1000.0
}

fn serialize_millis<S: serde::Serializer>(duration: &Duration, serializer: S) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_f64(as_millis(*duration))
}
