//! Integration tests for the HEXBEE engine
//!
//! Tests the full stack: board, evaluation, search, history and save/restore

use hexbee_core::{
    evaluate_detailed, BeeAI, Board, Cell, EngineConfig, EngineError, Point, SavedState, Stone,
    CONNECTED_POTENTIAL,
};
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use std::rc::Rc;
use std::time::Instant;

// ============================================================================
// TEST FIXTURES
// ============================================================================

fn config(grid: usize, depth: u32, beam: usize) -> EngineConfig {
    EngineConfig::new(grid).with_depth(depth).with_beam_width(beam)
}

/// Board with `stones` alternating stones on random cells, Red first
fn scattered_board(grid: usize, stones: usize, seed: u64) -> Board {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut board = Board::new(grid);
    let mut cells: Vec<Cell> = board.interior_cells().collect();
    cells.shuffle(&mut rng);
    for (i, cell) in cells.into_iter().take(stones).enumerate() {
        board.set(cell, if i % 2 == 0 { Stone::Red } else { Stone::Blue });
    }
    board
}

/// Play two engines against each other until the referee board has a winner
fn play_out(red: &mut BeeAI, blue: &mut BeeAI) -> (Board, Stone, usize) {
    let mut referee = Board::new(red.config().grid_size);
    let mut last: Option<Point> = None;
    let mut moves = 0;

    loop {
        if let Some(winner) = referee.winner() {
            return (referee, winner, moves);
        }
        let (engine, colour) = if moves % 2 == 0 {
            (&mut *red, Stone::Red)
        } else {
            (&mut *blue, Stone::Blue)
        };
        let point = engine.compute_move(last).unwrap().expect("engine must move");
        let cell = referee.to_cell(point).unwrap();
        assert!(referee.get(cell).is_empty(), "engine played an occupied cell");
        referee.set(cell, colour);
        assert_eq!(engine.board(), &referee);
        last = Some(point);
        moves += 1;
    }
}

// ============================================================================
// BOARD TESTS
// ============================================================================

#[test]
fn test_coordinate_mapping_round_trip() {
    let board = Board::new(5);
    for x in 0..5 {
        for y in 0..5 {
            let point = Point::new(x, y);
            let cell = board.to_cell(point).unwrap();
            assert!(board.is_interior(cell));
            assert_eq!(board.to_point(cell), Some(point));
        }
    }
    assert_eq!(board.to_cell(Point::new(5, 0)), None);
}

#[test]
fn test_connected_chain_potential() {
    let mut board = Board::new(4);
    for col in 1..=4 {
        board.set(Cell::new(2, col), Stone::Red);
    }
    assert_eq!(board.winner(), Some(Stone::Red));

    let eval = evaluate_detailed(&board);
    assert_eq!(eval.red.value, CONNECTED_POTENTIAL);
    assert!(eval.blue.value > eval.red.value);
    assert!(eval.score > 0);
}

// ============================================================================
// ENGINE TESTS
// ============================================================================

#[test]
fn test_first_move_is_center() {
    let mut ai = BeeAI::new(Stone::Red, config(3, 3, 5)).unwrap();
    assert_eq!(ai.compute_move(None).unwrap(), Some(Point::new(1, 1)));
    assert_eq!(ai.history_len(), 1);
}

#[test]
fn test_search_is_deterministic() {
    let board = scattered_board(5, 6, 42);
    let run = || {
        let mut ai = BeeAI::with_board(Stone::Blue, config(5, 3, 4), board.clone()).unwrap();
        let best = ai.best_cell();
        (best, ai.last_stats())
    };
    assert_eq!(run(), run());
}

#[test]
fn test_search_leaves_board_untouched() {
    for seed in 0..3 {
        let board = scattered_board(5, 7, seed);
        let mut ai = BeeAI::with_board(Stone::Red, config(5, 3, 4), board.clone()).unwrap();
        ai.best_cell();
        assert_eq!(ai.board(), &board);
    }
}

#[test]
fn test_repeated_search_hits_cache() {
    let board = scattered_board(4, 4, 9);
    let mut ai = BeeAI::with_board(Stone::Red, config(4, 3, 3), board).unwrap();

    let first = ai.best_cell();
    assert!(ai.last_stats().cache_hits < ai.last_stats().evaluations);
    let entries = ai.cache().borrow().len();

    let second = ai.best_cell();
    assert_eq!(first, second);
    assert_eq!(ai.last_stats().cache_hits, ai.last_stats().evaluations);
    assert_eq!(ai.cache().borrow().len(), entries);
}

#[test]
fn test_full_board_returns_no_move() {
    let mut board = Board::new(3);
    let cells: Vec<Cell> = board.interior_cells().collect();
    for (i, cell) in cells.into_iter().enumerate() {
        board.set(cell, if i % 2 == 0 { Stone::Red } else { Stone::Blue });
    }
    let mut ai = BeeAI::with_board(Stone::Blue, config(3, 2, 2), board).unwrap();
    assert_eq!(ai.compute_move(None).unwrap(), None);
}

#[test]
fn test_invalid_moves_are_rejected() {
    let mut ai = BeeAI::new(Stone::Blue, config(4, 2, 3)).unwrap();
    let reply = ai.compute_move(Some(Point::new(0, 0))).unwrap().unwrap();

    for point in [Point::new(0, 0), reply, Point::new(0, 9)] {
        assert!(matches!(
            ai.compute_move(Some(point)),
            Err(EngineError::InvalidMove { .. })
        ));
    }
    assert_eq!(ai.history_len(), 1);
}

// ============================================================================
// HISTORY TESTS
// ============================================================================

#[test]
fn test_undo_restores_every_step() {
    let mut ai = BeeAI::new(Stone::Red, config(5, 2, 3)).unwrap();
    let mut boards = vec![ai.board().clone()];

    ai.compute_move(None).unwrap();
    boards.push(ai.board().clone());
    for _ in 0..3 {
        let cell = ai.board().empty_cells().next().unwrap();
        let point = ai.board().to_point(cell).unwrap();
        ai.compute_move(Some(point)).unwrap();
        boards.push(ai.board().clone());
    }

    boards.pop();
    while let Some(expected) = boards.pop() {
        ai.undo();
        assert_eq!(ai.board(), &expected);
    }
    assert_eq!(ai.history_len(), 0);
}

#[test]
fn test_reset_keeps_history() {
    let mut ai = BeeAI::new(Stone::Red, config(4, 2, 3)).unwrap();
    ai.compute_move(None).unwrap();
    let cache = Rc::clone(ai.cache());

    ai.reset();
    assert!(ai.board().is_empty());
    assert!(!Rc::ptr_eq(ai.cache(), &cache));

    ai.undo();
    assert!(ai.board().is_empty());
    assert!(Rc::ptr_eq(ai.cache(), &cache));
}

#[test]
fn test_export_import_through_json() {
    let mut ai = BeeAI::new(Stone::Blue, config(5, 2, 3)).unwrap();
    ai.compute_move(Some(Point::new(2, 2))).unwrap();
    let before_last = ai.board().clone();
    let cell = before_last.empty_cells().next().unwrap();
    let last = before_last.to_point(cell);
    let reply = ai.compute_move(last).unwrap();

    let json = ai.export_state().to_json().unwrap();
    let saved = SavedState::from_json(&json).unwrap();
    assert_eq!(saved.history.len(), 2);

    // Loading rewinds to the state before the last saved request
    let mut restored = BeeAI::new(Stone::Blue, config(5, 2, 3)).unwrap();
    restored.import_state(saved).unwrap();
    assert_eq!(restored.board(), &before_last);
    assert_eq!(restored.history_len(), 1);

    // Re-issuing that request reproduces the saved game
    assert_eq!(restored.compute_move(last).unwrap(), reply);
    assert_eq!(restored.board(), ai.board());
}

// ============================================================================
// FULL GAME TESTS
// ============================================================================

#[test]
fn test_engines_play_to_a_winner() {
    let mut red = BeeAI::new(Stone::Red, config(4, 2, 4)).unwrap();
    let mut blue = BeeAI::new(Stone::Blue, config(4, 2, 4)).unwrap();

    let (board, winner, moves) = play_out(&mut red, &mut blue);
    assert_eq!(board.winner(), Some(winner));
    assert!(moves <= 16);
    println!("Winner {:?} after {} moves\n{}", winner, moves, board);
}

#[test]
fn test_search_performance() {
    let board = scattered_board(7, 6, 3);
    let start = Instant::now();
    let mut ai = BeeAI::with_board(Stone::Red, config(7, 3, 5), board).unwrap();
    assert!(ai.best_cell().is_some());
    let elapsed = start.elapsed();

    println!("Depth 3 search on 7x7: {:?}, {:?}", elapsed, ai.last_stats());
    assert!(elapsed.as_secs() < 60, "Depth 3 took too long");
}
