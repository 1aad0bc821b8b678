//! Move ordering
//!
//! Ranks empty cells by the sum of all four two-distances. Cells that are
//! close to completing a connection for either side come first.

use crate::board::{Board, Cell};
use crate::distance::DistanceFields;

/// An empty cell with its ordering score (lower = more urgent)
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Candidate {
    pub cell: Cell,
    pub score: i32,
}

/// Every empty interior cell, most urgent first.
///
/// The sort is stable, so equal scores keep row-major order.
pub fn ordered_candidates(board: &Board) -> Vec<Candidate> {
    let fields = DistanceFields::compute(board);
    let mut candidates: Vec<Candidate> = board
        .empty_cells()
        .map(|cell| Candidate {
            cell,
            score: fields.total(board.index(cell)),
        })
        .collect();
    candidates.sort_by_key(|c| c.score);
    candidates
}
