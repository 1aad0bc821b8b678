//! Position evaluation
//!
//! Score = 100 * (blue potential - red potential) - (blue mobility - red mobility).
//! Positive favours Red, negative favours Blue.

use crate::board::{Board, PositionKey, Stone};
use crate::distance::{DistanceFields, UNREACHED};
use rustc_hash::FxHashMap;
use std::cell::RefCell;
use std::rc::Rc;

/// Weight of one potential step relative to one unit of mobility
const POTENTIAL_WEIGHT: i32 = 100;

/// Smallest potential a colour can have: one step from each seed corner
pub const CONNECTED_POTENTIAL: i32 = 2;

/// Best achievable two-distance sum for one colour
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Potential {
    /// Minimum over empty interior cells of the colour's two fields
    pub value: i32,
    /// Number of empty interior cells achieving `value`
    pub mobility: u32,
}

impl Potential {
    fn unreached() -> Self {
        Self {
            value: UNREACHED,
            mobility: 0,
        }
    }

    fn observe(&mut self, sum: i32) {
        if sum < self.value {
            self.value = sum;
            self.mobility = 1;
        } else if sum == self.value {
            self.mobility += 1;
        }
    }
}

/// Evaluation breakdown
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Evaluation {
    pub score: i32,
    pub red: Potential,
    pub blue: Potential,
}

/// Evaluate without touching any cache
pub fn evaluate_detailed(board: &Board) -> Evaluation {
    let fields = DistanceFields::compute(board);

    let mut red = Potential::unreached();
    let mut blue = Potential::unreached();
    for cell in board.empty_cells() {
        let index = board.index(cell);
        red.observe(fields.colour_sum(Stone::Red, index));
        blue.observe(fields.colour_sum(Stone::Blue, index));
    }

    let score = POTENTIAL_WEIGHT * (blue.value - red.value)
        - (blue.mobility as i32 - red.mobility as i32);

    Evaluation { score, red, blue }
}

/// Evaluate through the position cache
pub fn evaluate(board: &Board, cache: &mut PositionCache) -> i32 {
    let key = board.position_key();
    if let Some(score) = cache.get(&key) {
        return score;
    }
    let score = evaluate_detailed(board).score;
    cache.insert(key, score);
    score
}

// ============================================================================
// POSITION CACHE
// ============================================================================

/// Cache shared between the live engine and its history snapshots
pub type SharedCache = Rc<RefCell<PositionCache>>;

/// Scores of every position evaluated during one game.
///
/// Entries are never evicted; call `reset` on the engine between games.
#[derive(Debug, Default)]
pub struct PositionCache {
    entries: FxHashMap<PositionKey, i32>,
    hits: u64,
    misses: u64,
}

impl PositionCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared() -> SharedCache {
        Rc::new(RefCell::new(Self::new()))
    }

    pub fn get(&mut self, key: &PositionKey) -> Option<i32> {
        match self.entries.get(key) {
            Some(&score) => {
                self.hits += 1;
                Some(score)
            }
            None => {
                self.misses += 1;
                None
            }
        }
    }

    pub fn insert(&mut self, key: PositionKey, score: i32) {
        self.entries.insert(key, score);
    }

    pub fn contains(&self, key: &PositionKey) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn misses(&self) -> u64 {
        self.misses
    }
}
