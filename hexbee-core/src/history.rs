//! Move history and save/restore
//!
//! Each move request pushes a deep copy of the board together with the cache
//! handle in use at the time. The cache itself is shared, not copied.

use crate::board::{Board, Stone};
use crate::error::{EngineError, Result};
use crate::eval::SharedCache;
use serde::{Deserialize, Serialize};
use std::rc::Rc;

/// Current save format version
pub const SAVE_VERSION: u32 = 1;

/// State before one committed move
#[derive(Clone, Debug)]
pub struct HistoryEntry {
    board: Board,
    cache: SharedCache,
}

impl HistoryEntry {
    pub fn new(board: Board, cache: SharedCache) -> Self {
        Self { board, cache }
    }

    /// Deep-copy the board, share the cache
    pub fn capture(board: &Board, cache: &SharedCache) -> Self {
        Self::new(board.clone(), Rc::clone(cache))
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn cache(&self) -> &SharedCache {
        &self.cache
    }

    pub fn into_parts(self) -> (Board, SharedCache) {
        (self.board, self.cache)
    }
}

/// Serializable history stack, oldest entry first.
///
/// Boards are stored as row-major stone codes over the padded array. Caches
/// are not saved; they only affect speed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedState {
    pub version: u32,
    pub colour: Stone,
    pub grid_size: usize,
    pub history: Vec<Vec<u8>>,
}

impl SavedState {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Decode the history boards, oldest first
    pub(crate) fn decode(&self, grid_size: usize) -> Result<Vec<Board>> {
        if self.version != SAVE_VERSION {
            return Err(EngineError::CorruptState(format!(
                "unsupported save version {}",
                self.version
            )));
        }
        if self.grid_size != grid_size {
            return Err(EngineError::CorruptState(format!(
                "saved grid size {} does not match engine grid size {}",
                self.grid_size, grid_size
            )));
        }

        self.history
            .iter()
            .map(|codes| Board::from_codes(grid_size, codes))
            .collect()
    }
}
