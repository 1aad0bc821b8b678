//! Engine configuration
//!
//! Search parameters are fixed when the engine is constructed.

use crate::error::{EngineError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default interior side length
pub const DEFAULT_GRID_SIZE: usize = 7;
/// Default search depth (plies, counting the root move)
pub const DEFAULT_DEPTH: u32 = 3;
/// Default number of ordered candidates expanded per node
pub const DEFAULT_BEAM_WIDTH: usize = 10;

/// Engine configuration
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Interior side length of the board
    pub grid_size: usize,
    /// Depth at which the search stops and evaluates
    pub depth: u32,
    /// Maximum children expanded at each interior node
    pub beam_width: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            grid_size: DEFAULT_GRID_SIZE,
            depth: DEFAULT_DEPTH,
            beam_width: DEFAULT_BEAM_WIDTH,
        }
    }
}

impl EngineConfig {
    /// Config for a given board size with default search parameters
    pub fn new(grid_size: usize) -> Self {
        Self {
            grid_size,
            ..Default::default()
        }
    }

    /// Set search depth
    pub fn with_depth(mut self, depth: u32) -> Self {
        self.depth = depth;
        self
    }

    /// Set beam width
    pub fn with_beam_width(mut self, beam_width: usize) -> Self {
        self.beam_width = beam_width;
        self
    }

    /// Reject parameters the engine cannot run with.
    ///
    /// A beam width of zero is allowed: every interior node then falls back
    /// to a static evaluation.
    pub fn validate(&self) -> Result<()> {
        if self.grid_size == 0 {
            return Err(EngineError::InvalidConfig("grid_size must be at least 1".into()));
        }
        if self.depth == 0 {
            return Err(EngineError::InvalidConfig("depth must be at least 1".into()));
        }
        Ok(())
    }

    /// Load from a JSON file
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: EngineConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }
}
