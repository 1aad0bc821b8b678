//! HEXBEE Core - Hex move-selection engine
//!
//! This crate provides the search-and-evaluation engine for the game of Hex:
//! - Board geometry (padded rhombus with sentinel borders)
//! - Connectivity graph with same-colour chain ("bridge") adjacency
//! - Two-distance propagation toward each colour's target edges
//! - Position evaluation with potential/mobility and a position cache
//! - Move ordering and beam-limited adversarial search
//! - Move history with undo and save/restore

pub mod board;
pub mod connectivity;
pub mod distance;
pub mod eval;
pub mod ordering;
pub mod ai;
pub mod history;
pub mod config;
pub mod error;

// Re-exports for convenient access
pub use board::{Board, Cell, Point, PositionKey, Stone, DIRECTIONS};
pub use connectivity::Connectivity;
pub use distance::{DistanceField, DistanceFields, Field, UNREACHED};
pub use eval::{
    evaluate, evaluate_detailed, Evaluation, PositionCache, Potential, SharedCache,
    CONNECTED_POTENTIAL,
};
pub use ordering::{ordered_candidates, Candidate};
pub use ai::{BeeAI, SearchStats};
pub use history::{HistoryEntry, SavedState};
pub use config::EngineConfig;
pub use error::EngineError;
