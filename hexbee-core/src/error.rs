//! Engine error types

/// Errors surfaced by the engine's public API
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid move ({x}, {y}): {reason}")]
    InvalidMove {
        x: usize,
        y: usize,
        reason: &'static str,
    },

    #[error("Corrupt saved state: {0}")]
    CorruptState(String),

    #[error("Saved state serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, EngineError>;
