//! Error types for the circuit engine.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, EngineError>;

/// Everything the engine can refuse to do. All fallible entry points return
/// these as values; nothing panics on malformed caller input.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EngineError {
    #[error("invalid gate: {0}")]
    InvalidGate(String),

    #[error("gate references wire {wire} but circuit width is {width}")]
    DimensionMismatch { wire: u32, width: u32 },

    #[error("computation refused: {0}")]
    InfeasibleComputation(String),

    #[error("selected gate index {index} out of range for {len} gates")]
    InvalidSelection { index: usize, len: usize },

    #[error("bad cycle notation: {0}")]
    BadCycleNotation(String),
}
