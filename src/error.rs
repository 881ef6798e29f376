//! Error types for world construction, stepping and the run loop

use crate::config::WorldInit;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, LifeError>;

#[derive(Error, Debug)]
pub enum LifeError {
    #[error("world size must be at least {min} in both dimensions, is [{rows}, {cols}]")]
    InvalidWorldSize { rows: usize, cols: usize, min: usize },

    #[error("world initialization '{0:?}' is not implemented")]
    UnsupportedInit(WorldInit),

    #[error("invalid settings: {0}")]
    InvalidSettings(String),

    #[error("row {row} has length {len}, expected {expected}")]
    RaggedRows { row: usize, len: usize, expected: usize },

    #[error("coordinates ({row}, {col}) out of bounds for {rows}x{cols} world")]
    OutOfBounds { row: usize, col: usize, rows: usize, cols: usize },

    #[error("engine halted after a failed step: {reason}")]
    Halted { reason: String },

    #[error("failed to spawn engine worker: {0}")]
    WorkerSpawn(#[from] std::io::Error),
}
