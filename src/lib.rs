//! Game of Life Engine
//!
//! A two-dimensional binary cellular automaton driven forward on a timed
//! background loop that a host can start, pause and retune.

pub mod config;
pub mod engine;
pub mod error;
pub mod game_of_life;
pub mod utils;

pub use config::{Settings, WorldInit};
pub use engine::{Engine, EngineState, Generation, SpeedController};
pub use error::{LifeError, Result};
pub use game_of_life::{NeighborStrategy, StepFunction, WorldFactory, WorldState};
