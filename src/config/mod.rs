//! Configuration: runtime engine settings and the YAML file they are loaded from

pub mod file;
pub mod settings;

pub use file::{CliOverrides, ConfigFile};
pub use settings::{Settings, WorldConfig, WorldInit, CELL_SIZE, WORLD_SIZE_DEFAULT, WRAP_EDGES_DEFAULT};
