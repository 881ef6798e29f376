//! Immutable per-engine settings

use crate::engine::speed::{SpeedConfig, SpeedController};
use crate::error::{LifeError, Result};
use crate::game_of_life::factory::cell_count;
use crate::game_of_life::{NeighborStrategy, WorldFactory, WorldState, WORLD_SIZE_MIN};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

pub const WORLD_SIZE_DEFAULT: usize = 500;
pub const WRAP_EDGES_DEFAULT: bool = true;
/// Edge length of one cell on screen, in pixels
pub const CELL_SIZE: u32 = 5;

/// How the first generation is populated
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorldInit {
    #[default]
    Random,
    Empty,
    /// Hand-drawn worlds. Not implemented; selecting it is an error.
    Custom,
}

/// Shape and initialization of the world
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    pub rows: usize,
    pub cols: usize,
    pub init: WorldInit,
    pub wrap_edges: bool,
    pub min_size: usize,
    /// Seed for reproducible random worlds
    pub seed: Option<u64>,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            rows: WORLD_SIZE_DEFAULT,
            cols: WORLD_SIZE_DEFAULT,
            init: WorldInit::Random,
            wrap_edges: WRAP_EDGES_DEFAULT,
            min_size: WORLD_SIZE_MIN,
            seed: None,
        }
    }
}

/// Configuration owned by one engine for its whole life.
///
/// Nothing here changes after construction except the speed controller's
/// interval. To resize the world or switch edge handling, build a new
/// `Settings` and a new engine.
#[derive(Debug)]
pub struct Settings {
    world: WorldConfig,
    speed: SpeedController,
}

impl Settings {
    /// Settings with the default speed ladder and minimum world size
    pub fn new(rows: usize, cols: usize, init: WorldInit, wrap_edges: bool) -> Result<Self> {
        let world = WorldConfig {
            rows,
            cols,
            init,
            wrap_edges,
            ..WorldConfig::default()
        };
        Self::from_config(world, SpeedConfig::default())
    }

    /// Size a world to fill a display of `width_px` x `height_px`, one
    /// [`CELL_SIZE`] square per cell
    pub fn for_display(width_px: u32, height_px: u32, init: WorldInit, wrap_edges: bool) -> Result<Self> {
        let rows = (height_px / CELL_SIZE) as usize;
        let cols = (width_px / CELL_SIZE) as usize;
        Self::new(rows, cols, init, wrap_edges)
    }

    pub fn from_config(world: WorldConfig, speed: SpeedConfig) -> Result<Self> {
        cell_count(world.rows, world.cols)?;
        if world.min_size == 0 {
            return Err(LifeError::InvalidSettings(
                "minimum world size must be positive".to_string(),
            ));
        }
        if world.init == WorldInit::Custom {
            return Err(LifeError::UnsupportedInit(world.init));
        }

        Ok(Self {
            world,
            speed: SpeedController::new(speed)?,
        })
    }

    pub fn rows(&self) -> usize {
        self.world.rows
    }

    pub fn cols(&self) -> usize {
        self.world.cols
    }

    pub fn init(&self) -> WorldInit {
        self.world.init
    }

    pub fn wrap_edges(&self) -> bool {
        self.world.wrap_edges
    }

    pub fn min_size(&self) -> usize {
        self.world.min_size
    }

    pub fn world_config(&self) -> &WorldConfig {
        &self.world
    }

    pub fn neighbor_strategy(&self) -> NeighborStrategy {
        NeighborStrategy::from_wrap(self.world.wrap_edges)
    }

    /// The live speed controller; the engine reads its interval every tick
    pub fn speed(&self) -> &SpeedController {
        &self.speed
    }

    /// Advance the speed ladder. Takes effect from the next sleep of the run
    /// loop; a sleep already in progress keeps its original length.
    pub fn cycle_speed(&self) -> u32 {
        self.speed.cycle_speed()
    }

    /// Build the first generation according to [`WorldInit`]
    pub fn initial_world(&self) -> Result<WorldState> {
        let WorldConfig { rows, cols, .. } = self.world;
        match self.world.init {
            WorldInit::Random => match self.world.seed {
                Some(seed) => WorldFactory::random_with(rows, cols, &mut StdRng::seed_from_u64(seed)),
                None => WorldFactory::random(rows, cols),
            },
            WorldInit::Empty => WorldFactory::empty(rows, cols),
            WorldInit::Custom => WorldFactory::custom(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = WorldConfig::default();
        assert_eq!(config.rows, 500);
        assert_eq!(config.cols, 500);
        assert!(config.wrap_edges);
        assert_eq!(config.min_size, 10);
        assert_eq!(config.init, WorldInit::Random);
    }

    #[test]
    fn test_non_positive_dimensions_rejected() {
        assert!(matches!(
            Settings::new(0, 20, WorldInit::Empty, false),
            Err(LifeError::InvalidSettings(_))
        ));
        assert!(matches!(
            Settings::new(20, 0, WorldInit::Random, true),
            Err(LifeError::InvalidSettings(_))
        ));
    }

    #[test]
    fn test_oversized_dimensions_rejected() {
        // Positive on both edges, but the cell count overflows usize
        assert!(matches!(
            Settings::new(1 << 33, 1 << 33, WorldInit::Empty, true),
            Err(LifeError::InvalidSettings(_))
        ));
        assert!(matches!(
            Settings::new(usize::MAX, 3, WorldInit::Random, false),
            Err(LifeError::InvalidSettings(_))
        ));
    }

    #[test]
    fn test_custom_init_fails_at_construction() {
        assert!(matches!(
            Settings::new(20, 20, WorldInit::Custom, true),
            Err(LifeError::UnsupportedInit(WorldInit::Custom))
        ));
    }

    #[test]
    fn test_initial_world_matches_settings() {
        let settings = Settings::new(12, 30, WorldInit::Empty, false).unwrap();
        let world = settings.initial_world().unwrap();
        assert_eq!((world.rows(), world.cols()), (12, 30));
        assert!(world.is_dead());
        assert_eq!(settings.neighbor_strategy(), NeighborStrategy::Bounded);
    }

    #[test]
    fn test_seeded_initial_world() {
        let config = WorldConfig {
            rows: 15,
            cols: 15,
            seed: Some(42),
            ..WorldConfig::default()
        };
        let a = Settings::from_config(config.clone(), SpeedConfig::default()).unwrap();
        let b = Settings::from_config(config, SpeedConfig::default()).unwrap();
        assert_eq!(a.initial_world().unwrap(), b.initial_world().unwrap());
    }

    #[test]
    fn test_for_display() {
        let settings = Settings::for_display(1080, 1920, WorldInit::Empty, true).unwrap();
        assert_eq!(settings.rows(), 384);
        assert_eq!(settings.cols(), 216);
        assert_eq!(settings.neighbor_strategy(), NeighborStrategy::Toroidal);

        assert!(Settings::for_display(4, 100, WorldInit::Empty, true).is_err());
    }

    #[test]
    fn test_cycle_speed_through_settings() {
        let settings = Settings::new(10, 10, WorldInit::Empty, true).unwrap();
        assert_eq!(settings.speed().millis(), 512);
        assert_eq!(settings.cycle_speed(), 2);
        assert_eq!(settings.speed().millis(), 256);
    }

    #[test]
    fn test_invalid_speed_rejected() {
        let speed = SpeedConfig {
            max_millis: 100,
            min_millis: 8,
        };
        assert!(Settings::from_config(WorldConfig::default(), speed).is_err());
    }
}
