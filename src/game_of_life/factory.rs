//! Construction of initial worlds

use super::grid::{Cell, WorldState};
use crate::config::WorldInit;
use crate::error::{LifeError, Result};
use rand::Rng;

/// Entry points for building the first generation of a world
pub struct WorldFactory;

impl WorldFactory {
    /// An all-dead world of `rows` x `cols`
    pub fn empty(rows: usize, cols: usize) -> Result<WorldState> {
        cell_count(rows, cols)?;
        Ok(WorldState::new(rows, cols))
    }

    /// A world where every cell is independently dead or alive with equal odds
    pub fn random(rows: usize, cols: usize) -> Result<WorldState> {
        Self::random_with(rows, cols, &mut rand::thread_rng())
    }

    /// Same as [`WorldFactory::random`] but drawing from a caller-supplied
    /// generator, so a seeded rng reproduces the same world.
    pub fn random_with<R: Rng + ?Sized>(rows: usize, cols: usize, rng: &mut R) -> Result<WorldState> {
        let count = cell_count(rows, cols)?;
        let cells: Vec<Cell> = (0..count).map(|_| rng.gen_range(0..=1)).collect();
        Ok(WorldState::from_flat(rows, cols, cells))
    }

    /// Hand-drawn worlds have no implementation; this always fails
    pub fn custom() -> Result<WorldState> {
        Err(LifeError::UnsupportedInit(WorldInit::Custom))
    }
}

/// Number of cells in a `rows` x `cols` world, rejecting empty or unallocatable shapes
pub(crate) fn cell_count(rows: usize, cols: usize) -> Result<usize> {
    if rows == 0 || cols == 0 {
        return Err(LifeError::InvalidSettings(format!(
            "world dimensions must be positive, got {}x{}",
            rows, cols
        )));
    }
    rows.checked_mul(cols)
        .filter(|&count| count <= isize::MAX as usize)
        .ok_or_else(|| {
            LifeError::InvalidSettings(format!("world of {}x{} cells is too large", rows, cols))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_empty_world_is_dead() {
        let world = WorldFactory::empty(12, 15).unwrap();
        assert_eq!(world.rows(), 12);
        assert_eq!(world.cols(), 15);
        assert!(world.is_dead());
    }

    #[test]
    fn test_zero_dimensions_rejected() {
        assert!(matches!(
            WorldFactory::empty(0, 10),
            Err(LifeError::InvalidSettings(_))
        ));
        assert!(matches!(
            WorldFactory::random(10, 0),
            Err(LifeError::InvalidSettings(_))
        ));
    }

    #[test]
    fn test_oversized_dimensions_rejected() {
        assert!(matches!(
            WorldFactory::empty(1 << 33, 1 << 33),
            Err(LifeError::InvalidSettings(_))
        ));
        assert!(matches!(
            WorldFactory::random(usize::MAX, 2),
            Err(LifeError::InvalidSettings(_))
        ));
        assert_eq!(cell_count(12, 30).unwrap(), 360);
    }

    #[test]
    fn test_random_world_is_binary() {
        let world = WorldFactory::random(40, 40).unwrap();
        assert!(world.iter_rows().flatten().all(|&cell| cell <= 1));

        // 1600 fair coin flips landing all on one side is not a realistic outcome
        let living = world.living_count();
        assert!(living > 0 && living < 1600);
    }

    #[test]
    fn test_seeded_random_is_reproducible() {
        let a = WorldFactory::random_with(20, 20, &mut StdRng::seed_from_u64(7)).unwrap();
        let b = WorldFactory::random_with(20, 20, &mut StdRng::seed_from_u64(7)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_custom_fails_loudly() {
        assert!(matches!(
            WorldFactory::custom(),
            Err(LifeError::UnsupportedInit(WorldInit::Custom))
        ));
    }
}
