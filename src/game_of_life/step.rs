//! One-generation transition over a whole world

use super::grid::{WorldState, ALIVE, DEAD};
use super::neighbors::NeighborStrategy;
use super::rules::{ConwayRules, RuleStrategy};
use crate::error::{LifeError, Result};
use rayon::prelude::*;
use tracing::trace;

/// Smallest allowed world edge, in cells
pub const WORLD_SIZE_MIN: usize = 10;

/// Composes a neighbor strategy with a rule into a full-world transition.
///
/// Every output cell reads only the prior generation, so rows are evaluated
/// in parallel and the result does not depend on evaluation order.
#[derive(Debug, Clone)]
pub struct StepFunction<R = ConwayRules> {
    neighbors: NeighborStrategy,
    rule: R,
    min_size: usize,
}

impl StepFunction<ConwayRules> {
    pub fn conway(neighbors: NeighborStrategy) -> Self {
        Self::new(neighbors, ConwayRules)
    }
}

impl<R: RuleStrategy> StepFunction<R> {
    pub fn new(neighbors: NeighborStrategy, rule: R) -> Self {
        Self {
            neighbors,
            rule,
            min_size: WORLD_SIZE_MIN,
        }
    }

    /// Override the minimum edge length worlds are validated against
    pub fn with_min_size(mut self, min_size: usize) -> Self {
        self.min_size = min_size;
        self
    }

    pub fn neighbors(&self) -> NeighborStrategy {
        self.neighbors
    }

    pub fn rule(&self) -> &R {
        &self.rule
    }

    pub fn min_size(&self) -> usize {
        self.min_size
    }

    /// Check the world is non-empty and at least `min_size` on both edges
    pub fn validate(&self, world: &WorldState) -> Result<()> {
        if world.is_empty() || world.rows() < self.min_size || world.cols() < self.min_size {
            return Err(LifeError::InvalidWorldSize {
                rows: world.rows(),
                cols: world.cols(),
                min: self.min_size,
            });
        }
        Ok(())
    }

    /// Live-neighbor count for one cell under the configured edge policy
    pub fn count_neighbors(&self, world: &WorldState, row: usize, col: usize) -> u8 {
        self.neighbors
            .count_neighbors(world, row, col, |cell| self.rule.is_alive(cell))
    }

    /// Produce the next generation. The input is left untouched.
    pub fn step(&self, world: &WorldState) -> Result<WorldState> {
        self.validate(world)?;

        let rows = world.rows();
        let cols = world.cols();
        let mut cells = vec![DEAD; rows * cols];

        cells
            .par_chunks_mut(cols)
            .enumerate()
            .for_each(|(row, out)| {
                for (col, cell) in out.iter_mut().enumerate() {
                    let neighbors = self.count_neighbors(world, row, col);
                    let alive = self.rule.is_alive(world.get(row, col));
                    *cell = if self.rule.apply_rule(alive, neighbors) {
                        ALIVE
                    } else {
                        DEAD
                    };
                }
            });

        let next = WorldState::from_flat(rows, cols, cells);
        trace!(
            living_before = world.living_count(),
            living_after = next.living_count(),
            "stepped {}x{} world",
            rows,
            cols
        );
        Ok(next)
    }

    /// Step `generations` times in sequence
    pub fn step_n(&self, world: &WorldState, generations: usize) -> Result<WorldState> {
        let mut current = world.clone();
        for _ in 0..generations {
            current = self.step(&current)?;
        }
        Ok(current)
    }
}
