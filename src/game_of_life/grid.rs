//! World state representation for the automaton

use crate::error::{LifeError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single cell. Stored as a small integer so multi-state rules could reuse
/// the same storage; any value above zero counts as alive.
pub type Cell = u8;

pub const DEAD: Cell = 0;
pub const ALIVE: Cell = 1;

/// Default liveness predicate
#[inline]
pub fn is_alive(cell: Cell) -> bool {
    cell > 0
}

/// One generation of the world: a rectangular matrix of cells, row-major.
///
/// A `WorldState` is never updated in place by the engine. Each tick builds
/// a new one, so a reader holding a generation never sees a partial update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorldState {
    rows: usize,
    cols: usize,
    cells: Vec<Cell>,
}

impl WorldState {
    /// Create an all-dead world. Either dimension may be zero; validation
    /// against the minimum size happens when the world is stepped.
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            cells: vec![DEAD; rows * cols],
        }
    }

    /// Build a world from a row-major vector of rows
    pub fn from_rows(rows: Vec<Vec<Cell>>) -> Result<Self> {
        let height = rows.len();
        let width = rows.first().map_or(0, Vec::len);

        for (i, row) in rows.iter().enumerate() {
            if row.len() != width {
                return Err(LifeError::RaggedRows {
                    row: i,
                    len: row.len(),
                    expected: width,
                });
            }
        }

        Ok(Self {
            rows: height,
            cols: width,
            cells: rows.into_iter().flatten().collect(),
        })
    }

    /// Wrap an already-flattened cell buffer
    pub(crate) fn from_flat(rows: usize, cols: usize, cells: Vec<Cell>) -> Self {
        debug_assert_eq!(cells.len(), rows * cols);
        Self { rows, cols, cells }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// True when the world has no cells at all
    pub fn is_empty(&self) -> bool {
        self.rows == 0 || self.cols == 0
    }

    #[inline]
    fn index(&self, row: usize, col: usize) -> usize {
        row * self.cols + col
    }

    /// Cell value at coordinates; out of range reads as dead
    pub fn get(&self, row: usize, col: usize) -> Cell {
        if row < self.rows && col < self.cols {
            self.cells[self.index(row, col)]
        } else {
            DEAD
        }
    }

    /// Set a cell value. Intended for seeding a world before it is handed
    /// to an engine.
    pub fn set(&mut self, row: usize, col: usize, value: Cell) -> Result<()> {
        if row >= self.rows || col >= self.cols {
            return Err(LifeError::OutOfBounds {
                row,
                col,
                rows: self.rows,
                cols: self.cols,
            });
        }
        let idx = self.index(row, col);
        self.cells[idx] = value;
        Ok(())
    }

    /// Iterate rows as slices
    pub fn iter_rows(&self) -> impl Iterator<Item = &[Cell]> {
        // chunks(0) panics, and an empty world has no rows to yield anyway
        self.cells.chunks(self.cols.max(1)).take(self.rows)
    }

    /// Copy out as nested rows
    pub fn to_rows(&self) -> Vec<Vec<Cell>> {
        self.iter_rows().map(<[Cell]>::to_vec).collect()
    }

    /// Coordinates of every living cell, in row-major order
    pub fn living_cells(&self) -> Vec<(usize, usize)> {
        let mut living = Vec::new();
        for row in 0..self.rows {
            for col in 0..self.cols {
                if is_alive(self.get(row, col)) {
                    living.push((row, col));
                }
            }
        }
        living
    }

    pub fn living_count(&self) -> usize {
        self.cells.iter().filter(|&&cell| is_alive(cell)).count()
    }

    /// True when no cell is alive
    pub fn is_dead(&self) -> bool {
        self.cells.iter().all(|&cell| !is_alive(cell))
    }
}

impl fmt::Display for WorldState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.iter_rows() {
            for &cell in row {
                let symbol = if is_alive(cell) { "⬛" } else { "⬜" };
                write!(f, "{}", symbol)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_world_creation() {
        let world = WorldState::new(3, 4);
        assert_eq!(world.rows(), 3);
        assert_eq!(world.cols(), 4);
        assert!(world.is_dead());
        assert!(!world.is_empty());
    }

    #[test]
    fn test_world_from_rows() {
        let rows = vec![
            vec![1, 0, 1],
            vec![0, 1, 0],
            vec![1, 0, 1],
        ];
        let world = WorldState::from_rows(rows.clone()).unwrap();
        assert_eq!(world.rows(), 3);
        assert_eq!(world.cols(), 3);
        assert_eq!(world.living_count(), 5);
        assert_eq!(world.to_rows(), rows);
    }

    #[test]
    fn test_ragged_rows_rejected() {
        let err = WorldState::from_rows(vec![vec![0, 0, 0], vec![0, 0]]).unwrap_err();
        assert!(matches!(
            err,
            LifeError::RaggedRows { row: 1, len: 2, expected: 3 }
        ));
    }

    #[test]
    fn test_liveness_is_any_positive_value() {
        assert!(!is_alive(0));
        assert!(is_alive(1));
        assert!(is_alive(7));

        let world = WorldState::from_rows(vec![vec![0, 2], vec![5, 0]]).unwrap();
        assert_eq!(world.living_cells(), vec![(0, 1), (1, 0)]);
    }

    #[test]
    fn test_set_and_get() {
        let mut world = WorldState::new(2, 2);
        world.set(1, 0, ALIVE).unwrap();
        assert_eq!(world.get(1, 0), ALIVE);
        assert_eq!(world.get(5, 5), DEAD);
        assert!(world.set(2, 0, ALIVE).is_err());
    }

    #[test]
    fn test_empty_world() {
        let world = WorldState::from_rows(Vec::new()).unwrap();
        assert!(world.is_empty());
        assert_eq!(world.iter_rows().count(), 0);
    }
}
