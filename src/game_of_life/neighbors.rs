//! Neighbor counting under the two edge policies

use super::grid::{Cell, WorldState};
use itertools::iproduct;
use serde::{Deserialize, Serialize};

/// How cells on the border of the world see beyond it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NeighborStrategy {
    /// Positions outside the world do not exist and are not counted
    Bounded,
    /// Opposite edges are adjacent; every cell has exactly 8 candidates
    Toroidal,
}

impl NeighborStrategy {
    pub fn from_wrap(wrap_edges: bool) -> Self {
        if wrap_edges {
            NeighborStrategy::Toroidal
        } else {
            NeighborStrategy::Bounded
        }
    }

    /// Count live cells in the Moore neighborhood of (`row`, `col`).
    /// The result is always in `0..=8`.
    pub fn count_neighbors<F>(&self, world: &WorldState, row: usize, col: usize, is_alive: F) -> u8
    where
        F: Fn(Cell) -> bool,
    {
        if world.is_empty() {
            return 0;
        }

        let rows = world.rows() as isize;
        let cols = world.cols() as isize;
        let mut count = 0;

        for (dr, dc) in iproduct!(-1isize..=1, -1isize..=1) {
            if dr == 0 && dc == 0 {
                continue;
            }

            let r = row as isize + dr;
            let c = col as isize + dc;

            let position = match self {
                NeighborStrategy::Bounded => {
                    if r < 0 || r >= rows || c < 0 || c >= cols {
                        continue;
                    }
                    (r as usize, c as usize)
                }
                NeighborStrategy::Toroidal => (r.rem_euclid(rows) as usize, c.rem_euclid(cols) as usize),
            };

            if is_alive(world.get(position.0, position.1)) {
                count += 1;
            }
        }

        count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game_of_life::grid::is_alive;

    fn filled(rows: usize, cols: usize) -> WorldState {
        WorldState::from_rows(vec![vec![1; cols]; rows]).unwrap()
    }

    #[test]
    fn test_bounded_counts() {
        let world = filled(3, 3);
        let bounded = NeighborStrategy::Bounded;

        assert_eq!(bounded.count_neighbors(&world, 1, 1, is_alive), 8);
        assert_eq!(bounded.count_neighbors(&world, 0, 0, is_alive), 3);
        assert_eq!(bounded.count_neighbors(&world, 0, 1, is_alive), 5);
        assert_eq!(bounded.count_neighbors(&world, 2, 2, is_alive), 3);
    }

    #[test]
    fn test_toroidal_full_count() {
        let world = filled(10, 12);
        let toroidal = NeighborStrategy::Toroidal;

        for row in 0..world.rows() {
            for col in 0..world.cols() {
                assert_eq!(toroidal.count_neighbors(&world, row, col, is_alive), 8);
            }
        }
    }

    #[test]
    fn test_toroidal_opposite_edges_adjacent() {
        let mut world = WorldState::new(10, 10);
        world.set(9, 9, 1).unwrap();

        assert_eq!(NeighborStrategy::Toroidal.count_neighbors(&world, 0, 0, is_alive), 1);
        assert_eq!(NeighborStrategy::Bounded.count_neighbors(&world, 0, 0, is_alive), 0);
    }

    #[test]
    fn test_cell_itself_not_counted() {
        let mut world = WorldState::new(10, 10);
        world.set(4, 4, 1).unwrap();
        assert_eq!(NeighborStrategy::Bounded.count_neighbors(&world, 4, 4, is_alive), 0);
        assert_eq!(NeighborStrategy::Toroidal.count_neighbors(&world, 4, 4, is_alive), 0);
    }

    #[test]
    fn test_custom_liveness_predicate() {
        let world = WorldState::from_rows(vec![vec![2, 1, 2], vec![1, 0, 1], vec![2, 1, 2]]).unwrap();
        let only_twos = |cell: Cell| cell == 2;
        assert_eq!(NeighborStrategy::Bounded.count_neighbors(&world, 1, 1, only_twos), 4);
    }

    #[test]
    fn test_from_wrap() {
        assert_eq!(NeighborStrategy::from_wrap(true), NeighborStrategy::Toroidal);
        assert_eq!(NeighborStrategy::from_wrap(false), NeighborStrategy::Bounded);
    }
}
