//! Transition rules mapping (liveness, neighbor count) to next liveness

use super::grid::{self, Cell};
use crate::error::LifeError;
use std::fmt;
use std::str::FromStr;

/// Maximum neighbor count in the Moore neighborhood
pub const MAX_NEIGHBORS: u8 = 8;

/// A transition rule for a binary automaton.
///
/// Rules are pure functions of the current cell and its neighbor count, so a
/// different rule can be dropped into a [`StepFunction`](super::StepFunction)
/// without touching neighbor counting or grid iteration.
pub trait RuleStrategy: Send + Sync {
    /// Whether a raw cell value counts as alive
    fn is_alive(&self, cell: Cell) -> bool {
        grid::is_alive(cell)
    }

    /// Next liveness for a cell that is currently `alive` with `neighbors` live neighbors
    fn apply_rule(&self, alive: bool, neighbors: u8) -> bool;
}

impl<R: RuleStrategy + ?Sized> RuleStrategy for Box<R> {
    fn is_alive(&self, cell: Cell) -> bool {
        (**self).is_alive(cell)
    }

    fn apply_rule(&self, alive: bool, neighbors: u8) -> bool {
        (**self).apply_rule(alive, neighbors)
    }
}

/// Conway's rules: survive on 2 or 3, birth on exactly 3 (B3/S23)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConwayRules;

impl ConwayRules {
    pub fn should_be_alive(current_state: bool, neighbor_count: u8) -> bool {
        matches!((current_state, neighbor_count), (true, 2) | (true, 3) | (false, 3))
    }

    /// Neighbor counts that turn a dead cell alive
    pub fn birth_neighbor_counts() -> Vec<u8> {
        vec![3]
    }

    /// Neighbor counts that keep a live cell alive
    pub fn survival_neighbor_counts() -> Vec<u8> {
        vec![2, 3]
    }
}

impl RuleStrategy for ConwayRules {
    fn apply_rule(&self, alive: bool, neighbors: u8) -> bool {
        Self::should_be_alive(alive, neighbors)
    }
}

/// Any outer-totalistic binary rule, written in `B<digits>/S<digits>` notation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LifeLikeRule {
    // bit n set means a count of n triggers birth / survival
    birth: u16,
    survival: u16,
}

impl LifeLikeRule {
    pub fn new(birth: &[u8], survival: &[u8]) -> Result<Self, LifeError> {
        Ok(Self {
            birth: Self::mask(birth)?,
            survival: Self::mask(survival)?,
        })
    }

    fn mask(counts: &[u8]) -> Result<u16, LifeError> {
        if let Some(&n) = counts.iter().find(|&&n| n > MAX_NEIGHBORS) {
            return Err(LifeError::InvalidSettings(format!(
                "neighbor count {} exceeds {}",
                n, MAX_NEIGHBORS
            )));
        }
        Ok(Self::bits(counts))
    }

    // Counts above MAX_NEIGHBORS can never occur and are ignored
    fn bits(counts: &[u8]) -> u16 {
        counts
            .iter()
            .filter(|&&n| n <= MAX_NEIGHBORS)
            .fold(0u16, |mask, &n| mask | 1u16 << n)
    }

    fn counts(mask: u16) -> impl Iterator<Item = u8> {
        (0..=MAX_NEIGHBORS).filter(move |&n| mask & (1u16 << n) != 0)
    }
}

impl Default for LifeLikeRule {
    fn default() -> Self {
        Self {
            birth: Self::bits(&ConwayRules::birth_neighbor_counts()),
            survival: Self::bits(&ConwayRules::survival_neighbor_counts()),
        }
    }
}

impl RuleStrategy for LifeLikeRule {
    fn apply_rule(&self, alive: bool, neighbors: u8) -> bool {
        let mask = if alive { self.survival } else { self.birth };
        neighbors <= MAX_NEIGHBORS && mask & (1u16 << neighbors) != 0
    }
}

impl FromStr for LifeLikeRule {
    type Err = LifeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || LifeError::InvalidSettings(format!("invalid rule notation '{}'", s));

        let (birth, survival) = s.trim().split_once('/').ok_or_else(invalid)?;
        let birth = birth.strip_prefix(['B', 'b']).ok_or_else(invalid)?;
        let survival = survival.strip_prefix(['S', 's']).ok_or_else(invalid)?;

        let digits = |part: &str| -> Result<Vec<u8>, LifeError> {
            part.chars()
                .map(|ch| ch.to_digit(10).map(|d| d as u8).ok_or_else(invalid))
                .collect()
        };

        Self::new(&digits(birth)?, &digits(survival)?)
    }
}

impl fmt::Display for LifeLikeRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "B")?;
        for n in Self::counts(self.birth) {
            write!(f, "{}", n)?;
        }
        write!(f, "/S")?;
        for n in Self::counts(self.survival) {
            write!(f, "{}", n)?;
        }
        Ok(())
    }
}
