//! Game of Life core: world data, construction, neighbor counting, rules and stepping

pub mod factory;
pub mod grid;
pub mod neighbors;
pub mod rules;
pub mod step;

pub use factory::WorldFactory;
pub use grid::{is_alive, Cell, WorldState, ALIVE, DEAD};
pub use neighbors::NeighborStrategy;
pub use rules::{ConwayRules, LifeLikeRule, RuleStrategy};
pub use step::{StepFunction, WORLD_SIZE_MIN};
