//! Engine runtime: the scheduler, speed ladder and subscriptions

pub mod observer;
pub mod runner;
pub mod speed;

pub use observer::{Callback, ObserverSlot};
pub use runner::{Engine, EngineState, Generation};
pub use speed::{SpeedConfig, SpeedController, MAX_STEP_MILLIS, MIN_STEP_MILLIS, STEP_FACTOR};
