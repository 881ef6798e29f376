//! The engine: play/pause state machine and the timed run loop

use super::observer::{Callback, ObserverSlot};
use crate::config::Settings;
use crate::error::{LifeError, Result};
use crate::game_of_life::{ConwayRules, RuleStrategy, StepFunction, WorldState};
use parking_lot::{Condvar, Mutex, ReentrantMutex};
use std::sync::Arc;
use std::thread::{self, JoinHandle, ThreadId};
use std::time::Duration;
use tracing::{debug, error, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    Paused,
    Running,
}

/// One published generation. `index` is 0 for the initial world and grows by
/// one per tick.
#[derive(Debug, Clone)]
pub struct Generation {
    pub index: u64,
    pub world: Arc<WorldState>,
}

/// Drives a world forward on a background thread.
///
/// The engine starts [`Paused`](EngineState::Paused). [`toggle_play`](Engine::toggle_play)
/// starts a worker thread that repeatedly steps the world, publishes the new
/// generation to the registered observer, then sleeps for the current speed
/// interval. Pausing only sets a flag the loop checks before each iteration,
/// so after a pause request at most one more generation (the one in flight)
/// is published, and the worker exits once that iteration's sleep ends.
///
/// Dropping the engine pauses it and waits for the worker to exit.
pub struct Engine {
    shared: Arc<Shared>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

struct Shared {
    settings: Settings,
    step: StepFunction<Box<dyn RuleStrategy>>,
    control: Mutex<Control>,
    loop_exited: Condvar,
    current: Mutex<Generation>,
    // Held across "replace generation + publish" so observers see generations in order
    delivery: ReentrantMutex<()>,
    // Thread currently inside an observer callback, if any
    delivering: Mutex<Option<ThreadId>>,
    observer: ObserverSlot<Generation>,
    failure: Mutex<Option<LifeError>>,
}

/// Play/pause state plus whether a run loop is still between its checks.
/// Every transition happens under the one lock.
struct Control {
    state: EngineState,
    loop_active: bool,
}

impl Engine {
    /// Create a paused engine running Conway's rules
    pub fn new(settings: Settings) -> Result<Self> {
        Self::with_rule(settings, ConwayRules)
    }

    /// Create a paused engine with a custom transition rule
    pub fn with_rule<R>(settings: Settings, rule: R) -> Result<Self>
    where
        R: RuleStrategy + 'static,
    {
        let world = settings.initial_world()?;
        let rule: Box<dyn RuleStrategy> = Box::new(rule);
        let step = StepFunction::new(settings.neighbor_strategy(), rule).with_min_size(settings.min_size());

        info!(
            rows = settings.rows(),
            cols = settings.cols(),
            wrap_edges = settings.wrap_edges(),
            init = ?settings.init(),
            "engine created"
        );

        Ok(Self {
            shared: Arc::new(Shared {
                settings,
                step,
                control: Mutex::new(Control {
                    state: EngineState::Paused,
                    loop_active: false,
                }),
                loop_exited: Condvar::new(),
                current: Mutex::new(Generation {
                    index: 0,
                    world: Arc::new(world),
                }),
                delivery: ReentrantMutex::new(()),
                delivering: Mutex::new(None),
                observer: ObserverSlot::new(),
                failure: Mutex::new(None),
            }),
            worker: Mutex::new(None),
        })
    }

    pub fn settings(&self) -> &Settings {
        &self.shared.settings
    }

    pub fn state(&self) -> EngineState {
        self.shared.control.lock().state
    }

    /// The most recently published generation
    pub fn current(&self) -> Generation {
        self.shared.current.lock().clone()
    }

    pub fn world(&self) -> Arc<WorldState> {
        Arc::clone(&self.shared.current.lock().world)
    }

    pub fn generation(&self) -> u64 {
        self.shared.current.lock().index
    }

    /// Why the run loop stopped, if it stopped on an error
    pub fn failure(&self) -> Option<String> {
        self.shared.failure.lock().as_ref().map(ToString::to_string)
    }

    /// Whether a worker thread is still executing the run loop
    pub fn is_worker_active(&self) -> bool {
        let control = self.shared.control.lock();
        control.loop_active
            || self
                .worker
                .lock()
                .as_ref()
                .is_some_and(|handle| !handle.is_finished())
    }

    /// Flip between paused and running. Returns the new state.
    ///
    /// Calls are serialized on the engine's control lock. Resuming while the
    /// previous loop is still finishing its last iteration keeps that loop
    /// going instead of starting a second one. Resuming an engine whose loop
    /// failed returns [`LifeError::Halted`].
    pub fn toggle_play(&self) -> Result<EngineState> {
        let mut control = self.shared.control.lock();

        match (control.state, control.loop_active) {
            (EngineState::Running, _) => {
                control.state = EngineState::Paused;
                info!("engine state = Paused");
                return Ok(EngineState::Paused);
            }
            (EngineState::Paused, true) => {
                control.state = EngineState::Running;
                info!("engine state = Running");
                return Ok(EngineState::Running);
            }
            (EngineState::Paused, false) => {}
        }

        if let Some(err) = self.shared.failure.lock().as_ref() {
            return Err(LifeError::Halted {
                reason: err.to_string(),
            });
        }

        let mut worker = self.worker.lock();
        // The previous loop has already left; this join does not wait on it
        if let Some(handle) = worker.take() {
            reap(handle);
        }

        let shared = Arc::clone(&self.shared);
        let handle = thread::Builder::new()
            .name("life-engine".to_string())
            .spawn(move || shared.run_loop())?;

        // The new loop blocks on `control` until this returns
        *worker = Some(handle);
        control.state = EngineState::Running;
        control.loop_active = true;
        info!("engine state = Running");
        Ok(EngineState::Running)
    }

    /// Pause and block until the run loop has exited.
    ///
    /// Called from inside an observer callback (on the worker, or during the
    /// replay of [`set_observer`](Engine::set_observer)) this only requests
    /// the pause, since the loop may itself be waiting on that callback.
    pub fn stop(&self) {
        let handle = {
            let mut control = self.shared.control.lock();
            loop {
                if control.state == EngineState::Running {
                    control.state = EngineState::Paused;
                    info!("engine state = Paused");
                }
                if !control.loop_active {
                    break;
                }
                if self.shared.is_delivering_on_current_thread()
                    || self.worker.lock().as_ref().is_some_and(is_current_thread)
                {
                    return;
                }
                // Re-checked on timeout so a resume racing with stop is paused again
                self.shared.loop_exited.wait_for(&mut control, STOP_POLL);
            }
            // Taken under `control`: a resume after this point spawns and stores its own worker
            self.worker.lock().take()
        };

        if let Some(handle) = handle {
            reap(handle);
        }
    }

    /// Register the single generation observer, replacing any previous one.
    ///
    /// The new observer immediately receives the current generation, on the
    /// calling thread. Later generations arrive on the worker thread, in
    /// order, each publish returning before the next begins.
    pub fn set_observer<F>(&self, callback: F)
    where
        F: Fn(&Generation) + Send + Sync + 'static,
    {
        let _delivery = self.shared.delivery.lock();
        let callback: Callback<Generation> = Arc::new(callback);
        self.shared.observer.set(callback);

        let current = self.current();
        self.shared.publish(&current);
    }

    /// Remove the observer. Generations published while none is registered are dropped.
    pub fn clear_observer(&self) {
        if self.shared.observer.clear() {
            debug!("generation observer cleared");
        }
    }
}

impl Drop for Engine {
    fn drop(&mut self) {
        self.stop();
    }
}

const STOP_POLL: Duration = Duration::from_millis(10);

impl Shared {
    fn run_loop(&self) {
        let mut guard = ExitGuard {
            shared: self,
            armed: true,
        };

        loop {
            {
                // Deciding to exit and clearing `loop_active` happen under one
                // lock, so a resume either sees the loop active or gone.
                let mut control = self.control.lock();
                if control.state != EngineState::Running {
                    control.loop_active = false;
                    self.loop_exited.notify_all();
                    guard.armed = false;
                    break;
                }
            }

            if let Err(err) = self.tick() {
                error!(error = %err, "step failed, stopping run loop");
                *self.failure.lock() = Some(err);
                break;
            }

            // Not interruptible: a pause waits out the current interval
            thread::sleep(self.settings.speed().interval());
        }

        debug!("run loop exited");
    }

    fn tick(&self) -> Result<()> {
        // Only the worker replaces `current`, so computing outside the lock is safe
        let (index, world) = {
            let current = self.current.lock();
            (current.index, Arc::clone(&current.world))
        };
        let next = self.step.step(&world)?;

        let _delivery = self.delivery.lock();
        let generation = Generation {
            index: index + 1,
            world: Arc::new(next),
        };
        *self.current.lock() = generation.clone();
        self.publish(&generation);
        Ok(())
    }

    /// Run the observer with this thread marked as delivering. Callers hold `delivery`.
    fn publish(&self, generation: &Generation) {
        let _scope = DeliveryScope::enter(&self.delivering);
        self.observer.publish(generation);
    }

    fn is_delivering_on_current_thread(&self) -> bool {
        *self.delivering.lock() == Some(thread::current().id())
    }
}

/// Records the thread running an observer callback until dropped
struct DeliveryScope<'a> {
    owner: &'a Mutex<Option<ThreadId>>,
    // Set when a callback re-enters delivery on the same thread
    previous: Option<ThreadId>,
}

impl<'a> DeliveryScope<'a> {
    fn enter(owner: &'a Mutex<Option<ThreadId>>) -> Self {
        let previous = owner.lock().replace(thread::current().id());
        Self { owner, previous }
    }
}

impl Drop for DeliveryScope<'_> {
    fn drop(&mut self) {
        *self.owner.lock() = self.previous;
    }
}

/// Leaves the engine paused and the loop marked inactive when the worker
/// exits on a failed step or a panic
struct ExitGuard<'a> {
    shared: &'a Shared,
    armed: bool,
}

impl Drop for ExitGuard<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        if thread::panicking() {
            error!("run loop panicked");
        }
        let mut control = self.shared.control.lock();
        control.state = EngineState::Paused;
        control.loop_active = false;
        self.shared.loop_exited.notify_all();
    }
}

fn is_current_thread(handle: &JoinHandle<()>) -> bool {
    handle.thread().id() == thread::current().id()
}

fn reap(handle: JoinHandle<()>) {
    if is_current_thread(&handle) {
        return;
    }
    if handle.join().is_err() {
        warn!("engine worker exited with a panic");
    }
}
