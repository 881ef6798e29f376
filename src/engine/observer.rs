//! Single-slot subscription used for generation and speed notifications

use parking_lot::Mutex;
use std::sync::Arc;
use tracing::trace;

/// A registered callback. Shared so a publish can run it without holding the slot lock.
pub type Callback<T> = Arc<dyn Fn(&T) + Send + Sync>;

/// Holds at most one subscriber. Registering replaces the previous one.
///
/// The callback runs on whichever thread calls [`ObserverSlot::publish`], after
/// the slot lock has been released, so a subscriber may clear or replace
/// itself from inside its own callback.
pub struct ObserverSlot<T> {
    slot: Mutex<Option<Callback<T>>>,
}

impl<T> ObserverSlot<T> {
    pub fn new() -> Self {
        Self {
            slot: Mutex::new(None),
        }
    }

    /// Register `callback`, returning the one it displaced
    pub fn set(&self, callback: Callback<T>) -> Option<Callback<T>> {
        self.slot.lock().replace(callback)
    }

    /// Remove the subscriber. Returns whether one was registered.
    pub fn clear(&self) -> bool {
        self.slot.lock().take().is_some()
    }

    pub fn is_set(&self) -> bool {
        self.slot.lock().is_some()
    }

    /// Deliver `value` to the current subscriber, if any.
    /// Returns false when nobody was listening and the value was dropped.
    pub fn publish(&self, value: &T) -> bool {
        let callback = self.slot.lock().clone();
        match callback {
            Some(callback) => {
                callback(value);
                true
            }
            None => {
                trace!("no observer registered, dropping notification");
                false
            }
        }
    }
}

impl<T> Default for ObserverSlot<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> std::fmt::Debug for ObserverSlot<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObserverSlot")
            .field("registered", &self.is_set())
            .finish()
    }
}
