use std::sync::{Mutex, MutexGuard};

#[derive(Debug, Default, Clone, Copy)]
struct CounterState {
    value: i64,
    increments: u64,
    decrements: u64,
}

/// Mutex-protected integer counter shared between simulation tasks.
///
/// Every operation holds the lock for the whole read-modify-write, and the
/// guard is dropped on every exit path. Besides the current value the
/// counter keeps how many increments and decrements it has seen, so
/// conservation (one release per reservation) can be checked after a run.
#[derive(Debug, Default)]
pub struct SafeCounter {
    state: Mutex<CounterState>,
}

impl SafeCounter {
    pub fn new() -> Self {
        Self::default()
    }

    // A panicking holder cannot leave the state half-written, so a poisoned
    // lock still guards a consistent value.
    fn lock(&self) -> MutexGuard<'_, CounterState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Increment and return the new value
    pub fn increment(&self) -> i64 {
        let mut state = self.lock();
        state.value += 1;
        state.increments += 1;
        state.value
    }

    /// Decrement and return the new value
    pub fn decrement(&self) -> i64 {
        let mut state = self.lock();
        state.value -= 1;
        state.decrements += 1;
        state.value
    }

    pub fn value(&self) -> i64 {
        self.lock().value
    }

    /// Number of increments applied since creation
    pub fn increments(&self) -> u64 {
        self.lock().increments
    }

    /// Number of decrements applied since creation
    pub fn decrements(&self) -> u64 {
        self.lock().decrements
    }
}
