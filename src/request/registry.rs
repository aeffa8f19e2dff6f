use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use dashmap::DashMap;

use super::machine::{FormEvent, FormMachine, TransitionError};

/// Live form-component instances, one per user id.
pub struct FormRegistry {
    /// user id -> (instance, last touched)
    forms: DashMap<String, (FormMachine, Instant)>,
    generations: AtomicU64,
}

impl FormRegistry {
    pub fn new() -> Self {
        Self {
            forms: DashMap::new(),
            generations: AtomicU64::new(1),
        }
    }

    fn mount(&self) -> FormMachine {
        FormMachine::mounted(self.generations.fetch_add(1, Ordering::Relaxed))
    }

    /// Replace the user's instance with a fresh one.
    pub fn remount(&self, user_id: &str) -> FormMachine {
        let fresh = self.mount();
        self.forms
            .insert(user_id.to_string(), (fresh.clone(), Instant::now()));
        fresh
    }

    /// Current state of the user's instance, mounting one if needed.
    pub fn snapshot(&self, user_id: &str) -> FormMachine {
        let mut entry = self
            .forms
            .entry(user_id.to_string())
            .or_insert_with(|| (self.mount(), Instant::now()));
        let (machine, touched) = entry.value_mut();
        *touched = Instant::now();
        machine.clone()
    }

    /// Apply an event under the entry lock and return the resulting state.
    /// The lock is released on return, so callers may await afterwards.
    pub fn apply(&self, user_id: &str, event: FormEvent) -> Result<FormMachine, TransitionError> {
        let mut entry = self
            .forms
            .entry(user_id.to_string())
            .or_insert_with(|| (self.mount(), Instant::now()));
        let (machine, touched) = entry.value_mut();
        *touched = Instant::now();
        machine.apply(event)?;
        Ok(machine.clone())
    }

    /// Deliver a submission result. Unlike `apply` this never mounts an
    /// instance: a result for a user with no live form is refused.
    pub fn settle(&self, user_id: &str, event: FormEvent) -> Result<FormMachine, TransitionError> {
        let Some(mut entry) = self.forms.get_mut(user_id) else {
            return Err(TransitionError::Remounted);
        };
        let (machine, touched) = entry.value_mut();
        *touched = Instant::now();
        machine.apply(event)?;
        Ok(machine.clone())
    }

    /// Drop instances idle for longer than `max_age`. Busy ones are kept
    /// until their result lands.
    pub fn cleanup(&self, max_age: Duration) {
        let now = Instant::now();
        self.forms
            .retain(|_, (machine, touched)| machine.busy || now.duration_since(*touched) < max_age);
    }

    pub fn len(&self) -> usize {
        self.forms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forms.is_empty()
    }
}

impl Default for FormRegistry {
    fn default() -> Self {
        Self::new()
    }
}
