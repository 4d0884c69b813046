pub mod models;
pub mod queries;
pub mod state;

use std::sync::Mutex;

use thiserror::Error;
use tracing::info;

pub use state::State;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store lock poisoned: {0}")]
    Poisoned(String),
}

/// Process-wide state behind a single lock. Every operation runs inside one
/// `with_state`/`with_state_mut` call so its effect is atomic.
pub struct Store {
    state: Mutex<State>,
}

impl Store {
    pub fn new() -> Self {
        info!("In-memory store initialised");
        Self {
            state: Mutex::new(State::new()),
        }
    }

    pub fn with_state<F, T, E>(&self, f: F) -> Result<T, E>
    where
        F: FnOnce(&State) -> Result<T, E>,
        E: From<StoreError>,
    {
        let state = self
            .state
            .lock()
            .map_err(|e| StoreError::Poisoned(e.to_string()))?;
        f(&state)
    }

    pub fn with_state_mut<F, T, E>(&self, f: F) -> Result<T, E>
    where
        F: FnOnce(&mut State) -> Result<T, E>,
        E: From<StoreError>,
    {
        let mut state = self
            .state
            .lock()
            .map_err(|e| StoreError::Poisoned(e.to_string()))?;
        f(&mut state)
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}
