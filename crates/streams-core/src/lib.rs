pub mod admin;
pub mod auth;
pub mod channels;
pub mod config;
pub mod delivery;
pub mod dms;
pub mod error;
pub mod messages;
pub mod notifications;
pub mod permissions;
pub mod scheduler;
pub mod search;
pub mod standup;
pub mod users;
pub mod validation;

use std::sync::Arc;

use anyhow::anyhow;
use argon2::{Algorithm, Argon2, Params, Version};
use tracing::info;

use streams_store::Store;

pub use config::Config;
pub use delivery::{LogSink, ResetCodeSink};
pub use error::{Error, Result};
pub use scheduler::Scheduler;

/// The messaging engine. Every operation takes the caller's session token
/// first, resolves it against the store, and then runs its permission checks
/// and mutation under one store lock.
pub struct Streams {
    store: Arc<Store>,
    scheduler: Scheduler,
    config: Config,
    hasher: Argon2<'static>,
    reset_sink: Arc<dyn ResetCodeSink>,
}

impl Streams {
    pub fn new(config: Config) -> Result<Self> {
        let params = Params::new(
            config.hash_memory_kib,
            config.hash_iterations,
            Params::DEFAULT_P_COST,
            None,
        )
        .map_err(|e| Error::Internal(anyhow!("invalid password hashing parameters: {}", e)))?;

        Ok(Self {
            store: Arc::new(Store::new()),
            scheduler: Scheduler::new(),
            config,
            hasher: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
            reset_sink: Arc::new(LogSink),
        })
    }

    /// Route password reset codes somewhere other than the log.
    pub fn with_reset_sink(mut self, sink: Arc<dyn ResetCodeSink>) -> Self {
        self.reset_sink = sink;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Deferred deliveries and standups that have not fired yet.
    pub fn scheduled_jobs(&self) -> usize {
        self.scheduler.pending()
    }

    /// Reset all state: sessions, users, containers, messages, pending jobs.
    /// Ids restart from their first value.
    pub fn clear(&self) -> Result<()> {
        self.scheduler.cancel_all()?;
        self.store.with_state_mut(|state| {
            state.reset();
            Ok::<_, Error>(())
        })
    }

    /// Cancel pending deferred work and wait for it to wind down.
    pub async fn shutdown(&self) -> Result<()> {
        info!("Shutting down scheduler ({} pending jobs)", self.scheduler.pending());
        self.scheduler.shutdown().await
    }
}
