//! The shared application state for the inbox server.

use std::sync::Arc;

use crate::config::InboxConfig;
use crate::engine::InboxEngine;
use crate::error::Result;
use crate::inbox::InboxResource;
use crate::storage::{open_store, NotificationStore};

/// The state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    /// The protocol engine, which owns the storage backend.
    pub engine: Arc<InboxEngine>,
    /// The effective configuration.
    pub config: Arc<InboxConfig>,
}

impl AppState {
    /// Builds the state for `config`, opening the configured storage backend.
    pub fn new(config: InboxConfig) -> Result<Self> {
        let inbox = InboxResource::new(config.inbox_iri());
        let store = open_store(&config, &inbox)?;
        Ok(Self::with_store(config, store))
    }

    /// Builds the state around an already opened storage backend.
    pub fn with_store(config: InboxConfig, store: Arc<dyn NotificationStore>) -> Self {
        let inbox = InboxResource::new(config.inbox_iri());
        let engine = InboxEngine::new(inbox, store).with_status_policy(config.status_policy());
        Self {
            engine: Arc::new(engine),
            config: Arc::new(config),
        }
    }
}
