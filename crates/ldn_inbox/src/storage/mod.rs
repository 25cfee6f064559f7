//! Notification storage backends.
//!
//! The protocol engine only talks to [`NotificationStore`]; the concrete
//! backend is chosen once at startup by [`open_store`].

mod memory;
mod registry;

pub use memory::MemoryStore;
pub use registry::{RegistryStore, SyncMonitor, SyncSnapshot};

use std::sync::Arc;

use async_trait::async_trait;
use ldn_graph::RdfFormat;
use serde::Serialize;

use crate::config::{InboxConfig, StorageMode};
use crate::error::Result;
use crate::inbox::InboxResource;
use crate::registry::RegistryClient;

/// A notification that has just been stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedNotification {
    pub id: String,
    /// The IRI the notification can be fetched under.
    pub iri: String,
}

/// Health report of a storage backend.
#[derive(Debug, Clone, Serialize)]
pub struct StoreHealth {
    pub backend: &'static str,
    /// Number of stored notifications, when the backend knows it locally.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notifications: Option<usize>,
    /// Registry synchronization counters, for registry-backed stores.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registry_sync: Option<SyncSnapshot>,
}

/// Storage for the inbox graph and the notifications it contains.
#[async_trait]
pub trait NotificationStore: Send + Sync {
    /// Parses and stores a notification payload, linking it from the inbox.
    ///
    /// Returns [`Error::IdCollision`](crate::Error::IdCollision) if the
    /// generated identifier is already taken; callers may retry.
    async fn create_notification(
        &self,
        payload: &[u8],
        format: RdfFormat,
    ) -> Result<CreatedNotification>;

    /// Serializes the inbox graph.
    async fn fetch_inbox(&self, format: RdfFormat) -> Result<String>;

    /// Serializes the graph of notification `id`.
    async fn fetch_notification(&self, id: &str, format: RdfFormat) -> Result<String>;

    /// Short name of the backend, e.g. `"mem"`.
    fn backend_name(&self) -> &'static str;

    async fn health(&self) -> StoreHealth;
}

/// Opens the storage backend selected by `config.storage`.
pub fn open_store(
    config: &InboxConfig,
    inbox: &InboxResource,
) -> Result<Arc<dyn NotificationStore>> {
    match config.storage {
        StorageMode::Memory => Ok(Arc::new(MemoryStore::new(inbox.clone()))),
        StorageMode::Registry => {
            let registry = config.registry_or_default();
            let client = RegistryClient::new(&registry)?;
            let org_name = registry.org_name.clone().unwrap_or_default();
            Ok(Arc::new(RegistryStore::new(
                InboxResource::new(registry.inbox_iri.as_str()),
                client,
                org_name,
            )))
        }
    }
}
