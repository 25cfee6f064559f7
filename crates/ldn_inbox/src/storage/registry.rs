//! Notification storage proxied to a remote ontology registry.
//!
//! Accepting a notification runs three remote steps after the local
//! bookkeeping:
//! 1. fetch the registry's copy of the inbox graph,
//! 2. merge it with the local inbox graph and PUT the result back,
//! 3. POST the raw notification as a new registry entry.
//!
//! Remote failures are logged and recorded in the [`SyncMonitor`]; they never
//! fail the client-visible create.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use ldn_graph::{Graph, RdfFormat};
use serde::Serialize;
use tokio::sync::{Mutex, RwLock};
use tracing::{error, info, warn};

use super::{CreatedNotification, NotificationStore, StoreHealth};
use crate::error::{Error, Result};
use crate::inbox::{InboxResource, NotificationId};
use crate::negotiate::simplify;
use crate::registry::{RegisterOntology, RegistryClient, UpdateOntology};

/// Registry synchronization counters.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct SyncSnapshot {
    pub attempts: u64,
    pub failures: u64,
    pub last_error: Option<String>,
    pub last_success: Option<DateTime<Utc>>,
    pub last_failure: Option<DateTime<Utc>>,
}

/// Tracks remote write outcomes so registry drift is observable.
#[derive(Debug, Default)]
pub struct SyncMonitor {
    inner: RwLock<SyncSnapshot>,
}

impl SyncMonitor {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn record_success(&self) {
        let mut inner = self.inner.write().await;
        inner.attempts += 1;
        inner.last_success = Some(Utc::now());
    }

    pub async fn record_failure(&self, step: &str, err: &Error) {
        let mut inner = self.inner.write().await;
        inner.attempts += 1;
        inner.failures += 1;
        inner.last_error = Some(format!("{}: {}", step, err));
        inner.last_failure = Some(Utc::now());
    }

    pub async fn snapshot(&self) -> SyncSnapshot {
        self.inner.read().await.clone()
    }
}

/// Stores notifications in an ontology registry.
///
/// The local process only keeps its own view of the inbox graph, which is
/// merged into the registry's copy on every write.
pub struct RegistryStore {
    inbox: InboxResource,
    client: RegistryClient,
    org_name: String,
    inbox_graph: RwLock<Graph>,
    /// Held across fetch, merge and PUT so concurrent creates cannot publish
    /// a registry inbox that misses each other's `ldp:contains` triple.
    publish: Mutex<()>,
    monitor: SyncMonitor,
}

impl RegistryStore {
    /// `inbox` is the inbox as the registry names it.
    pub fn new(inbox: InboxResource, client: RegistryClient, org_name: impl Into<String>) -> Self {
        let inbox_graph = RwLock::new(inbox.initial_graph());
        Self {
            inbox,
            client,
            org_name: org_name.into(),
            inbox_graph,
            publish: Mutex::new(()),
            monitor: SyncMonitor::new(),
        }
    }

    pub fn monitor(&self) -> &SyncMonitor {
        &self.monitor
    }

    /// Fetches and parses a registry entry. Registry entries are read as Turtle.
    async fn fetch_graph(&self, iri: &str) -> Result<Graph> {
        let contents = self.client.fetch_ontology(iri, RdfFormat::Turtle).await?;
        Graph::parse(contents.as_bytes(), RdfFormat::Turtle).map_err(|e| {
            Error::Registry(format!("registry returned an unreadable graph for <{}>: {}", iri, e))
        })
    }

    /// Steps 1 and 2: merge the local inbox graph into the registry's and publish it.
    async fn publish_inbox(&self, local: &Graph, format: RdfFormat) {
        let existing = match self.fetch_graph(self.inbox.iri()).await {
            Ok(graph) => graph,
            Err(Error::NotFound(_)) => {
                info!("Registry has no inbox graph yet, publishing the local one");
                Graph::new()
            }
            Err(err) => {
                error!("Could not fetch the registry inbox graph, skipping update: {}", err);
                self.monitor.record_failure("fetch inbox graph", &err).await;
                return;
            }
        };

        let merged = existing.merge(local);
        let contents = match merged.serialize(format) {
            Ok(contents) => contents,
            Err(err) => {
                let err = Error::from(err);
                error!("Could not serialize the merged inbox graph: {}", err);
                self.monitor.record_failure("serialize inbox graph", &err).await;
                return;
            }
        };

        let body = UpdateOntology::inbox_graph(
            self.inbox.iri(),
            contents,
            simplify(format.media_type()),
            self.client.username(),
        );
        match self.client.update_ontology(&body).await {
            Ok(()) => self.monitor.record_success().await,
            Err(err) => {
                error!("Exception when updating the registry inbox graph: {}", err);
                self.monitor.record_failure("update inbox graph", &err).await;
            }
        }
    }

    /// Step 3: register the notification as its own entry.
    async fn register_notification(&self, id: &str, iri: &str, contents: &str, format: RdfFormat) {
        let body = RegisterOntology::notification(
            id,
            iri,
            &self.org_name,
            self.client.username(),
            contents.to_string(),
            simplify(format.media_type()),
        );
        match self.client.register_ontology(&body).await {
            Ok(()) => self.monitor.record_success().await,
            Err(err) => {
                error!("Exception when registering notification {}: {}", iri, err);
                self.monitor.record_failure("register notification", &err).await;
            }
        }
    }
}

#[async_trait]
impl NotificationStore for RegistryStore {
    async fn create_notification(
        &self,
        payload: &[u8],
        format: RdfFormat,
    ) -> Result<CreatedNotification> {
        let id = NotificationId::generate();
        let iri = self.inbox.notification_iri(id.as_str());

        // Reject malformed payloads before anything is recorded.
        Graph::parse_with_base(payload, format, Some(&iri))?;
        let contents = std::str::from_utf8(payload).map_err(ldn_graph::Error::from)?;

        {
            let _publishing = self.publish.lock().await;
            let local = {
                let mut graph = self.inbox_graph.write().await;
                graph.add(self.inbox.contains_triple(&iri));
                graph.clone()
            };
            info!("Created notification {}", iri);

            self.publish_inbox(&local, format).await;
        }
        self.register_notification(id.as_str(), &iri, contents, format)
            .await;

        Ok(CreatedNotification {
            id: id.into_string(),
            iri,
        })
    }

    async fn fetch_inbox(&self, format: RdfFormat) -> Result<String> {
        let graph = match self.fetch_graph(self.inbox.iri()).await {
            Ok(graph) => graph,
            Err(Error::NotFound(_)) => {
                warn!("Registry has no inbox graph yet, serving the local view");
                self.inbox_graph.read().await.clone()
            }
            Err(err) => return Err(err),
        };
        Ok(graph.serialize(format)?)
    }

    async fn fetch_notification(&self, id: &str, format: RdfFormat) -> Result<String> {
        let iri = self.inbox.notification_iri(id);
        let graph = self.fetch_graph(&iri).await?;
        Ok(graph.serialize(format)?)
    }

    fn backend_name(&self) -> &'static str {
        "registry"
    }

    async fn health(&self) -> StoreHealth {
        StoreHealth {
            backend: self.backend_name(),
            notifications: None,
            registry_sync: Some(self.monitor.snapshot().await),
        }
    }
}
