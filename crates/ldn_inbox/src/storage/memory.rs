//! In-process notification storage.

use std::collections::HashMap;

use async_trait::async_trait;
use ldn_graph::{Graph, RdfFormat};
use tokio::sync::RwLock;
use tracing::{debug, info};

use super::{CreatedNotification, NotificationStore, StoreHealth};
use crate::error::{Error, Result};
use crate::inbox::{InboxResource, NotificationId};

type IdSource = Box<dyn Fn() -> NotificationId + Send + Sync>;

struct MemoryState {
    inbox_graph: Graph,
    /// Notification IRI -> notification graph
    notifications: HashMap<String, Graph>,
}

/// Keeps the inbox graph and every notification graph in memory.
///
/// Both live behind one lock so a reader never sees an `ldp:contains` triple
/// whose notification is not yet fetchable.
pub struct MemoryStore {
    inbox: InboxResource,
    state: RwLock<MemoryState>,
    ids: IdSource,
}

impl MemoryStore {
    /// Creates an empty store for `inbox`.
    pub fn new(inbox: InboxResource) -> Self {
        Self::with_id_source(inbox, NotificationId::generate)
    }

    /// Creates a store drawing identifiers from `ids` instead of random UUIDs.
    pub fn with_id_source<F>(inbox: InboxResource, ids: F) -> Self
    where
        F: Fn() -> NotificationId + Send + Sync + 'static,
    {
        let state = MemoryState {
            inbox_graph: inbox.initial_graph(),
            notifications: HashMap::new(),
        };
        Self {
            inbox,
            state: RwLock::new(state),
            ids: Box::new(ids),
        }
    }

    /// Number of stored notifications.
    pub async fn len(&self) -> usize {
        self.state.read().await.notifications.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl NotificationStore for MemoryStore {
    async fn create_notification(
        &self,
        payload: &[u8],
        format: RdfFormat,
    ) -> Result<CreatedNotification> {
        let id = (self.ids)();
        let iri = self.inbox.notification_iri(id.as_str());
        let graph = Graph::parse_with_base(payload, format, Some(&iri))?;

        {
            let mut state = self.state.write().await;
            if state.notifications.contains_key(&iri) {
                return Err(Error::IdCollision(id.into_string()));
            }
            state.notifications.insert(iri.clone(), graph);
            state.inbox_graph.add(self.inbox.contains_triple(&iri));
        }

        info!("Created notification {}", iri);
        Ok(CreatedNotification {
            id: id.into_string(),
            iri,
        })
    }

    async fn fetch_inbox(&self, format: RdfFormat) -> Result<String> {
        let state = self.state.read().await;
        Ok(state.inbox_graph.serialize(format)?)
    }

    async fn fetch_notification(&self, id: &str, format: RdfFormat) -> Result<String> {
        let iri = self.inbox.notification_iri(id);
        let state = self.state.read().await;
        let graph = state.notifications.get(&iri).ok_or_else(|| {
            debug!("No notification stored under {}", iri);
            Error::NotFound(iri.clone())
        })?;
        Ok(graph.serialize(format)?)
    }

    fn backend_name(&self) -> &'static str {
        "mem"
    }

    async fn health(&self) -> StoreHealth {
        StoreHealth {
            backend: self.backend_name(),
            notifications: Some(self.len().await),
            registry_sync: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ldn_graph::{iris, RdfTerm, RdfTriple};
    use std::sync::atomic::{AtomicUsize, Ordering};

    const INBOX: &str = "http://example.org/inbox";
    const PAYLOAD: &str = "<http://e.example/s> <http://e.example/p> <http://e.example/o> .";

    fn store() -> MemoryStore {
        MemoryStore::new(InboxResource::new(INBOX))
    }

    #[tokio::test]
    async fn test_create_then_fetch_notification() {
        let store = store();
        let created = store
            .create_notification(PAYLOAD.as_bytes(), RdfFormat::Turtle)
            .await
            .unwrap();

        assert_eq!(created.iri, format!("{}/{}", INBOX, created.id));

        let body = store
            .fetch_notification(&created.id, RdfFormat::Turtle)
            .await
            .unwrap();
        let graph = Graph::parse(body.as_bytes(), RdfFormat::Turtle).unwrap();
        assert_eq!(
            graph,
            Graph::parse(PAYLOAD.as_bytes(), RdfFormat::Turtle).unwrap()
        );
    }

    #[tokio::test]
    async fn test_inbox_gains_one_contains_triple() {
        let store = store();
        let before = store.fetch_inbox(RdfFormat::Turtle).await.unwrap();
        let before = Graph::parse(before.as_bytes(), RdfFormat::Turtle).unwrap();
        assert_eq!(before.len(), 4);

        let created = store
            .create_notification(PAYLOAD.as_bytes(), RdfFormat::Turtle)
            .await
            .unwrap();

        let after = store.fetch_inbox(RdfFormat::Turtle).await.unwrap();
        let after = Graph::parse(after.as_bytes(), RdfFormat::Turtle).unwrap();
        assert_eq!(after.len(), 5);
        assert!(before.iter().all(|t| after.contains(t)));
        assert!(after.contains(&RdfTriple::new(
            RdfTerm::iri(INBOX),
            RdfTerm::iri(iris::LDP_CONTAINS),
            RdfTerm::iri(created.iri),
        )));
    }

    #[tokio::test]
    async fn test_parse_failure_leaves_store_untouched() {
        let store = store();
        let err = store
            .create_notification(b"<http://e.example/s> <http://e", RdfFormat::Turtle)
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Graph(ldn_graph::Error::Parse(_))));
        assert!(store.is_empty().await);
        let inbox = store.fetch_inbox(RdfFormat::Turtle).await.unwrap();
        assert!(!inbox.contains("ldp:contains"));
    }

    #[tokio::test]
    async fn test_unknown_notification_is_not_found() {
        let err = store()
            .fetch_notification("deadbeef", RdfFormat::JsonLd)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[tokio::test]
    async fn test_reused_identifier_is_a_collision() {
        let store = MemoryStore::with_id_source(InboxResource::new(INBOX), || {
            NotificationId::from("fixed")
        });

        store
            .create_notification(PAYLOAD.as_bytes(), RdfFormat::Turtle)
            .await
            .unwrap();
        let err = store
            .create_notification(PAYLOAD.as_bytes(), RdfFormat::Turtle)
            .await
            .unwrap_err();

        assert!(matches!(err, Error::IdCollision(ref id) if id == "fixed"));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_relative_iris_resolve_against_notification() {
        let counter = AtomicUsize::new(0);
        let store = MemoryStore::with_id_source(InboxResource::new(INBOX), move || {
            NotificationId::from(format!("n{}", counter.fetch_add(1, Ordering::SeqCst)).as_str())
        });

        let created = store
            .create_notification(
                b"<> <http://e.example/p> \"self\" .",
                RdfFormat::Turtle,
            )
            .await
            .unwrap();
        assert_eq!(created.id, "n0");

        let body = store
            .fetch_notification("n0", RdfFormat::Turtle)
            .await
            .unwrap();
        assert!(body.contains("<http://example.org/inbox/n0>"));
    }

    #[tokio::test]
    async fn test_health_counts_notifications() {
        let store = store();
        store
            .create_notification(PAYLOAD.as_bytes(), RdfFormat::Turtle)
            .await
            .unwrap();

        let health = store.health().await;
        assert_eq!(health.backend, "mem");
        assert_eq!(health.notifications, Some(1));
        assert!(health.registry_sync.is_none());
    }
}
