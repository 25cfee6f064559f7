//! # LDN Inbox - Linked Data Notifications receiver
//!
//! An HTTP server implementing the receiver side of
//! [Linked Data Notifications](https://www.w3.org/TR/ldn/): an LDP container
//! that accepts POSTed RDF notifications (JSON-LD or Turtle), gives each one a
//! fresh IRI, and serves the inbox and every notification back in the format
//! the client asks for.
//!
//! Notifications are stored either in process memory or in a remote ontology
//! registry; the protocol engine does not know which.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │            rest (axum router)               │
//! └──────────────────────┬──────────────────────┘
//!                        │
//! ┌──────────────────────▼──────────────────────┐
//! │   InboxEngine  ──  negotiate (Accept/CT)    │
//! └──────────────────────┬──────────────────────┘
//!                        │ dyn NotificationStore
//!          ┌─────────────┴─────────────┐
//! ┌────────▼────────┐         ┌────────▼────────┐
//! │   MemoryStore   │         │  RegistryStore  │──► RegistryClient
//! └────────┬────────┘         └────────┬────────┘
//!          └───────────┬───────────────┘
//!                ldn_graph::Graph
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use ldn_inbox::{InboxConfig, InboxServer};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = InboxConfig::default().with_port(8088);
//!     InboxServer::new(config)?.run().await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Sending a notification
//!
//! ```bash
//! curl -i -X POST http://127.0.0.1:8088/inbox/ \
//!   -H 'Content-Type: text/turtle' \
//!   --data '<http://e.example/s> <http://e.example/p> <http://e.example/o> .'
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod inbox;
pub mod negotiate;
pub mod registry;
pub mod rest;
pub mod server;
pub mod state;
pub mod storage;

pub use config::{InboxConfig, RegistryConfig, StorageMode};
pub use engine::{InboxEngine, InboxResponse};
pub use error::{Error, Result, StatusPolicy};
pub use inbox::{InboxResource, NotificationId};
pub use negotiate::{negotiate, Negotiated, SUPPORTED_MEDIA_TYPES};
pub use registry::RegistryClient;
pub use server::InboxServer;
pub use state::AppState;
pub use storage::{
    open_store, CreatedNotification, MemoryStore, NotificationStore, RegistryStore, StoreHealth,
};
