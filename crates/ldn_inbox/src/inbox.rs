//! The inbox container and notification identifiers.

use std::fmt;

use ldn_graph::{iris, Graph, RdfTerm, RdfTriple};
use uuid::Uuid;

/// The LDP types every inbox advertises, in `Link` header order.
pub const LDP_TYPES: [&str; 4] = [
    iris::LDP_RESOURCE,
    iris::LDP_RDF_SOURCE,
    iris::LDP_CONTAINER,
    iris::LDP_BASIC_CONTAINER,
];

/// An opaque notification identifier: 128 random bits as 32 lowercase hex digits.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NotificationId(String);

impl NotificationId {
    /// Generates a fresh random identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl From<&str> for NotificationId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl fmt::Display for NotificationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The singleton inbox container a deployment serves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboxResource {
    iri: String,
}

impl InboxResource {
    /// Creates the inbox identified by `iri`. A trailing slash is dropped.
    pub fn new(iri: impl Into<String>) -> Self {
        let iri = iri.into();
        let iri = iri.trim_end_matches('/').to_string();
        Self { iri }
    }

    pub fn iri(&self) -> &str {
        &self.iri
    }

    /// The IRI of the notification `id` inside this inbox.
    pub fn notification_iri(&self, id: &str) -> String {
        format!("{}/{}", self.iri, id)
    }

    /// The inbox graph before any notification arrives: its four LDP types.
    pub fn initial_graph(&self) -> Graph {
        let subject = RdfTerm::iri(self.iri.as_str());
        let rdf_type = RdfTerm::iri(iris::RDF_TYPE);
        LDP_TYPES
            .iter()
            .map(|ty| RdfTriple::new(subject.clone(), rdf_type.clone(), RdfTerm::iri(*ty)))
            .collect()
    }

    /// The `ldp:contains` triple linking this inbox to a notification.
    pub fn contains_triple(&self, notification_iri: &str) -> RdfTriple {
        RdfTriple::new(
            RdfTerm::iri(self.iri.as_str()),
            RdfTerm::iri(iris::LDP_CONTAINS),
            RdfTerm::iri(notification_iri),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_ids_are_32_hex_chars() {
        let id = NotificationId::generate();
        assert_eq!(id.as_str().len(), 32);
        assert!(id
            .as_str()
            .chars()
            .all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
        assert_ne!(id, NotificationId::generate());
    }

    #[test]
    fn test_notification_iri() {
        let inbox = InboxResource::new("http://example.org/inbox/");
        assert_eq!(inbox.iri(), "http://example.org/inbox");
        assert_eq!(
            inbox.notification_iri("abc"),
            "http://example.org/inbox/abc"
        );
    }

    #[test]
    fn test_initial_graph_has_ldp_types() {
        let inbox = InboxResource::new("http://example.org/inbox");
        let graph = inbox.initial_graph();
        assert_eq!(graph.len(), 4);

        let subject = RdfTerm::iri("http://example.org/inbox");
        let predicate = RdfTerm::iri(iris::RDF_TYPE);
        let types: Vec<_> = graph
            .objects(&subject, &predicate)
            .filter_map(RdfTerm::as_iri)
            .collect();
        assert_eq!(types, LDP_TYPES.to_vec());
    }

    #[test]
    fn test_contains_triple() {
        let inbox = InboxResource::new("http://example.org/inbox");
        let triple = inbox.contains_triple("http://example.org/inbox/abc");
        assert_eq!(triple.predicate.as_iri(), Some(iris::LDP_CONTAINS));
        assert_eq!(triple.object.as_iri(), Some("http://example.org/inbox/abc"));
    }
}
