//! RDF namespace and prefix management
//!
//! Provides the prefixes an LDN inbox speaks (RDF, LDP, ActivityStreams, ...)
//! and the compaction rules used by both serializers.

use indexmap::IndexMap;

/// Standard RDF namespace
pub const PREFIX_RDF: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";
/// RDF Schema namespace
pub const PREFIX_RDFS: &str = "http://www.w3.org/2000/01/rdf-schema#";
/// XML Schema datatypes namespace
pub const PREFIX_XSD: &str = "http://www.w3.org/2001/XMLSchema#";
/// OWL namespace
pub const PREFIX_OWL: &str = "http://www.w3.org/2002/07/owl#";
/// Linked Data Platform namespace
pub const PREFIX_LDP: &str = "http://www.w3.org/ns/ldp#";
/// ActivityStreams 2.0 namespace
pub const PREFIX_AS: &str = "https://www.w3.org/ns/activitystreams#";

/// A map of namespace prefixes, kept in declaration order so output is stable.
#[derive(Debug, Clone, Default)]
pub struct NamespaceMap {
    prefixes: IndexMap<String, String>,
}

impl NamespaceMap {
    /// Create an empty namespace map
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a namespace map with the prefixes used by LDN inboxes
    pub fn with_defaults() -> Self {
        let mut map = Self::new();
        map.add("rdf", PREFIX_RDF);
        map.add("rdfs", PREFIX_RDFS);
        map.add("xsd", PREFIX_XSD);
        map.add("owl", PREFIX_OWL);
        map.add("ldp", PREFIX_LDP);
        map.add("as", PREFIX_AS);
        map
    }

    /// Add a namespace, replacing any previous IRI bound to the prefix
    pub fn add(&mut self, prefix: &str, iri: &str) {
        self.prefixes.insert(prefix.to_string(), iri.to_string());
    }

    /// Split an IRI into `(prefix, local)` using the longest matching namespace.
    ///
    /// Only succeeds when the local part is safe to write as a prefixed name in
    /// both Turtle and JSON-LD.
    pub fn split(&self, iri: &str) -> Option<(&str, String)> {
        self.prefixes
            .iter()
            .filter(|(_, base)| iri.starts_with(base.as_str()))
            .max_by_key(|(_, base)| base.len())
            .and_then(|(prefix, base)| {
                let local = &iri[base.len()..];
                is_safe_local(local).then(|| (prefix.as_str(), local.to_string()))
            })
    }

    /// Compact an IRI to prefixed form if possible
    pub fn compact(&self, iri: &str) -> Option<String> {
        self.split(iri)
            .map(|(prefix, local)| format!("{}:{}", prefix, local))
    }

    /// Get all prefixes
    pub fn prefixes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.prefixes.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

fn is_safe_local(local: &str) -> bool {
    let mut chars = local.chars();
    match chars.next() {
        None => true,
        Some(first) if first.is_ascii_alphanumeric() || first == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        }
        Some(_) => false,
    }
}

/// Well-known IRIs
pub mod iris {
    // RDF vocabulary
    pub const RDF_TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";
    pub const RDF_NIL: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#nil";
    pub const RDF_FIRST: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#first";
    pub const RDF_REST: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#rest";
    pub const RDF_LANG_STRING: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#langString";

    // XSD datatypes
    pub const XSD_STRING: &str = "http://www.w3.org/2001/XMLSchema#string";
    pub const XSD_INTEGER: &str = "http://www.w3.org/2001/XMLSchema#integer";
    pub const XSD_DECIMAL: &str = "http://www.w3.org/2001/XMLSchema#decimal";
    pub const XSD_DOUBLE: &str = "http://www.w3.org/2001/XMLSchema#double";
    pub const XSD_BOOLEAN: &str = "http://www.w3.org/2001/XMLSchema#boolean";
    pub const XSD_DATETIME: &str = "http://www.w3.org/2001/XMLSchema#dateTime";

    // LDP vocabulary
    pub const LDP_RESOURCE: &str = "http://www.w3.org/ns/ldp#Resource";
    pub const LDP_RDF_SOURCE: &str = "http://www.w3.org/ns/ldp#RDFSource";
    pub const LDP_CONTAINER: &str = "http://www.w3.org/ns/ldp#Container";
    pub const LDP_BASIC_CONTAINER: &str = "http://www.w3.org/ns/ldp#BasicContainer";
    pub const LDP_CONTAINS: &str = "http://www.w3.org/ns/ldp#contains";
    pub const LDP_INBOX: &str = "http://www.w3.org/ns/ldp#inbox";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_namespace_map_compact() {
        let map = NamespaceMap::with_defaults();

        assert_eq!(
            map.compact(iris::LDP_BASIC_CONTAINER).as_deref(),
            Some("ldp:BasicContainer")
        );
        assert_eq!(map.compact("http://example.org/foo"), None);
    }

    #[test]
    fn test_compact_refuses_unsafe_local_parts() {
        let mut map = NamespaceMap::new();
        map.add("ex", "http://example.org/");

        assert_eq!(map.compact("http://example.org/a/b"), None);
        assert_eq!(map.compact("http://example.org/a.b"), None);
        assert_eq!(map.compact("http://example.org/a-b").as_deref(), Some("ex:a-b"));
    }

    #[test]
    fn test_longest_namespace_wins() {
        let mut map = NamespaceMap::new();
        map.add("w3", "http://www.w3.org/ns/");
        map.add("ldp", PREFIX_LDP);

        assert_eq!(
            map.compact(iris::LDP_CONTAINS).as_deref(),
            Some("ldp:contains")
        );
    }
}
