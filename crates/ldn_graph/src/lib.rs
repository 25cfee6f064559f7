//! LDN Graph - RDF graphs for Linked Data Notifications
//!
//! An in-memory RDF graph plus the two wire syntaxes an LDN inbox speaks:
//! Turtle and JSON-LD. Graphs are sets of triples; two graphs are equal when
//! they hold the same triples, regardless of insertion order.
//!
//! # Quick Start
//!
//! ```
//! use ldn_graph::{Graph, RdfFormat, RdfTerm};
//!
//! # fn main() -> Result<(), ldn_graph::Error> {
//! let mut graph = Graph::new();
//! graph.add_triple(
//!     RdfTerm::iri("http://example.org/inbox/"),
//!     RdfTerm::iri("http://www.w3.org/1999/02/22-rdf-syntax-ns#type"),
//!     RdfTerm::iri("http://www.w3.org/ns/ldp#BasicContainer"),
//! );
//!
//! let turtle = graph.serialize(RdfFormat::Turtle)?;
//! let reparsed = Graph::parse(turtle.as_bytes(), RdfFormat::Turtle)?;
//! assert_eq!(graph, reparsed);
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod format;
pub mod jsonld;
pub mod namespace;
pub mod term;
pub mod turtle;

// Re-exports
pub use error::{Error, Result};
pub use format::RdfFormat;
pub use jsonld::{JsonLdParser, JsonLdSerializer};
pub use namespace::{iris, NamespaceMap};
pub use term::{RdfTerm, RdfTriple};
pub use turtle::{TurtleParser, TurtleSerializer};

use indexmap::IndexSet;

/// A set of RDF triples.
///
/// Iteration follows insertion order so serialized output is stable, while
/// equality is set equality.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    triples: IndexSet<RdfTriple>,
}

impl Graph {
    /// Creates an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a triple. Returns `false` if it was already present.
    pub fn add(&mut self, triple: RdfTriple) -> bool {
        self.triples.insert(triple)
    }

    /// Adds a triple built from its three terms.
    pub fn add_triple(&mut self, subject: RdfTerm, predicate: RdfTerm, object: RdfTerm) -> bool {
        self.add(RdfTriple::new(subject, predicate, object))
    }

    pub fn len(&self) -> usize {
        self.triples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triples.is_empty()
    }

    pub fn contains(&self, triple: &RdfTriple) -> bool {
        self.triples.contains(triple)
    }

    pub fn iter(&self) -> impl Iterator<Item = &RdfTriple> {
        self.triples.iter()
    }

    /// Objects of every triple matching `(subject, predicate, ?)`.
    pub fn objects<'a>(
        &'a self,
        subject: &'a RdfTerm,
        predicate: &'a RdfTerm,
    ) -> impl Iterator<Item = &'a RdfTerm> + 'a {
        self.triples
            .iter()
            .filter(move |t| &t.subject == subject && &t.predicate == predicate)
            .map(|t| &t.object)
    }

    /// Returns the union of `self` and `other` as a new graph.
    pub fn merge(&self, other: &Graph) -> Graph {
        let mut merged = self.clone();
        merged.extend(other.iter().cloned());
        merged
    }

    /// Parses `bytes` as `format` with no base IRI.
    pub fn parse(bytes: &[u8], format: RdfFormat) -> Result<Graph> {
        Self::parse_with_base(bytes, format, None)
    }

    /// Parses `bytes` as `format`, resolving relative IRIs against `base`.
    pub fn parse_with_base(bytes: &[u8], format: RdfFormat, base: Option<&str>) -> Result<Graph> {
        let content = std::str::from_utf8(bytes)?;
        let triples = match format {
            RdfFormat::Turtle => TurtleParser::parse_with_base(content, base)?,
            RdfFormat::JsonLd => JsonLdParser::parse_with_base(content, base)?,
        };
        log::debug!("parsed {} triples from {}", triples.len(), format);
        Ok(triples.into_iter().collect())
    }

    /// Serializes the graph in `format`.
    pub fn serialize(&self, format: RdfFormat) -> Result<String> {
        match format {
            RdfFormat::Turtle => TurtleSerializer::serialize(self.iter()),
            RdfFormat::JsonLd => JsonLdSerializer::serialize(self.iter()),
        }
    }
}

impl PartialEq for Graph {
    fn eq(&self, other: &Self) -> bool {
        self.triples.len() == other.triples.len()
            && self.triples.iter().all(|t| other.triples.contains(t))
    }
}

impl Eq for Graph {}

impl Extend<RdfTriple> for Graph {
    fn extend<I: IntoIterator<Item = RdfTriple>>(&mut self, iter: I) {
        self.triples.extend(iter);
    }
}

impl FromIterator<RdfTriple> for Graph {
    fn from_iter<I: IntoIterator<Item = RdfTriple>>(iter: I) -> Self {
        Self {
            triples: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Graph {
    type Item = &'a RdfTriple;
    type IntoIter = indexmap::set::Iter<'a, RdfTriple>;

    fn into_iter(self) -> Self::IntoIter {
        self.triples.iter()
    }
}
