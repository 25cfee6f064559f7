//! Supported RDF serialization formats.

use std::fmt;

/// A wire syntax a graph can be parsed from or serialized to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RdfFormat {
    /// JSON-LD 1.1 (`application/ld+json`)
    #[default]
    JsonLd,
    /// Turtle 1.1 (`text/turtle`), also accepts N-Triples
    Turtle,
}

impl RdfFormat {
    /// The canonical media type of the format
    pub fn media_type(&self) -> &'static str {
        match self {
            Self::JsonLd => "application/ld+json",
            Self::Turtle => "text/turtle",
        }
    }

    /// The short code used by ontology registries (`jsonld` / `ttl`)
    pub fn short_code(&self) -> &'static str {
        match self {
            Self::JsonLd => "jsonld",
            Self::Turtle => "ttl",
        }
    }

    /// Resolve a registry short code
    pub fn from_short_code(code: &str) -> Option<Self> {
        match code {
            "jsonld" => Some(Self::JsonLd),
            "ttl" => Some(Self::Turtle),
            _ => None,
        }
    }
}

impl fmt::Display for RdfFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.media_type())
    }
}
