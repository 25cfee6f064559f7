//! RDF terms and triples.

use crate::namespace::iris;
use crate::{Error, Result};

/// An RDF term that can be a subject, predicate, or object
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RdfTerm {
    /// IRI (Internationalized Resource Identifier)
    Iri(String),
    /// Blank node, identified by its label without the `_:` prefix
    BlankNode(String),
    /// Literal value
    Literal {
        value: String,
        datatype: Option<String>,
        language: Option<String>,
    },
}

impl RdfTerm {
    /// Create an IRI term
    pub fn iri(iri: impl Into<String>) -> Self {
        Self::Iri(iri.into())
    }

    /// Create a blank node
    pub fn blank(id: impl Into<String>) -> Self {
        Self::BlankNode(id.into())
    }

    /// Create a plain literal
    pub fn literal(value: impl Into<String>) -> Self {
        Self::Literal {
            value: value.into(),
            datatype: None,
            language: None,
        }
    }

    /// Create a typed literal.
    ///
    /// `xsd:string` is folded into a plain literal, since RDF 1.1 treats the two
    /// as the same term.
    pub fn typed_literal(value: impl Into<String>, datatype: impl Into<String>) -> Self {
        let datatype = datatype.into();
        Self::Literal {
            value: value.into(),
            datatype: (datatype != iris::XSD_STRING).then_some(datatype),
            language: None,
        }
    }

    /// Create a language-tagged literal
    pub fn lang_literal(value: impl Into<String>, lang: impl Into<String>) -> Self {
        Self::Literal {
            value: value.into(),
            datatype: None,
            language: Some(lang.into().to_ascii_lowercase()),
        }
    }

    /// Check if this is an IRI
    pub fn is_iri(&self) -> bool {
        matches!(self, Self::Iri(_))
    }

    /// Check if this is a blank node
    pub fn is_blank(&self) -> bool {
        matches!(self, Self::BlankNode(_))
    }

    /// Check if this is a literal
    pub fn is_literal(&self) -> bool {
        matches!(self, Self::Literal { .. })
    }

    /// Get the IRI value if this is an IRI
    pub fn as_iri(&self) -> Option<&str> {
        match self {
            Self::Iri(iri) => Some(iri),
            _ => None,
        }
    }

    /// Get the lexical value if this is a literal
    pub fn as_literal(&self) -> Option<&str> {
        match self {
            Self::Literal { value, .. } => Some(value),
            _ => None,
        }
    }
}

/// An RDF triple with subject, predicate, object
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RdfTriple {
    pub subject: RdfTerm,
    pub predicate: RdfTerm,
    pub object: RdfTerm,
}

impl RdfTriple {
    /// Create a new RDF triple
    pub fn new(subject: RdfTerm, predicate: RdfTerm, object: RdfTerm) -> Self {
        Self {
            subject,
            predicate,
            object,
        }
    }

    /// Create a triple, checking that each term is allowed in its position.
    pub fn checked(subject: RdfTerm, predicate: RdfTerm, object: RdfTerm) -> Result<Self> {
        if subject.is_literal() {
            return Err(Error::InvalidTriple(
                "subject must be IRI or blank node".into(),
            ));
        }
        if !predicate.is_iri() {
            return Err(Error::InvalidTriple("predicate must be IRI".into()));
        }
        Ok(Self::new(subject, predicate, object))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rdf_term_iri() {
        let term = RdfTerm::iri("http://example.org/alice");
        assert!(term.is_iri());
        assert_eq!(term.as_iri(), Some("http://example.org/alice"));
    }

    #[test]
    fn test_rdf_term_literal() {
        let term = RdfTerm::literal("Hello");
        assert!(term.is_literal());
        assert_eq!(term.as_literal(), Some("Hello"));
    }

    #[test]
    fn test_xsd_string_folds_to_plain() {
        assert_eq!(
            RdfTerm::typed_literal("x", iris::XSD_STRING),
            RdfTerm::literal("x")
        );
    }

    #[test]
    fn test_language_tag_is_normalized() {
        assert_eq!(
            RdfTerm::lang_literal("Hola", "ES"),
            RdfTerm::lang_literal("Hola", "es")
        );
    }

    #[test]
    fn test_checked_rejects_literal_subject() {
        let err = RdfTriple::checked(
            RdfTerm::literal("nope"),
            RdfTerm::iri("http://example.org/p"),
            RdfTerm::literal("o"),
        );
        assert!(matches!(err, Err(Error::InvalidTriple(_))));
    }

    #[test]
    fn test_checked_rejects_blank_predicate() {
        let err = RdfTriple::checked(
            RdfTerm::iri("http://example.org/s"),
            RdfTerm::blank("p"),
            RdfTerm::literal("o"),
        );
        assert!(err.is_err());
    }
}
