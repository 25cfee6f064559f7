//! Turtle parsing and serialization
//!
//! Parsing is delegated to `rio_turtle`, which also accepts N-Triples since it
//! is a syntactic subset of Turtle. Serialization is pretty-printed: triples are
//! grouped by subject, then by predicate, and only the prefixes actually used
//! are declared.

use indexmap::{IndexMap, IndexSet};
use oxiri::Iri;
use rio_api::model;
use rio_api::parser::TriplesParser;

use crate::namespace::{iris, NamespaceMap};
use crate::{Error, RdfTerm, RdfTriple, Result};

/// Parser for Turtle (.ttl) content
pub struct TurtleParser;

impl TurtleParser {
    /// Parse Turtle content with no base IRI; relative IRIs are rejected.
    pub fn parse(content: &str) -> Result<Vec<RdfTriple>> {
        Self::parse_with_base(content, None)
    }

    /// Parse Turtle content, resolving relative IRIs against `base`.
    pub fn parse_with_base(content: &str, base: Option<&str>) -> Result<Vec<RdfTriple>> {
        let base_iri = match base {
            Some(base) => Some(Iri::parse(base.to_string()).map_err(|e| {
                Error::Parse(format!("invalid base IRI <{}>: {}", base, e))
            })?),
            None => None,
        };

        let mut triples = Vec::new();
        rio_turtle::TurtleParser::new(content.as_bytes(), base_iri).parse_all(
            &mut |t: model::Triple<'_>| -> Result<()> {
                triples.push(convert_triple(t)?);
                Ok(())
            },
        )?;

        Ok(triples)
    }
}

fn convert_triple(t: model::Triple<'_>) -> Result<RdfTriple> {
    let subject = match t.subject {
        model::Subject::NamedNode(node) => RdfTerm::iri(node.iri),
        model::Subject::BlankNode(node) => RdfTerm::blank(node.id),
        _ => return Err(Error::Parse("quoted triples are not supported".into())),
    };

    let object = match t.object {
        model::Term::NamedNode(node) => RdfTerm::iri(node.iri),
        model::Term::BlankNode(node) => RdfTerm::blank(node.id),
        model::Term::Literal(model::Literal::Simple { value }) => RdfTerm::literal(value),
        model::Term::Literal(model::Literal::LanguageTaggedString { value, language }) => {
            RdfTerm::lang_literal(value, language)
        }
        model::Term::Literal(model::Literal::Typed { value, datatype }) => {
            RdfTerm::typed_literal(value, datatype.iri)
        }
        _ => return Err(Error::Parse("quoted triples are not supported".into())),
    };

    Ok(RdfTriple::new(subject, RdfTerm::iri(t.predicate.iri), object))
}

/// Serializer for Turtle (.ttl) format
pub struct TurtleSerializer {
    namespaces: NamespaceMap,
}

impl TurtleSerializer {
    /// Create a new Turtle serializer with default namespaces
    pub fn new() -> Self {
        Self {
            namespaces: NamespaceMap::with_defaults(),
        }
    }

    /// Serialize triples to Turtle using the default namespaces
    pub fn serialize<'a, I>(triples: I) -> Result<String>
    where
        I: IntoIterator<Item = &'a RdfTriple>,
    {
        Self::new().serialize_with_options(triples)
    }

    /// Serialize triples with the configured namespaces
    pub fn serialize_with_options<'a, I>(&self, triples: I) -> Result<String>
    where
        I: IntoIterator<Item = &'a RdfTriple>,
    {
        // subject -> predicate -> objects, in first-seen order
        let mut groups: IndexMap<&RdfTerm, IndexMap<&RdfTerm, Vec<&RdfTerm>>> = IndexMap::new();
        for triple in triples {
            if triple.subject.is_literal() || !triple.predicate.is_iri() {
                return Err(Error::Serialization(format!(
                    "cannot write {:?} as a Turtle statement",
                    triple
                )));
            }
            groups
                .entry(&triple.subject)
                .or_default()
                .entry(&triple.predicate)
                .or_default()
                .push(&triple.object);
        }

        let mut used = IndexSet::new();
        let mut body = String::new();

        for (subject, predicates) in groups {
            body.push_str(&self.format_term(subject, &mut used));

            for (i, (predicate, objects)) in predicates.iter().enumerate() {
                if i == 0 {
                    body.push(' ');
                } else {
                    body.push_str(" ;\n    ");
                }

                if predicate.as_iri() == Some(iris::RDF_TYPE) {
                    body.push('a');
                } else {
                    body.push_str(&self.format_term(predicate, &mut used));
                }
                body.push(' ');

                for (j, object) in objects.iter().enumerate() {
                    if j > 0 {
                        body.push_str(", ");
                    }
                    body.push_str(&self.format_term(object, &mut used));
                }
            }

            body.push_str(" .\n\n");
        }

        let mut output = String::new();
        for (prefix, iri) in self.namespaces.prefixes() {
            if used.contains(prefix) {
                output.push_str(&format!("@prefix {}: <{}> .\n", prefix, iri));
            }
        }
        if !output.is_empty() && !body.is_empty() {
            output.push('\n');
        }
        output.push_str(&body);

        Ok(output)
    }

    fn format_iri(&self, iri: &str, used: &mut IndexSet<String>) -> String {
        match self.namespaces.split(iri) {
            Some((prefix, local)) => {
                used.insert(prefix.to_string());
                format!("{}:{}", prefix, local)
            }
            None => format!("<{}>", escape_iri(iri)),
        }
    }

    fn format_term(&self, term: &RdfTerm, used: &mut IndexSet<String>) -> String {
        match term {
            RdfTerm::Iri(iri) => self.format_iri(iri, used),
            RdfTerm::BlankNode(id) => format!("_:{}", blank_label(id)),
            RdfTerm::Literal {
                value,
                datatype,
                language,
            } => {
                let escaped = escape_string(value);
                if let Some(lang) = language {
                    return format!("\"{}\"@{}", escaped, lang);
                }
                let Some(dt) = datatype else {
                    return format!("\"{}\"", escaped);
                };
                match dt.as_str() {
                    iris::XSD_INTEGER if is_integer(value) => value.clone(),
                    iris::XSD_DECIMAL if is_decimal(value) => value.clone(),
                    iris::XSD_BOOLEAN if value == "true" || value == "false" => value.clone(),
                    _ => format!("\"{}\"^^{}", escaped, self.format_iri(dt, used)),
                }
            }
        }
    }
}

impl Default for TurtleSerializer {
    fn default() -> Self {
        Self::new()
    }
}

fn is_integer(value: &str) -> bool {
    let digits = value.strip_prefix(['+', '-']).unwrap_or(value);
    !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit())
}

fn is_decimal(value: &str) -> bool {
    let unsigned = value.strip_prefix(['+', '-']).unwrap_or(value);
    match unsigned.split_once('.') {
        Some((int, frac)) => {
            int.chars().all(|c| c.is_ascii_digit())
                && !frac.is_empty()
                && frac.chars().all(|c| c.is_ascii_digit())
        }
        None => false,
    }
}

/// Escape special characters in a string literal
pub(crate) fn escape_string(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => result.push_str("\\\\"),
            '"' => result.push_str("\\\""),
            '\n' => result.push_str("\\n"),
            '\r' => result.push_str("\\r"),
            '\t' => result.push_str("\\t"),
            _ => result.push(c),
        }
    }
    result
}

fn escape_iri(iri: &str) -> String {
    let mut result = String::with_capacity(iri.len());
    for c in iri.chars() {
        match c {
            '<' | '>' | '"' | '{' | '}' | '|' | '^' | '`' | '\\' | ' ' => {
                result.push_str(&format!("\\u{:04X}", c as u32))
            }
            c if c.is_control() => result.push_str(&format!("\\u{:04X}", c as u32)),
            c => result.push(c),
        }
    }
    result
}

fn blank_label(id: &str) -> String {
    let mut label = String::with_capacity(id.len());
    for (i, c) in id.chars().enumerate() {
        if c.is_ascii_alphanumeric() || c == '_' || (i > 0 && c == '-') {
            label.push(c);
        } else {
            label.push_str(&format!("x{:x}", c as u32));
        }
    }
    if label.is_empty() {
        label.push('b');
    }
    label
}
