//! JSON-LD parsing and serialization
//!
//! The parser implements the parts of JSON-LD 1.1 "deserialize to RDF" that
//! notification payloads use in practice: contexts (inline, arrays, and the
//! well-known ActivityStreams context), term and keyword aliases, compact IRIs,
//! type coercion, value objects, `@graph`, `@reverse`, `@list` and `@set`.
//! Remote contexts other than ActivityStreams are never fetched.
//!
//! The serializer writes a compact document with a prefix-only `@context` and
//! one node object per subject inside `@graph`.

use std::collections::{HashMap, HashSet};

use indexmap::{IndexMap, IndexSet};
use oxiri::Iri;
use serde_json::{json, Map, Value};

use crate::namespace::{iris, NamespaceMap, PREFIX_AS, PREFIX_LDP, PREFIX_XSD};
use crate::{Error, RdfTerm, RdfTriple, Result};

/// Context IRIs that resolve to the built-in ActivityStreams context.
const ACTIVITYSTREAMS_CONTEXTS: &[&str] = &[
    "https://www.w3.org/ns/activitystreams",
    "http://www.w3.org/ns/activitystreams",
    "https://www.w3.org/ns/activitystreams.jsonld",
    "http://www.w3.org/ns/activitystreams.jsonld",
];

/// ActivityStreams properties whose string values are IRIs.
const AS_ID_PROPERTIES: &[&str] = &[
    "actor",
    "anyOf",
    "attachment",
    "attributedTo",
    "audience",
    "bcc",
    "bto",
    "cc",
    "context",
    "current",
    "first",
    "generator",
    "href",
    "icon",
    "image",
    "inReplyTo",
    "instrument",
    "last",
    "location",
    "next",
    "object",
    "oneOf",
    "origin",
    "partOf",
    "prev",
    "preview",
    "replies",
    "result",
    "tag",
    "target",
    "to",
    "url",
];

/// ActivityStreams properties typed as `xsd:dateTime`.
const AS_DATE_PROPERTIES: &[&str] = &["deleted", "endTime", "published", "startTime", "updated"];

#[derive(Debug, Clone, Default)]
struct TermDefinition {
    /// `None` when the term is explicitly mapped to `null`.
    iri: Option<String>,
    /// `@id`, `@vocab`, or a datatype IRI.
    coerce: Option<String>,
    list: bool,
}

#[derive(Debug, Clone, Default)]
struct Context {
    terms: HashMap<String, TermDefinition>,
    vocab: Option<String>,
    base: Option<String>,
    language: Option<String>,
}

impl Context {
    fn new(base: Option<&str>) -> Self {
        Self {
            base: base.map(str::to_string),
            ..Default::default()
        }
    }

    fn process(&self, local: &Value) -> Result<Context> {
        let mut ctx = self.clone();
        match local {
            Value::Null => {
                ctx = Context {
                    base: self.base.clone(),
                    ..Default::default()
                };
            }
            Value::String(iri) => ctx.import_remote(iri),
            Value::Array(items) => {
                for item in items {
                    ctx = ctx.process(item)?;
                }
            }
            Value::Object(map) => ctx.define_all(map)?,
            _ => return Err(Error::Parse("@context must be an object, array, string or null".into())),
        }
        Ok(ctx)
    }

    fn import_remote(&mut self, iri: &str) {
        if !ACTIVITYSTREAMS_CONTEXTS.contains(&iri) {
            log::warn!("skipping remote JSON-LD context <{}>", iri);
            return;
        }

        self.vocab = Some(PREFIX_AS.to_string());
        self.alias("id", "@id");
        self.alias("type", "@type");
        self.alias("as", PREFIX_AS);
        self.alias("ldp", PREFIX_LDP);
        self.alias("xsd", PREFIX_XSD);
        for name in AS_ID_PROPERTIES {
            self.define_coerced(name, format!("{}{}", PREFIX_AS, name), "@id");
        }
        for name in AS_DATE_PROPERTIES {
            self.define_coerced(name, format!("{}{}", PREFIX_AS, name), iris::XSD_DATETIME);
        }
        self.define_coerced("inbox", iris::LDP_INBOX.to_string(), "@id");
    }

    fn alias(&mut self, term: &str, iri: &str) {
        self.terms.insert(
            term.to_string(),
            TermDefinition {
                iri: Some(iri.to_string()),
                ..Default::default()
            },
        );
    }

    fn define_coerced(&mut self, term: &str, iri: String, coerce: &str) {
        self.terms.insert(
            term.to_string(),
            TermDefinition {
                iri: Some(iri),
                coerce: Some(coerce.to_string()),
                list: false,
            },
        );
    }

    fn define_all(&mut self, local: &Map<String, Value>) -> Result<()> {
        match local.get("@base") {
            None => {}
            Some(Value::Null) => self.base = None,
            Some(Value::String(base)) => self.base = self.resolve(base).or(Some(base.clone())),
            Some(_) => return Err(Error::Parse("@base must be a string or null".into())),
        }
        match local.get("@vocab") {
            None => {}
            Some(Value::Null) => self.vocab = None,
            Some(Value::String(vocab)) => {
                self.vocab = Some(self.expand_iri(vocab, true).unwrap_or_else(|| vocab.clone()))
            }
            Some(_) => return Err(Error::Parse("@vocab must be a string or null".into())),
        }
        match local.get("@language") {
            None => {}
            Some(Value::Null) => self.language = None,
            Some(Value::String(lang)) => self.language = Some(lang.to_ascii_lowercase()),
            Some(_) => return Err(Error::Parse("@language must be a string or null".into())),
        }

        let mut defined = HashSet::new();
        for term in local.keys() {
            self.define(local, term, &mut defined)?;
        }
        Ok(())
    }

    /// Defines `term` from `local`, defining any prefix it depends on first.
    fn define(
        &mut self,
        local: &Map<String, Value>,
        term: &str,
        defined: &mut HashSet<String>,
    ) -> Result<()> {
        if term.starts_with('@') || !defined.insert(term.to_string()) {
            return Ok(());
        }
        let Some(value) = local.get(term) else {
            return Ok(());
        };

        let dependencies = match value {
            Value::String(s) => vec![s.as_str()],
            Value::Object(def) => ["@id", "@type"]
                .iter()
                .filter_map(|key| def.get(*key).and_then(Value::as_str))
                .collect(),
            _ => Vec::new(),
        };
        for dependency in dependencies {
            if let Some((prefix, _)) = dependency.split_once(':') {
                if local.contains_key(prefix) && prefix != term {
                    self.define(local, prefix, defined)?;
                }
            }
        }

        let definition = match value {
            Value::Null => TermDefinition::default(),
            Value::String(id) => TermDefinition {
                iri: self.expand_iri(id, true),
                ..Default::default()
            },
            Value::Object(def) => {
                let iri = match def.get("@id") {
                    Some(Value::Null) => None,
                    Some(Value::String(id)) => self.expand_iri(id, true),
                    Some(_) => {
                        return Err(Error::Parse(format!(
                            "@id of term '{}' must be a string",
                            term
                        )))
                    }
                    None => self.expand_iri(term, true),
                };
                let coerce = match def.get("@type") {
                    None => None,
                    Some(Value::String(t)) if t == "@id" || t == "@vocab" => Some(t.clone()),
                    Some(Value::String(t)) => self.expand_iri(t, true),
                    Some(_) => {
                        return Err(Error::Parse(format!(
                            "@type of term '{}' must be a string",
                            term
                        )))
                    }
                };
                let list = def.get("@container").and_then(Value::as_str) == Some("@list");
                TermDefinition { iri, coerce, list }
            }
            _ => {
                return Err(Error::Parse(format!(
                    "definition of term '{}' must be a string, object or null",
                    term
                )))
            }
        };

        self.terms.insert(term.to_string(), definition);
        Ok(())
    }

    fn resolve(&self, relative: &str) -> Option<String> {
        let base = Iri::parse(self.base.as_deref()?).ok()?;
        base.resolve(relative).ok().map(|iri| iri.into_inner())
    }

    /// Expands a term, compact IRI or relative reference. `vocab` selects
    /// vocabulary-relative expansion (property names, types) over
    /// document-relative expansion (`@id` values).
    fn expand_iri(&self, value: &str, vocab: bool) -> Option<String> {
        if value.starts_with('@') {
            return Some(value.to_string());
        }
        if vocab {
            if let Some(def) = self.terms.get(value) {
                return def.iri.clone();
            }
        }
        if let Some((prefix, suffix)) = value.split_once(':') {
            if prefix == "_" || suffix.starts_with("//") {
                return Some(value.to_string());
            }
            if let Some(TermDefinition { iri: Some(iri), .. }) = self.terms.get(prefix) {
                return Some(format!("{}{}", iri, suffix));
            }
            return Some(value.to_string());
        }
        if vocab {
            return self.vocab.as_ref().map(|v| format!("{}{}", v, value));
        }
        self.resolve(value)
    }

    fn keyword_entry<'a>(&self, map: &'a Map<String, Value>, keyword: &str) -> Option<&'a Value> {
        map.iter()
            .find(|(key, _)| {
                key.as_str() == keyword || self.expand_iri(key, true).as_deref() == Some(keyword)
            })
            .map(|(_, value)| value)
    }
}

#[derive(Default)]
struct Expander {
    triples: Vec<RdfTriple>,
    blank_counter: usize,
    blank_labels: HashMap<String, String>,
}

impl Expander {
    fn fresh_blank(&mut self) -> RdfTerm {
        let term = RdfTerm::blank(format!("b{}", self.blank_counter));
        self.blank_counter += 1;
        term
    }

    fn labelled_blank(&mut self, label: &str) -> RdfTerm {
        if let Some(id) = self.blank_labels.get(label) {
            return RdfTerm::blank(id.clone());
        }
        let term = self.fresh_blank();
        if let RdfTerm::BlankNode(id) = &term {
            self.blank_labels.insert(label.to_string(), id.clone());
        }
        term
    }

    fn reference(&mut self, id: &str, ctx: &Context, vocab: bool) -> Option<RdfTerm> {
        if let Some(label) = id.strip_prefix("_:") {
            return Some(self.labelled_blank(label));
        }
        let iri = ctx.expand_iri(id, vocab).filter(|iri| !iri.starts_with('@'))?;
        if let Some(label) = iri.strip_prefix("_:") {
            return Some(self.labelled_blank(label));
        }
        Some(RdfTerm::Iri(iri))
    }

    /// Emits a triple. Triples holding a malformed IRI, or a term in a
    /// position RDF does not allow, are dropped.
    fn push(&mut self, subject: RdfTerm, predicate: &str, object: RdfTerm) {
        if Iri::parse(predicate).is_err() || !well_formed(&subject) || !well_formed(&object) {
            log::warn!("Dropping JSON-LD statement with a malformed IRI (predicate <{}>)", predicate);
            return;
        }
        match RdfTriple::checked(subject, RdfTerm::iri(predicate), object) {
            Ok(triple) => self.triples.push(triple),
            Err(err) => log::warn!("Dropping JSON-LD statement: {}", err),
        }
    }

    fn top_level(&mut self, value: &Value, ctx: &Context) -> Result<()> {
        let map = value
            .as_object()
            .ok_or_else(|| Error::Parse("top-level JSON-LD items must be objects".into()))?;

        let inner = match map.get("@context") {
            Some(local) => ctx.process(local)?,
            None => ctx.clone(),
        };
        let graph = inner.keyword_entry(map, "@graph");
        let wrapper_only = map.keys().all(|key| {
            matches!(
                inner.expand_iri(key, true).as_deref(),
                Some("@context") | Some("@graph")
            )
        });

        match graph {
            Some(graph) if wrapper_only => {
                for item in one_or_many(graph) {
                    let node = item
                        .as_object()
                        .ok_or_else(|| Error::Parse("@graph entries must be node objects".into()))?;
                    self.node(node, &inner)?;
                }
            }
            _ => {
                self.node(map, ctx)?;
            }
        }
        Ok(())
    }

    fn node(&mut self, map: &Map<String, Value>, ctx: &Context) -> Result<RdfTerm> {
        let ctx = match map.get("@context") {
            Some(local) => ctx.process(local)?,
            None => ctx.clone(),
        };

        let subject = match ctx.keyword_entry(map, "@id") {
            Some(Value::String(id)) => self.reference(id, &ctx, false),
            Some(_) => return Err(Error::Parse("@id must be a string".into())),
            None => None,
        };
        let subject = match subject {
            Some(subject) => subject,
            None => self.fresh_blank(),
        };

        for (key, value) in map {
            let Some(expanded) = ctx.expand_iri(key, true) else {
                continue;
            };
            match expanded.as_str() {
                "@type" => {
                    for item in one_or_many(value) {
                        let name = item
                            .as_str()
                            .ok_or_else(|| Error::Parse("@type values must be strings".into()))?;
                        if let Some(class) = self.reference(name, &ctx, true) {
                            self.push(subject.clone(), iris::RDF_TYPE, class);
                        }
                    }
                }
                "@graph" => {
                    for item in one_or_many(value) {
                        let node = item.as_object().ok_or_else(|| {
                            Error::Parse("@graph entries must be node objects".into())
                        })?;
                        self.node(node, &ctx)?;
                    }
                }
                "@reverse" => {
                    let reverse = value
                        .as_object()
                        .ok_or_else(|| Error::Parse("@reverse must be an object".into()))?;
                    for (reverse_key, reverse_value) in reverse {
                        let Some(property) = ctx.expand_iri(reverse_key, true) else {
                            continue;
                        };
                        if property.starts_with('@') || property.starts_with("_:") {
                            continue;
                        }
                        for item in one_or_many(reverse_value) {
                            let node = item.as_object().ok_or_else(|| {
                                Error::Parse("@reverse values must be node objects".into())
                            })?;
                            let source = self.node(node, &ctx)?;
                            self.push(source, &property, subject.clone());
                        }
                    }
                }
                keyword if keyword.starts_with('@') => {}
                blank if blank.starts_with("_:") => {}
                property => {
                    let definition = ctx.terms.get(key.as_str()).cloned();
                    for object in self.values(value, definition.as_ref(), &ctx)? {
                        self.push(subject.clone(), property, object);
                    }
                }
            }
        }

        Ok(subject)
    }

    fn values(
        &mut self,
        value: &Value,
        definition: Option<&TermDefinition>,
        ctx: &Context,
    ) -> Result<Vec<RdfTerm>> {
        match value {
            Value::Array(items) if definition.is_some_and(|d| d.list) => {
                Ok(vec![self.list(items, definition, ctx)?])
            }
            Value::Array(items) => {
                let mut terms = Vec::new();
                for item in items {
                    terms.extend(self.values(item, definition, ctx)?);
                }
                Ok(terms)
            }
            Value::Object(map) => {
                if let Some(set) = ctx.keyword_entry(map, "@set") {
                    let plain = definition.map(|d| TermDefinition {
                        list: false,
                        ..d.clone()
                    });
                    return self.values(set, plain.as_ref(), ctx);
                }
                if let Some(list) = ctx.keyword_entry(map, "@list") {
                    let items = match list {
                        Value::Array(items) => items.as_slice(),
                        single => std::slice::from_ref(single),
                    };
                    return Ok(vec![self.list(items, definition, ctx)?]);
                }
                Ok(self.object(value, definition, ctx)?.into_iter().collect())
            }
            _ => Ok(self.object(value, definition, ctx)?.into_iter().collect()),
        }
    }

    fn list(
        &mut self,
        items: &[Value],
        definition: Option<&TermDefinition>,
        ctx: &Context,
    ) -> Result<RdfTerm> {
        let mut members = Vec::with_capacity(items.len());
        for item in items {
            if item.is_array() {
                return Err(Error::Parse("lists of lists are not supported".into()));
            }
            members.extend(self.object(item, definition, ctx)?);
        }

        let mut head = RdfTerm::iri(iris::RDF_NIL);
        for member in members.into_iter().rev() {
            let cell = self.fresh_blank();
            self.push(cell.clone(), iris::RDF_FIRST, member);
            self.push(cell.clone(), iris::RDF_REST, head);
            head = cell;
        }
        Ok(head)
    }

    fn object(
        &mut self,
        value: &Value,
        definition: Option<&TermDefinition>,
        ctx: &Context,
    ) -> Result<Option<RdfTerm>> {
        let coerce = definition.and_then(|d| d.coerce.as_deref());
        let datatype = coerce.filter(|c| !c.starts_with('@'));

        let term = match value {
            Value::Null => None,
            Value::String(s) => match coerce {
                Some("@id") => self.reference(s, ctx, false),
                Some("@vocab") => self.reference(s, ctx, true),
                Some(dt) => Some(RdfTerm::typed_literal(s.as_str(), dt)),
                None => Some(match &ctx.language {
                    Some(lang) => RdfTerm::lang_literal(s.as_str(), lang.as_str()),
                    None => RdfTerm::literal(s.as_str()),
                }),
            },
            Value::Bool(b) => Some(RdfTerm::typed_literal(
                b.to_string(),
                datatype.unwrap_or(iris::XSD_BOOLEAN),
            )),
            Value::Number(n) => {
                let (lexical, default_type) = number_lexical(n);
                Some(RdfTerm::typed_literal(
                    lexical,
                    datatype.unwrap_or(default_type),
                ))
            }
            Value::Object(map) => match ctx.keyword_entry(map, "@value") {
                Some(inner) => self.value_object(map, inner, ctx)?,
                None => Some(self.node(map, ctx)?),
            },
            Value::Array(_) => {
                return Err(Error::Parse("nested arrays are not supported here".into()))
            }
        };
        Ok(term)
    }

    fn value_object(
        &mut self,
        map: &Map<String, Value>,
        inner: &Value,
        ctx: &Context,
    ) -> Result<Option<RdfTerm>> {
        let datatype = match ctx.keyword_entry(map, "@type") {
            None => None,
            Some(Value::String(t)) => ctx.expand_iri(t, true),
            Some(_) => return Err(Error::Parse("@type of a value must be a string".into())),
        };
        let language = match ctx.keyword_entry(map, "@language") {
            None => None,
            Some(Value::String(l)) => Some(l.as_str()),
            Some(_) => return Err(Error::Parse("@language must be a string".into())),
        };

        let (lexical, default_type) = match inner {
            Value::Null => return Ok(None),
            Value::String(s) => (s.clone(), None),
            Value::Bool(b) => (b.to_string(), Some(iris::XSD_BOOLEAN)),
            Value::Number(n) => {
                let (lexical, dt) = number_lexical(n);
                (lexical, Some(dt))
            }
            _ => return Err(Error::Parse("@value must be a scalar".into())),
        };

        Ok(Some(match (datatype, language, default_type) {
            (Some(dt), _, _) => RdfTerm::typed_literal(lexical, dt),
            (None, Some(lang), None) => RdfTerm::lang_literal(lexical, lang),
            (None, _, Some(dt)) => RdfTerm::typed_literal(lexical, dt),
            (None, None, None) => RdfTerm::literal(lexical),
        }))
    }
}

fn well_formed(term: &RdfTerm) -> bool {
    match term {
        RdfTerm::Iri(iri) => Iri::parse(iri.as_str()).is_ok(),
        RdfTerm::Literal {
            datatype: Some(datatype),
            ..
        } => Iri::parse(datatype.as_str()).is_ok(),
        _ => true,
    }
}

/// Canonical lexical form of a native JSON number: integral values below
/// 10^21 are `xsd:integer`, anything else `xsd:double` as `d.dddE±n`.
fn number_lexical(n: &serde_json::Number) -> (String, &'static str) {
    if n.is_i64() || n.is_u64() {
        return (n.to_string(), iris::XSD_INTEGER);
    }
    let f = n.as_f64().unwrap_or_default();
    if f.fract() == 0.0 && f.abs() < 1e21 {
        let lexical = if f == 0.0 { "0".to_string() } else { format!("{:.0}", f) };
        return (lexical, iris::XSD_INTEGER);
    }
    (canonical_double(f), iris::XSD_DOUBLE)
}

fn canonical_double(f: f64) -> String {
    let formatted = format!("{:E}", f);
    match formatted.split_once('E') {
        Some((mantissa, exponent)) if !mantissa.contains('.') => {
            format!("{}.0E{}", mantissa, exponent)
        }
        _ => formatted,
    }
}

fn one_or_many(value: &Value) -> &[Value] {
    match value {
        Value::Array(items) => items.as_slice(),
        single => std::slice::from_ref(single),
    }
}

/// Parser for JSON-LD documents
pub struct JsonLdParser;

impl JsonLdParser {
    /// Parse a JSON-LD document with no base IRI; relative references are dropped.
    pub fn parse(content: &str) -> Result<Vec<RdfTriple>> {
        Self::parse_with_base(content, None)
    }

    /// Parse a JSON-LD document, resolving relative `@id`s against `base`.
    pub fn parse_with_base(content: &str, base: Option<&str>) -> Result<Vec<RdfTriple>> {
        let document: Value = serde_json::from_str(content)?;
        let ctx = Context::new(base);
        let mut expander = Expander::default();

        match &document {
            Value::Array(items) => {
                for item in items {
                    expander.top_level(item, &ctx)?;
                }
            }
            Value::Object(_) => expander.top_level(&document, &ctx)?,
            _ => {
                return Err(Error::Parse(
                    "JSON-LD document must be an object or an array".into(),
                ))
            }
        }

        Ok(expander.triples)
    }
}

/// Serializer for compact JSON-LD documents
pub struct JsonLdSerializer {
    namespaces: NamespaceMap,
}

impl JsonLdSerializer {
    /// Create a serializer with the default namespaces
    pub fn new() -> Self {
        Self {
            namespaces: NamespaceMap::with_defaults(),
        }
    }

    /// Serialize triples to a pretty-printed JSON-LD string
    pub fn serialize<'a, I>(triples: I) -> Result<String>
    where
        I: IntoIterator<Item = &'a RdfTriple>,
    {
        let document = Self::new().to_value(triples)?;
        serde_json::to_string_pretty(&document).map_err(|e| Error::Serialization(e.to_string()))
    }

    /// Build the JSON-LD document as a `serde_json::Value`
    pub fn to_value<'a, I>(&self, triples: I) -> Result<Value>
    where
        I: IntoIterator<Item = &'a RdfTriple>,
    {
        let mut used = IndexSet::new();
        let mut nodes: IndexMap<&RdfTerm, Map<String, Value>> = IndexMap::new();

        for triple in triples {
            let predicate = match (&triple.subject, &triple.predicate) {
                (RdfTerm::Literal { .. }, _) | (_, RdfTerm::Literal { .. } | RdfTerm::BlankNode(_)) => {
                    return Err(Error::Serialization(format!(
                        "cannot write {:?} as a JSON-LD statement",
                        triple
                    )))
                }
                (_, RdfTerm::Iri(predicate)) => predicate.as_str(),
            };

            if !nodes.contains_key(&triple.subject) {
                let id = self.node_id(&triple.subject, &mut used);
                let mut node = Map::new();
                node.insert("@id".to_string(), Value::String(id));
                nodes.insert(&triple.subject, node);
            }

            let (key, value) = match &triple.object {
                RdfTerm::Iri(_) | RdfTerm::BlankNode(_) if predicate == iris::RDF_TYPE => (
                    "@type".to_string(),
                    Value::String(self.node_id(&triple.object, &mut used)),
                ),
                object => (
                    self.compact(predicate, &mut used),
                    self.object_value(object, &mut used),
                ),
            };

            if let Some(node) = nodes.get_mut(&triple.subject) {
                if let Value::Array(values) = node
                    .entry(key)
                    .or_insert_with(|| Value::Array(Vec::new()))
                {
                    values.push(value);
                }
            }
        }

        let mut context = Map::new();
        for (prefix, iri) in self.namespaces.prefixes() {
            if used.contains(prefix) {
                context.insert(prefix.to_string(), Value::String(iri.to_string()));
            }
        }

        let graph: Vec<Value> = nodes.into_values().map(Value::Object).collect();
        Ok(json!({
            "@context": context,
            "@graph": graph
        }))
    }

    fn compact(&self, iri: &str, used: &mut IndexSet<String>) -> String {
        match self.namespaces.split(iri) {
            Some((prefix, local)) => {
                used.insert(prefix.to_string());
                format!("{}:{}", prefix, local)
            }
            None => iri.to_string(),
        }
    }

    fn node_id(&self, term: &RdfTerm, used: &mut IndexSet<String>) -> String {
        match term {
            RdfTerm::Iri(iri) => self.compact(iri, used),
            RdfTerm::BlankNode(id) => format!("_:{}", id),
            RdfTerm::Literal { value, .. } => value.clone(),
        }
    }

    fn object_value(&self, term: &RdfTerm, used: &mut IndexSet<String>) -> Value {
        match term {
            RdfTerm::Iri(_) | RdfTerm::BlankNode(_) => json!({ "@id": self.node_id(term, used) }),
            RdfTerm::Literal {
                value,
                language: Some(lang),
                ..
            } => json!({ "@value": value, "@language": lang }),
            RdfTerm::Literal {
                value,
                datatype: Some(dt),
                ..
            } => json!({ "@value": value, "@type": self.compact(dt, used) }),
            RdfTerm::Literal { value, .. } => Value::String(value.clone()),
        }
    }
}

impl Default for JsonLdSerializer {
    fn default() -> Self {
        Self::new()
    }
}
