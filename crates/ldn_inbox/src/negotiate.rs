//! Content negotiation between HTTP media types and RDF formats.

use ldn_graph::RdfFormat;

use crate::error::{Error, Result};

/// The media types and aliases the inbox reads and writes, in match priority.
pub const SUPPORTED_MEDIA_TYPES: [&str; 5] = [
    "application/ld+json",
    "text/turtle",
    "application/ld+json; profile=\"https://www.w3.org/ns/activitystreams\"",
    "turtle",
    "json-ld",
];

/// Served when the client expresses no usable preference.
pub const DEFAULT_MEDIA_TYPE: &str = "application/ld+json";

/// The outcome of negotiating an `Accept` header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Negotiated {
    pub format: RdfFormat,
    /// Echoed back verbatim as the response `Content-Type`.
    pub content_type: String,
}

/// Picks the response format for an `Accept` header.
///
/// Missing, empty, `*/*` and browser (`text/html`) headers get JSON-LD.
/// Otherwise the header must be exactly one of [`SUPPORTED_MEDIA_TYPES`].
pub fn negotiate(accept: Option<&str>) -> Result<Negotiated> {
    match accept {
        None => Ok(default_format()),
        Some(value) if value.is_empty() || value == "*/*" || value.contains("text/html") => {
            Ok(default_format())
        }
        Some(value) => match format_of(value) {
            Some(format) => Ok(Negotiated {
                format,
                content_type: value.to_string(),
            }),
            None => Err(Error::UnsupportedMediaType(value.to_string())),
        },
    }
}

/// Detects the payload format from a `Content-Type` header.
///
/// Matches by substring so parameters such as `charset` are tolerated; the
/// first supported media type found in the header wins.
pub fn content_type_format(content_type: Option<&str>) -> Option<(&'static str, RdfFormat)> {
    let header = content_type?;
    SUPPORTED_MEDIA_TYPES
        .iter()
        .find(|media_type| header.contains(*media_type))
        .and_then(|media_type| format_of(media_type).map(|format| (*media_type, format)))
}

/// Canonicalizes a media type or alias into a registry short code.
///
/// Unrecognized input falls back to `jsonld`.
pub fn simplify(mime: &str) -> &'static str {
    format_of(mime).unwrap_or_default().short_code()
}

fn default_format() -> Negotiated {
    Negotiated {
        format: RdfFormat::JsonLd,
        content_type: DEFAULT_MEDIA_TYPE.to_string(),
    }
}

fn format_of(media_type: &str) -> Option<RdfFormat> {
    match media_type {
        "text/turtle" | "turtle" => Some(RdfFormat::Turtle),
        other if SUPPORTED_MEDIA_TYPES.contains(&other) => Some(RdfFormat::JsonLd),
        _ => None,
    }
}
