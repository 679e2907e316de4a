//! RDF text formats
//!
//! The mapping core works on quads only; this module is the adapter to the
//! rio parsers and formatters that turn text into a [`QuadStore`] and back.
//!
//! Supports:
//! - Turtle (TTL)
//! - N-Triples (NT)
//! - N-Quads (NQ)
//! - TriG (parse only)

mod turtle;

use super::{Quad, QuadStore};
use thiserror::Error;

/// RDF serialization format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RdfFormat {
    /// Turtle format (.ttl)
    Turtle,
    /// N-Triples format (.nt)
    NTriples,
    /// N-Quads format (.nq)
    NQuads,
    /// TriG format (.trig)
    TriG,
}

impl RdfFormat {
    /// Guess the format from a file extension
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.to_ascii_lowercase().as_str() {
            "ttl" | "turtle" => Some(RdfFormat::Turtle),
            "nt" => Some(RdfFormat::NTriples),
            "nq" => Some(RdfFormat::NQuads),
            "trig" => Some(RdfFormat::TriG),
            _ => None,
        }
    }
}

/// Parse errors
#[derive(Error, Debug)]
pub enum ParseError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Syntax error reported by the parser
    #[error("Parse error: {0}")]
    Syntax(#[from] rio_turtle::TurtleError),

    /// Term the mapping model cannot hold
    #[error("Unsupported term: {0}")]
    Unsupported(String),

    /// Invalid base IRI
    #[error("Invalid base IRI: {0}")]
    InvalidBase(String),
}

pub type ParseResult<T> = Result<T, ParseError>;

/// Serialization errors
#[derive(Error, Debug)]
pub enum SerializeError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Output was not valid UTF-8
    #[error("Serialization error: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),

    /// Unsupported format
    #[error("Unsupported format: {0:?}")]
    UnsupportedFormat(RdfFormat),
}

pub type SerializeResult<T> = Result<T, SerializeError>;

/// RDF parser
pub struct RdfParser;

impl RdfParser {
    /// Parse RDF text into a quad store
    pub fn parse(input: &str, format: RdfFormat) -> ParseResult<QuadStore> {
        Self::parse_with_base(input, format, None)
    }

    /// Parse RDF text, resolving relative IRIs against `base_iri`
    pub fn parse_with_base(
        input: &str,
        format: RdfFormat,
        base_iri: Option<&str>,
    ) -> ParseResult<QuadStore> {
        let quads = match format {
            RdfFormat::Turtle => turtle::parse_turtle(input, base_iri)?,
            RdfFormat::NTriples => turtle::parse_ntriples(input)?,
            RdfFormat::NQuads => turtle::parse_nquads(input)?,
            RdfFormat::TriG => turtle::parse_trig(input, base_iri)?,
        };
        tracing::debug!(count = quads.len(), ?format, "parsed quads");
        Ok(QuadStore::from_quads(quads))
    }

    /// Parse RDF data from a file, picking the format from its extension
    pub fn parse_file(path: &std::path::Path) -> ParseResult<QuadStore> {
        let format = path
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(RdfFormat::from_extension)
            .ok_or_else(|| ParseError::Unsupported(path.display().to_string()))?;
        let input = std::fs::read_to_string(path)?;
        Self::parse(&input, format)
    }
}

/// RDF serializer
pub struct RdfSerializer;

impl RdfSerializer {
    /// Serialize quads to a string
    ///
    /// Turtle and N-Triples drop graph labels.
    pub fn serialize(quads: &[Quad], format: RdfFormat) -> SerializeResult<String> {
        match format {
            RdfFormat::Turtle => turtle::format_turtle(quads),
            RdfFormat::NTriples => turtle::format_ntriples(quads),
            RdfFormat::NQuads => turtle::format_nquads(quads),
            RdfFormat::TriG => Err(SerializeError::UnsupportedFormat(format)),
        }
    }

    /// Serialize a whole store
    pub fn serialize_store(store: &QuadStore, format: RdfFormat) -> SerializeResult<String> {
        let quads: Vec<Quad> = store.iter().cloned().collect();
        Self::serialize(&quads, format)
    }
}
