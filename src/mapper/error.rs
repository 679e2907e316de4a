//! Mapping errors and non-fatal diagnostics

use crate::bean::{CodecError, InstanceId};
use crate::rdf::{ParseError, SerializeError};
use std::fmt;
use thiserror::Error;

/// Mapping errors
#[derive(Error, Debug)]
pub enum MappingError {
    /// Class name or typed bean not in the registry
    #[error("Unregistered type: {0}")]
    UnregisteredType(String),

    /// Descriptor rejected at build time
    #[error("Invalid descriptor for {bean}: {reason}")]
    InvalidDescriptor { bean: String, reason: String },

    /// Two fields of one bean map to the same predicate
    #[error("Duplicate predicate {predicate} in {bean}")]
    DuplicatePredicate { bean: String, predicate: String },

    /// Invalid IRI
    #[error("Invalid IRI {iri}: {reason}")]
    InvalidIri { iri: String, reason: String },

    /// No subject of the bean's type in the store
    #[error("No subject of type {type_iri} found for {bean}")]
    NoMatchingSubject { bean: String, type_iri: String },

    /// Required field without a matching quad
    #[error("Missing required field {bean}.{field} ({predicate}) on {subject}")]
    MissingRequiredField {
        bean: String,
        field: String,
        subject: String,
        predicate: String,
    },

    /// Object of a required field cannot be read as its declared kind
    #[error("Datatype mismatch on {bean}.{field} ({predicate}) at {subject}: {source}")]
    DatatypeMismatch {
        bean: String,
        field: String,
        subject: String,
        predicate: String,
        #[source]
        source: CodecError,
    },

    /// A subject on the active resolution path was not in the cache
    #[error("Cycle through {subject} as {bean} reached without a cached instance")]
    CycleWithoutResolution { bean: String, subject: String },

    /// Nesting deeper than the configured limit
    #[error("Recursion limit {limit} exceeded at {subject}")]
    RecursionLimitExceeded { limit: usize, subject: String },

    /// Error raised inside a custom field serializer
    #[error("Custom serializer for {bean}.{field} failed at {subject}")]
    CustomSerializer {
        bean: String,
        field: String,
        subject: String,
        #[source]
        source: anyhow::Error,
    },

    /// A custom serializer emitted a quad about another named subject
    #[error("Custom serializer for {field} emitted a quad about {found}, expected {subject}")]
    InconsistentCustomSubject {
        field: String,
        subject: String,
        found: String,
    },

    /// Field value does not have the shape its descriptor expects
    #[error("Field {bean}.{field} expects {expected}, found {found}")]
    InvalidFieldValue {
        bean: String,
        field: String,
        expected: &'static str,
        found: &'static str,
    },

    /// Instance id not present in its graph
    #[error("Dangling instance reference: {0}")]
    DanglingReference(InstanceId),

    /// Instance of another bean where a typed value was expected
    #[error("Expected instance of {expected}, found {found}")]
    UnexpectedBean { expected: String, found: String },

    /// Cyclic graph requested as an owned typed value
    #[error("Cannot project cyclic graph into {bean}")]
    CyclicProjection { bean: String },

    /// Invalid mapper configuration
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Configuration file error
    #[error("Configuration parse error: {0}")]
    ConfigParse(#[from] serde_yaml::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// RDF text parse error
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    /// RDF text serialization error
    #[error("Serialization error: {0}")]
    Serialize(#[from] SerializeError),

    /// Deferred result dropped before completion
    #[error("Deferred mapping result was dropped")]
    Dropped,
}

pub type MappingResult<T> = Result<T, MappingError>;

/// Kind of a non-fatal finding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticKind {
    /// Several objects for a single-valued field; the lowest was kept
    AmbiguousCardinality,
    /// Object not readable as the declared kind; the field was left unset
    DatatypeMismatch,
    /// Required field missing under the `LeaveUnset` policy
    MissingRequiredField,
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DiagnosticKind::AmbiguousCardinality => "ambiguous cardinality",
            DiagnosticKind::DatatypeMismatch => "datatype mismatch",
            DiagnosticKind::MissingRequiredField => "missing required field",
        };
        f.write_str(name)
    }
}

/// Non-fatal finding recorded during deserialization
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub bean: String,
    pub field: String,
    pub subject: String,
    pub predicate: String,
    pub detail: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} on {}.{} ({}) at {}",
            self.kind, self.bean, self.field, self.predicate, self.subject
        )?;
        if !self.detail.is_empty() {
            write!(f, ": {}", self.detail)?;
        }
        Ok(())
    }
}
