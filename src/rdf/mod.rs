//! RDF primitives consumed and produced by the mapper
//!
//! This module provides:
//! - RDF terms, triples and quads (wrapping oxrdf)
//! - A read-only indexed quad store view
//! - Namespace prefix tables for compact IRIs
//! - Text formats (Turtle, N-Triples, N-Quads, TriG) via rio
//!
//! # Example
//!
//! ```rust
//! use rdf_bean_mapper::rdf::{QuadStore, Triple, NamedNode, Literal, RdfPredicate};
//!
//! let mut store = QuadStore::new();
//!
//! let subject = NamedNode::new("http://example.org/alice").unwrap();
//! let predicate = RdfPredicate::new("http://xmlns.com/foaf/0.1/name").unwrap();
//! let object = Literal::new_simple_literal("Alice");
//!
//! store.insert_triple(Triple::new(subject.clone().into(), predicate.clone(), object.into()));
//!
//! let names: Vec<_> = store.objects(&subject.into(), &predicate).collect();
//! assert_eq!(names.len(), 1);
//! ```

mod namespace;
mod serialization;
mod store;
mod types;
pub mod vocab;

pub use types::{
    BlankNode, Literal, NamedNode, Quad, RdfError, RdfObject, RdfPredicate, RdfResult,
    RdfSubject, Triple,
};

pub use store::{QuadStore, QuadStoreError, QuadStoreResult};

pub use namespace::{NamespaceManager, PrefixError, PrefixResult, OPAQUE_SCHEMES};

pub use serialization::{
    ParseError, ParseResult, RdfFormat, RdfParser, RdfSerializer, SerializeError,
    SerializeResult,
};
