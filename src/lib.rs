//! RDF Bean Mapper
//!
//! Metadata-driven, bidirectional mapping between RDF quads and typed object
//! graphs. Classes are described once (rdf:type, subject template, one
//! descriptor per field) and registered; the mapper then reads instances out
//! of a quad store and writes instances back as quads.
//!
//! # Modules
//!
//! - [`rdf`]: terms, quads, the indexed quad store, namespaces and text formats
//! - [`bean`]: descriptors, the type registry, instances and the literal codec
//! - [`mapper`]: the deserialization and serialization engines behind [`RdfMapper`]
//!
//! # Guarantees
//!
//! - A subject reached several times during one call becomes one instance,
//!   and cyclic data terminates in both directions.
//! - Output is deterministic: candidates and field objects are visited in
//!   lexical order, quads are emitted in declaration order.
//! - Without custom serializers, deserializing the output of `serialize`
//!   yields a structurally equal graph (blank node labels aside).
//!
//! ## Example Usage
//!
//! ```rust
//! use rdf_bean_mapper::bean::{BeanDescriptor, Field, TypeRegistry, XsdType};
//! use rdf_bean_mapper::RdfMapper;
//!
//! let mut registry = TypeRegistry::new();
//! registry.register(
//!     BeanDescriptor::builder("Person")
//!         .namespace("foaf", "http://xmlns.com/foaf/0.1/")
//!         .namespace("person", "http://example.com/Person/")
//!         .rdf_type("foaf:Person")
//!         .subject("person", "uuid")
//!         .field(Field::scalar("firstName", "foaf:firstName", XsdType::String))
//!         .build()
//!         .unwrap(),
//! );
//! let mapper = RdfMapper::new(registry);
//!
//! let turtle = r#"
//!     @prefix foaf: <http://xmlns.com/foaf/0.1/> .
//!     <http://example.com/Person/1234567> a foaf:Person ;
//!         foaf:firstName "David" .
//! "#;
//!
//! let result = mapper.deserialize_turtle("Person", turtle).unwrap();
//! let person = result.root().unwrap();
//! assert_eq!(person.get_str("uuid"), Some("1234567"));
//! assert_eq!(person.get_str("firstName"), Some("David"));
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]

pub mod bean;
pub mod mapper;
pub mod rdf;

// Re-export main types for convenience
pub use bean::{
    BeanDescriptor, Field, FieldValue, Instance, InstanceId, MissingFieldPolicy, ObjectGraph,
    ScalarValue, TypeRegistry, XsdType,
};

pub use mapper::{
    Deferred, Deserialized, Diagnostic, DiagnosticKind, FieldSerializer, MapperConfig,
    MappingError, MappingResult, RdfBean, RdfMapper, SerializerContext,
};

pub use rdf::{
    BlankNode, Literal, NamedNode, Quad, QuadStore, RdfFormat, RdfObject, RdfParser,
    RdfPredicate, RdfSerializer, RdfSubject, Triple,
};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get version string
pub fn version() -> &'static str {
    VERSION
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        let ver = version();
        assert!(!ver.is_empty());
        assert_eq!(ver, "1.0.0");
    }
}
