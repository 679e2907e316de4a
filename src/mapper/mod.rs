//! Bidirectional mapping between quads and object graphs
//!
//! [`RdfMapper`] is the entry point. It holds the frozen type registry and
//! the configuration, and offers both directions:
//! - quads → instances (`deserialize*`), driven by the registered beans
//! - instances → quads (`serialize*`)
//!
//! Each call builds its own engine state (resolution cache or visited set),
//! so one mapper can serve any number of concurrent callers.
//!
//! # Example
//!
//! ```rust
//! use rdf_bean_mapper::bean::{BeanDescriptor, Field, Instance, ObjectGraph, TypeRegistry, XsdType};
//! use rdf_bean_mapper::mapper::RdfMapper;
//! use rdf_bean_mapper::rdf::QuadStore;
//!
//! let mut registry = TypeRegistry::new();
//! registry.register(
//!     BeanDescriptor::builder("Person")
//!         .namespace("foaf", "http://xmlns.com/foaf/0.1/")
//!         .namespace("person", "http://example.com/Person/")
//!         .rdf_type("foaf:Person")
//!         .subject("person", "uuid")
//!         .field(Field::scalar("name", "foaf:name", XsdType::String))
//!         .build()
//!         .unwrap(),
//! );
//! let mapper = RdfMapper::new(registry);
//!
//! let mut graph = ObjectGraph::new();
//! let root = graph.add(Instance::new("Person").with("uuid", "1").with("name", "David"));
//! let quads = mapper.serialize(&graph, root).unwrap();
//!
//! let back = mapper.deserialize("Person", &QuadStore::from_quads(quads)).unwrap();
//! assert_eq!(back.root().unwrap().get_str("name"), Some("David"));
//! ```

mod config;
mod custom;
mod deferred;
mod deserialize;
mod error;
mod serialize;
mod typed;

pub use config::MapperConfig;
pub use custom::{BlankNodeMinter, FieldSerializer, SerializerContext};
pub use deferred::Deferred;
pub use deserialize::Deserialized;
pub use error::{Diagnostic, DiagnosticKind, MappingError, MappingResult};
pub use typed::{expect_bean, nested_bean, nested_beans, RdfBean};

use crate::bean::{InstanceId, ObjectGraph, TypeRegistry};
use crate::rdf::{Quad, QuadStore, RdfFormat, RdfParser, RdfSerializer, RdfSubject};
use deserialize::Deserializer;
use serialize::Serializer;
use std::sync::Arc;
use tracing::debug;

/// Mapping entry point
#[derive(Debug, Clone)]
pub struct RdfMapper {
    registry: Arc<TypeRegistry>,
    config: MapperConfig,
}

impl RdfMapper {
    /// Create a mapper with the default configuration
    pub fn new(registry: TypeRegistry) -> Self {
        Self::with_config(registry, MapperConfig::default())
    }

    /// Create a mapper with an explicit configuration
    pub fn with_config(registry: TypeRegistry, config: MapperConfig) -> Self {
        debug!(beans = registry.len(), "mapper created");
        Self {
            registry: Arc::new(registry),
            config,
        }
    }

    /// Share an already frozen registry
    pub fn from_shared(registry: Arc<TypeRegistry>, config: MapperConfig) -> Self {
        Self { registry, config }
    }

    pub fn registry(&self) -> &Arc<TypeRegistry> {
        &self.registry
    }

    pub fn config(&self) -> &MapperConfig {
        &self.config
    }

    /// Deserialize the outer-most subject typed with `bean`'s class
    pub fn deserialize(&self, bean: &str, store: &QuadStore) -> MappingResult<Deserialized> {
        Deserializer::new(&self.registry, store, &self.config).deserialize(bean)
    }

    /// Deserialize a given subject as `bean`
    pub fn deserialize_subject(
        &self,
        bean: &str,
        store: &QuadStore,
        subject: &RdfSubject,
    ) -> MappingResult<Deserialized> {
        Deserializer::new(&self.registry, store, &self.config).deserialize_subject(bean, subject)
    }

    /// Deserialize every subject typed with `bean`'s class
    pub fn deserialize_all(&self, bean: &str, store: &QuadStore) -> MappingResult<Deserialized> {
        Deserializer::new(&self.registry, store, &self.config).deserialize_all(bean)
    }

    /// [`deserialize`](Self::deserialize), delivered through a [`Deferred`]
    pub fn deserialize_async(&self, bean: &str, store: &QuadStore) -> Deferred<Deserialized> {
        Deferred::run(|| self.deserialize(bean, store))
    }

    /// Serialize `root` and everything reachable from it
    pub fn serialize(&self, graph: &ObjectGraph, root: InstanceId) -> MappingResult<Vec<Quad>> {
        Serializer::new(&self.registry, graph, &self.config)?.serialize(root)
    }

    /// [`serialize`](Self::serialize), delivered through a [`Deferred`]
    pub fn serialize_async(&self, graph: &ObjectGraph, root: InstanceId) -> Deferred<Vec<Quad>> {
        Deferred::run(|| self.serialize(graph, root))
    }

    /// Deserialize into a typed bean
    pub fn deserialize_bean<T: RdfBean + 'static>(&self, store: &QuadStore) -> MappingResult<T> {
        let descriptor = self.registry.lookup_bean::<T>()?;
        let result = self.deserialize(descriptor.name(), store)?;
        let root = result.root_id().ok_or_else(|| MappingError::NoMatchingSubject {
            bean: descriptor.name().to_string(),
            type_iri: descriptor.type_iri().as_str().to_string(),
        })?;
        if !result.graph.is_acyclic_from(root) {
            return Err(MappingError::CyclicProjection {
                bean: descriptor.name().to_string(),
            });
        }
        T::from_instance(&result.graph, root)
    }

    /// [`deserialize_bean`](Self::deserialize_bean), delivered through a [`Deferred`]
    pub fn deserialize_bean_async<T: RdfBean + 'static>(&self, store: &QuadStore) -> Deferred<T> {
        Deferred::run(|| self.deserialize_bean(store))
    }

    /// Serialize a typed bean
    pub fn serialize_bean<T: RdfBean>(&self, bean: &T) -> MappingResult<Vec<Quad>> {
        let mut graph = ObjectGraph::new();
        let root = bean.to_instance(&mut graph)?;
        self.serialize(&graph, root)
    }

    /// [`serialize_bean`](Self::serialize_bean), delivered through a [`Deferred`]
    pub fn serialize_bean_async<T: RdfBean>(&self, bean: &T) -> Deferred<Vec<Quad>> {
        Deferred::run(|| self.serialize_bean(bean))
    }

    /// Parse Turtle and deserialize `bean` from it
    pub fn deserialize_turtle(&self, bean: &str, turtle: &str) -> MappingResult<Deserialized> {
        let store = RdfParser::parse(turtle, RdfFormat::Turtle)?;
        self.deserialize(bean, &store)
    }

    /// Parse Turtle into a typed bean
    pub fn from_turtle<T: RdfBean + 'static>(&self, turtle: &str) -> MappingResult<T> {
        let store = RdfParser::parse(turtle, RdfFormat::Turtle)?;
        self.deserialize_bean(&store)
    }

    /// [`from_turtle`](Self::from_turtle), delivered through a [`Deferred`]
    pub fn from_turtle_async<T: RdfBean + 'static>(&self, turtle: &str) -> Deferred<T> {
        Deferred::run(|| self.from_turtle(turtle))
    }

    /// Serialize a typed bean as Turtle
    pub fn to_turtle<T: RdfBean>(&self, bean: &T) -> MappingResult<String> {
        let quads = self.serialize_bean(bean)?;
        Ok(RdfSerializer::serialize(&quads, RdfFormat::Turtle)?)
    }
}
