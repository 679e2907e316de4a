//! Strongly-typed beans
//!
//! [`RdfBean`] connects a Rust struct to its descriptor and to the
//! [`ObjectGraph`] the engines work on. A struct implementing it can be read
//! with [`RdfMapper::deserialize_bean`](super::RdfMapper::deserialize_bean)
//! and written with [`RdfMapper::serialize_bean`](super::RdfMapper::serialize_bean).
//!
//! Owned structs cannot share children, so reading a bean whose graph
//! contains a cycle fails with [`MappingError::CyclicProjection`](super::MappingError::CyclicProjection);
//! cyclic data stays on the arena API.

use super::error::{MappingError, MappingResult};
use crate::bean::{BeanDescriptor, InstanceId, ObjectGraph, TypeRegistry};

/// A Rust type with an RDF mapping
pub trait RdfBean: Sized {
    /// Mapping metadata of the type
    fn descriptor() -> MappingResult<BeanDescriptor>;

    /// Register the beans this one nests
    fn register_dependencies(_registry: &mut TypeRegistry) -> MappingResult<()> {
        Ok(())
    }

    /// Build the value from an instance of its bean
    fn from_instance(graph: &ObjectGraph, id: InstanceId) -> MappingResult<Self>;

    /// Add the value, and everything it owns, to `graph`
    fn to_instance(&self, graph: &mut ObjectGraph) -> MappingResult<InstanceId>;
}

/// Read an optional nested bean
pub fn nested_bean<T: RdfBean>(
    graph: &ObjectGraph,
    id: Option<InstanceId>,
) -> MappingResult<Option<T>> {
    id.map(|id| T::from_instance(graph, id)).transpose()
}

/// Read a repeated nested bean
pub fn nested_beans<T: RdfBean>(graph: &ObjectGraph, ids: &[InstanceId]) -> MappingResult<Vec<T>> {
    ids.iter().map(|id| T::from_instance(graph, *id)).collect()
}

/// Fail unless the instance carries the expected bean name
pub fn expect_bean(graph: &ObjectGraph, id: InstanceId, bean: &str) -> MappingResult<()> {
    let instance = graph.instance(id)?;
    if instance.bean() != bean {
        return Err(MappingError::UnexpectedBean {
            expected: bean.to_string(),
            found: instance.bean().to_string(),
        });
    }
    Ok(())
}
