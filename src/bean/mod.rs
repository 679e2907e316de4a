//! Object model and mapping metadata
//!
//! This module provides:
//! - Bean and field descriptors (the per-class mapping metadata)
//! - The type registry the engines consult
//! - Instances and the arena that holds them
//! - The literal codec between RDF literals and native scalars

mod codec;
mod descriptor;
mod instance;
mod registry;
mod value;

pub use codec::{CodecError, CodecResult, LiteralCodec, XsdType};
pub use descriptor::{
    BeanDescriptor, BeanDescriptorBuilder, Cardinality, Field, FieldDescriptor, FieldKind,
    MissingFieldPolicy, SubjectTemplate,
};
pub use instance::{Instance, InstanceId, ObjectGraph};
pub use registry::TypeRegistry;
pub use value::{FieldValue, ScalarValue};
