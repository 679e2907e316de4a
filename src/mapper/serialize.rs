//! Serialization engine
//!
//! Turns an instance and everything reachable from it into quads. The
//! visited set maps each [`InstanceId`] to the subject it was given and is
//! filled before the instance's fields are walked, so a reference back to an
//! instance still being written only costs one link quad. A named subject
//! is written once per call even when several instances carry it.
//!
//! Emission order is fixed: for each instance its `rdf:type` quad, then its
//! fields in declaration order, list items in list order. A nested value is
//! written out in full before the quad linking it to its parent.
//!
//! Instances being written sit on an explicit stack of [`Frame`]s rather
//! than the call stack, so nesting depth is bounded by `max_depth` only.

use super::config::MapperConfig;
use super::custom::{check_subjects, BlankNodeMinter, FieldSerializer, SerializerContext};
use super::error::{MappingError, MappingResult};
use crate::bean::{
    BeanDescriptor, FieldDescriptor, FieldKind, FieldValue, Instance, InstanceId, LiteralCodec,
    ObjectGraph, ScalarValue, TypeRegistry,
};
use crate::rdf::vocab::rdf;
use crate::rdf::{NamedNode, Quad, RdfObject, RdfPredicate, RdfSubject};
use rustc_hash::{FxHashMap, FxHashSet};
use std::sync::Arc;
use tracing::{debug, trace};

/// An instance whose fields are being written
struct Frame<'g> {
    bean: Arc<BeanDescriptor>,
    instance: &'g Instance,
    subject: RdfSubject,
    /// Cursor into `bean.fields()`
    field: usize,
    /// Cursor into the current field's items
    item: usize,
}

/// Outcome of starting to write an instance
enum Opened {
    /// Nothing left to write for the subject
    Written(RdfSubject),
    /// A frame was pushed; the subject is complete once it is popped
    Pending(RdfSubject),
}

/// Per-call serialization state
pub(crate) struct Serializer<'a> {
    registry: &'a TypeRegistry,
    graph: &'a ObjectGraph,
    config: &'a MapperConfig,
    codec: LiteralCodec,
    rdf_type: RdfPredicate,
    output_graph: Option<NamedNode>,
    visited: FxHashMap<InstanceId, RdfSubject>,
    written: FxHashSet<RdfSubject>,
    minter: BlankNodeMinter,
    quads: Vec<Quad>,
}

impl<'a> Serializer<'a> {
    pub(crate) fn new(
        registry: &'a TypeRegistry,
        graph: &'a ObjectGraph,
        config: &'a MapperConfig,
    ) -> MappingResult<Self> {
        let rdf_type = RdfPredicate::new(rdf::TYPE).map_err(|e| MappingError::InvalidIri {
            iri: rdf::TYPE.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self {
            registry,
            graph,
            config,
            codec: LiteralCodec::new(config.strict_datatypes),
            rdf_type,
            output_graph: config.output_graph_node()?,
            visited: FxHashMap::default(),
            written: FxHashSet::default(),
            minter: BlankNodeMinter::new(&config.blank_node_prefix),
            quads: Vec::new(),
        })
    }

    /// Serialize `root` and everything reachable from it
    pub(crate) fn serialize(mut self, root: InstanceId) -> MappingResult<Vec<Quad>> {
        let mut stack = Vec::new();
        let subject = match self.open(root, &mut stack)? {
            Opened::Written(subject) => subject,
            Opened::Pending(subject) => {
                self.drain(&mut stack)?;
                subject
            }
        };
        debug!(
            root = %subject,
            instances = self.visited.len(),
            quads = self.quads.len(),
            blank_nodes = self.minter.minted(),
            "serialized"
        );
        Ok(self.quads)
    }

    /// Start writing an instance: emit its `rdf:type` quad and push a frame
    fn open(&mut self, id: InstanceId, stack: &mut Vec<Frame<'a>>) -> MappingResult<Opened> {
        if let Some(subject) = self.visited.get(&id) {
            trace!(instance = %id, subject = %subject, "already serialized");
            return Ok(Opened::Written(subject.clone()));
        }
        let graph = self.graph;
        let instance = graph.instance(id)?;
        let bean = self.registry.lookup(instance.bean())?;
        let subject = self.subject_of(&bean, instance)?;
        if subject.is_named_node() && self.written.contains(&subject) {
            trace!(instance = %id, subject = %subject, "subject written by another instance");
            self.visited.insert(id, subject.clone());
            return Ok(Opened::Written(subject));
        }
        if stack.len() >= self.config.max_depth {
            return Err(MappingError::RecursionLimitExceeded {
                limit: self.config.max_depth,
                subject: subject.to_string(),
            });
        }

        trace!(instance = %id, subject = %subject, bean = bean.name(), "serializing");
        self.visited.insert(id, subject.clone());
        if subject.is_named_node() {
            self.written.insert(subject.clone());
        }
        self.emit(
            subject.clone(),
            self.rdf_type.clone(),
            bean.type_iri().clone().into(),
        );
        stack.push(Frame {
            bean,
            instance,
            subject: subject.clone(),
            field: 0,
            item: 0,
        });
        Ok(Opened::Pending(subject))
    }

    /// Write frames until the stack is empty
    fn drain(&mut self, stack: &mut Vec<Frame<'a>>) -> MappingResult<()> {
        while let Some(frame) = stack.last_mut() {
            let bean = Arc::clone(&frame.bean);
            let Some(field) = bean.fields().get(frame.field) else {
                if let Some(done) = stack.pop() {
                    if let Some(parent) = stack.last_mut() {
                        self.link(parent, done.subject);
                    }
                }
                continue;
            };
            let subject = frame.subject.clone();
            let instance = frame.instance;
            let Some(value) = instance.get(field.name()) else {
                frame.field += 1;
                continue;
            };
            if let FieldKind::Custom { serializer } = field.kind() {
                frame.field += 1;
                self.write_custom(&bean, field, &subject, serializer.as_ref(), value)?;
                continue;
            }
            let Some(item) = value.items().get(frame.item) else {
                frame.field += 1;
                frame.item = 0;
                continue;
            };
            if let Some(object) = self.write_item(&bean, field, &subject, item, stack)? {
                self.emit(subject, field.predicate().clone(), object);
                if let Some(frame) = stack.last_mut() {
                    frame.item += 1;
                }
            }
        }
        Ok(())
    }

    /// Emit the quad linking `parent`'s current item to its finished child
    fn link(&mut self, parent: &mut Frame<'a>, child: RdfSubject) {
        if let Some(field) = parent.bean.fields().get(parent.field) {
            self.quads.push(Quad::new(
                parent.subject.clone(),
                field.predicate().clone(),
                child.into(),
                self.output_graph.clone(),
            ));
        }
        parent.item += 1;
    }

    /// Template IRI when the identity field is set, otherwise a fresh blank node
    fn subject_of(&mut self, bean: &BeanDescriptor, instance: &Instance) -> MappingResult<RdfSubject> {
        if let Some(template) = bean.subject_template() {
            let id = instance
                .get_scalar(template.id_field())
                .and_then(identifier)
                .filter(|id| !id.is_empty());
            if let Some(id) = id {
                return Ok(template.subject_for(&id)?.into());
            }
        }
        Ok(self.minter.mint()?.into())
    }

    fn write_custom(
        &mut self,
        bean: &BeanDescriptor,
        field: &FieldDescriptor,
        subject: &RdfSubject,
        serializer: &dyn FieldSerializer,
        value: &FieldValue,
    ) -> MappingResult<()> {
        let mut ctx = SerializerContext::new(
            subject,
            field.predicate(),
            self.output_graph.as_ref(),
            &mut self.minter,
        );
        let quads = serializer
            .serialize(value, &mut ctx)
            .map_err(|source| MappingError::CustomSerializer {
                bean: bean.name().to_string(),
                field: field.name().to_string(),
                subject: subject.to_string(),
                source,
            })?;
        check_subjects(field.name(), subject, &quads)?;
        self.quads.extend(quads);
        Ok(())
    }

    /// Object term for one value
    ///
    /// `None` means a nested instance was pushed; its link quad is emitted
    /// once it is popped.
    fn write_item(
        &mut self,
        bean: &BeanDescriptor,
        field: &FieldDescriptor,
        subject: &RdfSubject,
        item: &FieldValue,
        stack: &mut Vec<Frame<'a>>,
    ) -> MappingResult<Option<RdfObject>> {
        let invalid = |expected: &'static str| MappingError::InvalidFieldValue {
            bean: bean.name().to_string(),
            field: field.name().to_string(),
            expected,
            found: value_kind(item),
        };

        match (field.kind(), item) {
            (FieldKind::Scalar { datatype }, FieldValue::Scalar(scalar)) => {
                let literal = self
                    .codec
                    .encode(scalar, *datatype, field.language())
                    .map_err(|source| MappingError::DatatypeMismatch {
                        bean: bean.name().to_string(),
                        field: field.name().to_string(),
                        subject: subject.to_string(),
                        predicate: field.predicate().as_str().to_string(),
                        source,
                    })?;
                Ok(Some(literal.into()))
            }
            (FieldKind::Scalar { .. }, _) => Err(invalid("scalar")),
            (
                FieldKind::Resource,
                FieldValue::Scalar(ScalarValue::Iri(iri) | ScalarValue::String(iri)),
            ) => NamedNode::new(iri)
                .map(|node| Some(node.into()))
                .map_err(|e| MappingError::InvalidIri {
                    iri: iri.clone(),
                    reason: e.to_string(),
                }),
            (FieldKind::Resource, _) => Err(invalid("IRI")),
            (FieldKind::Nested { bean: nested }, FieldValue::Object(child)) => {
                let found = self.graph.instance(*child)?.bean();
                if found != nested.as_str() {
                    return Err(MappingError::UnexpectedBean {
                        expected: nested.clone(),
                        found: found.to_string(),
                    });
                }
                match self.open(*child, stack)? {
                    Opened::Written(child) => Ok(Some(child.into())),
                    Opened::Pending(_) => Ok(None),
                }
            }
            (FieldKind::Nested { .. }, _) => Err(invalid("object")),
            (FieldKind::Custom { .. }, _) => Err(invalid("custom value")),
        }
    }

    fn emit(&mut self, subject: RdfSubject, predicate: RdfPredicate, object: RdfObject) {
        self.quads
            .push(Quad::new(subject, predicate, object, self.output_graph.clone()));
    }
}

/// Identity field value as it appears in the subject IRI
fn identifier(value: &ScalarValue) -> Option<String> {
    match value {
        ScalarValue::Integer(i) => Some(i.to_string()),
        other => other.as_str().map(str::to_string),
    }
}

fn value_kind(value: &FieldValue) -> &'static str {
    match value {
        FieldValue::Scalar(_) => "scalar",
        FieldValue::Object(_) => "object",
        FieldValue::List(_) => "nested list",
        FieldValue::Raw(_) => "raw value",
    }
}
