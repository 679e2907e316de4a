//! Deserialization engine
//!
//! Walks a [`QuadStore`] from the subjects typed with a bean's class and
//! materializes instances into an [`ObjectGraph`]. One [`Deserializer`] is
//! created per call; its resolution cache maps (subject, bean) to the
//! instance built for it, and the entry is made before any field is read.
//! A subject reached again, through a cycle or a second referrer, therefore
//! resolves to the same instance, and recursion always terminates.
//!
//! The walk is deterministic: candidate subjects and field objects are
//! visited in lexical order of their IRI, blank node label or literal value.

use super::config::MapperConfig;
use super::error::{Diagnostic, DiagnosticKind, MappingError, MappingResult};
use crate::bean::{
    BeanDescriptor, CodecError, FieldDescriptor, FieldKind, FieldValue, Instance, InstanceId,
    LiteralCodec, MissingFieldPolicy, ObjectGraph, ScalarValue, TypeRegistry,
};
use crate::rdf::{QuadStore, RdfObject, RdfSubject};
use rustc_hash::{FxHashMap, FxHashSet};
use serde_json::Value;
use std::cmp::Ordering;
use std::sync::Arc;
use tracing::{debug, trace, warn};

/// Outcome of a deserialization call
#[derive(Debug, Clone)]
pub struct Deserialized {
    /// Every instance materialized by the call
    pub graph: ObjectGraph,
    /// Requested instances: the outer-most one, or all candidates
    pub roots: Vec<InstanceId>,
    /// Non-fatal findings, in the order they were made
    pub diagnostics: Vec<Diagnostic>,
}

impl Deserialized {
    pub fn root_id(&self) -> Option<InstanceId> {
        self.roots.first().copied()
    }

    pub fn root(&self) -> Option<&Instance> {
        self.root_id().and_then(|id| self.graph.get(id))
    }

    pub fn instance(&self, id: InstanceId) -> Option<&Instance> {
        self.graph.get(id)
    }

    /// JSON projection of the first root (`null` without one)
    pub fn to_json(&self) -> Value {
        self.root_id()
            .map(|id| self.graph.to_json(id))
            .unwrap_or(Value::Null)
    }
}

type CacheKey = (RdfSubject, String);

/// A subject whose fields are being read
struct Frame {
    key: CacheKey,
    id: InstanceId,
    subject: RdfSubject,
    bean: Arc<BeanDescriptor>,
    /// Cursor into `bean.fields()`
    field: usize,
    /// Sorted objects of the current field, once loaded
    objects: Option<Vec<RdfObject>>,
    /// Cursor into `objects`
    next: usize,
    /// Values read so far for the current field
    values: Vec<FieldValue>,
}

enum Opened {
    Cached(InstanceId),
    Pending(InstanceId),
}

/// Hand a finished instance to the frame that referenced it
fn deliver(stack: &mut [Frame], id: InstanceId) {
    if let Some(parent) = stack.last_mut() {
        parent.values.push(FieldValue::Object(id));
        parent.next += 1;
    }
}

/// Per-call deserialization state
pub(crate) struct Deserializer<'a> {
    registry: &'a TypeRegistry,
    store: &'a QuadStore,
    config: &'a MapperConfig,
    codec: LiteralCodec,
    graph: ObjectGraph,
    cache: FxHashMap<CacheKey, InstanceId>,
    active: FxHashSet<CacheKey>,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> Deserializer<'a> {
    pub(crate) fn new(
        registry: &'a TypeRegistry,
        store: &'a QuadStore,
        config: &'a MapperConfig,
    ) -> Self {
        Self {
            registry,
            store,
            config,
            codec: LiteralCodec::new(config.strict_datatypes),
            graph: ObjectGraph::new(),
            cache: FxHashMap::default(),
            active: FxHashSet::default(),
            diagnostics: Vec::new(),
        }
    }

    /// Materialize every candidate and return the outer-most one
    pub(crate) fn deserialize(mut self, bean_name: &str) -> MappingResult<Deserialized> {
        let bean = self.registry.lookup(bean_name)?;
        let candidates = self.candidates(&bean);
        debug!(
            bean = bean_name,
            candidates = candidates.len(),
            quads = self.store.len(),
            "deserializing"
        );

        let mut ids = Vec::with_capacity(candidates.len());
        for subject in &candidates {
            ids.push(self.resolve(subject, bean.name())?);
        }
        let root = match self.outermost(&candidates) {
            Some(position) => ids[position],
            None => {
                return Err(MappingError::NoMatchingSubject {
                    bean: bean.name().to_string(),
                    type_iri: bean.type_iri().as_str().to_string(),
                })
            }
        };
        Ok(self.finish(vec![root]))
    }

    /// Materialize one given subject, typed or not
    pub(crate) fn deserialize_subject(
        mut self,
        bean_name: &str,
        subject: &RdfSubject,
    ) -> MappingResult<Deserialized> {
        let bean = self.registry.lookup(bean_name)?;
        if !self.store.has_subject(subject) {
            return Err(MappingError::NoMatchingSubject {
                bean: bean.name().to_string(),
                type_iri: bean.type_iri().as_str().to_string(),
            });
        }
        debug!(bean = bean_name, subject = %subject, "deserializing subject");
        let root = self.resolve(subject, bean.name())?;
        Ok(self.finish(vec![root]))
    }

    /// Materialize every candidate, in lexical order
    pub(crate) fn deserialize_all(mut self, bean_name: &str) -> MappingResult<Deserialized> {
        let bean = self.registry.lookup(bean_name)?;
        let candidates = self.candidates(&bean);
        debug!(bean = bean_name, candidates = candidates.len(), "deserializing all");

        let mut roots = Vec::with_capacity(candidates.len());
        for subject in &candidates {
            roots.push(self.resolve(subject, bean.name())?);
        }
        Ok(self.finish(roots))
    }

    fn finish(self, roots: Vec<InstanceId>) -> Deserialized {
        debug!(
            instances = self.graph.len(),
            roots = roots.len(),
            diagnostics = self.diagnostics.len(),
            "deserialized"
        );
        Deserialized {
            graph: self.graph,
            roots,
            diagnostics: self.diagnostics,
        }
    }

    /// Subjects typed with the bean's class, in lexical order
    fn candidates(&self, bean: &BeanDescriptor) -> Vec<RdfSubject> {
        let mut subjects = self.store.subjects_of_type(bean.type_iri());
        subjects.sort_by(compare_subjects);
        subjects
    }

    /// Position of the first candidate no other candidate refers to
    ///
    /// When every candidate is referenced (a cycle), the first one wins.
    fn outermost(&self, candidates: &[RdfSubject]) -> Option<usize> {
        let unreferenced = candidates.iter().position(|candidate| {
            !candidates
                .iter()
                .any(|other| other != candidate && self.store.references(other, candidate))
        });
        unreferenced.or(if candidates.is_empty() { None } else { Some(0) })
    }

    /// Instance for `subject` read as `bean_name`, from the cache if present
    ///
    /// Subjects still being read sit on an explicit stack of [`Frame`]s, so
    /// nesting depth is bounded by `max_depth` only.
    fn resolve(&mut self, subject: &RdfSubject, bean_name: &str) -> MappingResult<InstanceId> {
        let mut stack = Vec::new();
        let root = match self.open(subject, bean_name, &mut stack)? {
            Opened::Cached(id) => return Ok(id),
            Opened::Pending(id) => id,
        };

        while let Some(frame) = stack.last_mut() {
            let bean = Arc::clone(&frame.bean);
            let subject = frame.subject.clone();
            let Some(field) = bean.fields().get(frame.field) else {
                if let Some(done) = stack.pop() {
                    self.active.remove(&done.key);
                    deliver(&mut stack, done.id);
                }
                continue;
            };

            let Some(objects) = frame.objects.as_ref() else {
                let mut objects = self.objects(field, &subject);
                if objects.is_empty() {
                    self.missing(&bean, field, &subject)?;
                    frame.field += 1;
                    continue;
                }
                if !field.is_many() && objects.len() > 1 {
                    let detail = format!("{} objects, kept {}", objects.len(), objects[0]);
                    self.report(DiagnosticKind::AmbiguousCardinality, &bean, field, &subject, detail);
                    objects.truncate(1);
                }
                frame.objects = Some(objects);
                frame.next = 0;
                continue;
            };

            let Some(object) = objects.get(frame.next).cloned() else {
                let values = std::mem::take(&mut frame.values);
                frame.objects = None;
                frame.field += 1;
                let value = if field.is_many() {
                    (!values.is_empty()).then_some(FieldValue::List(values))
                } else {
                    values.into_iter().next()
                };
                if let Some(value) = value {
                    self.graph[frame.id].set(field.name(), value);
                }
                continue;
            };

            if let (FieldKind::Nested { bean: nested }, Some(child)) =
                (field.kind(), object.as_subject())
            {
                if let Opened::Cached(id) = self.open(&child, nested, &mut stack)? {
                    deliver(&mut stack, id);
                }
                continue;
            }

            match self.read_object(&bean, field, &subject, &object)? {
                Ok(Some(value)) => frame.values.push(value),
                Ok(None) => {}
                Err(source) => self.mismatch(&bean, field, &subject, source)?,
            }
            frame.next += 1;
        }
        Ok(root)
    }

    /// Start reading a subject: allocate its instance, cache it and push a frame
    fn open(
        &mut self,
        subject: &RdfSubject,
        bean_name: &str,
        stack: &mut Vec<Frame>,
    ) -> MappingResult<Opened> {
        let key = (subject.clone(), bean_name.to_string());
        if let Some(&id) = self.cache.get(&key) {
            trace!(subject = %subject, bean = bean_name, "resolution cache hit");
            return Ok(Opened::Cached(id));
        }
        if self.active.contains(&key) {
            return Err(MappingError::CycleWithoutResolution {
                bean: bean_name.to_string(),
                subject: subject.to_string(),
            });
        }
        if self.active.len() >= self.config.max_depth {
            return Err(MappingError::RecursionLimitExceeded {
                limit: self.config.max_depth,
                subject: subject.to_string(),
            });
        }

        let bean = self.registry.lookup(bean_name)?;
        trace!(subject = %subject, bean = bean_name, "resolving");
        let id = self.graph.add(Instance::new(bean.name()));
        if let (Some(template), RdfSubject::NamedNode(iri)) = (bean.subject_template(), subject) {
            self.graph[id].set(template.id_field(), template.id_from(iri));
        }
        self.cache.insert(key.clone(), id);
        self.active.insert(key.clone());
        stack.push(Frame {
            key,
            id,
            subject: subject.clone(),
            bean,
            field: 0,
            objects: None,
            next: 0,
            values: Vec::new(),
        });
        Ok(Opened::Pending(id))
    }

    /// Read one non-nested object, or a nested one that is not a resource;
    /// the inner error is a tolerable mismatch, the outer one aborts the call
    fn read_object(
        &mut self,
        bean: &BeanDescriptor,
        field: &FieldDescriptor,
        subject: &RdfSubject,
        object: &RdfObject,
    ) -> MappingResult<Result<Option<FieldValue>, CodecError>> {
        match field.kind() {
            FieldKind::Scalar { datatype } => Ok(match object {
                RdfObject::Literal(literal) => self
                    .codec
                    .decode(literal, *datatype)
                    .map(|value| Some(value.into())),
                other => Err(CodecError::DatatypeMismatch {
                    expected: datatype.iri().to_string(),
                    found: term_kind(other),
                }),
            }),
            FieldKind::Resource => Ok(match object {
                RdfObject::NamedNode(node) => {
                    Ok(Some(ScalarValue::Iri(node.as_str().to_string()).into()))
                }
                other => Err(CodecError::DatatypeMismatch {
                    expected: "IRI".to_string(),
                    found: term_kind(other),
                }),
            }),
            FieldKind::Nested { bean: nested } => Ok(Err(CodecError::DatatypeMismatch {
                expected: format!("resource of {}", nested),
                found: term_kind(object),
            })),
            FieldKind::Custom { serializer } => serializer
                .deserialize(self.store, object)
                .map(Ok)
                .map_err(|source| MappingError::CustomSerializer {
                    bean: bean.name().to_string(),
                    field: field.name().to_string(),
                    subject: subject.to_string(),
                    source,
                }),
        }
    }

    /// Distinct objects of the field's predicate, language-filtered and sorted
    fn objects(&self, field: &FieldDescriptor, subject: &RdfSubject) -> Vec<RdfObject> {
        let mut objects: Vec<RdfObject> = self
            .store
            .objects(subject, field.predicate())
            .filter(|object| match (field.language(), object) {
                (Some(language), RdfObject::Literal(literal)) => literal
                    .language()
                    .is_some_and(|tag| tag.eq_ignore_ascii_case(language)),
                _ => true,
            })
            .cloned()
            .collect();
        objects.sort_by(compare_objects);
        objects
    }

    fn policy(&self, field: &FieldDescriptor) -> MissingFieldPolicy {
        field
            .missing_policy()
            .unwrap_or(self.config.missing_field_policy)
    }

    fn missing(
        &mut self,
        bean: &BeanDescriptor,
        field: &FieldDescriptor,
        subject: &RdfSubject,
    ) -> MappingResult<()> {
        if !field.is_required() {
            return Ok(());
        }
        match self.policy(field) {
            MissingFieldPolicy::Fail => Err(MappingError::MissingRequiredField {
                bean: bean.name().to_string(),
                field: field.name().to_string(),
                subject: subject.to_string(),
                predicate: field.predicate().as_str().to_string(),
            }),
            MissingFieldPolicy::LeaveUnset => {
                self.report(
                    DiagnosticKind::MissingRequiredField,
                    bean,
                    field,
                    subject,
                    String::new(),
                );
                Ok(())
            }
        }
    }

    fn mismatch(
        &mut self,
        bean: &BeanDescriptor,
        field: &FieldDescriptor,
        subject: &RdfSubject,
        source: CodecError,
    ) -> MappingResult<()> {
        if field.is_required() && self.policy(field) == MissingFieldPolicy::Fail {
            return Err(MappingError::DatatypeMismatch {
                bean: bean.name().to_string(),
                field: field.name().to_string(),
                subject: subject.to_string(),
                predicate: field.predicate().as_str().to_string(),
                source,
            });
        }
        self.report(
            DiagnosticKind::DatatypeMismatch,
            bean,
            field,
            subject,
            source.to_string(),
        );
        Ok(())
    }

    fn report(
        &mut self,
        kind: DiagnosticKind,
        bean: &BeanDescriptor,
        field: &FieldDescriptor,
        subject: &RdfSubject,
        detail: String,
    ) {
        let diagnostic = Diagnostic {
            kind,
            bean: bean.name().to_string(),
            field: field.name().to_string(),
            subject: subject.to_string(),
            predicate: field.predicate().as_str().to_string(),
            detail,
        };
        warn!(%diagnostic, "mapping diagnostic");
        self.diagnostics.push(diagnostic);
    }
}

fn compare_subjects(a: &RdfSubject, b: &RdfSubject) -> Ordering {
    a.lexical_form()
        .cmp(b.lexical_form())
        .then_with(|| a.is_blank_node().cmp(&b.is_blank_node()))
}

fn compare_objects(a: &RdfObject, b: &RdfObject) -> Ordering {
    a.lexical_form()
        .cmp(b.lexical_form())
        .then_with(|| a.to_string().cmp(&b.to_string()))
}

fn term_kind(object: &RdfObject) -> String {
    match object {
        RdfObject::NamedNode(_) => "named node".to_string(),
        RdfObject::BlankNode(_) => "blank node".to_string(),
        RdfObject::Literal(literal) => literal.datatype_iri().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bean::{BeanDescriptor, Field, XsdType};
    use crate::rdf::{BlankNode, Literal, NamedNode, Quad, RdfPredicate};

    const EX: &str = "http://example.org/";

    fn iri(local: &str) -> NamedNode {
        NamedNode::new(&format!("{}{}", EX, local)).unwrap()
    }

    fn pred(local: &str) -> RdfPredicate {
        RdfPredicate::new(&format!("{}{}", EX, local)).unwrap()
    }

    fn typed(subject: impl Into<RdfSubject>, class: &str) -> Quad {
        Quad::new(
            subject.into(),
            RdfPredicate::new(crate::rdf::vocab::rdf::TYPE).unwrap(),
            iri(class).into(),
            None,
        )
    }

    fn quad(subject: impl Into<RdfSubject>, p: &str, object: impl Into<RdfObject>) -> Quad {
        Quad::new(subject.into(), pred(p), object.into(), None)
    }

    fn registry() -> TypeRegistry {
        let mut registry = TypeRegistry::new();
        registry.register(
            BeanDescriptor::builder("Node")
                .namespace("ex", EX)
                .rdf_type("ex:Node")
                .subject("ex", "id")
                .field(Field::scalar("label", "ex:label", XsdType::String))
                .field(Field::nested("next", "ex:next", "Node"))
                .field(Field::nested("children", "ex:child", "Node").many())
                .build()
                .unwrap(),
        );
        registry
    }

    #[test]
    fn test_outermost_candidate_is_root() {
        let store = QuadStore::from_quads(vec![
            typed(iri("a"), "Node"),
            typed(iri("b"), "Node"),
            quad(iri("b"), "child", iri("a")),
            quad(iri("a"), "label", Literal::new_simple_literal("inner")),
            quad(iri("b"), "label", Literal::new_simple_literal("outer")),
        ]);
        let registry = registry();
        let config = MapperConfig::default();

        let result = Deserializer::new(&registry, &store, &config)
            .deserialize("Node")
            .unwrap();
        let root = result.root().unwrap();
        assert_eq!(root.get_str("label"), Some("outer"));
        assert_eq!(root.get_str("id"), Some("b"));
        assert_eq!(result.graph.len(), 2);
    }

    #[test]
    fn test_cycle_resolves_to_same_instance() {
        let store = QuadStore::from_quads(vec![
            typed(iri("a"), "Node"),
            typed(iri("b"), "Node"),
            quad(iri("a"), "next", iri("b")),
            quad(iri("b"), "next", iri("a")),
        ]);
        let registry = registry();
        let config = MapperConfig::default();

        let result = Deserializer::new(&registry, &store, &config)
            .deserialize("Node")
            .unwrap();
        let a = result.root_id().unwrap();
        let b = result.graph[a].get_object("next").unwrap();
        assert_eq!(result.graph[b].get_object("next"), Some(a));
        assert_eq!(result.graph.len(), 2);
    }

    #[test]
    fn test_blank_node_shared_by_two_fields() {
        let shared = BlankNode::with_id("shared").unwrap();
        let store = QuadStore::from_quads(vec![
            typed(iri("root"), "Node"),
            quad(iri("root"), "next", shared.clone()),
            quad(iri("root"), "child", shared.clone()),
            quad(shared, "label", Literal::new_simple_literal("both")),
        ]);
        let registry = registry();
        let config = MapperConfig::default();

        let result = Deserializer::new(&registry, &store, &config)
            .deserialize("Node")
            .unwrap();
        let root = result.root().unwrap();
        let next = root.get_object("next").unwrap();
        assert_eq!(root.get_objects("children"), vec![next]);
        assert_eq!(result.graph[next].get_str("label"), Some("both"));
        assert_eq!(result.graph.len(), 2);
    }

    #[test]
    fn test_many_values_in_lexical_order() {
        let store = QuadStore::from_quads(vec![
            typed(iri("root"), "Node"),
            quad(iri("root"), "child", iri("c2")),
            quad(iri("root"), "child", iri("c0")),
            quad(iri("root"), "child", iri("c1")),
        ]);
        let registry = registry();
        let config = MapperConfig::default();

        let result = Deserializer::new(&registry, &store, &config)
            .deserialize_subject("Node", &iri("root").into())
            .unwrap();
        let children = result.root().unwrap().get_objects("children");
        let ids: Vec<_> = children
            .iter()
            .map(|c| result.graph[*c].get_str("id").unwrap())
            .collect();
        assert_eq!(ids, vec!["c0", "c1", "c2"]);
    }

    #[test]
    fn test_recursion_limit() {
        let store = QuadStore::from_quads(vec![
            typed(iri("a"), "Node"),
            quad(iri("a"), "next", iri("b")),
            quad(iri("b"), "next", iri("c")),
            quad(iri("c"), "next", iri("d")),
        ]);
        let registry = registry();
        let config = MapperConfig {
            max_depth: 2,
            ..MapperConfig::default()
        };

        let result = Deserializer::new(&registry, &store, &config).deserialize("Node");
        assert!(matches!(
            result,
            Err(MappingError::RecursionLimitExceeded { limit: 2, .. })
        ));
    }

    #[test]
    fn test_blank_node_subject_has_no_id() {
        let node = BlankNode::with_id("n1").unwrap();
        let store = QuadStore::from_quads(vec![
            typed(node.clone(), "Node"),
            quad(node, "label", Literal::new_simple_literal("anon")),
        ]);
        let registry = registry();
        let config = MapperConfig::default();

        let result = Deserializer::new(&registry, &store, &config)
            .deserialize("Node")
            .unwrap();
        let root = result.root().unwrap();
        assert_eq!(root.get_str("label"), Some("anon"));
        assert!(!root.has("id"));
    }

    #[test]
    fn test_no_candidates() {
        let store = QuadStore::new();
        let registry = registry();
        let config = MapperConfig::default();

        assert!(matches!(
            Deserializer::new(&registry, &store, &config).deserialize("Node"),
            Err(MappingError::NoMatchingSubject { .. })
        ));
        let all = Deserializer::new(&registry, &store, &config)
            .deserialize_all("Node")
            .unwrap();
        assert!(all.roots.is_empty());
        assert_eq!(all.to_json(), Value::Null);
    }
}
