//! Object instances
//!
//! Instances of one mapping call live in an [`ObjectGraph`] arena and refer
//! to each other by [`InstanceId`]. Shared references and cycles are plain
//! ids, so a subject reached twice is one instance, and the arena is dropped
//! as a whole when the caller is done with it.

use super::value::{FieldValue, ScalarValue};
use crate::mapper::{MappingError, MappingResult};
use indexmap::IndexMap;
use rustc_hash::FxHashSet;
use serde_json::{json, Map, Value};
use std::fmt;
use std::ops::{Index, IndexMut};

/// Handle of an instance inside its [`ObjectGraph`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InstanceId(usize);

impl InstanceId {
    pub fn as_usize(&self) -> usize {
        self.0
    }
}

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "InstanceId({})", self.0)
    }
}

/// A materialized value of a registered bean
#[derive(Debug, Clone, PartialEq)]
pub struct Instance {
    bean: String,
    fields: IndexMap<String, FieldValue>,
}

impl Instance {
    /// Create an instance with no field set
    pub fn new(bean: impl Into<String>) -> Self {
        Self {
            bean: bean.into(),
            fields: IndexMap::new(),
        }
    }

    /// Builder-style `set`
    pub fn with(mut self, field: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.set(field, value);
        self
    }

    /// Builder-style `set` that skips `None`
    pub fn with_opt<V: Into<FieldValue>>(mut self, field: impl Into<String>, value: Option<V>) -> Self {
        if let Some(value) = value {
            self.set(field, value);
        }
        self
    }

    /// Name of the bean this instance belongs to
    pub fn bean(&self) -> &str {
        &self.bean
    }

    /// Set a field, returning the previous value
    pub fn set(&mut self, field: impl Into<String>, value: impl Into<FieldValue>) -> Option<FieldValue> {
        self.fields.insert(field.into(), value.into())
    }

    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.fields.get(field)
    }

    pub fn remove(&mut self, field: &str) -> Option<FieldValue> {
        self.fields.shift_remove(field)
    }

    pub fn has(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// Set fields in insertion order
    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn get_scalar(&self, field: &str) -> Option<&ScalarValue> {
        self.get(field).and_then(FieldValue::as_scalar)
    }

    pub fn get_str(&self, field: &str) -> Option<&str> {
        self.get_scalar(field).and_then(ScalarValue::as_str)
    }

    pub fn get_string(&self, field: &str) -> Option<String> {
        self.get_str(field).map(str::to_string)
    }

    pub fn get_integer(&self, field: &str) -> Option<i64> {
        self.get_scalar(field).and_then(ScalarValue::as_integer)
    }

    pub fn get_float(&self, field: &str) -> Option<f64> {
        self.get_scalar(field).and_then(ScalarValue::as_float)
    }

    pub fn get_boolean(&self, field: &str) -> Option<bool> {
        self.get_scalar(field).and_then(ScalarValue::as_boolean)
    }

    pub fn get_object(&self, field: &str) -> Option<InstanceId> {
        self.get(field).and_then(FieldValue::as_object)
    }

    /// Objects of a field, single or repeated; empty when unset
    pub fn get_objects(&self, field: &str) -> Vec<InstanceId> {
        self.get(field)
            .map(|v| v.items().iter().filter_map(FieldValue::as_object).collect())
            .unwrap_or_default()
    }

    /// Scalars of a field, single or repeated; empty when unset
    pub fn get_scalars(&self, field: &str) -> Vec<&ScalarValue> {
        self.get(field)
            .map(|v| v.items().iter().filter_map(FieldValue::as_scalar).collect())
            .unwrap_or_default()
    }
}

/// Arena of instances produced or consumed by one mapping call
#[derive(Debug, Clone, Default)]
pub struct ObjectGraph {
    instances: Vec<Instance>,
}

impl ObjectGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move an instance into the arena
    pub fn add(&mut self, instance: Instance) -> InstanceId {
        self.instances.push(instance);
        InstanceId(self.instances.len() - 1)
    }

    pub fn get(&self, id: InstanceId) -> Option<&Instance> {
        self.instances.get(id.0)
    }

    pub fn get_mut(&mut self, id: InstanceId) -> Option<&mut Instance> {
        self.instances.get_mut(id.0)
    }

    /// Like `get`, failing with `DanglingReference`
    pub fn instance(&self, id: InstanceId) -> MappingResult<&Instance> {
        self.get(id).ok_or(MappingError::DanglingReference(id))
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (InstanceId, &Instance)> {
        self.instances
            .iter()
            .enumerate()
            .map(|(i, instance)| (InstanceId(i), instance))
    }

    /// Check that no instance reachable from `root` reaches itself again
    pub fn is_acyclic_from(&self, root: InstanceId) -> bool {
        let mut active = FxHashSet::default();
        let mut done = FxHashSet::default();
        // instance on the current path, with the children still to visit
        let mut stack = vec![(root, self.children(root))];
        active.insert(root);

        while let Some((id, pending)) = stack.last_mut() {
            match pending.pop() {
                Some(child) if done.contains(&child) => {}
                Some(child) => {
                    if !active.insert(child) {
                        return false;
                    }
                    let children = self.children(child);
                    stack.push((child, children));
                }
                None => {
                    let id = *id;
                    stack.pop();
                    active.remove(&id);
                    done.insert(id);
                }
            }
        }
        true
    }

    fn children(&self, id: InstanceId) -> Vec<InstanceId> {
        self.get(id)
            .map(|instance| {
                instance
                    .fields()
                    .flat_map(|(_, value)| value.items().iter().filter_map(FieldValue::as_object))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// JSON projection of the tree rooted at `root`
    ///
    /// Instances are inlined wherever they are referenced; a reference back
    /// to an instance still being written becomes `{"@cycle": <bean>}`. Two
    /// structurally equal graphs project to equal values regardless of arena
    /// layout or blank node labels.
    pub fn to_json(&self, root: InstanceId) -> Value {
        let mut active = FxHashSet::default();
        self.project(root, &mut active)
    }

    fn project(&self, id: InstanceId, active: &mut FxHashSet<InstanceId>) -> Value {
        let Some(instance) = self.get(id) else {
            return Value::Null;
        };
        if !active.insert(id) {
            return json!({ "@cycle": instance.bean() });
        }
        let mut object = Map::new();
        object.insert("@type".to_string(), Value::String(instance.bean().to_string()));
        for (name, value) in instance.fields() {
            object.insert(name.to_string(), self.project_value(value, active));
        }
        active.remove(&id);
        Value::Object(object)
    }

    fn project_value(&self, value: &FieldValue, active: &mut FxHashSet<InstanceId>) -> Value {
        match value {
            FieldValue::Scalar(scalar) => scalar_json(scalar),
            FieldValue::Object(id) => self.project(*id, active),
            FieldValue::List(items) => Value::Array(
                items
                    .iter()
                    .map(|item| self.project_value(item, active))
                    .collect(),
            ),
            FieldValue::Raw(raw) => raw.clone(),
        }
    }
}

fn scalar_json(scalar: &ScalarValue) -> Value {
    match scalar {
        ScalarValue::String(s) => Value::String(s.clone()),
        ScalarValue::LangString { value, language } => {
            json!({ "@value": value, "@language": language })
        }
        ScalarValue::Integer(i) => json!(i),
        ScalarValue::Decimal(f) | ScalarValue::Double(f) => json!(f),
        ScalarValue::Boolean(b) => json!(b),
        ScalarValue::Date(d) => Value::String(d.format("%Y-%m-%d").to_string()),
        ScalarValue::DateTime(dt) => Value::String(dt.to_rfc3339()),
        ScalarValue::Iri(iri) => json!({ "@id": iri }),
    }
}

impl Index<InstanceId> for ObjectGraph {
    type Output = Instance;

    fn index(&self, id: InstanceId) -> &Instance {
        &self.instances[id.0]
    }
}

impl IndexMut<InstanceId> for ObjectGraph {
    fn index_mut(&mut self, id: InstanceId) -> &mut Instance {
        &mut self.instances[id.0]
    }
}
