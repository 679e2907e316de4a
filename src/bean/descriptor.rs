//! Bean and field descriptors
//!
//! A [`BeanDescriptor`] is the structural mapping metadata of one class: its
//! `rdf:type`, its prefix table, how its subject IRI is formed and an ordered
//! list of [`FieldDescriptor`]s. Descriptors are assembled with
//! [`BeanDescriptorBuilder`], which expands every compact IRI once, so the
//! engines only ever see absolute IRIs.
//!
//! ```rust
//! use rdf_bean_mapper::bean::{BeanDescriptor, Field, XsdType};
//!
//! let person = BeanDescriptor::builder("Person")
//!     .namespace("foaf", "http://xmlns.com/foaf/0.1/")
//!     .namespace("person", "http://example.com/Person/")
//!     .rdf_type("foaf:Person")
//!     .subject("person", "uuid")
//!     .field(Field::scalar("firstName", "foaf:firstName", XsdType::String))
//!     .field(Field::nested("address", "person:hasAddress", "Address"))
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(person.type_iri().as_str(), "http://xmlns.com/foaf/0.1/Person");
//! assert_eq!(person.fields().len(), 2);
//! ```

use super::codec::XsdType;
use crate::mapper::{FieldSerializer, MappingError, MappingResult};
use crate::rdf::{NamedNode, NamespaceManager, RdfPredicate};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

/// How many values a field holds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cardinality {
    One,
    Many,
}

/// What to do when a required field has no matching quad
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingFieldPolicy {
    /// Abort the whole deserialization
    Fail,
    /// Leave the field unset and record a diagnostic
    LeaveUnset,
}

/// Mapping mode of a field
#[derive(Clone)]
pub enum FieldKind {
    /// Literal object decoded with the given datatype
    Scalar { datatype: XsdType },
    /// Named node object kept as an IRI string
    Resource,
    /// Object is the subject of another registered bean
    Nested { bean: String },
    /// Quads produced by a pluggable serializer
    Custom { serializer: Arc<dyn FieldSerializer> },
}

impl fmt::Debug for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldKind::Scalar { datatype } => write!(f, "Scalar({:?})", datatype),
            FieldKind::Resource => write!(f, "Resource"),
            FieldKind::Nested { bean } => write!(f, "Nested({})", bean),
            FieldKind::Custom { .. } => write!(f, "Custom"),
        }
    }
}

/// Field declaration, as written by the user
///
/// The predicate may be compact; it is resolved against the bean's prefix
/// table when the descriptor is built.
#[derive(Debug, Clone)]
pub struct Field {
    name: String,
    predicate: String,
    kind: FieldKind,
    cardinality: Cardinality,
    required: bool,
    missing_policy: Option<MissingFieldPolicy>,
    language: Option<String>,
}

impl Field {
    fn new(name: impl Into<String>, predicate: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            predicate: predicate.into(),
            kind,
            cardinality: Cardinality::One,
            required: false,
            missing_policy: None,
            language: None,
        }
    }

    /// Literal-valued field
    pub fn scalar(name: impl Into<String>, predicate: impl Into<String>, datatype: XsdType) -> Self {
        Self::new(name, predicate, FieldKind::Scalar { datatype })
    }

    /// IRI-valued field
    pub fn resource(name: impl Into<String>, predicate: impl Into<String>) -> Self {
        Self::new(name, predicate, FieldKind::Resource)
    }

    /// Field holding another bean
    pub fn nested(
        name: impl Into<String>,
        predicate: impl Into<String>,
        bean: impl Into<String>,
    ) -> Self {
        Self::new(name, predicate, FieldKind::Nested { bean: bean.into() })
    }

    /// Field written by a custom serializer
    pub fn custom(
        name: impl Into<String>,
        predicate: impl Into<String>,
        serializer: Arc<dyn FieldSerializer>,
    ) -> Self {
        Self::new(name, predicate, FieldKind::Custom { serializer })
    }

    /// Mark the field as repeated
    pub fn many(mut self) -> Self {
        self.cardinality = Cardinality::Many;
        self
    }

    /// Mark the field as required, using the mapper's default policy
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Mark the field as required with its own missing-value policy
    pub fn required_with(mut self, policy: MissingFieldPolicy) -> Self {
        self.required = true;
        self.missing_policy = Some(policy);
        self
    }

    /// Language tag written on, and required from, string literals
    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }
}

/// Resolved field metadata
#[derive(Debug, Clone)]
pub struct FieldDescriptor {
    name: String,
    predicate: RdfPredicate,
    kind: FieldKind,
    cardinality: Cardinality,
    required: bool,
    missing_policy: Option<MissingFieldPolicy>,
    language: Option<String>,
}

impl FieldDescriptor {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn predicate(&self) -> &RdfPredicate {
        &self.predicate
    }

    pub fn kind(&self) -> &FieldKind {
        &self.kind
    }

    pub fn cardinality(&self) -> Cardinality {
        self.cardinality
    }

    pub fn is_many(&self) -> bool {
        self.cardinality == Cardinality::Many
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    /// Field-level override of the missing-value policy
    pub fn missing_policy(&self) -> Option<MissingFieldPolicy> {
        self.missing_policy
    }

    pub fn language(&self) -> Option<&str> {
        self.language.as_deref()
    }
}

/// How an instance's subject IRI is formed: namespace + identity field value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubjectTemplate {
    prefix: String,
    id_field: String,
}

impl SubjectTemplate {
    /// Absolute IRI prefix
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Name of the field holding the raw identifier
    pub fn id_field(&self) -> &str {
        &self.id_field
    }

    /// Subject IRI for an identifier
    pub fn subject_for(&self, id: &str) -> MappingResult<NamedNode> {
        let iri = format!("{}{}", self.prefix, id);
        NamedNode::new(&iri).map_err(|e| MappingError::InvalidIri {
            iri,
            reason: e.to_string(),
        })
    }

    /// Identifier carried by a subject IRI
    ///
    /// IRIs outside the template's namespace yield the whole IRI.
    pub fn id_from(&self, subject: &NamedNode) -> String {
        let iri = subject.as_str();
        match iri.strip_prefix(self.prefix.as_str()) {
            Some(id) if !id.is_empty() => id.to_string(),
            _ => iri.to_string(),
        }
    }
}

/// Structural mapping metadata for one class
#[derive(Debug, Clone)]
pub struct BeanDescriptor {
    name: String,
    type_iri: NamedNode,
    namespaces: NamespaceManager,
    subject: Option<SubjectTemplate>,
    fields: Vec<FieldDescriptor>,
}

impl BeanDescriptor {
    /// Start describing a class
    pub fn builder(name: impl Into<String>) -> BeanDescriptorBuilder {
        BeanDescriptorBuilder::new(name)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn type_iri(&self) -> &NamedNode {
        &self.type_iri
    }

    pub fn namespaces(&self) -> &NamespaceManager {
        &self.namespaces
    }

    pub fn subject_template(&self) -> Option<&SubjectTemplate> {
        self.subject.as_ref()
    }

    /// Fields in declaration order
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Names of the beans referenced by nested fields
    pub fn nested_beans(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().filter_map(|f| match &f.kind {
            FieldKind::Nested { bean } => Some(bean.as_str()),
            _ => None,
        })
    }
}

/// Builder for [`BeanDescriptor`]
#[derive(Debug, Clone)]
pub struct BeanDescriptorBuilder {
    name: String,
    rdf_type: Option<String>,
    namespaces: NamespaceManager,
    subject: Option<(String, String)>,
    fields: Vec<Field>,
}

impl BeanDescriptorBuilder {
    fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rdf_type: None,
            namespaces: NamespaceManager::new(),
            subject: None,
            fields: Vec::new(),
        }
    }

    /// Bind a prefix for compact IRIs
    pub fn namespace(mut self, prefix: impl Into<String>, iri: impl Into<String>) -> Self {
        self.namespaces.add_prefix(prefix, iri);
        self
    }

    /// The class IRI written as `rdf:type`
    pub fn rdf_type(mut self, iri: impl Into<String>) -> Self {
        self.rdf_type = Some(iri.into());
        self
    }

    /// Subject template: a bound prefix name or an IRI, followed by the value
    /// of `id_field`
    pub fn subject(mut self, prefix: impl Into<String>, id_field: impl Into<String>) -> Self {
        self.subject = Some((prefix.into(), id_field.into()));
        self
    }

    /// Append a field; declaration order is serialization order
    pub fn field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    pub fn build(self) -> MappingResult<BeanDescriptor> {
        let bean = self.name;
        let invalid = |reason: String| MappingError::InvalidDescriptor {
            bean: bean.clone(),
            reason,
        };

        let rdf_type = self
            .rdf_type
            .ok_or_else(|| invalid("no rdf:type declared".to_string()))?;
        let type_iri = resolve(&self.namespaces, &rdf_type)?;

        let subject = match self.subject {
            Some((prefix, id_field)) => {
                let prefix = match self.namespaces.get_iri(&prefix) {
                    Ok(iri) => iri.to_string(),
                    Err(_) => resolve(&self.namespaces, &prefix)?.as_str().to_string(),
                };
                Some(SubjectTemplate { prefix, id_field })
            }
            None => None,
        };

        let mut names = HashSet::new();
        let mut predicates = HashSet::new();
        if let Some(template) = &subject {
            names.insert(template.id_field.clone());
        }

        let mut fields = Vec::with_capacity(self.fields.len());
        for field in self.fields {
            if !names.insert(field.name.clone()) {
                return Err(invalid(format!("field {} declared twice", field.name)));
            }
            let predicate: RdfPredicate = resolve(&self.namespaces, &field.predicate)?.into();
            if !predicates.insert(predicate.clone()) {
                return Err(MappingError::DuplicatePredicate {
                    bean: bean.clone(),
                    predicate: predicate.as_str().to_string(),
                });
            }
            fields.push(FieldDescriptor {
                name: field.name,
                predicate,
                kind: field.kind,
                cardinality: field.cardinality,
                required: field.required,
                missing_policy: field.missing_policy,
                language: field.language,
            });
        }

        Ok(BeanDescriptor {
            name: bean,
            type_iri,
            namespaces: self.namespaces,
            subject,
            fields,
        })
    }
}

fn resolve(namespaces: &NamespaceManager, iri: &str) -> MappingResult<NamedNode> {
    let expanded = namespaces.resolve(iri).map_err(|e| MappingError::InvalidIri {
        iri: iri.to_string(),
        reason: e.to_string(),
    })?;
    NamedNode::new(&expanded).map_err(|e| MappingError::InvalidIri {
        iri: expanded.clone(),
        reason: e.to_string(),
    })
}
