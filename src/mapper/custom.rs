//! Custom field serializers
//!
//! A field declared with [`Field::custom`](crate::bean::Field::custom) hands
//! its value to a [`FieldSerializer`] instead of the literal codec. The
//! serializer sees the current subject and predicate through a
//! [`SerializerContext`] and returns quads that are appended verbatim to the
//! output. It may mint blank nodes for intermediate structure; those come
//! from the same per-call minter as the engine's own, so labels never clash.

use super::error::{MappingError, MappingResult};
use crate::bean::FieldValue;
use crate::rdf::{BlankNode, NamedNode, Quad, QuadStore, RdfObject, RdfPredicate, RdfSubject};
use uuid::Uuid;

/// Pluggable conversion between a field value and quads
pub trait FieldSerializer: Send + Sync {
    /// Produce the quads for `value` on the context's subject
    fn serialize(
        &self,
        value: &FieldValue,
        ctx: &mut SerializerContext<'_>,
    ) -> anyhow::Result<Vec<Quad>>;

    /// Rebuild a field value from one object of the field's predicate
    ///
    /// Returning `Ok(None)` leaves the field unset.
    fn deserialize(
        &self,
        _store: &QuadStore,
        _object: &RdfObject,
    ) -> anyhow::Result<Option<FieldValue>> {
        Ok(None)
    }
}

/// View of the serialization in progress, handed to a [`FieldSerializer`]
pub struct SerializerContext<'a> {
    subject: &'a RdfSubject,
    predicate: &'a RdfPredicate,
    graph: Option<&'a NamedNode>,
    minter: &'a mut BlankNodeMinter,
}

impl<'a> SerializerContext<'a> {
    pub(crate) fn new(
        subject: &'a RdfSubject,
        predicate: &'a RdfPredicate,
        graph: Option<&'a NamedNode>,
        minter: &'a mut BlankNodeMinter,
    ) -> Self {
        Self {
            subject,
            predicate,
            graph,
            minter,
        }
    }

    /// Subject of the instance being serialized
    pub fn subject(&self) -> &RdfSubject {
        self.subject
    }

    /// Predicate of the field being serialized
    pub fn predicate(&self) -> &RdfPredicate {
        self.predicate
    }

    /// Output graph of the current call
    pub fn graph(&self) -> Option<&NamedNode> {
        self.graph
    }

    /// A fresh blank node, unique within this serialization call
    pub fn mint_blank_node(&mut self) -> anyhow::Result<BlankNode> {
        Ok(self.minter.mint()?)
    }

    /// Quad in the call's output graph
    pub fn quad(
        &self,
        subject: impl Into<RdfSubject>,
        predicate: RdfPredicate,
        object: impl Into<RdfObject>,
    ) -> Quad {
        Quad::new(subject.into(), predicate, object.into(), self.graph.cloned())
    }
}

/// Blank node labels for one serialization call
///
/// Labels are `{prefix}{scope}_{n}`: the scope is a random UUID drawn once
/// per call, `n` counts up from zero in emission order. Two calls never share
/// labels; within a call the numbering follows the traversal.
#[derive(Debug, Clone)]
pub struct BlankNodeMinter {
    scope: String,
    next: u64,
}

impl BlankNodeMinter {
    pub fn new(prefix: &str) -> Self {
        Self {
            scope: format!("{}{}", prefix, Uuid::new_v4().simple()),
            next: 0,
        }
    }

    pub fn mint(&mut self) -> MappingResult<BlankNode> {
        let label = format!("{}_{}", self.scope, self.next);
        self.next += 1;
        BlankNode::with_id(&label).map_err(|e| MappingError::Config(e.to_string()))
    }

    /// Number of labels handed out so far
    pub fn minted(&self) -> u64 {
        self.next
    }
}

/// Check that a custom serializer only talks about its own subject
///
/// Quads about blank nodes are intermediate structure and always allowed.
pub(crate) fn check_subjects(
    field: &str,
    subject: &RdfSubject,
    quads: &[Quad],
) -> MappingResult<()> {
    for quad in quads {
        if quad.subject.is_named_node() && &quad.subject != subject {
            return Err(MappingError::InconsistentCustomSubject {
                field: field.to_string(),
                subject: subject.to_string(),
                found: quad.subject.to_string(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rdf::Literal;

    #[test]
    fn test_minter_labels() {
        let mut minter = BlankNodeMinter::new("b");
        let first = minter.mint().unwrap();
        let second = minter.mint().unwrap();

        assert!(first.as_str().starts_with('b'));
        assert!(first.as_str().ends_with("_0"));
        assert!(second.as_str().ends_with("_1"));
        assert_ne!(first, second);
        assert_eq!(minter.minted(), 2);
    }

    #[test]
    fn test_minters_do_not_collide() {
        let a = BlankNodeMinter::new("b").mint().unwrap();
        let b = BlankNodeMinter::new("b").mint().unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_context_quads() {
        let subject: RdfSubject = NamedNode::new("http://example.org/u1").unwrap().into();
        let predicate = RdfPredicate::new("http://example.org/address").unwrap();
        let graph = NamedNode::new("http://example.org/g").unwrap();
        let mut minter = BlankNodeMinter::new("b");
        let mut ctx = SerializerContext::new(&subject, &predicate, Some(&graph), &mut minter);

        let node = ctx.mint_blank_node().unwrap();
        let quad = ctx.quad(ctx.subject().clone(), ctx.predicate().clone(), node);
        assert_eq!(quad.graph, Some(graph.clone()));
        assert_eq!(quad.subject, subject);
    }

    #[test]
    fn test_subject_consistency() {
        let subject: RdfSubject = NamedNode::new("http://example.org/u1").unwrap().into();
        let other: RdfSubject = NamedNode::new("http://example.org/u2").unwrap().into();
        let predicate = RdfPredicate::new("http://example.org/p").unwrap();
        let blank: RdfSubject = BlankNode::new().into();
        let object: RdfObject = Literal::new_simple_literal("x").into();

        let ok = vec![
            Quad::new(subject.clone(), predicate.clone(), object.clone(), None),
            Quad::new(blank, predicate.clone(), object.clone(), None),
        ];
        assert!(check_subjects("address", &subject, &ok).is_ok());

        let bad = vec![Quad::new(other, predicate, object, None)];
        assert!(matches!(
            check_subjects("address", &subject, &bad),
            Err(MappingError::InconsistentCustomSubject { .. })
        ));
    }
}
