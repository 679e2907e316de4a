//! In-memory quad store view
//!
//! Read-only input of a deserialization pass. Quads are held as a set
//! (insertion ordered, no duplicates) and indexed for the two lookups the
//! mapping engine performs on its hot path:
//!
//! - subject → quads
//! - (subject, predicate) → objects
//!
//! A third index maps an `rdf:type` object to the subjects carrying it, which
//! is how root candidates are located. Lookups span every graph in the store;
//! the same triple asserted in two graphs yields its object once.

use super::types::{NamedNode, Quad, RdfObject, RdfPredicate, RdfSubject, Triple};
use super::vocab;
use indexmap::{IndexMap, IndexSet};
use thiserror::Error;

/// Quad store errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum QuadStoreError {
    /// Graph not found
    #[error("Graph not found: {0}")]
    GraphNotFound(String),
}

pub type QuadStoreResult<T> = Result<T, QuadStoreError>;

/// Quad set with subject and subject/predicate indices
#[derive(Debug, Clone, Default)]
pub struct QuadStore {
    /// All quads (primary storage)
    quads: IndexSet<Quad>,

    /// Subject -> quad positions
    by_subject: IndexMap<RdfSubject, Vec<usize>>,

    /// (Subject, Predicate) -> distinct objects
    by_subject_predicate: IndexMap<(RdfSubject, RdfPredicate), IndexSet<RdfObject>>,

    /// rdf:type object IRI -> subjects
    by_type: IndexMap<String, IndexSet<RdfSubject>>,
}

impl QuadStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from any quad source
    pub fn from_quads(quads: impl IntoIterator<Item = Quad>) -> Self {
        let mut store = Self::new();
        store.extend(quads);
        store
    }

    /// Insert a quad. Returns false if it was already present.
    pub fn insert(&mut self, quad: Quad) -> bool {
        if self.quads.contains(&quad) {
            return false;
        }

        let (position, _) = self.quads.insert_full(quad.clone());
        self.by_subject
            .entry(quad.subject.clone())
            .or_default()
            .push(position);

        if quad.predicate.as_str() == vocab::rdf::TYPE {
            if let RdfObject::NamedNode(class) = &quad.object {
                self.by_type
                    .entry(class.as_str().to_string())
                    .or_default()
                    .insert(quad.subject.clone());
            }
        }

        self.by_subject_predicate
            .entry((quad.subject, quad.predicate))
            .or_default()
            .insert(quad.object);

        true
    }

    /// Insert a triple into the default graph
    pub fn insert_triple(&mut self, triple: Triple) -> bool {
        self.insert(Quad::from_triple(triple))
    }

    /// Check if a quad exists in the store
    pub fn contains(&self, quad: &Quad) -> bool {
        self.quads.contains(quad)
    }

    /// Get the total number of quads
    pub fn len(&self) -> usize {
        self.quads.len()
    }

    /// Check if the store is empty
    pub fn is_empty(&self) -> bool {
        self.quads.is_empty()
    }

    /// Iterate quads in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &Quad> {
        self.quads.iter()
    }

    /// Quads with a specific subject
    pub fn quads_with_subject<'a>(
        &'a self,
        subject: &RdfSubject,
    ) -> impl Iterator<Item = &'a Quad> + 'a {
        self.by_subject
            .get(subject)
            .into_iter()
            .flatten()
            .filter_map(move |&position| self.quads.get_index(position))
    }

    /// Distinct objects of (subject, predicate)
    pub fn objects<'a>(
        &'a self,
        subject: &RdfSubject,
        predicate: &RdfPredicate,
    ) -> impl Iterator<Item = &'a RdfObject> + 'a {
        // The index key owns its terms, so the probe needs owned copies.
        self.by_subject_predicate
            .get(&(subject.clone(), predicate.clone()))
            .into_iter()
            .flatten()
    }

    /// Subjects declared with `rdf:type <class>`
    pub fn subjects_of_type(&self, class: &NamedNode) -> Vec<RdfSubject> {
        self.by_type
            .get(class.as_str())
            .map(|subjects| subjects.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Check whether any quad with subject `referrer` points at `target`
    pub fn references(&self, referrer: &RdfSubject, target: &RdfSubject) -> bool {
        let target: RdfObject = target.clone().into();
        self.quads_with_subject(referrer).any(|q| q.object == target)
    }

    /// Check whether a subject has any quad at all
    pub fn has_subject(&self, subject: &RdfSubject) -> bool {
        self.by_subject.contains_key(subject)
    }

    /// All distinct subjects, in first-seen order
    pub fn subjects(&self) -> impl Iterator<Item = &RdfSubject> {
        self.by_subject.keys()
    }

    /// Triples of one named graph
    pub fn graph(&self, graph_iri: &str) -> QuadStoreResult<Vec<Triple>> {
        let triples: Vec<Triple> = self
            .quads
            .iter()
            .filter(|q| q.graph.as_ref().map(|g| g.as_str()) == Some(graph_iri))
            .map(Quad::as_triple)
            .collect();
        if triples.is_empty() {
            return Err(QuadStoreError::GraphNotFound(graph_iri.to_string()));
        }
        Ok(triples)
    }

    /// Names of all graphs used in the store
    pub fn graph_names(&self) -> Vec<String> {
        self.quads
            .iter()
            .filter_map(|q| q.graph.as_ref().map(|g| g.as_str().to_string()))
            .collect::<IndexSet<_>>()
            .into_iter()
            .collect()
    }
}

impl Extend<Quad> for QuadStore {
    fn extend<T: IntoIterator<Item = Quad>>(&mut self, iter: T) {
        for quad in iter {
            self.insert(quad);
        }
    }
}

impl FromIterator<Quad> for QuadStore {
    fn from_iter<T: IntoIterator<Item = Quad>>(iter: T) -> Self {
        Self::from_quads(iter)
    }
}
