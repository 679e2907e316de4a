//! RDF namespace and prefix management
//!
//! This module handles namespace prefixes for compact IRI notation. Bean
//! descriptors carry one of these tables and use it once, at build time, to
//! expand `prefix:local` names into absolute IRIs.

use indexmap::IndexMap;
use oxiri::Iri;
use thiserror::Error;

/// Prefix errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PrefixError {
    /// Unknown prefix
    #[error("Unknown prefix: {0}")]
    UnknownPrefix(String),

    /// Invalid IRI
    #[error("Invalid IRI: {0}")]
    InvalidIri(String),
}

pub type PrefixResult<T> = Result<T, PrefixError>;

/// Schemes accepted without `//`
pub const OPAQUE_SCHEMES: &[&str] = &["urn", "mailto", "tag", "tel", "data", "did"];

/// Prefix table, in declaration order
#[derive(Debug, Clone, Default)]
pub struct NamespaceManager {
    /// Prefix → IRI mappings
    prefixes: IndexMap<String, String>,
}

impl NamespaceManager {
    /// Create a namespace manager with the rdf, rdfs and xsd prefixes
    pub fn new() -> Self {
        let mut mgr = Self::empty();
        mgr.add_prefix("rdf", "http://www.w3.org/1999/02/22-rdf-syntax-ns#");
        mgr.add_prefix("rdfs", "http://www.w3.org/2000/01/rdf-schema#");
        mgr.add_prefix("xsd", "http://www.w3.org/2001/XMLSchema#");
        mgr
    }

    /// Create a namespace manager without any prefix
    pub fn empty() -> Self {
        Self {
            prefixes: IndexMap::new(),
        }
    }

    /// Add a prefix, replacing any previous binding
    pub fn add_prefix(&mut self, prefix: impl Into<String>, iri: impl Into<String>) {
        self.prefixes.insert(prefix.into(), iri.into());
    }

    /// Check whether a prefix is bound
    pub fn has_prefix(&self, prefix: &str) -> bool {
        self.prefixes.contains_key(prefix)
    }

    /// Get IRI for a prefix
    pub fn get_iri(&self, prefix: &str) -> PrefixResult<&str> {
        self.prefixes
            .get(prefix)
            .map(|s| s.as_str())
            .ok_or_else(|| PrefixError::UnknownPrefix(prefix.to_string()))
    }

    /// Expand a compact IRI (prefix:local) to full IRI
    pub fn expand(&self, compact_iri: &str) -> PrefixResult<String> {
        match compact_iri.split_once(':') {
            Some((prefix, local)) => {
                let iri = self.get_iri(prefix)?;
                Ok(format!("{}{}", iri, local))
            }
            None => Err(PrefixError::InvalidIri(compact_iri.to_string())),
        }
    }

    /// Resolve either a compact IRI with a bound prefix or an absolute IRI
    ///
    /// A name with an unbound prefix is only taken as absolute when it has
    /// an authority (`scheme://`) or uses one of the opaque schemes in
    /// [`OPAQUE_SCHEMES`]; anything else is reported as an unknown prefix.
    pub fn resolve(&self, iri: &str) -> PrefixResult<String> {
        if let Some((prefix, rest)) = iri.split_once(':') {
            if self.has_prefix(prefix) {
                return self.expand(iri);
            }
            let opaque = OPAQUE_SCHEMES
                .iter()
                .any(|scheme| scheme.eq_ignore_ascii_case(prefix));
            if !rest.starts_with("//") && !opaque {
                return Err(PrefixError::UnknownPrefix(prefix.to_string()));
            }
        }
        Iri::parse(iri)
            .map(|parsed| parsed.into_inner().to_string())
            .map_err(|e| PrefixError::InvalidIri(format!("{}: {}", iri, e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_common_prefixes() {
        let mgr = NamespaceManager::new();

        assert_eq!(
            mgr.get_iri("rdf").unwrap(),
            "http://www.w3.org/1999/02/22-rdf-syntax-ns#"
        );
        assert_eq!(mgr.get_iri("xsd").unwrap(), "http://www.w3.org/2001/XMLSchema#");
        assert!(NamespaceManager::empty().get_iri("rdf").is_err());
    }

    #[test]
    fn test_expand() {
        let mut mgr = NamespaceManager::new();
        mgr.add_prefix("foaf", "http://xmlns.com/foaf/0.1/");

        let expanded = mgr.expand("foaf:name").unwrap();
        assert_eq!(expanded, "http://xmlns.com/foaf/0.1/name");

        assert_eq!(
            mgr.expand("nope:name"),
            Err(PrefixError::UnknownPrefix("nope".to_string()))
        );
    }

    #[test]
    fn test_resolve_absolute_and_compact() {
        let mut mgr = NamespaceManager::new();
        mgr.add_prefix("ex", "http://example.org/");

        assert_eq!(mgr.resolve("ex:alice").unwrap(), "http://example.org/alice");
        assert_eq!(
            mgr.resolve("http://example.org/bob").unwrap(),
            "http://example.org/bob"
        );
        assert!(mgr.resolve("alice").is_err());
    }

    #[test]
    fn test_resolve_rejects_unbound_prefix() {
        let mut mgr = NamespaceManager::new();
        mgr.add_prefix("foaf", "http://xmlns.com/foaf/0.1/");

        assert_eq!(
            mgr.resolve("fooaf:Person"),
            Err(PrefixError::UnknownPrefix("fooaf".to_string()))
        );
        assert_eq!(
            mgr.resolve("urn:isbn:0451450523").unwrap(),
            "urn:isbn:0451450523"
        );
        assert_eq!(
            mgr.resolve("mailto:alice@example.org").unwrap(),
            "mailto:alice@example.org"
        );
    }
}
