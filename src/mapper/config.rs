//! Mapper configuration

use super::error::{MappingError, MappingResult};
use crate::bean::MissingFieldPolicy;
use crate::rdf::{BlankNode, NamedNode};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Mapper configuration
///
/// Every key is optional in YAML:
///
/// ```yaml
/// missing_field_policy: leave_unset
/// strict_datatypes: true
/// blank_node_prefix: node
/// output_graph: http://example.org/graph
/// max_depth: 64
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapperConfig {
    /// Policy for required fields without a field-level override
    pub missing_field_policy: MissingFieldPolicy,
    /// Only accept literals whose datatype matches the declared one exactly
    pub strict_datatypes: bool,
    /// Leading characters of minted blank node labels
    pub blank_node_prefix: String,
    /// Named graph for emitted quads (None = default graph)
    pub output_graph: Option<String>,
    /// Deepest nesting followed in either direction
    pub max_depth: usize,
}

impl Default for MapperConfig {
    fn default() -> Self {
        Self {
            missing_field_policy: MissingFieldPolicy::Fail,
            strict_datatypes: false,
            blank_node_prefix: "b".to_string(),
            output_graph: None,
            max_depth: 1024,
        }
    }
}

impl MapperConfig {
    /// Parse and validate a YAML document
    pub fn from_yaml_str(yaml: &str) -> MappingResult<Self> {
        let config: MapperConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a YAML file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> MappingResult<Self> {
        let yaml = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&yaml)
    }

    pub fn validate(&self) -> MappingResult<()> {
        if self.max_depth == 0 {
            return Err(MappingError::Config("max_depth must be positive".to_string()));
        }
        BlankNode::with_id(&format!("{}0", self.blank_node_prefix)).map_err(|e| {
            MappingError::Config(format!(
                "blank_node_prefix {:?} is not a valid label start: {}",
                self.blank_node_prefix, e
            ))
        })?;
        self.output_graph_node()?;
        Ok(())
    }

    /// The output graph as a named node
    pub fn output_graph_node(&self) -> MappingResult<Option<NamedNode>> {
        self.output_graph
            .as_deref()
            .map(|iri| {
                NamedNode::new(iri).map_err(|e| MappingError::InvalidIri {
                    iri: iri.to_string(),
                    reason: e.to_string(),
                })
            })
            .transpose()
    }
}
