//! Graph structure validation.
//!
//! Validation catches file-level mistakes — unknown node types, duplicate
//! names, wires to nodes that don't exist — before any processor is
//! created. Slot-index errors are left to instantiation, where the
//! circuit checks them against the actual processors.

use std::collections::HashSet;
use thiserror::Error;

use crate::graph::GraphFile;
use cauce_registry::NodeRegistry;

/// Graph structure error types.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Unknown node type id.
    #[error("node '{node}' has unknown type '{kind}'")]
    UnknownKind {
        /// Name of the node with the unknown type.
        node: String,
        /// The unrecognized type id.
        kind: String,
    },

    /// Two nodes share a name.
    #[error("duplicate node name '{0}'")]
    DuplicateName(String),

    /// A wire endpoint names a node the file doesn't define.
    #[error("wire endpoint '{0}' is not a node in this graph")]
    UnknownEndpoint(String),

    /// Two wires feed the same input.
    #[error("input {input} of '{node}' has more than one wire")]
    DuplicateWire {
        /// Destination node name.
        node: String,
        /// The doubly-wired input index.
        input: usize,
    },

    /// Multiple validation errors.
    #[error("multiple validation errors: {}", .0.iter().map(|e| e.to_string()).collect::<Vec<_>>().join("; "))]
    Multiple(Vec<ValidationError>),
}

/// Validates a graph file against a registry.
///
/// Collects every problem rather than stopping at the first; a graph with
/// several mistakes reports them all in one pass.
pub fn validate(graph: &GraphFile, registry: &NodeRegistry) -> Result<(), ValidationError> {
    let mut errors = Vec::new();
    let mut names = HashSet::new();

    for node in &graph.nodes {
        if !names.insert(node.name.as_str()) {
            errors.push(ValidationError::DuplicateName(node.name.clone()));
        }
        if registry.descriptor(&node.kind).is_none() {
            errors.push(ValidationError::UnknownKind {
                node: node.name.clone(),
                kind: node.kind.clone(),
            });
        }
    }

    let mut wired_inputs = HashSet::new();
    for wire in &graph.wires {
        for endpoint in [&wire.from, &wire.to] {
            if !names.contains(endpoint.as_str()) {
                errors.push(ValidationError::UnknownEndpoint(endpoint.clone()));
            }
        }
        if !wired_inputs.insert((wire.to.as_str(), wire.input)) {
            errors.push(ValidationError::DuplicateWire {
                node: wire.to.clone(),
                input: wire.input,
            });
        }
    }

    match errors.len() {
        0 => Ok(()),
        1 => Err(errors.swap_remove(0)),
        _ => Err(ValidationError::Multiple(errors)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> NodeRegistry {
        NodeRegistry::with_builtins()
    }

    #[test]
    fn valid_graph_passes() {
        let graph = GraphFile::new()
            .with_node("src", "counter")
            .with_node("sink", "probe")
            .with_wire("src", 0, "sink", 0);
        assert_eq!(validate(&graph, &registry()), Ok(()));
    }

    #[test]
    fn unknown_kind_is_reported() {
        let graph = GraphFile::new().with_node("x", "warp-drive");
        assert_eq!(
            validate(&graph, &registry()),
            Err(ValidationError::UnknownKind {
                node: "x".into(),
                kind: "warp-drive".into(),
            })
        );
    }

    #[test]
    fn duplicate_names_and_dangling_wires_collect() {
        let graph = GraphFile::new()
            .with_node("a", "counter")
            .with_node("a", "probe")
            .with_wire("a", 0, "ghost", 0);
        let Err(ValidationError::Multiple(errors)) = validate(&graph, &registry()) else {
            panic!("expected multiple errors");
        };
        assert!(errors.contains(&ValidationError::DuplicateName("a".into())));
        assert!(errors.contains(&ValidationError::UnknownEndpoint("ghost".into())));
    }

    #[test]
    fn double_wired_input_is_rejected() {
        let graph = GraphFile::new()
            .with_node("a", "counter")
            .with_node("b", "constant")
            .with_node("sink", "probe")
            .with_wire("a", 0, "sink", 0)
            .with_wire("b", 0, "sink", 0);
        assert_eq!(
            validate(&graph, &registry()),
            Err(ValidationError::DuplicateWire {
                node: "sink".into(),
                input: 0,
            })
        );
    }
}
