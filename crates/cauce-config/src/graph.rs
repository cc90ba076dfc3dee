//! Graph file format and operations.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::ConfigError;

/// On-disk description of a node graph.
///
/// Graphs are stored as TOML files naming each node, its registry type
/// id, and the wires between nodes. Node names are the wiring vocabulary;
/// they must be unique within a file.
///
/// # TOML Format
///
/// ```toml
/// buffer_count = 1
///
/// [[nodes]]
/// name = "src"
/// kind = "counter"
/// state = '{"next": 10, "step": 5}'
///
/// [[nodes]]
/// name = "sink"
/// kind = "probe"
///
/// [[wires]]
/// from = "src"
/// output = 0
/// to = "sink"
/// input = 0
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GraphFile {
    /// Buffer slots for pipelined execution (defaults to 1: no pipelining).
    #[serde(default = "default_buffer_count")]
    pub buffer_count: usize,

    /// Nodes in the graph.
    #[serde(default)]
    pub nodes: Vec<NodeEntry>,

    /// Wires between nodes.
    #[serde(default)]
    pub wires: Vec<WireEntry>,
}

fn default_buffer_count() -> usize {
    1
}

fn default_enabled() -> bool {
    true
}

/// One node in a graph file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NodeEntry {
    /// Unique name within the file; wires refer to nodes by name.
    pub name: String,

    /// Registry type id (e.g. `"counter"`).
    pub kind: String,

    /// Whether the node's processor runs on tick.
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Opaque node state blob, handed verbatim to
    /// [`restore_state`](cauce_core::Processor::restore_state).
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub state: String,
}

/// One wire in a graph file: `from`'s output feeding `to`'s input.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WireEntry {
    /// Source node name.
    pub from: String,
    /// Output index on the source node.
    pub output: usize,
    /// Destination node name.
    pub to: String,
    /// Input index on the destination node.
    pub input: usize,
}

impl Default for GraphFile {
    fn default() -> Self {
        Self::new()
    }
}

impl GraphFile {
    /// Creates an empty graph.
    pub fn new() -> Self {
        Self {
            buffer_count: 1,
            nodes: Vec::new(),
            wires: Vec::new(),
        }
    }

    /// Adds a node.
    pub fn with_node(mut self, name: impl Into<String>, kind: impl Into<String>) -> Self {
        self.nodes.push(NodeEntry {
            name: name.into(),
            kind: kind.into(),
            enabled: true,
            state: String::new(),
        });
        self
    }

    /// Adds a wire.
    pub fn with_wire(
        mut self,
        from: impl Into<String>,
        output: usize,
        to: impl Into<String>,
        input: usize,
    ) -> Self {
        self.wires.push(WireEntry {
            from: from.into(),
            output,
            to: to.into(),
            input,
        });
        self
    }

    /// Loads a graph from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
        let graph: GraphFile = toml::from_str(&content)?;
        Ok(graph)
    }

    /// Saves the graph to a TOML file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(|e| ConfigError::write_file(path, e))
    }

    /// Looks up a node entry by name.
    pub fn node(&self, name: &str) -> Option<&NodeEntry> {
        self.nodes.iter().find(|n| n.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_minimal_toml() {
        let graph: GraphFile = toml::from_str(
            r#"
            [[nodes]]
            name = "src"
            kind = "counter"
            "#,
        )
        .unwrap();
        assert_eq!(graph.buffer_count, 1);
        assert_eq!(graph.nodes.len(), 1);
        assert!(graph.nodes[0].enabled);
        assert_eq!(graph.nodes[0].state, "");
        assert!(graph.wires.is_empty());
    }

    #[test]
    fn file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("graph.toml");

        let mut graph = GraphFile::new()
            .with_node("src", "counter")
            .with_node("sink", "probe")
            .with_wire("src", 0, "sink", 0);
        graph.buffer_count = 3;
        graph.nodes[0].state = r#"{"next": 2}"#.to_string();

        graph.save(&path).unwrap();
        let loaded = GraphFile::load(&path).unwrap();
        assert_eq!(loaded, graph);
    }

    #[test]
    fn load_missing_file_reports_path() {
        let err = GraphFile::load("/nonexistent/graph.toml").unwrap_err();
        assert!(err.to_string().contains("/nonexistent/graph.toml"));
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "[[nodes]\nname=").unwrap();
        assert!(matches!(
            GraphFile::load(&path),
            Err(ConfigError::TomlParse(_))
        ));
    }
}
