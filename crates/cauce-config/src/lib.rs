//! Graph persistence for cauce circuits.
//!
//! This crate defines the on-disk graph format and turns graph files into
//! running circuits. Graphs are TOML: a list of named nodes (registry type
//! ids plus optional state blobs) and the wires between them.
//!
//! # Features
//!
//! - **Graph Files**: Load and save node graphs as TOML
//! - **Validation**: Catch unknown node types, duplicate names, and
//!   dangling wires before instantiation
//! - **Instantiation**: Build a live [`Circuit`](cauce_core::Circuit) from
//!   a graph file, restoring each node's saved state
//!
//! # Example
//!
//! ```rust,no_run
//! use cauce_config::{GraphFile, instantiate};
//! use cauce_registry::NodeRegistry;
//!
//! let graph = GraphFile::load("pipeline.toml").unwrap();
//! let mut registry = NodeRegistry::with_builtins();
//! let mut live = instantiate(&graph, &mut registry).unwrap();
//! live.circuit.tick(cauce_core::TickMode::Series);
//! ```

mod error;
mod graph;
mod instantiate;

/// Graph structure validation against a registry.
pub mod validation;

pub use error::ConfigError;
pub use graph::{GraphFile, NodeEntry, WireEntry};
pub use instantiate::{instantiate, InstantiatedGraph};
pub use validation::{validate, ValidationError};

/// Re-export commonly used types from cauce-registry
pub use cauce_registry::{NodeDescriptor, NodeRegistry};
