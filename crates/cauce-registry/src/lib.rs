//! Node registry and factory for cauce circuits.
//!
//! This crate provides a centralized registry for discovering and
//! instantiating node types. It enables dynamic node selection by type id
//! and provides metadata for building editors and CLIs.
//!
//! # Features
//!
//! - **Node Discovery**: List all available node types with metadata
//! - **Factory Pattern**: Create processors by type id at runtime
//! - **Category System**: Nodes organized by role (source, transform, sink)
//! - **Instance Numbering**: Each `create` hands out a deterministic
//!   per-type instance number, so "counter 1", "counter 2" naming needs no
//!   global state
//!
//! # Example
//!
//! ```rust
//! use cauce_core::Processor;
//! use cauce_registry::NodeRegistry;
//!
//! let mut registry = NodeRegistry::with_builtins();
//!
//! // List all node types
//! for node in registry.all_nodes() {
//!     println!("{}: {}", node.id, node.description);
//! }
//!
//! // Create a node by type id
//! let (counter, instance) = registry.create("counter").unwrap();
//! assert_eq!(instance, 1);
//! assert_eq!(counter.info().name, "Counter");
//! ```

use std::sync::Arc;

use cauce_core::{NodeCategory, Processor};
use cauce_nodes::{Constant, Counter, Delay, Passthrough, Probe, Scale};

/// Describes a node type in the registry.
#[derive(Debug, Clone)]
pub struct NodeDescriptor {
    /// Unique type identifier (lowercase, no spaces). Graph files refer
    /// to node types by this id.
    pub id: &'static str,
    /// Human-readable name.
    pub name: &'static str,
    /// Brief description of the node.
    pub description: &'static str,
    /// Category for organization.
    pub category: NodeCategory,
}

/// Factory function type for creating processors.
type NodeFactory = fn() -> Arc<dyn Processor>;

/// Internal entry in the registry.
struct RegistryEntry {
    descriptor: NodeDescriptor,
    factory: NodeFactory,
    /// Instances created so far; the next `create` hands out this + 1.
    instances: u64,
}

/// Registry of available node types.
///
/// The registry owns the instance counters, so two registries number
/// their instances independently — there is no process-global state.
pub struct NodeRegistry {
    entries: Vec<RegistryEntry>,
}

impl Default for NodeRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

impl NodeRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Creates a registry with all built-in node types registered.
    pub fn with_builtins() -> Self {
        let mut registry = Self {
            entries: Vec::with_capacity(6),
        };
        registry.register_builtin_nodes();
        registry
    }

    fn register_builtin_nodes(&mut self) {
        self.register(
            NodeDescriptor {
                id: "counter",
                name: "Counter",
                description: "Emits an incrementing integer each tick",
                category: NodeCategory::Source,
            },
            || Arc::new(Counter::default()),
        );

        self.register(
            NodeDescriptor {
                id: "constant",
                name: "Constant",
                description: "Emits a configured value each tick",
                category: NodeCategory::Source,
            },
            || Arc::new(Constant::new(0i64)),
        );

        self.register(
            NodeDescriptor {
                id: "scale",
                name: "Scale",
                description: "Multiplies numeric inputs by a factor",
                category: NodeCategory::Transform,
            },
            || Arc::new(Scale::default()),
        );

        self.register(
            NodeDescriptor {
                id: "passthrough",
                name: "Passthrough",
                description: "Forwards any value unchanged",
                category: NodeCategory::Utility,
            },
            || Arc::new(Passthrough),
        );

        self.register(
            NodeDescriptor {
                id: "delay",
                name: "Delay",
                description: "Emits the previous tick's input",
                category: NodeCategory::Utility,
            },
            || Arc::new(Delay::new()),
        );

        self.register(
            NodeDescriptor {
                id: "probe",
                name: "Probe",
                description: "Records the last value it saw",
                category: NodeCategory::Sink,
            },
            || Arc::new(Probe::new()),
        );
    }

    /// Registers a node type. Replaces any previous registration with the
    /// same id, keeping its instance counter.
    pub fn register(&mut self, descriptor: NodeDescriptor, factory: NodeFactory) {
        if let Some(entry) = self
            .entries
            .iter_mut()
            .find(|e| e.descriptor.id == descriptor.id)
        {
            entry.descriptor = descriptor;
            entry.factory = factory;
        } else {
            self.entries.push(RegistryEntry {
                descriptor,
                factory,
                instances: 0,
            });
        }
    }

    /// Creates a fresh processor of the given type, together with its
    /// 1-based instance number. Returns `None` for unknown type ids.
    pub fn create(&mut self, id: &str) -> Option<(Arc<dyn Processor>, u64)> {
        let entry = self.entries.iter_mut().find(|e| e.descriptor.id == id)?;
        entry.instances += 1;
        Some(((entry.factory)(), entry.instances))
    }

    /// Looks up a node type's descriptor.
    pub fn descriptor(&self, id: &str) -> Option<&NodeDescriptor> {
        self.entries
            .iter()
            .map(|e| &e.descriptor)
            .find(|d| d.id == id)
    }

    /// All registered node types, in registration order.
    pub fn all_nodes(&self) -> impl Iterator<Item = &NodeDescriptor> {
        self.entries.iter().map(|e| &e.descriptor)
    }

    /// Node types in the given category.
    pub fn nodes_in_category(
        &self,
        category: NodeCategory,
    ) -> impl Iterator<Item = &NodeDescriptor> {
        self.all_nodes().filter(move |d| d.category == category)
    }
}
