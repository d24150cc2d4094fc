//! Relationship graph - the weighted, undirected character graph.
//!
//! The graph consists of:
//! - **Nodes**: admitted catalog characters, keyed by unique name
//! - **Edges**: accumulated relation weight between two characters, with the
//!   relation kinds that contributed
//!
//! It is built once by [`GraphBuilder`] and only read afterwards, so it can be
//! shared between sessions behind an `Arc`.

mod builder;
mod export;
mod query;
mod rules;

pub use builder::*;
pub use export::*;
pub use query::*;
pub use rules::*;

use character_catalog::{CatalogRecord, CharacterId, RelationKind};
use petgraph::graph::{NodeIndex, UnGraph};
use petgraph::visit::EdgeRef;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A character in the relationship graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: CharacterId,
    pub name: String,
    /// Opaque image reference from the catalog.
    pub images: serde_json::Value,
}

impl GraphNode {
    /// Build a node from a record with the given (already validated) name.
    pub fn from_record(record: &CatalogRecord, name: &str) -> Self {
        Self {
            id: record.id,
            name: name.to_owned(),
            images: record.images.clone(),
        }
    }
}

/// An undirected relation between two characters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphEdge {
    /// Contributing relation kinds, sorted by label and de-duplicated.
    pub relations: Vec<RelationKind>,
    /// Sum of all contributing rule weights, always positive.
    pub weight: f64,
}

impl GraphEdge {
    /// Relation labels joined with `", "`, e.g. `"clan, team"`.
    pub fn label(&self) -> String {
        self.relations
            .iter()
            .map(RelationKind::label)
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Check if this edge carries a specific relation kind.
    pub fn has_relation(&self, kind: RelationKind) -> bool {
        self.relations.contains(&kind)
    }
}

/// The character graph with lookup indices.
#[derive(Debug, Clone, Default)]
pub struct RelationshipGraph {
    graph: UnGraph<GraphNode, GraphEdge>,

    /// Name -> node, the primary key.
    name_index: HashMap<String, NodeIndex>,

    /// Catalog id -> node. The first node wins if ids repeat.
    id_index: HashMap<CharacterId, NodeIndex>,
}

impl RelationshipGraph {
    /// Create a new empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node. Returns the existing index if the name is already present.
    pub fn add_node(&mut self, node: GraphNode) -> NodeIndex {
        if let Some(&idx) = self.name_index.get(&node.name) {
            return idx;
        }

        let name = node.name.clone();
        let id = node.id;
        let idx = self.graph.add_node(node);
        self.name_index.insert(name, idx);
        self.id_index.entry(id).or_insert(idx);
        idx
    }

    /// Add or replace the edge between two nodes.
    pub fn add_edge(&mut self, a: NodeIndex, b: NodeIndex, edge: GraphEdge) {
        self.graph.update_edge(a, b, edge);
    }

    /// Find node by character name.
    pub fn find_node(&self, name: &str) -> Option<NodeIndex> {
        self.name_index.get(name).copied()
    }

    /// Find node by catalog id.
    pub fn find_by_id(&self, id: CharacterId) -> Option<NodeIndex> {
        self.id_index.get(&id).copied()
    }

    /// Get node data.
    pub fn node(&self, idx: NodeIndex) -> Option<&GraphNode> {
        self.graph.node_weight(idx)
    }

    /// Get node data by character name.
    pub fn node_by_name(&self, name: &str) -> Option<&GraphNode> {
        self.find_node(name).and_then(|idx| self.node(idx))
    }

    /// Get the edge between two nodes, in either order.
    pub fn edge_between(&self, a: NodeIndex, b: NodeIndex) -> Option<&GraphEdge> {
        self.graph
            .find_edge(a, b)
            .and_then(|e| self.graph.edge_weight(e))
    }

    /// Get the edge between two characters by name.
    pub fn edge_between_names(&self, a: &str, b: &str) -> Option<&GraphEdge> {
        self.edge_between(self.find_node(a)?, self.find_node(b)?)
    }

    /// Direct neighbors of a node with the connecting edge.
    pub fn neighbors(&self, idx: NodeIndex) -> impl Iterator<Item = (NodeIndex, &GraphEdge)> {
        self.graph.edges(idx).map(move |e| {
            let other = if e.source() == idx { e.target() } else { e.source() };
            (other, e.weight())
        })
    }

    /// Iterate over all nodes with their attributes.
    pub fn nodes(&self) -> impl Iterator<Item = (NodeIndex, &GraphNode)> {
        self.graph
            .node_indices()
            .filter_map(move |idx| self.graph.node_weight(idx).map(|node| (idx, node)))
    }

    /// Iterate over all edges as `(endpoint, endpoint, attributes)`.
    pub fn edges(&self) -> impl Iterator<Item = (NodeIndex, NodeIndex, &GraphEdge)> {
        self.graph
            .edge_references()
            .map(|e| (e.source(), e.target(), e.weight()))
    }

    /// Node by insertion position, `0..node_count()`.
    pub fn node_at(&self, position: usize) -> Option<NodeIndex> {
        (position < self.graph.node_count()).then(|| NodeIndex::new(position))
    }

    /// Get node count.
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Get edge count.
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }
}

impl std::ops::Index<NodeIndex> for RelationshipGraph {
    type Output = GraphNode;

    /// Panics if the index is not a node of this graph.
    fn index(&self, idx: NodeIndex) -> &GraphNode {
        &self.graph[idx]
    }
}
