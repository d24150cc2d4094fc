//! Neighbor ranking queries.

use petgraph::graph::NodeIndex;
use serde::Serialize;
use std::cmp::Ordering;

use super::RelationshipGraph;
use crate::error::QueryError;

/// One ranked neighbor of a character.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Connection {
    pub name: String,
    /// Accumulated relation weight of the connecting edge.
    pub weight: f64,
}

impl RelationshipGraph {
    /// The strongest connections of a character.
    ///
    /// Neighbors are sorted by edge weight, highest first; equal weights are
    /// ordered alphabetically by name. At most `limit` entries are returned.
    /// A character that is in the graph but has no neighbors yields an empty
    /// list, while an unknown character yields [`QueryError::NotFound`].
    pub fn top_connections(&self, name: &str, limit: usize) -> Result<Vec<Connection>, QueryError> {
        let idx = self
            .find_node(name)
            .ok_or_else(|| QueryError::NotFound(name.to_owned()))?;

        Ok(self
            .ranked_neighbors(idx, limit)
            .into_iter()
            .filter_map(|(neighbor, weight)| {
                self.node(neighbor).map(|node| Connection {
                    name: node.name.clone(),
                    weight,
                })
            })
            .collect())
    }

    /// Ranked neighbors of a node by index, using the same ordering as
    /// [`RelationshipGraph::top_connections`].
    pub fn ranked_neighbors(&self, idx: NodeIndex, limit: usize) -> Vec<(NodeIndex, f64)> {
        let mut ranked: Vec<(NodeIndex, &str, f64)> = self
            .neighbors(idx)
            .filter_map(|(neighbor, edge)| {
                self.node(neighbor)
                    .map(|node| (neighbor, node.name.as_str(), edge.weight))
            })
            .collect();

        ranked.sort_by(|a, b| {
            b.2.partial_cmp(&a.2)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.1.cmp(b.1))
        });

        ranked
            .into_iter()
            .take(limit)
            .map(|(neighbor, _, weight)| (neighbor, weight))
            .collect()
    }
}
