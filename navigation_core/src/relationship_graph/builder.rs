//! Graph builder - turns catalog records into the weighted relationship graph.

use character_catalog::CatalogRecord;
use petgraph::graph::NodeIndex;
use tracing::{debug, info, warn};

use super::{GraphNode, RelationRules, RelationshipGraph};

/// Debut prefix excluded when none is configured.
pub const DEFAULT_EXCLUDED_DEBUT_PREFIX: &str = "Boruto";

/// Builds a [`RelationshipGraph`] from catalog records.
#[derive(Debug, Clone)]
pub struct GraphBuilder {
    rules: RelationRules,
    /// Characters whose debut medium starts with one of these are not admitted.
    excluded_debut_prefixes: Vec<String>,
}

impl Default for GraphBuilder {
    fn default() -> Self {
        Self::new(RelationRules::default())
            .with_excluded_prefixes([DEFAULT_EXCLUDED_DEBUT_PREFIX])
    }
}

impl GraphBuilder {
    /// Create a builder with the given rules and no exclusions.
    pub fn new(rules: RelationRules) -> Self {
        Self {
            rules,
            excluded_debut_prefixes: Vec::new(),
        }
    }

    /// Replace the excluded debut prefixes.
    pub fn with_excluded_prefixes<S: Into<String>>(
        mut self,
        prefixes: impl IntoIterator<Item = S>,
    ) -> Self {
        self.excluded_debut_prefixes = prefixes.into_iter().map(Into::into).collect();
        self
    }

    /// The relation rules in use.
    pub fn rules(&self) -> &RelationRules {
        &self.rules
    }

    fn is_excluded(&self, record: &CatalogRecord) -> bool {
        record.debut_medium.as_deref().is_some_and(|debut| {
            self.excluded_debut_prefixes
                .iter()
                .any(|prefix| debut.starts_with(prefix.as_str()))
        })
    }

    /// Build the graph.
    ///
    /// Every unordered pair of admitted records is scored; pairs with a
    /// positive total become edges. Malformed records never abort the build.
    pub fn build(&self, records: &[CatalogRecord]) -> RelationshipGraph {
        let mut graph = RelationshipGraph::new();

        // Phase 1: admit nodes
        let mut admitted: Vec<(&CatalogRecord, NodeIndex)> = Vec::new();
        for record in records {
            let Some(name) = record.name() else {
                debug!(id = %record.id, "skipping record without a name");
                continue;
            };
            if self.is_excluded(record) {
                debug!(name, "skipping record with excluded debut");
                continue;
            }
            if graph.find_node(name).is_some() {
                warn!(name, id = %record.id, "skipping record with duplicate name");
                continue;
            }

            let idx = graph.add_node(GraphNode::from_record(record, name));
            admitted.push((record, idx));
        }

        // Phase 2: score every pair
        for (i, &(left, left_idx)) in admitted.iter().enumerate() {
            if left.personal.is_none() {
                debug!(id = %left.id, "record has malformed personal attributes, no relations");
                continue;
            }

            for &(right, right_idx) in &admitted[i + 1..] {
                let Some(edge) = self
                    .rules
                    .score(left, right)
                    .and_then(|score| score.into_edge())
                else {
                    continue;
                };
                graph.add_edge(left_idx, right_idx, edge);
            }
        }

        info!(
            records = records.len(),
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            "relationship graph built"
        );
        graph
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use character_catalog::{CharacterId, Personal, RelationKind};
    use pretty_assertions::assert_eq;

    fn with_teams(id: u64, name: &str, teams: &[&str]) -> CatalogRecord {
        CatalogRecord::new(id, name).with_personal(Personal {
            team: teams.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        })
    }

    #[test]
    fn test_same_primary_team_only() {
        let records = vec![
            with_teams(1, "Naruto", &["Team 7"]),
            with_teams(2, "Sakura", &["Team 7"]),
        ];
        let graph = GraphBuilder::default().build(&records);

        let edge = graph.edge_between_names("Naruto", "Sakura").unwrap();
        assert_eq!(edge.weight, 5.0);
        assert_eq!(edge.label(), "team");
    }

    #[test]
    fn test_clan_and_non_primary_team() {
        let clan = |id: u64, name: &str, teams: &[&str]| {
            CatalogRecord::new(id, name).with_personal(Personal {
                clan: vec!["Hyuga".into()],
                team: teams.iter().map(|s| s.to_string()).collect(),
                ..Default::default()
            })
        };
        let records = vec![
            clan(1, "Hinata", &["Team 8", "Konoha 11"]),
            clan(2, "Neji", &["Team Guy", "Konoha 11"]),
        ];
        let graph = GraphBuilder::default().build(&records);

        let edge = graph.edge_between_names("Hinata", "Neji").unwrap();
        assert_eq!(edge.weight, 1.5);
        assert_eq!(edge.label(), "clan, team");
    }

    #[test]
    fn test_pairs_are_exhaustive_not_adjacent() {
        let records = vec![
            with_teams(1, "A", &["Squad"]),
            with_teams(2, "B", &["Other"]),
            with_teams(3, "C", &["Squad"]),
        ];
        let graph = GraphBuilder::default().build(&records);

        assert!(graph.edge_between_names("A", "C").is_some());
        assert!(graph.edge_between_names("A", "B").is_none());
        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn test_no_edge_without_relation() {
        let records = vec![CatalogRecord::new(1u64, "A"), CatalogRecord::new(2u64, "B")];
        let graph = GraphBuilder::default().build(&records);

        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn test_excluded_debut_is_not_admitted() {
        let records = vec![
            with_teams(1, "Naruto", &["Team 7"]).with_debut("Naruto Episode #1"),
            with_teams(2, "Sarada", &["Team 7"])
                .with_debut("Boruto: Naruto Next Generations Episode #1"),
        ];
        let graph = GraphBuilder::default().build(&records);

        assert!(graph.find_node("Sarada").is_none());
        assert_eq!(graph.node_count(), 1);
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn test_custom_exclusions() {
        let records = vec![CatalogRecord::new(1u64, "Sarada").with_debut("Boruto: Episode #1")];
        let graph = GraphBuilder::new(RelationRules::default())
            .with_excluded_prefixes(Vec::<String>::new())
            .build(&records);

        assert!(graph.find_node("Sarada").is_some());
    }

    #[test]
    fn test_nameless_and_duplicate_records_are_skipped() {
        let mut nameless = with_teams(1, "ignored", &["Team 7"]);
        nameless.name = None;
        let records = vec![
            nameless,
            with_teams(2, "Kakashi", &["Team 7"]),
            with_teams(3, "Kakashi", &["Anbu"]),
            with_teams(4, "Sai", &["Team 7"]),
        ];
        let graph = GraphBuilder::default().build(&records);

        assert_eq!(graph.node_count(), 2);
        let kakashi = graph.node_by_name("Kakashi").unwrap();
        assert_eq!(kakashi.id, CharacterId(2));
        assert_eq!(graph.edge_between_names("Kakashi", "Sai").unwrap().weight, 5.0);
    }

    #[test]
    fn test_malformed_personal_contributes_no_edges() {
        let records = vec![
            with_teams(1, "Naruto", &["Team 7"]).with_family("father", "Minato"),
            CatalogRecord::new(2u64, "Minato").with_malformed_personal(),
            with_teams(3, "Sasuke", &["Team 7"]),
        ];
        let graph = GraphBuilder::default().build(&records);

        assert_eq!(graph.node_count(), 3);
        let minato = graph.find_node("Minato").unwrap();
        assert_eq!(graph.neighbors(minato).count(), 0);
        assert!(graph
            .edge_between_names("Naruto", "Sasuke")
            .unwrap()
            .has_relation(RelationKind::Team));
    }

    #[test]
    fn test_edge_weights_are_positive() {
        let records = vec![
            with_teams(1, "A", &["X", "Y"]).with_debut("Ep 1"),
            with_teams(2, "B", &["Y", "X"]).with_debut("Ep 1"),
            with_teams(3, "C", &["Z"]),
            with_teams(4, "D", &["Z", "X"]).with_family("sibling", "A"),
        ];
        let graph = GraphBuilder::default().build(&records);

        assert!(graph.edge_count() > 0);
        for (_, _, edge) in graph.edges() {
            assert!(edge.weight > 0.0);
            let mut sorted = edge.relations.clone();
            sorted.sort();
            sorted.dedup();
            assert_eq!(sorted, edge.relations);
        }
    }

    #[test]
    fn test_insertion_order_does_not_change_graph() {
        let records = vec![
            with_teams(1, "A", &["X", "Y"]),
            with_teams(2, "B", &["Y"]),
            with_teams(3, "C", &["X"]),
        ];
        let mut reversed = records.clone();
        reversed.reverse();

        let forward = GraphBuilder::default().build(&records);
        let backward = GraphBuilder::default().build(&reversed);

        for (a, b) in [("A", "B"), ("A", "C"), ("B", "C")] {
            assert_eq!(
                forward.edge_between_names(a, b).map(|e| e.weight),
                backward.edge_between_names(a, b).map(|e| e.weight),
            );
        }
    }
}
