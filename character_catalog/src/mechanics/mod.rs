//! Relationship mechanics: relation kinds and the weight table that scores them.

use serde::{Deserialize, Serialize};

/// Kinds of relation that can connect two characters.
///
/// Each kind is also the human-readable label written on graph edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationKind {
    Family,
    Clan,
    Partner,
    Team,
    /// Both characters debuted in the same work.
    AnimeDebut,
    Affiliation,
}

impl RelationKind {
    /// Edge label for this relation.
    pub fn label(&self) -> &'static str {
        match self {
            RelationKind::Family => "family",
            RelationKind::Clan => "clan",
            RelationKind::Partner => "partner",
            RelationKind::Team => "team",
            RelationKind::AnimeDebut => "anime_debut",
            RelationKind::Affiliation => "affiliation",
        }
    }
}

impl std::fmt::Display for RelationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

// Relation kinds order by label so edge labels sort alphabetically.
impl PartialOrd for RelationKind {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for RelationKind {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.label().cmp(other.label())
    }
}

/// Weight contributed by each relation rule.
///
/// Deserializes from a TOML/JSON table; missing entries keep their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeightTable {
    /// Either side lists the other as family.
    pub family: f64,
    /// Clan sets intersect.
    pub clan: f64,
    /// Both primary teams are the same team.
    pub same_primary_team: f64,
    /// One side's primary team appears in the other's team list.
    pub share_primary_team: f64,
    /// Per remaining common team.
    pub share_team: f64,
    pub anime_debut: f64,
    pub partner: f64,
    /// Per common affiliation.
    pub affiliation: f64,
    /// Per common affiliation equal to the special affiliation.
    pub special_affiliation: f64,
}

impl Default for WeightTable {
    fn default() -> Self {
        Self {
            family: 3.0,
            clan: 1.0,
            same_primary_team: 5.0,
            share_primary_team: 3.0,
            share_team: 0.5,
            anime_debut: 3.0,
            partner: 5.0,
            affiliation: 1.0,
            special_affiliation: 5.0,
        }
    }
}

impl WeightTable {
    /// Weight for one common affiliation.
    pub fn affiliation_weight(&self, is_special: bool) -> f64 {
        if is_special {
            self.special_affiliation
        } else {
            self.affiliation
        }
    }
}
