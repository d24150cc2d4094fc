//! Relation rules - score one pair of catalog records.
//!
//! Every rule is independent and additive. A rule that does not apply adds
//! nothing; a rule that applies adds its weight and its relation label.
//! Rules run in a fixed order: family, clan, partner, team, debut, affiliation.

use character_catalog::{CatalogRecord, Personal, RelationKind, WeightTable};
use std::collections::{BTreeSet, HashSet};

use super::GraphEdge;

/// Accumulated weight and relation labels for one pair of characters.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PairScore {
    weight: f64,
    relations: BTreeSet<RelationKind>,
}

impl PairScore {
    /// Create an empty score.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a rule contribution (accumulates with existing weight).
    pub fn add(&mut self, kind: RelationKind, weight: f64) {
        self.weight += weight;
        self.relations.insert(kind);
    }

    /// Total accumulated weight.
    pub fn weight(&self) -> f64 {
        self.weight
    }

    /// Contributing relation kinds in label order.
    pub fn relations(&self) -> impl Iterator<Item = RelationKind> + '_ {
        self.relations.iter().copied()
    }

    /// Convert into an edge, or `None` if the pair is not connected.
    pub fn into_edge(self) -> Option<GraphEdge> {
        (self.weight > 0.0).then(|| GraphEdge {
            relations: self.relations.into_iter().collect(),
            weight: self.weight,
        })
    }
}

/// The relation rules with their weight table.
#[derive(Debug, Clone)]
pub struct RelationRules {
    weights: WeightTable,
    /// Affiliation that scores `special_affiliation` instead of `affiliation`.
    special_affiliation: Option<String>,
}

impl Default for RelationRules {
    fn default() -> Self {
        Self::new(WeightTable::default(), Some(DEFAULT_SPECIAL_AFFILIATION.to_owned()))
    }
}

/// Special affiliation used when none is configured.
pub const DEFAULT_SPECIAL_AFFILIATION: &str = "Akatsuki";

impl RelationRules {
    /// Create rules with the given weights and special affiliation.
    pub fn new(weights: WeightTable, special_affiliation: Option<String>) -> Self {
        Self {
            weights,
            special_affiliation,
        }
    }

    /// The weight table in use.
    pub fn weights(&self) -> &WeightTable {
        &self.weights
    }

    /// Score a pair of records.
    ///
    /// Returns `None` when the pair cannot be scored: either side lacks a
    /// name or has a malformed `personal` bundle.
    pub fn score(&self, a: &CatalogRecord, b: &CatalogRecord) -> Option<PairScore> {
        let (name_a, name_b) = (a.name()?, b.name()?);
        let (personal_a, personal_b) = (a.personal.as_ref()?, b.personal.as_ref()?);

        let mut score = PairScore::new();

        if a.has_family_member(name_b) || b.has_family_member(name_a) {
            score.add(RelationKind::Family, self.weights.family);
        }

        if intersects(&personal_a.clan, &personal_b.clan) {
            score.add(RelationKind::Clan, self.weights.clan);
        }

        if contains(&personal_a.partner, name_b) || contains(&personal_b.partner, name_a) {
            score.add(RelationKind::Partner, self.weights.partner);
        }

        if let Some(weight) = self.team_weight(personal_a, personal_b) {
            score.add(RelationKind::Team, weight);
        }

        if let (Some(debut_a), Some(debut_b)) = (a.debut(), b.debut()) {
            if debut_a == debut_b {
                score.add(RelationKind::AnimeDebut, self.weights.anime_debut);
            }
        }

        if let Some(weight) = self.affiliation_weight(personal_a, personal_b) {
            score.add(RelationKind::Affiliation, weight);
        }

        Some(score)
    }

    /// Team weight, or `None` if the two team lists share nothing.
    ///
    /// A shared primary team scores `same_primary_team`. Otherwise each
    /// primary team found anywhere in the other list scores
    /// `share_primary_team`. Common teams not consumed by those bonuses score
    /// `share_team` each.
    pub fn team_weight(&self, a: &Personal, b: &Personal) -> Option<f64> {
        let mut common = common_values(&a.team, &b.team);
        if common.is_empty() {
            return None;
        }

        let mut weight = 0.0;
        match (a.primary_team(), b.primary_team()) {
            (Some(primary_a), Some(primary_b)) if primary_a == primary_b => {
                weight += self.weights.same_primary_team;
                common.remove(primary_a);
            }
            (primary_a, primary_b) => {
                if let Some(primary) = primary_a.filter(|p| contains(&b.team, p)) {
                    weight += self.weights.share_primary_team;
                    common.remove(primary);
                }
                if let Some(primary) = primary_b.filter(|p| contains(&a.team, p)) {
                    weight += self.weights.share_primary_team;
                    common.remove(primary);
                }
            }
        }

        weight += self.weights.share_team * common.len() as f64;
        Some(weight)
    }

    /// Affiliation weight summed over common affiliations, or `None` if there
    /// are none.
    pub fn affiliation_weight(&self, a: &Personal, b: &Personal) -> Option<f64> {
        let common = common_values(&a.affiliation, &b.affiliation);
        if common.is_empty() {
            return None;
        }

        let special = self.special_affiliation.as_deref();
        Some(
            common
                .into_iter()
                .map(|name| self.weights.affiliation_weight(Some(name) == special))
                .sum(),
        )
    }
}

fn contains(values: &[String], needle: &str) -> bool {
    values.iter().any(|v| v == needle)
}

fn intersects(a: &[String], b: &[String]) -> bool {
    a.iter().any(|v| contains(b, v))
}

fn common_values<'a>(a: &'a [String], b: &[String]) -> BTreeSet<&'a str> {
    let other: HashSet<&str> = b.iter().map(String::as_str).collect();
    a.iter()
        .map(String::as_str)
        .filter(|v| other.contains(v))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use character_catalog::CatalogRecord;

    fn teams(names: &[&str]) -> Personal {
        Personal {
            team: names.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        }
    }

    fn record(id: u64, name: &str, personal: Personal) -> CatalogRecord {
        CatalogRecord::new(id, name).with_personal(personal)
    }

    #[test]
    fn test_pair_score_accumulates() {
        let mut score = PairScore::new();
        score.add(RelationKind::Team, 3.0);
        score.add(RelationKind::Clan, 1.0);
        score.add(RelationKind::Team, 0.5);

        assert!((score.weight() - 4.5).abs() < f64::EPSILON);
        let edge = score.into_edge().unwrap();
        assert_eq!(edge.relations, vec![RelationKind::Clan, RelationKind::Team]);
        assert_eq!(edge.label(), "clan, team");
    }

    #[test]
    fn test_zero_score_is_not_an_edge() {
        assert!(PairScore::new().into_edge().is_none());

        let mut zero_weight = PairScore::new();
        zero_weight.add(RelationKind::Clan, 0.0);
        assert!(zero_weight.into_edge().is_none());
    }

    #[test]
    fn test_same_primary_team() {
        let rules = RelationRules::default();
        let weight = rules.team_weight(&teams(&["Team 7"]), &teams(&["Team 7"]));
        assert_eq!(weight, Some(5.0));
    }

    #[test]
    fn test_same_primary_plus_other_common_team() {
        let rules = RelationRules::default();
        let weight = rules.team_weight(
            &teams(&["Team 7", "Kakashi Squad"]),
            &teams(&["Team 7", "Kakashi Squad"]),
        );
        assert_eq!(weight, Some(5.5));
    }

    #[test]
    fn test_share_primary_one_direction() {
        let rules = RelationRules::default();
        // A's primary sits in B's secondary slot; B's primary is not in A.
        let weight = rules.team_weight(&teams(&["Anbu"]), &teams(&["Root", "Anbu"]));
        assert_eq!(weight, Some(3.0));
    }

    #[test]
    fn test_share_primary_both_directions() {
        let rules = RelationRules::default();
        let weight = rules.team_weight(
            &teams(&["Team Guy", "Team Kakashi"]),
            &teams(&["Team Kakashi", "Team Guy"]),
        );
        assert_eq!(weight, Some(6.0));
    }

    #[test]
    fn test_non_primary_common_team() {
        let rules = RelationRules::default();
        let weight = rules.team_weight(
            &teams(&["Team Minato", "Konoha 11"]),
            &teams(&["Team Asuma", "Konoha 11"]),
        );
        assert_eq!(weight, Some(0.5));
        assert_eq!(rules.team_weight(&teams(&["A"]), &teams(&["B"])), None);
    }

    #[test]
    fn test_affiliation_weights() {
        let rules = RelationRules::default();
        let a = Personal {
            affiliation: vec!["Akatsuki".into(), "Amegakure".into(), "Konohagakure".into()],
            ..Default::default()
        };
        let b = Personal {
            affiliation: vec!["Amegakure".into(), "Akatsuki".into()],
            ..Default::default()
        };
        assert_eq!(rules.affiliation_weight(&a, &b), Some(6.0));
        assert_eq!(rules.affiliation_weight(&a, &Personal::default()), None);
    }

    #[test]
    fn test_family_either_direction() {
        let rules = RelationRules::default();
        let son = CatalogRecord::new(1u64, "Boruto").with_family("father", "Naruto");
        let father = CatalogRecord::new(2u64, "Naruto");

        let score = rules.score(&father, &son).unwrap();
        assert_eq!(score.weight(), 3.0);
        assert_eq!(score.relations().collect::<Vec<_>>(), vec![RelationKind::Family]);
    }

    #[test]
    fn test_malformed_family_disqualifies_one_side_only() {
        let rules = RelationRules::default();
        let mut broken = CatalogRecord::new(1u64, "Kushina");
        broken.family = None;
        let other = CatalogRecord::new(2u64, "Naruto").with_family("mother", "Kushina");

        assert_eq!(rules.score(&broken, &other).unwrap().weight(), 3.0);
    }

    #[test]
    fn test_partner_and_clan_and_debut() {
        let rules = RelationRules::default();
        let a = record(
            1,
            "Jiraiya",
            Personal {
                partner: vec!["Gamabunta".into()],
                clan: vec!["Sannin".into()],
                ..Default::default()
            },
        )
        .with_debut("Naruto Episode #52");
        let b = record(
            2,
            "Gamabunta",
            Personal {
                clan: vec!["Sannin".into()],
                ..Default::default()
            },
        )
        .with_debut("Naruto Episode #52");

        let score = rules.score(&a, &b).unwrap();
        assert_eq!(score.weight(), 1.0 + 5.0 + 3.0);
        let edge = score.into_edge().unwrap();
        assert_eq!(edge.label(), "anime_debut, clan, partner");
    }

    #[test]
    fn test_empty_debut_does_not_match() {
        let rules = RelationRules::default();
        let a = CatalogRecord::new(1u64, "A").with_debut("");
        let b = CatalogRecord::new(2u64, "B").with_debut("");
        assert!(rules.score(&a, &b).unwrap().into_edge().is_none());
    }

    #[test]
    fn test_unscorable_pairs() {
        let rules = RelationRules::default();
        let ok = CatalogRecord::new(1u64, "A");
        let malformed = CatalogRecord::new(2u64, "B").with_malformed_personal();
        let mut nameless = CatalogRecord::new(3u64, "C");
        nameless.name = None;

        assert!(rules.score(&ok, &malformed).is_none());
        assert!(rules.score(&nameless, &ok).is_none());
    }

    #[test]
    fn test_one_rule_changes_weight_by_its_constant() {
        let rules = RelationRules::default();
        let a = record(1, "A", teams(&["Team 7"]));
        let b = record(2, "B", teams(&["Team 7"]));
        let base = rules.score(&a, &b).unwrap().weight();

        let b_with_clan = record(
            2,
            "B",
            Personal {
                clan: vec!["Uchiha".into()],
                ..teams(&["Team 7"])
            },
        );
        let a_with_clan = record(
            1,
            "A",
            Personal {
                clan: vec!["Uchiha".into()],
                ..teams(&["Team 7"])
            },
        );
        let with_clan = rules.score(&a_with_clan, &b_with_clan).unwrap().weight();

        assert_eq!(with_clan - base, rules.weights().clan);
    }
}
