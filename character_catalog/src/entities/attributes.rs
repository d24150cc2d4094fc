//! Attribute normalization for raw catalog values.
//!
//! Catalog attributes are "one-or-many": absent, a single string, or a list.
//! Every list-shaped attribute goes through [`to_list`] so relation rules
//! only ever see `Vec<String>`.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Coerce a one-or-many catalog value into a list of strings.
///
/// `null` becomes an empty list, a string becomes a one-element list and an
/// array keeps its string elements in order. Any other shape yields nothing.
pub fn to_list(value: &Value) -> Vec<String> {
    match value {
        Value::String(s) => vec![s.clone()],
        Value::Array(items) => items
            .iter()
            .filter_map(|item| item.as_str().map(str::to_owned))
            .collect(),
        _ => Vec::new(),
    }
}

/// Normalize a family attribute into a role -> name mapping.
///
/// Absent values give an empty mapping. Returns `None` when the value is
/// present but not a mapping. Non-string names inside a mapping are ignored.
pub fn family_roles(value: Option<&Value>) -> Option<BTreeMap<String, String>> {
    match value {
        None | Some(Value::Null) => Some(BTreeMap::new()),
        Some(Value::Object(map)) => Some(
            map.iter()
                .filter_map(|(role, name)| name.as_str().map(|n| (role.clone(), n.to_owned())))
                .collect(),
        ),
        Some(_) => None,
    }
}

/// Personal attributes that drive clan, team, affiliation and partner rules.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Personal {
    pub clan: Vec<String>,
    /// The first team is the character's primary team.
    pub team: Vec<String>,
    pub affiliation: Vec<String>,
    pub partner: Vec<String>,
}

impl Personal {
    /// Normalize a raw `personal` bundle.
    ///
    /// Returns `None` when the bundle is present but not a mapping.
    pub fn from_value(value: Option<&Value>) -> Option<Self> {
        match value {
            None | Some(Value::Null) => Some(Self::default()),
            Some(Value::Object(map)) => {
                let field = |key: &str| map.get(key).map(to_list).unwrap_or_default();
                Some(Self {
                    clan: field("clan"),
                    team: field("team"),
                    affiliation: field("affiliation"),
                    partner: field("partner"),
                })
            }
            Some(_) => None,
        }
    }

    /// The primary team, if the character has a non-empty first team.
    pub fn primary_team(&self) -> Option<&str> {
        self.team.first().map(String::as_str).filter(|t| !t.is_empty())
    }
}
