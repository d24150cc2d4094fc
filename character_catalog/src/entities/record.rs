//! Catalog record definitions.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use super::{family_roles, CharacterId, Personal};

/// One normalized character entry from the source catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogRecord {
    pub id: CharacterId,
    /// Unique, case-sensitive node key. Records without one never become nodes.
    pub name: Option<String>,
    /// Opaque image reference, carried through unchanged.
    pub images: Value,
    /// The work the character debuted in (the anime debut in source data).
    pub debut_medium: Option<String>,
    /// Role -> character name. `None` when the source value was not a mapping.
    pub family: Option<BTreeMap<String, String>>,
    /// `None` when the source bundle was not a mapping.
    pub personal: Option<Personal>,
}

impl CatalogRecord {
    /// Create a record with the given id and name and no relation attributes.
    pub fn new(id: impl Into<CharacterId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: Some(name.into()),
            images: Value::Null,
            debut_medium: None,
            family: Some(BTreeMap::new()),
            personal: Some(Personal::default()),
        }
    }

    /// Normalize one raw catalog entry.
    ///
    /// Returns `None` when the entry is not an object or lacks an integer `id`.
    /// Malformed `family` or `personal` bundles do not reject the record.
    pub fn from_value(value: &Value) -> Option<Self> {
        let map = value.as_object()?;
        let id = CharacterId(map.get("id")?.as_u64()?);

        let name = map.get("name").and_then(Value::as_str).map(str::to_owned);
        let debut_medium = match map.get("debut") {
            Some(Value::String(s)) => Some(s.clone()),
            Some(Value::Object(debut)) => debut.get("anime").and_then(Value::as_str).map(str::to_owned),
            _ => None,
        };

        Some(Self {
            id,
            name,
            images: map.get("images").cloned().unwrap_or(Value::Null),
            debut_medium,
            family: family_roles(map.get("family")),
            personal: Personal::from_value(map.get("personal")),
        })
    }

    /// The node key, if the record has a non-empty name.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref().filter(|n| !n.is_empty())
    }

    /// Non-empty debut medium.
    pub fn debut(&self) -> Option<&str> {
        self.debut_medium.as_deref().filter(|d| !d.is_empty())
    }

    /// Whether any family role points at `name`.
    pub fn has_family_member(&self, name: &str) -> bool {
        self.family
            .as_ref()
            .is_some_and(|roles| roles.values().any(|member| member == name))
    }

    /// Set the image reference.
    pub fn with_images(mut self, images: Value) -> Self {
        self.images = images;
        self
    }

    /// Set the debut medium.
    pub fn with_debut(mut self, debut: impl Into<String>) -> Self {
        self.debut_medium = Some(debut.into());
        self
    }

    /// Add a family member under the given role.
    pub fn with_family(mut self, role: impl Into<String>, name: impl Into<String>) -> Self {
        self.family
            .get_or_insert_with(BTreeMap::new)
            .insert(role.into(), name.into());
        self
    }

    /// Replace the personal bundle.
    pub fn with_personal(mut self, personal: Personal) -> Self {
        self.personal = Some(personal);
        self
    }

    /// Mark the personal bundle as malformed.
    pub fn with_malformed_personal(mut self) -> Self {
        self.personal = None;
        self
    }
}
