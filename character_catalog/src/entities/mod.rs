//! Entity definitions for the character catalog.

mod attributes;
mod record;

pub use attributes::*;
pub use record::*;

use serde::{Deserialize, Serialize};

/// Numeric identifier of a catalog character.
///
/// Identifiers come from the source catalog; they are not required to be
/// contiguous or ordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CharacterId(pub u64);

impl CharacterId {
    /// Create a character ID from a raw catalog value.
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }
}

impl From<u64> for CharacterId {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}

impl std::fmt::Display for CharacterId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_character_id_display() {
        assert_eq!(CharacterId::new(1344).to_string(), "1344");
    }

    #[test]
    fn test_character_id_serializes_as_number() {
        let json = serde_json::to_string(&CharacterId(7)).unwrap();
        assert_eq!(json, "7");
    }
}
