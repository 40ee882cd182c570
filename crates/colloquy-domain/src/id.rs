//! Entity identifiers shared by every resource in the system

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Unique identifier for users, topics, questions, answers and comments
///
/// Backed by a UUIDv7 so identifiers sort by creation time. The canonical
/// form is the hyphenated lowercase UUID string; references are compared on
/// the parsed value, so two spellings of the same UUID are the same id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntityId(u128);

impl EntityId {
    /// Generate a new UUIDv7-based EntityId
    ///
    /// # Examples
    ///
    /// ```
    /// use colloquy_domain::EntityId;
    ///
    /// let id = EntityId::new();
    /// assert!(id.value() > 0);
    /// ```
    pub fn new() -> Self {
        Self(uuid::Uuid::now_v7().as_u128())
    }

    /// Create an EntityId from a raw u128 value
    pub fn from_value(value: u128) -> Self {
        Self(value)
    }

    /// Parse an EntityId from its string form
    ///
    /// # Examples
    ///
    /// ```
    /// use colloquy_domain::EntityId;
    ///
    /// let id = EntityId::new();
    /// let parsed = EntityId::from_string(&id.to_string()).unwrap();
    /// assert_eq!(id, parsed);
    /// ```
    pub fn from_string(s: &str) -> Result<Self, String> {
        uuid::Uuid::parse_str(s)
            .map(|u| Self(u.as_u128()))
            .map_err(|e| format!("Invalid id '{}': {}", s, e))
    }

    /// Get the raw u128 value
    pub fn value(&self) -> u128 {
        self.0
    }
}

impl Default for EntityId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", uuid::Uuid::from_u128(self.0))
    }
}

impl FromStr for EntityId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_string(s)
    }
}

impl Serialize for EntityId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for EntityId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        EntityId::from_string(&s).map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_id_chronological() {
        let id1 = EntityId::new();
        std::thread::sleep(std::time::Duration::from_millis(2));
        let id2 = EntityId::new();

        assert!(id1 < id2, "Earlier UUIDv7 should sort before later UUIDv7");
    }

    #[test]
    fn test_canonical_comparison() {
        let id = EntityId::new();
        let upper = id.to_string().to_uppercase();

        // Same UUID spelled differently is the same reference
        assert_eq!(EntityId::from_string(&upper).unwrap(), id);
        assert_eq!(id.to_string().len(), 36);
    }

    #[test]
    fn test_invalid_string() {
        assert!(EntityId::from_string("not-an-id").is_err());
        assert!(EntityId::from_string("").is_err());
    }

    #[test]
    fn test_serde_as_string() {
        let id = EntityId::from_value(42);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{}\"", id));

        let back: EntityId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);

        assert!(serde_json::from_str::<EntityId>("\"bogus\"").is_err());
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Ordering of ids matches ordering of their raw values
        #[test]
        fn test_id_ordering_property(a: u128, b: u128) {
            let id_a = EntityId::from_value(a);
            let id_b = EntityId::from_value(b);

            prop_assert_eq!(id_a < id_b, a < b);
            prop_assert_eq!(id_a == id_b, a == b);
        }
    }
}
