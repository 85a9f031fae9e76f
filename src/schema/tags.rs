//! Semantic column tags

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Semantic tag attached to a schema column.
///
/// Tags classify features by role. Transforms only ever consult
/// `Sequence` and `Context`; the entity tags are carried for downstream
/// consumers such as retrieval models.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Tag {
    /// Variable-length per-example sequence
    Sequence,
    /// Per-example scalar or fixed-shape feature
    Context,
    Categorical,
    Continuous,
    List,
    Item,
    ItemId,
    User,
    UserId,
    Session,
    SessionId,
    Target,
    Binary,
    Regression,
    Embedding,
    /// Any tag outside the built-in vocabulary
    Custom(String),
}

impl Tag {
    /// Canonical snake_case name of the tag.
    pub fn as_str(&self) -> &str {
        match self {
            Tag::Sequence => "sequence",
            Tag::Context => "context",
            Tag::Categorical => "categorical",
            Tag::Continuous => "continuous",
            Tag::List => "list",
            Tag::Item => "item",
            Tag::ItemId => "item_id",
            Tag::User => "user",
            Tag::UserId => "user_id",
            Tag::Session => "session",
            Tag::SessionId => "session_id",
            Tag::Target => "target",
            Tag::Binary => "binary",
            Tag::Regression => "regression",
            Tag::Embedding => "embedding",
            Tag::Custom(name) => name,
        }
    }

    /// Whether the tag belongs to the built-in vocabulary.
    pub fn is_builtin(&self) -> bool {
        !matches!(self, Tag::Custom(_))
    }
}

impl FromStr for Tag {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tag = match s.trim().to_lowercase().replace('-', "_").as_str() {
            "sequence" => Tag::Sequence,
            "context" => Tag::Context,
            "categorical" => Tag::Categorical,
            "continuous" => Tag::Continuous,
            "list" => Tag::List,
            "item" => Tag::Item,
            "item_id" => Tag::ItemId,
            "user" => Tag::User,
            "user_id" => Tag::UserId,
            "session" => Tag::Session,
            "session_id" => Tag::SessionId,
            "target" => Tag::Target,
            "binary" => Tag::Binary,
            "regression" => Tag::Regression,
            "embedding" => Tag::Embedding,
            _ => Tag::Custom(s.trim().to_string()),
        };
        Ok(tag)
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Tag {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Tag {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(raw
            .parse()
            .unwrap_or_else(|never: std::convert::Infallible| match never {}))
    }
}
