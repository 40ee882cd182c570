//! Topics: tags that users follow and questions are filed under

use crate::EntityId;
use serde::{Deserialize, Serialize};

/// A topic
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Topic {
    /// Unique identifier
    pub id: EntityId,
    /// Topic name
    pub name: String,
    /// Avatar image URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    /// Short introduction
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub introduction: Option<String>,
}

/// Data required to create a topic
#[derive(Debug, Clone)]
pub struct NewTopic {
    /// Topic name
    pub name: String,
    /// Avatar image URL
    pub avatar_url: Option<String>,
    /// Short introduction
    pub introduction: Option<String>,
}

/// Partial update of a topic
#[derive(Debug, Clone, Default)]
pub struct TopicPatch {
    /// New name
    pub name: Option<String>,
    /// New avatar URL
    pub avatar_url: Option<String>,
    /// New introduction
    pub introduction: Option<String>,
}
