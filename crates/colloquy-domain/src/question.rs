//! Questions asked by users

use crate::EntityId;
use serde::{Deserialize, Serialize};

/// A question
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    /// Unique identifier
    pub id: EntityId,
    /// Question title
    pub title: String,
    /// Longer description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// User who asked the question (owner)
    pub questioner: EntityId,
    /// Topics the question is filed under
    #[serde(default)]
    pub topics: Vec<EntityId>,
    /// Creation timestamp (seconds since Unix epoch)
    pub created_at: u64,
    /// Last update timestamp (seconds since Unix epoch)
    pub updated_at: u64,
}

/// Data required to ask a question
#[derive(Debug, Clone)]
pub struct NewQuestion {
    /// Question title
    pub title: String,
    /// Longer description
    pub description: Option<String>,
    /// Asking user
    pub questioner: EntityId,
    /// Topics the question is filed under
    pub topics: Vec<EntityId>,
}

/// Partial update of a question
#[derive(Debug, Clone, Default)]
pub struct QuestionPatch {
    /// New title
    pub title: Option<String>,
    /// New description
    pub description: Option<String>,
    /// Replacement topic list
    pub topics: Option<Vec<EntityId>>,
}
