//! Two-level comment threads under answers

use crate::EntityId;
use serde::{Deserialize, Serialize};

/// A comment on an answer
///
/// First-level comments have no `root_comment_id`; replies carry the id of
/// the first-level comment they belong to and optionally the user replied to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    /// Unique identifier
    pub id: EntityId,
    /// Comment body
    pub content: String,
    /// User who wrote the comment (owner)
    pub commentator: EntityId,
    /// Question the answer belongs to
    pub question_id: EntityId,
    /// Answer being commented on
    pub answer_id: EntityId,
    /// First-level comment this reply belongs to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root_comment_id: Option<EntityId>,
    /// User being replied to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reply_to: Option<EntityId>,
    /// Creation timestamp (seconds since Unix epoch)
    pub created_at: u64,
    /// Last update timestamp (seconds since Unix epoch)
    pub updated_at: u64,
}

impl Comment {
    /// Whether this is a reply inside another comment's thread
    pub fn is_reply(&self) -> bool {
        self.root_comment_id.is_some()
    }
}

/// Data required to post a comment
#[derive(Debug, Clone)]
pub struct NewComment {
    /// Comment body
    pub content: String,
    /// Commenting user
    pub commentator: EntityId,
    /// Question the answer belongs to
    pub question_id: EntityId,
    /// Answer being commented on
    pub answer_id: EntityId,
    /// First-level comment for replies
    pub root_comment_id: Option<EntityId>,
    /// User being replied to
    pub reply_to: Option<EntityId>,
}
