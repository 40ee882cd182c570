//! Answers to questions

use crate::EntityId;
use serde::{Deserialize, Serialize};

/// An answer
///
/// `vote_count` is denormalized: it equals the number of users whose
/// `likingAnswers` set holds this answer and is only adjusted by the toggle
/// engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Answer {
    /// Unique identifier
    pub id: EntityId,
    /// Answer body
    pub content: String,
    /// User who wrote the answer (owner)
    pub answerer: EntityId,
    /// Question being answered
    pub question_id: EntityId,
    /// Number of likes
    pub vote_count: i64,
    /// Creation timestamp (seconds since Unix epoch)
    pub created_at: u64,
    /// Last update timestamp (seconds since Unix epoch)
    pub updated_at: u64,
}

/// Data required to post an answer
#[derive(Debug, Clone)]
pub struct NewAnswer {
    /// Answer body
    pub content: String,
    /// Answering user
    pub answerer: EntityId,
    /// Question being answered
    pub question_id: EntityId,
}
