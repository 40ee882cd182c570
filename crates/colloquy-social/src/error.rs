//! Error types for relationship toggles

use colloquy_domain::{EntityId, EntityKind};
use thiserror::Error;

/// Errors that can occur while toggling relationships
#[derive(Error, Debug)]
pub enum ToggleError {
    /// Actor or target does not exist
    #[error("{kind} {id} not found")]
    NotFound {
        /// Kind of the missing entity
        kind: EntityKind,
        /// Id of the missing entity
        id: EntityId,
    },

    /// Storage layer error
    #[error("Storage error: {0}")]
    Store(String),

    /// A multi-step toggle was left half applied and could not be rolled back
    #[error("Inconsistent state: {0}")]
    Inconsistency(String),
}

impl ToggleError {
    pub(crate) fn store<E: std::fmt::Display>(err: E) -> Self {
        ToggleError::Store(err.to_string())
    }
}
