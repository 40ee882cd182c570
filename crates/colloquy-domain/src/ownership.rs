//! Ownership of primary resources

use crate::{Answer, Comment, EntityId, Question};

/// Raised when an actor mutates a resource it does not own
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnershipViolation {
    /// Acting user
    pub actor: EntityId,
    /// Owner of the resource
    pub owner: EntityId,
}

impl std::fmt::Display for OwnershipViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "user {} does not own this resource", self.actor)
    }
}

impl std::error::Error for OwnershipViolation {}

/// A resource with a single owning user
pub trait Owned {
    /// The owning user
    fn owner(&self) -> EntityId;

    /// Fail unless `actor` owns the resource
    fn ensure_owned_by(&self, actor: EntityId) -> Result<(), OwnershipViolation> {
        let owner = self.owner();
        if owner == actor {
            Ok(())
        } else {
            Err(OwnershipViolation { actor, owner })
        }
    }
}

impl Owned for Question {
    fn owner(&self) -> EntityId {
        self.questioner
    }
}

impl Owned for Answer {
    fn owner(&self) -> EntityId {
        self.answerer
    }
}

impl Owned for Comment {
    fn owner(&self) -> EntityId {
        self.commentator
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_answer_ownership() {
        let owner = EntityId::from_value(1);
        let stranger = EntityId::from_value(2);
        let answer = Answer {
            id: EntityId::from_value(10),
            content: "42".to_string(),
            answerer: owner,
            question_id: EntityId::from_value(20),
            vote_count: 0,
            created_at: 0,
            updated_at: 0,
        };

        assert!(answer.ensure_owned_by(owner).is_ok());
        let err = answer.ensure_owned_by(stranger).unwrap_err();
        assert_eq!(err.owner, owner);
        assert_eq!(err.actor, stranger);
    }
}
