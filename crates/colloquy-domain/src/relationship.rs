//! Relationship sets: the per-user collections of references to other entities

use crate::{Answer, Topic, User};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of entity a reference points at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    /// A user account
    User,
    /// A topic
    Topic,
    /// A question
    Question,
    /// An answer to a question
    Answer,
    /// A comment on an answer
    Comment,
}

impl EntityKind {
    /// Lowercase name used in messages
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::User => "user",
            EntityKind::Topic => "topic",
            EntityKind::Question => "question",
            EntityKind::Answer => "answer",
            EntityKind::Comment => "comment",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Denormalized counters kept in sync with relationship membership
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CounterField {
    /// `Answer.voteCount`: number of users whose `likingAnswers` holds the answer
    VoteCount,
}

impl CounterField {
    /// Entity kind that carries this counter
    pub fn owner_kind(&self) -> EntityKind {
        match self {
            CounterField::VoteCount => EntityKind::Answer,
        }
    }

    /// Field name as exposed on the entity
    pub fn as_str(&self) -> &'static str {
        match self {
            CounterField::VoteCount => "voteCount",
        }
    }
}

/// A named relationship set owned by a user
///
/// Each set is an insertion-ordered collection of references without
/// duplicates. Only the owning user mutates it, and only through the
/// toggle engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RelationshipSet {
    /// Users this user follows
    Following,
    /// Topics this user follows
    FollowingTopics,
    /// Answers this user liked
    LikingAnswers,
    /// Answers this user disliked
    DislikingAnswers,
    /// Answers this user collected
    CollectingAnswers,
}

impl RelationshipSet {
    /// Every relationship set, in a stable order
    pub const ALL: [RelationshipSet; 5] = [
        RelationshipSet::Following,
        RelationshipSet::FollowingTopics,
        RelationshipSet::LikingAnswers,
        RelationshipSet::DislikingAnswers,
        RelationshipSet::CollectingAnswers,
    ];

    /// Wire / storage name of the set
    pub fn as_str(&self) -> &'static str {
        match self {
            RelationshipSet::Following => "following",
            RelationshipSet::FollowingTopics => "followingTopics",
            RelationshipSet::LikingAnswers => "likingAnswers",
            RelationshipSet::DislikingAnswers => "dislikingAnswers",
            RelationshipSet::CollectingAnswers => "collectingAnswers",
        }
    }

    /// Parse a set from its wire name
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|set| set.as_str() == s)
    }

    /// Kind of entity the set references
    pub fn target_kind(&self) -> EntityKind {
        match self {
            RelationshipSet::Following => EntityKind::User,
            RelationshipSet::FollowingTopics => EntityKind::Topic,
            RelationshipSet::LikingAnswers
            | RelationshipSet::DislikingAnswers
            | RelationshipSet::CollectingAnswers => EntityKind::Answer,
        }
    }

    /// Set that may not hold the same target at the same time
    pub fn opposite(&self) -> Option<Self> {
        match self {
            RelationshipSet::LikingAnswers => Some(RelationshipSet::DislikingAnswers),
            RelationshipSet::DislikingAnswers => Some(RelationshipSet::LikingAnswers),
            _ => None,
        }
    }

    /// Counter on the target that tracks membership in this set
    pub fn counter(&self) -> Option<CounterField> {
        match self {
            RelationshipSet::LikingAnswers => Some(CounterField::VoteCount),
            _ => None,
        }
    }
}

impl fmt::Display for RelationshipSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A reference expanded into the entity it points at
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RelatedEntity {
    /// Expanded user reference
    User(User),
    /// Expanded topic reference
    Topic(Topic),
    /// Expanded answer reference
    Answer(Answer),
}

impl RelatedEntity {
    /// Id of the expanded entity
    pub fn id(&self) -> crate::EntityId {
        match self {
            RelatedEntity::User(user) => user.id,
            RelatedEntity::Topic(topic) => topic.id,
            RelatedEntity::Answer(answer) => answer.id,
        }
    }

    /// Kind of the expanded entity
    pub fn kind(&self) -> EntityKind {
        match self {
            RelatedEntity::User(_) => EntityKind::User,
            RelatedEntity::Topic(_) => EntityKind::Topic,
            RelatedEntity::Answer(_) => EntityKind::Answer,
        }
    }

    /// The user, if this is one
    pub fn into_user(self) -> Option<User> {
        match self {
            RelatedEntity::User(user) => Some(user),
            _ => None,
        }
    }

    /// The topic, if this is one
    pub fn into_topic(self) -> Option<Topic> {
        match self {
            RelatedEntity::Topic(topic) => Some(topic),
            _ => None,
        }
    }
}
