//! Colloquy Domain Layer
//!
//! Core model of the Colloquy social Q&A backend: users ask questions,
//! answer them, comment in two-level threads, and keep relationship sets
//! (followed users and topics, liked / disliked / collected answers).
//!
//! ## Key Concepts
//!
//! - **EntityId**: time-ordered identifier shared by every resource
//! - **Relationship set**: a per-user ordered collection of references
//! - **Denormalized counter**: `Answer.voteCount`, kept in sync with likes
//! - **Ownership**: questions, answers and comments are mutated by their owner only
//!
//! ## Architecture
//!
//! - Pure data and rules, no I/O
//! - Persistence is described by the traits in [`traits`]
//! - Infrastructure implementations live in other crates

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod answer;
pub mod comment;
pub mod id;
pub mod ownership;
pub mod query;
pub mod question;
pub mod relationship;
pub mod topic;
pub mod traits;
pub mod user;
pub mod view;

// Re-exports for convenience
pub use answer::{Answer, NewAnswer};
pub use comment::{Comment, NewComment};
pub use id::EntityId;
pub use ownership::{Owned, OwnershipViolation};
pub use query::{
    CommentQuery, FieldSelector, Pagination, ProfileField, SearchQuery, DEFAULT_PER_PAGE,
    MAX_PER_PAGE,
};
pub use question::{NewQuestion, Question, QuestionPatch};
pub use relationship::{CounterField, EntityKind, RelatedEntity, RelationshipSet};
pub use topic::{NewTopic, Topic, TopicPatch};
pub use user::{
    Credentials, Education, Employment, Gender, NewUser, PasswordDigest, User, UserPatch,
};
pub use view::{
    AnswerDetail, AnswerSummary, CommentDetail, EducationDetail, EmploymentDetail, Expand,
    QuestionDetail, QuestionSummary, UserDetail,
};
