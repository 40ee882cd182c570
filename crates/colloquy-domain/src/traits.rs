//! Trait definitions for persistence
//!
//! These traits describe the document store the rest of the system talks
//! to. Implementations live in other crates (colloquy-store).

use crate::{
    Answer, Comment, CommentQuery, CounterField, Credentials, EntityId, EntityKind,
    FieldSelector, NewAnswer, NewComment, NewQuestion, NewTopic, NewUser, Question,
    QuestionPatch, RelatedEntity, RelationshipSet, SearchQuery, Topic, TopicPatch, User,
    UserPatch,
};

/// Storage for user accounts
pub trait UserStore {
    /// Error type for store operations
    type Error;

    /// Register a user; fails when the name is taken
    fn create_user(&mut self, user: NewUser) -> Result<User, Self::Error>;

    /// Get a user, including the selected hidden profile fields
    fn get_user(&self, id: EntityId, fields: &FieldSelector) -> Result<Option<User>, Self::Error>;

    /// Search users by name
    fn find_users(&self, query: &SearchQuery) -> Result<Vec<User>, Self::Error>;

    /// Look up login data by exact name
    fn credentials_by_name(&self, name: &str) -> Result<Option<Credentials>, Self::Error>;

    /// Apply a partial update, returning the updated user
    fn update_user(&mut self, id: EntityId, patch: UserPatch) -> Result<Option<User>, Self::Error>;

    /// Delete a user, returning whether it existed
    fn delete_user(&mut self, id: EntityId) -> Result<bool, Self::Error>;
}

/// Storage for topics
pub trait TopicStore {
    /// Error type for store operations
    type Error;

    /// Create a topic
    fn create_topic(&mut self, topic: NewTopic) -> Result<Topic, Self::Error>;

    /// Get a topic by id
    fn get_topic(&self, id: EntityId) -> Result<Option<Topic>, Self::Error>;

    /// Search topics by name
    fn find_topics(&self, query: &SearchQuery) -> Result<Vec<Topic>, Self::Error>;

    /// Apply a partial update, returning the updated topic
    fn update_topic(&mut self, id: EntityId, patch: TopicPatch) -> Result<Option<Topic>, Self::Error>;
}

/// Storage for questions
pub trait QuestionStore {
    /// Error type for store operations
    type Error;

    /// Create a question
    fn create_question(&mut self, question: NewQuestion) -> Result<Question, Self::Error>;

    /// Get a question by id
    fn get_question(&self, id: EntityId) -> Result<Option<Question>, Self::Error>;

    /// Search questions by title or description
    fn find_questions(&self, query: &SearchQuery) -> Result<Vec<Question>, Self::Error>;

    /// Questions asked by a user
    fn questions_by_questioner(&self, questioner: EntityId) -> Result<Vec<Question>, Self::Error>;

    /// Questions filed under a topic
    fn questions_by_topic(&self, topic: EntityId) -> Result<Vec<Question>, Self::Error>;

    /// Apply a partial update, returning the updated question
    fn update_question(&mut self, id: EntityId, patch: QuestionPatch) -> Result<Option<Question>, Self::Error>;

    /// Delete a question, returning whether it existed
    fn delete_question(&mut self, id: EntityId) -> Result<bool, Self::Error>;
}

/// Storage for answers
pub trait AnswerStore {
    /// Error type for store operations
    type Error;

    /// Create an answer with a zero vote count
    fn create_answer(&mut self, answer: NewAnswer) -> Result<Answer, Self::Error>;

    /// Get an answer by id
    fn get_answer(&self, id: EntityId) -> Result<Option<Answer>, Self::Error>;

    /// Search the answers of one question by content
    fn find_answers(&self, question_id: EntityId, query: &SearchQuery) -> Result<Vec<Answer>, Self::Error>;

    /// Replace the content of an answer
    fn update_answer_content(&mut self, id: EntityId, content: &str) -> Result<Option<Answer>, Self::Error>;

    /// Delete an answer, returning whether it existed
    fn delete_answer(&mut self, id: EntityId) -> Result<bool, Self::Error>;
}

/// Storage for comments
pub trait CommentStore {
    /// Error type for store operations
    type Error;

    /// Create a comment
    fn create_comment(&mut self, comment: NewComment) -> Result<Comment, Self::Error>;

    /// Get a comment by id
    fn get_comment(&self, id: EntityId) -> Result<Option<Comment>, Self::Error>;

    /// List comments under an answer
    fn find_comments(&self, query: &CommentQuery) -> Result<Vec<Comment>, Self::Error>;

    /// Replace the content of a comment
    fn update_comment_content(&mut self, id: EntityId, content: &str) -> Result<Option<Comment>, Self::Error>;

    /// Delete a comment, returning whether it existed
    fn delete_comment(&mut self, id: EntityId) -> Result<bool, Self::Error>;
}

/// Storage primitives behind the relationship toggle engine
///
/// Membership writes must be atomic single-row operations (add-if-absent,
/// remove-element); counter updates must be atomic increments. Callers
/// outside the toggle engine should not use the mutating methods.
pub trait RelationshipStore {
    /// Error type for store operations
    type Error;

    /// Whether an entity of the given kind exists
    fn exists(&self, kind: EntityKind, id: EntityId) -> Result<bool, Self::Error>;

    /// Members of a user's set in insertion order; `None` if the user is missing
    fn members(&self, actor: EntityId, set: RelationshipSet) -> Result<Option<Vec<EntityId>>, Self::Error>;

    /// Add `target` unless already present; returns whether it was added
    fn insert_member(&mut self, actor: EntityId, set: RelationshipSet, target: EntityId) -> Result<bool, Self::Error>;

    /// Remove `target` if present; returns whether it was removed
    fn remove_member(&mut self, actor: EntityId, set: RelationshipSet, target: EntityId) -> Result<bool, Self::Error>;

    /// Atomically add `delta` to a counter on `target`
    fn increment_counter(&mut self, target: EntityId, counter: CounterField, delta: i64) -> Result<(), Self::Error>;

    /// Read a counter on `target`; `None` if the target is missing
    fn counter_value(&self, target: EntityId, counter: CounterField) -> Result<Option<i64>, Self::Error>;

    /// Expand references into entities, preserving order and skipping missing ones
    fn populate(&self, kind: EntityKind, ids: &[EntityId]) -> Result<Vec<RelatedEntity>, Self::Error>;

    /// Users whose `set` holds `target`, in the order they added it
    fn subjects(&self, set: RelationshipSet, target: EntityId) -> Result<Vec<User>, Self::Error>;

    /// Drop `target` from every user's sets of the matching kind; returns rows removed
    fn remove_references_to(&mut self, kind: EntityKind, target: EntityId) -> Result<usize, Self::Error>;
}
