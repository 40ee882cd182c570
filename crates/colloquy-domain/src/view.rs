//! Read models
//!
//! Stored records carry references as ids. Listings hide the owner and
//! topic references entirely; single-record reads replace them with the
//! referenced users and topics. Expansion goes through
//! [`RelationshipStore::populate`], so a reference whose target has been
//! deleted expands to nothing rather than failing the read.

use crate::traits::RelationshipStore;
use crate::{
    Answer, Comment, Education, Employment, EntityId, EntityKind, Gender, Question,
    RelatedEntity, Topic, User,
};
use serde::Serialize;

/// A question as shown in listings: owner and topics hidden
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionSummary {
    /// Unique identifier
    pub id: EntityId,
    /// Title
    pub title: String,
    /// Longer description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Creation timestamp
    pub created_at: u64,
    /// Last update timestamp
    pub updated_at: u64,
}

impl From<Question> for QuestionSummary {
    fn from(q: Question) -> Self {
        Self {
            id: q.id,
            title: q.title,
            description: q.description,
            created_at: q.created_at,
            updated_at: q.updated_at,
        }
    }
}

/// A question with its questioner and topics expanded
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionDetail {
    /// Unique identifier
    pub id: EntityId,
    /// Title
    pub title: String,
    /// Longer description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Asking user; `None` once the account is gone
    pub questioner: Option<User>,
    /// Topics the question is filed under
    pub topics: Vec<Topic>,
    /// Creation timestamp
    pub created_at: u64,
    /// Last update timestamp
    pub updated_at: u64,
}

/// An answer as shown in listings: answerer hidden
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerSummary {
    /// Unique identifier
    pub id: EntityId,
    /// Answer body
    pub content: String,
    /// Question answered
    pub question_id: EntityId,
    /// Number of likes
    pub vote_count: i64,
    /// Creation timestamp
    pub created_at: u64,
    /// Last update timestamp
    pub updated_at: u64,
}

impl From<Answer> for AnswerSummary {
    fn from(a: Answer) -> Self {
        Self {
            id: a.id,
            content: a.content,
            question_id: a.question_id,
            vote_count: a.vote_count,
            created_at: a.created_at,
            updated_at: a.updated_at,
        }
    }
}

/// An answer with its answerer expanded
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerDetail {
    /// Unique identifier
    pub id: EntityId,
    /// Answer body
    pub content: String,
    /// Answering user; `None` once the account is gone
    pub answerer: Option<User>,
    /// Question answered
    pub question_id: EntityId,
    /// Number of likes
    pub vote_count: i64,
    /// Creation timestamp
    pub created_at: u64,
    /// Last update timestamp
    pub updated_at: u64,
}

/// A comment with its author and addressee expanded
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentDetail {
    /// Unique identifier
    pub id: EntityId,
    /// Comment body
    pub content: String,
    /// Commenting user; `None` once the account is gone
    pub commentator: Option<User>,
    /// Question the answer belongs to
    pub question_id: EntityId,
    /// Answer commented on
    pub answer_id: EntityId,
    /// Thread root for replies
    #[serde(skip_serializing_if = "Option::is_none")]
    pub root_comment_id: Option<EntityId>,
    /// User replied to
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_to: Option<User>,
    /// Creation timestamp
    pub created_at: u64,
    /// Last update timestamp
    pub updated_at: u64,
}

/// Work history entry with topics expanded
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmploymentDetail {
    /// Company topic
    pub company: Option<Topic>,
    /// Job title topic
    pub job: Option<Topic>,
}

/// Education entry with topics expanded
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EducationDetail {
    /// School topic
    pub school: Option<Topic>,
    /// Major topic
    pub major: Option<Topic>,
    /// Diploma level, 1 through 5
    pub diploma: Option<u8>,
    /// Year of entrance
    pub entrance_year: Option<u16>,
    /// Year of graduation
    pub graduation_year: Option<u16>,
}

/// A user profile with the selected hidden fields expanded into topics
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDetail {
    /// Unique identifier
    pub id: EntityId,
    /// Display name
    pub name: String,
    /// Avatar image URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    /// Gender
    pub gender: Gender,
    /// One-line introduction
    #[serde(skip_serializing_if = "Option::is_none")]
    pub headline: Option<String>,
    /// Places of residence
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locations: Option<Vec<Topic>>,
    /// Industry; present only when selected and still existing
    #[serde(skip_serializing_if = "Option::is_none")]
    pub business: Option<Topic>,
    /// Work history
    #[serde(skip_serializing_if = "Option::is_none")]
    pub employments: Option<Vec<EmploymentDetail>>,
    /// Education history
    #[serde(skip_serializing_if = "Option::is_none")]
    pub educations: Option<Vec<EducationDetail>>,
}

/// A stored record that can be turned into its expanded read model
pub trait Expand {
    /// Expanded form
    type Detail;

    /// Replace references with the entities they point at
    fn expand<S: RelationshipStore>(self, store: &S) -> Result<Self::Detail, S::Error>;
}

fn users<S: RelationshipStore>(store: &S, ids: &[EntityId]) -> Result<Vec<User>, S::Error> {
    let expanded = store.populate(EntityKind::User, ids)?;
    Ok(expanded.into_iter().filter_map(RelatedEntity::into_user).collect())
}

fn topics<S: RelationshipStore>(store: &S, ids: &[EntityId]) -> Result<Vec<Topic>, S::Error> {
    let expanded = store.populate(EntityKind::Topic, ids)?;
    Ok(expanded.into_iter().filter_map(RelatedEntity::into_topic).collect())
}

fn user<S: RelationshipStore>(store: &S, id: Option<EntityId>) -> Result<Option<User>, S::Error> {
    match id {
        Some(id) => Ok(users(store, &[id])?.pop()),
        None => Ok(None),
    }
}

fn topic<S: RelationshipStore>(store: &S, id: Option<EntityId>) -> Result<Option<Topic>, S::Error> {
    match id {
        Some(id) => Ok(topics(store, &[id])?.pop()),
        None => Ok(None),
    }
}

impl Expand for Question {
    type Detail = QuestionDetail;

    fn expand<S: RelationshipStore>(self, store: &S) -> Result<QuestionDetail, S::Error> {
        Ok(QuestionDetail {
            questioner: user(store, Some(self.questioner))?,
            topics: topics(store, &self.topics)?,
            id: self.id,
            title: self.title,
            description: self.description,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

impl Expand for Answer {
    type Detail = AnswerDetail;

    fn expand<S: RelationshipStore>(self, store: &S) -> Result<AnswerDetail, S::Error> {
        Ok(AnswerDetail {
            answerer: user(store, Some(self.answerer))?,
            id: self.id,
            content: self.content,
            question_id: self.question_id,
            vote_count: self.vote_count,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

impl Expand for Comment {
    type Detail = CommentDetail;

    fn expand<S: RelationshipStore>(self, store: &S) -> Result<CommentDetail, S::Error> {
        Ok(CommentDetail {
            commentator: user(store, Some(self.commentator))?,
            reply_to: user(store, self.reply_to)?,
            id: self.id,
            content: self.content,
            question_id: self.question_id,
            answer_id: self.answer_id,
            root_comment_id: self.root_comment_id,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

impl Expand for Employment {
    type Detail = EmploymentDetail;

    fn expand<S: RelationshipStore>(self, store: &S) -> Result<EmploymentDetail, S::Error> {
        Ok(EmploymentDetail {
            company: topic(store, self.company)?,
            job: topic(store, self.job)?,
        })
    }
}

impl Expand for Education {
    type Detail = EducationDetail;

    fn expand<S: RelationshipStore>(self, store: &S) -> Result<EducationDetail, S::Error> {
        Ok(EducationDetail {
            school: topic(store, self.school)?,
            major: topic(store, self.major)?,
            diploma: self.diploma,
            entrance_year: self.entrance_year,
            graduation_year: self.graduation_year,
        })
    }
}

/// Only the hidden fields present on the user (i.e. selected) are expanded
impl Expand for User {
    type Detail = UserDetail;

    fn expand<S: RelationshipStore>(self, store: &S) -> Result<UserDetail, S::Error> {
        let locations = match self.locations {
            Some(ids) => Some(topics(store, &ids)?),
            None => None,
        };
        let employments = match self.employments {
            Some(entries) => Some(
                entries
                    .into_iter()
                    .map(|e| e.expand(store))
                    .collect::<Result<Vec<_>, _>>()?,
            ),
            None => None,
        };
        let educations = match self.educations {
            Some(entries) => Some(
                entries
                    .into_iter()
                    .map(|e| e.expand(store))
                    .collect::<Result<Vec<_>, _>>()?,
            ),
            None => None,
        };

        Ok(UserDetail {
            business: topic(store, self.business)?,
            locations,
            employments,
            educations,
            id: self.id,
            name: self.name,
            avatar_url: self.avatar_url,
            gender: self.gender,
            headline: self.headline,
        })
    }
}
