//! Topics

use super::{parse_id, require, AppError, AppJson, AppQuery, AppState, ListParams};
use crate::auth::AuthUser;
use axum::extract::{Path, State};
use axum::response::Json;
use axum::routing::get;
use axum::Router;
use colloquy_domain::traits::{QuestionStore, RelationshipStore, TopicStore};
use colloquy_domain::{EntityKind, NewTopic, QuestionSummary, Topic, TopicPatch};
use serde::Deserialize;

pub(crate) fn routes() -> Router<AppState> {
    Router::new()
        .route("/topics", get(list_topics).post(create_topic))
        .route("/topics/:id", get(get_topic).patch(update_topic))
        .route("/topics/:id/questions", get(list_questions))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateTopicRequest {
    name: String,
    #[serde(default, alias = "avatar_url")]
    avatar_url: Option<String>,
    #[serde(default)]
    introduction: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateTopicRequest {
    name: Option<String>,
    #[serde(alias = "avatar_url")]
    avatar_url: Option<String>,
    introduction: Option<String>,
}

async fn list_topics(
    State(state): State<AppState>,
    AppQuery(params): AppQuery<ListParams>,
) -> Result<Json<Vec<Topic>>, AppError> {
    let query = state.search(params);
    let topics = state.store()?.find_topics(&query)?;
    Ok(Json(topics))
}

async fn create_topic(
    State(state): State<AppState>,
    _caller: AuthUser,
    AppJson(request): AppJson<CreateTopicRequest>,
) -> Result<Json<Topic>, AppError> {
    require("name", &request.name)?;
    let topic = state.store()?.create_topic(NewTopic {
        name: request.name,
        avatar_url: request.avatar_url,
        introduction: request.introduction,
    })?;
    Ok(Json(topic))
}

async fn get_topic(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Topic>, AppError> {
    let id = parse_id(&id)?;
    let topic = state.store()?.get_topic(id)?;
    topic
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Topic {} not found", id)))
}

/// PATCH /topics/:id - any signed-in user may edit a topic
async fn update_topic(
    State(state): State<AppState>,
    _caller: AuthUser,
    Path(id): Path<String>,
    AppJson(request): AppJson<UpdateTopicRequest>,
) -> Result<Json<Topic>, AppError> {
    let id = parse_id(&id)?;
    if let Some(name) = &request.name {
        require("name", name)?;
    }
    let patch = TopicPatch {
        name: request.name,
        avatar_url: request.avatar_url,
        introduction: request.introduction,
    };
    let topic = state.store()?.update_topic(id, patch)?;
    topic
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Topic {} not found", id)))
}

async fn list_questions(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<QuestionSummary>>, AppError> {
    let id = parse_id(&id)?;
    let store = state.store()?;
    if !store.exists(EntityKind::Topic, id)? {
        return Err(AppError::NotFound(format!("Topic {} not found", id)));
    }
    let questions = store.questions_by_topic(id)?;
    Ok(Json(questions.into_iter().map(QuestionSummary::from).collect()))
}
