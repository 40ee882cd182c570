//! Answers, nested under their question

use super::questions::load_question;
use super::{parse_id, require, AppError, AppJson, AppQuery, AppState, ListParams};
use crate::auth::AuthUser;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use axum::routing::get;
use axum::Router;
use colloquy_domain::traits::AnswerStore;
use colloquy_domain::{
    Answer, AnswerDetail, AnswerSummary, EntityId, EntityKind, Expand, NewAnswer, Owned,
};
use colloquy_store::SqliteStore;
use serde::Deserialize;

pub(crate) fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/questions/:question_id/answers",
            get(list_answers).post(create_answer),
        )
        .route(
            "/questions/:question_id/answers/:answer_id",
            get(get_answer).patch(update_answer).delete(delete_answer),
        )
}

#[derive(Debug, Deserialize)]
pub(crate) struct ContentRequest {
    pub content: String,
}

/// Load an answer that must belong to `question_id`
pub(crate) fn load_answer(
    store: &SqliteStore,
    question_id: EntityId,
    answer_id: EntityId,
) -> Result<Answer, AppError> {
    match store.get_answer(answer_id)? {
        Some(answer) if answer.question_id == question_id => Ok(answer),
        Some(_) => Err(AppError::NotFound(format!(
            "Question {} has no answer {}",
            question_id, answer_id
        ))),
        None => Err(AppError::NotFound(format!("Answer {} not found", answer_id))),
    }
}

async fn list_answers(
    State(state): State<AppState>,
    Path(question_id): Path<String>,
    AppQuery(params): AppQuery<ListParams>,
) -> Result<Json<Vec<AnswerSummary>>, AppError> {
    let question_id = parse_id(&question_id)?;
    let query = state.search(params);
    let store = state.store()?;
    load_question(&store, question_id)?;
    let answers = store.find_answers(question_id, &query)?;
    Ok(Json(answers.into_iter().map(AnswerSummary::from).collect()))
}

async fn create_answer(
    State(state): State<AppState>,
    caller: AuthUser,
    Path(question_id): Path<String>,
    AppJson(request): AppJson<ContentRequest>,
) -> Result<Json<Answer>, AppError> {
    let question_id = parse_id(&question_id)?;
    require("content", &request.content)?;

    let mut store = state.store()?;
    load_question(&store, question_id)?;
    let answer = store.create_answer(NewAnswer {
        content: request.content,
        answerer: caller.id,
        question_id,
    })?;
    Ok(Json(answer))
}

async fn get_answer(
    State(state): State<AppState>,
    Path((question_id, answer_id)): Path<(String, String)>,
) -> Result<Json<AnswerDetail>, AppError> {
    let (question_id, answer_id) = (parse_id(&question_id)?, parse_id(&answer_id)?);
    let store = state.store()?;
    let answer = load_answer(&store, question_id, answer_id)?;
    Ok(Json(answer.expand(&*store)?))
}

async fn update_answer(
    State(state): State<AppState>,
    caller: AuthUser,
    Path((question_id, answer_id)): Path<(String, String)>,
    AppJson(request): AppJson<ContentRequest>,
) -> Result<Json<Answer>, AppError> {
    let (question_id, answer_id) = (parse_id(&question_id)?, parse_id(&answer_id)?);
    require("content", &request.content)?;

    let mut store = state.store()?;
    load_answer(&store, question_id, answer_id)?.ensure_owned_by(caller.id)?;
    let answer = store
        .update_answer_content(answer_id, &request.content)?
        .ok_or_else(|| AppError::NotFound(format!("Answer {} not found", answer_id)))?;
    Ok(Json(answer))
}

/// DELETE /questions/:question_id/answers/:answer_id
///
/// Likes, dislikes and collections pointing at the answer are dropped with it.
async fn delete_answer(
    State(state): State<AppState>,
    caller: AuthUser,
    Path((question_id, answer_id)): Path<(String, String)>,
) -> Result<StatusCode, AppError> {
    let (question_id, answer_id) = (parse_id(&question_id)?, parse_id(&answer_id)?);

    let mut store = state.store()?;
    load_answer(&store, question_id, answer_id)?.ensure_owned_by(caller.id)?;
    state
        .engine
        .purge_target(&mut *store, EntityKind::Answer, answer_id)?;
    store.delete_answer(answer_id)?;
    Ok(StatusCode::NO_CONTENT)
}
