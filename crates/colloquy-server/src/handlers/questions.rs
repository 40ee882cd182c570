//! Questions

use super::{parse_id, require, AppError, AppJson, AppQuery, AppState, ListParams};
use crate::auth::AuthUser;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use axum::routing::get;
use axum::Router;
use colloquy_domain::traits::{QuestionStore, RelationshipStore};
use colloquy_domain::{
    EntityId, EntityKind, Expand, NewQuestion, Owned, Question, QuestionDetail, QuestionPatch,
    QuestionSummary,
};
use colloquy_store::SqliteStore;
use serde::Deserialize;

pub(crate) fn routes() -> Router<AppState> {
    Router::new()
        .route("/questions", get(list_questions).post(create_question))
        .route(
            "/questions/:question_id",
            get(get_question).patch(update_question).delete(delete_question),
        )
}

#[derive(Debug, Deserialize)]
struct CreateQuestionRequest {
    title: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    topics: Vec<EntityId>,
}

#[derive(Debug, Deserialize)]
struct UpdateQuestionRequest {
    title: Option<String>,
    description: Option<String>,
    topics: Option<Vec<EntityId>>,
}

/// Load a question or fail with 404
pub(crate) fn load_question(store: &SqliteStore, id: EntityId) -> Result<Question, AppError> {
    store
        .get_question(id)?
        .ok_or_else(|| AppError::NotFound(format!("Question {} not found", id)))
}

fn ensure_topics_exist(store: &SqliteStore, topics: &[EntityId]) -> Result<(), AppError> {
    for topic in topics {
        if !store.exists(EntityKind::Topic, *topic)? {
            return Err(AppError::NotFound(format!("Topic {} not found", topic)));
        }
    }
    Ok(())
}

async fn list_questions(
    State(state): State<AppState>,
    AppQuery(params): AppQuery<ListParams>,
) -> Result<Json<Vec<QuestionSummary>>, AppError> {
    let query = state.search(params);
    let questions = state.store()?.find_questions(&query)?;
    Ok(Json(questions.into_iter().map(QuestionSummary::from).collect()))
}

async fn create_question(
    State(state): State<AppState>,
    caller: AuthUser,
    AppJson(request): AppJson<CreateQuestionRequest>,
) -> Result<Json<Question>, AppError> {
    require("title", &request.title)?;

    let mut store = state.store()?;
    ensure_topics_exist(&store, &request.topics)?;
    let question = store.create_question(NewQuestion {
        title: request.title,
        description: request.description,
        questioner: caller.id,
        topics: request.topics,
    })?;
    Ok(Json(question))
}

async fn get_question(
    State(state): State<AppState>,
    Path(question_id): Path<String>,
) -> Result<Json<QuestionDetail>, AppError> {
    let id = parse_id(&question_id)?;
    let store = state.store()?;
    let question = load_question(&store, id)?;
    Ok(Json(question.expand(&*store)?))
}

async fn update_question(
    State(state): State<AppState>,
    caller: AuthUser,
    Path(question_id): Path<String>,
    AppJson(request): AppJson<UpdateQuestionRequest>,
) -> Result<Json<Question>, AppError> {
    let id = parse_id(&question_id)?;
    if let Some(title) = &request.title {
        require("title", title)?;
    }

    let mut store = state.store()?;
    load_question(&store, id)?.ensure_owned_by(caller.id)?;
    if let Some(topics) = &request.topics {
        ensure_topics_exist(&store, topics)?;
    }

    let patch = QuestionPatch {
        title: request.title,
        description: request.description,
        topics: request.topics,
    };
    let question = store
        .update_question(id, patch)?
        .ok_or_else(|| AppError::NotFound(format!("Question {} not found", id)))?;
    Ok(Json(question))
}

async fn delete_question(
    State(state): State<AppState>,
    caller: AuthUser,
    Path(question_id): Path<String>,
) -> Result<StatusCode, AppError> {
    let id = parse_id(&question_id)?;
    let mut store = state.store()?;
    load_question(&store, id)?.ensure_owned_by(caller.id)?;
    store.delete_question(id)?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use crate::handlers::create_router;
    use crate::handlers::test_support::*;
    use axum::http::StatusCode;
    use serde_json::json;

    #[tokio::test]
    async fn test_question_ownership() {
        let app = create_router(create_test_state());
        let (alice, alice_token) = signup(&app, "alice").await;
        let (_, bob_token) = signup(&app, "bob").await;

        let body = json!({ "title": "Why Rust?" });
        let (status, question) = send(&app, "POST", "/questions", Some(&alice_token), Some(body)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(question["questioner"], alice.as_str());
        let uri = format!("/questions/{}", question["id"].as_str().unwrap());

        let patch = json!({ "title": "Why not Rust?" });
        let (status, _) = send(&app, "PATCH", &uri, Some(&bob_token), Some(patch.clone())).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        let (status, updated) = send(&app, "PATCH", &uri, Some(&alice_token), Some(patch)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["title"], "Why not Rust?");

        let (status, _) = send(&app, "DELETE", &uri, Some(&bob_token), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        let (status, _) = send(&app, "DELETE", &uri, Some(&alice_token), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (status, _) = send(&app, "GET", &uri, None, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_question_topics_must_exist() {
        let app = create_router(create_test_state());
        let (alice, token) = signup(&app, "alice").await;

        let missing = colloquy_domain::EntityId::new().to_string();
        let body = json!({ "title": "Lifetimes?", "topics": [missing] });
        let (status, _) = send(&app, "POST", "/questions", Some(&token), Some(body)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (_, topic) = send(&app, "POST", "/topics", Some(&token), Some(json!({ "name": "rust" }))).await;
        let body = json!({ "title": "Lifetimes?", "topics": [topic["id"]] });
        let (status, question) = send(&app, "POST", "/questions", Some(&token), Some(body)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(question["topics"][0], topic["id"]);

        let uri = format!("/topics/{}/questions", topic["id"].as_str().unwrap());
        let (_, by_topic) = send(&app, "GET", &uri, None, None).await;
        assert_eq!(by_topic[0]["title"], "Lifetimes?");

        let uri = format!("/users/{}/questions", alice);
        let (_, by_user) = send(&app, "GET", &uri, None, None).await;
        assert_eq!(by_user.as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_question_search() {
        let app = create_router(create_test_state());
        let (_, token) = signup(&app, "alice").await;
        for title in ["Borrowing", "Async traits", "Borrow checker"] {
            send(&app, "POST", "/questions", Some(&token), Some(json!({ "title": title }))).await;
        }

        let (_, found) = send(&app, "GET", "/questions?q=borrow", None, None).await;
        assert_eq!(found.as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_question_read_expands_references() {
        let app = create_router(create_test_state());
        let (_, token) = signup(&app, "alice").await;
        let (_, topic) = send(&app, "POST", "/topics", Some(&token), Some(json!({ "name": "rust" }))).await;

        let body = json!({ "title": "Pinning?", "topics": [topic["id"]] });
        let (_, created) = send(&app, "POST", "/questions", Some(&token), Some(body)).await;
        let uri = format!("/questions/{}", created["id"].as_str().unwrap());

        let (status, question) = send(&app, "GET", &uri, None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(question["questioner"].is_object());
        assert_eq!(question["questioner"]["name"], "alice");
        assert_eq!(question["topics"][0]["name"], "rust");

        let (_, listed) = send(&app, "GET", "/questions", None, None).await;
        assert_eq!(listed[0]["title"], "Pinning?");
        assert!(listed[0].get("questioner").is_none());
        assert!(listed[0].get("topics").is_none());
    }
}
