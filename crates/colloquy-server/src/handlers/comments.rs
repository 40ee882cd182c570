//! Comment threads under an answer

use super::answers::{load_answer, ContentRequest};
use super::{parse_id, require, AppError, AppJson, AppQuery, AppState, ListParams};
use crate::auth::AuthUser;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use axum::routing::get;
use axum::Router;
use colloquy_domain::traits::{CommentStore, RelationshipStore};
use colloquy_domain::{
    Comment, CommentDetail, CommentQuery, EntityId, EntityKind, Expand, NewComment, Owned,
};
use colloquy_store::SqliteStore;
use serde::Deserialize;

pub(crate) fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/questions/:question_id/answers/:answer_id/comments",
            get(list_comments).post(create_comment),
        )
        .route(
            "/questions/:question_id/answers/:answer_id/comments/:comment_id",
            get(get_comment).patch(update_comment).delete(delete_comment),
        )
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CommentListParams {
    q: Option<String>,
    page: Option<usize>,
    #[serde(rename = "per_page")]
    per_page: Option<usize>,
    root_comment_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateCommentRequest {
    content: String,
    #[serde(default, alias = "root_comment_id")]
    root_comment_id: Option<EntityId>,
    #[serde(default, alias = "reply_to")]
    reply_to: Option<EntityId>,
}

type CommentPath = Path<(String, String, String)>;

fn load_comment(
    store: &SqliteStore,
    question_id: EntityId,
    answer_id: EntityId,
    comment_id: EntityId,
) -> Result<Comment, AppError> {
    match store.get_comment(comment_id)? {
        Some(c) if c.question_id == question_id && c.answer_id == answer_id => Ok(c),
        _ => Err(AppError::NotFound(format!("Comment {} not found", comment_id))),
    }
}

/// A thread root must be a first-level comment on the same answer
fn ensure_thread_root(
    store: &SqliteStore,
    question_id: EntityId,
    answer_id: EntityId,
    root_id: EntityId,
) -> Result<(), AppError> {
    let root = load_comment(store, question_id, answer_id, root_id)?;
    if root.is_reply() {
        return Err(AppError::Validation(format!(
            "Comment {} is a reply and cannot start a thread",
            root_id
        )));
    }
    Ok(())
}

async fn list_comments(
    State(state): State<AppState>,
    Path((question_id, answer_id)): Path<(String, String)>,
    AppQuery(params): AppQuery<CommentListParams>,
) -> Result<Json<Vec<CommentDetail>>, AppError> {
    let (question_id, answer_id) = (parse_id(&question_id)?, parse_id(&answer_id)?);
    let root_comment_id = params.root_comment_id.as_deref().map(parse_id).transpose()?;
    let search = state.search(ListParams {
        q: params.q,
        page: params.page,
        per_page: params.per_page,
    });

    let store = state.store()?;
    load_answer(&store, question_id, answer_id)?;
    let comments = store.find_comments(&CommentQuery {
        question_id,
        answer_id,
        root_comment_id,
        search,
    })?;
    let detailed = comments
        .into_iter()
        .map(|c| c.expand(&*store))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Json(detailed))
}

async fn create_comment(
    State(state): State<AppState>,
    caller: AuthUser,
    Path((question_id, answer_id)): Path<(String, String)>,
    AppJson(request): AppJson<CreateCommentRequest>,
) -> Result<Json<Comment>, AppError> {
    let (question_id, answer_id) = (parse_id(&question_id)?, parse_id(&answer_id)?);
    require("content", &request.content)?;

    let mut store = state.store()?;
    load_answer(&store, question_id, answer_id)?;
    if let Some(root_id) = request.root_comment_id {
        ensure_thread_root(&store, question_id, answer_id, root_id)?;
    }
    if let Some(user) = request.reply_to {
        if !store.exists(EntityKind::User, user)? {
            return Err(AppError::NotFound(format!("User {} not found", user)));
        }
    }

    let comment = store.create_comment(NewComment {
        content: request.content,
        commentator: caller.id,
        question_id,
        answer_id,
        root_comment_id: request.root_comment_id,
        reply_to: request.reply_to,
    })?;
    Ok(Json(comment))
}

async fn get_comment(
    State(state): State<AppState>,
    Path((question_id, answer_id, comment_id)): CommentPath,
) -> Result<Json<CommentDetail>, AppError> {
    let question_id = parse_id(&question_id)?;
    let answer_id = parse_id(&answer_id)?;
    let comment_id = parse_id(&comment_id)?;

    let store = state.store()?;
    let comment = load_comment(&store, question_id, answer_id, comment_id)?;
    Ok(Json(comment.expand(&*store)?))
}

/// PATCH .../comments/:comment_id - only the content can change
async fn update_comment(
    State(state): State<AppState>,
    caller: AuthUser,
    Path((question_id, answer_id, comment_id)): CommentPath,
    AppJson(request): AppJson<ContentRequest>,
) -> Result<Json<Comment>, AppError> {
    let question_id = parse_id(&question_id)?;
    let answer_id = parse_id(&answer_id)?;
    let comment_id = parse_id(&comment_id)?;
    require("content", &request.content)?;

    let mut store = state.store()?;
    load_comment(&store, question_id, answer_id, comment_id)?.ensure_owned_by(caller.id)?;
    let comment = store
        .update_comment_content(comment_id, &request.content)?
        .ok_or_else(|| AppError::NotFound(format!("Comment {} not found", comment_id)))?;
    Ok(Json(comment))
}

async fn delete_comment(
    State(state): State<AppState>,
    caller: AuthUser,
    Path((question_id, answer_id, comment_id)): CommentPath,
) -> Result<StatusCode, AppError> {
    let question_id = parse_id(&question_id)?;
    let answer_id = parse_id(&answer_id)?;
    let comment_id = parse_id(&comment_id)?;

    let mut store = state.store()?;
    load_comment(&store, question_id, answer_id, comment_id)?.ensure_owned_by(caller.id)?;
    store.delete_comment(comment_id)?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use crate::handlers::create_router;
    use crate::handlers::test_support::*;
    use axum::http::StatusCode;
    use axum::Router;
    use serde_json::json;

    /// Post a question with one answer, returning the comments URI
    async fn thread(app: &Router, token: &str) -> String {
        let (_, question) = send(app, "POST", "/questions", Some(token), Some(json!({ "title": "Q" }))).await;
        let base = format!("/questions/{}/answers", question["id"].as_str().unwrap());
        let (_, answer) = send(app, "POST", &base, Some(token), Some(json!({ "content": "A" }))).await;
        format!("{}/{}/comments", base, answer["id"].as_str().unwrap())
    }

    #[tokio::test]
    async fn test_two_level_thread() {
        let app = create_router(create_test_state());
        let (alice, alice_token) = signup(&app, "alice").await;
        let (_, bob_token) = signup(&app, "bob").await;
        let uri = thread(&app, &alice_token).await;

        let (status, root) = send(&app, "POST", &uri, Some(&alice_token), Some(json!({ "content": "first" }))).await;
        assert_eq!(status, StatusCode::OK);
        let root_id = root["id"].as_str().unwrap();

        let reply = json!({ "content": "agreed", "rootCommentId": root_id, "replyTo": &alice });
        let (status, reply) = send(&app, "POST", &uri, Some(&bob_token), Some(reply)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(reply["rootCommentId"], root_id);
        assert_eq!(reply["replyTo"], alice.as_str());

        // replies cannot themselves be thread roots
        let nested = json!({ "content": "deeper", "rootCommentId": reply["id"] });
        let (status, _) = send(&app, "POST", &uri, Some(&alice_token), Some(nested)).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

        let (_, all) = send(&app, "GET", &uri, None, None).await;
        assert_eq!(all.as_array().unwrap().len(), 2);

        let (_, replies) = send(&app, "GET", &format!("{}?rootCommentId={}", uri, root_id), None, None).await;
        assert_eq!(replies.as_array().unwrap().len(), 1);
        assert_eq!(replies[0]["content"], "agreed");
        assert_eq!(replies[0]["commentator"]["name"], "bob");
        assert_eq!(replies[0]["replyTo"]["name"], "alice");

        let reply_uri = format!("{}/{}", uri, reply["id"].as_str().unwrap());
        let (_, fetched) = send(&app, "GET", &reply_uri, None, None).await;
        assert!(fetched["commentator"].is_object());
        assert_eq!(fetched["replyTo"]["id"], alice.as_str());
    }

    #[tokio::test]
    async fn test_reply_to_missing_user() {
        let app = create_router(create_test_state());
        let (_, token) = signup(&app, "alice").await;
        let uri = thread(&app, &token).await;

        let body = json!({ "content": "hi", "replyTo": colloquy_domain::EntityId::new() });
        let (status, _) = send(&app, "POST", &uri, Some(&token), Some(body)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_only_commentator_edits() {
        let app = create_router(create_test_state());
        let (_, alice) = signup(&app, "alice").await;
        let (_, bob) = signup(&app, "bob").await;
        let uri = thread(&app, &alice).await;

        let (_, comment) = send(&app, "POST", &uri, Some(&bob), Some(json!({ "content": "nice" }))).await;
        let comment_uri = format!("{}/{}", uri, comment["id"].as_str().unwrap());

        let (status, _) = send(&app, "PATCH", &comment_uri, Some(&alice), Some(json!({ "content": "x" }))).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        let (status, edited) = send(&app, "PATCH", &comment_uri, Some(&bob), Some(json!({ "content": "nicer" }))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(edited["content"], "nicer");

        let (status, _) = send(&app, "DELETE", &comment_uri, Some(&alice), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        let (status, _) = send(&app, "DELETE", &comment_uri, Some(&bob), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (status, _) = send(&app, "GET", &comment_uri, None, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_comment_scoped_to_its_answer() {
        let app = create_router(create_test_state());
        let (_, token) = signup(&app, "alice").await;
        let first = thread(&app, &token).await;
        let second = thread(&app, &token).await;

        let (_, comment) = send(&app, "POST", &first, Some(&token), Some(json!({ "content": "c" }))).await;
        let elsewhere = format!("{}/{}", second, comment["id"].as_str().unwrap());
        let (status, _) = send(&app, "GET", &elsewhere, None, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (_, listed) = send(&app, "GET", &second, None, None).await;
        assert_eq!(listed, json!([]));
    }
}
