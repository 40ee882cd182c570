//! Relationship endpoints: follow, like, dislike and collect.
//!
//! `PUT /users/<set>/:id` adds the target to the caller's set and
//! `DELETE /users/<set>/:id` removes it; both answer 204. Likes and
//! dislikes go through the exclusive toggle so an answer is never in both.

use super::{parse_id, AppError, AppState};
use crate::auth::AuthUser;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use axum::routing::{get, put};
use axum::Router;
use colloquy_domain::{RelatedEntity, RelationshipSet, User};

pub(crate) fn routes() -> Router<AppState> {
    let mut router = Router::new()
        .route("/users/:id/followers", get(list_user_followers))
        .route("/topics/:id/followers", get(list_topic_followers));

    for set in RelationshipSet::ALL {
        router = router
            .route(
                &format!("/users/{}/:id", set.as_str()),
                put(move |state: State<AppState>, caller: AuthUser, path: Path<String>| {
                    add_member(state, caller, path, set)
                })
                .delete(move |state: State<AppState>, caller: AuthUser, path: Path<String>| {
                    remove_member(state, caller, path, set)
                }),
            )
            .route(
                &format!("/users/:id/{}", set.as_str()),
                get(move |state: State<AppState>, path: Path<String>| {
                    list_members(state, path, set)
                }),
            );
    }
    router
}

/// PUT /users/<set>/:id
async fn add_member(
    State(state): State<AppState>,
    caller: AuthUser,
    Path(target): Path<String>,
    set: RelationshipSet,
) -> Result<StatusCode, AppError> {
    let target = parse_id(&target)?;
    let mut store = state.store()?;
    state
        .engine
        .add_exclusive(&mut *store, caller.id, set, target)?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /users/<set>/:id
///
/// The target must still exist, matching the guard on the add side.
async fn remove_member(
    State(state): State<AppState>,
    caller: AuthUser,
    Path(target): Path<String>,
    set: RelationshipSet,
) -> Result<StatusCode, AppError> {
    use colloquy_domain::traits::RelationshipStore;

    let target = parse_id(&target)?;
    let mut store = state.store()?;
    if !store.exists(set.target_kind(), target)? {
        return Err(AppError::NotFound(format!(
            "{} {} not found",
            set.target_kind(),
            target
        )));
    }
    state.engine.remove(&mut *store, caller.id, set, target)?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /users/:id/<set>
async fn list_members(
    State(state): State<AppState>,
    Path(subject): Path<String>,
    set: RelationshipSet,
) -> Result<Json<Vec<RelatedEntity>>, AppError> {
    let subject = parse_id(&subject)?;
    let store = state.store()?;
    Ok(Json(state.engine.list(&*store, subject, set)?))
}

/// GET /users/:id/followers
async fn list_user_followers(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<User>>, AppError> {
    let id = parse_id(&id)?;
    let store = state.store()?;
    Ok(Json(state.engine.subjects(&*store, RelationshipSet::Following, id)?))
}

/// GET /topics/:id/followers
async fn list_topic_followers(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<User>>, AppError> {
    let id = parse_id(&id)?;
    let store = state.store()?;
    Ok(Json(
        state
            .engine
            .subjects(&*store, RelationshipSet::FollowingTopics, id)?,
    ))
}
