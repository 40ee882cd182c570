//! User accounts: registration, login, profile reads and updates.

use super::{parse_id, require, AppError, AppJson, AppQuery, AppState, ListParams};
use crate::auth::{hash_password, verify_password, AuthUser};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use axum::routing::{get, post};
use axum::Router;
use colloquy_domain::traits::{QuestionStore, RelationshipStore, UserStore};
use colloquy_domain::{
    Education, Employment, EntityId, EntityKind, Expand, FieldSelector, Gender, NewUser,
    QuestionSummary, RelatedEntity, RelationshipSet, User, UserDetail, UserPatch,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub(crate) fn routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users).post(create_user))
        .route("/users/login", post(login))
        .route(
            "/users/:id",
            get(get_user).patch(update_user).delete(delete_user),
        )
        .route("/users/:id/questions", get(list_questions))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateUserRequest {
    name: String,
    password: String,
    #[serde(default, alias = "avatar_url")]
    avatar_url: Option<String>,
    #[serde(default)]
    gender: Gender,
    #[serde(default)]
    headline: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateUserRequest {
    name: Option<String>,
    password: Option<String>,
    #[serde(alias = "avatar_url")]
    avatar_url: Option<String>,
    gender: Option<Gender>,
    headline: Option<String>,
    locations: Option<Vec<EntityId>>,
    business: Option<EntityId>,
    employments: Option<Vec<Employment>>,
    educations: Option<Vec<Education>>,
}

#[derive(Debug, Deserialize)]
struct LoginRequest {
    name: String,
    password: String,
}

#[derive(Debug, Serialize)]
struct LoginResponse {
    token: String,
}

#[derive(Debug, Deserialize)]
struct ProfileParams {
    fields: Option<String>,
}

/// A user plus any hidden fields and relationship sets selected with `fields`
#[derive(Debug, Serialize)]
struct UserProfile {
    #[serde(flatten)]
    user: UserDetail,
    #[serde(flatten)]
    relations: BTreeMap<RelationshipSet, Vec<RelatedEntity>>,
}

/// GET /users - Search users by name
async fn list_users(
    State(state): State<AppState>,
    AppQuery(params): AppQuery<ListParams>,
) -> Result<Json<Vec<User>>, AppError> {
    let query = state.search(params);
    let users = state.store()?.find_users(&query)?;
    Ok(Json(users))
}

/// POST /users - Register
async fn create_user(
    State(state): State<AppState>,
    AppJson(request): AppJson<CreateUserRequest>,
) -> Result<Json<User>, AppError> {
    require("name", &request.name)?;
    require("password", &request.password)?;
    let password = hash_password(&request.password)?;

    let user = state.store()?.create_user(NewUser {
        name: request.name,
        password,
        avatar_url: request.avatar_url,
        gender: request.gender,
        headline: request.headline,
    })?;

    tracing::info!("Registered user {} ({})", user.name, user.id);
    Ok(Json(user))
}

/// POST /users/login - Exchange name and password for a token
async fn login(
    State(state): State<AppState>,
    AppJson(request): AppJson<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    require("name", &request.name)?;
    require("password", &request.password)?;

    let credentials = state.store()?.credentials_by_name(&request.name)?;
    let credentials = match credentials {
        Some(c) if verify_password(&request.password, &c.digest) => c,
        _ => {
            return Err(AppError::Unauthenticated(
                "Incorrect user name or password".to_string(),
            ))
        }
    };

    let token = state
        .sessions
        .generate_token(credentials.user_id, &credentials.name)?;
    Ok(Json(LoginResponse { token }))
}

/// GET /users/:id - Profile, with `fields=a;b` selecting hidden fields
async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
    AppQuery(params): AppQuery<ProfileParams>,
) -> Result<Json<UserProfile>, AppError> {
    let id = parse_id(&id)?;
    let fields = params
        .fields
        .as_deref()
        .map(FieldSelector::parse)
        .unwrap_or_default();

    let store = state.store()?;
    let user = store
        .get_user(id, &fields)?
        .ok_or_else(|| AppError::NotFound(format!("User {} not found", id)))?;

    let mut relations = BTreeMap::new();
    for set in fields.relationships() {
        relations.insert(*set, state.engine.list(&*store, id, *set)?);
    }

    Ok(Json(UserProfile {
        user: user.expand(&*store)?,
        relations,
    }))
}

fn ensure_self(caller: &AuthUser, id: EntityId) -> Result<(), AppError> {
    if caller.id != id {
        return Err(AppError::Forbidden("Not allowed to modify another user".to_string()));
    }
    Ok(())
}

/// PATCH /users/:id - Update own profile
async fn update_user(
    State(state): State<AppState>,
    caller: AuthUser,
    Path(id): Path<String>,
    AppJson(request): AppJson<UpdateUserRequest>,
) -> Result<Json<User>, AppError> {
    let id = parse_id(&id)?;
    ensure_self(&caller, id)?;

    if let Some(password) = &request.password {
        require("password", password)?;
    }
    let patch = UserPatch {
        name: request.name,
        password: request.password.as_deref().map(hash_password).transpose()?,
        avatar_url: request.avatar_url,
        gender: request.gender,
        headline: request.headline,
        locations: request.locations,
        business: request.business,
        employments: request.employments,
        educations: request.educations,
    };
    patch.validate().map_err(AppError::Validation)?;

    let user = state
        .store()?
        .update_user(id, patch)?
        .ok_or_else(|| AppError::NotFound(format!("User {} not found", id)))?;
    Ok(Json(user))
}

/// DELETE /users/:id - Delete own account
///
/// The account's own sets are emptied through the engine first so the
/// vote counts it contributed are released, then every reference to the
/// account held by other users is dropped.
async fn delete_user(
    State(state): State<AppState>,
    caller: AuthUser,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let id = parse_id(&id)?;
    ensure_self(&caller, id)?;

    let mut store = state.store()?;
    if !store.exists(EntityKind::User, id)? {
        return Err(AppError::NotFound(format!("User {} not found", id)));
    }
    state.engine.purge_actor(&mut *store, id)?;
    state.engine.purge_target(&mut *store, EntityKind::User, id)?;
    store.delete_user(id)?;

    tracing::info!("Deleted user {}", id);
    Ok(StatusCode::NO_CONTENT)
}

/// GET /users/:id/questions - Questions asked by a user
async fn list_questions(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<QuestionSummary>>, AppError> {
    let id = parse_id(&id)?;
    let store = state.store()?;
    if !store.exists(EntityKind::User, id)? {
        return Err(AppError::NotFound(format!("User {} not found", id)));
    }
    let questions = store.questions_by_questioner(id)?;
    Ok(Json(questions.into_iter().map(QuestionSummary::from).collect()))
}
