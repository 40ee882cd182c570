//! HTTP request handlers.
//!
//! One submodule per resource; each contributes its routes to
//! [`create_router`]. Handlers lock the shared store for the duration of a
//! request and never hold the lock across an await point.

mod answers;
mod comments;
mod questions;
mod relationships;
mod topics;
mod users;

use crate::auth::{SessionError, SessionManager};
use crate::config::ServerConfig;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{FromRequest, FromRequestParts, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use axum::routing::get;
use axum::Router as AxumRouter;
use colloquy_domain::{EntityId, OwnershipViolation, Pagination, SearchQuery};
use colloquy_social::{MetricsSnapshot, RelationshipEngine, ToggleError};
use colloquy_store::{SqliteStore, StoreError};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, MutexGuard};
use tower_http::trace::TraceLayer;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Session manager for JWT token operations
    pub sessions: Arc<SessionManager>,
    /// Document store
    pub store: Arc<Mutex<SqliteStore>>,
    /// Relationship toggle engine
    pub engine: Arc<RelationshipEngine>,
    /// Page size used when a request has no `per_page`
    pub default_page_size: usize,
}

impl AppState {
    /// Build state from configuration and an opened store
    pub fn new(config: &ServerConfig, store: SqliteStore) -> Self {
        Self {
            sessions: Arc::new(SessionManager::new(
                &config.jwt_secret,
                config.token_expiry_secs,
            )),
            store: Arc::new(Mutex::new(store)),
            engine: Arc::new(RelationshipEngine::new()),
            default_page_size: config.default_page_size,
        }
    }

    pub(crate) fn store(&self) -> Result<MutexGuard<'_, SqliteStore>, AppError> {
        self.store
            .lock()
            .map_err(|_| AppError::Internal("Store lock poisoned".to_string()))
    }

    pub(crate) fn search(&self, params: ListParams) -> SearchQuery {
        SearchQuery {
            text: params.q.unwrap_or_default(),
            pagination: Pagination::with_default(params.page, params.per_page, self.default_page_size),
        }
    }
}

/// `?q=&page=&per_page=` accepted by every list endpoint
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    /// Search text
    pub q: Option<String>,
    /// 1-based page
    pub page: Option<usize>,
    /// Page size
    pub per_page: Option<usize>,
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthCheckResponse {
    /// Overall health status
    pub status: String,
    /// Relationship toggle counters since startup
    pub toggles: MetricsSnapshot,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}

/// Application error type
#[derive(Debug)]
pub enum AppError {
    /// Missing resource
    NotFound(String),
    /// Caller does not own the resource
    Forbidden(String),
    /// Unique key already taken
    Conflict(String),
    /// Malformed input
    Validation(String),
    /// Missing or bad credentials
    Unauthenticated(String),
    /// Token error
    Session(SessionError),
    /// Storage error
    Store(StoreError),
    /// Relationship toggle error
    Toggle(ToggleError),
    /// Internal server error
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            AppError::Validation(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg),
            AppError::Unauthenticated(msg) => (StatusCode::UNAUTHORIZED, msg),
            AppError::Session(e @ SessionError::JwtEncode(_)) => {
                (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
            }
            AppError::Session(e) => (StatusCode::UNAUTHORIZED, e.to_string()),
            AppError::Store(StoreError::Duplicate(msg)) => (StatusCode::CONFLICT, msg),
            AppError::Store(StoreError::NotFound(msg)) => (StatusCode::NOT_FOUND, msg),
            AppError::Store(e) => {
                tracing::error!("Store failure: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
            }
            AppError::Toggle(e @ ToggleError::NotFound { .. }) => {
                (StatusCode::NOT_FOUND, e.to_string())
            }
            AppError::Toggle(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}

impl From<SessionError> for AppError {
    fn from(e: SessionError) -> Self {
        AppError::Session(e)
    }
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        AppError::Store(e)
    }
}

impl From<ToggleError> for AppError {
    fn from(e: ToggleError) -> Self {
        AppError::Toggle(e)
    }
}

impl From<OwnershipViolation> for AppError {
    fn from(e: OwnershipViolation) -> Self {
        AppError::Forbidden(e.to_string())
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

/// JSON body extractor that reports bad input as 422 with an error body
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

/// Query string extractor that reports bad input as 422 with an error body
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct AppQuery<T>(pub T);

/// Parse an id taken from the path
pub(crate) fn parse_id(raw: &str) -> Result<EntityId, AppError> {
    EntityId::from_string(raw).map_err(|e| AppError::Validation(format!("Malformed id: {}", e)))
}

/// Reject a required string field that is blank
pub(crate) fn require(field: &str, value: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{} is required", field)));
    }
    Ok(())
}

/// GET /health - Liveness plus toggle counters
async fn health_check(State(state): State<AppState>) -> Json<HealthCheckResponse> {
    Json(HealthCheckResponse {
        status: "healthy".to_string(),
        toggles: state.engine.metrics().snapshot(),
    })
}

/// Create the axum router with all routes
pub fn create_router(state: AppState) -> AxumRouter {
    AxumRouter::new()
        .route("/health", get(health_check))
        .merge(users::routes())
        .merge(relationships::routes())
        .merge(topics::routes())
        .merge(questions::routes())
        .merge(answers::routes())
        .merge(comments::routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt; // for oneshot

    pub fn create_test_state() -> AppState {
        let config = ServerConfig::default_test_config();
        let store = SqliteStore::new(":memory:").unwrap();
        AppState::new(&config, store)
    }

    /// Send one request and decode the JSON body (Null when empty)
    pub async fn send(
        app: &AxumRouter,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<serde_json::Value>,
    ) -> (StatusCode, serde_json::Value) {
        let mut request = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            request = request.header("authorization", format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => request
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => request.body(Body::empty()).unwrap(),
        };

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if bytes.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }

    /// Register and log in, returning (id, token)
    pub async fn signup(app: &AxumRouter, name: &str) -> (String, String) {
        let credentials = serde_json::json!({ "name": name, "password": "secret" });
        let (status, user) = send(app, "POST", "/users", None, Some(credentials.clone())).await;
        assert_eq!(status, StatusCode::OK);
        let (status, login) = send(app, "POST", "/users/login", None, Some(credentials)).await;
        assert_eq!(status, StatusCode::OK);
        (
            user["id"].as_str().unwrap().to_string(),
            login["token"].as_str().unwrap().to_string(),
        )
    }
}
