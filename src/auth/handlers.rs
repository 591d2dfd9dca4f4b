use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    routing::{post, put},
    Json, Router,
};
use tracing::instrument;

use crate::{
    auth::{
        dto::{LoginRequest, RegisterRequest, SuspendResponse},
        repo_types::User,
    },
    error::AppError,
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
}

pub fn account_routes() -> Router<AppState> {
    Router::new().route("/users/:user_id/suspend", put(suspend))
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<User>), AppError> {
    let Json(payload) = payload?;
    let user = state.credentials.register(payload.into()).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<User>, AppError> {
    let Json(payload) = payload?;
    let user = state
        .credentials
        .login(&payload.email, &payload.password)
        .await?;
    Ok(Json(user))
}

#[instrument(skip(state))]
pub async fn suspend(
    State(state): State<AppState>,
    user_id: Result<Path<i64>, PathRejection>,
) -> Result<Json<SuspendResponse>, AppError> {
    let Path(user_id) = user_id?;
    let suspended_user = state.suspensions.suspend(user_id).await?;
    Ok(Json(SuspendResponse {
        message: "Account suspended successfully.".into(),
        suspended_user,
    }))
}
