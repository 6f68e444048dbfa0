use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};
use serde::Deserialize;

use crate::{
    error::AppResult,
    middleware::AuthUser,
    models::UserPreferences,
    routes::AppState,
    services::auth::{self, AuthSession, Registration},
};

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub preferences: UserPreferences,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(request): Json<RegisterRequest>,
) -> AppResult<(StatusCode, Json<AuthSession>)> {
    let registration = Registration {
        username: request.username,
        email: request.email,
        password: request.password,
        preferences: request.preferences,
    };
    let session =
        auth::register(state.store.as_ref(), state.sessions.as_ref(), registration).await?;
    Ok((StatusCode::CREATED, Json(session)))
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(request): Json<LoginRequest>,
) -> AppResult<Json<AuthSession>> {
    let session = auth::login(
        state.store.as_ref(),
        state.sessions.as_ref(),
        &request.username,
        &request.password,
    )
    .await?;
    Ok(Json(session))
}

pub async fn logout(
    State(state): State<Arc<AppState>>,
    caller: AuthUser,
) -> AppResult<StatusCode> {
    state.sessions.revoke(&caller.token).await?;
    tracing::info!(user_id = caller.user.id, "User logged out");
    Ok(StatusCode::NO_CONTENT)
}
