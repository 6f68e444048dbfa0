use std::sync::Arc;

use axum::{extract::State, Json};

use crate::{
    error::AppResult,
    middleware::AuthUser,
    models::{User, UserPreferences},
    routes::AppState,
    services::auth,
};

pub async fn me(caller: AuthUser) -> Json<User> {
    Json(caller.user)
}

pub async fn update_preferences(
    State(state): State<Arc<AppState>>,
    caller: AuthUser,
    Json(preferences): Json<UserPreferences>,
) -> AppResult<Json<User>> {
    let user = auth::update_preferences(state.store.as_ref(), caller.user.id, preferences).await?;
    tracing::info!(user_id = user.id, "Preferences updated");
    Ok(Json(user))
}
