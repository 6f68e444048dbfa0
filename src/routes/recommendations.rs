use std::sync::Arc;

use axum::{extract::State, Json};

use crate::{
    error::AppResult,
    middleware::AuthUser,
    routes::AppState,
    services::recommendations::{self, Recommendation},
};

/// Top books for the caller's current preferences
pub async fn recommend(
    State(state): State<Arc<AppState>>,
    caller: AuthUser,
) -> AppResult<Json<Vec<Recommendation>>> {
    let books = state.catalog.books().await?;
    let recommendations =
        recommendations::get_recommendations(&books, &caller.user.preferences);

    tracing::debug!(
        user_id = caller.user.id,
        candidates = books.len(),
        returned = recommendations.len(),
        "Recommendations computed"
    );

    Ok(Json(recommendations))
}
