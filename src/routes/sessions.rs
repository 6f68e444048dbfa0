use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Extension, Json};
use serde::Deserialize;

use crate::{
    error::{AppError, AppResult},
    middleware::{AuthUser, RequestId},
    models::{NewReadingSession, ReadingSession, ReadingStats},
    routes::AppState,
    services::statistics,
};

#[derive(Debug, Deserialize)]
pub struct LogSessionRequest {
    pub book_id: i64,
    pub pages_read: i32,
    pub minutes: i32,
}

pub async fn log_session(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    caller: AuthUser,
    Json(request): Json<LogSessionRequest>,
) -> AppResult<(StatusCode, Json<ReadingSession>)> {
    if request.pages_read <= 0 {
        return Err(AppError::InvalidInput("pages_read must be positive".to_string()));
    }
    if request.minutes <= 0 {
        return Err(AppError::InvalidInput("minutes must be positive".to_string()));
    }
    let book = state.catalog.find(request.book_id).await?;

    let session = state
        .store
        .add_reading_session(NewReadingSession {
            user_id: caller.user.id,
            book_id: book.id,
            book_title: book.title,
            pages_read: request.pages_read,
            minutes: request.minutes,
        })
        .await?;

    tracing::info!(
        request_id = %request_id,
        user_id = session.user_id,
        book_id = session.book_id,
        pages_read = session.pages_read,
        minutes = session.minutes,
        "Reading session logged"
    );

    Ok((StatusCode::CREATED, Json(session)))
}

/// The caller's sessions, newest first
pub async fn list(
    State(state): State<Arc<AppState>>,
    caller: AuthUser,
) -> AppResult<Json<Vec<ReadingSession>>> {
    Ok(Json(state.store.user_sessions(caller.user.id).await?))
}

pub async fn stats(
    State(state): State<Arc<AppState>>,
    caller: AuthUser,
) -> AppResult<Json<ReadingStats>> {
    let sessions = state.store.user_sessions(caller.user.id).await?;
    Ok(Json(statistics::reading_stats(&sessions)))
}
