use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use crate::{
    error::{AppError, AppResult},
    middleware::AuthUser,
    models::{
        CreativeWork, NewCreativeWork, NewWorkComment, WorkComment, WorkKind, WorkScope,
        DEFAULT_WORK_GENRE,
    },
    routes::AppState,
};

#[derive(Debug, Deserialize)]
pub struct PublishRequest {
    pub title: String,
    pub kind: WorkKind,
    pub content: String,
    #[serde(default)]
    pub genre: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default = "default_public")]
    pub is_public: bool,
}

fn default_public() -> bool {
    true
}

fn required(value: &str, field: &str) -> AppResult<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AppError::InvalidInput(format!("{} is required", field)));
    }
    Ok(value.to_string())
}

pub async fn publish(
    State(state): State<Arc<AppState>>,
    caller: AuthUser,
    Json(request): Json<PublishRequest>,
) -> AppResult<(StatusCode, Json<CreativeWork>)> {
    let title = required(&request.title, "title")?;
    let content = required(&request.content, "content")?;
    let genre = request
        .genre
        .as_deref()
        .map(str::trim)
        .filter(|g| !g.is_empty())
        .unwrap_or(DEFAULT_WORK_GENRE)
        .to_string();
    let description = request
        .description
        .map(|d| d.trim().to_string())
        .filter(|d| !d.is_empty());

    let work = state
        .store
        .add_creative_work(NewCreativeWork {
            user_id: caller.user.id,
            username: caller.user.username,
            title,
            kind: request.kind,
            content,
            genre,
            description,
            is_public: request.is_public,
        })
        .await?;

    tracing::info!(
        user_id = work.user_id,
        work_id = work.id,
        kind = %work.kind,
        is_public = work.is_public,
        "Creative work published"
    );
    Ok((StatusCode::CREATED, Json(work)))
}

/// Public works by other users
pub async fn community(
    State(state): State<Arc<AppState>>,
    caller: AuthUser,
) -> AppResult<Json<Vec<CreativeWork>>> {
    let works = state
        .store
        .creative_works(WorkScope::CommunityFor(caller.user.id))
        .await?;
    Ok(Json(works))
}

pub async fn mine(
    State(state): State<Arc<AppState>>,
    caller: AuthUser,
) -> AppResult<Json<Vec<CreativeWork>>> {
    let works = state
        .store
        .creative_works(WorkScope::Author(caller.user.id))
        .await?;
    Ok(Json(works))
}

/// A work the caller may see. Private works of others look missing.
async fn visible_work(state: &AppState, id: i64, user_id: i64) -> AppResult<CreativeWork> {
    state
        .store
        .get_creative_work(id)
        .await?
        .filter(|work| work.visible_to(user_id))
        .ok_or_else(|| AppError::NotFound(format!("Work {} not found", id)))
}

pub async fn get_work(
    State(state): State<Arc<AppState>>,
    caller: AuthUser,
    Path(id): Path<i64>,
) -> AppResult<Json<CreativeWork>> {
    Ok(Json(visible_work(&state, id, caller.user.id).await?))
}

pub async fn comments(
    State(state): State<Arc<AppState>>,
    caller: AuthUser,
    Path(id): Path<i64>,
) -> AppResult<Json<Vec<WorkComment>>> {
    let work = visible_work(&state, id, caller.user.id).await?;
    Ok(Json(state.store.work_comments(work.id).await?))
}

#[derive(Debug, Deserialize)]
pub struct WorkCommentRequest {
    pub comment_text: String,
}

pub async fn add_comment(
    State(state): State<Arc<AppState>>,
    caller: AuthUser,
    Path(id): Path<i64>,
    Json(request): Json<WorkCommentRequest>,
) -> AppResult<(StatusCode, Json<WorkComment>)> {
    let comment_text = required(&request.comment_text, "comment_text")?;
    let work = visible_work(&state, id, caller.user.id).await?;

    let comment = state
        .store
        .add_work_comment(NewWorkComment {
            work_id: work.id,
            user_id: caller.user.id,
            username: caller.user.username,
            comment_text,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(comment)))
}
