use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::{
    error::{AppError, AppResult},
    middleware::AuthUser,
    models::{average_rating, Book, BookComment, BookFilter, NewBookComment},
    routes::AppState,
    services::{
        reading_plan::{self, ReadingPlan, MAX_TARGET_DAYS},
        recommendations::{time_hint, TimeHint},
    },
};

/// Search the catalog by title, author and genre
pub async fn search(
    State(state): State<Arc<AppState>>,
    Query(filter): Query<BookFilter>,
) -> AppResult<Json<Vec<Book>>> {
    let books = state.catalog.search(&filter).await?;
    Ok(Json(books))
}

pub async fn genres(State(state): State<Arc<AppState>>) -> AppResult<Json<Vec<String>>> {
    Ok(Json(state.catalog.genres().await?))
}

#[derive(Debug, Serialize)]
pub struct BookDetails {
    #[serde(flatten)]
    pub book: Book,
    pub time_hint: TimeHint,
}

pub async fn get_book(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> AppResult<Json<BookDetails>> {
    let book = state.catalog.find(id).await?;
    let time_hint = time_hint(&book.genre);
    Ok(Json(BookDetails { book, time_hint }))
}

#[derive(Debug, Serialize)]
pub struct LinkStatus {
    pub book_id: i64,
    pub link: Option<String>,
    pub available: bool,
}

/// Whether the book's download link currently answers
pub async fn link(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> AppResult<Json<LinkStatus>> {
    let book = state.catalog.find(id).await?;
    let available = match book.link.as_deref().map(str::trim) {
        Some(url) if !url.is_empty() => state.link_checker.is_available(book.id, url).await,
        _ => false,
    };
    Ok(Json(LinkStatus {
        book_id: book.id,
        link: book.link,
        available,
    }))
}

#[derive(Debug, Serialize)]
pub struct BookComments {
    pub book_id: i64,
    pub average_rating: Option<f64>,
    pub comments: Vec<BookComment>,
}

pub async fn comments(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> AppResult<Json<BookComments>> {
    let comments = state.store.book_comments(id).await?;
    Ok(Json(BookComments {
        book_id: id,
        average_rating: average_rating(&comments),
        comments,
    }))
}

#[derive(Debug, Deserialize)]
pub struct CommentRequest {
    pub comment_text: String,
    #[serde(default)]
    pub rating: Option<i32>,
}

pub async fn add_comment(
    State(state): State<Arc<AppState>>,
    caller: AuthUser,
    Path(id): Path<i64>,
    Json(request): Json<CommentRequest>,
) -> AppResult<(StatusCode, Json<BookComment>)> {
    let comment_text = request.comment_text.trim();
    if comment_text.is_empty() {
        return Err(AppError::InvalidInput("comment_text is required".to_string()));
    }
    if let Some(rating) = request.rating {
        if !(1..=5).contains(&rating) {
            return Err(AppError::InvalidInput(
                "rating must be between 1 and 5".to_string(),
            ));
        }
    }
    let book = state.catalog.find(id).await?;

    let comment = state
        .store
        .add_book_comment(NewBookComment {
            user_id: caller.user.id,
            username: caller.user.username,
            book_id: book.id,
            comment_text: comment_text.to_string(),
            rating: request.rating,
        })
        .await?;

    tracing::info!(user_id = comment.user_id, book_id = book.id, "Book comment added");
    Ok((StatusCode::CREATED, Json(comment)))
}

#[derive(Debug, Deserialize)]
pub struct PlanQuery {
    pub target_days: Option<i32>,
}

#[derive(Debug, Serialize)]
pub struct BookPlan {
    pub book_id: i64,
    pub title: String,
    pub pages: i32,
    pub suggested_target_days: i32,
    pub plan: ReadingPlan,
}

/// Reading plan for the caller, defaulting to the suggested number of days
pub async fn plan(
    State(state): State<Arc<AppState>>,
    caller: AuthUser,
    Path(id): Path<i64>,
    Query(query): Query<PlanQuery>,
) -> AppResult<Json<BookPlan>> {
    let book = state.catalog.find(id).await?;
    let prefs = &caller.user.preferences;
    let suggested = reading_plan::suggested_target_days(book.pages, prefs);

    let target_days = query.target_days.unwrap_or(suggested);
    if !(1..=MAX_TARGET_DAYS).contains(&target_days) {
        return Err(AppError::InvalidInput(format!(
            "target_days must be between 1 and {}",
            MAX_TARGET_DAYS
        )));
    }

    Ok(Json(BookPlan {
        book_id: book.id,
        pages: book.pages,
        suggested_target_days: suggested,
        plan: reading_plan::plan_for(book.pages, prefs, target_days),
        title: book.title,
    }))
}
