use std::sync::Arc;

use axum::{
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use serde_json::{json, Value};

use crate::{
    db::{SessionStore, Store},
    services::{Catalog, LinkChecker},
};

pub mod auth;
pub mod books;
pub mod recommendations;
pub mod reminders;
pub mod sessions;
pub mod users;
pub mod works;

/// Shared handler state
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub sessions: Arc<dyn SessionStore>,
    pub catalog: Arc<Catalog>,
    pub link_checker: LinkChecker,
}

/// Creates the application router with all routes
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", api_routes())
        .with_state(state)
}

/// API routes under /api/v1
fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", post(auth::logout))
        .route("/me", get(users::me))
        .route("/me/preferences", put(users::update_preferences))
        .route("/books", get(books::search))
        .route("/books/genres", get(books::genres))
        .route("/books/:id", get(books::get_book))
        .route("/books/:id/link", get(books::link))
        .route(
            "/books/:id/comments",
            get(books::comments).post(books::add_comment),
        )
        .route("/books/:id/plan", get(books::plan))
        .route("/recommendations", get(recommendations::recommend))
        .route("/sessions", get(sessions::list).post(sessions::log_session))
        .route("/sessions/stats", get(sessions::stats))
        .route("/works", get(works::community).post(works::publish))
        .route("/works/mine", get(works::mine))
        .route("/works/:id", get(works::get_work))
        .route(
            "/works/:id/comments",
            get(works::comments).post(works::add_comment),
        )
        .route(
            "/reminder",
            get(reminders::get_reminder).put(reminders::save_reminder),
        )
        .route("/reminder/due", get(reminders::due))
}

/// Health check endpoint
async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}
