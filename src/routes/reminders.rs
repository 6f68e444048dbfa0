use std::sync::Arc;

use axum::{extract::State, Json};
use chrono::{Local, NaiveDateTime};
use serde::Serialize;

use crate::{
    error::{AppError, AppResult},
    middleware::AuthUser,
    models::{Reminder, StoredReminder},
    routes::AppState,
};

pub async fn get_reminder(
    State(state): State<Arc<AppState>>,
    caller: AuthUser,
) -> AppResult<Json<StoredReminder>> {
    state
        .store
        .get_reminder(caller.user.id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound("No reminder set".to_string()))
}

/// Replace the caller's reminder
pub async fn save_reminder(
    State(state): State<Arc<AppState>>,
    caller: AuthUser,
    Json(mut reminder): Json<Reminder>,
) -> AppResult<Json<StoredReminder>> {
    if reminder.days.is_empty() {
        return Err(AppError::InvalidInput(
            "at least one day must be selected".to_string(),
        ));
    }
    reminder.days.sort_by_key(|d| d.num_days_from_monday());
    reminder.days.dedup();

    let stored = state.store.save_reminder(caller.user.id, reminder).await?;
    tracing::info!(
        user_id = stored.user_id,
        time = %stored.reminder.time.format("%H:%M"),
        active = stored.reminder.is_active,
        "Reminder saved"
    );
    Ok(Json(stored))
}

#[derive(Debug, Serialize)]
pub struct DueCheck {
    pub due: bool,
    pub checked_at: NaiveDateTime,
    pub reminder: Option<StoredReminder>,
}

/// Whether the caller's reminder fires now, in server local time
pub async fn due(
    State(state): State<Arc<AppState>>,
    caller: AuthUser,
) -> AppResult<Json<DueCheck>> {
    let now = Local::now().naive_local();
    let reminder = state.store.get_reminder(caller.user.id).await?;
    let due = reminder
        .as_ref()
        .is_some_and(|stored| stored.reminder.is_due_at(now));

    Ok(Json(DueCheck {
        due,
        checked_at: now,
        reminder,
    }))
}
