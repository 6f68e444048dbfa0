use chrono::{DateTime, Utc};
use serde::Serialize;

/// A logged stretch of reading
#[derive(Debug, Clone, Serialize, PartialEq, sqlx::FromRow)]
pub struct ReadingSession {
    pub id: i64,
    pub user_id: i64,
    pub book_id: i64,
    /// Title at the time of logging, kept so history survives catalog changes
    pub book_title: String,
    pub pages_read: i32,
    pub minutes: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewReadingSession {
    pub user_id: i64,
    pub book_id: i64,
    pub book_title: String,
    pub pages_read: i32,
    pub minutes: i32,
}

/// Aggregate reading statistics for one user
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ReadingStats {
    pub total_sessions: usize,
    pub total_pages: i64,
    pub total_minutes: i64,
    /// `total_minutes` split into whole hours and the remainder
    pub hours: i64,
    pub minutes: i64,
    pub pages_per_hour: f64,
    pub recent: Vec<ReadingSession>,
}
