use chrono::{DateTime, Utc};
use serde::Serialize;

/// A comment on a catalog book, optionally with a 1-5 rating
#[derive(Debug, Clone, Serialize, PartialEq, sqlx::FromRow)]
pub struct BookComment {
    pub id: i64,
    pub user_id: i64,
    pub username: String,
    pub book_id: i64,
    pub comment_text: String,
    pub rating: Option<i32>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewBookComment {
    pub user_id: i64,
    pub username: String,
    pub book_id: i64,
    pub comment_text: String,
    pub rating: Option<i32>,
}

/// A comment in a creative work's thread
#[derive(Debug, Clone, Serialize, PartialEq, sqlx::FromRow)]
pub struct WorkComment {
    pub id: i64,
    pub work_id: i64,
    pub user_id: i64,
    pub username: String,
    pub comment_text: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewWorkComment {
    pub work_id: i64,
    pub user_id: i64,
    pub username: String,
    pub comment_text: String,
}

/// Mean of the ratings present in `comments`, if any
pub fn average_rating(comments: &[BookComment]) -> Option<f64> {
    let ratings: Vec<i32> = comments.iter().filter_map(|c| c.rating).collect();
    if ratings.is_empty() {
        return None;
    }
    Some(ratings.iter().map(|r| *r as f64).sum::<f64>() / ratings.len() as f64)
}
