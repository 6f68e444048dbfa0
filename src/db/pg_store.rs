use chrono::{DateTime, NaiveTime, Utc};
use sqlx::PgPool;

use crate::{
    db::Store,
    error::{AppError, AppResult},
    models::{
        parse_weekdays, weekday_names, BookComment, CreativeWork, NewBookComment,
        NewCreativeWork, NewReadingSession, NewUser, NewWorkComment, PageRange, ReadingSession,
        Reminder, StoredReminder, User, UserCredentials, UserPreferences, WorkComment, WorkScope,
    },
};

const USER_COLUMNS: &str = "id, username, email, password_hash, reading_speed, \
    daily_reading_time, preferred_genres, preferred_language, min_pages, max_pages, created_at";

const WORK_COLUMNS: &str =
    "id, user_id, username, title, kind, content, genre, description, is_public, created_at";

/// Postgres unique_violation
const UNIQUE_VIOLATION: &str = "23505";

#[derive(sqlx::FromRow)]
struct UserRow {
    id: i64,
    username: String,
    email: String,
    password_hash: String,
    reading_speed: i32,
    daily_reading_time: i32,
    preferred_genres: Vec<String>,
    preferred_language: String,
    min_pages: i32,
    max_pages: i32,
    created_at: DateTime<Utc>,
}

impl From<UserRow> for UserCredentials {
    fn from(row: UserRow) -> Self {
        UserCredentials {
            user: User {
                id: row.id,
                username: row.username,
                email: row.email,
                preferences: UserPreferences {
                    preferred_genres: row.preferred_genres,
                    page_range: PageRange {
                        min: row.min_pages,
                        max: row.max_pages,
                    },
                    preferred_language: row.preferred_language,
                    reading_speed: row.reading_speed,
                    daily_reading_time: row.daily_reading_time,
                },
                created_at: row.created_at,
            },
            password_hash: row.password_hash,
        }
    }
}

#[derive(sqlx::FromRow)]
struct WorkRow {
    id: i64,
    user_id: i64,
    username: String,
    title: String,
    kind: String,
    content: String,
    genre: String,
    description: Option<String>,
    is_public: bool,
    created_at: DateTime<Utc>,
}

impl TryFrom<WorkRow> for CreativeWork {
    type Error = AppError;

    fn try_from(row: WorkRow) -> Result<Self, Self::Error> {
        Ok(CreativeWork {
            id: row.id,
            user_id: row.user_id,
            username: row.username,
            title: row.title,
            kind: row.kind.parse().map_err(AppError::Internal)?,
            content: row.content,
            genre: row.genre,
            description: row.description,
            is_public: row.is_public,
            created_at: row.created_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct ReminderRow {
    user_id: i64,
    reminder_time: NaiveTime,
    days_of_week: Vec<String>,
    is_active: bool,
    updated_at: DateTime<Utc>,
}

impl From<ReminderRow> for StoredReminder {
    fn from(row: ReminderRow) -> Self {
        StoredReminder {
            user_id: row.user_id,
            reminder: Reminder {
                time: row.reminder_time,
                days: parse_weekdays(&row.days_of_week),
                is_active: row.is_active,
            },
            updated_at: row.updated_at,
        }
    }
}

/// Maps a unique-constraint failure on `users` to a conflict naming the field
fn user_conflict(error: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db_error) = &error {
        if db_error.code().as_deref() == Some(UNIQUE_VIOLATION) {
            let field = match db_error.constraint() {
                Some(c) if c.contains("email") => "Email",
                _ => "Username",
            };
            return AppError::Conflict(format!("{} already exists", field));
        }
    }
    AppError::Database(error)
}

/// Store backed by PostgreSQL
#[derive(Clone)]
pub struct PgStore {
    db_pool: PgPool,
}

impl PgStore {
    pub fn new(db_pool: PgPool) -> Self {
        Self { db_pool }
    }
}

#[async_trait::async_trait]
impl Store for PgStore {
    async fn create_user(&self, user: NewUser) -> AppResult<User> {
        let prefs = &user.preferences;
        let row = sqlx::query_as::<_, UserRow>(&format!(
            r#"
            INSERT INTO users (username, email, password_hash, reading_speed, daily_reading_time,
                               preferred_genres, preferred_language, min_pages, max_pages)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {}
            "#,
            USER_COLUMNS
        ))
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(prefs.reading_speed)
        .bind(prefs.daily_reading_time)
        .bind(&prefs.preferred_genres)
        .bind(&prefs.preferred_language)
        .bind(prefs.page_range.min)
        .bind(prefs.page_range.max)
        .fetch_one(&self.db_pool)
        .await
        .map_err(user_conflict)?;

        Ok(UserCredentials::from(row).user)
    }

    async fn find_credentials(&self, username: &str) -> AppResult<Option<UserCredentials>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {} FROM users WHERE username = $1",
            USER_COLUMNS
        ))
        .bind(username)
        .fetch_optional(&self.db_pool)
        .await?;

        Ok(row.map(UserCredentials::from))
    }

    async fn get_user(&self, id: i64) -> AppResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {} FROM users WHERE id = $1",
            USER_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.db_pool)
        .await?;

        Ok(row.map(|r| UserCredentials::from(r).user))
    }

    async fn update_preferences(&self, id: i64, preferences: &UserPreferences) -> AppResult<User> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            r#"
            UPDATE users
            SET reading_speed = $2, daily_reading_time = $3, preferred_genres = $4,
                preferred_language = $5, min_pages = $6, max_pages = $7
            WHERE id = $1
            RETURNING {}
            "#,
            USER_COLUMNS
        ))
        .bind(id)
        .bind(preferences.reading_speed)
        .bind(preferences.daily_reading_time)
        .bind(&preferences.preferred_genres)
        .bind(&preferences.preferred_language)
        .bind(preferences.page_range.min)
        .bind(preferences.page_range.max)
        .fetch_optional(&self.db_pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {} not found", id)))?;

        Ok(UserCredentials::from(row).user)
    }

    async fn add_reading_session(&self, session: NewReadingSession) -> AppResult<ReadingSession> {
        let created = sqlx::query_as::<_, ReadingSession>(
            r#"
            INSERT INTO reading_sessions (user_id, book_id, book_title, pages_read, minutes)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, user_id, book_id, book_title, pages_read, minutes, created_at
            "#,
        )
        .bind(session.user_id)
        .bind(session.book_id)
        .bind(&session.book_title)
        .bind(session.pages_read)
        .bind(session.minutes)
        .fetch_one(&self.db_pool)
        .await?;

        Ok(created)
    }

    async fn user_sessions(&self, user_id: i64) -> AppResult<Vec<ReadingSession>> {
        let sessions = sqlx::query_as::<_, ReadingSession>(
            r#"
            SELECT id, user_id, book_id, book_title, pages_read, minutes, created_at
            FROM reading_sessions
            WHERE user_id = $1
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.db_pool)
        .await?;

        Ok(sessions)
    }

    async fn add_book_comment(&self, comment: NewBookComment) -> AppResult<BookComment> {
        let created = sqlx::query_as::<_, BookComment>(
            r#"
            INSERT INTO book_comments (user_id, username, book_id, comment_text, rating)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, user_id, username, book_id, comment_text, rating, created_at
            "#,
        )
        .bind(comment.user_id)
        .bind(&comment.username)
        .bind(comment.book_id)
        .bind(&comment.comment_text)
        .bind(comment.rating)
        .fetch_one(&self.db_pool)
        .await?;

        Ok(created)
    }

    async fn book_comments(&self, book_id: i64) -> AppResult<Vec<BookComment>> {
        let comments = sqlx::query_as::<_, BookComment>(
            r#"
            SELECT id, user_id, username, book_id, comment_text, rating, created_at
            FROM book_comments
            WHERE book_id = $1
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(book_id)
        .fetch_all(&self.db_pool)
        .await?;

        Ok(comments)
    }

    async fn add_creative_work(&self, work: NewCreativeWork) -> AppResult<CreativeWork> {
        let row = sqlx::query_as::<_, WorkRow>(&format!(
            r#"
            INSERT INTO creative_works (user_id, username, title, kind, content, genre, description, is_public)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {}
            "#,
            WORK_COLUMNS
        ))
        .bind(work.user_id)
        .bind(&work.username)
        .bind(&work.title)
        .bind(work.kind.as_str())
        .bind(&work.content)
        .bind(&work.genre)
        .bind(&work.description)
        .bind(work.is_public)
        .fetch_one(&self.db_pool)
        .await?;

        row.try_into()
    }

    async fn creative_works(&self, scope: WorkScope) -> AppResult<Vec<CreativeWork>> {
        let (filter, user_id) = match scope {
            WorkScope::Author(user_id) => ("user_id = $1", user_id),
            WorkScope::CommunityFor(user_id) => ("is_public AND user_id <> $1", user_id),
        };
        let sql = format!(
            "SELECT {} FROM creative_works WHERE {} ORDER BY created_at DESC, id DESC",
            WORK_COLUMNS, filter
        );

        sqlx::query_as::<_, WorkRow>(&sql)
            .bind(user_id)
            .fetch_all(&self.db_pool)
            .await?
            .into_iter()
            .map(CreativeWork::try_from)
            .collect()
    }

    async fn get_creative_work(&self, id: i64) -> AppResult<Option<CreativeWork>> {
        let row = sqlx::query_as::<_, WorkRow>(&format!(
            "SELECT {} FROM creative_works WHERE id = $1",
            WORK_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.db_pool)
        .await?;

        row.map(CreativeWork::try_from).transpose()
    }

    async fn add_work_comment(&self, comment: NewWorkComment) -> AppResult<WorkComment> {
        let created = sqlx::query_as::<_, WorkComment>(
            r#"
            INSERT INTO creative_work_comments (work_id, user_id, username, comment_text)
            VALUES ($1, $2, $3, $4)
            RETURNING id, work_id, user_id, username, comment_text, created_at
            "#,
        )
        .bind(comment.work_id)
        .bind(comment.user_id)
        .bind(&comment.username)
        .bind(&comment.comment_text)
        .fetch_one(&self.db_pool)
        .await?;

        Ok(created)
    }

    async fn work_comments(&self, work_id: i64) -> AppResult<Vec<WorkComment>> {
        let comments = sqlx::query_as::<_, WorkComment>(
            r#"
            SELECT id, work_id, user_id, username, comment_text, created_at
            FROM creative_work_comments
            WHERE work_id = $1
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .bind(work_id)
        .fetch_all(&self.db_pool)
        .await?;

        Ok(comments)
    }

    async fn save_reminder(&self, user_id: i64, reminder: Reminder) -> AppResult<StoredReminder> {
        let row = sqlx::query_as::<_, ReminderRow>(
            r#"
            INSERT INTO reading_reminders (user_id, reminder_time, days_of_week, is_active)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (user_id) DO UPDATE
            SET reminder_time = EXCLUDED.reminder_time,
                days_of_week = EXCLUDED.days_of_week,
                is_active = EXCLUDED.is_active,
                updated_at = NOW()
            RETURNING user_id, reminder_time, days_of_week, is_active, updated_at
            "#,
        )
        .bind(user_id)
        .bind(reminder.time)
        .bind(weekday_names(&reminder.days))
        .bind(reminder.is_active)
        .fetch_one(&self.db_pool)
        .await?;

        Ok(row.into())
    }

    async fn get_reminder(&self, user_id: i64) -> AppResult<Option<StoredReminder>> {
        let row = sqlx::query_as::<_, ReminderRow>(
            r#"
            SELECT user_id, reminder_time, days_of_week, is_active, updated_at
            FROM reading_reminders
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.db_pool)
        .await?;

        Ok(row.map(StoredReminder::from))
    }
}
