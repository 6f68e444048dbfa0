use crate::{
    error::AppResult,
    models::{
        BookComment, CreativeWork, NewBookComment, NewCreativeWork, NewReadingSession, NewUser,
        NewWorkComment, ReadingSession, Reminder, StoredReminder, User, UserCredentials,
        UserPreferences, WorkComment, WorkScope,
    },
};

/// Persistence for users and everything they create
///
/// Records are append-only except user preferences and the per-user
/// reminder, which are replaced wholesale.
#[async_trait::async_trait]
pub trait Store: Send + Sync {
    /// Insert a user. Fails with `Conflict` when the username or email is taken.
    async fn create_user(&self, user: NewUser) -> AppResult<User>;

    /// User and password hash by exact username
    async fn find_credentials(&self, username: &str) -> AppResult<Option<UserCredentials>>;

    async fn get_user(&self, id: i64) -> AppResult<Option<User>>;

    /// Replace a user's reading preferences
    async fn update_preferences(&self, id: i64, preferences: &UserPreferences) -> AppResult<User>;

    async fn add_reading_session(&self, session: NewReadingSession) -> AppResult<ReadingSession>;

    /// A user's sessions, newest first
    async fn user_sessions(&self, user_id: i64) -> AppResult<Vec<ReadingSession>>;

    async fn add_book_comment(&self, comment: NewBookComment) -> AppResult<BookComment>;

    /// Comments on a book, newest first
    async fn book_comments(&self, book_id: i64) -> AppResult<Vec<BookComment>>;

    async fn add_creative_work(&self, work: NewCreativeWork) -> AppResult<CreativeWork>;

    /// Works in scope, newest first
    async fn creative_works(&self, scope: WorkScope) -> AppResult<Vec<CreativeWork>>;

    async fn get_creative_work(&self, id: i64) -> AppResult<Option<CreativeWork>>;

    async fn add_work_comment(&self, comment: NewWorkComment) -> AppResult<WorkComment>;

    /// A work's comment thread, oldest first
    async fn work_comments(&self, work_id: i64) -> AppResult<Vec<WorkComment>>;

    /// Insert or replace the user's reminder
    async fn save_reminder(&self, user_id: i64, reminder: Reminder) -> AppResult<StoredReminder>;

    async fn get_reminder(&self, user_id: i64) -> AppResult<Option<StoredReminder>>;
}
