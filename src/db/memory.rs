use std::collections::HashMap;

use chrono::Utc;
use tokio::sync::RwLock;

use crate::{
    db::Store,
    error::{AppError, AppResult},
    models::{
        BookComment, CreativeWork, NewBookComment, NewCreativeWork, NewReadingSession, NewUser,
        NewWorkComment, ReadingSession, Reminder, StoredReminder, User, UserCredentials,
        UserPreferences, WorkComment, WorkScope,
    },
};

/// In-process store used when no database is configured, and in tests
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<MemoryStoreInner>,
}

#[derive(Default)]
struct MemoryStoreInner {
    users: Vec<UserCredentials>,
    sessions: Vec<ReadingSession>,
    book_comments: Vec<BookComment>,
    works: Vec<CreativeWork>,
    work_comments: Vec<WorkComment>,
    reminders: HashMap<i64, StoredReminder>,
}

/// Next id for an append-only list whose ids start at 1
fn next_id<T>(items: &[T]) -> i64 {
    items.len() as i64 + 1
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl Store for MemoryStore {
    async fn create_user(&self, user: NewUser) -> AppResult<User> {
        let mut inner = self.inner.write().await;

        if inner.users.iter().any(|c| c.user.username == user.username) {
            return Err(AppError::Conflict("Username already exists".to_string()));
        }
        if inner.users.iter().any(|c| c.user.email == user.email) {
            return Err(AppError::Conflict("Email already exists".to_string()));
        }

        let created = User {
            id: next_id(&inner.users),
            username: user.username,
            email: user.email,
            preferences: user.preferences,
            created_at: Utc::now(),
        };
        inner.users.push(UserCredentials {
            user: created.clone(),
            password_hash: user.password_hash,
        });
        Ok(created)
    }

    async fn find_credentials(&self, username: &str) -> AppResult<Option<UserCredentials>> {
        let inner = self.inner.read().await;
        Ok(inner
            .users
            .iter()
            .find(|c| c.user.username == username)
            .cloned())
    }

    async fn get_user(&self, id: i64) -> AppResult<Option<User>> {
        let inner = self.inner.read().await;
        Ok(inner
            .users
            .iter()
            .find(|c| c.user.id == id)
            .map(|c| c.user.clone()))
    }

    async fn update_preferences(&self, id: i64, preferences: &UserPreferences) -> AppResult<User> {
        let mut inner = self.inner.write().await;
        let credentials = inner
            .users
            .iter_mut()
            .find(|c| c.user.id == id)
            .ok_or_else(|| AppError::NotFound(format!("User {} not found", id)))?;
        credentials.user.preferences = preferences.clone();
        Ok(credentials.user.clone())
    }

    async fn add_reading_session(&self, session: NewReadingSession) -> AppResult<ReadingSession> {
        let mut inner = self.inner.write().await;
        let created = ReadingSession {
            id: next_id(&inner.sessions),
            user_id: session.user_id,
            book_id: session.book_id,
            book_title: session.book_title,
            pages_read: session.pages_read,
            minutes: session.minutes,
            created_at: Utc::now(),
        };
        inner.sessions.push(created.clone());
        Ok(created)
    }

    async fn user_sessions(&self, user_id: i64) -> AppResult<Vec<ReadingSession>> {
        let inner = self.inner.read().await;
        Ok(inner
            .sessions
            .iter()
            .rev()
            .filter(|s| s.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn add_book_comment(&self, comment: NewBookComment) -> AppResult<BookComment> {
        let mut inner = self.inner.write().await;
        let created = BookComment {
            id: next_id(&inner.book_comments),
            user_id: comment.user_id,
            username: comment.username,
            book_id: comment.book_id,
            comment_text: comment.comment_text,
            rating: comment.rating,
            created_at: Utc::now(),
        };
        inner.book_comments.push(created.clone());
        Ok(created)
    }

    async fn book_comments(&self, book_id: i64) -> AppResult<Vec<BookComment>> {
        let inner = self.inner.read().await;
        Ok(inner
            .book_comments
            .iter()
            .rev()
            .filter(|c| c.book_id == book_id)
            .cloned()
            .collect())
    }

    async fn add_creative_work(&self, work: NewCreativeWork) -> AppResult<CreativeWork> {
        let mut inner = self.inner.write().await;
        let created = CreativeWork {
            id: next_id(&inner.works),
            user_id: work.user_id,
            username: work.username,
            title: work.title,
            kind: work.kind,
            content: work.content,
            genre: work.genre,
            description: work.description,
            is_public: work.is_public,
            created_at: Utc::now(),
        };
        inner.works.push(created.clone());
        Ok(created)
    }

    async fn creative_works(&self, scope: WorkScope) -> AppResult<Vec<CreativeWork>> {
        let inner = self.inner.read().await;
        Ok(inner
            .works
            .iter()
            .rev()
            .filter(|w| match scope {
                WorkScope::Author(user_id) => w.user_id == user_id,
                WorkScope::CommunityFor(user_id) => w.is_public && w.user_id != user_id,
            })
            .cloned()
            .collect())
    }

    async fn get_creative_work(&self, id: i64) -> AppResult<Option<CreativeWork>> {
        let inner = self.inner.read().await;
        Ok(inner.works.iter().find(|w| w.id == id).cloned())
    }

    async fn add_work_comment(&self, comment: NewWorkComment) -> AppResult<WorkComment> {
        let mut inner = self.inner.write().await;
        let created = WorkComment {
            id: next_id(&inner.work_comments),
            work_id: comment.work_id,
            user_id: comment.user_id,
            username: comment.username,
            comment_text: comment.comment_text,
            created_at: Utc::now(),
        };
        inner.work_comments.push(created.clone());
        Ok(created)
    }

    async fn work_comments(&self, work_id: i64) -> AppResult<Vec<WorkComment>> {
        let inner = self.inner.read().await;
        Ok(inner
            .work_comments
            .iter()
            .filter(|c| c.work_id == work_id)
            .cloned()
            .collect())
    }

    async fn save_reminder(&self, user_id: i64, reminder: Reminder) -> AppResult<StoredReminder> {
        let mut inner = self.inner.write().await;
        let stored = StoredReminder {
            user_id,
            reminder,
            updated_at: Utc::now(),
        };
        inner.reminders.insert(user_id, stored.clone());
        Ok(stored)
    }

    async fn get_reminder(&self, user_id: i64) -> AppResult<Option<StoredReminder>> {
        let inner = self.inner.read().await;
        Ok(inner.reminders.get(&user_id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::WorkKind;
    use chrono::{NaiveTime, Weekday};

    fn new_user(username: &str) -> NewUser {
        NewUser {
            username: username.to_string(),
            email: format!("{}@example.am", username),
            password_hash: "hash".to_string(),
            preferences: UserPreferences::new(),
        }
    }

    fn new_work(user_id: i64, title: &str, is_public: bool) -> NewCreativeWork {
        NewCreativeWork {
            user_id,
            username: format!("user{}", user_id),
            title: title.to_string(),
            kind: WorkKind::Poem,
            content: "...".to_string(),
            genre: "General".to_string(),
            description: None,
            is_public,
        }
    }

    #[tokio::test]
    async fn test_user_ids_are_sequential() {
        let store = MemoryStore::new();
        assert_eq!(store.create_user(new_user("ani")).await.unwrap().id, 1);
        assert_eq!(store.create_user(new_user("aram")).await.unwrap().id, 2);
        assert!(store.get_user(2).await.unwrap().is_some());
        assert!(store.get_user(3).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_preferences_of_unknown_user() {
        let store = MemoryStore::new();
        let result = store.update_preferences(9, &UserPreferences::new()).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_sessions_newest_first_per_user() {
        let store = MemoryStore::new();
        for (user_id, pages) in [(1, 10), (2, 99), (1, 20)] {
            store
                .add_reading_session(NewReadingSession {
                    user_id,
                    book_id: 5,
                    book_title: "Vardan".to_string(),
                    pages_read: pages,
                    minutes: 15,
                })
                .await
                .unwrap();
        }

        let pages: Vec<i32> = store
            .user_sessions(1)
            .await
            .unwrap()
            .iter()
            .map(|s| s.pages_read)
            .collect();
        assert_eq!(pages, vec![20, 10]);
    }

    #[tokio::test]
    async fn test_work_scopes() {
        let store = MemoryStore::new();
        store.add_creative_work(new_work(1, "mine public", true)).await.unwrap();
        store.add_creative_work(new_work(1, "mine private", false)).await.unwrap();
        store.add_creative_work(new_work(2, "theirs public", true)).await.unwrap();
        store.add_creative_work(new_work(2, "theirs private", false)).await.unwrap();

        let titles = |works: Vec<CreativeWork>| -> Vec<String> {
            works.into_iter().map(|w| w.title).collect()
        };

        assert_eq!(
            titles(store.creative_works(WorkScope::Author(1)).await.unwrap()),
            vec!["mine private", "mine public"]
        );
        assert_eq!(
            titles(store.creative_works(WorkScope::CommunityFor(1)).await.unwrap()),
            vec!["theirs public"]
        );
    }

    #[tokio::test]
    async fn test_work_comments_oldest_first() {
        let store = MemoryStore::new();
        for text in ["first", "second"] {
            store
                .add_work_comment(NewWorkComment {
                    work_id: 1,
                    user_id: 2,
                    username: "aram".to_string(),
                    comment_text: text.to_string(),
                })
                .await
                .unwrap();
        }
        let texts: Vec<String> = store
            .work_comments(1)
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.comment_text)
            .collect();
        assert_eq!(texts, vec!["first", "second"]);
    }

    #[tokio::test]
    async fn test_save_reminder_replaces_previous() {
        let store = MemoryStore::new();
        let reminder = |hour| Reminder {
            time: NaiveTime::from_hms_opt(hour, 0, 0).unwrap(),
            days: vec![Weekday::Mon],
            is_active: true,
        };

        store.save_reminder(1, reminder(8)).await.unwrap();
        store.save_reminder(1, reminder(21)).await.unwrap();

        let stored = store.get_reminder(1).await.unwrap().unwrap();
        assert_eq!(stored.reminder.time, NaiveTime::from_hms_opt(21, 0, 0).unwrap());
        assert!(store.get_reminder(2).await.unwrap().is_none());
    }
}
