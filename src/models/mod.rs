mod book;
mod comment;
mod creative_work;
mod reading_session;
mod reminder;
mod user;
mod user_preferences;

pub use book::{Book, BookFilter};
pub use comment::{average_rating, BookComment, NewBookComment, NewWorkComment, WorkComment};
pub use creative_work::{CreativeWork, NewCreativeWork, WorkKind, WorkScope, DEFAULT_WORK_GENRE};
pub use reading_session::{NewReadingSession, ReadingSession, ReadingStats};
pub use reminder::{parse_weekdays, weekday_names, Reminder, StoredReminder, DUE_WINDOW_MINUTES};
pub use user::{NewUser, User, UserCredentials};
pub use user_preferences::{PageRange, UserPreferences, DEFAULT_LANGUAGE};

#[cfg(test)]
pub(crate) use book::fixtures;
