use crate::models::{ReadingSession, ReadingStats};

/// Sessions included in the "recent" part of the statistics
pub const RECENT_SESSIONS: usize = 5;

/// Summarise a user's reading history. `sessions` must be newest first.
pub fn reading_stats(sessions: &[ReadingSession]) -> ReadingStats {
    let total_pages: i64 = sessions.iter().map(|s| i64::from(s.pages_read)).sum();
    let total_minutes: i64 = sessions.iter().map(|s| i64::from(s.minutes)).sum();

    let pages_per_hour = if total_minutes > 0 {
        total_pages as f64 / (total_minutes as f64 / 60.0)
    } else {
        0.0
    };

    ReadingStats {
        total_sessions: sessions.len(),
        total_pages,
        total_minutes,
        hours: total_minutes / 60,
        minutes: total_minutes % 60,
        pages_per_hour,
        recent: sessions.iter().take(RECENT_SESSIONS).cloned().collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn session(id: i64, pages_read: i32, minutes: i32) -> ReadingSession {
        ReadingSession {
            id,
            user_id: 1,
            book_id: 3,
            book_title: "Samvel".to_string(),
            pages_read,
            minutes,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_empty_history() {
        let stats = reading_stats(&[]);
        assert_eq!(stats.total_sessions, 0);
        assert_eq!(stats.total_pages, 0);
        assert_eq!(stats.pages_per_hour, 0.0);
        assert!(stats.recent.is_empty());
    }

    #[test]
    fn test_totals_and_speed() {
        let sessions = vec![session(2, 30, 45), session(1, 60, 45)];
        let stats = reading_stats(&sessions);
        assert_eq!(stats.total_sessions, 2);
        assert_eq!(stats.total_pages, 90);
        assert_eq!(stats.total_minutes, 90);
        assert_eq!((stats.hours, stats.minutes), (1, 30));
        assert_eq!(stats.pages_per_hour, 60.0);
    }

    #[test]
    fn test_recent_keeps_newest_five() {
        let sessions: Vec<ReadingSession> = (1..=8).rev().map(|id| session(id, 10, 10)).collect();
        let ids: Vec<i64> = reading_stats(&sessions).recent.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![8, 7, 6, 5, 4]);
    }
}
