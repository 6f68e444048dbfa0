use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt::Display, str::FromStr};

/// Genre stored when the author leaves it blank
pub const DEFAULT_WORK_GENRE: &str = "General";

/// Literary form of a creative work
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum WorkKind {
    Poem,
    Story,
    Novel,
    Essay,
    Article,
    Verse,
    Other,
}

impl WorkKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkKind::Poem => "poem",
            WorkKind::Story => "story",
            WorkKind::Novel => "novel",
            WorkKind::Essay => "essay",
            WorkKind::Article => "article",
            WorkKind::Verse => "verse",
            WorkKind::Other => "other",
        }
    }
}

impl Display for WorkKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for WorkKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "poem" => Ok(WorkKind::Poem),
            "story" => Ok(WorkKind::Story),
            "novel" => Ok(WorkKind::Novel),
            "essay" => Ok(WorkKind::Essay),
            "article" => Ok(WorkKind::Article),
            "verse" => Ok(WorkKind::Verse),
            "other" => Ok(WorkKind::Other),
            other => Err(format!("unknown work kind: {}", other)),
        }
    }
}

/// User-authored text published on the platform
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CreativeWork {
    pub id: i64,
    pub user_id: i64,
    pub username: String,
    pub title: String,
    pub kind: WorkKind,
    pub content: String,
    pub genre: String,
    pub description: Option<String>,
    pub is_public: bool,
    pub created_at: DateTime<Utc>,
}

impl CreativeWork {
    /// Private works are only visible to their author
    pub fn visible_to(&self, user_id: i64) -> bool {
        self.is_public || self.user_id == user_id
    }
}

#[derive(Debug, Clone)]
pub struct NewCreativeWork {
    pub user_id: i64,
    pub username: String,
    pub title: String,
    pub kind: WorkKind,
    pub content: String,
    pub genre: String,
    pub description: Option<String>,
    pub is_public: bool,
}

/// Which works a listing returns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkScope {
    /// Every work by this author, public or not
    Author(i64),
    /// Public works by anyone except this user
    CommunityFor(i64),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_work_kind_round_trips_through_str() {
        for kind in [
            WorkKind::Poem,
            WorkKind::Story,
            WorkKind::Novel,
            WorkKind::Essay,
            WorkKind::Article,
            WorkKind::Verse,
            WorkKind::Other,
        ] {
            assert_eq!(kind.as_str().parse::<WorkKind>(), Ok(kind));
        }
        assert!("sonnet".parse::<WorkKind>().is_err());
    }

    #[test]
    fn test_work_kind_serialization() {
        assert_eq!(serde_json::to_string(&WorkKind::Essay).unwrap(), "\"essay\"");
    }

    #[test]
    fn test_private_work_visible_only_to_author() {
        let work = CreativeWork {
            id: 1,
            user_id: 10,
            username: "ani".to_string(),
            title: "Autumn".to_string(),
            kind: WorkKind::Poem,
            content: "Leaves".to_string(),
            genre: DEFAULT_WORK_GENRE.to_string(),
            description: None,
            is_public: false,
            created_at: Utc::now(),
        };
        assert!(work.visible_to(10));
        assert!(!work.visible_to(11));
    }
}
