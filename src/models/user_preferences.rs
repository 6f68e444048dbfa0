use serde::{Deserialize, Serialize};

/// Language assumed when a user does not pick one
pub const DEFAULT_LANGUAGE: &str = "Հայերեն";

/// Inclusive page-count range a reader is comfortable with
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct PageRange {
    pub min: i32,
    pub max: i32,
}

impl Default for PageRange {
    fn default() -> Self {
        Self { min: 100, max: 300 }
    }
}

impl PageRange {
    pub fn contains(&self, pages: i32) -> bool {
        self.min <= pages && pages <= self.max
    }
}

/// Reading preferences used for recommendations and plans
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserPreferences {
    /// Genres the user likes, matched exactly against catalog genres
    #[serde(default)]
    pub preferred_genres: Vec<String>,
    #[serde(default)]
    pub page_range: PageRange,
    #[serde(default = "default_language")]
    pub preferred_language: String,
    /// Pages per minute
    #[serde(default = "default_reading_speed")]
    pub reading_speed: i32,
    /// Minutes per day
    #[serde(default = "default_daily_reading_time")]
    pub daily_reading_time: i32,
}

fn default_language() -> String {
    DEFAULT_LANGUAGE.to_string()
}

fn default_reading_speed() -> i32 {
    2
}

fn default_daily_reading_time() -> i32 {
    30
}

impl Default for UserPreferences {
    fn default() -> Self {
        Self::new()
    }
}

impl UserPreferences {
    /// Creates preferences with the stock defaults
    pub fn new() -> Self {
        Self {
            preferred_genres: Vec::new(),
            page_range: PageRange::default(),
            preferred_language: default_language(),
            reading_speed: default_reading_speed(),
            daily_reading_time: default_daily_reading_time(),
        }
    }

    /// Adds a preferred genre, ignoring duplicates
    pub fn add_genre(&mut self, genre: impl Into<String>) {
        let genre = genre.into();
        if !self.preferred_genres.contains(&genre) {
            self.preferred_genres.push(genre);
        }
    }

    pub fn likes_genre(&self, genre: &str) -> bool {
        self.preferred_genres.iter().any(|g| g == genre)
    }

    /// Minutes the user is willing to read in a week
    pub fn weekly_budget_minutes(&self) -> i32 {
        self.daily_reading_time * 7
    }
}
