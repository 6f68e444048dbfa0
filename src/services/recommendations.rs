use serde::Serialize;

use crate::models::{Book, UserPreferences};
use crate::services::reading_plan::{self, ReadingPlan};

/// Number of books returned by [`recommend`]
pub const TOP_N: usize = 5;

/// Days used for the plan attached to each recommendation
pub const DEFAULT_PLAN_DAYS: i32 = 30;

pub const GENRE_WEIGHT: u32 = 40;
pub const PAGE_RANGE_WEIGHT: u32 = 20;
pub const LANGUAGE_WEIGHT: u32 = 15;
pub const FEASIBILITY_WEIGHT: u32 = 25;

/// Which heuristics a book satisfied
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Default)]
pub struct ScoreBreakdown {
    pub genre_match: bool,
    pub page_range_match: bool,
    pub language_match: bool,
    /// The whole book fits into one week of the user's daily reading time
    pub fits_in_a_week: bool,
}

impl ScoreBreakdown {
    pub fn for_book(book: &Book, prefs: &UserPreferences) -> Self {
        Self {
            genre_match: prefs.likes_genre(&book.genre),
            page_range_match: prefs.page_range.contains(book.pages),
            language_match: book.language == prefs.preferred_language,
            fits_in_a_week: fits_in_a_week(book.pages, prefs),
        }
    }

    pub fn score(&self) -> u32 {
        let mut score = 0;
        if self.genre_match {
            score += GENRE_WEIGHT;
        }
        if self.page_range_match {
            score += PAGE_RANGE_WEIGHT;
        }
        if self.language_match {
            score += LANGUAGE_WEIGHT;
        }
        if self.fits_in_a_week {
            score += FEASIBILITY_WEIGHT;
        }
        score
    }
}

fn fits_in_a_week(pages: i32, prefs: &UserPreferences) -> bool {
    if prefs.reading_speed <= 0 {
        return false;
    }
    let estimated_minutes = f64::from(pages) / f64::from(prefs.reading_speed);
    estimated_minutes <= f64::from(prefs.weekly_budget_minutes())
}

/// Score a single book against a user's preferences (0..=100)
pub fn score_book(book: &Book, prefs: &UserPreferences) -> u32 {
    ScoreBreakdown::for_book(book, prefs).score()
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ScoredBook<'a> {
    pub book: &'a Book,
    pub score: u32,
    pub breakdown: ScoreBreakdown,
}

/// Rank the catalog for a user and keep the best `limit` books.
///
/// Higher scores come first. Books with equal scores keep their catalog order.
pub fn recommend<'a>(
    books: &'a [Book],
    prefs: &UserPreferences,
    limit: usize,
) -> Vec<ScoredBook<'a>> {
    let mut scored: Vec<ScoredBook<'a>> = books
        .iter()
        .map(|book| {
            let breakdown = ScoreBreakdown::for_book(book, prefs);
            ScoredBook {
                book,
                score: breakdown.score(),
                breakdown,
            }
        })
        .collect();

    // sort_by is stable
    scored.sort_by(|a, b| b.score.cmp(&a.score));
    scored.truncate(limit);
    scored
}

/// A recommendation as returned to the client
#[derive(Debug, Clone, Serialize)]
pub struct Recommendation {
    pub book: Book,
    pub score: u32,
    pub breakdown: ScoreBreakdown,
    pub time_hint: TimeHint,
    pub plan: ReadingPlan,
}

/// Generates the top recommendations for a user, each with a reading-time
/// hint and a plan for finishing the book in [`DEFAULT_PLAN_DAYS`] days.
pub fn get_recommendations(books: &[Book], prefs: &UserPreferences) -> Vec<Recommendation> {
    recommend(books, prefs, TOP_N)
        .into_iter()
        .map(|scored| Recommendation {
            book: scored.book.clone(),
            score: scored.score,
            breakdown: scored.breakdown,
            time_hint: time_hint(&scored.book.genre),
            plan: reading_plan::plan_for(scored.book.pages, prefs, DEFAULT_PLAN_DAYS),
        })
        .collect()
}

/// Part of the day a genre suits best
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ReadingSlot {
    Commute,
    Morning,
    Daytime,
    Evening,
    AnyTime,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct TimeHint {
    pub slot: ReadingSlot,
    pub reason: &'static str,
}

/// Suggest when to read a book of the given catalog genre
pub fn time_hint(genre: &str) -> TimeHint {
    let (slot, reason) = match genre.trim() {
        "Բանաստեղծություններ" => (
            ReadingSlot::Commute,
            "Poems are short and easy to read while travelling",
        ),
        "Դրամա" => (
            ReadingSlot::Evening,
            "Dramas are emotionally rich and suit a quiet evening",
        ),
        "Մոտիվացիոն" => (
            ReadingSlot::Morning,
            "Motivational books help start the day in a positive mood",
        ),
        "Գիտական" => (
            ReadingSlot::Morning,
            "Science books need focus, which comes easier on a fresh morning",
        ),
        "Սիրավեպ" => (
            ReadingSlot::Evening,
            "Romance novels suit winding down in the evening",
        ),
        "Գիտաֆանտաստիկա" => (
            ReadingSlot::Evening,
            "Science fiction is best when you can fully immerse yourself in the evening",
        ),
        "Դետեկտիվ" => (
            ReadingSlot::Evening,
            "Detective stories reward evening concentration on the mystery",
        ),
        "Պատմական" => (
            ReadingSlot::Daytime,
            "Historical books suit the daytime, when the mind is most active",
        ),
        _ => (ReadingSlot::AnyTime, "This book suits any time of day"),
    };
    TimeHint { slot, reason }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{fixtures::book, PageRange};

    const PREFERRED_GENRE: &str = "Դրամա";
    const PREFERRED_LANGUAGE: &str = "Հայերեն";

    /// Preferences that flip each heuristic independently for a 200-page
    /// Armenian drama.
    fn prefs_for(genre: bool, range: bool, language: bool, feasible: bool) -> UserPreferences {
        UserPreferences {
            preferred_genres: vec![if genre { PREFERRED_GENRE } else { "Դետեկտիվ" }.to_string()],
            page_range: if range {
                PageRange { min: 100, max: 300 }
            } else {
                PageRange { min: 500, max: 600 }
            },
            preferred_language: if language { PREFERRED_LANGUAGE } else { "Անգլերեն" }.to_string(),
            reading_speed: 2,
            // 200 pages at 2 pages/min is 100 minutes; budget is 7x daily
            daily_reading_time: if feasible { 30 } else { 10 },
        }
    }

    #[test]
    fn test_score_all_sixteen_combinations() {
        let candidate = book(1, "Anush", PREFERRED_GENRE, 200, PREFERRED_LANGUAGE);

        for mask in 0u8..16 {
            let genre = mask & 0b0001 != 0;
            let range = mask & 0b0010 != 0;
            let language = mask & 0b0100 != 0;
            let feasible = mask & 0b1000 != 0;

            let expected = 40 * genre as u32
                + 20 * range as u32
                + 15 * language as u32
                + 25 * feasible as u32;

            let prefs = prefs_for(genre, range, language, feasible);
            assert_eq!(
                score_book(&candidate, &prefs),
                expected,
                "genre={} range={} language={} feasible={}",
                genre,
                range,
                language,
                feasible
            );
        }
    }

    #[test]
    fn test_feasibility_boundary_is_inclusive() {
        let prefs = UserPreferences::new(); // 2 pages/min, 30 min/day -> 420 pages/week
        let exact = book(1, "Exact", "Other", 420, "English");
        let over = book(2, "Over", "Other", 421, "English");
        assert!(ScoreBreakdown::for_book(&exact, &prefs).fits_in_a_week);
        assert!(!ScoreBreakdown::for_book(&over, &prefs).fits_in_a_week);
    }

    #[test]
    fn test_feasibility_uses_real_division() {
        let prefs = UserPreferences {
            reading_speed: 2,
            daily_reading_time: 1,
            ..UserPreferences::new()
        };
        // 15 / 2 = 7.5 minutes, over the 7-minute budget
        assert!(!ScoreBreakdown::for_book(&book(1, "Tiny", "Other", 15, "English"), &prefs)
            .fits_in_a_week);
        assert!(ScoreBreakdown::for_book(&book(2, "Tiny", "Other", 14, "English"), &prefs)
            .fits_in_a_week);
    }

    #[test]
    fn test_zero_reading_speed_is_never_feasible() {
        let prefs = UserPreferences {
            reading_speed: 0,
            ..UserPreferences::new()
        };
        assert!(!ScoreBreakdown::for_book(&book(1, "Any", "Other", 10, "English"), &prefs)
            .fits_in_a_week);
    }

    #[test]
    fn test_recommend_orders_by_score_and_limits_to_top_n() {
        let mut prefs = UserPreferences::new();
        prefs.add_genre(PREFERRED_GENRE);

        let books = vec![
            book(1, "Off genre, too long", "Դետեկտիվ", 900, "English"),
            book(2, "Perfect", PREFERRED_GENRE, 200, PREFERRED_LANGUAGE),
            book(3, "Wrong language", PREFERRED_GENRE, 200, "English"),
            book(4, "Short", "Պատմական", 50, PREFERRED_LANGUAGE),
            book(5, "Long drama", PREFERRED_GENRE, 1000, PREFERRED_LANGUAGE),
            book(6, "Plain", "Պատմական", 150, "English"),
            book(7, "Nothing", "Պատմական", 2000, "English"),
        ];

        let ranked = recommend(&books, &prefs, TOP_N);
        let ids: Vec<i64> = ranked.iter().map(|s| s.book.id).collect();
        let scores: Vec<u32> = ranked.iter().map(|s| s.score).collect();

        assert_eq!(ids, vec![2, 3, 5, 6, 4]);
        assert_eq!(scores, vec![100, 85, 55, 45, 40]);
    }

    #[test]
    fn test_ties_keep_catalog_order() {
        let prefs = UserPreferences::new();
        let books: Vec<Book> = (1..=7)
            .map(|id| book(id, "Same", "Other", 150, PREFERRED_LANGUAGE))
            .collect();

        let ids: Vec<i64> = recommend(&books, &prefs, TOP_N)
            .iter()
            .map(|s| s.book.id)
            .collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_recommend_on_empty_catalog() {
        assert!(recommend(&[], &UserPreferences::new(), TOP_N).is_empty());
    }

    #[test]
    fn test_get_recommendations_attaches_hint_and_plan() {
        let books = vec![book(1, "Anush", PREFERRED_GENRE, 300, PREFERRED_LANGUAGE)];
        let recs = get_recommendations(&books, &UserPreferences::new());

        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].time_hint.slot, ReadingSlot::Evening);
        assert_eq!(recs[0].plan.daily_pages, 10);
        assert_eq!(recs[0].plan.daily_minutes, 5);
    }

    #[test]
    fn test_time_hint_falls_back_to_any_time() {
        assert_eq!(time_hint("Պատմական").slot, ReadingSlot::Daytime);
        assert_eq!(time_hint("Բանաստեղծություններ").slot, ReadingSlot::Commute);
        assert_eq!(time_hint("Unknown").slot, ReadingSlot::AnyTime);
    }
}
