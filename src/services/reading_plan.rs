use serde::Serialize;

use crate::models::UserPreferences;

pub const MAX_TARGET_DAYS: i32 = 365;

/// Daily pace needed to finish `pages` in `target_days`.
///
/// Returns `(daily_pages, daily_minutes)` using integer division, or `(0, 0)`
/// when any input is not positive.
pub fn calculate_reading_plan(pages: i32, reading_speed: i32, target_days: i32) -> (i32, i32) {
    if pages <= 0 || reading_speed <= 0 || target_days <= 0 {
        return (0, 0);
    }
    let daily_pages = pages / target_days;
    let daily_minutes = daily_pages / reading_speed;
    (daily_pages, daily_minutes)
}

/// Daily and weekly pace for one book
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct ReadingPlan {
    pub target_days: i32,
    pub daily_pages: i32,
    pub daily_minutes: i32,
    pub weekly_pages: i32,
    pub weekly_minutes: i32,
    /// Minutes needed for the whole book
    pub total_minutes: i32,
    /// The daily minutes stay within the user's daily reading time
    pub fits_daily_budget: bool,
}

/// Build a plan for a book of `pages` pages
pub fn plan_for(pages: i32, prefs: &UserPreferences, target_days: i32) -> ReadingPlan {
    let (daily_pages, daily_minutes) =
        calculate_reading_plan(pages, prefs.reading_speed, target_days);
    let total_minutes = if prefs.reading_speed > 0 && pages > 0 {
        pages / prefs.reading_speed
    } else {
        0
    };

    ReadingPlan {
        target_days,
        daily_pages,
        daily_minutes,
        // Page counts come from an unchecked catalog
        weekly_pages: daily_pages.saturating_mul(7),
        weekly_minutes: daily_minutes.saturating_mul(7),
        total_minutes,
        fits_daily_budget: daily_minutes <= prefs.daily_reading_time,
    }
}

/// Days a user would naturally need for a book, clamped to 1..=30
pub fn suggested_target_days(pages: i32, prefs: &UserPreferences) -> i32 {
    let per_day = prefs.reading_speed * prefs.daily_reading_time;
    if per_day <= 0 {
        return 30;
    }
    (pages / per_day).clamp(1, 30)
}
