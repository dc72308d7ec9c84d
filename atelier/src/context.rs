//! Current-date market context for the KSA market.
//!
//! Computed locally, never by the model: the Riyadh wall clock, the season,
//! this month's cultural calendar entries, and the weekday. Steps that care
//! about timing get this block serialized into their payload.

use chrono::{DateTime, Datelike, Duration, Utc};
use serde::Serialize;

/// Riyadh is UTC+3 year round, no DST; shifting the instant by the offset
/// gives local wall-clock fields through the plain UTC accessors.
const RIYADH_UTC_OFFSET_HOURS: i64 = 3;

/// Month-keyed cultural calendar (index 0 = January).
const CULTURAL_EVENTS: [&[&str]; 12] = [
    &["New Year period", "Winter shopping season"],
    &["Valentine's season", "Winter activities"],
    &["Spring season begins", "Outdoor activities increase"],
    &["Spring weather", "Ramadan season (varies yearly)"],
    &["End of school year approaching", "Eid preparations (varies)"],
    &["Summer vacation begins", "Travel season"],
    &["Peak summer", "Indoor activities focus"],
    &["Back-to-school preparations", "Summer sales"],
    &["School year begins", "Autumn preparations"],
    &["Mild weather returns", "Outdoor events resume"],
    &["Pleasant weather", "National Day season (Sept 23rd nearby)"],
    &["Winter season", "Year-end shopping", "Holiday preparations"],
];

/// Snapshot of the Riyadh calendar injected into timing-sensitive steps.
#[derive(Debug, Clone, Serialize)]
pub struct MarketContext {
    /// ISO date, e.g. `2026-08-22`.
    pub current_date: String,
    /// Month name, e.g. `August`.
    pub current_month: String,
    pub current_year: i32,
    /// `Winter`, `Spring`, `Summer`, or `Autumn`.
    pub season: String,
    /// This month's entries from the cultural calendar.
    pub cultural_events: Vec<String>,
    /// Weekday name, e.g. `Friday`.
    pub weekday: String,
    /// KSA weekend is Friday and Saturday.
    pub is_weekend: bool,
    /// One-line summary, e.g. `Current date: August 22, 2026 (Summer season in KSA)`.
    pub context_note: String,
}

impl MarketContext {
    /// Context for the current instant.
    pub fn now() -> Self {
        Self::at(Utc::now())
    }

    /// Context for a given instant. Tests pin the clock here.
    pub fn at(instant: DateTime<Utc>) -> Self {
        let riyadh = instant + Duration::hours(RIYADH_UTC_OFFSET_HOURS);

        let month = riyadh.month();
        let current_month = riyadh.format("%B").to_string();
        let season = season_for_month(month).to_string();
        let weekday = riyadh.format("%A").to_string();
        let is_weekend = matches!(weekday.as_str(), "Friday" | "Saturday");

        let cultural_events = CULTURAL_EVENTS[(month - 1) as usize]
            .iter()
            .map(|s| s.to_string())
            .collect();

        let context_note = format!(
            "Current date: {} {}, {} ({} season in KSA)",
            current_month,
            riyadh.day(),
            riyadh.year(),
            season
        );

        Self {
            current_date: riyadh.format("%Y-%m-%d").to_string(),
            current_month,
            current_year: riyadh.year(),
            season,
            cultural_events,
            weekday,
            is_weekend,
            context_note,
        }
    }
}

fn season_for_month(month: u32) -> &'static str {
    match month {
        12 | 1 | 2 => "Winter",
        3..=5 => "Spring",
        6..=8 => "Summer",
        _ => "Autumn",
    }
}
