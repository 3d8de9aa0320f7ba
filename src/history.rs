//! Temporal leakage guard: only matches strictly before a cutoff date may
//! contribute to a player's pre-match features.

use chrono::NaiveDate;
use tracing::warn;

use crate::records::MatchEvent;

/// Wire format of every scraped date: day.month.two-digit-year.
pub const DATE_FORMAT: &str = "%d.%m.%y";

pub fn parse_match_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT).ok()
}

/// Returns the matches dated strictly before `cutoff`, preserving input
/// order. A match whose date does not parse is dropped and logged rather
/// than failing the whole filter.
pub fn matches_before<'a>(matches: &'a [MatchEvent], cutoff: NaiveDate) -> Vec<&'a MatchEvent> {
    let mut kept = Vec::new();
    for event in matches {
        match parse_match_date(&event.date) {
            Some(date) if date < cutoff => kept.push(event),
            Some(_) => {}
            None => {
                warn!(date = %event.date, link = %event.link, "dropping match with unparseable date");
            }
        }
    }
    kept
}
