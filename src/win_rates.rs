//! Win-rate aggregation over a (pre-filtered) match list: overall, 3-set
//! and tiebreak rates plus a per-surface breakdown.

use crate::records::{MatchEvent, Outcome};

/// Set token a player's perspective shows for a tiebreak set it won.
const TIEBREAK_WON: &str = "7-6";
/// Set token for a tiebreak set it lost.
const TIEBREAK_LOST: &str = "6-7";

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct WinRates {
    pub win_rate: f64,
    pub win_rate_3_sets: f64,
    pub win_rate_tiebreak: f64,
}

fn set_tokens(score: &str) -> impl Iterator<Item = &str> {
    score.split(", ")
}

fn is_three_setter(score: &str) -> bool {
    set_tokens(score).count() >= 3
}

fn contains_set(score: &str, needle: &str) -> bool {
    set_tokens(score).any(|set| set.contains(needle))
}

/// A match counts as a tiebreak match when any set went to a tiebreak,
/// on either side of the score.
fn is_tiebreak_match(score: &str) -> bool {
    contains_set(score, TIEBREAK_WON) || contains_set(score, TIEBREAK_LOST)
}

/// Computes the three win rates. All rates are 0 for an empty list; the
/// 3-set and tiebreak denominators are floored at 1.
pub fn win_rates(matches: &[&MatchEvent]) -> WinRates {
    if matches.is_empty() {
        return WinRates::default();
    }

    let total = matches.len();
    let wins = matches.iter().filter(|m| m.is_win()).count();

    let three_set_total = matches.iter().filter(|m| is_three_setter(&m.score)).count();
    let three_set_wins = matches
        .iter()
        .filter(|m| is_three_setter(&m.score) && m.is_win())
        .count();

    let tiebreak_total = matches
        .iter()
        .filter(|m| is_tiebreak_match(&m.score))
        .count();
    let tiebreak_hits = matches
        .iter()
        .filter(|m| match m.outcome {
            Outcome::Win => contains_set(&m.score, TIEBREAK_WON),
            Outcome::Loss => contains_set(&m.score, TIEBREAK_LOST),
        })
        .count();

    WinRates {
        win_rate: wins as f64 / total as f64,
        win_rate_3_sets: three_set_wins as f64 / three_set_total.max(1) as f64,
        win_rate_tiebreak: tiebreak_hits as f64 / tiebreak_total.max(1) as f64,
    }
}

/// Court surfaces, in the fixed vocabulary the source site uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Surface {
    Hard,
    Clay,
    Grass,
    Indoor,
    Carpet,
    Acrylic,
}

impl Surface {
    pub const ALL: [Surface; 6] = [
        Surface::Hard,
        Surface::Clay,
        Surface::Grass,
        Surface::Indoor,
        Surface::Carpet,
        Surface::Acrylic,
    ];

    /// Label used by the scrape (`type_terrain`).
    pub fn label(self) -> &'static str {
        match self {
            Surface::Hard => "dure",
            Surface::Clay => "terre battue",
            Surface::Grass => "gazon",
            Surface::Indoor => "salle",
            Surface::Carpet => "carpet",
            Surface::Acrylic => "acryl",
        }
    }

    /// Suffix used in emitted column names.
    pub fn column_suffix(self) -> &'static str {
        match self {
            Surface::Hard => "dure",
            Surface::Clay => "terre_battue",
            Surface::Grass => "gazon",
            Surface::Indoor => "salle",
            Surface::Carpet => "carpet",
            Surface::Acrylic => "acryl",
        }
    }

    pub fn from_label(label: &str) -> Option<Surface> {
        Surface::ALL.into_iter().find(|s| s.label() == label)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SurfaceStats {
    pub total: u32,
    pub win_rate: f64,
}

/// Totals and win rates for every surface in the fixed vocabulary.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SurfaceBreakdown {
    stats: [SurfaceStats; 6],
}

impl SurfaceBreakdown {
    pub fn get(&self, surface: Surface) -> SurfaceStats {
        self.stats[surface as usize]
    }
}

/// Per-surface match counts and win fractions. Matches whose surface lies
/// outside the fixed vocabulary fall into no bucket.
pub fn surface_stats(matches: &[&MatchEvent]) -> SurfaceBreakdown {
    let mut breakdown = SurfaceBreakdown::default();
    for surface in Surface::ALL {
        let label = surface.label();
        let total = matches.iter().filter(|m| m.surface == label).count();
        let wins = matches
            .iter()
            .filter(|m| m.surface == label && m.is_win())
            .count();
        breakdown.stats[surface as usize] = SurfaceStats {
            total: total as u32,
            win_rate: if total == 0 {
                0.0
            } else {
                wins as f64 / total as f64
            },
        };
    }
    breakdown
}
