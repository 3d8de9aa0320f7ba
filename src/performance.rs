//! Pre-match rolling averages of a player's serve/return statistics.
//!
//! Match statistics do not carry dates; the detail link joins each entry
//! back to the player's own match list, and only entries dated strictly
//! before the current match contribute.

use std::collections::HashMap;

use chrono::NaiveDate;
use tracing::warn;

use crate::FeatureError;
use crate::history::parse_match_date;
use crate::records::{CountStat, MatchEvent, MatchStats, RatioStat, SideStats};
use crate::stats::{count_average, pooled_ratio_average};

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PerformanceAverages {
    pub avg_first_serve_pct: f64,
    pub avg_first_serve_won_pct: f64,
    pub avg_second_serve_won_pct: f64,
    pub avg_return_points_won_pct: f64,
    pub avg_break_point_won_pct: f64,
    pub avg_double_fautes: f64,
    pub avg_aces: f64,
}

/// Looks up the date of the match identified by `link` in a player's own
/// match list.
pub fn match_date_for_link(link: &str, matches: &[MatchEvent]) -> Option<NaiveDate> {
    matches
        .iter()
        .find(|m| m.link == link)
        .and_then(|m| parse_match_date(&m.date))
}

/// Link → date index over one player's match list, built once per feature
/// assembly instead of rescanning the list for every statistics entry.
pub fn link_date_index(matches: &[MatchEvent]) -> HashMap<&str, NaiveDate> {
    let mut index = HashMap::with_capacity(matches.len());
    for event in matches {
        if let Some(date) = parse_match_date(&event.date) {
            index.entry(event.link.as_str()).or_insert(date);
        }
    }
    index
}

/// Collects the player's side of every statistics entry whose match date
/// resolves (through `link_dates`) to strictly before `cutoff`.
pub fn previous_statistics<'a>(
    player: &str,
    cutoff: NaiveDate,
    stats: &'a HashMap<String, MatchStats>,
    link_dates: &HashMap<&str, NaiveDate>,
) -> Vec<&'a SideStats> {
    let mut sides = Vec::new();
    for entry in stats.values() {
        let side = if entry.winner.player == player {
            &entry.winner
        } else if entry.loser.player == player {
            &entry.loser
        } else {
            continue;
        };
        if let Some(date) = link_dates.get(entry.link.as_str())
            && *date < cutoff
        {
            sides.push(side);
        }
    }
    sides
}

/// Seven rolling averages over the player's qualifying history. All-zero
/// when no prior statistics exist; an error when the current match's own
/// date cannot be resolved from the match list.
pub fn performance_averages(
    stats: &HashMap<String, MatchStats>,
    player: &str,
    current_match: &MatchEvent,
    matches: &[MatchEvent],
) -> Result<PerformanceAverages, FeatureError> {
    let link_dates = link_date_index(matches);
    let Some(cutoff) = link_dates.get(current_match.link.as_str()).copied() else {
        return Err(FeatureError::UnresolvedMatchDate {
            link: current_match.link.clone(),
        });
    };

    let previous = previous_statistics(player, cutoff, stats, &link_dates);
    if previous.is_empty() {
        warn!(player, cutoff = %cutoff, "no prior match statistics, defaulting averages to zero");
        return Ok(PerformanceAverages::default());
    }

    Ok(PerformanceAverages {
        avg_first_serve_pct: pooled_ratio_average(&previous, RatioStat::FirstServe),
        avg_first_serve_won_pct: pooled_ratio_average(&previous, RatioStat::FirstServeWon),
        avg_second_serve_won_pct: pooled_ratio_average(&previous, RatioStat::SecondServeWon),
        avg_return_points_won_pct: pooled_ratio_average(&previous, RatioStat::ReturnPointsWon),
        avg_break_point_won_pct: pooled_ratio_average(&previous, RatioStat::BreakPointsWon),
        avg_double_fautes: count_average(&previous, CountStat::DoubleFaults),
        avg_aces: count_average(&previous, CountStat::Aces),
    })
}
