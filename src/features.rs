//! Per-player feature assembly and the combined player-pair training row.

use std::collections::HashMap;

use crate::FeatureError;
use crate::history::{matches_before, parse_match_date};
use crate::performance::{self, PerformanceAverages};
use crate::records::{MatchEvent, MatchStats, Outcome, RosterEntry};
use crate::tournament;
use crate::win_rates::{self, Surface, SurfaceBreakdown, WinRates};

/// Names of the numeric features emitted per player slot, in column order.
pub const PLAYER_FEATURE_NAMES: [&str; 25] = [
    "age",
    "ranking",
    "points",
    "win_rate",
    "win_rate_3_sets",
    "win_rate_tiebreak",
    "total_matches_dure",
    "win_rate_dure",
    "total_matches_terre_battue",
    "win_rate_terre_battue",
    "total_matches_gazon",
    "win_rate_gazon",
    "total_matches_salle",
    "win_rate_salle",
    "total_matches_carpet",
    "win_rate_carpet",
    "total_matches_acryl",
    "win_rate_acryl",
    "avg_first_serve_pct",
    "avg_first_serve_won_pct",
    "avg_second_serve_won_pct",
    "avg_return_points_won_pct",
    "avg_break_point_won_pct",
    "avg_double_fautes",
    "avg_aces",
];

/// All features of one player as of one match. Computed fresh per
/// (player, match) pair; never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerFeatures {
    pub name: String,
    pub age: u32,
    pub ranking: u32,
    pub points: u32,
    pub rates: WinRates,
    pub surfaces: SurfaceBreakdown,
    pub performance: PerformanceAverages,
}

impl PlayerFeatures {
    /// Numeric feature values, aligned with [`PLAYER_FEATURE_NAMES`].
    pub fn feature_values(&self) -> [f64; 25] {
        let mut values = [0.0; 25];
        values[0] = f64::from(self.age);
        values[1] = f64::from(self.ranking);
        values[2] = f64::from(self.points);
        values[3] = self.rates.win_rate;
        values[4] = self.rates.win_rate_3_sets;
        values[5] = self.rates.win_rate_tiebreak;
        let mut idx = 6;
        for surface in Surface::ALL {
            let stats = self.surfaces.get(surface);
            values[idx] = f64::from(stats.total);
            values[idx + 1] = stats.win_rate;
            idx += 2;
        }
        let perf = &self.performance;
        values[18] = perf.avg_first_serve_pct;
        values[19] = perf.avg_first_serve_won_pct;
        values[20] = perf.avg_second_serve_won_pct;
        values[21] = perf.avg_return_points_won_pct;
        values[22] = perf.avg_break_point_won_pct;
        values[23] = perf.avg_double_fautes;
        values[24] = perf.avg_aces;
        values
    }

    pub fn is_complete(&self) -> bool {
        self.feature_values().iter().all(|v| v.is_finite())
    }
}

/// One training example: both players' features plus match context. The
/// player in slot 1 is the perspective `target` is scored from.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingRow {
    pub player1: PlayerFeatures,
    pub player2: PlayerFeatures,
    pub surface: String,
    pub tournament_category: u8,
    pub url: String,
    pub date: String,
    pub target: u8,
}

impl TrainingRow {
    /// The same physical match seen from the other player's slot: feature
    /// blocks swapped, target flipped. Mirroring twice is the identity.
    pub fn mirrored(&self) -> TrainingRow {
        TrainingRow {
            player1: self.player2.clone(),
            player2: self.player1.clone(),
            surface: self.surface.clone(),
            tournament_category: self.tournament_category,
            url: self.url.clone(),
            date: self.date.clone(),
            target: 1 - self.target,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.player1.is_complete() && self.player2.is_complete()
    }
}

fn parse_age(raw: &str) -> Option<u32> {
    raw.split_whitespace().next()?.parse().ok()
}

fn parse_ranking(raw: &str) -> Option<u32> {
    raw.replace('.', "").trim().parse().ok()
}

fn parse_points(raw: &str) -> Option<u32> {
    raw.trim().parse().ok()
}

fn malformed(entry: &RosterEntry, field: &'static str, value: &str) -> FeatureError {
    FeatureError::MalformedField {
        player: entry.name.clone(),
        field,
        value: value.to_string(),
    }
}

/// Assembles one player's features as of `current_match`: base roster
/// attributes, win rates and surface breakdown over the matches strictly
/// before the match date, and rolling performance averages.
pub fn build_player_features(
    entry: &RosterEntry,
    matches: &[MatchEvent],
    stats: &HashMap<String, MatchStats>,
    current_match: &MatchEvent,
) -> Result<PlayerFeatures, FeatureError> {
    let age = parse_age(&entry.age).ok_or_else(|| malformed(entry, "age", &entry.age))?;
    let ranking =
        parse_ranking(&entry.rank).ok_or_else(|| malformed(entry, "rank", &entry.rank))?;
    let points =
        parse_points(&entry.points).ok_or_else(|| malformed(entry, "points", &entry.points))?;

    let cutoff =
        parse_match_date(&current_match.date).ok_or_else(|| FeatureError::MalformedMatchDate {
            date: current_match.date.clone(),
        })?;
    let recent = matches_before(matches, cutoff);

    let rates = win_rates::win_rates(&recent);
    let surfaces = win_rates::surface_stats(&recent);
    let performance =
        performance::performance_averages(stats, &entry.name, current_match, matches)?;

    Ok(PlayerFeatures {
        name: entry.name.clone(),
        age,
        ranking,
        points,
        rates,
        surfaces,
        performance,
    })
}

/// Combines two players' features with the match context. The caller
/// decides slot order; the assembler always puts the iterated subject
/// player first, so `target` is 1 exactly when that player won.
pub fn build_training_row(
    player1: PlayerFeatures,
    player2: PlayerFeatures,
    context: &MatchEvent,
) -> TrainingRow {
    TrainingRow {
        target: match context.outcome {
            Outcome::Win => 1,
            Outcome::Loss => 0,
        },
        surface: context.surface.clone(),
        tournament_category: tournament::category(&context.tournament),
        url: context.link.clone(),
        date: context.date.clone(),
        player1,
        player2,
    }
}
