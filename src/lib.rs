//! Builds a supervised training table for ATP match-outcome prediction.
//!
//! Inputs are the three JSON collections produced by the scraping side:
//! the ranking roster, per-player detail records with match histories, and
//! per-match serve/return statistics. The pipeline derives symmetric,
//! leakage-free player-pair features and emits a flat table with a binary
//! `target` column for the model-selection step.

use thiserror::Error;

pub mod dataset;
pub mod export;
pub mod features;
pub mod history;
pub mod performance;
pub mod records;
pub mod stats;
pub mod tournament;
pub mod win_rates;

/// Row-scoped failures raised while assembling one player's features.
///
/// Field-level problems (an unparseable single statistic) never surface
/// here; they are absorbed as missing values inside `stats`. The assembler
/// catches these errors, logs them and skips the affected match.
#[derive(Debug, Error)]
pub enum FeatureError {
    #[error("unparseable match date `{date}`")]
    MalformedMatchDate { date: String },
    #[error("no match date found for link {link}")]
    UnresolvedMatchDate { link: String },
    #[error("invalid {field} value `{value}` for player {player}")]
    MalformedField {
        player: String,
        field: &'static str,
        value: String,
    },
}
