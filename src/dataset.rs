//! Table-level assembly: loading the three input collections, generating
//! one row per match instance, deduplicating by match URL and applying a
//! symmetrization policy.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use rand::Rng;
use rand::rngs::StdRng;
use rand::{SeedableRng, seq::index};
use rayon::prelude::*;
use serde::de::DeserializeOwned;
use tracing::{info, warn};

use crate::features::{self, TrainingRow};
use crate::records::{MatchStats, PlayerDetail, RosterEntry};

/// The three input collections, decoded and untouched from there on.
pub struct Inputs {
    pub roster: Vec<RosterEntry>,
    pub details: HashMap<String, PlayerDetail>,
    pub stats: HashMap<String, MatchStats>,
}

impl Inputs {
    pub fn match_instances(&self) -> usize {
        self.details.values().map(|d| d.matches.len()).sum()
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("decode {}", path.display()))
}

/// Loads roster, player details and match statistics. Any missing file or
/// corrupt JSON aborts the run.
pub fn load_inputs(roster: &Path, details: &Path, stats: &Path) -> Result<Inputs> {
    let roster = read_json(roster).context("load roster collection")?;
    let details = read_json(details).context("load player detail collection")?;
    let stats = read_json(stats).context("load match statistics collection")?;
    Ok(Inputs {
        roster,
        details,
        stats,
    })
}

/// By-name lookups built once per run so opponent resolution is O(1)
/// instead of a roster scan per match.
struct RunIndexes<'a> {
    roster_by_name: HashMap<&'a str, &'a RosterEntry>,
    details_by_name: HashMap<&'a str, &'a PlayerDetail>,
}

fn build_indexes(inputs: &Inputs) -> RunIndexes<'_> {
    let mut roster_by_name = HashMap::with_capacity(inputs.roster.len());
    for entry in &inputs.roster {
        if roster_by_name.insert(entry.name.as_str(), entry).is_some() {
            warn!(player = %entry.name, "duplicate roster name, keeping the later entry");
        }
    }
    let mut details_by_name = HashMap::with_capacity(inputs.details.len());
    for detail in inputs.details.values() {
        details_by_name.insert(detail.profile.name.as_str(), detail);
    }
    RunIndexes {
        roster_by_name,
        details_by_name,
    }
}

/// Generates one row per (player, match) instance across all players.
/// Row computations are independent, so players are processed in
/// parallel; the result is re-sorted by (url, player1 name) to keep the
/// output deterministic.
pub fn generate_rows(inputs: &Inputs) -> Vec<TrainingRow> {
    let indexes = build_indexes(inputs);
    let mut subjects: Vec<(&String, &PlayerDetail)> = inputs.details.iter().collect();
    subjects.sort_by_key(|(name, _)| name.as_str());

    let mut rows: Vec<TrainingRow> = subjects
        .into_par_iter()
        .flat_map_iter(|(name, detail)| player_rows(name, detail, inputs, &indexes))
        .collect();

    rows.sort_by(|a, b| {
        (a.url.as_str(), a.player1.name.as_str()).cmp(&(b.url.as_str(), b.player1.name.as_str()))
    });
    info!(rows = rows.len(), "row generation finished");
    rows
}

fn player_rows(
    player_name: &str,
    detail: &PlayerDetail,
    inputs: &Inputs,
    indexes: &RunIndexes<'_>,
) -> Vec<TrainingRow> {
    let Some(player_base) = indexes.roster_by_name.get(player_name) else {
        warn!(player = %player_name, "player missing from roster, skipping all matches");
        return Vec::new();
    };

    let mut rows = Vec::with_capacity(detail.matches.len());
    for event in &detail.matches {
        let Some(opponent_base) = indexes.roster_by_name.get(event.opponent.as_str()) else {
            warn!(player = %player_name, opponent = %event.opponent, url = %event.link,
                "opponent missing from roster, skipping match");
            continue;
        };
        let Some(opponent_detail) = indexes.details_by_name.get(event.opponent.as_str()) else {
            warn!(player = %player_name, opponent = %event.opponent, url = %event.link,
                "opponent detail record missing, skipping match");
            continue;
        };

        let player_features =
            match features::build_player_features(player_base, &detail.matches, &inputs.stats, event)
            {
                Ok(built) => built,
                Err(err) => {
                    warn!(player = %player_name, url = %event.link, error = %err, "skipping match");
                    continue;
                }
            };
        let opponent_features = match features::build_player_features(
            opponent_base,
            &opponent_detail.matches,
            &inputs.stats,
            event,
        ) {
            Ok(built) => built,
            Err(err) => {
                warn!(player = %event.opponent, url = %event.link, error = %err, "skipping match");
                continue;
            }
        };

        rows.push(features::build_training_row(
            player_features,
            opponent_features,
            event,
        ));
    }
    rows
}

/// Keeps exactly one canonical row per physical match. Rows arrive sorted
/// by (url, player1 name), so the kept direction is deterministic.
pub fn dedup_by_url(rows: Vec<TrainingRow>) -> Vec<TrainingRow> {
    let mut seen = HashSet::new();
    rows.into_iter()
        .filter(|row| seen.insert(row.url.clone()))
        .collect()
}

/// How the canonical table is made symmetric in the player slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymmetryPolicy {
    /// Append a mirrored copy of every row: doubles the row count and
    /// balances the classes exactly.
    Mirror,
    /// Flip a seeded random sample of majority-class rows in place:
    /// row count unchanged, class counts equalized up to rounding.
    Rebalance { seed: u64 },
}

pub fn apply_policy(rows: Vec<TrainingRow>, policy: SymmetryPolicy) -> Vec<TrainingRow> {
    match policy {
        SymmetryPolicy::Mirror => mirror_rows(rows),
        SymmetryPolicy::Rebalance { seed } => {
            rebalance_rows(rows, &mut StdRng::seed_from_u64(seed))
        }
    }
}

/// Full mirroring: all canonical rows first, then their mirrors in the
/// same order.
pub fn mirror_rows(mut rows: Vec<TrainingRow>) -> Vec<TrainingRow> {
    let mirrored: Vec<TrainingRow> = rows.iter().map(TrainingRow::mirrored).collect();
    rows.extend(mirrored);
    rows
}

/// Selective rebalancing: mirrors `max - mean` randomly chosen rows of
/// the majority class in place, moving the class counts to the mean.
pub fn rebalance_rows(mut rows: Vec<TrainingRow>, rng: &mut impl Rng) -> Vec<TrainingRow> {
    let ones: Vec<usize> = rows
        .iter()
        .enumerate()
        .filter(|(_, row)| row.target == 1)
        .map(|(idx, _)| idx)
        .collect();
    let zeros: Vec<usize> = rows
        .iter()
        .enumerate()
        .filter(|(_, row)| row.target == 0)
        .map(|(idx, _)| idx)
        .collect();

    let majority = if ones.len() >= zeros.len() { ones } else { zeros };
    let mean = (rows.len() as f64) / 2.0;
    let to_flip = ((majority.len() as f64) - mean).round().max(0.0) as usize;
    if to_flip == 0 {
        return rows;
    }

    info!(
        majority = majority.len(),
        flipped = to_flip,
        "rebalancing classes by row inversion"
    );
    for picked in index::sample(rng, majority.len(), to_flip.min(majority.len())) {
        let row_idx = majority[picked];
        rows[row_idx] = rows[row_idx].mirrored();
    }
    rows
}

/// Drops any row carrying a non-finite feature value before emission.
pub fn drop_incomplete(rows: Vec<TrainingRow>) -> Vec<TrainingRow> {
    rows.into_iter()
        .filter(|row| {
            if row.is_complete() {
                true
            } else {
                warn!(url = %row.url, "dropping row with missing feature values");
                false
            }
        })
        .collect()
}
