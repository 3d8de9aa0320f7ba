//! Flat-table emission: the model-facing CSV (numeric columns plus
//! `target` only) and an optional traceability CSV that keeps names,
//! dates and match URLs.

use std::fs::File;
use std::path::Path;

use anyhow::{Context, Result};
use csv::Writer;

use crate::features::{PLAYER_FEATURE_NAMES, TrainingRow};
use crate::win_rates::Surface;

/// Surfaces emitted as one-hot flags. Carpet and acryl matches carry all
/// four flags as zero.
pub const ONE_HOT_SURFACES: [Surface; 4] =
    [Surface::Hard, Surface::Indoor, Surface::Clay, Surface::Grass];

/// Absolute-difference columns derived from the two player blocks.
pub const DIFF_COLUMNS: [&str; 11] = [
    "ranking_diff",
    "points_diff",
    "win_rate_diff",
    "win_rate_3_sets_diff",
    "win_rate_tiebreak_diff",
    "aces_diff",
    "double_faults_diff",
    "win_rate_dure_diff",
    "win_rate_terre_battue_diff",
    "win_rate_gazon_diff",
    "win_rate_salle_diff",
];

fn diff_values(row: &TrainingRow) -> [f64; 11] {
    let p1 = &row.player1;
    let p2 = &row.player2;
    let abs = |a: f64, b: f64| (a - b).abs();
    [
        abs(f64::from(p1.ranking), f64::from(p2.ranking)),
        abs(f64::from(p1.points), f64::from(p2.points)),
        abs(p1.rates.win_rate, p2.rates.win_rate),
        abs(p1.rates.win_rate_3_sets, p2.rates.win_rate_3_sets),
        abs(p1.rates.win_rate_tiebreak, p2.rates.win_rate_tiebreak),
        abs(p1.performance.avg_aces, p2.performance.avg_aces),
        abs(p1.performance.avg_double_fautes, p2.performance.avg_double_fautes),
        abs(
            p1.surfaces.get(Surface::Hard).win_rate,
            p2.surfaces.get(Surface::Hard).win_rate,
        ),
        abs(
            p1.surfaces.get(Surface::Clay).win_rate,
            p2.surfaces.get(Surface::Clay).win_rate,
        ),
        abs(
            p1.surfaces.get(Surface::Grass).win_rate,
            p2.surfaces.get(Surface::Grass).win_rate,
        ),
        abs(
            p1.surfaces.get(Surface::Indoor).win_rate,
            p2.surfaces.get(Surface::Indoor).win_rate,
        ),
    ]
}

fn one_hot_values(row: &TrainingRow) -> [u8; 4] {
    let mut flags = [0u8; 4];
    for (idx, surface) in ONE_HOT_SURFACES.iter().enumerate() {
        if row.surface == surface.label() {
            flags[idx] = 1;
        }
    }
    flags
}

/// Header of the model-facing table.
pub fn model_headers() -> Vec<String> {
    let mut headers = Vec::new();
    for prefix in ["player1", "player2"] {
        for name in PLAYER_FEATURE_NAMES {
            headers.push(format!("{prefix}_{name}"));
        }
    }
    for surface in ONE_HOT_SURFACES {
        headers.push(format!("surface_{}", surface.column_suffix()));
    }
    headers.push("tournament_category".to_string());
    headers.extend(DIFF_COLUMNS.iter().map(|name| name.to_string()));
    headers.push("target".to_string());
    headers
}

/// One model-facing record, aligned with [`model_headers`]. Every value
/// is numeric; no identifier or date columns remain.
pub fn model_record(row: &TrainingRow) -> Vec<String> {
    let mut record = Vec::new();
    for values in [row.player1.feature_values(), row.player2.feature_values()] {
        record.extend(values.iter().map(|v| v.to_string()));
    }
    record.extend(one_hot_values(row).iter().map(|flag| flag.to_string()));
    record.push(row.tournament_category.to_string());
    record.extend(diff_values(row).iter().map(|v| v.to_string()));
    record.push(row.target.to_string());
    record
}

/// Header of the traceability table: the model columns plus the string
/// identifiers stripped from the modeling view.
pub fn trace_headers() -> Vec<String> {
    let mut headers = vec!["player1_name".to_string(), "player2_name".to_string()];
    headers.extend(model_headers());
    headers.push("surface".to_string());
    headers.push("date".to_string());
    headers.push("url_match".to_string());
    headers
}

pub fn trace_record(row: &TrainingRow) -> Vec<String> {
    let mut record = vec![row.player1.name.clone(), row.player2.name.clone()];
    record.extend(model_record(row));
    record.push(row.surface.clone());
    record.push(row.date.clone());
    record.push(row.url.clone());
    record
}

fn write_table(
    path: &Path,
    headers: Vec<String>,
    records: impl Iterator<Item = Vec<String>>,
) -> Result<()> {
    let file =
        File::create(path).with_context(|| format!("create output file {}", path.display()))?;
    let mut writer = Writer::from_writer(file);
    writer.write_record(&headers).context("write header")?;
    for record in records {
        writer.write_record(&record).context("write row")?;
    }
    writer.flush().context("flush output")?;
    Ok(())
}

pub fn write_model_csv(path: &Path, rows: &[TrainingRow]) -> Result<()> {
    write_table(path, model_headers(), rows.iter().map(model_record))
}

pub fn write_trace_csv(path: &Path, rows: &[TrainingRow]) -> Result<()> {
    write_table(path, trace_headers(), rows.iter().map(trace_record))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::{PlayerFeatures, build_training_row};
    use crate::performance::PerformanceAverages;
    use crate::records::{MatchEvent, Outcome};
    use crate::win_rates::{SurfaceBreakdown, WinRates};

    fn features(name: &str, ranking: u32, points: u32) -> PlayerFeatures {
        PlayerFeatures {
            name: name.to_string(),
            age: 25,
            ranking,
            points,
            rates: WinRates::default(),
            surfaces: SurfaceBreakdown::default(),
            performance: PerformanceAverages::default(),
        }
    }

    fn row(surface: &str) -> TrainingRow {
        let event = MatchEvent {
            date: "28.01.24".to_string(),
            stage: String::new(),
            opponent: "Bo".to_string(),
            score: "6-4, 6-4".to_string(),
            outcome: Outcome::Win,
            link: "u1".to_string(),
            tournament: "Australian Open".to_string(),
            surface: surface.to_string(),
        };
        build_training_row(features("Ana", 1, 9000), features("Bo", 4, 5000), &event)
    }

    #[test]
    fn model_record_matches_header_width() {
        let row = row("dure");
        assert_eq!(model_record(&row).len(), model_headers().len());
        assert_eq!(trace_record(&row).len(), trace_headers().len());
    }

    #[test]
    fn model_view_has_no_identifier_columns() {
        for header in model_headers() {
            assert!(!header.ends_with("_name"));
            assert!(header != "date" && header != "url_match" && header != "surface");
        }
    }

    #[test]
    fn one_hot_flags_are_mutually_exclusive() {
        for surface in ["dure", "salle", "terre battue", "gazon"] {
            let flags = one_hot_values(&row(surface));
            assert_eq!(flags.iter().map(|f| u32::from(*f)).sum::<u32>(), 1);
        }
        // Surfaces outside the one-hot set carry all-zero flags.
        let flags = one_hot_values(&row("carpet"));
        assert_eq!(flags, [0, 0, 0, 0]);
    }

    #[test]
    fn diff_columns_are_absolute() {
        let row = row("dure");
        let diffs = diff_values(&row);
        assert_eq!(diffs[0], 3.0);
        assert_eq!(diffs[1], 4000.0);
        let mirrored_diffs = diff_values(&row.mirrored());
        assert_eq!(diffs, mirrored_diffs);
    }
}
