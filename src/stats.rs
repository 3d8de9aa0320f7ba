//! Parsers and averages for the raw textual statistic encodings.

use tracing::warn;

use crate::records::{CountStat, RatioStat, SideStats};

/// Sentinel the scrape uses for a statistic the page did not report.
pub const MISSING: &str = "NA";

/// A ratio statistic with its authoritative numerator and denominator.
///
/// The percentage printed inside the parentheses of the raw encoding is
/// display-only and never used for arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ratio {
    pub numerator: u32,
    pub denominator: u32,
}

impl Ratio {
    pub fn fraction(self) -> f64 {
        if self.denominator == 0 {
            0.0
        } else {
            f64::from(self.numerator) / f64::from(self.denominator)
        }
    }
}

fn is_missing(raw: &str) -> bool {
    let raw = raw.trim();
    raw.is_empty() || raw == MISSING
}

/// Parses the `N/D (P%)` encoding; `None` for missing or malformed input.
pub fn parse_ratio(raw: &str) -> Option<Ratio> {
    if is_missing(raw) {
        return None;
    }
    ratio_from_text(raw)
}

fn ratio_from_text(raw: &str) -> Option<Ratio> {
    let head = raw.trim().split(['(', ' ']).next()?;
    let (numerator, denominator) = head.split_once('/')?;
    Some(Ratio {
        numerator: numerator.trim().parse().ok()?,
        denominator: denominator.trim().parse().ok()?,
    })
}

/// Parses a bare integer statistic; `None` for missing or malformed input.
pub fn parse_count(raw: &str) -> Option<u32> {
    if is_missing(raw) {
        return None;
    }
    raw.trim().parse().ok()
}

/// Pooled average of a ratio statistic: `Σnumerator / Σdenominator`.
///
/// Pooling weights each match by its volume, unlike a mean of per-match
/// percentages. Returns 0.0 when no record carries a usable ratio.
pub fn pooled_ratio_average(records: &[&SideStats], stat: RatioStat) -> f64 {
    let mut numerator = 0u64;
    let mut denominator = 0u64;
    for side in records {
        let raw = side.ratio_raw(stat);
        if is_missing(raw) {
            continue;
        }
        match ratio_from_text(raw) {
            Some(ratio) => {
                numerator += u64::from(ratio.numerator);
                denominator += u64::from(ratio.denominator);
            }
            None => warn!(?stat, raw, player = %side.player, "skipping malformed ratio statistic"),
        }
    }
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

/// Arithmetic mean of an absolute statistic over the records holding one.
pub fn count_average(records: &[&SideStats], stat: CountStat) -> f64 {
    let mut sum = 0u64;
    let mut n = 0u64;
    for side in records {
        let raw = side.count_raw(stat);
        if is_missing(raw) {
            continue;
        }
        match raw.trim().parse::<u32>() {
            Ok(value) => {
                sum += u64::from(value);
                n += 1;
            }
            Err(_) => warn!(?stat, raw, player = %side.player, "skipping malformed count statistic"),
        }
    }
    if n == 0 { 0.0 } else { sum as f64 / n as f64 }
}
