//! Weight-proportional allocation of a study-hour budget.
//!
//! Each subject gets a weight of `difficulty + urgency` (floored at 0.1) and
//! receives its share of the total budget, rounded to hundredths of an hour.
//! Rounding drift is folded back into the heaviest subject so the column
//! always sums to the budget.

use serde::{Deserialize, Deserializer, Serialize};
use std::str::FromStr;
use tracing::debug;

use crate::error::ValidationError;

/// Score used when a difficulty or urgency value cannot be read.
pub const DEFAULT_SCORE: f64 = 3.0;

/// Smallest weight a subject can carry.
pub const MIN_WEIGHT: f64 = 0.1;

/// Largest study-hour budget accepted; bigger values are clamped.
pub const MAX_TOTAL_HOURS: f64 = 100_000.0;

/// Largest magnitude accepted for a difficulty or urgency score.
pub const MAX_SCORE: f64 = 1_000_000.0;

/// A subject as entered by the user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubjectInput {
    #[serde(alias = "subject")]
    pub name: String,
    #[serde(default = "default_score", deserialize_with = "lenient_score")]
    pub difficulty: f64,
    #[serde(default = "default_score", deserialize_with = "lenient_score")]
    pub urgency: f64,
}

impl SubjectInput {
    pub fn new(name: impl Into<String>, difficulty: f64, urgency: f64) -> Self {
        Self {
            name: name.into(),
            difficulty,
            urgency,
        }
    }

    /// Build from raw form text. Unreadable scores become [`DEFAULT_SCORE`].
    pub fn from_raw(name: &str, difficulty: &str, urgency: &str) -> Self {
        Self::new(name, parse_score(difficulty), parse_score(urgency))
    }
}

impl FromStr for SubjectInput {
    type Err = ValidationError;

    /// Parses `NAME` or `NAME:DIFFICULTY:URGENCY`. The name may itself
    /// contain colons; the last two fields are always the scores.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(':').collect();
        match parts.len() {
            1 => Ok(Self::new(s.trim(), DEFAULT_SCORE, DEFAULT_SCORE)),
            2 => Err(ValidationError::InvalidSubject { value: s.into() }),
            n => {
                let name = parts[..n - 2].join(":");
                Ok(Self::from_raw(name.trim(), parts[n - 2], parts[n - 1]))
            }
        }
    }
}

/// One row of the allocation table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationEntry {
    pub subject: String,
    pub difficulty: f64,
    pub urgency: f64,
    pub weight: f64,
    pub allocated_hours: f64,
    pub share_pct: f64,
}

fn default_score() -> f64 {
    DEFAULT_SCORE
}

/// Accepts a number, a numeric string, or anything else (which defaults).
fn lenient_score<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    let score = match value {
        Some(serde_json::Value::Number(n)) => n.as_f64().map(sanitize_score).unwrap_or(DEFAULT_SCORE),
        Some(serde_json::Value::String(s)) => parse_score(&s),
        _ => DEFAULT_SCORE,
    };
    Ok(score)
}

/// Parse a difficulty or urgency value, defaulting to 3.0 on failure.
pub fn parse_score(raw: &str) -> f64 {
    raw.trim()
        .parse::<f64>()
        .map(sanitize_score)
        .unwrap_or(DEFAULT_SCORE)
}

fn sanitize_score(value: f64) -> f64 {
    if value.is_finite() {
        value.clamp(-MAX_SCORE, MAX_SCORE)
    } else {
        DEFAULT_SCORE
    }
}

/// Parse the total-hours budget. Unreadable, non-finite or negative input
/// yields 0.0. Large values are kept; [`allocate`] clamps them.
pub fn parse_total_hours(raw: &str) -> f64 {
    match raw.trim().parse::<f64>() {
        Ok(hours) if hours.is_finite() && hours > 0.0 => hours,
        _ => 0.0,
    }
}

/// Bring an hour value into `0.0..=MAX_TOTAL_HOURS`. Non-finite and
/// negative values become 0.0.
pub fn clamp_total_hours(hours: f64) -> f64 {
    if hours.is_finite() && hours > 0.0 {
        hours.min(MAX_TOTAL_HOURS)
    } else {
        0.0
    }
}

/// Allocation weight for a subject.
pub fn subject_weight(difficulty: f64, urgency: f64) -> f64 {
    (difficulty + urgency).max(MIN_WEIGHT)
}

/// Round to `places` decimals, ties to even.
///
/// Values too large to scale are returned unchanged.
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    let scaled = value * factor;
    if !scaled.is_finite() {
        return value;
    }
    scaled.round_ties_even() / factor
}

/// Split `total_hours` across `subjects` in proportion to their weights.
///
/// Subjects with a blank name are skipped. The result is ordered by
/// allocated hours, largest first; equal allocations keep input order.
pub fn allocate(subjects: &[SubjectInput], total_hours: f64) -> Vec<AllocationEntry> {
    if total_hours > MAX_TOTAL_HOURS {
        debug!(total_hours, max = MAX_TOTAL_HOURS, "clamping study budget");
    }
    let total_hours = clamp_total_hours(total_hours);

    let mut entries: Vec<AllocationEntry> = subjects
        .iter()
        .filter_map(|s| {
            let name = s.name.trim();
            if name.is_empty() {
                return None;
            }
            let difficulty = sanitize_score(s.difficulty);
            let urgency = sanitize_score(s.urgency);
            Some(AllocationEntry {
                subject: name.to_string(),
                difficulty,
                urgency,
                weight: subject_weight(difficulty, urgency),
                allocated_hours: 0.0,
                share_pct: 0.0,
            })
        })
        .collect();

    if entries.is_empty() {
        return entries;
    }

    let total_weight: f64 = entries.iter().map(|e| e.weight).sum();
    if total_weight == 0.0 || !total_weight.is_finite() {
        debug!(total_weight, "unusable total weight; returning empty allocations");
        return entries;
    }

    for entry in &mut entries {
        let share = entry.weight / total_weight;
        entry.allocated_hours = round_to(share * total_hours, 2);
        entry.share_pct = round_to(share * 100.0, 1);
    }

    reconcile_rounding(&mut entries, total_hours);

    entries.sort_by(|a, b| b.allocated_hours.total_cmp(&a.allocated_hours));
    entries
}

/// Fold rounding drift into the first entry with the largest weight.
fn reconcile_rounding(entries: &mut [AllocationEntry], total_hours: f64) {
    let allocated: f64 = entries.iter().map(|e| e.allocated_hours).sum();
    let diff = round_to(total_hours - allocated, 2);
    if !diff.is_finite() || diff.abs() < 0.01 {
        return;
    }

    let Some(idx) = heaviest_index(entries) else {
        return;
    };
    let entry = &mut entries[idx];
    debug!(subject = %entry.subject, diff, "adjusting allocation for rounding drift");
    entry.allocated_hours = round_to(entry.allocated_hours + diff, 2);
}

fn heaviest_index(entries: &[AllocationEntry]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, entry) in entries.iter().enumerate() {
        match best {
            Some((_, weight)) if entry.weight <= weight => {}
            _ => best = Some((i, entry.weight)),
        }
    }
    best.map(|(i, _)| i)
}
