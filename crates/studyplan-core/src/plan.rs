//! One-call planning service: allocation, schedule and stats.
//!
//! [`RawPlanInput`] mirrors what a form or JSON file hands us, with every
//! value as text. [`PlanRequest::from_raw`] applies the defaulting rules so
//! that planning itself cannot fail.

use serde::{Deserialize, Deserializer, Serialize};
use tracing::{debug, info};

use crate::allocation::{
    self, clamp_total_hours, parse_total_hours, round_to, AllocationEntry, SubjectInput, MAX_TOTAL_HOURS,
};
use crate::schedule::{BreakFrequency, BreakPolicy, ScheduleBlock, TimeWindow, DEFAULT_BREAK_MINUTES};
use crate::scheduler::StudyScheduler;
use crate::stats::{calculate_schedule_stats, ScheduleStats};

pub const DEFAULT_START_TIME: &str = "08:00";
pub const DEFAULT_END_TIME: &str = "22:00";

/// Planning input as loose text fields.
///
/// When read from JSON, numbers are accepted in place of text and `null`
/// reads as blank.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RawPlanInput {
    pub subjects: Vec<SubjectInput>,
    #[serde(deserialize_with = "lenient_text")]
    pub total_hours: String,
    #[serde(deserialize_with = "lenient_text")]
    pub note: String,
    #[serde(deserialize_with = "lenient_text")]
    pub study_start_time: String,
    #[serde(deserialize_with = "lenient_text")]
    pub study_end_time: String,
    #[serde(deserialize_with = "lenient_text")]
    pub break_duration: String,
    #[serde(deserialize_with = "lenient_text")]
    pub max_breaks: String,
    #[serde(deserialize_with = "lenient_text")]
    pub total_break_time: String,
    #[serde(deserialize_with = "lenient_text")]
    pub break_frequency: String,
}

/// Accepts a string, a number or a bool as text; anything else is blank.
fn lenient_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    let text = match value {
        Some(serde_json::Value::String(s)) => s,
        Some(serde_json::Value::Number(n)) => n.to_string(),
        Some(serde_json::Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    };
    Ok(text)
}

impl RawPlanInput {
    /// Layer `other` on top of `self`: its non-blank fields and non-empty
    /// subject list win.
    pub fn overlay(self, other: RawPlanInput) -> RawPlanInput {
        fn pick(base: String, top: String) -> String {
            if top.trim().is_empty() {
                base
            } else {
                top
            }
        }

        RawPlanInput {
            subjects: if other.subjects.is_empty() {
                self.subjects
            } else {
                other.subjects
            },
            total_hours: pick(self.total_hours, other.total_hours),
            note: pick(self.note, other.note),
            study_start_time: pick(self.study_start_time, other.study_start_time),
            study_end_time: pick(self.study_end_time, other.study_end_time),
            break_duration: pick(self.break_duration, other.break_duration),
            max_breaks: pick(self.max_breaks, other.max_breaks),
            total_break_time: pick(self.total_break_time, other.total_break_time),
            break_frequency: pick(self.break_frequency, other.break_frequency),
        }
    }
}

/// Planning input with all values resolved.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanRequest {
    pub subjects: Vec<SubjectInput>,
    pub total_hours: f64,
    #[serde(default)]
    pub note: String,
    pub study_start_time: String,
    pub study_end_time: String,
    pub breaks: BreakPolicy,
}

impl Default for PlanRequest {
    fn default() -> Self {
        Self {
            subjects: Vec::new(),
            total_hours: 0.0,
            note: String::new(),
            study_start_time: DEFAULT_START_TIME.to_string(),
            study_end_time: DEFAULT_END_TIME.to_string(),
            breaks: BreakPolicy::default(),
        }
    }
}

impl PlanRequest {
    /// Resolve loose input. Blank times fall back to the defaults; other
    /// bad times are caught later by [`plan`] so they can be reported.
    pub fn from_raw(raw: RawPlanInput) -> Self {
        let study_start_time = non_blank(&raw.study_start_time).unwrap_or(DEFAULT_START_TIME);
        let study_end_time = non_blank(&raw.study_end_time).unwrap_or(DEFAULT_END_TIME);

        Self {
            total_hours: parse_total_hours(&raw.total_hours),
            note: raw.note.trim().to_string(),
            study_start_time: study_start_time.trim().to_string(),
            study_end_time: study_end_time.trim().to_string(),
            breaks: BreakPolicy {
                break_duration: parse_break_duration(&raw.break_duration),
                max_breaks: parse_optional_count(&raw.max_breaks),
                total_break_time: parse_optional_count(&raw.total_break_time),
                frequency: BreakFrequency::parse_lenient(&raw.break_frequency),
            },
            subjects: raw.subjects,
        }
    }
}

/// Everything produced for one planning request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudyPlan {
    pub allocation: Vec<AllocationEntry>,
    pub schedule: Vec<ScheduleBlock>,
    pub stats: ScheduleStats,
    pub warnings: Vec<String>,
    pub total_hours: f64,
    /// Sum of allocated hours, two decimals
    pub total_allocated: f64,
    pub note: String,
    pub study_start_time: String,
    pub study_end_time: String,
    pub breaks: BreakPolicy,
}

/// Allocate, schedule and summarize.
pub fn plan(request: &PlanRequest) -> StudyPlan {
    let allocation = allocation::allocate(&request.subjects, request.total_hours);

    let mut warnings = Vec::new();
    if request.total_hours > MAX_TOTAL_HOURS {
        info!(total_hours = request.total_hours, "study budget clamped");
        warnings.push(format!("Total hours capped at {MAX_TOTAL_HOURS}h."));
    }
    let start = resolve_time(&request.study_start_time, DEFAULT_START_TIME, "start", &mut warnings);
    let end = resolve_time(&request.study_end_time, DEFAULT_END_TIME, "end", &mut warnings);
    let window = TimeWindow::new(start, end);

    let scheduler = StudyScheduler::with_policy(request.breaks.clone());
    let outcome = scheduler.generate(&allocation, &window);
    warnings.extend(outcome.warnings);

    let stats = calculate_schedule_stats(&outcome.blocks);
    let total_allocated = round_to(allocation.iter().map(|e| e.allocated_hours).sum(), 2);
    debug!(
        subjects = allocation.len(),
        blocks = outcome.blocks.len(),
        total_allocated,
        "plan generated"
    );

    StudyPlan {
        allocation,
        schedule: outcome.blocks,
        stats,
        warnings,
        total_hours: clamp_total_hours(request.total_hours),
        total_allocated,
        note: request.note.clone(),
        study_start_time: crate::schedule::format_clock(window.start()),
        study_end_time: crate::schedule::format_clock(window.end()),
        breaks: request.breaks.clone(),
    }
}

/// Prefilled example subjects.
pub fn sample_subjects() -> Vec<SubjectInput> {
    vec![
        SubjectInput::new("Calculus", 4.0, 3.0),
        SubjectInput::new("English Essay", 3.0, 5.0),
        SubjectInput::new("Physics", 5.0, 2.0),
    ]
}

/// Parse an optional count. Blank or unreadable input is unset; negative
/// values clamp to zero.
pub fn parse_optional_count(raw: &str) -> Option<u32> {
    let value: i64 = non_blank(raw)?.trim().parse().ok()?;
    Some(value.clamp(0, i64::from(u32::MAX)) as u32)
}

/// Parse the nominal break length, defaulting to 15 minutes.
pub fn parse_break_duration(raw: &str) -> u32 {
    parse_optional_count(raw).unwrap_or(DEFAULT_BREAK_MINUTES)
}

fn non_blank(raw: &str) -> Option<&str> {
    if raw.trim().is_empty() {
        None
    } else {
        Some(raw)
    }
}

fn resolve_time(
    raw: &str,
    fallback: &str,
    which: &str,
    warnings: &mut Vec<String>,
) -> chrono::NaiveTime {
    match crate::schedule::parse_clock(raw) {
        Ok(time) => time,
        Err(err) => {
            info!(%err, which, "falling back to default time");
            warnings.push(format!(
                "Invalid study {which} time '{raw}'; using {fallback} instead."
            ));
            crate::schedule::parse_clock(fallback).unwrap_or_default()
        }
    }
}
