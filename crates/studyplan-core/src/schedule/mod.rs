//! Schedule types: blocks, break policy, and the study time window.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::allocation::AllocationEntry;
use crate::error::ValidationError;

mod window;

pub use window::{format_clock, parse_clock, TimeWindow};

/// Label used for break blocks.
pub const BREAK_LABEL: &str = "Break";

/// Default break length (minutes).
pub const DEFAULT_BREAK_MINUTES: u32 = 15;

/// Type of schedule block.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BlockType {
    /// Study time for one subject
    Study,
    /// Rest between study blocks
    Break,
}

impl BlockType {
    pub fn as_str(&self) -> &'static str {
        match self {
            BlockType::Study => "study",
            BlockType::Break => "break",
        }
    }
}

/// How often breaks are inserted, and how long study blocks run.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BreakFrequency {
    /// 50-minute blocks, a break whenever one fits
    #[default]
    Auto,
    /// 25-minute blocks, breaks unless under 15 minutes remain
    Frequent,
    /// Blocks of up to 90 minutes, breaks only before another full block
    Minimal,
}

impl BreakFrequency {
    /// Nominal study-block length for this policy.
    pub fn block_minutes(&self, total_study_minutes: i64) -> i64 {
        match self {
            BreakFrequency::Minimal => 90.min(total_study_minutes),
            BreakFrequency::Frequent => 25,
            BreakFrequency::Auto => 50,
        }
    }

    /// Parse a policy name; anything unrecognized falls back to `Auto`.
    pub fn parse_lenient(raw: &str) -> Self {
        raw.parse().unwrap_or_default()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BreakFrequency::Auto => "auto",
            BreakFrequency::Frequent => "frequent",
            BreakFrequency::Minimal => "minimal",
        }
    }
}

impl FromStr for BreakFrequency {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(BreakFrequency::Auto),
            "frequent" => Ok(BreakFrequency::Frequent),
            "minimal" => Ok(BreakFrequency::Minimal),
            other => Err(ValidationError::InvalidValue {
                field: "break_frequency".into(),
                message: format!("unknown frequency '{other}' (expected auto, frequent or minimal)"),
            }),
        }
    }
}

impl fmt::Display for BreakFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Break preferences for a scheduling run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BreakPolicy {
    /// Nominal break length (minutes)
    pub break_duration: u32,
    /// Upper bound on the number of breaks; `None` is unlimited
    pub max_breaks: Option<u32>,
    /// Total break time the user is willing to spend (minutes)
    pub total_break_time: Option<u32>,
    pub frequency: BreakFrequency,
}

impl Default for BreakPolicy {
    fn default() -> Self {
        Self {
            break_duration: DEFAULT_BREAK_MINUTES,
            max_breaks: None,
            total_break_time: None,
            frequency: BreakFrequency::Auto,
        }
    }
}

/// One contiguous interval of the study day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleBlock {
    pub subject: String,
    /// Wall-clock start, `HH:MM`
    pub start_time: String,
    /// Wall-clock end, `HH:MM`
    pub end_time: String,
    /// Exact length; budgeted breaks can be shorter than a minute
    pub duration_minutes: f64,
    #[serde(rename = "type")]
    pub block_type: BlockType,
    pub difficulty: f64,
    pub urgency: f64,
    pub hours_allocated: f64,
}

impl ScheduleBlock {
    /// Study block for `entry`; `hours` is the (possibly scaled) allocation.
    pub fn study(
        entry: &AllocationEntry,
        hours: f64,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Self {
        Self {
            subject: entry.subject.clone(),
            start_time: format_clock(start),
            end_time: format_clock(end),
            duration_minutes: span_minutes(start, end),
            block_type: BlockType::Study,
            difficulty: entry.difficulty,
            urgency: entry.urgency,
            hours_allocated: hours,
        }
    }

    pub fn rest(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self {
            subject: BREAK_LABEL.to_string(),
            start_time: format_clock(start),
            end_time: format_clock(end),
            duration_minutes: span_minutes(start, end),
            block_type: BlockType::Break,
            difficulty: 0.0,
            urgency: 0.0,
            hours_allocated: 0.0,
        }
    }

    pub fn is_study(&self) -> bool {
        self.block_type == BlockType::Study
    }

    pub fn is_break(&self) -> bool {
        self.block_type == BlockType::Break
    }
}

/// Minutes between two instants, with millisecond precision.
pub fn span_minutes(start: NaiveDateTime, end: NaiveDateTime) -> f64 {
    (end - start).num_milliseconds() as f64 / 60_000.0
}

/// Blocks in chronological order plus any capacity warnings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScheduleOutcome {
    pub blocks: Vec<ScheduleBlock>,
    pub warnings: Vec<String>,
}
