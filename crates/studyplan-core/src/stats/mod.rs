//! Summary statistics for a finished schedule.

use serde::{Deserialize, Serialize};

use crate::allocation::round_to;
use crate::schedule::ScheduleBlock;

/// Aggregate counts and totals over a block sequence.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScheduleStats {
    pub total_study_blocks: usize,
    pub total_break_blocks: usize,
    pub total_study_minutes: f64,
    pub total_break_minutes: f64,
    /// Study minutes in hours, one decimal
    pub total_study_hours: f64,
    /// Percentage of scheduled time spent studying, one decimal
    pub efficiency: f64,
}

/// Count and total the study and break blocks of a schedule.
pub fn calculate_schedule_stats(blocks: &[ScheduleBlock]) -> ScheduleStats {
    let mut stats = ScheduleStats::default();

    for block in blocks {
        if block.is_study() {
            stats.total_study_blocks += 1;
            stats.total_study_minutes += block.duration_minutes;
        } else {
            stats.total_break_blocks += 1;
            stats.total_break_minutes += block.duration_minutes;
        }
    }

    let study = stats.total_study_minutes;
    let scheduled = study + stats.total_break_minutes;
    stats.total_study_hours = round_to(study / 60.0, 1);
    stats.efficiency = if scheduled > 0.0 {
        round_to(study / scheduled * 100.0, 1)
    } else {
        0.0
    };
    stats
}
