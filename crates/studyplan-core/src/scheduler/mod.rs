//! Greedy block scheduler.
//!
//! Expands an allocation table into a chronological list of study and break
//! blocks inside a [`TimeWindow`]:
//! - Subjects are visited by urgency, then difficulty (highest first)
//! - Each subject is cut into blocks whose length depends on the break policy
//! - Breaks are inserted between a subject's blocks while they fit
//! - If the allocation does not fit the window it is scaled down to 90% of
//!   the window and a warning is reported
//!
//! A single pass; placed blocks are never revisited.

use chrono::Duration;
use tracing::{debug, warn};

use crate::allocation::{clamp_total_hours, AllocationEntry};
use crate::schedule::{span_minutes, BreakFrequency, BreakPolicy, ScheduleBlock, ScheduleOutcome, TimeWindow};

/// Shortest study block emitted when the window end cuts a block short.
pub const MIN_BLOCK_MINUTES: f64 = 15.0;

/// Share of the window usable for study once the request overflows it.
pub const STUDY_CAPACITY_RATIO: f64 = 0.9;

/// Builds a study schedule for a given break policy.
#[derive(Debug, Clone, Default)]
pub struct StudyScheduler {
    policy: BreakPolicy,
}

impl StudyScheduler {
    /// Create a scheduler with the default break policy
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with a custom break policy
    pub fn with_policy(policy: BreakPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &BreakPolicy {
        &self.policy
    }

    /// Generate the schedule for `entries` inside `window`.
    ///
    /// Never fails: an allocation that does not fit is scaled down and the
    /// returned outcome carries warnings describing what happened.
    pub fn generate(&self, entries: &[AllocationEntry], window: &TimeWindow) -> ScheduleOutcome {
        let mut outcome = ScheduleOutcome::default();
        if entries.is_empty() {
            return outcome;
        }

        let available = window.available_minutes();
        let mut hours: Vec<f64> = entries.iter().map(|e| clamp_total_hours(e.allocated_hours)).collect();
        let mut study_minutes = requested_minutes(&hours);

        // 1. Fit the request into the window
        if study_minutes > available {
            warn!(requested = study_minutes, available, "study time exceeds window");
            outcome.warnings.push(format!(
                "Requested study time ({:.1}h) exceeds available time window ({:.1}h). Schedule will be truncated.",
                study_minutes as f64 / 60.0,
                available as f64 / 60.0
            ));

            let cap = available as f64 * STUDY_CAPACITY_RATIO;
            if study_minutes as f64 > cap {
                let scale = cap / study_minutes as f64;
                for h in &mut hours {
                    *h *= scale;
                }
                study_minutes = requested_minutes(&hours);
                outcome.warnings.push(format!(
                    "Study time scaled down to {:.1}h to fit your time window.",
                    study_minutes as f64 / 60.0
                ));
            }
        }

        // 2. Block and break lengths
        let block_minutes = self.policy.frequency.block_minutes(study_minutes) as f64;
        let break_minutes = self.break_minutes(available, study_minutes);
        debug!(block_minutes, break_minutes, study_minutes, "schedule parameters");

        // 3. Highest urgency first, then highest difficulty
        let mut order: Vec<usize> = (0..entries.len()).collect();
        order.sort_by(|&a, &b| {
            let (a, b) = (&entries[a], &entries[b]);
            b.urgency
                .total_cmp(&a.urgency)
                .then_with(|| b.difficulty.total_cmp(&a.difficulty))
        });

        // 4. Emit blocks against a shared clock
        let end = window.end();
        let mut clock = window.start();
        let mut breaks_taken: u32 = 0;

        for idx in order {
            let entry = &entries[idx];
            let subject_hours = hours[idx];
            let mut remaining = (subject_hours * 60.0).trunc();

            while remaining > 0.0 && clock < end {
                let mut block = remaining.min(block_minutes);
                if clock + minutes(block) > end {
                    let left = span_minutes(clock, end);
                    if left < MIN_BLOCK_MINUTES {
                        break;
                    }
                    block = block.min(left);
                }
                if block <= 0.0 {
                    break;
                }

                let block_end = clock + minutes(block);
                outcome
                    .blocks
                    .push(ScheduleBlock::study(entry, subject_hours, clock, block_end));
                clock = block_end;
                remaining -= block;

                if break_minutes > 0.0
                    && clock < end
                    && self.wants_break(remaining, block_minutes, breaks_taken)
                {
                    let break_end = clock + minutes(break_minutes);
                    if break_end <= end {
                        outcome.blocks.push(ScheduleBlock::rest(clock, break_end));
                        clock = break_end;
                        breaks_taken += 1;
                    }
                }
            }

            if remaining > 0.0 {
                debug!(subject = %entry.subject, remaining, "leftover minutes not scheduled");
            }
        }

        outcome
    }

    /// Break length after applying the total break budget, if any.
    ///
    /// The budget is spread evenly over the estimated break count and can
    /// only shorten a break, never lengthen it. The result may be a
    /// fraction of a minute.
    fn break_minutes(&self, available: i64, study_minutes: i64) -> f64 {
        let nominal = i64::from(self.policy.break_duration);
        let Some(budget) = self.policy.total_break_time else {
            return nominal as f64;
        };

        let slack = available - study_minutes;
        if slack <= 0 || nominal <= 0 {
            return nominal as f64;
        }

        let mut estimated = (slack / nominal).max(1);
        if let Some(max_breaks) = self.policy.max_breaks {
            estimated = estimated.min(i64::from(max_breaks));
        }

        if estimated > 0 {
            (nominal as f64).min(f64::from(budget) / estimated as f64)
        } else {
            nominal as f64
        }
    }

    fn wants_break(&self, remaining: f64, block_minutes: f64, breaks_taken: u32) -> bool {
        let allowed = remaining > 0.0
            && self
                .policy
                .max_breaks
                .map_or(true, |max_breaks| breaks_taken < max_breaks);

        match self.policy.frequency {
            BreakFrequency::Minimal => allowed && remaining >= block_minutes,
            BreakFrequency::Frequent => allowed && remaining >= MIN_BLOCK_MINUTES,
            BreakFrequency::Auto => allowed,
        }
    }
}

/// Total requested study minutes, truncated.
fn requested_minutes(hours: &[f64]) -> i64 {
    (hours.iter().sum::<f64>() * 60.0) as i64
}

/// Clock offset for a possibly fractional number of minutes.
fn minutes(value: f64) -> Duration {
    Duration::milliseconds((value * 60_000.0).round() as i64)
}
