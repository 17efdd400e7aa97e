//! Property tests for allocation and scheduling invariants.

use proptest::prelude::*;
use studyplan_core::allocation::{AllocationEntry, SubjectInput};
use studyplan_core::schedule::{parse_clock, BreakFrequency, BreakPolicy};
use studyplan_core::{allocate, calculate_schedule_stats, StudyScheduler, TimeWindow};

fn subject_list() -> impl Strategy<Value = Vec<SubjectInput>> {
    prop::collection::vec((0.0f64..5.0, 0.0f64..5.0), 1..8).prop_map(|scores| {
        scores
            .into_iter()
            .enumerate()
            .map(|(i, (d, u))| SubjectInput::new(format!("S{i}"), d, u))
            .collect()
    })
}

fn allocation_rows() -> impl Strategy<Value = Vec<AllocationEntry>> {
    prop::collection::vec((0.0f64..5.0, 0.0f64..5.0, 0.0f64..6.0), 1..6).prop_map(|rows| {
        rows.into_iter()
            .enumerate()
            .map(|(i, (difficulty, urgency, hours))| AllocationEntry {
                subject: format!("S{i}"),
                difficulty,
                urgency,
                weight: (difficulty + urgency).max(0.1),
                allocated_hours: hours,
                share_pct: 0.0,
            })
            .collect()
    })
}

fn break_frequency() -> impl Strategy<Value = BreakFrequency> {
    prop_oneof![
        Just(BreakFrequency::Auto),
        Just(BreakFrequency::Frequent),
        Just(BreakFrequency::Minimal),
    ]
}

fn break_policy() -> impl Strategy<Value = BreakPolicy> {
    (
        0u32..30,
        proptest::option::of(0u32..8),
        proptest::option::of(0u32..120),
        break_frequency(),
    )
        .prop_map(|(break_duration, max_breaks, total_break_time, frequency)| BreakPolicy {
            break_duration,
            max_breaks,
            total_break_time,
            frequency,
        })
}

fn clock_minutes(hhmm: &str) -> i64 {
    let t = parse_clock(hhmm).unwrap();
    let start = parse_clock("00:00").unwrap();
    (t - start).num_minutes()
}

/// Minutes from `from` to `to`, wrapping past midnight.
fn forward(from: &str, to: &str) -> i64 {
    (clock_minutes(to) - clock_minutes(from)).rem_euclid(24 * 60)
}

proptest! {
    #[test]
    fn allocation_conserves_budget(subjects in subject_list(), total in 1.0f64..100.0) {
        let entries = allocate(&subjects, total);
        let sum: f64 = entries.iter().map(|e| e.allocated_hours).sum();
        prop_assert!((sum - total).abs() <= 0.01 + 1e-9);
    }

    #[test]
    fn allocation_rows_are_bounded_and_sorted(subjects in subject_list(), total in 1.0f64..100.0) {
        let entries = allocate(&subjects, total);
        prop_assert_eq!(entries.len(), subjects.len());
        for entry in &entries {
            prop_assert!(entry.allocated_hours >= 0.0);
            prop_assert!((0.0..=100.0).contains(&entry.share_pct));
            prop_assert!(entry.weight >= 0.1);
        }
        for pair in entries.windows(2) {
            prop_assert!(pair[0].allocated_hours >= pair[1].allocated_hours);
        }
    }

    #[test]
    fn schedule_stays_inside_window(
        entries in allocation_rows(),
        policy in break_policy(),
        start in (0u32..24, 0u32..60),
        end in (0u32..24, 0u32..60),
    ) {
        let start = format!("{:02}:{:02}", start.0, start.1);
        let end = format!("{:02}:{:02}", end.0, end.1);
        let window = TimeWindow::parse(&start, &end).unwrap();
        let available = window.available_minutes();
        let max_breaks = policy.max_breaks;
        let outcome = StudyScheduler::with_policy(policy).generate(&entries, &window);

        // Blocks are back to back from the window start.
        let mut elapsed = 0.0;
        let mut cursor = start.clone();
        for block in &outcome.blocks {
            prop_assert_eq!(&block.start_time, &cursor);
            prop_assert!(block.duration_minutes > 0.0);
            let shown = forward(&block.start_time, &block.end_time) as f64;
            prop_assert!((shown - block.duration_minutes).abs() < 1.0);
            elapsed += block.duration_minutes;
            cursor = block.end_time.clone();
        }
        prop_assert!(elapsed <= available as f64 + 1e-6);

        let stats = calculate_schedule_stats(&outcome.blocks);
        prop_assert!((0.0..=100.0).contains(&stats.efficiency));
        if let Some(max_breaks) = max_breaks {
            prop_assert!(stats.total_break_blocks <= max_breaks as usize);
        }

        let requested = (entries.iter().map(|e| e.allocated_hours).sum::<f64>() * 60.0) as i64;
        if requested > available {
            prop_assert!(!outcome.warnings.is_empty());
            prop_assert!(stats.total_study_minutes as f64 <= available as f64 * 0.9 + 1.0);
        } else {
            prop_assert!(outcome.warnings.is_empty());
        }
    }

    #[test]
    fn break_budget_spreads_over_estimated_breaks(
        hours in 1.0f64..4.0,
        break_duration in 1u32..30,
        budget in 1u32..120,
    ) {
        let entries = allocate(&[SubjectInput::new("Focus", 3.0, 3.0)], hours);
        let window = TimeWindow::parse("08:00", "22:00").unwrap();
        let policy = BreakPolicy {
            break_duration,
            max_breaks: None,
            total_break_time: Some(budget),
            frequency: BreakFrequency::Auto,
        };
        let outcome = StudyScheduler::with_policy(policy).generate(&entries, &window);

        let requested = (entries[0].allocated_hours * 60.0) as i64;
        let slack = window.available_minutes() - requested;
        let estimated = (slack / i64::from(break_duration)).max(1);
        let expected = f64::from(break_duration).min(f64::from(budget) / estimated as f64);

        let study_blocks = outcome.blocks.iter().filter(|b| b.is_study()).count();
        let breaks: Vec<f64> = outcome
            .blocks
            .iter()
            .filter(|b| b.is_break())
            .map(|b| b.duration_minutes)
            .collect();

        // Every gap between study blocks gets a shortened, non-zero break.
        prop_assert!(study_blocks >= 2);
        prop_assert_eq!(breaks.len(), study_blocks - 1);
        for minutes in &breaks {
            prop_assert!((minutes - expected).abs() < 1e-4);
            prop_assert!(*minutes <= f64::from(break_duration));
        }
        prop_assert!(breaks.iter().sum::<f64>() <= f64::from(budget) + 1e-4);
    }

    #[test]
    fn subjects_run_by_urgency_then_difficulty(
        entries in allocation_rows(),
        policy in break_policy(),
    ) {
        let window = TimeWindow::parse("00:00", "00:00").unwrap();
        let outcome = StudyScheduler::with_policy(policy).generate(&entries, &window);

        // Each subject's blocks form one run; runs appear in priority order.
        let mut runs: Vec<&str> = Vec::new();
        for block in outcome.blocks.iter().filter(|b| b.is_study()) {
            if runs.last() != Some(&block.subject.as_str()) {
                prop_assert!(!runs.contains(&block.subject.as_str()));
                runs.push(&block.subject);
            }
        }

        let lookup = |name: &str| entries.iter().find(|e| e.subject == name).unwrap();
        for pair in runs.windows(2) {
            let (a, b) = (lookup(pair[0]), lookup(pair[1]));
            prop_assert!(
                a.urgency > b.urgency || (a.urgency == b.urgency && a.difficulty >= b.difficulty),
                "{} ({}, {}) ran before {} ({}, {})",
                a.subject, a.urgency, a.difficulty, b.subject, b.urgency, b.difficulty
            );
        }
    }
}
