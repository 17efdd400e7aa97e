//! CSV export of the allocation table and the block schedule.

use chrono::NaiveDateTime;
use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::allocation::AllocationEntry;
use crate::error::Result;
use crate::schedule::ScheduleBlock;

const ALLOCATION_HEADER: [&str; 6] = [
    "subject",
    "difficulty",
    "urgency",
    "weight",
    "allocated_hours",
    "share_pct",
];

const SCHEDULE_HEADER: [&str; 8] = [
    "subject",
    "start_time",
    "end_time",
    "duration_minutes",
    "type",
    "difficulty",
    "urgency",
    "hours_allocated",
];

/// Which table to export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportKind {
    Allocation,
    Schedule,
}

impl ExportKind {
    fn file_stem(&self) -> &'static str {
        match self {
            ExportKind::Allocation => "study_plan",
            ExportKind::Schedule => "study_schedule",
        }
    }
}

/// Render the allocation table as CSV. The header is always present.
pub fn allocation_csv(entries: &[AllocationEntry]) -> Result<String> {
    to_csv(&ALLOCATION_HEADER, entries)
}

/// Render the schedule as CSV. The header is always present.
pub fn schedule_csv(blocks: &[ScheduleBlock]) -> Result<String> {
    to_csv(&SCHEDULE_HEADER, blocks)
}

fn to_csv<T: Serialize>(header: &[&str], rows: &[T]) -> Result<String> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());
    writer.write_record(header)?;
    for row in rows {
        writer.serialize(row)?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| crate::error::CoreError::Custom(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| crate::error::CoreError::Custom(e.to_string()))
}

/// `study_plan_20240115093000.csv` style file name.
pub fn default_export_filename(kind: ExportKind, timestamp: NaiveDateTime) -> String {
    format!("{}_{}.csv", kind.file_stem(), timestamp.format("%Y%m%d%H%M%S"))
}

/// Write both tables into `dir`, returning the paths written.
pub fn write_plan_csv(
    dir: &Path,
    entries: &[AllocationEntry],
    blocks: &[ScheduleBlock],
    timestamp: NaiveDateTime,
) -> Result<(PathBuf, PathBuf)> {
    std::fs::create_dir_all(dir)?;

    let allocation_path = dir.join(default_export_filename(ExportKind::Allocation, timestamp));
    std::fs::write(&allocation_path, allocation_csv(entries)?)?;

    let schedule_path = dir.join(default_export_filename(ExportKind::Schedule, timestamp));
    std::fs::write(&schedule_path, schedule_csv(blocks)?)?;

    Ok((allocation_path, schedule_path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::allocation::{allocate, SubjectInput};
    use crate::schedule::TimeWindow;
    use crate::scheduler::StudyScheduler;
    use chrono::NaiveDate;

    fn stamp() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 15)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap()
    }

    #[test]
    fn test_allocation_csv_rows() {
        let entries = allocate(&[SubjectInput::new("Physics", 5.0, 2.0)], 4.0);
        let csv = allocation_csv(&entries).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "subject,difficulty,urgency,weight,allocated_hours,share_pct");
        assert_eq!(lines[1], "Physics,5.0,2.0,7.0,4.0,100.0");
    }

    #[test]
    fn test_empty_tables_keep_header() {
        assert_eq!(
            allocation_csv(&[]).unwrap(),
            "subject,difficulty,urgency,weight,allocated_hours,share_pct\n"
        );
        assert!(schedule_csv(&[]).unwrap().starts_with("subject,start_time,end_time"));
    }

    #[test]
    fn test_schedule_csv_rows() {
        let entries = allocate(&[SubjectInput::new("English, Essay", 3.0, 5.0)], 1.0);
        let window = TimeWindow::parse("08:00", "22:00").unwrap();
        let outcome = StudyScheduler::new().generate(&entries, &window);
        let csv = schedule_csv(&outcome.blocks).unwrap();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines.len(), 4);
        assert_eq!(lines[1], "\"English, Essay\",08:00,08:50,50.0,study,3.0,5.0,1.0");
        assert_eq!(lines[2], "Break,08:50,09:05,15.0,break,0.0,0.0,0.0");
    }

    #[test]
    fn test_default_export_filename() {
        assert_eq!(
            default_export_filename(ExportKind::Allocation, stamp()),
            "study_plan_20240115093000.csv"
        );
        assert_eq!(
            default_export_filename(ExportKind::Schedule, stamp()),
            "study_schedule_20240115093000.csv"
        );
    }

    #[test]
    fn test_write_plan_csv() {
        let dir = tempfile::tempdir().unwrap();
        let entries = allocate(&[SubjectInput::new("Physics", 5.0, 2.0)], 1.0);
        let (allocation_path, schedule_path) =
            write_plan_csv(dir.path(), &entries, &[], stamp()).unwrap();

        let written = std::fs::read_to_string(allocation_path).unwrap();
        assert!(written.contains("Physics"));
        assert!(schedule_path.ends_with("study_schedule_20240115093000.csv"));
    }
}
