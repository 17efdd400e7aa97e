//! # Studyplan Core Library
//!
//! This library provides the core logic for Studyplan, a study-time planner.
//! The CLI is a thin layer over the same functions; nothing here keeps state
//! between calls.
//!
//! ## Architecture
//!
//! - **Allocation**: splits a study-hour budget across subjects in proportion
//!   to difficulty + urgency, with rounding drift folded into the heaviest
//!   subject
//! - **Scheduler**: greedy single pass that turns the allocation into
//!   chronological study and break blocks inside a time window
//! - **Plan**: lenient input parsing and the one-call allocate → schedule →
//!   stats pipeline
//! - **Export**: CSV rendering of both tables
//! - **Storage**: TOML configuration of planner defaults
//!
//! ## Key Components
//!
//! - [`allocate`]: weighted hour allocation
//! - [`StudyScheduler`]: block scheduler
//! - [`plan()`]: full planning pipeline
//! - [`Config`]: application configuration management

pub mod allocation;
pub mod error;
pub mod export;
pub mod plan;
pub mod schedule;
pub mod scheduler;
pub mod stats;
pub mod storage;
pub mod tips;

pub use allocation::{allocate, AllocationEntry, SubjectInput};
pub use error::{ConfigError, CoreError, ValidationError};
pub use export::{allocation_csv, schedule_csv, write_plan_csv, ExportKind};
pub use plan::{plan, sample_subjects, PlanRequest, RawPlanInput, StudyPlan};
pub use schedule::{BlockType, BreakFrequency, BreakPolicy, ScheduleBlock, ScheduleOutcome, TimeWindow};
pub use scheduler::StudyScheduler;
pub use stats::{calculate_schedule_stats, ScheduleStats};
pub use storage::Config;
pub use tips::{study_tips, TipCategory};
