use clap::{Args, ValueEnum};
use std::path::PathBuf;

use studyplan_core::{
    allocation_csv, plan, sample_subjects, schedule_csv, write_plan_csv, Config, PlanRequest,
    RawPlanInput, StudyPlan, SubjectInput,
};

#[derive(Clone, Copy, ValueEnum)]
pub enum CsvTable {
    /// Per-subject allocation
    Allocation,
    /// Time-blocked schedule
    Schedule,
}

#[derive(Args)]
pub struct PlanArgs {
    /// Subject as NAME:DIFFICULTY:URGENCY (repeatable)
    #[arg(short, long = "subject", value_name = "NAME:D:U")]
    subjects: Vec<String>,
    /// JSON file with planning input (subjects, total_hours, ...)
    #[arg(long, value_name = "FILE")]
    input: Option<PathBuf>,
    /// Use the built-in sample subjects
    #[arg(long, conflicts_with = "subjects")]
    sample: bool,
    /// Total study hours to allocate
    #[arg(long)]
    hours: Option<String>,
    /// Study start time (HH:MM)
    #[arg(long)]
    start: Option<String>,
    /// Study end time (HH:MM); earlier than start means the next day
    #[arg(long)]
    end: Option<String>,
    /// Break length in minutes
    #[arg(long)]
    break_duration: Option<String>,
    /// Maximum number of breaks ("none" for unlimited)
    #[arg(long)]
    max_breaks: Option<String>,
    /// Total break time budget in minutes ("none" for no budget)
    #[arg(long)]
    break_budget: Option<String>,
    /// Break frequency: auto, frequent or minimal
    #[arg(long)]
    frequency: Option<String>,
    /// Free-form note kept with the plan
    #[arg(long)]
    note: Option<String>,
    /// Output the full plan as JSON
    #[arg(long, conflicts_with = "csv")]
    json: bool,
    /// Print one table as CSV
    #[arg(long, value_enum)]
    csv: Option<CsvTable>,
    /// Write both CSV files to DIR (config export.directory or "." if omitted)
    #[arg(long, value_name = "DIR", num_args = 0..=1)]
    export: Option<Option<PathBuf>>,
}

pub fn run(args: PlanArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();

    let mut raw = config.planner.raw_defaults();
    if let Some(path) = &args.input {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("cannot read {}: {e}", path.display()))?;
        let from_file: RawPlanInput = serde_json::from_str(&content)?;
        raw = raw.overlay(from_file);
    }
    raw = raw.overlay(flags_input(&args)?);

    let request = PlanRequest::from_raw(raw);
    let plan = plan(&request);

    if let Some(dir) = &args.export {
        let dir = dir
            .clone()
            .or_else(|| config.export.directory.as_ref().map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from("."));
        let timestamp = chrono::Local::now().naive_local();
        let (allocation_path, schedule_path) =
            write_plan_csv(&dir, &plan.allocation, &plan.schedule, timestamp)?;
        eprintln!("wrote {}", allocation_path.display());
        eprintln!("wrote {}", schedule_path.display());
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&plan)?);
    } else if let Some(table) = args.csv {
        let csv = match table {
            CsvTable::Allocation => allocation_csv(&plan.allocation)?,
            CsvTable::Schedule => schedule_csv(&plan.schedule)?,
        };
        print!("{csv}");
    } else {
        print_plan(&plan);
    }
    Ok(())
}

fn flags_input(args: &PlanArgs) -> Result<RawPlanInput, Box<dyn std::error::Error>> {
    let subjects = if args.sample {
        sample_subjects()
    } else {
        args.subjects
            .iter()
            .map(|s| s.parse::<SubjectInput>())
            .collect::<Result<Vec<_>, _>>()?
    };

    let text = |value: &Option<String>| value.clone().unwrap_or_default();
    Ok(RawPlanInput {
        subjects,
        total_hours: text(&args.hours),
        note: text(&args.note),
        study_start_time: text(&args.start),
        study_end_time: text(&args.end),
        break_duration: text(&args.break_duration),
        max_breaks: text(&args.max_breaks),
        total_break_time: text(&args.break_budget),
        break_frequency: text(&args.frequency),
    })
}

fn print_plan(plan: &StudyPlan) {
    for warning in &plan.warnings {
        println!("warning: {warning}");
    }
    if !plan.note.is_empty() {
        println!("Note: {}", plan.note);
    }

    println!(
        "Allocation ({:.2}h of {:.2}h)",
        plan.total_allocated, plan.total_hours
    );
    println!(
        "  {:<24} {:>6} {:>6} {:>6} {:>7} {:>7}",
        "SUBJECT", "DIFF", "URG", "WEIGHT", "HOURS", "SHARE"
    );
    for entry in &plan.allocation {
        println!(
            "  {:<24} {:>6.1} {:>6.1} {:>6.1} {:>7.2} {:>6.1}%",
            entry.subject,
            entry.difficulty,
            entry.urgency,
            entry.weight,
            entry.allocated_hours,
            entry.share_pct
        );
    }

    println!();
    println!(
        "Schedule {}-{} ({} breaks)",
        plan.study_start_time, plan.study_end_time, plan.breaks.frequency
    );
    for block in &plan.schedule {
        println!(
            "  {}-{}  {:>6.2} min  {:<6} {}",
            block.start_time,
            block.end_time,
            block.duration_minutes,
            block.block_type.as_str(),
            block.subject
        );
    }

    let stats = &plan.stats;
    println!();
    println!(
        "{} study blocks, {} breaks, {:.1}h studying, {:.1} min resting, {:.1}% efficiency",
        stats.total_study_blocks,
        stats.total_break_blocks,
        stats.total_study_hours,
        stats.total_break_minutes,
        stats.efficiency
    );
}
