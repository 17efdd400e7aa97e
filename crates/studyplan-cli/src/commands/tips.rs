use studyplan_core::{sample_subjects, study_tips};

pub fn run(json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let tips = study_tips();
    if json {
        println!("{}", serde_json::to_string_pretty(tips)?);
        return Ok(());
    }

    for category in tips {
        println!("{}", category.title);
        for tip in category.tips {
            println!("  - {tip}");
        }
        println!();
    }
    Ok(())
}

pub fn sample() -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(&sample_subjects())?);
    Ok(())
}
