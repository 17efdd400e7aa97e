//! Static study tips, grouped by category.

use serde::Serialize;

/// A named group of tips.
#[derive(Debug, Clone, Serialize)]
pub struct TipCategory {
    pub key: &'static str,
    pub title: &'static str,
    pub tips: &'static [&'static str],
}

const TIPS: &[TipCategory] = &[
    TipCategory {
        key: "time_management",
        title: "Time management",
        tips: &[
            "Use the Pomodoro Technique: 25 minutes focused study, 5-minute break",
            "Schedule your hardest subjects when you're most alert (usually morning)",
            "Take regular breaks every 45-60 minutes to maintain focus",
            "Use active recall: test yourself instead of just re-reading notes",
        ],
    },
    TipCategory {
        key: "study_methods",
        title: "Study methods",
        tips: &[
            "Spaced repetition: review material at increasing intervals",
            "Interleaving: mix different subjects/topics in one study session",
            "Elaboration: explain concepts in your own words",
            "Dual coding: combine verbal and visual information",
        ],
    },
    TipCategory {
        key: "motivation",
        title: "Motivation",
        tips: &[
            "Set specific, achievable goals for each study session",
            "Reward yourself after completing study blocks",
            "Study with friends or join study groups for accountability",
            "Track your progress to see improvement over time",
        ],
    },
];

pub fn study_tips() -> &'static [TipCategory] {
    TIPS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_categories_in_order() {
        let keys: Vec<&str> = study_tips().iter().map(|c| c.key).collect();
        assert_eq!(keys, vec!["time_management", "study_methods", "motivation"]);
        assert!(study_tips().iter().all(|c| c.tips.len() == 4));
    }
}
