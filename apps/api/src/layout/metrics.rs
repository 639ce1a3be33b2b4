//! Content metrics: a weighted estimate of how much vertical space a record needs.
//!
//! Multi-line descriptions cost more height per character than one-line fields, so each
//! description line is charged a flat weight instead of its character count.

use serde::Serialize;

use crate::models::resume::ResumeRecord;

/// Weight charged per description line and per skill item.
pub const LINE_WEIGHT: usize = 10;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentMetrics {
    pub total: usize,
    pub summary_length: usize,
    pub experience_length: usize,
    pub education_length: usize,
    pub skills_length: usize,
    pub experience_count: usize,
    pub education_count: usize,
    pub skills_count: usize,
    /// Informational only; projects do not feed `total`.
    pub projects_count: usize,
}

impl ContentMetrics {
    /// Experience plus education entries, the count the tier rules look at.
    pub fn entry_count(&self) -> usize {
        self.experience_count + self.education_count
    }
}

/// Newline-separated lines in a description, 0 when the description is blank.
pub fn description_line_count(text: &str) -> usize {
    if text.trim().is_empty() {
        0
    } else {
        text.split('\n').count()
    }
}

fn chars(s: &str) -> usize {
    s.chars().count()
}

/// Scores a record. Pure; empty sections contribute nothing.
pub fn analyze(record: &ResumeRecord) -> ContentMetrics {
    let experience_length = record
        .experience
        .iter()
        .map(|e| {
            chars(&e.title) + chars(&e.company) + description_line_count(&e.description) * LINE_WEIGHT
        })
        .sum::<usize>();

    let education_length = record
        .education
        .iter()
        .map(|e| {
            let lines = e.description.as_deref().map(description_line_count).unwrap_or(0);
            chars(&e.degree) + chars(&e.school) + lines * LINE_WEIGHT
        })
        .sum::<usize>();

    let skills_length = record
        .skills
        .iter()
        .map(|s| chars(&s.category) + s.items.len() * LINE_WEIGHT)
        .sum::<usize>();

    let summary_length = chars(&record.personal_info.summary);

    ContentMetrics {
        total: experience_length + education_length + skills_length + summary_length,
        summary_length,
        experience_length,
        education_length,
        skills_length,
        experience_count: record.experience.len(),
        education_count: record.education.len(),
        skills_count: record.skills.len(),
        projects_count: record.projects.len(),
    }
}
