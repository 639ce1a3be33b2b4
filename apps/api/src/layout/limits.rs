//! Truncation and capping: bounds every free-text field and every section before layout.
//!
//! Works on a copy. The caller's record is never touched, and whatever is cut is counted in
//! [`DroppedItems`] so the caller can decide whether to surface it.

use serde::Serialize;

use super::metrics::ContentMetrics;
use super::tier::{SizingTier, TierLevel, COMPACT_TOTAL};
use crate::models::resume::ResumeRecord;

pub const ELLIPSIS: &str = "...";

/// Above this total the tight budgets apply. Same threshold the tiers use for Compact.
pub const TIGHT_BUDGET_TOTAL: usize = COMPACT_TOTAL;

// ────────────────────────────────────────────────────────────────────────────
// Policy types
// ────────────────────────────────────────────────────────────────────────────

/// Character budgets for the free-text fields, ellipsis included.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CharBudgets {
    pub summary: usize,
    pub experience: usize,
    pub education: usize,
    pub project: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ItemCaps {
    pub experience: usize,
    pub education: usize,
    pub projects: usize,
    pub skill_categories: usize,
    pub skills_per_category: usize,
    pub technologies: usize,
}

/// Description lines kept per entry, by tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LineCaps {
    pub base: usize,
    pub compact: usize,
    pub dense: usize,
}

impl LineCaps {
    pub fn for_level(&self, level: TierLevel) -> usize {
        match level {
            TierLevel::Base => self.base,
            TierLevel::Compact => self.compact,
            TierLevel::Dense => self.dense,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LimitPolicy {
    pub roomy: CharBudgets,
    pub tight: CharBudgets,
    pub caps: ItemCaps,
    pub lines: LineCaps,
}

/// Budgets of the single-column templates. Others override fields with struct update.
pub const STANDARD: LimitPolicy = LimitPolicy {
    roomy: CharBudgets { summary: 500, experience: 300, education: 150, project: 200 },
    tight: CharBudgets { summary: 300, experience: 150, education: 100, project: 120 },
    caps: ItemCaps {
        experience: 3,
        education: 2,
        projects: 2,
        skill_categories: 3,
        skills_per_category: 9,
        technologies: 6,
    },
    lines: LineCaps { base: 4, compact: 3, dense: 3 },
};

impl LimitPolicy {
    pub fn budgets_for(&self, metrics: &ContentMetrics) -> CharBudgets {
        if metrics.total > TIGHT_BUDGET_TOTAL {
            self.tight
        } else {
            self.roomy
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Result types
// ────────────────────────────────────────────────────────────────────────────

/// Everything left out of the page, per kind. Reported, never rendered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DroppedItems {
    pub experience: usize,
    pub education: usize,
    pub projects: usize,
    pub skill_categories: usize,
    pub skill_items: usize,
    pub technologies: usize,
    pub description_lines: usize,
}

impl DroppedItems {
    pub fn total(&self) -> usize {
        self.experience
            + self.education
            + self.projects
            + self.skill_categories
            + self.skill_items
            + self.technologies
            + self.description_lines
    }

    pub fn merge(&mut self, other: &DroppedItems) {
        self.experience += other.experience;
        self.education += other.education;
        self.projects += other.projects;
        self.skill_categories += other.skill_categories;
        self.skill_items += other.skill_items;
        self.technologies += other.technologies;
        self.description_lines += other.description_lines;
    }
}

/// The rendering copy plus what it took to get there.
#[derive(Debug, Clone, PartialEq)]
pub struct LimitedRecord {
    pub record: ResumeRecord,
    pub budgets: CharBudgets,
    pub caps: ItemCaps,
    /// Wrapped description lines a renderer may draw per entry.
    pub description_lines: usize,
    pub dropped: DroppedItems,
}

// ────────────────────────────────────────────────────────────────────────────
// Operations
// ────────────────────────────────────────────────────────────────────────────

/// Cuts `text` to at most `max_chars` characters, the ellipsis included.
///
/// Text already within budget comes back unchanged, which makes the operation idempotent.
pub fn truncate_text(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let marker = ELLIPSIS.chars().count();
    if max_chars <= marker {
        return ELLIPSIS.chars().take(max_chars).collect();
    }
    let kept: String = text.chars().take(max_chars - marker).collect();
    let mut out = kept.trim_end().to_string();
    out.push_str(ELLIPSIS);
    out
}

/// Keeps the first `max_lines` non-blank lines. Returns the text and how many lines went.
pub fn cap_lines(text: &str, max_lines: usize) -> (String, usize) {
    let lines: Vec<&str> = text.lines().map(str::trim).filter(|l| !l.is_empty()).collect();
    if lines.len() <= max_lines {
        return (lines.join("\n"), 0);
    }
    let dropped = lines.len() - max_lines;
    let mut kept: Vec<String> = lines[..max_lines].iter().map(|l| l.to_string()).collect();
    if let Some(last) = kept.last_mut() {
        if !last.ends_with(ELLIPSIS) {
            last.push_str(ELLIPSIS);
        }
    }
    (kept.join("\n"), dropped)
}

fn cap_items<T>(items: &mut Vec<T>, max: usize) -> usize {
    let dropped = items.len().saturating_sub(max);
    items.truncate(max);
    dropped
}

/// Produces the bounded copy a renderer draws from.
///
/// Order per entry: highlights are folded into the description as extra lines, lines are
/// capped, then the result is cut to the character budget.
pub fn apply_limits(
    record: &ResumeRecord,
    metrics: &ContentMetrics,
    tier: &SizingTier,
    policy: &LimitPolicy,
) -> LimitedRecord {
    let budgets = policy.budgets_for(metrics);
    let caps = policy.caps;
    let max_lines = policy.lines.for_level(tier.level);
    let mut dropped = DroppedItems::default();
    let mut out = record.clone();

    out.personal_info.summary = truncate_text(record.personal_info.summary.trim(), budgets.summary);

    dropped.experience = cap_items(&mut out.experience, caps.experience);
    for exp in &mut out.experience {
        let mut merged = exp.description.clone();
        for highlight in exp.highlights.drain(..) {
            merged.push('\n');
            merged.push_str(&highlight);
        }
        let (capped, lost) = cap_lines(&merged, max_lines);
        dropped.description_lines += lost;
        exp.description = truncate_text(&capped, budgets.experience);
    }

    dropped.education = cap_items(&mut out.education, caps.education);
    for edu in &mut out.education {
        if let Some(description) = edu.description.take() {
            let (capped, lost) = cap_lines(&description, max_lines);
            dropped.description_lines += lost;
            edu.description = Some(truncate_text(&capped, budgets.education));
        }
    }

    dropped.projects = cap_items(&mut out.projects, caps.projects);
    for project in &mut out.projects {
        let (capped, lost) = cap_lines(&project.description, max_lines);
        dropped.description_lines += lost;
        project.description = truncate_text(&capped, budgets.project);
        dropped.technologies += cap_items(&mut project.technologies, caps.technologies);
    }

    out.skills.retain(|g| !g.category.trim().is_empty() || !g.items.is_empty());
    dropped.skill_categories = cap_items(&mut out.skills, caps.skill_categories);
    for group in &mut out.skills {
        dropped.skill_items += cap_items(&mut group.items, caps.skills_per_category);
    }

    LimitedRecord {
        record: out,
        budgets,
        caps,
        description_lines: max_lines,
        dropped,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::metrics::analyze;
    use crate::layout::tier::{select_tier, BASE, DENSE};
    use crate::models::resume::{Education, Experience, PersonalInfo, Project, SkillGroup};

    fn experience(i: usize, description: &str) -> Experience {
        Experience {
            title: format!("Engineer {i}"),
            company: format!("Company {i}"),
            start_date: "2018".to_string(),
            end_date: Some("2020".to_string()),
            description: description.to_string(),
            ..Default::default()
        }
    }

    fn big_record() -> ResumeRecord {
        ResumeRecord {
            personal_info: PersonalInfo {
                full_name: "Jane Doe".to_string(),
                summary: "s".repeat(900),
                ..Default::default()
            },
            experience: (0..8).map(|i| experience(i, &"word ".repeat(400))).collect(),
            education: (0..5)
                .map(|i| Education {
                    degree: format!("Degree {i}"),
                    school: "School".to_string(),
                    description: Some("d".repeat(400)),
                    ..Default::default()
                })
                .collect(),
            projects: (0..4)
                .map(|i| Project {
                    name: format!("P{i}"),
                    description: "p".repeat(500),
                    technologies: (0..12).map(|t| format!("t{t}")).collect(),
                    ..Default::default()
                })
                .collect(),
            skills: (0..6)
                .map(|i| SkillGroup {
                    category: format!("Cat {i}"),
                    items: (0..20).map(|s| format!("skill{s}")).collect(),
                })
                .collect(),
        }
    }

    #[test]
    fn test_truncate_text_under_budget_is_unchanged() {
        assert_eq!(truncate_text("short", 10), "short");
        assert_eq!(truncate_text("exactly10!", 10), "exactly10!");
    }

    #[test]
    fn test_truncate_text_cuts_with_ellipsis_inside_budget() {
        let cut = truncate_text(&"a".repeat(50), 20);
        assert_eq!(cut.chars().count(), 20);
        assert!(cut.ends_with(ELLIPSIS));
        assert_eq!(truncate_text("abcdef", 2), "..");
    }

    #[test]
    fn test_truncate_text_is_idempotent() {
        for budget in [4, 10, 37, 150, 300] {
            let once = truncate_text(&"lorem ipsum dolor ".repeat(40), budget);
            let twice = truncate_text(&once, budget);
            assert_eq!(once, twice, "budget {budget}");
        }
    }

    #[test]
    fn test_cap_lines_marks_last_kept_line() {
        let (text, lost) = cap_lines("one\ntwo\n\nthree\nfour", 2);
        assert_eq!(text, "one\ntwo...");
        assert_eq!(lost, 2);
        let (same, none) = cap_lines(&text, 2);
        assert_eq!(same, text);
        assert_eq!(none, 0);
    }

    #[test]
    fn test_apply_limits_enforces_every_cap() {
        let record = big_record();
        let metrics = analyze(&record);
        let limited = apply_limits(&record, &metrics, &DENSE, &STANDARD);
        let r = &limited.record;

        assert_eq!(r.experience.len(), 3);
        assert_eq!(r.education.len(), 2);
        assert_eq!(r.projects.len(), 2);
        assert_eq!(r.skills.len(), 3);
        assert!(r.skills.iter().all(|g| g.items.len() <= 9));
        assert!(r.projects.iter().all(|p| p.technologies.len() <= 6));

        assert!(metrics.total > TIGHT_BUDGET_TOTAL);
        assert!(r.personal_info.summary.chars().count() <= STANDARD.tight.summary);
        for exp in &r.experience {
            assert!(exp.description.chars().count() <= STANDARD.tight.experience);
            assert!(exp.description.ends_with(ELLIPSIS));
        }

        assert_eq!(limited.dropped.experience, 5);
        assert_eq!(limited.dropped.education, 3);
        assert_eq!(limited.dropped.projects, 2);
        assert_eq!(limited.dropped.skill_categories, 3);
        assert_eq!(limited.dropped.skill_items, 3 * 11);
        assert_eq!(limited.dropped.technologies, 2 * 6);
    }

    #[test]
    fn test_capped_technologies_are_counted() {
        let record = ResumeRecord {
            projects: vec![Project {
                name: "Ledger".to_string(),
                technologies: (0..12).map(|t| format!("t{t}")).collect(),
                ..Default::default()
            }],
            ..Default::default()
        };
        let metrics = analyze(&record);
        let limited = apply_limits(&record, &metrics, &select_tier(&metrics), &STANDARD);

        assert_eq!(limited.record.projects[0].technologies.len(), STANDARD.caps.technologies);
        assert_eq!(limited.dropped.technologies, 12 - STANDARD.caps.technologies);
        assert_eq!(limited.dropped.total(), limited.dropped.technologies);
    }

    #[test]
    fn test_apply_limits_never_mutates_input() {
        let record = big_record();
        let before = record.clone();
        let metrics = analyze(&record);
        let _ = apply_limits(&record, &metrics, &select_tier(&metrics), &STANDARD);
        assert_eq!(record, before);
    }

    #[test]
    fn test_apply_limits_is_idempotent() {
        let record = big_record();
        let metrics = analyze(&record);
        let tier = select_tier(&metrics);
        let once = apply_limits(&record, &metrics, &tier, &STANDARD);
        let twice = apply_limits(&once.record, &metrics, &tier, &STANDARD);
        assert_eq!(once.record, twice.record);
        assert_eq!(twice.dropped.total(), 0);
    }

    #[test]
    fn test_roomy_budgets_for_small_records() {
        let record = ResumeRecord {
            personal_info: PersonalInfo {
                summary: "x".repeat(450),
                ..Default::default()
            },
            ..Default::default()
        };
        let metrics = analyze(&record);
        let limited = apply_limits(&record, &metrics, &BASE, &STANDARD);
        assert_eq!(limited.budgets, STANDARD.roomy);
        assert_eq!(limited.record.personal_info.summary.len(), 450);
    }

    #[test]
    fn test_highlights_fold_into_description_lines() {
        let mut exp = experience(0, "Led the team");
        exp.highlights = vec!["Cut costs".to_string(), "Shipped v2".to_string()];
        let record = ResumeRecord {
            experience: vec![exp],
            ..Default::default()
        };
        let metrics = analyze(&record);
        let limited = apply_limits(&record, &metrics, &BASE, &STANDARD);
        let out = &limited.record.experience[0];
        assert_eq!(out.description, "Led the team\nCut costs\nShipped v2");
        assert!(out.highlights.is_empty());
    }

    #[test]
    fn test_description_lines_depend_on_tier() {
        let text = "a\nb\nc\nd\ne\nf";
        let record = ResumeRecord {
            experience: vec![experience(0, text)],
            ..Default::default()
        };
        let metrics = analyze(&record);
        let base = apply_limits(&record, &metrics, &BASE, &STANDARD);
        let dense = apply_limits(&record, &metrics, &DENSE, &STANDARD);
        assert_eq!(base.record.experience[0].description.lines().count(), 4);
        assert_eq!(dense.record.experience[0].description.lines().count(), 3);
        assert_eq!(dense.dropped.description_lines, 3);
    }
}
