// Rendering: two layout engines over one display list, and the PDF writer behind them.
// Everything here is synchronous and CPU-bound; HTTP callers run it inside
// tokio::task::spawn_blocking.

pub mod compose;
pub mod draw;
pub mod handlers;
pub mod header;
pub mod pdf;
pub mod procedural;
pub mod structural;

#[cfg(test)]
pub(crate) mod fixtures;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::layout::fit::{analyze_fit, FitReport};
use crate::layout::limits::{apply_limits, LimitedRecord};
use crate::layout::metrics::{analyze, ContentMetrics};
use crate::layout::templates::{descriptor, TemplateDescriptor, TemplateId};
use crate::layout::tier::{select_tier, SizingTier};
use crate::models::resume::ResumeRecord;

use self::draw::PageImage;
use self::pdf::{write_pdf, PdfOptions};
use self::procedural::ProceduralEngine;
use self::structural::StructuralEngine;

// ────────────────────────────────────────────────────────────────────────────
// Errors
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("malformed résumé record: {0}")]
    MalformedInput(String),

    #[error("unknown template: {0}")]
    UnknownTemplate(String),

    #[error("unknown backend: {0} (expected structural or procedural)")]
    UnknownBackend(String),

    #[error("rendering failed: {0}")]
    Backend(String),
}

// ────────────────────────────────────────────────────────────────────────────
// Engines
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// Box flow, snapshotted and scaled to fit.
    Structural,
    /// Absolute drawing with per-region cursors.
    Procedural,
}

impl Backend {
    pub const ALL: [Backend; 2] = [Backend::Structural, Backend::Procedural];

    pub fn as_str(self) -> &'static str {
        match self {
            Backend::Structural => "structural",
            Backend::Procedural => "procedural",
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Backend {
    type Err = RenderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "structural" => Ok(Backend::Structural),
            "procedural" => Ok(Backend::Procedural),
            _ => Err(RenderError::UnknownBackend(s.to_string())),
        }
    }
}

/// A page layout strategy. Both implementations share the metrics, tier and limits stages and
/// differ only in how they turn a bounded record into a `PageImage`.
pub trait LayoutEngine: Send + Sync {
    fn backend(&self) -> Backend;

    fn render(
        &self,
        limited: &LimitedRecord,
        tier: &SizingTier,
        d: &TemplateDescriptor,
    ) -> Result<PageImage, RenderError>;
}

pub fn engine(backend: Backend) -> &'static dyn LayoutEngine {
    match backend {
        Backend::Structural => &StructuralEngine,
        Backend::Procedural => &ProceduralEngine,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Pipeline
// ────────────────────────────────────────────────────────────────────────────

fn stages(record: &ResumeRecord, d: &TemplateDescriptor) -> (ContentMetrics, SizingTier, LimitedRecord) {
    let metrics = analyze(record);
    let tier = select_tier(&metrics);
    let limited = apply_limits(record, &metrics, &tier, &d.limits);
    (metrics, tier, limited)
}

/// Metrics, tier and limits for `record` under template `d`.
pub fn prepare(record: &ResumeRecord, d: &TemplateDescriptor) -> (LimitedRecord, SizingTier) {
    let (_, tier, limited) = stages(record, d);
    (limited, tier)
}

/// Lays out one page without serializing it.
pub fn layout_page(
    record: &ResumeRecord,
    d: &TemplateDescriptor,
    backend: Backend,
) -> Result<(PageImage, FitReport), RenderError> {
    let (metrics, tier, limited) = stages(record, d);
    debug!(
        template = d.id.as_str(),
        %backend,
        total = metrics.total,
        entries = metrics.entry_count(),
        tier = tier.level.as_str(),
        "tier selected"
    );

    let image = engine(backend).render(&limited, &tier, d)?;
    let report = analyze_fit(&image, d.id, backend, tier.level, metrics, &limited.dropped);

    if report.scale < 1.0 {
        warn!(
            template = d.id.as_str(),
            scale = report.scale,
            natural_height = report.natural_height,
            "body scaled to fit"
        );
    }
    if report.dropped.total() > 0 {
        warn!(
            template = d.id.as_str(),
            %backend,
            dropped = ?report.dropped,
            "content left off the page"
        );
    }
    Ok((image, report))
}

#[derive(Debug, Clone)]
pub struct RenderOutput {
    pub pdf: Vec<u8>,
    pub filename: String,
    pub report: FitReport,
}

/// Parses the record, resolves the template and lays out the page.
pub fn render_report(record_json: Value, template_id: &str, backend: Backend) -> Result<FitReport, RenderError> {
    let record = ResumeRecord::from_value(record_json)?;
    let id: TemplateId = template_id.parse()?;
    let (_, report) = layout_page(&record, descriptor(id), backend)?;
    Ok(report)
}

pub fn render_resume(record_json: Value, template_id: &str, backend: Backend) -> Result<RenderOutput, RenderError> {
    render_resume_with(record_json, template_id, backend, true)
}

/// Full pipeline: record JSON in, one-page PDF out.
pub fn render_resume_with(
    record_json: Value,
    template_id: &str,
    backend: Backend,
    compress: bool,
) -> Result<RenderOutput, RenderError> {
    let record = ResumeRecord::from_value(record_json)?;
    let id: TemplateId = template_id.parse()?;
    let (image, report) = layout_page(&record, descriptor(id), backend)?;

    let name = record.personal_info.full_name.trim();
    let options = PdfOptions {
        compress,
        title: if name.is_empty() { "Resume".to_string() } else { format!("{name} - Resume") },
    };
    let pdf = write_pdf(&image, &options)?;

    Ok(RenderOutput {
        pdf,
        filename: suggested_filename(name),
        report,
    })
}

/// Every run of non-alphanumeric characters becomes `_`, then `_resume.pdf` is appended.
pub fn suggested_filename(full_name: &str) -> String {
    if full_name.trim().is_empty() {
        return "resume.pdf".to_string();
    }
    let mut stem = String::with_capacity(full_name.len());
    let mut in_run = false;
    for c in full_name.chars() {
        if c.is_ascii_alphanumeric() {
            stem.push(c);
            in_run = false;
        } else if !in_run {
            stem.push('_');
            in_run = true;
        }
    }
    format!("{stem}_resume.pdf")
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::fit::FitVerdict;
    use crate::layout::geometry::A4;
    use crate::layout::templates::Section;
    use crate::layout::tier::TierLevel;
    use crate::models::resume::{Education, Experience, Project, SkillGroup};
    use crate::render::draw::LayerKind;
    use serde_json::json;

    const CEILING: f32 = 297.0 - 20.0;

    fn every_page(record: &ResumeRecord) -> Vec<(TemplateId, Backend, PageImage, FitReport)> {
        let mut pages = Vec::new();
        for id in TemplateId::ALL {
            for backend in Backend::ALL {
                let (image, report) = layout_page(record, descriptor(id), backend).unwrap();
                pages.push((id, backend, image, report));
            }
        }
        pages
    }

    #[test]
    fn test_page_height_invariant_holds_everywhere() {
        let records = [
            fixtures::typical_record(),
            fixtures::minimal_record(),
            fixtures::dense_record(),
            fixtures::executive_record(),
            fixtures::stress_record(),
        ];
        for record in &records {
            for (id, backend, image, _) in every_page(record) {
                assert!(
                    image.content_bottom() <= CEILING + 1e-3,
                    "{}/{backend} content ends at {}",
                    id.as_str(),
                    image.content_bottom()
                );
                for region in &image.regions {
                    assert!(region.bottom <= CEILING + 1e-3, "{}/{backend} {region:?}", id.as_str());
                }
            }
        }
        assert_eq!(A4.content_bottom(), CEILING);
    }

    #[test]
    fn test_stress_record_respects_caps() {
        let record = fixtures::stress_record();
        for (id, backend, image, report) in every_page(&record) {
            let d = descriptor(id);
            let (limited, _) = prepare(&record, d);
            assert!(limited.record.experience.len() <= d.limits.caps.experience);
            assert!(limited.record.education.len() <= d.limits.caps.education);
            assert!(limited.record.projects.len() <= d.limits.caps.projects);
            assert!(limited.record.skills.len() <= d.limits.caps.skill_categories);
            let drawn = (0..50)
                .filter(|i| image.contains_text(&format!("Principal Engineer {i}")))
                .count();
            assert!(drawn <= d.limits.caps.experience, "{}/{backend} drew {drawn}", id.as_str());
            assert!(report.dropped.experience >= 50 - d.limits.caps.experience);
            assert_eq!(report.verdict, FitVerdict::Truncated);
        }
    }

    #[test]
    fn test_current_role_ends_with_present() {
        for (id, backend, image, _) in every_page(&fixtures::typical_record()) {
            assert!(
                image.texts().iter().any(|t| t.contains("2021-01") && t.contains("Present")),
                "{}/{backend}: {:?}",
                id.as_str(),
                image.texts()
            );
        }
    }

    #[test]
    fn test_stored_end_date_gives_way_to_present_for_current_roles() {
        let mut record = fixtures::typical_record();
        record.experience[0].end_date = Some("2023-05".to_string());
        record.experience[0].current = true;
        for (id, backend, image, _) in every_page(&record) {
            assert!(
                image.texts().iter().any(|t| t.contains("2021-01") && t.contains("Present")),
                "{}/{backend}: {:?}",
                id.as_str(),
                image.texts()
            );
            assert!(!image.contains_text("2023-05"), "{}/{backend}", id.as_str());
        }
    }

    #[test]
    fn test_long_skill_category_stays_inside_the_content_box() {
        let mut record = fixtures::minimal_record();
        record.skills = vec![SkillGroup {
            category: "Platform Engineering ".repeat(7)[..135].to_string(),
            items: vec!["Kafka".to_string(), "Postgres".to_string()],
        }];
        let right = A4.content_right();
        for (id, backend, image, _) in every_page(&record) {
            assert!(image.contains_text("Kafka"), "{}/{backend}: {:?}", id.as_str(), image.texts());
            for layer in image.layers.iter().filter(|l| l.kind != LayerKind::Backdrop) {
                for cmd in &layer.commands {
                    let Some(text) = cmd.text() else { continue };
                    let edge = layer.transform.apply_x(cmd.bounds().right);
                    assert!(
                        edge <= right + 1e-3,
                        "{}/{backend}: {text:?} ends at {edge} past {right}",
                        id.as_str()
                    );
                }
            }
        }
    }

    #[test]
    fn test_capped_technologies_mark_the_page_truncated() {
        let mut record = fixtures::typical_record();
        record.projects[0].technologies = (0..12).map(|t| format!("Tech{t}")).collect();
        for (id, backend, image, report) in every_page(&record) {
            let cap = descriptor(id).limits.caps.technologies;
            assert_eq!(report.dropped.technologies, 12 - cap, "{}/{backend}", id.as_str());
            assert_eq!(report.verdict, FitVerdict::Truncated, "{}/{backend}", id.as_str());
            assert!(!image.contains_text("Tech11"), "{}/{backend}", id.as_str());
        }
    }

    #[test]
    fn test_sections_of_blank_entries_get_no_title() {
        let mut record = fixtures::minimal_record();
        record.experience = vec![Experience {
            title: " ".to_string(),
            ..Default::default()
        }];
        record.education = vec![Education::default()];
        record.projects = vec![Project::default(), Project::default()];
        for (id, backend, image, _) in every_page(&record) {
            let d = descriptor(id);
            for section in [Section::Experience, Section::Education, Section::Projects] {
                let label = d.titles.label(section);
                assert!(
                    !image.texts().contains(&label.as_str()),
                    "{}/{backend} drew an empty {label}",
                    id.as_str()
                );
            }
        }
    }

    #[test]
    fn test_minimal_record_shows_header_and_no_section_titles() {
        for (id, backend, image, report) in every_page(&fixtures::minimal_record()) {
            let d = descriptor(id);
            assert!(image.texts().iter().any(|t| t.to_lowercase().contains("jane doe")));
            assert!(image.contains_text("jane@example.com"));
            for section in [
                Section::Summary,
                Section::Experience,
                Section::Education,
                Section::Projects,
                Section::Skills,
            ] {
                let label = d.titles.label(section);
                assert!(
                    !image.texts().contains(&label.as_str()),
                    "{}/{backend} drew an empty {label}",
                    id.as_str()
                );
            }
            assert_eq!(report.tier, TierLevel::Base);
            assert_eq!(report.verdict, FitVerdict::Fits);
        }
    }

    #[test]
    fn test_dense_record_renders_three_short_roles() {
        let record = fixtures::dense_record();
        for (id, backend, image, report) in every_page(&record) {
            assert_eq!(report.tier, TierLevel::Dense, "{}", id.as_str());
            let (limited, _) = prepare(&record, descriptor(id));
            for exp in &limited.record.experience {
                let chars = exp.description.chars().count();
                assert!(chars <= limited.budgets.experience, "{chars} chars");
            }
            assert_eq!(limited.budgets.experience, descriptor(id).limits.tight.experience);
            let roles = (1..=4).filter(|i| image.contains_text(&format!("Role {i}"))).count();
            assert_eq!(roles, 3, "{}/{backend}", id.as_str());
        }
    }

    #[test]
    fn test_executive_caps_sidebar_and_main_independently() {
        for backend in Backend::ALL {
            let (image, report) =
                layout_page(&fixtures::executive_record(), descriptor(TemplateId::Executive), backend).unwrap();
            assert_eq!(report.dropped.skill_categories, 2, "{backend}");
            assert_eq!(report.dropped.experience, 1, "{backend}");
            assert!(image.contains_text("Director 3"));
            assert!(!image.contains_text("Director 4"));
            let sidebar = image.regions.iter().find(|r| r.region == "sidebar").unwrap();
            let main = image.regions.iter().find(|r| r.region == "main").unwrap();
            assert!(sidebar.bottom <= CEILING + 1e-3 && main.bottom <= CEILING + 1e-3);
        }
    }

    #[test]
    fn test_render_resume_produces_pdf_and_filename() {
        let record = serde_json::to_value(fixtures::typical_record()).unwrap();
        let out = render_resume(record, "Modern", Backend::Structural).unwrap();
        assert!(out.pdf.starts_with(b"%PDF"));
        assert_eq!(out.filename, "Jane_Doe_resume.pdf");
        assert_eq!(out.report.template, TemplateId::Modern);
    }

    #[test]
    fn test_unknown_template_and_backend_are_rejected() {
        let record = serde_json::to_value(fixtures::minimal_record()).unwrap();
        let err = render_resume(record, "fancy", Backend::Procedural).unwrap_err();
        assert!(matches!(err, RenderError::UnknownTemplate(ref t) if t == "fancy"), "{err:?}");
        assert!(matches!("pdfkit".parse::<Backend>(), Err(RenderError::UnknownBackend(_))));
        assert_eq!(" Structural ".parse::<Backend>().unwrap(), Backend::Structural);
    }

    #[test]
    fn test_malformed_records_fail_fast() {
        for bad in [json!([]), json!({}), json!({"personalInfo": "Jane"}), json!({"personalInfo": null})] {
            let err = render_report(bad.clone(), "classic", Backend::Procedural).unwrap_err();
            assert!(matches!(err, RenderError::MalformedInput(_)), "{bad} -> {err:?}");
        }
    }

    #[test]
    fn test_suggested_filename() {
        assert_eq!(suggested_filename("Jane Doe"), "Jane_Doe_resume.pdf");
        assert_eq!(suggested_filename("Mary-Kate  O'Neil"), "Mary_Kate_O_Neil_resume.pdf");
        assert_eq!(suggested_filename("   "), "resume.pdf");
        assert_eq!(suggested_filename(""), "resume.pdf");
    }
}
