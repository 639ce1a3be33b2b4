//! Text shaping both engines share: styles per role, entry text, bullets, and the section
//! title primitive. Nothing here decides where anything goes vertically; each engine owns its
//! own cursor math.

use crate::layout::font_metrics::FontFace;
use crate::layout::templates::{
    DatePlacement, Section, SummaryStyle, TemplateDescriptor, TitleMarker, TitleSpec,
};
use crate::layout::tier::SizingTier;
use crate::layout::wrap::{fit_to_width, text_width, wrap_text};
use crate::models::resume::{
    join_present, present, present_opt, Education, Experience, Project, ResumeRecord,
};
use crate::render::draw::{Canvas, TextStyle};

// ────────────────────────────────────────────────────────────────────────────
// Styles
// ────────────────────────────────────────────────────────────────────────────

/// Every text style a template uses at one tier.
#[derive(Debug, Clone, Copy)]
pub struct Styles {
    pub section_title: TextStyle,
    pub entry_title: TextStyle,
    pub org: TextStyle,
    pub date: TextStyle,
    pub body: TextStyle,
    pub caption: TextStyle,
    pub accent_caption: TextStyle,
    pub label: TextStyle,
}

impl Styles {
    pub fn new(tier: &SizingTier, d: &TemplateDescriptor) -> Self {
        let regular = d.typeface.regular();
        let bold = d.typeface.bold();
        let p = d.palette;
        Self {
            section_title: TextStyle::new(bold, tier.subheading, d.titles.color),
            entry_title: TextStyle::new(bold, tier.body, p.heading),
            org: TextStyle::new(regular, tier.body, d.entries.org_color),
            date: TextStyle::new(regular, tier.caption, d.entries.date_color),
            body: TextStyle::new(regular, tier.body, p.text),
            caption: TextStyle::new(regular, tier.caption, p.muted),
            accent_caption: TextStyle::new(regular, tier.caption, p.accent),
            label: TextStyle::new(bold, tier.body, p.heading),
        }
    }
}

/// Vertical offset that puts `other` on the same baseline as `line`.
pub fn baseline_shift(line: &TextStyle, other: &TextStyle) -> f32 {
    line.baseline_offset() - other.baseline_offset()
}

// ────────────────────────────────────────────────────────────────────────────
// Sections
// ────────────────────────────────────────────────────────────────────────────

/// Blank sections get no heading at all.
pub fn section_has_content(record: &ResumeRecord, section: Section) -> bool {
    match section {
        Section::Summary => present(&record.personal_info.summary).is_some(),
        Section::Experience => record.experience.iter().any(experience_has_text),
        Section::Education => record.education.iter().any(education_has_text),
        Section::Projects => record.projects.iter().any(project_has_text),
        Section::Skills => record
            .skills
            .iter()
            .any(|g| present(&g.category).is_some() || g.items.iter().any(|i| present(i).is_some())),
    }
}

fn any_present<'a>(values: impl IntoIterator<Item = &'a str>) -> bool {
    values.into_iter().any(|v| present(v).is_some())
}

fn experience_has_text(e: &Experience) -> bool {
    e.current
        || present_opt(&e.end_date).is_some()
        || any_present([&e.title, &e.company, &e.location, &e.start_date, &e.description].map(String::as_str))
        || any_present(e.highlights.iter().map(String::as_str))
}

fn education_has_text(e: &Education) -> bool {
    present_opt(&e.description).is_some()
        || present_opt(&e.gpa).is_some()
        || any_present([&e.degree, &e.school, &e.location, &e.graduation_date].map(String::as_str))
}

fn project_has_text(p: &Project) -> bool {
    present(&p.name).is_some()
        || present(&p.description).is_some()
        || [&p.link, &p.start_date, &p.end_date].into_iter().any(|v| present_opt(v).is_some())
        || any_present(p.technologies.iter().map(String::as_str))
}

/// Items a section would have drawn, for drop accounting when a whole section is skipped.
pub fn section_item_count(record: &ResumeRecord, section: Section) -> usize {
    match section {
        Section::Summary => 0,
        Section::Experience => record.experience.len(),
        Section::Education => record.education.len(),
        Section::Projects => record.projects.len(),
        Section::Skills => record.skills.len(),
    }
}

/// Draws a section title with its marker and rule at `(x, y)`. Returns the height used.
pub fn paint_title(
    canvas: &mut Canvas,
    x: f32,
    y: f32,
    width: f32,
    section: Section,
    titles: &TitleSpec,
    style: TextStyle,
) -> f32 {
    let lh = style.line_height_mm();
    let label = fit_to_width(&titles.label(section), style.face, style.size, width);
    let mut text_x = x;
    match titles.marker {
        TitleMarker::Bar(color) => {
            canvas.fill_rect(x, y + lh * 0.2, 1.2, lh * 0.6, 0.0, color);
            text_x = x + 3.0;
        }
        TitleMarker::Dot(color) => canvas.circle(x - 3.5, y + lh / 2.0, 1.3, color),
        TitleMarker::Underlay(color) => {
            let w = style.width(&label) + 3.0;
            canvas.fill_rect(x - 1.5, y + lh * 0.1, w.min(width + 1.5), lh * 0.8, 1.5, color);
        }
        TitleMarker::None | TitleMarker::Prefix(_) => {}
    }
    canvas.text(text_x, y, label, style);
    if let Some(rule) = titles.rule {
        let rule_y = y + lh - rule.width;
        canvas.line(x, rule_y, x + width, rule_y, rule);
    }
    lh
}

// ────────────────────────────────────────────────────────────────────────────
// Entries
// ────────────────────────────────────────────────────────────────────────────

/// One experience, education or project entry as display strings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Entry {
    pub title: String,
    pub subtitle: String,
    pub dates: String,
    /// Caption lines under the subtitle; `true` marks accent-coloured ones (links).
    pub notes: Vec<(String, bool)>,
    pub description: String,
}

impl Entry {
    /// Where the dates actually go. Dates meant for an absent org line move to the title line.
    pub fn date_placement(&self, wanted: DatePlacement) -> DatePlacement {
        match wanted {
            DatePlacement::OrgLine if self.subtitle.is_empty() => DatePlacement::TitleLine,
            other => other,
        }
    }
}

pub fn experience_entry(exp: &Experience, d: &TemplateDescriptor) -> Entry {
    Entry {
        title: exp.title.trim().to_string(),
        subtitle: join_present([exp.company.as_str(), exp.location.as_str()], d.entries.org_separator),
        dates: exp.date_range(d.entries.date_separator),
        notes: Vec::new(),
        description: exp.description.clone(),
    }
}

pub fn education_entry(edu: &Education, d: &TemplateDescriptor) -> Entry {
    let mut dates = edu.graduation_date.trim().to_string();
    if let Some(gpa) = present_opt(&edu.gpa) {
        let gpa = format!("GPA {gpa}");
        dates = join_present([dates.as_str(), gpa.as_str()], " \u{00B7} ");
    }
    Entry {
        title: edu.degree.trim().to_string(),
        subtitle: join_present([edu.school.as_str(), edu.location.as_str()], d.entries.org_separator),
        dates,
        notes: Vec::new(),
        description: edu.description.clone().unwrap_or_default(),
    }
}

pub fn project_entry(project: &Project, d: &TemplateDescriptor) -> Entry {
    let mut notes = Vec::new();
    let tech = join_present(project.technologies.iter().map(String::as_str), " \u{00B7} ");
    if !tech.is_empty() {
        notes.push((tech, false));
    }
    if let Some(link) = present_opt(&project.link) {
        notes.push((link.to_string(), true));
    }
    Entry {
        title: project.name.trim().to_string(),
        subtitle: String::new(),
        dates: project.date_range(d.entries.date_separator),
        notes,
        description: project.description.clone(),
    }
}

/// Entries for a section in display order. Summary and skills are not entries.
pub fn entries_for(record: &ResumeRecord, section: Section, d: &TemplateDescriptor) -> Vec<Entry> {
    match section {
        Section::Experience => record.experience.iter().map(|e| experience_entry(e, d)).collect(),
        Section::Education => record.education.iter().map(|e| education_entry(e, d)).collect(),
        Section::Projects => record.projects.iter().map(|p| project_entry(p, d)).collect(),
        Section::Summary | Section::Skills => Vec::new(),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Free text
// ────────────────────────────────────────────────────────────────────────────

/// One wrapped line of a bulleted description. `indent` is relative to the region edge.
#[derive(Debug, Clone, PartialEq)]
pub struct BulletLine {
    pub indent: f32,
    pub text: String,
}

/// Wraps a description, one bullet per source line, hanging continuation lines under the
/// bullet text. Returns at most `max_lines` lines and how many wrapped lines were cut.
pub fn bullet_lines(
    description: &str,
    bullet: &str,
    style: &TextStyle,
    width: f32,
    max_lines: usize,
) -> (Vec<BulletLine>, usize) {
    let bullet_w = style.width(bullet);
    let mut lines = Vec::new();
    for paragraph in description.lines().filter_map(present) {
        let wrapped = wrap_text(paragraph, style.face, style.size, width - bullet_w);
        for (i, text) in wrapped.into_iter().enumerate() {
            if i == 0 && !bullet.is_empty() {
                lines.push(BulletLine { indent: 0.0, text: format!("{bullet}{text}") });
            } else {
                lines.push(BulletLine { indent: bullet_w, text });
            }
        }
    }
    let clipped = lines.len().saturating_sub(max_lines);
    lines.truncate(max_lines);
    (lines, clipped)
}

/// Summary text as display lines, wrapped to `width`.
pub fn summary_lines(summary: &str, style: SummaryStyle, face: FontFace, size: f32, width: f32) -> Vec<String> {
    match style {
        SummaryStyle::Plain => wrap_text(summary, face, size, width),
        SummaryStyle::DocComment => {
            let gutter = " * ";
            let inner = width - text_width(gutter, face, size);
            let mut lines = vec!["/**".to_string()];
            lines.extend(
                wrap_text(summary, face, size, inner)
                    .into_iter()
                    .map(|l| format!("{gutter}{l}")),
            );
            lines.push(" */".to_string());
            lines
        }
    }
}

/// "Category: " label for the labeled skills layout, empty when the category is blank.
pub fn skill_label(category: &str) -> String {
    present(category).map(|c| format!("{c}: ")).unwrap_or_default()
}

/// Widest share of a line a skill label may take; its items get the rest.
pub const MAX_LABEL_SHARE: f32 = 0.4;

/// Fits a skill label into `MAX_LABEL_SHARE` of `width` and returns it with the hanging indent
/// its items start at. An over-long label is ellipsized and the indent is the full share.
pub fn hanging_label(label: &str, style: &TextStyle, width: f32) -> (String, f32) {
    if label.is_empty() {
        return (String::new(), 0.0);
    }
    let max = width * MAX_LABEL_SHARE;
    let natural = style.width(label);
    if natural <= max {
        return (label.to_string(), natural);
    }
    (fit_to_width(label, style.face, style.size, max), max)
}

pub fn skill_items(items: &[String]) -> Vec<&str> {
    items.iter().filter_map(|i| present(i)).collect()
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
