//! Procedural engine: absolute-position drawing with no implicit flow.
//!
//! Every wrap, column and vertical advance is computed here. Each region with
//! `starts_new_cursor` gets its own cursor; when the next line would cross the content
//! ceiling the region stops and whatever is left is counted as dropped.

use crate::layout::geometry::A4;
use crate::layout::limits::{DroppedItems, LimitedRecord};
use crate::layout::templates::{
    Card, DatePlacement, Region, Section, SkillsLayout, TemplateDescriptor,
};
use crate::layout::tier::SizingTier;
use crate::layout::wrap::{fit_to_width, wrap_text};
use crate::models::resume::{ResumeRecord, SkillGroup};
use crate::render::compose::{
    baseline_shift, bullet_lines, entries_for, hanging_label, paint_title, section_has_content,
    section_item_count, skill_items, skill_label, summary_lines, Entry, Styles,
};
use crate::render::draw::{
    Canvas, Color, DrawCommand, Layer, LayerKind, PageImage, RegionExtent, GRAY_100,
};
use crate::render::header::paint_header;
use crate::render::{Backend, LayoutEngine, RenderError};

const EPSILON: f32 = 1e-3;
const DATE_GAP: f32 = 3.0;
const COLUMN_GAP: f32 = 6.0;
const PILL_PAD: f32 = 2.0;
const PILL_GAP: f32 = 1.5;

pub struct ProceduralEngine;

impl LayoutEngine for ProceduralEngine {
    fn backend(&self) -> Backend {
        Backend::Procedural
    }

    fn render(
        &self,
        limited: &LimitedRecord,
        tier: &SizingTier,
        d: &TemplateDescriptor,
    ) -> Result<PageImage, RenderError> {
        let page = A4;
        let record = &limited.record;
        let mut backdrop = Canvas::new();
        let mut content = Canvas::new();
        paint_header(record, tier, d, &page, &mut backdrop, &mut content);

        let body_top = d.body_top();
        let ceiling = page.content_bottom();
        let mut painter = Painter {
            d,
            tier,
            styles: Styles::new(tier, d),
            max_lines: limited.description_lines,
            dropped: DroppedItems::default(),
        };
        let mut cursors = Cursors::new(body_top);
        let mut extents: Vec<RegionExtent> = Vec::new();

        for placement in d.placements {
            if !section_has_content(record, placement.section) {
                continue;
            }
            let region = d.region(placement.region).ok_or_else(|| {
                RenderError::Backend(format!(
                    "template {} places {:?} in unknown region {}",
                    d.id.as_str(),
                    placement.section,
                    placement.region
                ))
            })?;

            let (start, full) = cursors.start(region);
            let mut pen = Pen {
                x: region.x_offset,
                width: region.width,
                y: start,
                ceiling,
                full,
                bottom: start,
                canvas: &mut content,
            };
            painter.section(&mut pen, placement.section, record);
            let (end, bottom, full) = (pen.y + tier.spacing.section, pen.bottom, pen.full);
            cursors.finish(region, end, full);
            RegionExtent::record(&mut extents, region.id, start, bottom);
        }

        let natural_height = extents
            .iter()
            .map(|e| e.bottom - body_top)
            .fold(0.0, f32::max);

        Ok(PageImage {
            width: page.width,
            height: page.height,
            layers: vec![
                Layer::direct(LayerKind::Backdrop, page.width, page.height, backdrop),
                Layer::direct(LayerKind::Content, page.width, page.height, content),
            ],
            body_top,
            regions: extents,
            dropped: painter.dropped,
            scale: 1.0,
            natural_height,
        })
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Cursors
// ────────────────────────────────────────────────────────────────────────────

struct Fork {
    region: &'static str,
    y: f32,
    full: bool,
}

/// The shared flow cursor plus one forked cursor per independent region.
struct Cursors {
    flow: f32,
    flow_full: bool,
    forks: Vec<Fork>,
}

impl Cursors {
    fn new(top: f32) -> Self {
        Self {
            flow: top,
            flow_full: false,
            forks: Vec::new(),
        }
    }

    /// Where `region` continues, and whether it already ran out of page.
    fn start(&mut self, region: &Region) -> (f32, bool) {
        if region.starts_new_cursor {
            if let Some(fork) = self.forks.iter().find(|f| f.region == region.id) {
                return (fork.y, fork.full);
            }
            self.forks.push(Fork {
                region: region.id,
                y: self.flow,
                full: self.flow_full,
            });
            return (self.flow, self.flow_full);
        }
        // Flow resumes below the tallest fork; later forks start fresh from there.
        if !self.forks.is_empty() {
            self.flow = self.forks.iter().map(|f| f.y).fold(self.flow, f32::max);
            self.forks.clear();
        }
        (self.flow, self.flow_full)
    }

    fn finish(&mut self, region: &Region, y: f32, full: bool) {
        if region.starts_new_cursor {
            if let Some(fork) = self.forks.iter_mut().find(|f| f.region == region.id) {
                fork.y = y;
                fork.full = full;
            }
        } else {
            self.flow = y;
            self.flow_full = full;
        }
    }
}

/// Cursor inside one region.
struct Pen<'c> {
    x: f32,
    width: f32,
    y: f32,
    ceiling: f32,
    full: bool,
    /// Lowest y anything was drawn to.
    bottom: f32,
    canvas: &'c mut Canvas,
}

impl Pen<'_> {
    fn right(&self) -> f32 {
        self.x + self.width
    }

    /// True when `h` more millimetres fit under the ceiling. Once false, stays false.
    fn claim(&mut self, h: f32) -> bool {
        if self.full || self.y + h > self.ceiling + EPSILON {
            self.full = true;
            return false;
        }
        true
    }

    fn advance(&mut self, h: f32) {
        self.y += h;
        self.bottom = self.bottom.max(self.y);
    }

    fn gap(&mut self, h: f32) {
        self.y += h;
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Section painters
// ────────────────────────────────────────────────────────────────────────────

struct Painter<'a> {
    d: &'a TemplateDescriptor,
    tier: &'a SizingTier,
    styles: Styles,
    max_lines: usize,
    dropped: DroppedItems,
}

impl Painter<'_> {
    fn section(&mut self, pen: &mut Pen, section: Section, record: &ResumeRecord) {
        match section {
            Section::Summary => self.summary(pen, &record.personal_info.summary),
            Section::Skills => self.skills(pen, &record.skills),
            _ => {
                let entries = entries_for(record, section, self.d);
                debug_assert_eq!(entries.len(), section_item_count(record, section));
                self.entries(pen, section, &entries);
            }
        }
    }

    fn drop_items(&mut self, section: Section, n: usize) {
        match section {
            Section::Experience => self.dropped.experience += n,
            Section::Education => self.dropped.education += n,
            Section::Projects => self.dropped.projects += n,
            Section::Skills => self.dropped.skill_categories += n,
            Section::Summary => self.dropped.description_lines += n,
        }
    }

    /// Title plus the first content line must fit, otherwise the section is skipped whole.
    fn open_section(&mut self, pen: &mut Pen, section: Section, first_line: f32) -> bool {
        let style = self.styles.section_title;
        if !pen.claim(style.line_height_mm() + first_line) {
            return false;
        }
        let h = paint_title(pen.canvas, pen.x, pen.y, pen.width, section, &self.d.titles, style);
        pen.advance(h);
        true
    }

    fn summary(&mut self, pen: &mut Pen, summary: &str) {
        let body = self.styles.body;
        let lh = body.line_height_mm();
        let lines = summary_lines(summary, self.d.summary, body.face, body.size, pen.width);
        if !self.open_section(pen, Section::Summary, lh) {
            self.drop_items(Section::Summary, lines.len());
            return;
        }
        for (i, line) in lines.iter().enumerate() {
            if !pen.claim(lh) {
                self.dropped.description_lines += lines.len() - i;
                return;
            }
            pen.canvas.text(pen.x, pen.y, line.as_str(), body);
            pen.advance(lh);
        }
    }

    fn entries(&mut self, pen: &mut Pen, section: Section, entries: &[Entry]) {
        let first = self.styles.entry_title.line_height_mm();
        if !self.open_section(pen, section, first) {
            self.drop_items(section, entries.len());
            return;
        }
        let card = match section {
            Section::Experience => self.d.entries.card,
            _ => None,
        };
        for (i, entry) in entries.iter().enumerate() {
            if i > 0 {
                pen.gap(self.tier.spacing.item);
            }
            if !self.entry(pen, entry, card) {
                self.drop_items(section, entries.len() - i);
                return;
            }
        }
    }

    /// Draws one entry. False when not even its first line fit.
    fn entry(&mut self, pen: &mut Pen, entry: &Entry, card: Option<Card>) -> bool {
        let s = self.styles;
        let spec = self.d.entries;
        let pad = card.map_or(0.0, |c| c.padding);
        let title_lh = s.entry_title.line_height_mm();
        if !pen.claim(pad + title_lh) {
            return false;
        }

        let top = pen.y;
        let x = pen.x + pad;
        let right = pen.right() - pad;
        let width = right - x;
        let placement = entry.date_placement(spec.dates);
        let mut scratch = Canvas::new();
        pen.gap(pad);

        // Title line, dates right-aligned against the measured width.
        let mut title_room = width;
        if placement == DatePlacement::TitleLine && !entry.dates.is_empty() {
            let dy = baseline_shift(&s.entry_title, &s.date);
            scratch.text_right(right, pen.y + dy, &entry.dates, s.date);
            title_room -= s.date.width(&entry.dates) + DATE_GAP;
        }
        if let Some(color) = spec.marker {
            scratch.circle(x - 3.5, pen.y + title_lh / 2.0, 1.0, color);
        }
        let title = fit_to_width(&entry.title, s.entry_title.face, s.entry_title.size, title_room.max(1.0));
        scratch.text(x, pen.y, title, s.entry_title);
        pen.advance(title_lh);

        let org_lh = s.org.line_height_mm();
        if !entry.subtitle.is_empty() && pen.claim(org_lh) {
            let mut room = width;
            if placement == DatePlacement::OrgLine && !entry.dates.is_empty() {
                let dy = baseline_shift(&s.org, &s.date);
                scratch.text_right(right, pen.y + dy, &entry.dates, s.date);
                room -= s.date.width(&entry.dates) + DATE_GAP;
            }
            let subtitle = fit_to_width(&entry.subtitle, s.org.face, s.org.size, room.max(1.0));
            scratch.text(x, pen.y, subtitle, s.org);
            pen.advance(org_lh);
        }

        let date_lh = s.date.line_height_mm();
        if placement == DatePlacement::OwnLine && !entry.dates.is_empty() && pen.claim(date_lh) {
            scratch.text(x, pen.y, entry.dates.as_str(), s.date);
            pen.advance(date_lh);
        }

        for (note, accent) in &entry.notes {
            let style = if *accent { s.accent_caption } else { s.caption };
            let lh = style.line_height_mm();
            if !pen.claim(lh) {
                break;
            }
            scratch.text(x, pen.y, fit_to_width(note, style.face, style.size, width), style);
            pen.advance(lh);
        }

        let body_lh = s.body.line_height_mm();
        let (lines, clipped) = bullet_lines(&entry.description, spec.bullet, &s.body, width, self.max_lines);
        self.dropped.description_lines += clipped;
        for (i, line) in lines.iter().enumerate() {
            if !pen.claim(body_lh) {
                self.dropped.description_lines += lines.len() - i;
                break;
            }
            scratch.text(x + line.indent, pen.y, line.text.as_str(), s.body);
            pen.advance(body_lh);
        }

        if let Some(card) = card {
            let bottom = (pen.y + pad).min(pen.ceiling);
            pen.y = bottom;
            pen.bottom = pen.bottom.max(bottom);
            pen.canvas.push(DrawCommand::Rect {
                x: pen.x,
                y: top,
                width: pen.width,
                height: bottom - top,
                radius: 1.5,
                fill: Some(card.fill),
                stroke: card.stroke,
            });
        }
        pen.canvas.append(scratch);
        true
    }

    fn skills(&mut self, pen: &mut Pen, groups: &[SkillGroup]) {
        let groups: Vec<&SkillGroup> = groups
            .iter()
            .filter(|g| !skill_label(&g.category).is_empty() || !skill_items(&g.items).is_empty())
            .collect();
        let first = self.styles.label.line_height_mm();
        if !self.open_section(pen, Section::Skills, first) {
            self.drop_items(Section::Skills, groups.len());
            return;
        }
        match self.d.skills {
            SkillsLayout::Labeled { separator } => self.skills_labeled(pen, &groups, separator),
            SkillsLayout::Columns { count, separator } => {
                self.skills_columns(pen, &groups, count.max(1), separator)
            }
            SkillsLayout::Badges { fills, text } => self.skills_badges(pen, &groups, fills, text),
            SkillsLayout::Bullets { bullet } => self.skills_bullets(pen, &groups, bullet),
        }
    }

    fn skills_labeled(&mut self, pen: &mut Pen, groups: &[&SkillGroup], separator: &str) {
        let s = self.styles;
        let lh = s.body.line_height_mm();
        for (i, group) in groups.iter().enumerate() {
            let (label, indent) =
                hanging_label(&skill_label(&group.category), &s.label, pen.width);
            let items = skill_items(&group.items).join(separator);
            let lines = wrap_text(&items, s.body.face, s.body.size, (pen.width - indent).max(10.0));
            if !pen.claim(lh) {
                self.dropped.skill_categories += groups.len() - i;
                return;
            }
            pen.canvas.text(pen.x, pen.y, label, s.label);
            if lines.is_empty() {
                pen.advance(lh);
                continue;
            }
            for (j, line) in lines.iter().enumerate() {
                if j > 0 && !pen.claim(lh) {
                    self.dropped.skill_items += items_in(&lines[j..].join(" "), separator);
                    self.dropped.skill_categories += groups.len() - i - 1;
                    return;
                }
                pen.canvas.text(pen.x + indent, pen.y, line.as_str(), s.body);
                pen.advance(lh);
            }
        }
    }

    fn skills_columns(&mut self, pen: &mut Pen, groups: &[&SkillGroup], count: usize, separator: &str) {
        let s = self.styles;
        let label_lh = s.label.line_height_mm();
        let lh = s.body.line_height_mm();
        let col_w = (pen.width - COLUMN_GAP * (count - 1) as f32) / count as f32;

        for (row_index, row) in groups.chunks(count).enumerate() {
            if row_index > 0 {
                pen.gap(self.tier.spacing.paragraph / 2.0);
            }
            let cells: Vec<(String, Vec<String>)> = row
                .iter()
                .map(|g| {
                    let label = fit_to_width(&g.category, s.label.face, s.label.size, col_w);
                    let items = skill_items(&g.items).join(separator);
                    (label, wrap_text(&items, s.body.face, s.body.size, col_w))
                })
                .collect();
            let row_h = cells
                .iter()
                .map(|(label, lines)| {
                    let head = if label.is_empty() { 0.0 } else { label_lh };
                    head + lines.len() as f32 * lh
                })
                .fold(0.0, f32::max);
            if !pen.claim(row_h) {
                self.dropped.skill_categories += groups.len() - row_index * count;
                return;
            }
            for (c, (label, lines)) in cells.into_iter().enumerate() {
                let cx = pen.x + c as f32 * (col_w + COLUMN_GAP);
                let mut cy = pen.y;
                if !label.is_empty() {
                    pen.canvas.text(cx, cy, label, s.label.with_color(self.d.palette.accent));
                    cy += label_lh;
                }
                for line in lines {
                    pen.canvas.text(cx, cy, line, s.body);
                    cy += lh;
                }
            }
            pen.advance(row_h);
        }
    }

    fn skills_badges(
        &mut self,
        pen: &mut Pen,
        groups: &[&SkillGroup],
        fills: &[Color],
        text: Color,
    ) {
        let s = self.styles;
        let label_lh = s.label.line_height_mm();
        let caption = s.caption.with_color(text);
        let pill_h = caption.line_height_mm() + 1.2;

        for (i, group) in groups.iter().enumerate() {
            if i > 0 {
                pen.gap(self.tier.spacing.paragraph / 2.0);
            }
            let remaining_groups = groups.len() - i - 1;
            if !group.category.trim().is_empty() {
                if !pen.claim(label_lh) {
                    self.dropped.skill_categories += remaining_groups + 1;
                    return;
                }
                let label = fit_to_width(&group.category, s.label.face, s.label.size, pen.width);
                pen.canvas.text(pen.x, pen.y, label, s.label);
                pen.advance(label_lh);
            }

            let items = skill_items(&group.items);
            let mut px = pen.x;
            let mut row_open = false;
            for (k, item) in items.iter().enumerate() {
                let label = fit_to_width(item, caption.face, caption.size, pen.width - 2.0 * PILL_PAD);
                let w = caption.width(&label) + 2.0 * PILL_PAD;
                if row_open && px + w > pen.right() + EPSILON {
                    pen.advance(pill_h);
                    pen.gap(PILL_GAP);
                    px = pen.x;
                    row_open = false;
                }
                if !row_open {
                    if !pen.claim(pill_h) {
                        self.dropped.skill_items += items.len() - k;
                        self.dropped.skill_categories += remaining_groups;
                        return;
                    }
                    row_open = true;
                }
                let fill = fills.get(k % fills.len().max(1)).copied().unwrap_or(GRAY_100);
                pen.canvas.fill_rect(px, pen.y, w, pill_h, pill_h / 2.0, fill);
                pen.canvas.text(px + PILL_PAD, pen.y + 0.6, label, caption);
                px += w + PILL_GAP;
            }
            if row_open {
                pen.advance(pill_h);
            }
        }
    }

    fn skills_bullets(&mut self, pen: &mut Pen, groups: &[&SkillGroup], bullet: &str) {
        let s = self.styles;
        let label_lh = s.label.line_height_mm();
        let lh = s.body.line_height_mm();
        for (i, group) in groups.iter().enumerate() {
            if i > 0 {
                pen.gap(self.tier.spacing.paragraph / 2.0);
            }
            if !group.category.trim().is_empty() {
                if !pen.claim(label_lh) {
                    self.dropped.skill_categories += groups.len() - i;
                    return;
                }
                let label = fit_to_width(&group.category, s.label.face, s.label.size, pen.width);
                pen.canvas.text(pen.x, pen.y, label, s.label);
                pen.advance(label_lh);
            }
            let items = skill_items(&group.items);
            for (k, item) in items.iter().enumerate() {
                if !pen.claim(lh) {
                    self.dropped.skill_items += items.len() - k;
                    self.dropped.skill_categories += groups.len() - i - 1;
                    return;
                }
                let line = fit_to_width(&format!("{bullet}{item}"), s.body.face, s.body.size, pen.width);
                pen.canvas.text(pen.x, pen.y, line, s.body);
                pen.advance(lh);
            }
        }
    }
}

/// How many list items a run of joined skill text holds.
fn items_in(text: &str, separator: &str) -> usize {
    match separator.trim() {
        "" => text.split_whitespace().count(),
        sep => text.split(sep).filter(|s| !s.trim().is_empty()).count(),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::templates::{descriptor, TemplateId};
    use crate::render::fixtures;
    use crate::render::prepare;

    fn render(record: &ResumeRecord, id: TemplateId) -> PageImage {
        let (limited, tier) = prepare(record, descriptor(id));
        ProceduralEngine
            .render(&limited, &tier, descriptor(id))
            .unwrap()
    }

    #[test]
    fn test_cursors_fork_from_flow_and_resume_below_tallest() {
        let d = descriptor(TemplateId::Technical);
        let intro = d.region("intro").unwrap();
        let sidebar = d.region("sidebar").unwrap();
        let main = d.region("main").unwrap();

        let mut cursors = Cursors::new(60.0);
        assert_eq!(cursors.start(intro), (60.0, false));
        cursors.finish(intro, 80.0, false);
        assert_eq!(cursors.start(sidebar), (80.0, false));
        cursors.finish(sidebar, 150.0, false);
        assert_eq!(cursors.start(main), (80.0, false));
        cursors.finish(main, 200.0, true);
        assert_eq!(cursors.start(main), (200.0, true));
        assert_eq!(cursors.start(sidebar), (150.0, false));
        assert_eq!(cursors.start(intro), (200.0, false));
    }

    #[test]
    fn test_pen_claim_is_sticky() {
        let mut canvas = Canvas::new();
        let mut pen = Pen {
            x: 20.0,
            width: 170.0,
            y: 270.0,
            ceiling: 277.0,
            full: false,
            bottom: 270.0,
            canvas: &mut canvas,
        };
        assert!(pen.claim(5.0));
        assert!(!pen.claim(10.0));
        assert!(!pen.claim(1.0), "a stopped region stays stopped");
    }

    #[test]
    fn test_dates_are_right_aligned_to_region_edge() {
        let record = fixtures::typical_record();
        for id in [TemplateId::Classic, TemplateId::Executive, TemplateId::Technical] {
            let image = render(&record, id);
            let d = descriptor(id);
            let main = d.region("main").unwrap();
            let pad = d.entries.card.map_or(0.0, |c| c.padding);
            let date = image.layers[1]
                .commands
                .iter()
                .find(|c| c.text().is_some_and(|t| t.starts_with("2021")))
                .map(DrawCommand::bounds);
            if d.entries.dates == DatePlacement::OwnLine {
                let b = date.unwrap();
                assert!((b.left - main.x_offset).abs() < 1e-3);
            } else {
                let b = date.unwrap();
                assert!(
                    (b.right - (main.right_edge() - pad)).abs() < 1e-3,
                    "{}: date ends at {}",
                    id.as_str(),
                    b.right
                );
            }
        }
    }

    #[test]
    fn test_stress_record_stops_at_ceiling_and_counts_drops() {
        let record = fixtures::stress_record();
        for id in TemplateId::ALL {
            let image = render(&record, id);
            assert!(
                image.content_bottom() <= A4.content_bottom() + 1e-3,
                "{} overflowed to {}",
                id.as_str(),
                image.content_bottom()
            );
            assert_eq!(image.scale, 1.0);
        }
    }

    #[test]
    fn test_two_column_regions_have_independent_extents() {
        let image = render(&fixtures::executive_record(), TemplateId::Executive);
        let sidebar = image.regions.iter().find(|r| r.region == "sidebar").unwrap();
        let main = image.regions.iter().find(|r| r.region == "main").unwrap();
        assert_eq!(sidebar.top, main.top, "both columns fork at the body top");
        assert!(sidebar.bottom <= A4.content_bottom() + 1e-3);
        assert!(main.bottom <= A4.content_bottom() + 1e-3);
    }

    #[test]
    fn test_items_in_counts_by_separator() {
        assert_eq!(items_in("Rust, Go, SQL", ", "), 3);
        assert_eq!(items_in("Rust Go", " "), 2);
        assert_eq!(items_in("", ", "), 0);
    }

    #[test]
    fn test_card_sits_under_entry_text() {
        let image = render(&fixtures::typical_record(), TemplateId::Technical);
        let commands = &image.layers[1].commands;
        let card = commands
            .iter()
            .position(|c| matches!(c, DrawCommand::Rect { fill: Some(_), .. }))
            .unwrap();
        let title = commands
            .iter()
            .position(|c| c.text() == Some("Senior Engineer"))
            .unwrap();
        assert!(card < title, "card must be painted before its text");
    }
}
