//! Structural engine: the body is a tree of boxes that flows top to bottom with no page limit.
//!
//! The flowed tree is recorded once in local coordinates, measured, and then placed under the
//! header as a single snapshot scaled by `min(1, available / natural)`. Nothing is dropped for
//! lack of room here; the scale absorbs overflow.

use std::mem;

use crate::layout::geometry::A4;
use crate::layout::limits::{DroppedItems, LimitedRecord};
use crate::layout::templates::{
    Card, DatePlacement, Region, Section, SkillsLayout, SummaryStyle, TemplateDescriptor,
};
use crate::layout::tier::SizingTier;
use crate::layout::wrap::{fit_to_width, wrap_text};
use crate::models::resume::ResumeRecord;
use crate::render::compose::{
    baseline_shift, bullet_lines, entries_for, hanging_label, paint_title, section_has_content,
    skill_items, skill_label, summary_lines, Entry, Styles,
};
use crate::render::draw::{
    Canvas, Color, DrawCommand, Layer, LayerKind, PageImage, RegionExtent, TextStyle, Transform,
    GRAY_100,
};
use crate::render::header::paint_header;
use crate::render::{Backend, LayoutEngine, RenderError};

const DATE_GAP: f32 = 3.0;
const COLUMN_GAP: f32 = 6.0;
const PILL_PAD: f32 = 2.0;
const PILL_GAP: f32 = 1.5;

pub struct StructuralEngine;

impl LayoutEngine for StructuralEngine {
    fn backend(&self) -> Backend {
        Backend::Structural
    }

    fn render(
        &self,
        limited: &LimitedRecord,
        tier: &SizingTier,
        d: &TemplateDescriptor,
    ) -> Result<PageImage, RenderError> {
        let page = A4;
        let mut backdrop = Canvas::new();
        let mut header = Canvas::new();
        paint_header(&limited.record, tier, d, &page, &mut backdrop, &mut header);

        let body = build_body(&limited.record, tier, d, limited.description_lines)?;
        let mut flow = Flow::new(d, Styles::new(tier, d));
        flow.place(&body, 0.0, 0.0, page.width);

        let natural = flow
            .canvas
            .commands()
            .iter()
            .map(|c| c.bounds().bottom)
            .fold(0.0, f32::max);
        let body_top = d.body_top();
        let available = page.available_below(body_top);
        let scale = if natural > available { available / natural } else { 1.0 };
        let transform = Transform {
            dx: page.width * (1.0 - scale) / 2.0,
            dy: body_top,
            scale,
        };

        let regions = flow
            .extents
            .iter()
            .map(|e| RegionExtent {
                region: e.region.clone(),
                top: transform.apply_y(e.top),
                bottom: transform.apply_y(e.bottom),
            })
            .collect();

        Ok(PageImage {
            width: page.width,
            height: page.height,
            layers: vec![
                Layer::direct(LayerKind::Backdrop, page.width, page.height, backdrop),
                Layer::direct(LayerKind::Content, page.width, page.height, header),
                Layer {
                    kind: LayerKind::Snapshot,
                    transform,
                    width: page.width,
                    height: natural,
                    commands: flow.canvas.into_commands(),
                },
            ],
            body_top,
            regions,
            dropped: flow.dropped,
            scale,
            natural_height: natural,
        })
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Box tree
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
enum Node {
    /// Children top to bottom with `gap` between them.
    Stack { children: Vec<Node>, gap: f32 },
    /// A named region at an absolute x; its extent is recorded.
    Region {
        id: &'static str,
        x: f32,
        width: f32,
        child: Box<Node>,
    },
    /// Regions side by side. Height is the tallest.
    Row(Vec<Node>),
    Title { section: Section },
    /// One line cut to the available width.
    Line { text: String, style: TextStyle },
    /// Left text with right-aligned text on the same baseline.
    Split {
        left: String,
        left_style: TextStyle,
        right: String,
        right_style: TextStyle,
        marker: Option<Color>,
    },
    Summary { text: String, style: SummaryStyle },
    Bullets {
        text: String,
        bullet: &'static str,
        max_lines: usize,
    },
    /// Bold label followed by text that wraps under itself.
    Hanging { label: String, text: String },
    Grid {
        columns: usize,
        row_gap: f32,
        cells: Vec<Node>,
    },
    Pills {
        items: Vec<String>,
        fills: &'static [Color],
        text: Color,
    },
    Card { card: Card, child: Box<Node> },
}

fn stack(children: Vec<Node>, gap: f32) -> Node {
    Node::Stack { children, gap }
}

fn region_node(region: &Region, sections: Vec<Node>, gap: f32) -> Node {
    Node::Region {
        id: region.id,
        x: region.x_offset,
        width: region.width,
        child: Box::new(stack(sections, gap)),
    }
}

/// Groups placements into flow regions and rows of side-by-side regions, in placement order.
fn build_body(
    record: &ResumeRecord,
    tier: &SizingTier,
    d: &TemplateDescriptor,
    max_lines: usize,
) -> Result<Node, RenderError> {
    let styles = Styles::new(tier, d);
    let gap = tier.spacing.section;
    let mut blocks: Vec<Node> = Vec::new();
    let mut flow: Option<(&Region, Vec<Node>)> = None;
    let mut row: Vec<(&Region, Vec<Node>)> = Vec::new();

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
        let node = section_node(record, placement.section, tier, d, &styles, max_lines);

        if region.starts_new_cursor {
            if let Some((r, sections)) = flow.take() {
                blocks.push(region_node(r, sections, gap));
            }
            match row.iter_mut().find(|(r, _)| r.id == region.id) {
                Some((_, sections)) => sections.push(node),
                None => row.push((region, vec![node])),
            }
        } else {
            if !row.is_empty() {
                let regions = row.drain(..).map(|(r, s)| region_node(r, s, gap)).collect();
                blocks.push(Node::Row(regions));
            }
            match &mut flow {
                Some((r, sections)) if r.id == region.id => sections.push(node),
                _ => {
                    if let Some((r, sections)) = flow.take() {
                        blocks.push(region_node(r, sections, gap));
                    }
                    flow = Some((region, vec![node]));
                }
            }
        }
    }
    if let Some((r, sections)) = flow {
        blocks.push(region_node(r, sections, gap));
    }
    if !row.is_empty() {
        blocks.push(Node::Row(row.into_iter().map(|(r, s)| region_node(r, s, gap)).collect()));
    }
    Ok(stack(blocks, gap))
}

fn section_node(
    record: &ResumeRecord,
    section: Section,
    tier: &SizingTier,
    d: &TemplateDescriptor,
    styles: &Styles,
    max_lines: usize,
) -> Node {
    let mut children = vec![Node::Title { section }];
    match section {
        Section::Summary => children.push(Node::Summary {
            text: record.personal_info.summary.clone(),
            style: d.summary,
        }),
        Section::Skills => children.push(skills_node(record, tier, d, styles)),
        _ => {
            let card = match section {
                Section::Experience => d.entries.card,
                _ => None,
            };
            let entries = entries_for(record, section, d)
                .iter()
                .map(|e| entry_node(e, d, styles, max_lines, card))
                .collect();
            children.push(stack(entries, tier.spacing.item));
        }
    }
    stack(children, 0.0)
}

fn entry_node(
    entry: &Entry,
    d: &TemplateDescriptor,
    s: &Styles,
    max_lines: usize,
    card: Option<Card>,
) -> Node {
    let spec = d.entries;
    let placement = entry.date_placement(spec.dates);
    let dates_on = |p: DatePlacement| if placement == p { entry.dates.clone() } else { String::new() };
    let mut lines = vec![Node::Split {
        left: entry.title.clone(),
        left_style: s.entry_title,
        right: dates_on(DatePlacement::TitleLine),
        right_style: s.date,
        marker: spec.marker,
    }];
    if !entry.subtitle.is_empty() {
        lines.push(Node::Split {
            left: entry.subtitle.clone(),
            left_style: s.org,
            right: dates_on(DatePlacement::OrgLine),
            right_style: s.date,
            marker: None,
        });
    }
    if placement == DatePlacement::OwnLine && !entry.dates.is_empty() {
        lines.push(Node::Line {
            text: entry.dates.clone(),
            style: s.date,
        });
    }
    for (note, accent) in &entry.notes {
        lines.push(Node::Line {
            text: note.clone(),
            style: if *accent { s.accent_caption } else { s.caption },
        });
    }
    lines.push(Node::Bullets {
        text: entry.description.clone(),
        bullet: spec.bullet,
        max_lines,
    });

    let body = stack(lines, 0.0);
    match card {
        Some(card) => Node::Card {
            card,
            child: Box::new(body),
        },
        None => body,
    }
}

fn skills_node(record: &ResumeRecord, tier: &SizingTier, d: &TemplateDescriptor, s: &Styles) -> Node {
    let groups = record
        .skills
        .iter()
        .filter(|g| !skill_label(&g.category).is_empty() || !skill_items(&g.items).is_empty());
    let label = |category: &str, style: TextStyle| -> Option<Node> {
        (!category.trim().is_empty()).then(|| Node::Line {
            text: category.trim().to_string(),
            style,
        })
    };
    let group_gap = tier.spacing.paragraph / 2.0;

    match d.skills {
        SkillsLayout::Labeled { separator } => stack(
            groups
                .map(|g| Node::Hanging {
                    label: skill_label(&g.category),
                    text: skill_items(&g.items).join(separator),
                })
                .collect(),
            0.0,
        ),
        SkillsLayout::Columns { count, separator } => Node::Grid {
            columns: count.max(1),
            row_gap: group_gap,
            cells: groups
                .map(|g| {
                    let mut cell: Vec<Node> =
                        label(&g.category, s.label.with_color(d.palette.accent)).into_iter().collect();
                    let items = skill_items(&g.items).join(separator);
                    if !items.is_empty() {
                        cell.push(Node::Bullets {
                            text: items,
                            bullet: "",
                            max_lines: usize::MAX,
                        });
                    }
                    stack(cell, 0.0)
                })
                .collect(),
        },
        SkillsLayout::Badges { fills, text } => stack(
            groups
                .map(|g| {
                    let mut cell: Vec<Node> = label(&g.category, s.label).into_iter().collect();
                    cell.push(Node::Pills {
                        items: skill_items(&g.items).iter().map(|i| i.to_string()).collect(),
                        fills,
                        text,
                    });
                    stack(cell, 0.0)
                })
                .collect(),
            group_gap,
        ),
        SkillsLayout::Bullets { bullet } => stack(
            groups
                .map(|g| {
                    let mut cell: Vec<Node> = label(&g.category, s.label).into_iter().collect();
                    cell.extend(skill_items(&g.items).iter().map(|item| Node::Line {
                        text: format!("{bullet}{item}"),
                        style: s.body,
                    }));
                    stack(cell, 0.0)
                })
                .collect(),
            group_gap,
        ),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Flow
// ────────────────────────────────────────────────────────────────────────────

/// Places a tree into local coordinates. Returns heights; never refuses space.
struct Flow<'a> {
    d: &'a TemplateDescriptor,
    styles: Styles,
    canvas: Canvas,
    extents: Vec<RegionExtent>,
    dropped: DroppedItems,
}

impl<'a> Flow<'a> {
    fn new(d: &'a TemplateDescriptor, styles: Styles) -> Self {
        Self {
            d,
            styles,
            canvas: Canvas::new(),
            extents: Vec::new(),
            dropped: DroppedItems::default(),
        }
    }

    fn place(&mut self, node: &Node, x: f32, y: f32, width: f32) -> f32 {
        let s = self.styles;
        match node {
            Node::Stack { children, gap } => {
                let mut h = 0.0;
                for (i, child) in children.iter().enumerate() {
                    if i > 0 {
                        h += gap;
                    }
                    h += self.place(child, x, y + h, width);
                }
                h
            }
            Node::Region { id, x, width, child } => {
                let h = self.place(child, *x, y, *width);
                RegionExtent::record(&mut self.extents, id, y, y + h);
                h
            }
            Node::Row(regions) => regions
                .iter()
                .map(|r| self.place(r, x, y, width))
                .fold(0.0, f32::max),
            Node::Title { section } => {
                paint_title(&mut self.canvas, x, y, width, *section, &self.d.titles, s.section_title)
            }
            Node::Line { text, style } => {
                self.canvas.text(x, y, fit_to_width(text, style.face, style.size, width), *style);
                style.line_height_mm()
            }
            Node::Split {
                left,
                left_style,
                right,
                right_style,
                marker,
            } => {
                let lh = left_style.line_height_mm();
                let mut room = width;
                if !right.is_empty() {
                    let dy = baseline_shift(left_style, right_style);
                    self.canvas.text_right(x + width, y + dy, right, *right_style);
                    room -= right_style.width(right) + DATE_GAP;
                }
                if let Some(color) = marker {
                    self.canvas.circle(x - 3.5, y + lh / 2.0, 1.0, *color);
                }
                let left = fit_to_width(left, left_style.face, left_style.size, room.max(1.0));
                self.canvas.text(x, y, left, *left_style);
                lh
            }
            Node::Summary { text, style } => {
                let body = s.body;
                let lh = body.line_height_mm();
                let lines = summary_lines(text, *style, body.face, body.size, width);
                for (i, line) in lines.iter().enumerate() {
                    self.canvas.text(x, y + i as f32 * lh, line.as_str(), body);
                }
                lines.len() as f32 * lh
            }
            Node::Bullets {
                text,
                bullet,
                max_lines,
            } => {
                let body = s.body;
                let lh = body.line_height_mm();
                let (lines, clipped) = bullet_lines(text, bullet, &body, width, *max_lines);
                self.dropped.description_lines += clipped;
                for (i, line) in lines.iter().enumerate() {
                    self.canvas.text(x + line.indent, y + i as f32 * lh, line.text.as_str(), body);
                }
                lines.len() as f32 * lh
            }
            Node::Hanging { label, text } => {
                let lh = s.body.line_height_mm();
                let (label, indent) = hanging_label(label, &s.label, width);
                let lines = wrap_text(text, s.body.face, s.body.size, (width - indent).max(10.0));
                if label.is_empty() && lines.is_empty() {
                    return 0.0;
                }
                self.canvas.text(x, y, label, s.label);
                for (i, line) in lines.iter().enumerate() {
                    self.canvas.text(x + indent, y + i as f32 * lh, line.as_str(), s.body);
                }
                lines.len().max(1) as f32 * lh
            }
            Node::Grid {
                columns,
                row_gap,
                cells,
            } => {
                let col_w = (width - COLUMN_GAP * (*columns as f32 - 1.0)) / *columns as f32;
                let mut h = 0.0;
                for (r, row) in cells.chunks(*columns).enumerate() {
                    if r > 0 {
                        h += row_gap;
                    }
                    let row_h = row
                        .iter()
                        .enumerate()
                        .map(|(c, cell)| self.place(cell, x + c as f32 * (col_w + COLUMN_GAP), y + h, col_w))
                        .fold(0.0, f32::max);
                    h += row_h;
                }
                h
            }
            Node::Pills { items, fills, text } => self.pills(items, fills, *text, x, y, width),
            Node::Card { card, child } => {
                let outer = mem::take(&mut self.canvas);
                let inner_h = self.place(child, x + card.padding, y + card.padding, width - 2.0 * card.padding);
                let content = mem::replace(&mut self.canvas, outer);
                let h = inner_h + 2.0 * card.padding;
                self.canvas.push(DrawCommand::Rect {
                    x,
                    y,
                    width,
                    height: h,
                    radius: 1.5,
                    fill: Some(card.fill),
                    stroke: card.stroke,
                });
                self.canvas.append(content);
                h
            }
        }
    }

    fn pills(&mut self, items: &[String], fills: &[Color], text: Color, x: f32, y: f32, width: f32) -> f32 {
        if items.is_empty() {
            return 0.0;
        }
        let style = self.styles.caption.with_color(text);
        let pill_h = style.line_height_mm() + 1.2;
        let mut px = x;
        let mut row_y = y;
        for (k, item) in items.iter().enumerate() {
            let label = fit_to_width(item, style.face, style.size, width - 2.0 * PILL_PAD);
            let w = style.width(&label) + 2.0 * PILL_PAD;
            if px > x && px + w > x + width {
                px = x;
                row_y += pill_h + PILL_GAP;
            }
            let fill = fills.get(k % fills.len().max(1)).copied().unwrap_or(GRAY_100);
            self.canvas.fill_rect(px, row_y, w, pill_h, pill_h / 2.0, fill);
            self.canvas.text(px + PILL_PAD, row_y + 0.6, label, style);
            px += w + PILL_GAP;
        }
        row_y + pill_h - y
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
        StructuralEngine.render(&limited, &tier, descriptor(id)).unwrap()
    }

    fn snapshot(image: &PageImage) -> &Layer {
        image
            .layers
            .iter()
            .find(|l| l.kind == LayerKind::Snapshot)
            .unwrap()
    }

    #[test]
    fn test_short_record_is_not_scaled() {
        let image = render(&fixtures::typical_record(), TemplateId::Classic);
        assert_eq!(image.scale, 1.0);
        let t = snapshot(&image).transform;
        assert_eq!(t.dx, 0.0);
        assert_eq!(t.dy, image.body_top);
    }

    #[test]
    fn test_overflowing_body_scales_to_exactly_the_available_height() {
        for id in TemplateId::ALL {
            let image = render(&fixtures::stress_record(), id);
            let available = A4.available_below(image.body_top);
            assert!(image.scale <= 1.0, "{} scale {}", id.as_str(), image.scale);
            assert!(
                image.content_bottom() <= A4.content_bottom() + 1e-3,
                "{} ends at {}",
                id.as_str(),
                image.content_bottom()
            );
            if image.natural_height > available {
                assert!((image.natural_height * image.scale - available).abs() < 1e-2);
                let t = snapshot(&image).transform;
                assert!((t.dx - A4.width * (1.0 - t.scale) / 2.0).abs() < 1e-4, "centred");
            }
        }
    }

    #[test]
    fn test_side_by_side_regions_share_a_row() {
        let image = render(&fixtures::executive_record(), TemplateId::Executive);
        let sidebar = image.regions.iter().find(|r| r.region == "sidebar").unwrap();
        let main = image.regions.iter().find(|r| r.region == "main").unwrap();
        assert!((sidebar.top - main.top).abs() < 1e-4);
    }

    #[test]
    fn test_technical_intro_flows_above_columns() {
        let image = render(&fixtures::typical_record(), TemplateId::Technical);
        let intro = image.regions.iter().find(|r| r.region == "intro").unwrap();
        let main = image.regions.iter().find(|r| r.region == "main").unwrap();
        assert!(intro.bottom <= main.top + 1e-4, "{intro:?} vs {main:?}");
    }

    #[test]
    fn test_blank_sections_get_no_title() {
        let mut record = fixtures::typical_record();
        record.projects.clear();
        let image = render(&record, TemplateId::Classic);
        assert!(!image.texts().iter().any(|t| t.eq_ignore_ascii_case("projects")));
    }

    #[test]
    fn test_cards_wrap_their_entry() {
        let image = render(&fixtures::typical_record(), TemplateId::Technical);
        let layer = snapshot(&image);
        let card = layer
            .commands
            .iter()
            .find(|c| matches!(c, DrawCommand::Rect { fill: Some(_), .. }))
            .map(DrawCommand::bounds)
            .unwrap();
        let title = layer
            .commands
            .iter()
            .find(|c| c.text() == Some("Senior Engineer"))
            .map(DrawCommand::bounds)
            .unwrap();
        assert!(card.top < title.top && card.bottom > title.bottom);
    }
}
