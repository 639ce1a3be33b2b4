//! Reserved header painting.
//!
//! The header has constant geometry per template, so both engines paint it the same way and
//! neither scales it. Lines that would not fit above the reserved height are left out.

use crate::layout::geometry::PageGeometry;
use crate::layout::templates::{Align, ContactLayout, TemplateDescriptor};
use crate::layout::tier::SizingTier;
use crate::layout::wrap::fit_to_width;
use crate::models::resume::{present, present_opt, ResumeRecord};
use crate::render::draw::{Canvas, DrawCommand, TextStyle};

/// Space kept clear between the last header line and the body.
const HEADER_GAP: f32 = 4.0;

/// Paints decorations into `backdrop` and the name/title/contact block into `content`.
pub fn paint_header(
    record: &ResumeRecord,
    tier: &SizingTier,
    d: &TemplateDescriptor,
    page: &PageGeometry,
    backdrop: &mut Canvas,
    content: &mut Canvas,
) {
    let header = &d.header;

    if let Some(band) = header.band {
        backdrop.fill_rect(0.0, 0.0, page.width, band.height, 0.0, band.color);
    }
    for ornament in header.ornaments {
        backdrop.circle(ornament.cx, ornament.cy, ornament.r, ornament.color);
    }
    let fill_top = header.band.map_or(header.reserved, |b| b.height);
    for region in d.regions {
        if let Some(fill) = region.fill {
            backdrop.fill_rect(fill.x, fill_top, fill.width, page.height - fill_top, 0.0, fill.color);
        }
    }

    let info = &record.personal_info;
    let limit = header.reserved - HEADER_GAP;
    let width = page.content_width();
    let left = page.content_left();
    let center = page.width / 2.0;

    let mut lines: Vec<(String, TextStyle)> = Vec::new();
    let name_style = TextStyle {
        face: d.typeface.bold(),
        size: tier.heading.size + header.name_boost,
        line_height: tier.heading.line_height,
        color: header.name_color,
    };
    if let Some(name) = present(&info.full_name) {
        let name = if header.uppercase_name { name.to_uppercase() } else { name.to_string() };
        lines.push((name, name_style));
    }
    if let Some(title) = present_opt(&info.title) {
        let style = TextStyle::new(d.typeface.regular(), tier.subheading, header.title_color);
        lines.push((title.to_string(), style));
    }
    let contact_style = TextStyle::new(d.typeface.regular(), tier.caption, header.contact_color);
    let contacts = info.contact_items();
    match header.contact {
        ContactLayout::Inline { separator } => {
            if !contacts.is_empty() {
                lines.push((contacts.join(separator), contact_style));
            }
        }
        ContactLayout::Stacked { prefix } => {
            lines.extend(contacts.iter().map(|c| (format!("{prefix}{c}"), contact_style)));
        }
    }

    let mut y = header.padding_top;
    for (text, style) in lines {
        let lh = style.line_height_mm();
        if y + lh > limit {
            break;
        }
        let text = fit_to_width(&text, style.face, style.size, width);
        match header.align {
            Align::Left => content.text(left, y, text, style),
            Align::Center => content.text_centered(center, y, &text, style),
        }
        y += lh;
    }

    if let Some(rule) = header.rule {
        let rule_y = limit + 1.0;
        content.line(left, rule_y, page.content_right(), rule_y, rule);
    }
    if let Some(outline) = header.outline {
        let top = header.padding_top - 4.0;
        content.push(DrawCommand::Rect {
            x: left - 5.0,
            y: top,
            width: width + 10.0,
            height: limit + 1.0 - top,
            radius: 1.5,
            fill: None,
            stroke: Some(outline),
        });
    }
}
