//! Display list shared by both layout engines and consumed by the PDF writer.
//!
//! Coordinates are millimetres, origin top-left, y down. Every text command carries its own
//! `TextStyle`, there is no current-font state anywhere in the pipeline.

use serde::Serialize;

use crate::layout::font_metrics::FontFace;
use crate::layout::geometry::MM_PER_PT;
use crate::layout::limits::DroppedItems;
use crate::layout::tier::TypeScale;
use crate::layout::wrap::text_width;

// ────────────────────────────────────────────────────────────────────────────
// Style values
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Components in 0..=1 as PDF colour operators expect them.
    pub fn unit(self) -> [f32; 3] {
        [
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
        ]
    }
}

pub const WHITE: Color = Color::rgb(255, 255, 255);
pub const GRAY_50: Color = Color::rgb(249, 250, 251);
pub const GRAY_100: Color = Color::rgb(243, 244, 246);
pub const GRAY_200: Color = Color::rgb(229, 231, 235);
pub const GRAY_300: Color = Color::rgb(209, 213, 219);
pub const GRAY_500: Color = Color::rgb(107, 114, 128);
pub const GRAY_700: Color = Color::rgb(55, 65, 81);
pub const GRAY_800: Color = Color::rgb(31, 41, 55);
pub const GRAY_900: Color = Color::rgb(17, 24, 39);
pub const BLUE_100: Color = Color::rgb(219, 234, 254);
pub const BLUE_600: Color = Color::rgb(37, 99, 235);
pub const INDIGO_100: Color = Color::rgb(224, 231, 255);
pub const INDIGO_600: Color = Color::rgb(79, 70, 229);
pub const PURPLE_100: Color = Color::rgb(243, 232, 255);
pub const PURPLE_600: Color = Color::rgb(124, 58, 237);
pub const PINK_100: Color = Color::rgb(252, 231, 243);
pub const EMERALD_500: Color = Color::rgb(16, 185, 129);
pub const EMERALD_700: Color = Color::rgb(4, 120, 87);

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TextStyle {
    pub face: FontFace,
    /// Points.
    pub size: f32,
    /// Multiplier on `size`.
    pub line_height: f32,
    pub color: Color,
}

impl TextStyle {
    pub fn new(face: FontFace, scale: TypeScale, color: Color) -> Self {
        Self {
            face,
            size: scale.size,
            line_height: scale.line_height,
            color,
        }
    }

    pub fn line_height_mm(&self) -> f32 {
        self.size * self.line_height * MM_PER_PT
    }

    pub fn width(&self, text: &str) -> f32 {
        text_width(text, self.face, self.size)
    }

    /// Offset from the top of the line box to the baseline: half the leading plus the ascent.
    pub fn baseline_offset(&self) -> f32 {
        let size_mm = self.size * MM_PER_PT;
        (self.line_height_mm() - size_mm) / 2.0 + size_mm * 0.8
    }

    pub fn with_color(self, color: Color) -> Self {
        Self { color, ..self }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Stroke {
    pub color: Color,
    pub width: f32,
}

// ────────────────────────────────────────────────────────────────────────────
// Commands
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DrawCommand {
    /// `y` is the top of the line box; the glyphs sit on `y + style.baseline_offset()`.
    Text {
        x: f32,
        y: f32,
        text: String,
        style: TextStyle,
    },
    Line {
        x1: f32,
        y1: f32,
        x2: f32,
        y2: f32,
        stroke: Stroke,
    },
    Rect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        radius: f32,
        fill: Option<Color>,
        stroke: Option<Stroke>,
    },
    Circle {
        cx: f32,
        cy: f32,
        r: f32,
        fill: Color,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bounds {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl DrawCommand {
    pub fn bounds(&self) -> Bounds {
        match self {
            DrawCommand::Text { x, y, text, style } => Bounds {
                left: *x,
                top: *y,
                right: x + style.width(text),
                bottom: y + style.line_height_mm(),
            },
            DrawCommand::Line { x1, y1, x2, y2, stroke } => {
                let half = stroke.width / 2.0;
                Bounds {
                    left: x1.min(*x2),
                    top: y1.min(*y2) - half,
                    right: x1.max(*x2),
                    bottom: y1.max(*y2) + half,
                }
            }
            DrawCommand::Rect { x, y, width, height, .. } => Bounds {
                left: *x,
                top: *y,
                right: x + width,
                bottom: y + height,
            },
            DrawCommand::Circle { cx, cy, r, .. } => Bounds {
                left: cx - r,
                top: cy - r,
                right: cx + r,
                bottom: cy + r,
            },
        }
    }

    pub fn text(&self) -> Option<&str> {
        match self {
            DrawCommand::Text { text, .. } => Some(text),
            _ => None,
        }
    }
}

/// Ordered command sink. Later commands paint over earlier ones.
#[derive(Debug, Clone, Default)]
pub struct Canvas {
    commands: Vec<DrawCommand>,
}

impl Canvas {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&mut self, x: f32, y: f32, text: impl Into<String>, style: TextStyle) {
        let text = text.into();
        if text.trim().is_empty() {
            return;
        }
        self.commands.push(DrawCommand::Text { x, y, text, style });
    }

    /// Places `text` so it ends at `right`.
    pub fn text_right(&mut self, right: f32, y: f32, text: &str, style: TextStyle) {
        let x = right - style.width(text);
        self.text(x, y, text, style);
    }

    pub fn text_centered(&mut self, center: f32, y: f32, text: &str, style: TextStyle) {
        let x = center - style.width(text) / 2.0;
        self.text(x, y, text, style);
    }

    pub fn line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, stroke: Stroke) {
        self.commands.push(DrawCommand::Line { x1, y1, x2, y2, stroke });
    }

    pub fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32, radius: f32, fill: Color) {
        self.commands.push(DrawCommand::Rect {
            x,
            y,
            width,
            height,
            radius,
            fill: Some(fill),
            stroke: None,
        });
    }

    pub fn push(&mut self, command: DrawCommand) {
        self.commands.push(command);
    }

    pub fn circle(&mut self, cx: f32, cy: f32, r: f32, fill: Color) {
        self.commands.push(DrawCommand::Circle { cx, cy, r, fill });
    }

    pub fn append(&mut self, other: Canvas) {
        self.commands.extend(other.commands);
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn into_commands(self) -> Vec<DrawCommand> {
        self.commands
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Page image
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LayerKind {
    /// Cosmetic shapes (banners, sidebar fills, ornaments). They reserve no layout space.
    Backdrop,
    /// Commands in page coordinates.
    Content,
    /// A flowed tree recorded in local coordinates and placed with one uniform transform.
    Snapshot,
}

/// `page = local * scale + (dx, dy)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Transform {
    pub dx: f32,
    pub dy: f32,
    pub scale: f32,
}

impl Transform {
    pub const IDENTITY: Transform = Transform { dx: 0.0, dy: 0.0, scale: 1.0 };

    pub fn apply_y(&self, y: f32) -> f32 {
        self.dy + y * self.scale
    }

    pub fn apply_x(&self, x: f32) -> f32 {
        self.dx + x * self.scale
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Layer {
    pub kind: LayerKind,
    pub transform: Transform,
    /// Local extent of the layer's own coordinate space.
    pub width: f32,
    pub height: f32,
    pub commands: Vec<DrawCommand>,
}

impl Layer {
    pub fn direct(kind: LayerKind, width: f32, height: f32, canvas: Canvas) -> Self {
        Self {
            kind,
            transform: Transform::IDENTITY,
            width,
            height,
            commands: canvas.into_commands(),
        }
    }

    /// Lowest page y reached by any command, 0 when empty.
    pub fn bottom_on_page(&self) -> f32 {
        self.commands
            .iter()
            .map(|c| self.transform.apply_y(c.bounds().bottom))
            .fold(0.0, f32::max)
    }
}

/// Vertical extent one region reached, in page coordinates.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionExtent {
    pub region: String,
    pub top: f32,
    pub bottom: f32,
}

impl RegionExtent {
    /// Widens the entry for `region` in `extents`, adding one if it is not there yet.
    pub fn record(extents: &mut Vec<RegionExtent>, region: &str, top: f32, bottom: f32) {
        match extents.iter_mut().find(|e| e.region == region) {
            Some(extent) => {
                extent.top = extent.top.min(top);
                extent.bottom = extent.bottom.max(bottom);
            }
            None => extents.push(RegionExtent {
                region: region.to_string(),
                top,
                bottom,
            }),
        }
    }
}

/// One laid-out page, ready for serialization.
#[derive(Debug, Clone, Serialize)]
pub struct PageImage {
    pub width: f32,
    pub height: f32,
    pub layers: Vec<Layer>,
    /// First y below the reserved header.
    pub body_top: f32,
    pub regions: Vec<RegionExtent>,
    /// Items the engine itself had to leave out, on top of what limits already removed.
    pub dropped: DroppedItems,
    /// Uniform factor applied to the body; 1.0 unless it was scaled to fit.
    pub scale: f32,
    /// Body height before any scaling.
    pub natural_height: f32,
}

impl PageImage {
    /// Lowest page y reached by layout content. Backdrop shapes do not count.
    pub fn content_bottom(&self) -> f32 {
        self.layers
            .iter()
            .filter(|l| l.kind != LayerKind::Backdrop)
            .map(Layer::bottom_on_page)
            .fold(0.0, f32::max)
    }

    /// Every text run on the page, in paint order.
    pub fn texts(&self) -> Vec<&str> {
        self.layers
            .iter()
            .flat_map(|l| l.commands.iter())
            .filter_map(DrawCommand::text)
            .collect()
    }

    pub fn contains_text(&self, needle: &str) -> bool {
        self.texts().iter().any(|t| t.contains(needle))
    }
}
