//! Page geometry. All layout math runs in millimetres from the top-left corner, y grows down.
//! Font sizes stay in points; `MM_PER_PT` converts.

use serde::Serialize;

pub const MM_PER_PT: f32 = 25.4 / 72.0;
pub const PT_PER_MM: f32 = 72.0 / 25.4;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PageGeometry {
    pub width: f32,
    pub height: f32,
    pub margin_left: f32,
    pub margin_right: f32,
    pub margin_top: f32,
    pub margin_bottom: f32,
}

/// A4 portrait with 20 mm margins on every side.
pub const A4: PageGeometry = PageGeometry {
    width: 210.0,
    height: 297.0,
    margin_left: 20.0,
    margin_right: 20.0,
    margin_top: 20.0,
    margin_bottom: 20.0,
};

impl PageGeometry {
    /// 170 mm on A4.
    pub fn content_width(&self) -> f32 {
        self.width - self.margin_left - self.margin_right
    }

    pub fn content_left(&self) -> f32 {
        self.margin_left
    }

    pub fn content_right(&self) -> f32 {
        self.width - self.margin_right
    }

    /// The lowest y any content may reach. 277 mm on A4.
    pub fn content_bottom(&self) -> f32 {
        self.height - self.margin_bottom
    }

    /// Vertical space left for the body once a header has claimed everything above `body_top`.
    pub fn available_below(&self, body_top: f32) -> f32 {
        (self.content_bottom() - body_top).max(0.0)
    }
}
