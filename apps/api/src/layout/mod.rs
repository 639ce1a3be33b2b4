// Layout stages shared by both render backends: font metrics and wrapping, content metrics,
// tier selection, truncation limits, template descriptors and the fit report.
// All of it is pure and synchronous.

pub mod fit;
pub mod font_metrics;
pub mod geometry;
pub mod limits;
pub mod metrics;
pub mod templates;
pub mod tier;
pub mod wrap;
