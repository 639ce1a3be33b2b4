//! Fit report: how a rendered page used its body area, and what it had to give up.
//!
//! Overflow is never an error. The structural backend scales the body and the procedural
//! backend stops regions at the ceiling; this report is where either outcome becomes visible
//! to the caller.

use serde::Serialize;

use crate::layout::geometry::A4;
use crate::layout::limits::DroppedItems;
use crate::layout::metrics::ContentMetrics;
use crate::layout::templates::TemplateId;
use crate::layout::tier::TierLevel;
use crate::render::draw::{PageImage, RegionExtent};
use crate::render::Backend;

// ────────────────────────────────────────────────────────────────────────────
// Types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FitVerdict {
    /// Everything drawn at natural size.
    Fits,
    /// Body drawn whole at a uniform scale below 1.
    ScaledToFit,
    /// Items or lines were left out, by the limits or by a region running out of page.
    Truncated,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FitReport {
    pub template: TemplateId,
    pub backend: Backend,
    pub tier: TierLevel,
    pub metrics: ContentMetrics,
    pub body_top: f32,
    pub available_height: f32,
    pub natural_height: f32,
    /// Share of the body area the drawn content covers, after scaling. At most 1.
    pub fill_fraction: f32,
    pub scale: f32,
    pub regions: Vec<RegionExtent>,
    /// Limits and engine drops combined.
    pub dropped: DroppedItems,
    pub verdict: FitVerdict,
}

// ────────────────────────────────────────────────────────────────────────────
// Core functions
// ────────────────────────────────────────────────────────────────────────────

/// Builds the report for one rendered page. `limit_drops` are the items the limits stage cut
/// before the engine ran.
pub fn analyze_fit(
    image: &PageImage,
    template: TemplateId,
    backend: Backend,
    tier: TierLevel,
    metrics: ContentMetrics,
    limit_drops: &DroppedItems,
) -> FitReport {
    let available = A4.available_below(image.body_top);
    let used = (image.content_bottom() - image.body_top).max(0.0);
    let fill_fraction = if available > 0.0 {
        (used / available).clamp(0.0, 1.0)
    } else {
        0.0
    };

    let mut dropped = *limit_drops;
    dropped.merge(&image.dropped);

    FitReport {
        template,
        backend,
        tier,
        metrics,
        body_top: image.body_top,
        available_height: available,
        natural_height: image.natural_height,
        fill_fraction,
        scale: image.scale,
        regions: image.regions.clone(),
        dropped,
        verdict: verdict_for(image.scale, &dropped),
    }
}

fn verdict_for(scale: f32, dropped: &DroppedItems) -> FitVerdict {
    if dropped.total() > 0 {
        FitVerdict::Truncated
    } else if scale < 1.0 {
        FitVerdict::ScaledToFit
    } else {
        FitVerdict::Fits
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::draw::{Canvas, Layer, LayerKind, GRAY_100};

    fn image(bottom: f32, scale: f32) -> PageImage {
        let mut canvas = Canvas::new();
        canvas.fill_rect(20.0, 60.0, 170.0, bottom - 60.0, 0.0, GRAY_100);
        PageImage {
            width: 210.0,
            height: 297.0,
            layers: vec![Layer::direct(LayerKind::Content, 210.0, 297.0, canvas)],
            body_top: 60.0,
            regions: Vec::new(),
            dropped: DroppedItems::default(),
            scale,
            natural_height: bottom - 60.0,
        }
    }

    #[test]
    fn test_fill_fraction_is_relative_to_body_area() {
        let report = analyze_fit(
            &image(168.5, 1.0),
            TemplateId::Classic,
            Backend::Procedural,
            TierLevel::Base,
            ContentMetrics::default(),
            &DroppedItems::default(),
        );
        assert!((report.available_height - 217.0).abs() < 1e-4);
        assert!((report.fill_fraction - 0.5).abs() < 1e-4, "fill {}", report.fill_fraction);
        assert_eq!(report.verdict, FitVerdict::Fits);
    }

    #[test]
    fn test_drops_outrank_scaling() {
        let limits = DroppedItems {
            experience: 2,
            ..Default::default()
        };
        assert_eq!(verdict_for(0.8, &limits), FitVerdict::Truncated);
        assert_eq!(verdict_for(0.8, &DroppedItems::default()), FitVerdict::ScaledToFit);
    }

    #[test]
    fn test_engine_and_limit_drops_are_merged() {
        let mut page = image(277.0, 1.0);
        page.dropped.description_lines = 4;
        let limits = DroppedItems {
            skill_items: 3,
            ..Default::default()
        };
        let report = analyze_fit(
            &page,
            TemplateId::Executive,
            Backend::Procedural,
            TierLevel::Dense,
            ContentMetrics::default(),
            &limits,
        );
        assert_eq!(report.dropped.total(), 7);
        assert_eq!(report.fill_fraction, 1.0);
    }
}
