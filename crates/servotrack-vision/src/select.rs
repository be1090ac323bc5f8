//! Best-target selection among classified regions.

use log::debug;
use serde::{Deserialize, Serialize};
use servotrack_core::Aabb;

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::region::Region;
use crate::shape::{classify, ShapeLabel};

/// Selection settings.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct TargetSelectorParams {
    /// Regions below this area (pixel units) are discarded as noise.
    pub min_area: f32,
    /// Shape the target must classify as.
    pub shape: ShapeLabel,
}

impl Default for TargetSelectorParams {
    fn default() -> Self {
        Self {
            min_area: 3500.0,
            shape: ShapeLabel::Circle,
        }
    }
}

/// The selected target with pixel-space offsets from the control reference.
#[derive(Clone, Copy, Debug)]
pub struct Target {
    /// Bounding-box center x minus frame center x.
    pub offset_x: f32,
    /// Bounding-box bottom y minus the reference row y.
    pub offset_y: f32,
    pub area: f32,
    pub bbox: Aabb,
}

/// Filters candidate regions and picks the best match.
#[derive(Clone, Copy, Debug, Default)]
pub struct TargetSelector {
    params: TargetSelectorParams,
}

impl TargetSelector {
    pub fn new(params: TargetSelectorParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &TargetSelectorParams {
        &self.params
    }

    /// Single-pass max-area reduction over all qualifying regions.
    ///
    /// Every region is considered; the largest qualifying one wins, with
    /// ties broken in first-seen order. Returns `None` when nothing
    /// qualifies ("no target this frame").
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "debug", skip(self, regions), fields(candidates = regions.len()))
    )]
    pub fn select(
        &self,
        regions: &[Region],
        frame_center_x: f32,
        reference_row_y: f32,
    ) -> Option<Target> {
        let mut best: Option<(f32, &Region)> = None;

        for region in regions {
            let area = region.area();
            if area < self.params.min_area {
                continue;
            }
            let shape = classify(region);
            if shape != self.params.shape {
                continue;
            }
            if best.map(|(best_area, _)| area > best_area).unwrap_or(true) {
                best = Some((area, region));
            }
        }

        let (area, region) = best?;
        let bbox = region.bounding_box()?;
        let target = Target {
            offset_x: bbox.center_x() - frame_center_x,
            offset_y: bbox.bottom_y() - reference_row_y,
            area,
            bbox,
        };
        debug!(
            "target area {:.0} offsets ({:+.1}, {:+.1})",
            area, target.offset_x, target.offset_y
        );
        Some(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point2;

    /// Dense square boundary with the requested area, lower-left at (x0, y0).
    fn square_region(area: f32, x0: f32, y0: f32) -> Region {
        let side = area.sqrt();
        let corners = [
            (x0, y0),
            (x0 + side, y0),
            (x0 + side, y0 + side),
            (x0, y0 + side),
        ];
        let mut pts = Vec::new();
        for i in 0..corners.len() {
            let (ax, ay) = corners[i];
            let (bx, by) = corners[(i + 1) % corners.len()];
            for k in 0..40 {
                let t = k as f32 / 40.0;
                pts.push(Point2::new(ax + (bx - ax) * t, ay + (by - ay) * t));
            }
        }
        Region::new(pts)
    }

    fn selector(shape: ShapeLabel) -> TargetSelector {
        TargetSelector::new(TargetSelectorParams {
            min_area: 3500.0,
            shape,
        })
    }

    #[test]
    fn picks_the_largest_qualifying_region() {
        let regions = vec![
            square_region(4000.0, 0.0, 0.0),
            square_region(9000.0, 200.0, 0.0),
            square_region(6000.0, 400.0, 0.0),
        ];
        let target = selector(ShapeLabel::Square)
            .select(&regions, 320.0, 400.0)
            .expect("target");
        assert!((target.area - 9000.0).abs() < 50.0);
    }

    #[test]
    fn all_regions_below_threshold_is_not_found() {
        let regions = vec![
            square_region(1000.0, 0.0, 0.0),
            square_region(3000.0, 100.0, 0.0),
        ];
        assert!(selector(ShapeLabel::Square)
            .select(&regions, 320.0, 400.0)
            .is_none());
    }

    #[test]
    fn shape_mismatch_is_not_found() {
        let regions = vec![square_region(9000.0, 0.0, 0.0)];
        assert!(selector(ShapeLabel::Circle)
            .select(&regions, 320.0, 400.0)
            .is_none());
    }

    #[test]
    fn offsets_measure_center_and_bottom() {
        // 80x80 square spanning x 280..360, y 300..380.
        let regions = vec![square_region(6400.0, 280.0, 300.0)];
        let target = selector(ShapeLabel::Square)
            .select(&regions, 320.0, 384.0)
            .expect("target");
        assert!((target.offset_x - 0.0).abs() < 1.0);
        assert!((target.offset_y - (380.0 - 384.0)).abs() < 1.0);
    }

    #[test]
    fn later_smaller_match_never_replaces_the_max() {
        // Max-area seen first; a later, smaller region must not win.
        let regions = vec![
            square_region(9000.0, 0.0, 0.0),
            square_region(4000.0, 300.0, 0.0),
        ];
        let target = selector(ShapeLabel::Square)
            .select(&regions, 320.0, 400.0)
            .expect("target");
        assert!((target.area - 9000.0).abs() < 50.0);
    }
}
