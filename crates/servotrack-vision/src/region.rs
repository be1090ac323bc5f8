//! Connected-component boundaries extracted from a binary mask.

use image::GrayImage;
use imageproc::contours::{find_contours, BorderType};
use nalgebra::Point2;
use servotrack_core::{bounding_box, polygon_area, polygon_perimeter, Aabb};

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Ordered boundary of one detected blob.
#[derive(Clone, Debug)]
pub struct Region {
    points: Vec<Point2<f32>>,
}

impl Region {
    pub fn new(points: Vec<Point2<f32>>) -> Self {
        Self { points }
    }

    pub fn points(&self) -> &[Point2<f32>] {
        &self.points
    }

    pub fn area(&self) -> f32 {
        polygon_area(&self.points)
    }

    pub fn perimeter(&self) -> f32 {
        polygon_perimeter(&self.points)
    }

    pub fn bounding_box(&self) -> Option<Aabb> {
        bounding_box(&self.points)
    }
}

/// Trace the outermost boundaries in `mask` (set pixels are non-zero).
///
/// Only top-level outer borders are returned; holes and nested components
/// are ignored, matching the external-retrieval contour mode the pipeline
/// was designed around.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "debug", skip(mask), fields(width = mask.width(), height = mask.height()))
)]
pub fn find_regions(mask: &GrayImage) -> Vec<Region> {
    find_contours::<i32>(mask)
        .into_iter()
        .filter(|c| c.border_type == BorderType::Outer && c.parent.is_none())
        .map(|c| {
            Region::new(
                c.points
                    .iter()
                    .map(|p| Point2::new(p.x as f32, p.y as f32))
                    .collect(),
            )
        })
        .collect()
}
