//! Core primitives for vision-guided robot navigation.
//!
//! This crate is intentionally small and purely geometric. It does *not*
//! depend on any concrete image container or capture device; the heavier
//! perception stages live in `servotrack-vision`.

mod geometry;
mod hsv;
mod logger;

pub use geometry::{
    approx_polygon_dp, bounding_box, convex_hull, min_area_rect, min_enclosing_circle,
    polygon_area, polygon_perimeter, Aabb, RotatedRect,
};
pub use hsv::Hsv;
pub use logger::init_with_level;
