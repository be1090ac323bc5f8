//! Geometric shape classification of region boundaries.

use serde::{Deserialize, Serialize};
use servotrack_core::{approx_polygon_dp, min_area_rect, min_enclosing_circle};

use crate::region::Region;

/// Fraction of the boundary perimeter used as the polygon-approximation
/// tolerance. The 2% figure is part of the classification contract; changing
/// it shifts every vertex-count decision below.
const APPROX_TOLERANCE_FRACTION: f32 = 0.02;

/// Quadrilaterals need to fill at least this fraction of their minimum-area
/// rectangle before the square/rectangle split is trusted.
const MIN_QUAD_EXTENT: f32 = 0.9;

/// A square's long/short side ratio may exceed unity by at most 20%.
const MAX_SQUARE_RATIO: f32 = 1.2;

const MIN_CIRCULARITY: f32 = 0.76;
const MAX_CIRCULARITY: f32 = 1.25;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeLabel {
    Triangle,
    Rectangle,
    Square,
    Circle,
    Unidentified,
}

impl std::fmt::Display for ShapeLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ShapeLabel::Triangle => "triangle",
            ShapeLabel::Rectangle => "rectangle",
            ShapeLabel::Square => "square",
            ShapeLabel::Circle => "circle",
            ShapeLabel::Unidentified => "unidentified",
        };
        f.write_str(name)
    }
}

impl std::str::FromStr for ShapeLabel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "triangle" => Ok(ShapeLabel::Triangle),
            "rectangle" => Ok(ShapeLabel::Rectangle),
            "square" => Ok(ShapeLabel::Square),
            "circle" => Ok(ShapeLabel::Circle),
            "unidentified" => Ok(ShapeLabel::Unidentified),
            other => Err(format!("unknown shape label: {other}")),
        }
    }
}

/// Classify a region boundary from its simplified polygon.
///
/// Degenerate geometry (zero area, zero radius) never faults; every ratio
/// that would divide by zero evaluates to 0 and the label falls back to
/// `Unidentified`.
pub fn classify(region: &Region) -> ShapeLabel {
    let points = region.points();
    if points.len() < 3 {
        return ShapeLabel::Unidentified;
    }

    let epsilon = APPROX_TOLERANCE_FRACTION * region.perimeter();
    let approx = approx_polygon_dp(points, epsilon);

    match approx.len() {
        3 => ShapeLabel::Triangle,
        4 => classify_quad(region),
        n if n > 4 => classify_round(region),
        _ => ShapeLabel::Unidentified,
    }
}

fn classify_quad(region: &Region) -> ShapeLabel {
    let area = region.area();
    let Some(rect) = min_area_rect(region.points()) else {
        return ShapeLabel::Unidentified;
    };

    let rect_area = rect.area();
    let extent = if rect_area > 0.0 { area / rect_area } else { 0.0 };
    if extent <= MIN_QUAD_EXTENT {
        return ShapeLabel::Unidentified;
    }

    let ratio = rect.side_ratio();
    let long_over_short = if ratio > 0.0 { 1.0 / ratio } else { 0.0 };
    if (1.0..=MAX_SQUARE_RATIO).contains(&long_over_short) {
        ShapeLabel::Square
    } else {
        ShapeLabel::Rectangle
    }
}

fn classify_round(region: &Region) -> ShapeLabel {
    let area = region.area();
    let Some((_, radius)) = min_enclosing_circle(region.points()) else {
        return ShapeLabel::Unidentified;
    };

    let circle_area = std::f32::consts::PI * radius * radius;
    let circularity = if circle_area > 0.0 {
        area / circle_area
    } else {
        0.0
    };

    if circularity > MIN_CIRCULARITY && circularity < MAX_CIRCULARITY {
        ShapeLabel::Circle
    } else {
        ShapeLabel::Unidentified
    }
}
