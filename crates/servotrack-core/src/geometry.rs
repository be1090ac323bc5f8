//! Planar geometry over contour point sets.
//!
//! Everything here operates on `nalgebra::Point2<f32>` slices so the callers
//! can feed pixel-space contours without committing to an image container.

use nalgebra::Point2;
use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box of a point set.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Point2<f32>,
    pub max: Point2<f32>,
}

impl Aabb {
    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    /// Horizontal center of the box.
    pub fn center_x(&self) -> f32 {
        0.5 * (self.min.x + self.max.x)
    }

    /// Lowest row of the box (largest y in image coordinates).
    pub fn bottom_y(&self) -> f32 {
        self.max.y
    }
}

/// Minimum-area rotated rectangle around a point set.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct RotatedRect {
    pub center: Point2<f32>,
    /// Extent along the rectangle's first axis.
    pub width: f32,
    /// Extent along the rectangle's second axis.
    pub height: f32,
    /// Rotation of the first axis, radians.
    pub angle: f32,
}

impl RotatedRect {
    pub fn area(&self) -> f32 {
        self.width * self.height
    }

    /// Ratio of the short side to the long side, in (0, 1].
    ///
    /// Returns 0 for a degenerate rectangle so callers never divide by zero.
    pub fn side_ratio(&self) -> f32 {
        let long = self.width.max(self.height);
        let short = self.width.min(self.height);
        if long <= 0.0 {
            return 0.0;
        }
        short / long
    }
}

pub fn bounding_box(points: &[Point2<f32>]) -> Option<Aabb> {
    let first = points.first()?;
    let mut min = *first;
    let mut max = *first;
    for p in &points[1..] {
        min.x = min.x.min(p.x);
        min.y = min.y.min(p.y);
        max.x = max.x.max(p.x);
        max.y = max.y.max(p.y);
    }
    Some(Aabb { min, max })
}

/// Perimeter of the closed polygon through `points`.
pub fn polygon_perimeter(points: &[Point2<f32>]) -> f32 {
    if points.len() < 2 {
        return 0.0;
    }
    let mut total = 0.0;
    for i in 0..points.len() {
        let a = points[i];
        let b = points[(i + 1) % points.len()];
        total += (b - a).norm();
    }
    total
}

/// Unsigned area of the closed polygon through `points` (shoelace formula).
pub fn polygon_area(points: &[Point2<f32>]) -> f32 {
    if points.len() < 3 {
        return 0.0;
    }
    let mut twice = 0.0f32;
    for i in 0..points.len() {
        let a = points[i];
        let b = points[(i + 1) % points.len()];
        twice += a.x * b.y - b.x * a.y;
    }
    0.5 * twice.abs()
}

/// Douglas-Peucker simplification of a closed contour.
///
/// The ring is split at the vertex farthest from the first point and each
/// open chain is reduced independently, so the result stays a valid closed
/// polygon. `epsilon` is the maximum allowed deviation in the same units as
/// the input points.
pub fn approx_polygon_dp(points: &[Point2<f32>], epsilon: f32) -> Vec<Point2<f32>> {
    if points.len() < 3 {
        return points.to_vec();
    }

    let first = points[0];
    let (far, far_dist) = points
        .iter()
        .enumerate()
        .map(|(i, p)| (i, (p - first).norm_squared()))
        .fold((0, 0.0f32), |best, cand| {
            if cand.1 > best.1 {
                cand
            } else {
                best
            }
        });
    if far_dist <= 0.0 {
        // All vertices coincide.
        return vec![first];
    }

    let head: Vec<Point2<f32>> = points[..=far].to_vec();
    let mut tail: Vec<Point2<f32>> = points[far..].to_vec();
    tail.push(first);

    let mut head = dp_open(&head, epsilon);
    let tail = dp_open(&tail, epsilon);

    // `head` ends where `tail` begins and `tail` ends where `head` begins.
    head.pop();
    head.extend_from_slice(&tail[..tail.len() - 1]);
    head
}

fn dp_open(points: &[Point2<f32>], epsilon: f32) -> Vec<Point2<f32>> {
    if points.len() < 3 {
        return points.to_vec();
    }

    let first = points[0];
    let last = points[points.len() - 1];

    let mut max_dist = 0.0f32;
    let mut max_idx = 0usize;
    for (i, p) in points.iter().enumerate().skip(1).take(points.len() - 2) {
        let d = segment_distance(*p, first, last);
        if d > max_dist {
            max_dist = d;
            max_idx = i;
        }
    }

    if max_dist <= epsilon {
        return vec![first, last];
    }

    let left = dp_open(&points[..=max_idx], epsilon);
    let right = dp_open(&points[max_idx..], epsilon);

    let mut out = left;
    out.pop();
    out.extend_from_slice(&right);
    out
}

fn segment_distance(p: Point2<f32>, a: Point2<f32>, b: Point2<f32>) -> f32 {
    let ab = b - a;
    let len2 = ab.norm_squared();
    if len2 <= f32::EPSILON {
        return (p - a).norm();
    }
    let t = ((p - a).dot(&ab) / len2).clamp(0.0, 1.0);
    let proj = a + ab * t;
    (p - proj).norm()
}

/// Convex hull via Andrew's monotone chain, counter-clockwise, no collinear
/// vertices.
pub fn convex_hull(points: &[Point2<f32>]) -> Vec<Point2<f32>> {
    let mut pts: Vec<Point2<f32>> = points.to_vec();
    pts.sort_by(|a, b| {
        a.x.partial_cmp(&b.x)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.y.partial_cmp(&b.y).unwrap_or(std::cmp::Ordering::Equal))
    });
    pts.dedup_by(|a, b| a == b);

    if pts.len() < 3 {
        return pts;
    }

    let cross = |o: Point2<f32>, a: Point2<f32>, b: Point2<f32>| {
        (a.x - o.x) * (b.y - o.y) - (a.y - o.y) * (b.x - o.x)
    };

    let mut lower: Vec<Point2<f32>> = Vec::with_capacity(pts.len());
    for &p in &pts {
        while lower.len() >= 2 && cross(lower[lower.len() - 2], lower[lower.len() - 1], p) <= 0.0 {
            lower.pop();
        }
        lower.push(p);
    }

    let mut upper: Vec<Point2<f32>> = Vec::with_capacity(pts.len());
    for &p in pts.iter().rev() {
        while upper.len() >= 2 && cross(upper[upper.len() - 2], upper[upper.len() - 1], p) <= 0.0 {
            upper.pop();
        }
        upper.push(p);
    }

    lower.pop();
    upper.pop();
    lower.extend(upper);
    lower
}

/// Minimum-area enclosing rotated rectangle (rotating calipers on the hull).
pub fn min_area_rect(points: &[Point2<f32>]) -> Option<RotatedRect> {
    let hull = convex_hull(points);
    if hull.is_empty() {
        return None;
    }
    if hull.len() < 3 {
        // Degenerate set: a point or a segment, zero-area rectangle.
        let bbox = bounding_box(&hull)?;
        return Some(RotatedRect {
            center: Point2::new(bbox.center_x(), 0.5 * (bbox.min.y + bbox.max.y)),
            width: bbox.width(),
            height: bbox.height(),
            angle: 0.0,
        });
    }

    let mut best: Option<RotatedRect> = None;
    for i in 0..hull.len() {
        let a = hull[i];
        let b = hull[(i + 1) % hull.len()];
        let edge = b - a;
        let len = edge.norm();
        if len <= f32::EPSILON {
            continue;
        }
        let u = edge / len;
        let v = nalgebra::Vector2::new(-u.y, u.x);

        let mut min_u = f32::INFINITY;
        let mut max_u = f32::NEG_INFINITY;
        let mut min_v = f32::INFINITY;
        let mut max_v = f32::NEG_INFINITY;
        for p in &hull {
            let d = p - a;
            let pu = d.dot(&u);
            let pv = d.dot(&v);
            min_u = min_u.min(pu);
            max_u = max_u.max(pu);
            min_v = min_v.min(pv);
            max_v = max_v.max(pv);
        }

        let width = max_u - min_u;
        let height = max_v - min_v;
        if best
            .as_ref()
            .map(|r| width * height < r.area())
            .unwrap_or(true)
        {
            let cu = 0.5 * (min_u + max_u);
            let cv = 0.5 * (min_v + max_v);
            best = Some(RotatedRect {
                center: a + u * cu + v * cv,
                width,
                height,
                angle: u.y.atan2(u.x),
            });
        }
    }
    best
}

/// Minimum enclosing circle: `(center, radius)`.
///
/// Incremental mini-disc construction over a deterministically permuted copy
/// of the input; expected linear time, exact up to float tolerance.
pub fn min_enclosing_circle(points: &[Point2<f32>]) -> Option<(Point2<f32>, f32)> {
    if points.is_empty() {
        return None;
    }

    let pts = permute(points);

    let mut circle = Circle {
        center: pts[0],
        radius: 0.0,
    };
    for i in 1..pts.len() {
        if !circle.contains(pts[i]) {
            circle = disc_with_one(&pts[..i], pts[i]);
        }
    }
    Some((circle.center, circle.radius))
}

#[derive(Clone, Copy)]
struct Circle {
    center: Point2<f32>,
    radius: f32,
}

impl Circle {
    fn contains(&self, p: Point2<f32>) -> bool {
        let slack = 1e-4 * self.radius.max(1.0);
        (p - self.center).norm() <= self.radius + slack
    }

    fn from_diameter(a: Point2<f32>, b: Point2<f32>) -> Self {
        let center = nalgebra::center(&a, &b);
        Circle {
            center,
            radius: (a - center).norm(),
        }
    }

    fn circumscribed(a: Point2<f32>, b: Point2<f32>, c: Point2<f32>) -> Option<Self> {
        let d = 2.0 * (a.x * (b.y - c.y) + b.x * (c.y - a.y) + c.x * (a.y - b.y));
        if d.abs() <= f32::EPSILON {
            return None;
        }
        let a2 = a.x * a.x + a.y * a.y;
        let b2 = b.x * b.x + b.y * b.y;
        let c2 = c.x * c.x + c.y * c.y;
        let ux = (a2 * (b.y - c.y) + b2 * (c.y - a.y) + c2 * (a.y - b.y)) / d;
        let uy = (a2 * (c.x - b.x) + b2 * (a.x - c.x) + c2 * (b.x - a.x)) / d;
        let center = Point2::new(ux, uy);
        Some(Circle {
            center,
            radius: (a - center).norm(),
        })
    }
}

fn disc_with_one(pts: &[Point2<f32>], p: Point2<f32>) -> Circle {
    let mut circle = Circle {
        center: p,
        radius: 0.0,
    };
    for i in 0..pts.len() {
        if !circle.contains(pts[i]) {
            circle = disc_with_two(&pts[..i], p, pts[i]);
        }
    }
    circle
}

fn disc_with_two(pts: &[Point2<f32>], p: Point2<f32>, q: Point2<f32>) -> Circle {
    let mut circle = Circle::from_diameter(p, q);
    for &r in pts {
        if !circle.contains(r) {
            circle = Circle::circumscribed(p, q, r).unwrap_or_else(|| widest_diameter(p, q, r));
        }
    }
    circle
}

fn widest_diameter(a: Point2<f32>, b: Point2<f32>, c: Point2<f32>) -> Circle {
    let pairs = [(a, b), (a, c), (b, c)];
    let (x, y) = pairs
        .iter()
        .copied()
        .max_by(|(a1, b1), (a2, b2)| {
            (b1 - a1)
                .norm_squared()
                .partial_cmp(&(b2 - a2).norm_squared())
                .unwrap_or(std::cmp::Ordering::Equal)
        })
        .unwrap_or((a, b));
    Circle::from_diameter(x, y)
}

/// Fisher-Yates with a fixed-seed LCG so results are reproducible.
fn permute(points: &[Point2<f32>]) -> Vec<Point2<f32>> {
    let mut pts = points.to_vec();
    let mut state: u64 = 0x9e3779b97f4a7c15;
    for i in (1..pts.len()).rev() {
        state = state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        let j = (state >> 33) as usize % (i + 1);
        pts.swap(i, j);
    }
    pts
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f32::consts::PI;

    fn ring(n: usize, r: f32, cx: f32, cy: f32) -> Vec<Point2<f32>> {
        (0..n)
            .map(|i| {
                let t = 2.0 * PI * i as f32 / n as f32;
                Point2::new(cx + r * t.cos(), cy + r * t.sin())
            })
            .collect()
    }

    fn dense_square(side: f32, samples_per_edge: usize) -> Vec<Point2<f32>> {
        let mut pts = Vec::new();
        let s = samples_per_edge as f32;
        for i in 0..samples_per_edge {
            pts.push(Point2::new(side * i as f32 / s, 0.0));
        }
        for i in 0..samples_per_edge {
            pts.push(Point2::new(side, side * i as f32 / s));
        }
        for i in 0..samples_per_edge {
            pts.push(Point2::new(side - side * i as f32 / s, side));
        }
        for i in 0..samples_per_edge {
            pts.push(Point2::new(0.0, side - side * i as f32 / s));
        }
        pts
    }

    #[test]
    fn shoelace_area_of_unit_square() {
        let square = [
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(1.0, 1.0),
            Point2::new(0.0, 1.0),
        ];
        assert_relative_eq!(polygon_area(&square), 1.0);
        assert_relative_eq!(polygon_perimeter(&square), 4.0);
    }

    #[test]
    fn area_is_orientation_independent() {
        let cw = [
            Point2::new(0.0, 0.0),
            Point2::new(0.0, 2.0),
            Point2::new(3.0, 2.0),
            Point2::new(3.0, 0.0),
        ];
        assert_relative_eq!(polygon_area(&cw), 6.0);
    }

    #[test]
    fn dp_reduces_dense_square_to_four_vertices() {
        let contour = dense_square(100.0, 50);
        let eps = 0.02 * polygon_perimeter(&contour);
        let approx = approx_polygon_dp(&contour, eps);
        assert_eq!(approx.len(), 4);
    }

    #[test]
    fn dp_keeps_circle_above_four_vertices() {
        let contour = ring(360, 50.0, 0.0, 0.0);
        let eps = 0.02 * polygon_perimeter(&contour);
        let approx = approx_polygon_dp(&contour, eps);
        assert!(approx.len() > 4, "got {} vertices", approx.len());
    }

    #[test]
    fn dp_handles_degenerate_input() {
        let single = [Point2::new(1.0, 1.0); 5];
        assert_eq!(approx_polygon_dp(&single, 0.5).len(), 1);
        assert!(polygon_area(&single) == 0.0);
    }

    #[test]
    fn min_area_rect_of_rotated_rectangle() {
        // 4x2 rectangle rotated by 30 degrees.
        let (s, c) = (30f32.to_radians().sin(), 30f32.to_radians().cos());
        let corners = [(0.0, 0.0), (4.0, 0.0), (4.0, 2.0), (0.0, 2.0)];
        let pts: Vec<Point2<f32>> = corners
            .iter()
            .map(|&(x, y)| Point2::new(x * c - y * s, x * s + y * c))
            .collect();
        let rect = min_area_rect(&pts).expect("rect");
        assert_relative_eq!(rect.area(), 8.0, epsilon = 1e-3);
        assert_relative_eq!(rect.side_ratio(), 0.5, epsilon = 1e-3);
    }

    #[test]
    fn min_area_rect_degenerate_segment() {
        let pts = [Point2::new(0.0, 0.0), Point2::new(5.0, 0.0)];
        let rect = min_area_rect(&pts).expect("rect");
        assert_relative_eq!(rect.area(), 0.0);
        assert_relative_eq!(rect.side_ratio(), 0.0);
    }

    #[test]
    fn enclosing_circle_of_ring_matches_radius() {
        let pts = ring(180, 25.0, 10.0, -4.0);
        let (center, radius) = min_enclosing_circle(&pts).expect("circle");
        assert_relative_eq!(radius, 25.0, epsilon = 1e-2);
        assert_relative_eq!(center.x, 10.0, epsilon = 1e-2);
        assert_relative_eq!(center.y, -4.0, epsilon = 1e-2);
    }

    #[test]
    fn enclosing_circle_of_two_points() {
        let pts = [Point2::new(-3.0, 0.0), Point2::new(3.0, 0.0)];
        let (center, radius) = min_enclosing_circle(&pts).expect("circle");
        assert_relative_eq!(radius, 3.0, epsilon = 1e-4);
        assert_relative_eq!(center.x, 0.0, epsilon = 1e-4);
    }

    #[test]
    fn enclosing_circle_of_single_point_has_zero_radius() {
        let pts = [Point2::new(7.0, 7.0)];
        let (_, radius) = min_enclosing_circle(&pts).expect("circle");
        assert_relative_eq!(radius, 0.0);
    }

    #[test]
    fn hull_of_square_with_interior_points() {
        let mut pts = dense_square(10.0, 10);
        pts.push(Point2::new(5.0, 5.0));
        let hull = convex_hull(&pts);
        assert_eq!(hull.len(), 4);
    }

    #[test]
    fn bounding_box_fields() {
        let pts = [
            Point2::new(2.0, 1.0),
            Point2::new(8.0, 6.0),
            Point2::new(4.0, 3.0),
        ];
        let bbox = bounding_box(&pts).expect("bbox");
        assert_relative_eq!(bbox.center_x(), 5.0);
        assert_relative_eq!(bbox.bottom_y(), 6.0);
        assert_relative_eq!(bbox.width(), 6.0);
        assert_relative_eq!(bbox.height(), 5.0);
    }
}
