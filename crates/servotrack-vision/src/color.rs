//! Named target colors as closed HSV intervals.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use servotrack_core::Hsv;

/// One closed interval in HSV space; all bounds inclusive.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct HsvRange {
    pub lower: Hsv,
    pub upper: Hsv,
}

impl HsvRange {
    pub fn new(lower: Hsv, upper: Hsv) -> Self {
        Self { lower, upper }
    }

    pub fn contains(&self, px: Hsv) -> bool {
        px.h >= self.lower.h
            && px.h <= self.upper.h
            && px.s >= self.lower.s
            && px.s <= self.upper.s
            && px.v >= self.lower.v
            && px.v <= self.upper.v
    }
}

/// Static map from color name to one or more HSV intervals.
///
/// Colors that straddle the hue origin (red) carry two intervals which are
/// OR-ed during masking. The table is loaded once and never mutated at
/// runtime.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ColorTable {
    colors: HashMap<String, Vec<HsvRange>>,
}

impl ColorTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// The workshop's published color table. Hue dominates the selection;
    /// saturation and value bounds only reject washed-out pixels.
    pub fn builtin() -> Self {
        let mut table = Self::new();
        table.insert(
            "red",
            vec![
                HsvRange::new(Hsv::new(0, 43, 46), Hsv::new(10, 255, 255)),
                HsvRange::new(Hsv::new(156, 43, 46), Hsv::new(179, 255, 255)),
            ],
        );
        table.insert(
            "green",
            vec![HsvRange::new(Hsv::new(35, 43, 46), Hsv::new(99, 255, 255))],
        );
        table.insert(
            "blue",
            vec![HsvRange::new(Hsv::new(100, 43, 46), Hsv::new(130, 255, 255))],
        );
        table.insert(
            "yellow",
            vec![HsvRange::new(Hsv::new(20, 43, 46), Hsv::new(30, 255, 255))],
        );
        table.insert(
            "purple",
            vec![HsvRange::new(Hsv::new(140, 43, 46), Hsv::new(160, 255, 255))],
        );
        table
    }

    pub fn insert(&mut self, name: &str, ranges: Vec<HsvRange>) {
        self.colors.insert(name.to_ascii_lowercase(), ranges);
    }

    /// Look up a color by name, case-insensitive. `None` means the color is
    /// not configured; callers treat that as "no detection", not an error.
    pub fn ranges(&self, name: &str) -> Option<&[HsvRange]> {
        self.colors
            .get(&name.to_ascii_lowercase())
            .map(Vec::as_slice)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.colors.keys().map(String::as_str)
    }
}
