//! Perception stages for vision-guided navigation.
//!
//! The pipeline is: RGB frame -> HSV color mask -> outer contours ->
//! shape classification -> best-target selection. Each stage is a pure
//! function of its inputs plus static parameters, so every stage can be
//! exercised on synthetic images.

mod color;
mod region;
mod segment;
mod select;
mod shape;

pub use color::{ColorTable, HsvRange};
pub use region::{find_regions, Region};
pub use segment::{blur_rgb, Segmenter};
pub use select::{Target, TargetSelector, TargetSelectorParams};
pub use shape::{classify, ShapeLabel};
