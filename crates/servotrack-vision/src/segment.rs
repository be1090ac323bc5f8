//! HSV color masking.

use image::{GrayImage, ImageBuffer, Luma, Rgb, RgbImage};
use servotrack_core::Hsv;

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::color::ColorTable;

/// Gaussian-blur an RGB frame before masking to suppress sensor noise.
///
/// Filtering runs in f32 and is converted back to 8-bit afterwards.
pub fn blur_rgb(frame: &RgbImage, sigma: f32) -> RgbImage {
    if sigma <= 0.0 {
        return frame.clone();
    }

    let (w, h) = frame.dimensions();
    let mut f = ImageBuffer::<Rgb<f32>, Vec<f32>>::new(w, h);
    for (x, y, px) in frame.enumerate_pixels() {
        f.put_pixel(
            x,
            y,
            Rgb([px[0] as f32 / 255.0, px[1] as f32 / 255.0, px[2] as f32 / 255.0]),
        );
    }
    let blurred = imageproc::filter::gaussian_blur_f32(&f, sigma);
    let mut out = RgbImage::new(w, h);
    for (x, y, px) in blurred.enumerate_pixels() {
        out.put_pixel(
            x,
            y,
            Rgb([
                (px[0].clamp(0.0, 1.0) * 255.0).round() as u8,
                (px[1].clamp(0.0, 1.0) * 255.0).round() as u8,
                (px[2].clamp(0.0, 1.0) * 255.0).round() as u8,
            ]),
        );
    }
    out
}

/// Produces binary masks selecting the pixels of one named color.
#[derive(Clone, Debug, Default)]
pub struct Segmenter {
    table: ColorTable,
}

impl Segmenter {
    pub fn new(table: ColorTable) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &ColorTable {
        &self.table
    }

    /// Build the binary mask for `color_name`.
    ///
    /// Returns `None` when the color is not configured, which callers must
    /// treat as "no detection this frame". Pixels inside any of the color's
    /// closed HSV intervals are set to 255, everything else to 0.
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "debug", skip(self, frame), fields(width = frame.width(), height = frame.height()))
    )]
    pub fn mask(&self, frame: &RgbImage, color_name: &str) -> Option<GrayImage> {
        let ranges = self.table.ranges(color_name)?;

        let (w, h) = frame.dimensions();
        let mut mask = GrayImage::new(w, h);
        for (x, y, px) in frame.enumerate_pixels() {
            let hsv = Hsv::from_rgb(px[0], px[1], px[2]);
            let hit = ranges.iter().any(|r| r.contains(hsv));
            mask.put_pixel(x, y, Luma([if hit { 255 } else { 0 }]));
        }
        Some(mask)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::ColorTable;

    fn solid(w: u32, h: u32, rgb: [u8; 3]) -> RgbImage {
        RgbImage::from_pixel(w, h, Rgb(rgb))
    }

    fn segmenter() -> Segmenter {
        Segmenter::new(ColorTable::builtin())
    }

    #[test]
    fn frame_inside_interval_yields_all_set_mask() {
        let frame = solid(16, 12, [0, 200, 0]);
        let mask = segmenter().mask(&frame, "green").expect("mask");
        assert!(mask.pixels().all(|p| p[0] == 255));
    }

    #[test]
    fn frame_outside_all_intervals_yields_all_clear_mask() {
        // Mid-gray has zero saturation, below every configured lower bound.
        let frame = solid(16, 12, [128, 128, 128]);
        let mask = segmenter().mask(&frame, "green").expect("mask");
        assert!(mask.pixels().all(|p| p[0] == 0));
    }

    #[test]
    fn red_matches_through_both_hue_intervals() {
        let wrapped = solid(4, 4, [255, 0, 10]);
        let low = solid(4, 4, [255, 30, 0]);
        let seg = segmenter();
        for frame in [wrapped, low] {
            let mask = seg.mask(&frame, "red").expect("mask");
            assert!(mask.pixels().all(|p| p[0] == 255));
        }
    }

    #[test]
    fn unknown_color_is_absent_not_an_error() {
        let frame = solid(4, 4, [0, 200, 0]);
        assert!(segmenter().mask(&frame, "chartreuse").is_none());
    }

    #[test]
    fn blur_preserves_solid_frames() {
        let frame = solid(9, 9, [10, 200, 30]);
        let blurred = blur_rgb(&frame, 1.5);
        let center = blurred.get_pixel(4, 4);
        assert_eq!(center[1], 200);
    }
}
