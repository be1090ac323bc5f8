//! 8-bit HSV pixel representation.
//!
//! Hue uses the half-degree convention (`0..180`) so published color tables
//! for 8-bit vision pipelines apply verbatim; saturation and value span the
//! full `0..=255` range.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct Hsv {
    /// Hue in half degrees, `0..180`.
    pub h: u8,
    pub s: u8,
    pub v: u8,
}

impl Hsv {
    pub fn new(h: u8, s: u8, v: u8) -> Self {
        Self { h, s, v }
    }

    /// Convert an 8-bit RGB pixel.
    pub fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        let rf = r as f32;
        let gf = g as f32;
        let bf = b as f32;

        let max = rf.max(gf).max(bf);
        let min = rf.min(gf).min(bf);
        let delta = max - min;

        let v = max;
        let s = if max > 0.0 { 255.0 * delta / max } else { 0.0 };

        let h_deg = if delta <= 0.0 {
            0.0
        } else if max == rf {
            60.0 * (gf - bf) / delta
        } else if max == gf {
            120.0 + 60.0 * (bf - rf) / delta
        } else {
            240.0 + 60.0 * (rf - gf) / delta
        };
        let h_deg = if h_deg < 0.0 { h_deg + 360.0 } else { h_deg };

        Self {
            h: ((h_deg / 2.0) as u16 % 180) as u8,
            s: s.round().clamp(0.0, 255.0) as u8,
            v: v as u8,
        }
    }
}
