//! Colour helpers
//!
//! Colours are linear `[r, g, b, a]` in 0..=1, matching `Vertex::color`.

use crate::consts::{FOG_END, FOG_START};
use crate::lerp;

pub type Rgba = [f32; 4];

pub const WHITE: Rgba = [1.0, 1.0, 1.0, 1.0];
pub const BLACK: Rgba = [0.0, 0.0, 0.0, 1.0];
pub const TRANSPARENT: Rgba = [0.0, 0.0, 0.0, 0.0];

/// Opaque colour from `0xRRGGBB`
pub const fn rgb(hex: u32) -> Rgba {
    [
        ((hex >> 16) & 0xff) as f32 / 255.0,
        ((hex >> 8) & 0xff) as f32 / 255.0,
        (hex & 0xff) as f32 / 255.0,
        1.0,
    ]
}

pub const fn rgba(hex: u32, alpha: f32) -> Rgba {
    let c = rgb(hex);
    [c[0], c[1], c[2], alpha]
}

pub fn with_alpha(c: Rgba, alpha: f32) -> Rgba {
    [c[0], c[1], c[2], alpha]
}

/// Move each channel `amount` of the way toward white
pub fn lighten(c: Rgba, amount: f32) -> Rgba {
    [
        lerp(c[0], 1.0, amount),
        lerp(c[1], 1.0, amount),
        lerp(c[2], 1.0, amount),
        c[3],
    ]
}

/// Scale each channel down by `amount`
pub fn darken(c: Rgba, amount: f32) -> Rgba {
    let k = 1.0 - amount;
    [c[0] * k, c[1] * k, c[2] * k, c[3]]
}

pub fn mix(a: Rgba, b: Rgba, t: f32) -> Rgba {
    [
        lerp(a[0], b[0], t),
        lerp(a[1], b[1], t),
        lerp(a[2], b[2], t),
        lerp(a[3], b[3], t),
    ]
}

/// Fog weight at world depth `z`: 0 before `FOG_START`, 1 from `FOG_END`
pub fn fog_factor(z: f32) -> f32 {
    ((z - FOG_START) / (FOG_END - FOG_START)).clamp(0.0, 1.0)
}

/// Blend `c` toward `fog` by the fog weight at `z`, keeping alpha
pub fn fogged(c: Rgba, fog: Rgba, z: f32) -> Rgba {
    let t = fog_factor(z);
    if t <= 0.0 {
        return c;
    }
    with_alpha(mix(c, fog, t), c[3])
}
