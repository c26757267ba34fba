//! Small numeric helpers for building animated color patterns.
//!
//! Every helper works on plain `f64` values so patterns can be composed and
//! tested without touching the wire format.

use crate::pattern::Rgb;
use std::f64::consts::TAU;

/// Cosine wave scaled to `[min, max]`.
///
/// `x` is divided by `period` and shifted by `offset` (in periods), so the wave
/// peaks at `max` whenever `x / period - offset` is an integer.
pub fn cos_wave(x: f64, offset: f64, period: f64, min: f64, max: f64) -> f64 {
    let unit = ((x / period - offset) * TAU).cos() / 2.0 + 0.5;
    unit * (max - min) + min
}

/// Linearly map `x` from `[old_min, old_max]` onto `[new_min, new_max]`.
pub fn remap(x: f64, old_min: f64, old_max: f64, new_min: f64, new_max: f64) -> f64 {
    let zero_to_one = (x - old_min) / (old_max - old_min);
    zero_to_one * (new_max - new_min) + new_min
}

pub fn clamp(x: f64, min: f64, max: f64) -> f64 {
    x.max(min).min(max)
}

/// Push each channel away from `center` by `factor`. Results are not clamped.
pub fn contrast(color: Rgb, center: f64, factor: f64) -> Rgb {
    let adjust = |v: f64| (v - center) * factor + center;
    Rgb::new(adjust(color.r), adjust(color.g), adjust(color.b))
}

/// Gamma curve for channels in `[0, 1]`. Negative channels are floored at 0 first.
pub fn gamma(color: Rgb, exponent: f64) -> Rgb {
    let curve = |v: f64| v.max(0.0).powf(exponent);
    Rgb::new(curve(color.r), curve(color.g), curve(color.b))
}
