//! Spatial stripes: the per-pixel color function.
//!
//! Each point's x, y and z coordinates become moving red, green and blue
//! stripes. A sharply peaked fade wave travels through the layout in pixel
//! order, and a sparse twinkle rides on top of it.
//!
//! ## Two clocks
//! The animation runs on the logical time `t` handed in by the send loop, but
//! the twinkle phase is read from the wall clock on every call. The twinkles
//! therefore drift against the stripes at real-time speed. The wall clock sits
//! behind [`Clock`] so tests can freeze it.

use crate::layout::Point;
use crate::waves::{clamp, contrast, cos_wave, gamma, remap};
use std::time::{SystemTime, UNIX_EPOCH};

/// Factor applied to elapsed seconds before they reach [`Stripes::pixel_color`].
pub const TIME_SCALE: f64 = 0.6;

const CONTRAST_CENTER: f64 = 0.5;
const CONTRAST_FACTOR: f64 = 1.5;

const FADE_PERIOD: f64 = 7.0;
const FADE_SHARPNESS: i32 = 20;

const TWINKLE_SPEED: f64 = 0.07;
const TWINKLE_DENSITY: f64 = 0.1;

// ── Color ────────────────────────────────────────────────────────────

/// Unclamped floating-point color.
///
/// Values coming out of [`Stripes::pixel_color`] are nominally 0-255 but may
/// fall outside that range; saturation happens when converting to
/// [`crate::Color`] for the wire.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rgb {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl Rgb {
    pub fn new(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }

    pub fn scale(self, factor: f64) -> Self {
        Self::new(self.r * factor, self.g * factor, self.b * factor)
    }

    /// Add the same amount to every channel.
    pub fn lift(self, amount: f64) -> Self {
        Self::new(self.r + amount, self.g + amount, self.b + amount)
    }
}

// ── Clock ────────────────────────────────────────────────────────────

/// Source of wall-clock time, in seconds since the Unix epoch.
pub trait Clock {
    fn now_secs(&self) -> f64;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_secs(&self) -> f64 {
        // A clock set before 1970 reads as the epoch.
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs_f64())
            .unwrap_or(0.0)
    }
}

/// A clock stuck at one instant.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FixedClock(pub f64);

impl Clock for FixedClock {
    fn now_secs(&self) -> f64 {
        self.0
    }
}

// ── Pattern ──────────────────────────────────────────────────────────

/// Phase of the fade wave for pixel `index`: `1` at the crest, `0` in the trough,
/// raised to a high power so it is dark for most of each cycle.
pub fn fade(t: f64, index: usize, total: usize) -> f64 {
    let phase = t - index as f64 / total as f64;
    cos_wave(phase, 0.0, FADE_PERIOD, 0.0, 1.0).powi(FADE_SHARPNESS)
}

/// Brightness added to all three channels of one pixel.
///
/// `seed` desynchronizes pixels and `wall_secs` drives them; the result is
/// gated by `fade` so twinkles only show up under the crest of the fade wave.
pub fn twinkle(seed: f64, wall_secs: f64, fade: f64) -> f64 {
    let phase = (seed * 7.0 + wall_secs * TWINKLE_SPEED).rem_euclid(1.0);
    let triangle = (phase * 2.0 - 1.0).abs();
    let sparse = remap(triangle, 0.0, 1.0, -1.0 / TWINKLE_DENSITY, 1.1);
    let spike = clamp(sparse, -0.5, 1.1).powi(5);
    clamp(spike * fade, -0.3, 1.0)
}

/// Move every seventh pixel so the stripes don't band across the layout.
fn scatter(index: usize, total: usize, x: f64, y: f64, z: f64) -> (f64, f64, f64) {
    if index % 7 != 0 {
        return (x, y, z);
    }
    let n = total as f64;
    let ii = index as u64;
    (
        x + ((ii.wrapping_mul(123)) % 5) as f64 / n * 32.12,
        y + ((ii.wrapping_mul(137)) % 5) as f64 / n * 22.23,
        z + ((ii.wrapping_mul(147)) % 7) as f64 / n * 44.34,
    )
}

/// The spatial stripes pattern.
#[derive(Clone, Debug)]
pub struct Stripes<C: Clock = SystemClock> {
    clock: C,
    gamma: Option<f64>,
}

impl Stripes<SystemClock> {
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }
}

impl Default for Stripes<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> Stripes<C> {
    pub fn with_clock(clock: C) -> Self {
        Self { clock, gamma: None }
    }

    /// Enable a gamma curve on the final color. Off by default: simulators
    /// want linear values, physical LEDs usually look better around 2.2.
    pub fn with_gamma(mut self, exponent: Option<f64>) -> Self {
        self.gamma = exponent;
        self
    }

    /// Stripes and fade for one pixel, in the unit range, before twinkle.
    ///
    /// Depends only on its arguments. Returns the faded color and the fade
    /// value so callers can gate the twinkle with the same envelope.
    ///
    /// `total` must be non-zero.
    pub fn base_color(&self, t: f64, point: Point, index: usize, total: usize) -> (Rgb, f64) {
        let Point { mut x, mut y, mut z } = point;

        y += cos_wave(x + 0.2 * z, 0.0, 1.0, 0.0, 0.6);
        z += cos_wave(x, 0.0, 1.0, 0.0, 0.3);
        x += cos_wave(y + z, 0.0, 1.5, 0.0, 0.2);

        let (x, y, z) = scatter(index, total, y, z, x);

        let offset = t / 4.0;
        let stripes = Rgb::new(
            cos_wave(x, offset, 2.0, 0.0, 1.0),
            cos_wave(y, offset, 2.0, 0.0, 1.0),
            cos_wave(z, offset, 2.0, 0.0, 1.0),
        );
        let stripes = contrast(stripes, CONTRAST_CENTER, CONTRAST_FACTOR);

        let fade = fade(t, index, total);
        (stripes.scale(fade), fade)
    }

    /// Color of pixel `index` at logical time `t`, nominally 0-255 per channel.
    ///
    /// `total` must be non-zero; the send loop never calls this for an
    /// empty layout.
    pub fn pixel_color(&self, t: f64, point: Point, index: usize, total: usize, seed: f64) -> Rgb {
        let (color, fade) = self.base_color(t, point, index, total);
        let color = color.lift(twinkle(seed, self.clock.now_secs(), fade));
        let color = match self.gamma {
            Some(exponent) => gamma(color, exponent),
            None => color,
        };
        color.scale(256.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    const EPS: f64 = 1e-9;

    fn assert_rgb_close(actual: Rgb, expected: Rgb) {
        for (a, e) in [(actual.r, expected.r), (actual.g, expected.g), (actual.b, expected.b)] {
            assert!((a - e).abs() < EPS, "expected {expected:?}, got {actual:?}");
        }
    }

    fn origin() -> Point {
        Point::new(0.0, 0.0, 0.0)
    }

    #[test]
    fn origin_fixture_without_twinkle() {
        let stripes = Stripes::with_clock(FixedClock(0.0));
        let (color, fade) = stripes.base_color(0.0, origin(), 0, 1);
        assert_eq!(fade, 1.0);
        assert_rgb_close(
            color.scale(256.0),
            Rgb::new(68.66873708001012, 240.85476844015483, 319.6545142509636),
        );
    }

    #[test]
    fn origin_fixture_with_frozen_clock() {
        // At wall time 0 with seed 0 the twinkle sits on its crest and adds 1.0.
        let stripes = Stripes::with_clock(FixedClock(0.0));
        let color = stripes.pixel_color(0.0, origin(), 0, 1, 0.0);
        assert_rgb_close(
            color,
            Rgb::new(324.66873708001015, 496.8547684401548, 575.6545142509635),
        );
    }

    #[test]
    fn frozen_clock_is_deterministic() {
        let stripes = Stripes::with_clock(FixedClock(1_700_000_000.25));
        let point = Point::new(0.3, -1.2, 2.5);
        let first = stripes.pixel_color(4.2, point, 13, 50, 0.42);
        let second = stripes.pixel_color(4.2, point, 13, 50, 0.42);
        assert_eq!(first, second);
    }

    #[rstest]
    #[case(1)]
    #[case(6)]
    #[case(8)]
    #[case(48)]
    fn scatter_leaves_other_pixels_alone(#[case] index: usize) {
        assert_eq!(scatter(index, 50, 0.1, 0.2, 0.3), (0.1, 0.2, 0.3));
    }

    #[test]
    fn scatter_moves_every_seventh_pixel() {
        // 7*123 % 5 = 1, 7*137 % 5 = 4, 7*147 % 7 = 0
        let (x, y, z) = scatter(7, 10, 0.0, 0.0, 0.0);
        assert!((x - 3.212).abs() < EPS);
        assert!((y - 8.892).abs() < EPS);
        assert_eq!(z, 0.0);
    }

    #[test]
    fn scatter_is_a_noop_for_index_zero() {
        assert_eq!(scatter(0, 3, 1.0, 2.0, 3.0), (1.0, 2.0, 3.0));
    }

    #[test]
    fn fade_peaks_at_crest_and_vanishes_in_trough() {
        assert_eq!(fade(0.0, 0, 1), 1.0);
        assert_eq!(fade(7.0, 0, 1), 1.0);
        assert!(fade(3.5, 0, 1) < 1e-30);
    }

    #[test]
    fn fade_is_staggered_by_position() {
        // Pixel 1 of 2 reaches the crest half a unit of time after pixel 0.
        assert_eq!(fade(0.5, 1, 2), 1.0);
        assert!(fade(0.0, 1, 2) < 1.0);
    }

    #[test]
    fn fade_is_dark_most_of_the_cycle() {
        let samples = 7000;
        let lit = (0..samples)
            .map(|i| fade(i as f64 * FADE_PERIOD / samples as f64, 0, 1))
            .filter(|&f| f > 0.01)
            .count();
        assert!(lit < samples / 3, "{lit} of {samples} samples lit");

        let bright = (0..samples)
            .map(|i| fade(i as f64 * FADE_PERIOD / samples as f64, 0, 1))
            .filter(|&f| f > 0.99)
            .count();
        assert!(bright < samples / 50, "{bright} of {samples} samples bright");
    }

    #[test]
    fn twinkle_is_gated_by_fade() {
        assert_eq!(twinkle(0.0, 0.0, 0.0), 0.0);
        assert_eq!(twinkle(0.0, 0.0, 1.0), 1.0);
    }

    #[test]
    fn twinkle_darkens_away_from_its_crest() {
        // Phase 0.5 is the bottom of the triangle wave: clamped to -0.5, then ^5.
        let seed = 0.5 / 7.0;
        let value = twinkle(seed, 0.0, 1.0);
        assert!((value - (-0.5f64).powi(5)).abs() < EPS);
    }

    #[test]
    fn twinkle_follows_the_wall_clock() {
        let crest = twinkle(0.0, 0.0, 1.0);
        // Half a twinkle cycle later the same pixel is in its trough.
        let later = twinkle(0.0, 0.5 / TWINKLE_SPEED, 1.0);
        assert!(later < crest);
    }

    #[test]
    fn twinkle_stays_within_clamp() {
        for i in 0..1000 {
            let value = twinkle(i as f64 / 1000.0, 123.4, 1.0);
            assert!((-0.3..=1.0).contains(&value));
        }
    }

    #[test]
    fn gamma_is_off_by_default() {
        assert_eq!(Stripes::new().gamma, None);
    }

    #[test]
    fn gamma_applies_before_scaling() {
        let linear = Stripes::with_clock(FixedClock(0.0));
        let curved = Stripes::with_clock(FixedClock(0.0)).with_gamma(Some(2.0));
        let point = Point::new(0.1, 0.2, 0.3);

        let base = linear.pixel_color(0.5, point, 3, 10, 0.25).scale(1.0 / 256.0);
        let out = curved.pixel_color(0.5, point, 3, 10, 0.25);
        assert_rgb_close(out, gamma(base, 2.0).scale(256.0));
    }
}
