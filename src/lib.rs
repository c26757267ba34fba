//! Spatial stripes for Open Pixel Control servers.
//!
//! Creates moving stripes that map each pixel's x, y and z coordinates to
//! red, green and blue. A fade wave travels through the pixels in layout
//! order and carries occasional twinkles with it.
//!
//! - [`layout`]: load pixel positions from a JSON layout file
//! - [`pattern`]: the per-pixel color function
//! - [`opc`]: the wire protocol client
//! - [`render`]: the send loop that ties them together
//!
//! This module also holds the wire color type and Ctrl-C handling.

pub mod config;
pub mod error;
pub mod layout;
pub mod opc;
pub mod pattern;
pub mod render;
pub mod waves;

pub use config::Config;
pub use error::{Error, Result};
pub use layout::{Layout, Point};
pub use pattern::Rgb;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

// ── Color ──────────────────────────────────────────────────────────

/// A color as it goes out on the wire: one byte per channel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Saturate each channel to 0-255, truncating toward zero. NaN becomes 0.
impl From<Rgb> for Color {
    fn from(c: Rgb) -> Self {
        // `as` on floats saturates and maps NaN to 0.
        Self {
            r: c.r as u8,
            g: c.g as u8,
            b: c.b as u8,
        }
    }
}

// ── Signal handling ────────────────────────────────────────────────

/// Install a Ctrl+C handler that clears the returned `running` flag.
pub fn setup_signal_handler() -> Result<Arc<AtomicBool>> {
    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();

    ctrlc::set_handler(move || {
        r.store(false, Ordering::SeqCst);
    })?;

    Ok(running)
}

/// Check if the main loop should keep running.
pub fn is_running(running: &AtomicBool) -> bool {
    running.load(Ordering::SeqCst)
}

// ── Tests ──────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[test]
    fn color_new() {
        let c = Color::new(10, 20, 30);
        assert_eq!(c.r, 10);
        assert_eq!(c.g, 20);
        assert_eq!(c.b, 30);
    }

    #[rstest]
    #[case(0.0, 0)]
    #[case(127.9, 127)] // truncates
    #[case(255.0, 255)]
    #[case(319.65, 255)] // saturates high
    #[case(-12.5, 0)] // saturates low
    #[case(f64::NAN, 0)]
    fn rgb_channel_to_wire(#[case] value: f64, #[case] expected: u8) {
        let c = Color::from(Rgb::new(value, value, value));
        assert_eq!(c, Color::new(expected, expected, expected));
    }

    #[test]
    fn rgb_channels_convert_independently() {
        let c: Color = Rgb::new(68.67, 240.85, 319.65).into();
        assert_eq!(c, Color::new(68, 240, 255));
    }

    #[test]
    fn is_running_reads_flag() {
        let running = AtomicBool::new(true);
        assert!(is_running(&running));
        running.store(false, Ordering::SeqCst);
        assert!(!is_running(&running));
    }
}
