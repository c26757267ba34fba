//! Validated runtime configuration.

use crate::error::{Error, Result};
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_SERVER: &str = "127.0.0.1:7890";
pub const DEFAULT_FPS: u32 = 20;

/// Everything the binary needs to start streaming.
///
/// Built once from the command line and passed down explicitly; nothing
/// here is global.
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    pub layout: PathBuf,
    pub server: String,
    pub fps: u32,
    pub gamma: Option<f64>,
}

impl Config {
    pub fn new(
        layout: PathBuf,
        server: impl Into<String>,
        fps: u32,
        gamma: Option<f64>,
    ) -> Result<Self> {
        if fps == 0 {
            return Err(Error::config("fps must be at least 1"));
        }
        if let Some(g) = gamma {
            if !g.is_finite() || g <= 0.0 {
                return Err(Error::config(format!(
                    "gamma must be a positive number, got {g}"
                )));
            }
        }
        Ok(Self {
            layout,
            server: server.into(),
            fps,
            gamma,
        })
    }

    /// Time to sleep between frames.
    pub fn frame_interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.fps as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn config(fps: u32) -> Result<Config> {
        Config::new(PathBuf::from("layouts/wall.json"), DEFAULT_SERVER, fps, None)
    }

    #[rstest]
    #[case(1, Duration::from_secs(1))]
    #[case(20, Duration::from_millis(50))]
    #[case(50, Duration::from_millis(20))]
    #[case(60, Duration::from_secs_f64(1.0 / 60.0))]
    fn frame_interval_is_one_over_fps(#[case] fps: u32, #[case] expected: Duration) {
        assert_eq!(config(fps).unwrap().frame_interval(), expected);
    }

    #[test]
    fn zero_fps_is_rejected() {
        assert!(matches!(config(0), Err(Error::Config { .. })));
    }

    #[test]
    fn keeps_settings() {
        let cfg = Config::new(PathBuf::from("a.json"), "10.0.0.2:7890", DEFAULT_FPS, Some(2.2)).unwrap();
        assert_eq!(cfg.layout, PathBuf::from("a.json"));
        assert_eq!(cfg.server, "10.0.0.2:7890");
        assert_eq!(cfg.fps, 20);
        assert_eq!(cfg.gamma, Some(2.2));
    }

    #[rstest]
    #[case(0.0)]
    #[case(-2.2)]
    #[case(f64::NAN)]
    #[case(f64::INFINITY)]
    fn bad_gamma_is_rejected(#[case] gamma: f64) {
        let result = Config::new(PathBuf::from("a.json"), DEFAULT_SERVER, 20, Some(gamma));
        assert!(matches!(result, Err(Error::Config { .. })));
    }
}
