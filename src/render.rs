//! Send loop: compute a frame for every pixel, push it, sleep, repeat.
//!
//! Everything the loop needs lives in [`SendLoop`]: the layout, one random
//! seed per pixel, the pattern, and the sink frames go to. The loop runs on
//! the calling thread until the `running` flag clears or a send fails.
//!
//! Pacing is a plain sleep of `1/fps` after each frame. Slow frames are not
//! compensated for, so the real frame rate drifts below the target when a
//! frame takes a noticeable time to compute or send.

use crate::opc::PixelSink;
use crate::pattern::{Clock, Stripes, SystemClock, TIME_SCALE};
use crate::{Color, Error, Layout, Result, is_running};
use rand::Rng;
use std::sync::atomic::AtomicBool;
use std::thread;
use std::time::{Duration, Instant};

/// OPC channel 0 addresses every device on the server.
pub const CHANNEL: u8 = 0;

/// One uniform value in `[0, 1)` per pixel.
pub fn random_seeds<R: Rng + ?Sized>(count: usize, rng: &mut R) -> Vec<f64> {
    (0..count).map(|_| rng.r#gen::<f64>()).collect()
}

pub struct SendLoop<S: PixelSink, C: Clock = SystemClock> {
    layout: Layout,
    seeds: Vec<f64>,
    pattern: Stripes<C>,
    sink: S,
    frame_interval: Duration,
}

impl<S: PixelSink, C: Clock> SendLoop<S, C> {
    /// Loop with fresh random seeds.
    pub fn new(layout: Layout, pattern: Stripes<C>, sink: S, frame_interval: Duration) -> Self {
        let seeds = random_seeds(layout.len(), &mut rand::thread_rng());
        Self {
            layout,
            seeds,
            pattern,
            sink,
            frame_interval,
        }
    }

    /// Assemble a loop from explicit parts. `seeds` must hold exactly one
    /// value per pixel.
    pub fn with_parts(
        layout: Layout,
        seeds: Vec<f64>,
        pattern: Stripes<C>,
        sink: S,
        frame_interval: Duration,
    ) -> Result<Self> {
        if seeds.len() != layout.len() {
            return Err(Error::config(format!(
                "one seed per pixel: {} seeds for {} pixels",
                seeds.len(),
                layout.len()
            )));
        }
        Ok(Self {
            layout,
            seeds,
            pattern,
            sink,
            frame_interval,
        })
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Colors for every pixel at logical time `t`, in layout order.
    pub fn frame(&self, t: f64) -> Vec<Color> {
        let total = self.layout.len();
        self.layout
            .points()
            .iter()
            .zip(&self.seeds)
            .enumerate()
            .map(|(i, (&point, &seed))| {
                Color::from(self.pattern.pixel_color(t, point, i, total, seed))
            })
            .collect()
    }

    /// Compute and send one frame for `elapsed` time since the loop started.
    pub fn tick(&mut self, elapsed: Duration) -> Result<()> {
        let pixels = self.frame(elapsed.as_secs_f64() * TIME_SCALE);
        self.sink.put_pixels(CHANNEL, &pixels)
    }

    /// Stream frames until `running` is cleared. A failed send ends the loop
    /// with that error.
    pub fn run(&mut self, running: &AtomicBool) -> Result<()> {
        let start = Instant::now();
        let report_every = frames_per_second(self.frame_interval);
        let mut frames: u64 = 0;

        while is_running(running) {
            let frame_start = Instant::now();
            self.tick(start.elapsed())?;
            frames += 1;

            if frames % report_every == 0 {
                tracing::debug!(
                    "Frame {}: {} pixels in {}µs",
                    frames,
                    self.layout.len(),
                    frame_start.elapsed().as_micros()
                );
            }

            thread::sleep(self.frame_interval);
        }

        tracing::info!("Stopped after {} frames", frames);
        Ok(())
    }
}

fn frames_per_second(interval: Duration) -> u64 {
    if interval.is_zero() {
        return 1;
    }
    ((1.0 / interval.as_secs_f64()).round() as u64).max(1)
}
