//! Frame-rate counting and the per-zoom diagnostics report.

use std::fmt;
use std::time::{Duration, Instant};

use serde::Serialize;

use crate::viewport::{Bounds, ViewportState};

/// Counts frames and publishes the number seen during the last full second.
#[derive(Debug, Clone)]
pub struct FrameCounter {
    window_start: Instant,
    frames_in_window: u32,
    fps: u32,
}

impl FrameCounter {
    const WINDOW: Duration = Duration::from_secs(1);

    pub fn new(now: Instant) -> Self {
        Self {
            window_start: now,
            frames_in_window: 0,
            fps: 0,
        }
    }

    /// Record one frame at `now`. Returns `true` when a new rate was published.
    pub fn tick(&mut self, now: Instant) -> bool {
        self.frames_in_window += 1;
        if now.saturating_duration_since(self.window_start) >= Self::WINDOW {
            self.fps = self.frames_in_window;
            self.frames_in_window = 0;
            self.window_start = now;
            return true;
        }
        false
    }

    /// Frames counted over the most recently completed one-second window.
    pub fn fps(&self) -> u32 {
        self.fps
    }
}

/// Snapshot of the viewer's state, emitted after each scroll-driven zoom.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ZoomReport {
    pub fps: u32,
    pub bounds: Bounds,
    /// Initial X span divided by the current X span.
    pub zoom: f64,
    pub iterations: u32,
}

impl ZoomReport {
    pub fn capture(state: &ViewportState, fps: u32) -> Self {
        Self {
            fps,
            bounds: state.bounds(),
            zoom: state.zoom_factor(),
            iterations: state.iterations(),
        }
    }
}

impl fmt::Display for ZoomReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let b = &self.bounds;
        writeln!(f, "FPS: {}", self.fps)?;
        writeln!(
            f,
            "X({:.15}, {:.15})\tY({:.15}, {:.15})",
            b.min_x(),
            b.max_x(),
            b.min_y(),
            b.max_y()
        )?;
        write!(
            f,
            "zoom: {:.15e}\tMax iterations: {}",
            self.zoom, self.iterations
        )
    }
}
