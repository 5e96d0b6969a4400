use serde::Serialize;
use tracing::debug;

use crate::error::CoreError;

/// Iteration budget a fresh session starts with.
pub const DEFAULT_ITERATIONS: u32 = 50;

/// Span multiplier applied by one zoom-in step (zoom-out divides by it).
pub const DEFAULT_ZOOM_RATIO: f64 = 0.75;

/// Iteration budget multiplier applied by one zoom-in step (zoom-out divides by it).
pub const ITERATION_GROWTH: f64 = 1.05;

// ---------------------------------------------------------------------------
// Bounds
// ---------------------------------------------------------------------------

/// An axis-aligned rectangle of the complex plane.
///
/// Always finite with `min_x < max_x` and `min_y < max_y`; every constructor
/// checks this, so a `Bounds` value can never hold a degenerate rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bounds {
    min_x: f64,
    max_x: f64,
    min_y: f64,
    max_y: f64,
}

/// Deserialization goes through [`Bounds::new`] so a hand-edited
/// preferences file cannot smuggle in an inverted rectangle.
impl<'de> serde::Deserialize<'de> for Bounds {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(serde::Deserialize)]
        struct Raw {
            min_x: f64,
            max_x: f64,
            min_y: f64,
            max_y: f64,
        }
        let raw = Raw::deserialize(deserializer)?;
        Bounds::new(raw.min_x, raw.max_x, raw.min_y, raw.max_y).map_err(serde::de::Error::custom)
    }
}

impl Bounds {
    /// The `[-2, 2] × [-2, 2]` square the viewer opens on.
    pub const DEFAULT: Bounds = Bounds {
        min_x: -2.0,
        max_x: 2.0,
        min_y: -2.0,
        max_y: 2.0,
    };

    pub fn new(min_x: f64, max_x: f64, min_y: f64, max_y: f64) -> crate::Result<Self> {
        let finite = [min_x, max_x, min_y, max_y].iter().all(|v| v.is_finite());
        if !finite {
            return Err(CoreError::InvalidBounds {
                reason: format!("non-finite bound in X({min_x}, {max_x}) Y({min_y}, {max_y})"),
            });
        }
        if min_x >= max_x {
            return Err(CoreError::InvalidBounds {
                reason: format!("min_x {min_x} must be < max_x {max_x}"),
            });
        }
        if min_y >= max_y {
            return Err(CoreError::InvalidBounds {
                reason: format!("min_y {min_y} must be < max_y {max_y}"),
            });
        }
        // The spans themselves can overflow even when every bound is finite.
        if !(max_x - min_x).is_finite() || !(max_y - min_y).is_finite() {
            return Err(CoreError::InvalidBounds {
                reason: "span overflows f64".into(),
            });
        }
        Ok(Self {
            min_x,
            max_x,
            min_y,
            max_y,
        })
    }

    /// Rectangle centred on `(cx, cy)` with the given half-spans.
    pub fn centered(cx: f64, cy: f64, half_x: f64, half_y: f64) -> crate::Result<Self> {
        Self::new(cx - half_x, cx + half_x, cy - half_y, cy + half_y)
    }

    pub fn min_x(&self) -> f64 {
        self.min_x
    }

    pub fn max_x(&self) -> f64 {
        self.max_x
    }

    pub fn min_y(&self) -> f64 {
        self.min_y
    }

    pub fn max_y(&self) -> f64 {
        self.max_y
    }

    pub fn span_x(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn span_y(&self) -> f64 {
        self.max_y - self.min_y
    }

    pub fn center(&self) -> (f64, f64) {
        (
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
        )
    }

    /// The same rectangle shifted by `(dx, dy)`.
    pub fn translated(&self, dx: f64, dy: f64) -> crate::Result<Self> {
        Self::new(
            self.min_x + dx,
            self.max_x + dx,
            self.min_y + dy,
            self.max_y + dy,
        )
    }

    /// The rectangle with both spans multiplied by `factor`, keeping its centre.
    pub fn scaled_about_center(&self, factor: f64) -> crate::Result<Self> {
        let (cx, cy) = self.center();
        Self::centered(
            cx,
            cy,
            self.span_x() * factor / 2.0,
            self.span_y() * factor / 2.0,
        )
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Self::DEFAULT
    }
}

// ---------------------------------------------------------------------------
// Session defaults
// ---------------------------------------------------------------------------

/// The values a session starts with and returns to on reset, plus the zoom step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportDefaults {
    pub bounds: Bounds,
    pub iterations: u32,
    pub zoom_ratio: f64,
}

impl ViewportDefaults {
    pub fn new(bounds: Bounds, iterations: u32, zoom_ratio: f64) -> crate::Result<Self> {
        if iterations < 1 {
            return Err(CoreError::InvalidIterations(iterations));
        }
        if !(zoom_ratio > 0.0 && zoom_ratio < 1.0) {
            return Err(CoreError::InvalidZoomRatio(zoom_ratio));
        }
        Ok(Self {
            bounds,
            iterations,
            zoom_ratio,
        })
    }
}

impl Default for ViewportDefaults {
    fn default() -> Self {
        Self {
            bounds: Bounds::DEFAULT,
            iterations: DEFAULT_ITERATIONS,
            zoom_ratio: DEFAULT_ZOOM_RATIO,
        }
    }
}

// ---------------------------------------------------------------------------
// Viewport state
// ---------------------------------------------------------------------------

/// The visible rectangle of the complex plane and the per-pixel iteration budget.
///
/// Owned by the frame loop and mutated in place by pan, zoom, recenter and
/// reset. Every operation either applies completely or leaves the state
/// untouched, so the bounds stay strictly ordered and `iterations >= 1`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportState {
    bounds: Bounds,
    iterations: u32,
    defaults: ViewportDefaults,
}

impl ViewportState {
    pub fn new(defaults: ViewportDefaults) -> Self {
        Self {
            bounds: defaults.bounds,
            iterations: defaults.iterations,
            defaults,
        }
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn iterations(&self) -> u32 {
        self.iterations
    }

    pub fn defaults(&self) -> &ViewportDefaults {
        &self.defaults
    }

    /// How far the view is magnified relative to the session's initial rectangle.
    pub fn zoom_factor(&self) -> f64 {
        self.defaults.bounds.span_x() / self.bounds.span_x()
    }

    /// Shift the rectangle by plane-space deltas without resizing it.
    pub fn pan(&mut self, dx: f64, dy: f64) -> crate::Result<()> {
        if !dx.is_finite() || !dy.is_finite() {
            return Err(CoreError::NonFinite {
                operation: "pan",
                x: dx,
                y: dy,
            });
        }
        self.bounds = self
            .bounds
            .translated(dx, dy)
            .map_err(|_| CoreError::PrecisionExhausted)?;
        Ok(())
    }

    /// Move the rectangle so its centre lands on `(cx, cy)`, keeping both spans.
    pub fn recenter(&mut self, cx: f64, cy: f64) -> crate::Result<()> {
        if !cx.is_finite() || !cy.is_finite() {
            return Err(CoreError::NonFinite {
                operation: "recenter",
                x: cx,
                y: cy,
            });
        }
        self.bounds = Bounds::centered(
            cx,
            cy,
            self.bounds.span_x() / 2.0,
            self.bounds.span_y() / 2.0,
        )
        .map_err(|_| CoreError::PrecisionExhausted)?;
        Ok(())
    }

    /// Shrink both spans by the zoom ratio around the current centre and grow
    /// the iteration budget.
    pub fn zoom_in(&mut self) -> crate::Result<()> {
        self.zoom_by(self.defaults.zoom_ratio, ITERATION_GROWTH)
    }

    /// Grow both spans by the inverse zoom ratio around the current centre and
    /// shrink the iteration budget.
    pub fn zoom_out(&mut self) -> crate::Result<()> {
        self.zoom_by(1.0 / self.defaults.zoom_ratio, 1.0 / ITERATION_GROWTH)
    }

    /// Restore the session's initial rectangle and iteration budget.
    pub fn reset(&mut self) {
        self.bounds = self.defaults.bounds;
        self.iterations = self.defaults.iterations;
    }

    fn zoom_by(&mut self, span_factor: f64, iteration_factor: f64) -> crate::Result<()> {
        let bounds = self
            .bounds
            .scaled_about_center(span_factor)
            .map_err(|_| CoreError::PrecisionExhausted)?;
        // Near the precision floor both edges can round back onto the same
        // floats, leaving the span unchanged instead of reaching zero.
        let moved = |new: f64, old: f64| {
            if span_factor < 1.0 {
                new > 0.0 && new < old
            } else {
                new > old
            }
        };
        if !moved(bounds.span_x(), self.bounds.span_x())
            || !moved(bounds.span_y(), self.bounds.span_y())
        {
            return Err(CoreError::PrecisionExhausted);
        }
        self.bounds = bounds;
        self.iterations = scale_iterations(self.iterations, iteration_factor);
        debug!(
            span_x = self.bounds.span_x(),
            iterations = self.iterations,
            "Zoomed viewport"
        );
        Ok(())
    }
}

impl Default for ViewportState {
    fn default() -> Self {
        Self::new(ViewportDefaults::default())
    }
}

/// Scale an iteration budget, truncating toward zero and never dropping below 1.
pub fn scale_iterations(current: u32, factor: f64) -> u32 {
    // `as` saturates at u32::MAX for oversized values.
    ((current as f64 * factor).floor() as u32).max(1)
}
