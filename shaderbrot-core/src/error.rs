use thiserror::Error;

/// Errors originating from the viewport and input-mapping core.
#[derive(Debug, Error, PartialEq)]
pub enum CoreError {
    #[error("degenerate source range: [{min}, {max}] has zero span")]
    DegenerateRange { min: f64, max: f64 },

    #[error("invalid bounds: {reason}")]
    InvalidBounds { reason: String },

    #[error("invalid iteration budget: {0} (must be >= 1)")]
    InvalidIterations(u32),

    #[error("invalid screen geometry: {width}×{height} (both must be > 0)")]
    InvalidGeometry { width: u32, height: u32 },

    #[error("non-finite input to {operation}: ({x}, {y})")]
    NonFinite {
        operation: &'static str,
        x: f64,
        y: f64,
    },

    #[error("zoom ratio {0} out of range (must be strictly between 0 and 1)")]
    InvalidZoomRatio(f64),

    #[error("floating-point precision exhausted: span would no longer be positive and finite")]
    PrecisionExhausted,
}
