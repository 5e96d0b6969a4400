pub mod diagnostics;
pub mod error;
pub mod event;
pub mod input;
pub mod range;
pub mod viewport;

// Re-export primary types for convenience.
pub use diagnostics::{FrameCounter, ZoomReport};
pub use error::CoreError;
pub use event::{InputEvent, Key};
pub use input::{InputTranslator, PointerSample, ScreenGeometry, ZoomDirection};
pub use range::{rescale, try_rescale};
pub use viewport::{Bounds, ViewportDefaults, ViewportState};

/// Convenience result type for the core crate.
pub type Result<T> = std::result::Result<T, CoreError>;
