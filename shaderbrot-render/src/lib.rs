pub mod backend;
pub mod bridge;
pub mod buffer;
pub mod error;
pub mod export;
pub mod shader;
pub mod software;

pub use backend::{ShaderBackend, ViewportUniforms};
pub use bridge::RenderBridge;
pub use buffer::RenderBuffer;
pub use error::RenderError;
pub use export::{export_png, SnapshotMetadata};
pub use software::SoftwareBackend;

/// Convenience result type for the render crate.
pub type Result<T> = std::result::Result<T, RenderError>;
