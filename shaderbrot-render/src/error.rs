use thiserror::Error;

/// Errors originating from the rendering side of the viewer.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("{stage} shader failed to compile: {log}")]
    ShaderCompile { stage: &'static str, log: String },

    #[error("shader program failed to link: {0}")]
    ProgramLink(String),

    #[error("failed to create GPU resource: {0}")]
    Resource(String),

    #[error("renderer unavailable: {0}")]
    Unavailable(String),

    #[error("draw requested before viewport uniforms were pushed")]
    UniformsNotSet,

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Png(#[from] png::EncodingError),

    #[error(transparent)]
    Core(#[from] shaderbrot_core::CoreError),
}
