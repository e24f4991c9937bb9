//! Renderer errors

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Renderer not found: {0}")]
    RendererUnavailable(String),

    #[error("Renderer exited with status {code:?}: {stderr}")]
    RenderFailed { code: Option<i32>, stderr: String },

    #[error("Rendering timeout after {0}ms")]
    RenderTimeout(u64),

    #[error("Renderer produced no output at {0}")]
    RenderOutputMissing(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
