//! Error types for extraction, fill and generation

use docx_core::DocxError;
use thiserror::Error;

use crate::render::RenderError;

#[derive(Error, Debug)]
pub enum EngineError {
    /// The template could not be opened for extraction
    #[error("Failed to parse template: {0}")]
    ParseFailure(String),

    /// The template could not be opened for filling
    #[error("Template is corrupt: {0}")]
    TemplateCorrupt(String),

    #[error("Rendering failed: {0}")]
    Render(#[from] RenderError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A store or sink outside the engine failed or had no record
    #[error("Collaborator error: {0}")]
    Collaborator(String),
}

impl EngineError {
    pub(crate) fn parse(err: DocxError) -> Self {
        match err {
            DocxError::IoError(e) => EngineError::Io(e),
            other => EngineError::ParseFailure(other.to_string()),
        }
    }

    pub(crate) fn corrupt(err: DocxError) -> Self {
        match err {
            DocxError::IoError(e) => EngineError::Io(e),
            other => EngineError::TemplateCorrupt(other.to_string()),
        }
    }
}
