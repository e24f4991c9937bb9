use thiserror::Error;

#[derive(Error, Debug)]
pub enum DocxError {
    #[error("Failed to read package: {0}")]
    ZipError(String),

    #[error("Package part missing: {0}")]
    MissingPart(String),

    #[error("Malformed XML: {0}")]
    XmlError(String),

    #[error("Document has no body")]
    MissingBody,

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}
