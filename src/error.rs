//! Error handling for filescope

use thiserror::Error;

#[derive(Error, Debug)]
pub enum FilescopeError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Backend error: {0}")]
    Backend(#[from] crate::llm::client::BackendError),

    #[error("Output formatting error: {0}")]
    OutputFormatting(String),
}

pub type Result<T> = std::result::Result<T, FilescopeError>;

/// Failure inside a single analyzer. The dispatcher turns these into report
/// text; they never reach the caller of `analyze`.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalysisError {
    #[error("image decode failed: {0}")]
    ImageDecode(String),

    #[error("PDF parse failed: {0}")]
    PdfParse(String),
}

impl From<image::ImageError> for AnalysisError {
    fn from(err: image::ImageError) -> Self {
        AnalysisError::ImageDecode(err.to_string())
    }
}

impl From<lopdf::Error> for AnalysisError {
    fn from(err: lopdf::Error) -> Self {
        AnalysisError::PdfParse(err.to_string())
    }
}
