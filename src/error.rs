//! Error handling for the resume matcher

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ResumeMatcherError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("PDF extraction error: {0}")]
    PdfExtraction(String),

    #[error("DOCX extraction error: {0}")]
    DocxExtraction(String),

    #[error("Embedding generation error: {0}")]
    Embedding(String),

    #[error("Embedding timed out after {0}ms")]
    EmbeddingTimeout(u64),

    #[error("Model loading error: {0}")]
    ModelLoading(String),

    #[error("Model error: {0}")]
    ModelError(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Insufficient input: {0}")]
    InsufficientInput(String),

    #[error("File format not supported: {0}")]
    UnsupportedFormat(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Model not found: {0}")]
    ModelNotFound(String),

    #[error("Output formatting error: {0}")]
    OutputFormatting(String),
}

impl ResumeMatcherError {
    /// Errors that make the process unable to serve any match.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            ResumeMatcherError::Configuration(_) | ResumeMatcherError::ModelLoading(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, ResumeMatcherError>;

/// `model2vec-rs` reports load failures through anyhow
impl From<anyhow::Error> for ResumeMatcherError {
    fn from(err: anyhow::Error) -> Self {
        ResumeMatcherError::ModelLoading(format!("{:#}", err))
    }
}
