//! Error handling for the resume ranker

use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ResumeRankerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Text extraction error: {0}")]
    Extraction(String),

    #[error("Empty corpus: no non-empty documents to fit vocabulary against")]
    EmptyCorpus,

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Embedding error: {0}")]
    Embedding(String),

    #[error("Degenerate vector: {0}")]
    DegenerateVector(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("File format not supported: {0}")]
    UnsupportedFormat(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Model error: {0}")]
    ModelError(String),

    #[error("Model not found: {0}")]
    ModelNotFound(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ResumeRankerError>;

/// Convert anyhow errors (surfaced by the model loader) to our custom error type
impl From<anyhow::Error> for ResumeRankerError {
    fn from(err: anyhow::Error) -> Self {
        ResumeRankerError::ModelError(err.to_string())
    }
}

/// Why a document was left out of a ranked result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ExclusionKind {
    Extraction,
    Embedding,
    DegenerateVector,
}

/// A per-document exclusion, reported alongside results rather than
/// collapsed into a default score. A silent zero would be
/// indistinguishable from a genuine low-similarity match.
#[derive(Debug, Clone, Serialize)]
pub struct Exclusion {
    pub filename: String,
    pub kind: ExclusionKind,
    pub detail: String,
}

impl Exclusion {
    pub fn new(filename: impl Into<String>, kind: ExclusionKind, detail: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            kind,
            detail: detail.into(),
        }
    }

    pub fn from_error(filename: impl Into<String>, err: &ResumeRankerError) -> Self {
        let kind = match err {
            ResumeRankerError::DegenerateVector(_) => ExclusionKind::DegenerateVector,
            ResumeRankerError::Extraction(_) | ResumeRankerError::Io(_) => ExclusionKind::Extraction,
            _ => ExclusionKind::Embedding,
        };
        Self::new(filename, kind, err.to_string())
    }
}
