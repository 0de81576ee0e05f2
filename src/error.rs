//! Error types for the decoding pipeline.
//!
//! Tabular decoding never fails (malformed rows degrade to defaults), so
//! every variant here is either a binary container violation or a caller
//! handing the unifier a batch whose records don't match its declared source.

use thiserror::Error;

use crate::schema::SourceTag;

/// Which IDX container a binary error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Container {
    Images,
    Labels,
}

impl std::fmt::Display for Container {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Container::Images => f.write_str("images"),
            Container::Labels => f.write_str("labels"),
        }
    }
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("invalid {container} container: magic number {found:#010x}, expected {expected:#010x}")]
    Format {
        container: Container,
        expected: u32,
        found: u32,
    },

    #[error("truncated {container} container: need {expected} bytes, got {actual}")]
    Truncated {
        container: Container,
        expected: usize,
        actual: usize,
    },

    #[error("dataset has {images} images but {labels} labels")]
    CountMismatch { images: usize, labels: usize },

    #[error("batch declared as '{declared}' holds a '{found}' record at position {position}")]
    SchemaMismatch {
        declared: SourceTag,
        found: SourceTag,
        position: usize,
    },
}

impl PipelineError {
    /// True for errors caused by a container that is not what it claims to be.
    pub fn is_format_violation(&self) -> bool {
        matches!(
            self,
            PipelineError::Format { .. } | PipelineError::Truncated { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, PipelineError>;
