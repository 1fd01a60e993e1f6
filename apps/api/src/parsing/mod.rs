//! Parsing collaborators: file bytes to masked text to `ResumeFeatures`.
//!
//! The scorer never relies on anything here being complete; every extracted field may
//! legitimately come back empty.

pub mod extract;
pub mod features;
pub mod handlers;
pub mod pii;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("unsupported file type: {0} (allowed: .pdf, .txt)")]
    UnsupportedType(String),

    #[error("{name} is {size} bytes; the limit is {limit}")]
    TooLarge { name: String, size: usize, limit: usize },

    #[error("{count} files uploaded; the limit is {limit}")]
    TooManyFiles { count: usize, limit: usize },

    #[error("could not extract text from PDF: {0}")]
    Pdf(String),

    #[error("no text could be extracted from {0}")]
    Empty(String),

    #[error("invalid multipart body: {0}")]
    Multipart(String),

    #[error("extraction task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}
