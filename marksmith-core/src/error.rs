//! Error types for rendering operations

use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by the renderer entrypoints.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Reading the input file failed.
    #[error("failed to read '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// `render_document` was given a tree that never went through the annotator.
    #[error("document has not been annotated")]
    NotAnnotated,
    /// The tree violates a structural contract of the renderer.
    #[error("invalid document tree: {0}")]
    InvalidTree(String),
}

/// Failure reported by a syntax highlighter.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("highlighting '{language}' failed: {message}")]
pub struct HighlightError {
    pub language: String,
    pub message: String,
}

/// Failure reported by a math formatter.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("math formatting failed: {0}")]
pub struct MathError(pub String);
