//! Error types for the call-graph pipeline.

use std::path::PathBuf;
use thiserror::Error;

/// Result type used across the library.
pub type Result<T> = std::result::Result<T, AstvizError>;

/// Errors that can occur while building or rendering a call graph.
#[derive(Debug, Error)]
pub enum AstvizError {
    /// None of the given sources resolved to a Python file.
    #[error("No Python files found in the given sources.")]
    NoSourceFiles,

    /// A file could not be turned into parseable text.
    #[error("Cannot process {path}: {reason}")]
    Unprocessable { path: PathBuf, reason: String },

    /// The module does not parse as Python.
    #[error("{path} has a syntax error: {message}")]
    Syntax { path: PathBuf, message: String },

    /// The tree-sitter grammar could not be loaded or produced no tree.
    #[error("Parser error: {0}")]
    Parser(String),

    /// Unknown output format requested.
    #[error("Unsupported output format: {0} (expected png, svg, pdf, dot or json)")]
    UnsupportedFormat(String),

    /// The Graphviz binary could not be started.
    #[error("Unable to run {binary}! Is Graphviz installed and is it in PATH?")]
    GraphvizNotFound { binary: String },

    /// Graphviz ran but exited with a failure status.
    #[error("Graphviz exited with {status}: {stderr}")]
    GraphvizFailed { status: String, stderr: String },

    /// IO error during file operations.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
