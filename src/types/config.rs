//! Configuration types for a call-graph run.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::types::OutputFormat;
use crate::{
    DEFAULT_DESTINATION, DEFAULT_DOT_BINARY, DEFAULT_ENTRYPOINT, DEFAULT_MAX_FILE_SIZE,
    DEFAULT_OUTPUT_NAME,
};

/// Settings shared by the builder and the renderer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AstvizConfig {
    /// Directory the rendered graph is written to
    pub destination: PathBuf,

    /// Function the call graph is grown from
    pub entrypoint: String,

    /// Output format
    pub format: OutputFormat,

    /// File stem of the output (extension comes from the format)
    pub output_name: String,

    /// Graphviz binary used for image formats
    pub dot_binary: String,

    /// Largest file picked up from a directory walk, in bytes
    pub max_file_size: usize,

    /// Drop calls to Python builtins such as `print` or `len`
    pub exclude_builtins: bool,

    /// Walk into hidden files and directories
    pub include_hidden: bool,

    /// Keep the intermediate `.dot` file next to rendered images
    pub keep_dot: bool,
}

impl Default for AstvizConfig {
    fn default() -> Self {
        Self {
            destination: PathBuf::from(DEFAULT_DESTINATION),
            entrypoint: DEFAULT_ENTRYPOINT.to_string(),
            format: OutputFormat::default(),
            output_name: DEFAULT_OUTPUT_NAME.to_string(),
            dot_binary: DEFAULT_DOT_BINARY.to_string(),
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            exclude_builtins: false,
            include_hidden: false,
            keep_dot: false,
        }
    }
}

impl AstvizConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable lookup.
    ///
    /// Unset or unparsable values fall back to the defaults.
    pub fn from_vars<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        Self {
            destination: lookup("ASTVIZ_DESTINATION")
                .map(PathBuf::from)
                .unwrap_or(defaults.destination),
            entrypoint: lookup("ASTVIZ_ENTRYPOINT").unwrap_or(defaults.entrypoint),
            format: lookup("ASTVIZ_FORMAT")
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.format),
            output_name: lookup("ASTVIZ_OUTPUT_NAME").unwrap_or(defaults.output_name),
            dot_binary: lookup("ASTVIZ_DOT_BINARY").unwrap_or(defaults.dot_binary),
            max_file_size: lookup("ASTVIZ_MAX_FILE_SIZE")
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.max_file_size),
            exclude_builtins: lookup("ASTVIZ_EXCLUDE_BUILTINS")
                .map(|s| parse_flag(&s))
                .unwrap_or(defaults.exclude_builtins),
            include_hidden: lookup("ASTVIZ_INCLUDE_HIDDEN")
                .map(|s| parse_flag(&s))
                .unwrap_or(defaults.include_hidden),
            keep_dot: lookup("ASTVIZ_KEEP_DOT")
                .map(|s| parse_flag(&s))
                .unwrap_or(defaults.keep_dot),
        }
    }

    /// Path of the final output file.
    pub fn output_path(&self) -> PathBuf {
        self.destination
            .join(format!("{}.{}", self.output_name, self.format.extension()))
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
