//! File filtering configuration and rules.
//!
//! Decides which entries of a directory walk are Python sources worth
//! parsing (e.g. skips virtualenvs, caches, generated stubs).

use std::collections::HashSet;
use std::path::Path;

use crate::DEFAULT_MAX_FILE_SIZE;

/// Extension of the files collected from directories.
pub const PYTHON_EXTENSION: &str = "py";

/// Configuration for file filtering.
#[derive(Debug, Clone)]
pub struct FilterConfig {
    /// Directory names that are never walked into.
    pub excluded_directories: HashSet<String>,
    /// Maximum file size in bytes (default: 1MB).
    pub max_file_size: usize,
    /// Whether to include hidden files and directories (starting with .).
    pub include_hidden: bool,
    /// Patterns for generated files to exclude.
    pub generated_patterns: Vec<String>,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            excluded_directories: default_excluded_directories(),
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            include_hidden: false,
            generated_patterns: default_generated_patterns(),
        }
    }
}

fn default_excluded_directories() -> HashSet<String> {
    [
        // Version control
        ".git",
        ".svn",
        ".hg",
        // Virtual environments
        ".venv",
        "venv",
        "env",
        "site-packages",
        // Caches
        "__pycache__",
        ".pytest_cache",
        ".mypy_cache",
        ".ruff_cache",
        ".tox",
        ".nox",
        // Build outputs
        "build",
        "dist",
        "eggs",
        ".eggs",
        "node_modules",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_generated_patterns() -> Vec<String> {
    [
        r"_pb2(_grpc)?\.py$",
        r".*\.generated\.py$",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

/// File filter applied while walking source directories.
pub struct FileFilter {
    config: FilterConfig,
    generated_regexes: Vec<regex::Regex>,
}

impl Default for FileFilter {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl FileFilter {
    /// Create a new file filter with the given configuration.
    pub fn new(config: FilterConfig) -> Self {
        let generated_regexes = config
            .generated_patterns
            .iter()
            .filter_map(|p| regex::Regex::new(p).ok())
            .collect();

        Self {
            config,
            generated_regexes,
        }
    }

    /// Create a filter with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(FilterConfig::default())
    }

    /// Check whether a directory with this name should be walked into.
    pub fn should_enter(&self, dir_name: &str) -> bool {
        if self.config.excluded_directories.contains(dir_name) {
            return false;
        }
        self.config.include_hidden || !dir_name.starts_with('.')
    }

    /// Check if a file found during a walk should be processed.
    ///
    /// Returns `Ok(())` if the file should be processed, or `Err(reason)` if it should be skipped.
    pub fn should_process(&self, path: &Path, size: usize) -> Result<(), String> {
        if !has_python_extension(path) {
            return Err("Not a Python file".to_string());
        }

        if size > self.config.max_file_size {
            return Err(format!(
                "File too large: {} bytes (max: {})",
                size, self.config.max_file_size
            ));
        }

        if let Some(filename) = path.file_name().and_then(|n| n.to_str()) {
            if !self.config.include_hidden && filename.starts_with('.') {
                return Err("Hidden file".to_string());
            }

            for regex in &self.generated_regexes {
                if regex.is_match(filename) {
                    return Err(format!("Generated file pattern: {}", regex.as_str()));
                }
            }
        }

        Ok(())
    }

    /// Check if content appears to be binary.
    pub fn is_binary_content(&self, content: &[u8], sample_size: usize) -> bool {
        let sample = &content[..content.len().min(sample_size)];

        // Null bytes never appear in source text
        if sample.contains(&0) {
            return true;
        }

        let non_printable = sample
            .iter()
            .filter(|&&b| b < 32 && !matches!(b, 9 | 10 | 12 | 13)) // tab, newline, form feed, carriage return
            .count();

        !sample.is_empty() && (non_printable as f64 / sample.len() as f64) > 0.1
    }

    /// Get the configuration.
    pub fn config(&self) -> &FilterConfig {
        &self.config
    }
}

/// Whether the path ends in `.py`.
pub fn has_python_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e == PYTHON_EXTENSION)
        .unwrap_or(false)
}
