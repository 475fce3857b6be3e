//! Processing module for locating and preparing source files.
//!
//! This module provides:
//! - Source discovery (explicit files and recursive directory walks)
//! - File filtering (virtualenvs, caches, generated files, hidden entries)
//! - Encoding validation and normalization

pub mod discovery;
pub mod file_processor;
pub mod filter;

pub use discovery::{collect_python_files, split_sources};
pub use file_processor::{FileProcessor, SourceFile};
pub use filter::{FileFilter, FilterConfig};
