//! Source discovery.
//!
//! Resolves the comma-separated `--source` list into the Python files to
//! analyse. Explicit files are taken as given; directories are walked.

use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::WalkDir;

use crate::processing::filter::FileFilter;

/// Split a comma-separated source list, dropping empty items.
pub fn split_sources(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Collect Python files from a list of files and directories.
///
/// Missing sources are skipped. Files named explicitly are always included;
/// files found under a directory must pass the filter.
pub fn collect_python_files<S: AsRef<Path>>(sources: &[S], filter: &FileFilter) -> Vec<PathBuf> {
    let mut files = Vec::new();

    for source in sources {
        let source = source.as_ref();

        if !source.exists() {
            debug!(source = %source.display(), "Source does not exist, skipping");
            continue;
        }

        if source.is_file() {
            files.push(source.to_path_buf());
        } else if source.is_dir() {
            files.extend(walk_directory(source, filter));
        }
    }

    files
}

/// Walk a directory and return the Python files accepted by the filter.
fn walk_directory(root: &Path, filter: &FileFilter) -> Vec<PathBuf> {
    let mut files = Vec::new();

    for entry in WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !e.file_type().is_dir() || should_enter(e, filter))
        .filter_map(|e| e.ok())
    {
        // Links to files count, links to directories are not followed
        let metadata = match std::fs::metadata(entry.path()) {
            Ok(metadata) if metadata.is_file() => metadata,
            _ => continue,
        };

        let size = metadata.len() as usize;
        match filter.should_process(entry.path(), size) {
            Ok(()) => files.push(entry.into_path()),
            Err(reason) => {
                if crate::processing::filter::has_python_extension(entry.path()) {
                    debug!(path = %entry.path().display(), %reason, "Skipping file");
                }
            }
        }
    }

    files
}

fn should_enter(entry: &walkdir::DirEntry, filter: &FileFilter) -> bool {
    entry
        .file_name()
        .to_str()
        .map(|name| filter.should_enter(name))
        .unwrap_or(false)
}
