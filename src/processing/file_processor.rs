//! File processor for the parsing pipeline.
//!
//! Combines binary detection and encoding validation to turn raw bytes into
//! source text ready for the AST parser.

use std::path::{Path, PathBuf};
use std::str;

use tracing::debug;

use crate::error::{AstvizError, Result};
use crate::processing::filter::{FileFilter, FilterConfig};

/// Bytes inspected when sniffing for binary content.
const BINARY_SAMPLE_SIZE: usize = 8192;

/// A file that has been processed and is ready for parsing.
#[derive(Debug, Clone)]
pub struct SourceFile {
    /// Original file path.
    pub path: PathBuf,
    /// Decoded content with normalized line endings.
    pub content: String,
    /// File size in bytes.
    pub size_bytes: usize,
    /// Encoding the content was decoded from.
    pub encoding: &'static str,
}

/// File processor for preparation and validation.
pub struct FileProcessor {
    filter: FileFilter,
}

impl Default for FileProcessor {
    fn default() -> Self {
        Self::new(FilterConfig::default())
    }
}

impl FileProcessor {
    /// Create a new file processor with the given configuration.
    pub fn new(config: FilterConfig) -> Self {
        Self {
            filter: FileFilter::new(config),
        }
    }

    /// Read a file from disk and prepare it for parsing.
    pub fn read(&self, path: &Path) -> Result<SourceFile> {
        let bytes = std::fs::read(path)?;
        self.process(path, &bytes)
    }

    /// Process a file's content and prepare it for parsing.
    pub fn process(&self, path: &Path, content: &[u8]) -> Result<SourceFile> {
        // UTF-16 text is full of null bytes, so only sniff when there is no BOM
        let has_utf16_bom = content.starts_with(&[0xFF, 0xFE]) || content.starts_with(&[0xFE, 0xFF]);
        if !has_utf16_bom && self.filter.is_binary_content(content, BINARY_SAMPLE_SIZE) {
            return Err(AstvizError::Unprocessable {
                path: path.to_path_buf(),
                reason: "Binary file detected".to_string(),
            });
        }

        let (text, encoding) = self.validate_encoding(content);
        debug!(path = %path.display(), encoding, "Decoded source file");

        Ok(SourceFile {
            path: path.to_path_buf(),
            content: self.normalize_line_endings(&text),
            size_bytes: content.len(),
            encoding,
        })
    }

    /// Decode content, trying UTF-8 first.
    ///
    /// Returns the decoded string and the encoding used.
    pub fn validate_encoding(&self, content: &[u8]) -> (String, &'static str) {
        if let Ok(s) = str::from_utf8(content) {
            let s = s.strip_prefix('\u{feff}').unwrap_or(s);
            return (s.to_string(), "utf-8");
        }

        // UTF-16 LE BOM
        if content.len() >= 2 && content[0] == 0xFF && content[1] == 0xFE {
            let utf16: Vec<u16> = content[2..]
                .chunks_exact(2)
                .map(|c| u16::from_le_bytes([c[0], c[1]]))
                .collect();
            if let Ok(s) = String::from_utf16(&utf16) {
                return (s, "utf-16-le");
            }
        }

        // UTF-16 BE BOM
        if content.len() >= 2 && content[0] == 0xFE && content[1] == 0xFF {
            let utf16: Vec<u16> = content[2..]
                .chunks_exact(2)
                .map(|c| u16::from_be_bytes([c[0], c[1]]))
                .collect();
            if let Ok(s) = String::from_utf16(&utf16) {
                return (s, "utf-16-be");
            }
        }

        // Latin-1 always succeeds
        let s: String = content.iter().map(|&b| b as char).collect();
        (s, "latin-1")
    }

    /// Normalize line endings to Unix-style (LF).
    pub fn normalize_line_endings(&self, content: &str) -> String {
        content.replace("\r\n", "\n").replace('\r', "\n")
    }

    /// Get the underlying filter.
    pub fn filter(&self) -> &FileFilter {
        &self.filter
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_process_python_file() {
        let processor = FileProcessor::default();
        let content = b"def hello():\n    print('Hello, world!')\n";

        let result = processor.process(Path::new("main.py"), content).unwrap();

        assert_eq!(result.encoding, "utf-8");
        assert_eq!(result.size_bytes, content.len());
        assert!(result.content.starts_with("def hello"));
    }

    #[test]
    fn test_reject_binary() {
        let processor = FileProcessor::default();
        let content = b"\x00\x01\x02\x03\x04\x05";

        let result = processor.process(Path::new("binary.py"), content);
        assert!(matches!(result, Err(AstvizError::Unprocessable { .. })));
    }

    #[test]
    fn test_utf8_bom_stripped() {
        let processor = FileProcessor::default();
        let content = b"\xEF\xBB\xBFdef main(): pass\n";

        let result = processor.process(Path::new("bom.py"), content).unwrap();
        assert_eq!(result.content, "def main(): pass\n");
    }

    #[test]
    fn test_utf16_le_decoding() {
        let processor = FileProcessor::default();
        let mut content = vec![0xFF, 0xFE];
        for unit in "x = 1".encode_utf16() {
            content.extend_from_slice(&unit.to_le_bytes());
        }

        let (text, encoding) = processor.validate_encoding(&content);
        assert_eq!(text, "x = 1");
        assert_eq!(encoding, "utf-16-le");
    }

    #[test]
    fn test_latin1_fallback() {
        let processor = FileProcessor::default();
        let (text, encoding) = processor.validate_encoding(b"name = 'caf\xe9'");

        assert_eq!(encoding, "latin-1");
        assert_eq!(text, "name = 'café'");
    }

    #[test]
    fn test_line_ending_normalization() {
        let processor = FileProcessor::default();

        let normalized = processor.normalize_line_endings("line1\r\nline2\r\nline3");
        assert_eq!(normalized, "line1\nline2\nline3");

        let normalized = processor.normalize_line_endings("line1\rline2\rline3");
        assert_eq!(normalized, "line1\nline2\nline3");
    }
}
