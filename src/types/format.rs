//! Output formats supported by the renderer.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AstvizError;

/// Format of the rendered call graph.
///
/// `Dot` and `Json` are written directly; the image formats are produced by
/// piping DOT through Graphviz.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Png,
    Svg,
    Pdf,
    Dot,
    Json,
}

impl OutputFormat {
    /// File extension for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Png => "png",
            OutputFormat::Svg => "svg",
            OutputFormat::Pdf => "pdf",
            OutputFormat::Dot => "dot",
            OutputFormat::Json => "json",
        }
    }

    /// Whether producing this format requires the Graphviz binary.
    pub fn needs_graphviz(&self) -> bool {
        matches!(self, OutputFormat::Png | OutputFormat::Svg | OutputFormat::Pdf)
    }
}

impl FromStr for OutputFormat {
    type Err = AstvizError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "png" => Ok(OutputFormat::Png),
            "svg" => Ok(OutputFormat::Svg),
            "pdf" => Ok(OutputFormat::Pdf),
            "dot" | "gv" => Ok(OutputFormat::Dot),
            "json" => Ok(OutputFormat::Json),
            other => Err(AstvizError::UnsupportedFormat(other.to_string())),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.extension())
    }
}
