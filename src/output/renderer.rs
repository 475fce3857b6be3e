//! Writes call graphs to disk, shelling out to Graphviz for image formats.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use tracing::{debug, info, warn};

use crate::call_graph::CallGraph;
use crate::error::{AstvizError, Result};
use crate::output::dot::DotGraph;
use crate::types::{AstvizConfig, OutputFormat};
use crate::{DEFAULT_DOT_BINARY, DEFAULT_OUTPUT_NAME};

/// Renders a call graph in the configured format.
#[derive(Debug, Clone)]
pub struct GraphRenderer {
    dot_binary: String,
    output_name: String,
    keep_dot: bool,
}

impl Default for GraphRenderer {
    fn default() -> Self {
        Self {
            dot_binary: DEFAULT_DOT_BINARY.to_string(),
            output_name: DEFAULT_OUTPUT_NAME.to_string(),
            keep_dot: false,
        }
    }
}

impl GraphRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a renderer from the run configuration.
    pub fn from_config(config: &AstvizConfig) -> Self {
        Self {
            dot_binary: config.dot_binary.clone(),
            output_name: config.output_name.clone(),
            keep_dot: config.keep_dot,
        }
    }

    /// Set the Graphviz binary.
    pub fn with_dot_binary(mut self, binary: &str) -> Self {
        self.dot_binary = binary.to_string();
        self
    }

    /// Set the output file stem.
    pub fn with_output_name(mut self, name: &str) -> Self {
        self.output_name = name.to_string();
        self
    }

    /// Keep the `.dot` source next to rendered images.
    pub fn with_keep_dot(mut self, keep: bool) -> Self {
        self.keep_dot = keep;
        self
    }

    /// Render `graph` into `destination`.
    ///
    /// Returns the path written, or `None` when the graph is empty.
    pub fn render(
        &self,
        graph: &CallGraph,
        destination: &Path,
        format: OutputFormat,
    ) -> Result<Option<PathBuf>> {
        let output = destination.join(format!("{}.{}", self.output_name, format.extension()));
        info!("Rendering graph to {}", output.display());

        if graph.is_empty() {
            warn!("No function calls found to render.");
            return Ok(None);
        }

        fs::create_dir_all(destination)?;
        let dot = DotGraph::from_call_graph(graph).to_string();

        match format {
            OutputFormat::Dot => fs::write(&output, dot)?,
            OutputFormat::Json => fs::write(&output, serde_json::to_string_pretty(graph)?)?,
            OutputFormat::Png | OutputFormat::Svg | OutputFormat::Pdf => {
                if self.keep_dot {
                    let source = destination.join(format!("{}.dot", self.output_name));
                    fs::write(&source, &dot)?;
                    debug!("Kept DOT source at {}", source.display());
                }
                self.run_graphviz(&dot, &output, format)?;
            }
        }

        info!("Graph saved as {}", output.display());
        Ok(Some(output))
    }

    /// Pipe DOT text through Graphviz.
    fn run_graphviz(&self, dot: &str, output: &Path, format: OutputFormat) -> Result<()> {
        let mut child = Command::new(&self.dot_binary)
            .arg(format!("-T{}", format.extension()))
            .arg("-o")
            .arg(output)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| match e.kind() {
                io::ErrorKind::NotFound => AstvizError::GraphvizNotFound {
                    binary: self.dot_binary.clone(),
                },
                _ => AstvizError::Io(e),
            })?;

        // Dropping stdin closes the pipe so Graphviz sees EOF
        let written = match child.stdin.take() {
            Some(mut stdin) => stdin.write_all(dot.as_bytes()),
            None => Ok(()),
        };

        // A process that exits early breaks the pipe; its stderr says why
        let result = child.wait_with_output()?;
        if !result.status.success() {
            return Err(AstvizError::GraphvizFailed {
                status: result.status.to_string(),
                stderr: String::from_utf8_lossy(&result.stderr).trim().to_string(),
            });
        }
        written?;

        Ok(())
    }
}
