//! astviz library
//!
//! Builds static call graphs for Python source code and renders them with
//! Graphviz. Functions are indexed across every input file, then the graph is
//! grown depth-first from an entrypoint following calls by bare name.

pub mod ast_engine;
pub mod call_graph;
pub mod error;
pub mod output;
pub mod processing;
pub mod types;

pub use call_graph::{CallGraph, CallGraphBuilder, GraphStats};
pub use error::{AstvizError, Result};
pub use output::{DotGraph, GraphRenderer};
pub use types::{AstvizConfig, OutputFormat};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::ast_engine::{FunctionDef, PythonParser};
    pub use crate::call_graph::*;
    pub use crate::error::*;
    pub use crate::output::*;
    pub use crate::processing::{collect_python_files, split_sources, FileFilter, FileProcessor};
    pub use crate::types::*;
}

/// Entrypoint function analysed when none is given
pub const DEFAULT_ENTRYPOINT: &str = "main";

/// Directory the rendered graph is written to
pub const DEFAULT_DESTINATION: &str = "graphs";

/// File stem of the rendered graph
pub const DEFAULT_OUTPUT_NAME: &str = "call_graph";

/// Graphviz layout binary
pub const DEFAULT_DOT_BINARY: &str = "dot";

/// Maximum size of a file picked up from a directory walk (1MB)
pub const DEFAULT_MAX_FILE_SIZE: usize = 1024 * 1024;
