//! Call graph construction.
//!
//! Indexes function definitions across all input files, then walks calls by
//! bare name from the entrypoint.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::path::{Path, PathBuf};

use tracing::{debug, error, info, warn};

use crate::ast_engine::{extract_definitions, is_builtin, FunctionDef, PythonParser};
use crate::call_graph::graph::{CallGraph, Caller};
use crate::error::{AstvizError, Result};
use crate::processing::FileProcessor;

/// A file that could not be indexed, and why.
#[derive(Debug, Clone)]
pub struct SkippedFile {
    pub path: PathBuf,
    pub reason: String,
}

/// Builds call graphs from Python sources.
pub struct CallGraphBuilder {
    parser: PythonParser,
    processor: FileProcessor,
    /// Function name -> most recently indexed definition.
    index: HashMap<String, FunctionDef>,
    exclude_builtins: bool,
    files_indexed: usize,
    skipped: Vec<SkippedFile>,
}

impl Default for CallGraphBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl CallGraphBuilder {
    /// Create a builder with the default file processor.
    pub fn new() -> Self {
        Self::with_processor(FileProcessor::default())
    }

    /// Create a builder using a specific file processor.
    pub fn with_processor(processor: FileProcessor) -> Self {
        Self {
            parser: PythonParser::new(),
            processor,
            index: HashMap::new(),
            exclude_builtins: false,
            files_indexed: 0,
            skipped: Vec::new(),
        }
    }

    /// Drop calls to Python builtins that the sources do not redefine.
    pub fn with_exclude_builtins(mut self, exclude: bool) -> Self {
        self.exclude_builtins = exclude;
        self
    }

    /// Index every file, logging and skipping the ones that fail.
    pub fn index_files<P: AsRef<Path>>(&mut self, paths: &[P]) -> usize {
        let mut total = 0;

        for path in paths {
            let path = path.as_ref();
            match self.index_file(path) {
                Ok(count) => total += count,
                Err(e) => {
                    match &e {
                        AstvizError::Syntax { message, .. } => {
                            error!("Skipping {} due to syntax error: {}", path.display(), message)
                        }
                        _ => error!("Skipping {}: {}", path.display(), e),
                    }
                    self.skipped.push(SkippedFile {
                        path: path.to_path_buf(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        total
    }

    /// Read and index a single file.
    pub fn index_file(&mut self, path: &Path) -> Result<usize> {
        let source = self.processor.read(path)?;
        self.index_source(path, &source.content)
    }

    /// Index the definitions in already-decoded source.
    ///
    /// A definition replaces any earlier one with the same name.
    pub fn index_source(&mut self, path: &Path, content: &str) -> Result<usize> {
        let module = self
            .parser
            .parse(path, content)
            .map_err(|e| AstvizError::Parser(e.to_string()))?;

        if let Some(first) = module.parse_errors.first() {
            return Err(AstvizError::Syntax {
                path: path.to_path_buf(),
                message: first.clone(),
            });
        }

        let definitions = extract_definitions(&module);
        info!("Found {} functions in {}", definitions.len(), path.display());

        let count = definitions.len();
        for def in definitions {
            debug!("\tf> {}", def.qualified_name);
            self.index.insert(def.name.clone(), def);
        }
        self.files_indexed += 1;

        Ok(count)
    }

    /// Look up an indexed definition by name.
    pub fn definition(&self, name: &str) -> Option<&FunctionDef> {
        self.index.get(name)
    }

    /// Number of distinct function names indexed.
    pub fn function_count(&self) -> usize {
        self.index.len()
    }

    /// Number of files indexed successfully.
    pub fn files_indexed(&self) -> usize {
        self.files_indexed
    }

    /// Files that were skipped.
    pub fn skipped(&self) -> &[SkippedFile] {
        &self.skipped
    }

    /// Build the graph reachable from `entrypoint`.
    ///
    /// Names without a definition are leaves. An unknown entrypoint gives an
    /// empty graph.
    pub fn build(&self, entrypoint: &str) -> CallGraph {
        info!("Generating call graph for entrypoint '{}'", entrypoint);

        let mut graph = CallGraph::new(entrypoint);
        if !self.index.contains_key(entrypoint) {
            warn!("Entrypoint '{}' is not defined in any source file", entrypoint);
            return graph;
        }

        let mut visited: HashSet<&str> = HashSet::new();
        let mut stack: Vec<&str> = vec![entrypoint];

        while let Some(name) = stack.pop() {
            let Some(def) = self.index.get(name) else {
                continue;
            };
            if !visited.insert(name) {
                continue;
            }

            let callees: BTreeSet<String> = def
                .calls
                .iter()
                .filter(|callee| !self.is_excluded(callee))
                .cloned()
                .collect();

            // Reverse so callees are visited in sorted order
            stack.extend(def.calls.iter().filter(|c| callees.contains(*c)).rev().map(String::as_str));
            graph.add_caller(Caller::from_definition(def, callees));
        }

        debug!(functions = graph.len(), "Call graph complete");
        graph
    }

    fn is_excluded(&self, name: &str) -> bool {
        self.exclude_builtins && is_builtin(name) && !self.index.contains_key(name)
    }
}
