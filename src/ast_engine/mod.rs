//! AST Engine module for Python parsing and definition extraction.
//!
//! This module provides:
//! - Tree-sitter based parsing with syntax error reporting
//! - Function definition extraction (functions, methods, nested defs)
//! - Direct call collection per definition
//! - The set of Python builtins, for optional filtering

pub mod builtins;
pub mod calls;
pub mod definitions;
pub mod parser;

pub use builtins::is_builtin;
pub use calls::collect_calls;
pub use definitions::{extract_definitions, FunctionDef};
pub use parser::{ParsedModule, PythonParser};
