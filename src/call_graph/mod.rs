//! Call graph construction and data model.

pub mod builder;
pub mod graph;

pub use builder::{CallGraphBuilder, SkippedFile};
pub use graph::{CallGraph, Caller, GraphStats};
