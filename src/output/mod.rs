//! Output module for turning call graphs into files.
//!
//! This module provides:
//! - DOT generation with per-node layout attributes
//! - Rendering to DOT, JSON or Graphviz image formats

pub mod dot;
pub mod renderer;

pub use dot::{DotEdge, DotGraph, DotNode};
pub use renderer::GraphRenderer;
