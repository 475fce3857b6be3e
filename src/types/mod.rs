//! Core types for configuring a call-graph run.

mod config;
mod format;

pub use config::AstvizConfig;
pub use format::OutputFormat;
