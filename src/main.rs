//! astviz - Main Entry Point
//!
//! Renders the call graph of a Python code base, starting at an entrypoint.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use tracing::{debug, error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use astviz::processing::{collect_python_files, split_sources, FileFilter, FileProcessor, FilterConfig};
use astviz::{AstvizConfig, AstvizError, CallGraphBuilder, GraphRenderer, OutputFormat};

/// Render the static call graph of Python sources with Graphviz.
#[derive(Parser, Debug)]
#[command(name = "astviz", author, version, about, long_about = None)]
struct Cli {
    /// Path to the Python source file/folder (comma-separated for several)
    #[arg(short, long)]
    source: String,

    /// Path to the output directory for the graph [default: graphs]
    #[arg(short, long)]
    destination: Option<PathBuf>,

    /// Name of the entrypoint function to analyze [default: main]
    #[arg(short, long)]
    entrypoint: Option<String>,

    /// Output format: png, svg, pdf, dot or json [default: png]
    #[arg(short, long)]
    format: Option<String>,

    /// File name of the graph, without extension [default: call_graph]
    #[arg(short, long)]
    output_name: Option<String>,

    /// Leave calls to Python builtins out of the graph
    #[arg(long)]
    exclude_builtins: bool,

    /// Also walk hidden files and directories
    #[arg(long)]
    include_hidden: bool,

    /// Keep the intermediate .dot file when rendering images
    #[arg(long)]
    keep_dot: bool,

    /// Graphviz binary used for image formats [default: dot]
    #[arg(long)]
    dot_binary: Option<String>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    /// Layer command line flags over the environment configuration.
    fn into_config(self, mut config: AstvizConfig) -> Result<(AstvizConfig, String)> {
        if let Some(destination) = self.destination {
            config.destination = destination;
        }
        if let Some(entrypoint) = self.entrypoint {
            config.entrypoint = entrypoint;
        }
        if let Some(format) = self.format {
            config.format = format.parse::<OutputFormat>()?;
        }
        if let Some(output_name) = self.output_name {
            config.output_name = output_name;
        }
        if let Some(dot_binary) = self.dot_binary {
            config.dot_binary = dot_binary;
        }
        config.exclude_builtins |= self.exclude_builtins;
        config.include_hidden |= self.include_hidden;
        config.keep_dot |= self.keep_dot;

        Ok((config, self.source))
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize tracing
    let default_filter = if cli.verbose { "astviz=debug" } else { "astviz=info" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| default_filter.into()),
        ))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    // Load configuration
    dotenvy::dotenv().ok();
    let (config, source) = cli.into_config(AstvizConfig::from_env())?;
    debug!(?config, "Resolved configuration");

    let sources = split_sources(&source);
    info!("Starting analysis with sources: {:?}", sources);

    let filter_config = FilterConfig {
        max_file_size: config.max_file_size,
        include_hidden: config.include_hidden,
        ..FilterConfig::default()
    };
    let files = collect_python_files(&sources, &FileFilter::new(filter_config.clone()));
    if files.is_empty() {
        return Err(AstvizError::NoSourceFiles.into());
    }
    debug!("Collected {} files", files.len());

    let mut builder = CallGraphBuilder::with_processor(FileProcessor::new(filter_config))
        .with_exclude_builtins(config.exclude_builtins);
    builder.index_files(&files);
    info!(
        "Indexed {} files ({} skipped), {} functions defined",
        builder.files_indexed(),
        builder.skipped().len(),
        builder.function_count()
    );

    let graph = builder.build(&config.entrypoint);
    let stats = graph.stats();
    info!(
        functions = stats.functions,
        edges = stats.edges,
        unresolved = stats.unresolved,
        "Call graph built"
    );

    if config.format.needs_graphviz() {
        debug!("Rendering {} with {}", config.format, config.dot_binary);
    }
    GraphRenderer::from_config(&config).render(&graph, &config.destination, config.format)?;

    Ok(())
}
