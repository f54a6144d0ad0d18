//! Command-line argument definitions for the dotloom CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Global arguments select the configuration file and logging
//! verbosity; the [`Command`] picks what to do with the diagram catalog.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use dotloom::export::engine::{Format, LayoutEngine};

/// Command-line arguments for the dotloom diagram tool
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Path to configuration file (TOML)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "info")]
    pub log_level: String,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List the diagrams in the catalog
    List,

    /// Render catalog diagrams
    Render(RenderArgs),
}

#[derive(clap::Args, Debug, Default)]
pub struct RenderArgs {
    /// Diagrams to render (all when omitted)
    pub names: Vec<String>,

    /// Directory for rendered files, overriding the configuration
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Output format such as svg, png or svg:cairo
    #[arg(short, long)]
    pub format: Option<Format>,

    /// Graphviz layout engine (dot, neato, fdp, sfdp, circo, twopi, osage, patchwork)
    #[arg(short, long)]
    pub engine: Option<LayoutEngine>,

    /// Write the DOT source only, without running Graphviz
    #[arg(long)]
    pub source_only: bool,
}
