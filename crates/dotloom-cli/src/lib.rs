//! CLI logic for the dotloom diagram tool.
//!
//! This module contains the core CLI logic: loading configuration, selecting
//! catalog diagrams and rendering them.

pub mod catalog;
pub mod error_adapter;

mod args;
mod config;

pub use args::{Args, Command, RenderArgs};

use log::{error, info};
use rayon::prelude::*;
use thiserror::Error;

use dotloom::{
    DiagramRenderer, DotloomError,
    config::{AppConfig, OutputConfig},
};

/// Errors reported by the CLI.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Dotloom(#[from] DotloomError),

    /// Some diagrams failed; the others were still rendered.
    #[error("{} of {total} diagram(s) failed", failures.len())]
    Diagrams {
        failures: Vec<(String, DotloomError)>,
        total: usize,
    },
}

/// Run the dotloom CLI application
///
/// # Arguments
///
/// * `args` - Command-line arguments
///
/// # Errors
///
/// Returns [`CliError::Dotloom`] for configuration errors and unknown
/// diagram names, and [`CliError::Diagrams`] listing every diagram that
/// failed to render.
pub fn run(args: &Args) -> Result<(), CliError> {
    let app_config = config::load_config(args.config.as_ref())?;

    match &args.command {
        Command::List => {
            for diagram in catalog::all() {
                println!("{:<32} {}", diagram.name(), diagram.description());
            }
            Ok(())
        }
        Command::Render(render_args) => render(apply_overrides(app_config, render_args), render_args),
    }
}

/// Layers command-line options over the loaded configuration.
fn apply_overrides(config: AppConfig, args: &RenderArgs) -> AppConfig {
    let mut render = config.render().clone();
    if let Some(engine) = args.engine {
        render = render.with_engine(engine);
    }
    if let Some(format) = &args.format {
        render = render.with_format(format.clone());
    }

    let config = config.with_render(render);
    match &args.output_dir {
        Some(dir) => config.with_output(OutputConfig::new(dir)),
        None => config,
    }
}

fn render(app_config: AppConfig, args: &RenderArgs) -> Result<(), CliError> {
    let diagrams = catalog::select(&args.names)?;
    let renderer = DiagramRenderer::new(app_config);
    let dir = renderer.config().output().directory();

    info!(
        diagrams = diagrams.len(),
        output_dir = dir.display().to_string(),
        source_only = args.source_only;
        "Rendering catalog"
    );

    let failures: Vec<(String, DotloomError)> = diagrams
        .par_iter()
        .filter_map(|diagram| {
            let graph = diagram.build(renderer.config().theme());
            let result = if args.source_only {
                renderer.write_source(&graph, dir, diagram.name())
            } else {
                renderer.render(&graph, diagram.name())
            };

            match result {
                Ok(path) => {
                    info!(diagram = diagram.name(), output = path.display().to_string(); "Generated");
                    None
                }
                Err(err) => {
                    error!(diagram = diagram.name(), err:%; "Failed to render");
                    Some((diagram.name().to_string(), err))
                }
            }
        })
        .collect();

    if failures.is_empty() {
        Ok(())
    } else {
        Err(CliError::Diagrams {
            failures,
            total: diagrams.len(),
        })
    }
}
