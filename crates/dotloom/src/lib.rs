//! Dotloom - declarative Graphviz diagrams.
//!
//! Diagrams are built with the graph model from `dotloom-core`, serialized
//! to DOT, and rendered by an external Graphviz layout engine.

pub mod config;
pub mod export;

mod error;

pub use dotloom_core::{attributes, attrs, dot, graph, identifier, scope};

pub use error::DotloomError;

use std::path::{Path, PathBuf};

use log::{debug, info, trace};

use config::AppConfig;
use export::{
    engine::{Engine, GraphvizCommand},
    render::{self, RenderInvoker},
};
use graph::Graph;

/// Serializes and renders dotloom diagrams.
///
/// The renderer pairs an [`AppConfig`] with an [`Engine`]. By default the
/// engine is [`GraphvizCommand`], configured from the `[render]` section.
///
/// # Examples
///
/// ```rust,no_run
/// use dotloom::{DiagramRenderer, attrs, config::AppConfig, graph::Graph};
///
/// let mut graph = Graph::digraph("example");
/// graph.edge("a", "b", attrs! { "label" => "go" });
///
/// let renderer = DiagramRenderer::new(AppConfig::default());
///
/// // DOT text only
/// let dot = renderer.to_dot(&graph).expect("Failed to serialize");
///
/// // out/example.svg
/// let path = renderer.render(&graph, "example").expect("Failed to render");
/// ```
#[derive(Debug)]
pub struct DiagramRenderer<E = GraphvizCommand> {
    config: AppConfig,
    engine: E,
}

impl DiagramRenderer {
    /// Creates a renderer running Graphviz as configured in `config`.
    pub fn new(config: AppConfig) -> Self {
        let engine = GraphvizCommand::new(config.render().executable().map(Path::to_path_buf));
        Self { config, engine }
    }
}

impl Default for DiagramRenderer {
    fn default() -> Self {
        Self::new(AppConfig::default())
    }
}

impl<E: Engine> DiagramRenderer<E> {
    /// Replaces the engine, keeping the configuration.
    pub fn with_engine<F: Engine>(self, engine: F) -> DiagramRenderer<F> {
        DiagramRenderer {
            config: self.config,
            engine,
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Serializes `graph` to DOT text.
    ///
    /// # Errors
    ///
    /// Returns [`DotloomError::Serialize`] if the writer fails.
    pub fn to_dot(&self, graph: &Graph) -> Result<String, DotloomError> {
        debug!(
            graph = graph.name(),
            nodes = graph.node_count(),
            edges = graph.edge_count();
            "Serializing diagram"
        );
        let dot = export::dot::to_dot(graph)?;
        trace!(dot; "Serialized diagram");
        Ok(dot)
    }

    /// Writes the DOT source of `graph` to `<dir>/<base>.gv` without running
    /// the engine.
    ///
    /// # Errors
    ///
    /// Returns [`DotloomError`] if serialization or writing fails.
    pub fn write_source(&self, graph: &Graph, dir: &Path, base: &str) -> Result<PathBuf, DotloomError> {
        let dot = self.to_dot(graph)?;
        let path = render::write_source(&dot, dir, base)?;
        info!(source = path.display().to_string(); "DOT source written");
        Ok(path)
    }

    /// Renders `graph` to `<dir>/<base>.<ext>`.
    ///
    /// # Errors
    ///
    /// Returns [`DotloomError::Render`] carrying the engine's diagnostics if
    /// rendering fails. No output file is left behind in that case.
    pub fn render_to(&self, graph: &Graph, dir: &Path, base: &str) -> Result<PathBuf, DotloomError> {
        let undeclared = graph.undeclared_endpoints();
        if !undeclared.is_empty() {
            let ids: Vec<String> = undeclared.iter().map(ToString::to_string).collect();
            debug!(graph = graph.name(), ids:?; "Edge endpoints without node declarations");
        }

        let dot = self.to_dot(graph)?;
        let settings = self.config.render();
        let path = RenderInvoker::new(&self.engine)
            .with_layout(settings.engine())
            .with_format(settings.format().clone())
            .with_keep_source(settings.keep_source())
            .invoke(&dot, dir, base)?;

        info!(output = path.display().to_string(); "Diagram rendered");
        Ok(path)
    }

    /// Renders `graph` into the configured output directory.
    ///
    /// # Errors
    ///
    /// See [`render_to`](Self::render_to).
    pub fn render(&self, graph: &Graph, base: &str) -> Result<PathBuf, DotloomError> {
        self.render_to(graph, self.config.output().directory(), base)
    }
}
