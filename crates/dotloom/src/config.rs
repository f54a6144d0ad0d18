//! Configuration types for dotloom rendering.
//!
//! This module provides configuration structures that control how diagrams
//! are rendered and themed. All types implement [`serde::Deserialize`] for
//! loading from TOML files.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration combining the sections below.
//! - [`RenderConfig`] - Layout engine, output format and engine executable.
//! - [`OutputConfig`] - Where rendered files are written.
//! - [`ThemeConfig`] - Default attribute sets layered over a diagram's own root defaults.
//!
//! # Example
//!
//! ```
//! # use dotloom::config::AppConfig;
//! let config: AppConfig = toml::from_str(
//!     r#"
//!     [render]
//!     engine = "neato"
//!     format = "png"
//!
//!     [theme.node]
//!     fontname = "Helvetica"
//!     "#,
//! )
//! .unwrap();
//!
//! assert_eq!(config.render().format().extension(), "png");
//! assert_eq!(config.output().directory().to_str(), Some("out"));
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;

use dotloom_core::{
    attributes::{AttributeKind, AttributeSet},
    graph::Graph,
};

use crate::export::engine::{Format, LayoutEngine};

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Render configuration section.
    #[serde(default)]
    render: RenderConfig,

    /// Output configuration section.
    #[serde(default)]
    output: OutputConfig,

    /// Theme configuration section.
    #[serde(default)]
    theme: ThemeConfig,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] from its sections.
    pub fn new(render: RenderConfig, output: OutputConfig, theme: ThemeConfig) -> Self {
        Self {
            render,
            output,
            theme,
        }
    }

    /// Returns the render configuration.
    pub fn render(&self) -> &RenderConfig {
        &self.render
    }

    /// Returns the output configuration.
    pub fn output(&self) -> &OutputConfig {
        &self.output
    }

    /// Returns the theme configuration.
    pub fn theme(&self) -> &ThemeConfig {
        &self.theme
    }

    pub fn with_render(mut self, render: RenderConfig) -> Self {
        self.render = render;
        self
    }

    pub fn with_output(mut self, output: OutputConfig) -> Self {
        self.output = output;
        self
    }
}

/// Layout engine and output format settings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RenderConfig {
    /// [`LayoutEngine`] used for every diagram.
    #[serde(default)]
    engine: LayoutEngine,

    /// Output [`Format`] token, `svg` by default.
    #[serde(default)]
    format: Format,

    /// Graphviz executable to run instead of looking up the engine on `PATH`.
    #[serde(default)]
    executable: Option<PathBuf>,

    /// Keep the intermediate `.gv` source next to the output.
    #[serde(default)]
    keep_source: bool,
}

impl RenderConfig {
    pub fn engine(&self) -> LayoutEngine {
        self.engine
    }

    pub fn format(&self) -> &Format {
        &self.format
    }

    pub fn executable(&self) -> Option<&Path> {
        self.executable.as_deref()
    }

    pub fn keep_source(&self) -> bool {
        self.keep_source
    }

    pub fn with_engine(mut self, engine: LayoutEngine) -> Self {
        self.engine = engine;
        self
    }

    pub fn with_format(mut self, format: Format) -> Self {
        self.format = format;
        self
    }

    pub fn with_executable(mut self, executable: impl Into<PathBuf>) -> Self {
        self.executable = Some(executable.into());
        self
    }

    pub fn with_keep_source(mut self, keep_source: bool) -> Self {
        self.keep_source = keep_source;
        self
    }
}

/// Output location settings.
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Directory receiving `<base>.<ext>` files.
    #[serde(default = "default_directory")]
    directory: PathBuf,
}

fn default_directory() -> PathBuf {
    PathBuf::from("out")
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: default_directory(),
        }
    }
}

impl OutputConfig {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }
}

/// Attribute sets layered over the root defaults of catalog diagrams.
///
/// Applying a theme amends the root scope, so it only affects elements
/// declared afterwards.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ThemeConfig {
    #[serde(default)]
    graph: Option<AttributeSet>,

    #[serde(default)]
    node: Option<AttributeSet>,

    #[serde(default)]
    edge: Option<AttributeSet>,
}

impl ThemeConfig {
    /// Returns the themed set for `kind`, if any.
    pub fn get(&self, kind: AttributeKind) -> Option<&AttributeSet> {
        match kind {
            AttributeKind::Graph => self.graph.as_ref(),
            AttributeKind::Node => self.node.as_ref(),
            AttributeKind::Edge => self.edge.as_ref(),
        }
    }

    pub fn is_empty(&self) -> bool {
        AttributeKind::ALL.iter().all(|kind| self.get(*kind).is_none())
    }

    /// Amends the root defaults of `graph` with every themed set.
    pub fn apply(&self, graph: &mut Graph) {
        for kind in AttributeKind::ALL {
            if let Some(attrs) = self.get(kind) {
                graph.attr(kind, attrs.clone());
            }
        }
    }
}
