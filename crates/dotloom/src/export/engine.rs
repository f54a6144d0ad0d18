//! The layout engine boundary.
//!
//! Graphviz is a black box here: DOT source and a format token go in,
//! rendered bytes or a failure with the engine's diagnostics come out. The
//! [`Engine`] trait is that boundary; [`GraphvizCommand`] implements it on
//! top of `graphviz-rust` (feature `graphviz`) or by spawning a configured
//! Graphviz executable.

use std::{
    fmt::{self, Display},
    io::{self, Write},
    path::{Path, PathBuf},
    process::{Command, Stdio},
    str::FromStr,
};

#[cfg(feature = "graphviz")]
use graphviz_rust::{
    cmd::{CommandArg, Layout},
    exec_dot,
};
use log::{debug, warn};
use serde::Deserialize;
use tempfile::Builder;

use super::RenderError;

/// Graphviz layout programs.
///
/// The names match the executables and the `-K` option (lowercase).
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutEngine {
    /// Hierarchical layout (default)
    #[default]
    Dot,
    /// Spring model layout
    Neato,
    /// Force-directed placement
    Fdp,
    /// Force-directed placement for large graphs
    Sfdp,
    /// Circular layout
    Circo,
    /// Radial layout
    Twopi,
    /// Packed clusters
    Osage,
    /// Squarified treemap
    Patchwork,
}

impl LayoutEngine {
    pub const ALL: [LayoutEngine; 8] = [
        Self::Dot,
        Self::Neato,
        Self::Fdp,
        Self::Sfdp,
        Self::Circo,
        Self::Twopi,
        Self::Osage,
        Self::Patchwork,
    ];
}

impl FromStr for LayoutEngine {
    type Err = RenderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|engine| <&'static str>::from(*engine) == s)
            .ok_or_else(|| RenderError::UnknownEngine(s.to_string()))
    }
}

impl From<LayoutEngine> for &'static str {
    fn from(val: LayoutEngine) -> Self {
        match val {
            LayoutEngine::Dot => "dot",
            LayoutEngine::Neato => "neato",
            LayoutEngine::Fdp => "fdp",
            LayoutEngine::Sfdp => "sfdp",
            LayoutEngine::Circo => "circo",
            LayoutEngine::Twopi => "twopi",
            LayoutEngine::Osage => "osage",
            LayoutEngine::Patchwork => "patchwork",
        }
    }
}

impl Display for LayoutEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s: &'static str = (*self).into();
        write!(f, "{s}")
    }
}

/// An output format token as accepted by `-T`, such as `svg`, `png` or
/// `svg:cairo`.
///
/// The token is validated on construction but not checked against the
/// formats the installed Graphviz supports; the engine reports those.
///
/// ```
/// use dotloom::export::engine::Format;
///
/// let format: Format = "svg:cairo".parse().unwrap();
/// assert_eq!(format.extension(), "svg");
/// assert!("svg;rm".parse::<Format>().is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "String")]
pub struct Format(String);

impl Format {
    /// Validates and wraps a format token.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::InvalidFormat`] if the token is empty, starts
    /// with `:` or contains characters outside `[A-Za-z0-9:_-]`.
    pub fn new(token: impl Into<String>) -> Result<Self, RenderError> {
        let token = token.into();
        let valid = !token.is_empty()
            && !token.starts_with(':')
            && token
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, ':' | '_' | '-'));
        if valid {
            Ok(Self(token))
        } else {
            Err(RenderError::InvalidFormat(token))
        }
    }

    pub fn svg() -> Self {
        Self("svg".to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// File extension for this format: the token up to the first `:`.
    pub fn extension(&self) -> &str {
        self.0.split(':').next().unwrap_or(&self.0)
    }
}

impl Default for Format {
    fn default() -> Self {
        Self::svg()
    }
}

impl Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Format {
    type Err = RenderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for Format {
    type Error = RenderError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// A layout engine able to render DOT text.
///
/// Implementations run synchronously and must not write the output file
/// themselves; the caller persists the returned bytes. Any intermediate
/// source file an implementation needs is its own to create and remove.
pub trait Engine {
    /// Lays out `dot` with `layout` and returns the rendered bytes in
    /// `format`.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::EngineNotFound`] if the engine cannot be
    /// started and [`RenderError::EngineFailed`] if it exits unsuccessfully.
    fn render(&self, layout: LayoutEngine, format: &Format, dot: &str) -> Result<Vec<u8>, RenderError>;
}

/// Runs Graphviz.
///
/// By default `dot` is looked up on `PATH` and driven through
/// `graphviz_rust::exec_dot` with the layout selected by `-K<engine>`.
/// With an explicit executable, that program is spawned directly with the
/// same arguments and a temporary `.gv` source.
#[derive(Debug, Clone, Default)]
pub struct GraphvizCommand {
    executable: Option<PathBuf>,
}

impl GraphvizCommand {
    pub fn new(executable: Option<PathBuf>) -> Self {
        Self { executable }
    }

    pub fn executable(&self) -> Option<&Path> {
        self.executable.as_deref()
    }

    /// Spawns `program` on a temporary copy of `dot`.
    ///
    /// The source file is removed when this returns, whatever the outcome.
    fn run_program(
        &self,
        program: &Path,
        layout: LayoutEngine,
        format: &Format,
        dot: &str,
    ) -> Result<Vec<u8>, RenderError> {
        let mut source = Builder::new().prefix("dotloom-").suffix(".gv").tempfile()?;
        source.write_all(dot.as_bytes())?;
        source.flush()?;

        let mut command = Command::new(program);
        command
            .arg(format!("-K{layout}"))
            .arg(format!("-T{format}"))
            .arg(source.path())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        debug!(command:?; "Invoking layout engine");

        let output = command.output().map_err(|source| match source.kind() {
            io::ErrorKind::NotFound => RenderError::EngineNotFound {
                program: program.to_string_lossy().into_owned(),
                source,
            },
            _ => RenderError::Io(source),
        })?;

        if !output.status.success() {
            return Err(RenderError::EngineFailed {
                engine: layout,
                status: output.status.to_string(),
                stderr: output.stderr,
            });
        }

        if !output.stderr.is_empty() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            warn!(engine = layout.to_string(), stderr:%; "Layout engine reported warnings");
        }

        debug!(bytes = output.stdout.len(); "Layout engine finished");
        Ok(output.stdout)
    }
}

#[cfg(feature = "graphviz")]
impl GraphvizCommand {
    fn run_dot(&self, layout: LayoutEngine, format: &Format, dot: &str) -> Result<Vec<u8>, RenderError> {
        let args = vec![layout_arg(layout), CommandArg::Custom(format!("-T{format}"))];
        debug!(engine = layout.to_string(), format = format.to_string(); "Invoking dot");

        let bytes = exec_dot(dot.to_string(), args).map_err(|err| engine_error(layout, err))?;

        debug!(bytes = bytes.len(); "Layout engine finished");
        Ok(bytes)
    }
}

#[cfg(feature = "graphviz")]
fn layout_arg(layout: LayoutEngine) -> CommandArg {
    match layout {
        LayoutEngine::Dot => CommandArg::Layout(Layout::Dot),
        LayoutEngine::Neato => CommandArg::Layout(Layout::Neato),
        LayoutEngine::Fdp => CommandArg::Layout(Layout::Fdp),
        LayoutEngine::Sfdp => CommandArg::Layout(Layout::Sfdp),
        LayoutEngine::Circo => CommandArg::Layout(Layout::Circo),
        LayoutEngine::Twopi => CommandArg::Layout(Layout::Twopi),
        LayoutEngine::Patchwork => CommandArg::Layout(Layout::Patchwork),
        // graphviz-rust spells this one `Asage`, which yields `-Kasage`.
        LayoutEngine::Osage => CommandArg::Custom("-Kosage".to_string()),
    }
}

/// Maps an `exec_dot` failure onto the engine boundary errors.
///
/// `exec_dot` reports a non-zero exit as an [`io::ErrorKind::Other`] error
/// whose message is the engine's stderr.
#[cfg(feature = "graphviz")]
fn engine_error(layout: LayoutEngine, err: io::Error) -> RenderError {
    match err.kind() {
        io::ErrorKind::NotFound => RenderError::EngineNotFound {
            program: "dot".to_string(),
            source: err,
        },
        io::ErrorKind::Other => RenderError::EngineFailed {
            engine: layout,
            status: "unsuccessful exit".to_string(),
            stderr: err.to_string().into_bytes(),
        },
        _ => RenderError::Io(err),
    }
}

impl Engine for GraphvizCommand {
    fn render(&self, layout: LayoutEngine, format: &Format, dot: &str) -> Result<Vec<u8>, RenderError> {
        match &self.executable {
            Some(program) => self.run_program(program, layout, format, dot),
            #[cfg(feature = "graphviz")]
            None => self.run_dot(layout, format, dot),
            #[cfg(not(feature = "graphviz"))]
            None => self.run_program(Path::new("dot"), layout, format, dot),
        }
    }
}
