//! Error adapter for converting CLI errors to miette diagnostics.
//!
//! This module provides the bridge between the library's standard error types
//! and miette's rich diagnostic formatting used in the CLI.
//!
//! # Multi-Error Support
//!
//! When several diagrams fail in one run, each failure is rendered
//! independently, prefixed with the diagram name.

use std::fmt;

use miette::Diagnostic as MietteDiagnostic;

use dotloom::{DotloomError, export::RenderError};

use crate::CliError;

/// Adapter for a single [`DotloomError`], optionally tied to a diagram.
pub struct ErrorAdapter<'a> {
    /// Name of the diagram that failed, if the error belongs to one.
    diagram: Option<&'a str>,
    err: &'a DotloomError,
}

impl<'a> ErrorAdapter<'a> {
    pub fn new(err: &'a DotloomError) -> Self {
        Self { diagram: None, err }
    }

    pub fn for_diagram(diagram: &'a str, err: &'a DotloomError) -> Self {
        Self {
            diagram: Some(diagram),
            err,
        }
    }
}

impl fmt::Debug for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ErrorAdapter")
            .field("diagram", &self.diagram)
            .field("err", &self.err)
            .finish()
    }
}

impl fmt::Display for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.diagram {
            Some(diagram) => write!(f, "{diagram}: {}", self.err),
            None => fmt::Display::fmt(self.err, f),
        }
    }
}

impl std::error::Error for ErrorAdapter<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        std::error::Error::source(self.err)
    }
}

impl MietteDiagnostic for ErrorAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let code = match self.err {
            DotloomError::Io(_) => "dotloom::io",
            DotloomError::Serialize(_) => "dotloom::serialize",
            DotloomError::Render(_) => "dotloom::render",
            DotloomError::Config(_) => "dotloom::config",
        };
        Some(Box::new(code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let help = match self.err {
            DotloomError::Render(RenderError::EngineNotFound { .. }) => {
                "install Graphviz or set `render.executable` in the configuration"
            }
            DotloomError::Render(RenderError::InvalidFormat(_)) => {
                "formats look like `svg`, `png` or `svg:cairo`"
            }
            DotloomError::Render(RenderError::UnknownEngine(_)) => {
                "engines are dot, neato, fdp, sfdp, circo, twopi, osage and patchwork"
            }
            DotloomError::Render(RenderError::EngineFailed { .. }) => {
                "rerun with --source-only to inspect the generated DOT"
            }
            _ => return None,
        };
        Some(Box::new(help))
    }
}

/// An error ready to be rendered by miette.
pub type Reportable<'a> = ErrorAdapter<'a>;

/// Convert a [`CliError`] into a list of reportable errors.
///
/// For [`CliError::Diagrams`], this returns one [`Reportable`] per failed
/// diagram. For other variants, it returns a single [`Reportable`].
pub fn to_reportables(err: &CliError) -> Vec<Reportable<'_>> {
    match err {
        CliError::Dotloom(err) => vec![ErrorAdapter::new(err)],
        CliError::Diagrams { failures, .. } => failures
            .iter()
            .map(|(name, err)| ErrorAdapter::for_diagram(name, err))
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use std::io;

    use dotloom::export::engine::LayoutEngine;

    use super::*;

    fn engine_failed(stderr: &str) -> DotloomError {
        DotloomError::Render(RenderError::EngineFailed {
            engine: LayoutEngine::Dot,
            status: "exit status: 1".to_string(),
            stderr: stderr.as_bytes().to_vec(),
        })
    }

    #[test]
    fn test_single_error() {
        let err = CliError::Dotloom(DotloomError::Config("bad".to_string()));

        let reportables = to_reportables(&err);

        assert_eq!(reportables.len(), 1);
        assert_eq!(reportables[0].to_string(), "Configuration error: bad");
        assert_eq!(
            reportables[0].code().map(|code| code.to_string()),
            Some("dotloom::config".to_string())
        );
        assert!(reportables[0].help().is_none());
    }

    #[test]
    fn test_one_reportable_per_failed_diagram() {
        let err = CliError::Diagrams {
            failures: vec![
                ("data_flow".to_string(), engine_failed("syntax error")),
                (
                    "architecture_overview".to_string(),
                    DotloomError::Io(io::Error::other("disk full")),
                ),
            ],
            total: 4,
        };

        let reportables = to_reportables(&err);

        assert_eq!(reportables.len(), 2);
        assert!(reportables[0].to_string().starts_with("data_flow: Render error:"));
        assert!(reportables[0].to_string().ends_with("syntax error"));
        assert_eq!(
            reportables[1].to_string(),
            "architecture_overview: I/O error: disk full"
        );
        assert_eq!(
            reportables[1].code().map(|code| code.to_string()),
            Some("dotloom::io".to_string())
        );
    }

    #[test]
    fn test_engine_not_found_has_help() {
        let err = DotloomError::Render(RenderError::EngineNotFound {
            program: "dot".to_string(),
            source: io::Error::from(io::ErrorKind::NotFound),
        });

        let adapter = ErrorAdapter::new(&err);

        assert_eq!(
            adapter.code().map(|code| code.to_string()),
            Some("dotloom::render".to_string())
        );
        assert!(adapter.help().unwrap().to_string().contains("render.executable"));
        assert!(adapter.labels().is_none());
    }
}
