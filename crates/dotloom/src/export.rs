//! Export functionality for dotloom diagrams.
//!
//! This module turns a finished [`Graph`](dotloom_core::graph::Graph) into
//! files. It is the final stage of the pipeline.
//!
//! # Pipeline Position
//!
//! ```text
//! Builder calls
//!     ↓ scope / cascade
//! Graph model
//!     ↓ serialize (dot)
//! DOT text
//!     ↓ render (engine + render)
//! Output File
//! ```
//!
//! # Components
//!
//! - [`dot`]: deterministic DOT serializer ([`dot::DotWriter`]).
//! - [`engine`]: the [`engine::Engine`] boundary and its Graphviz
//!   implementation [`engine::GraphvizCommand`].
//! - [`render`]: [`render::RenderInvoker`], which drives one engine run and
//!   persists its output.
//!
//! # Error Handling
//!
//! Engine and file failures are reported as [`RenderError`], which converts
//! into [`DotloomError::Render`](crate::DotloomError::Render) at the crate
//! boundary.

pub mod dot;
pub mod engine;
pub mod render;

use std::io;

use thiserror::Error;

use engine::LayoutEngine;

/// Errors that can occur while running a layout engine.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The engine executable could not be started.
    #[error("layout engine executable `{program}` not found")]
    EngineNotFound {
        program: String,
        #[source]
        source: io::Error,
    },

    /// The engine ran and exited unsuccessfully. `stderr` holds its
    /// diagnostic output byte for byte; it is decoded only for display.
    #[error("layout engine `{engine}` failed ({status}):\n{}", String::from_utf8_lossy(.stderr))]
    EngineFailed {
        engine: LayoutEngine,
        status: String,
        stderr: Vec<u8>,
    },

    #[error("invalid output format `{0}`")]
    InvalidFormat(String),

    #[error("unknown layout engine `{0}`")]
    UnknownEngine(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}
