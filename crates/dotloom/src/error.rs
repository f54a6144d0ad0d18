//! Error types for dotloom operations.
//!
//! This module provides the main error type [`DotloomError`] which wraps the
//! error conditions that can occur while serializing and rendering diagrams.

use std::{fmt, io};

use thiserror::Error;

use crate::export::RenderError;

/// The main error type for dotloom operations.
///
/// Building a graph never fails; every variant here comes from turning a
/// finished graph into text or files.
#[derive(Debug, Error)]
pub enum DotloomError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Serialize error: failed to write DOT output")]
    Serialize(#[from] fmt::Error),

    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    #[error("Configuration error: {0}")]
    Config(String),
}
