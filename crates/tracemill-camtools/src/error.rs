//! Error types for the CAM tools crate.
//!
//! Structured errors for geometry, G-code generation and drawing file parsing.

use thiserror::Error;
use tracemill_core::ParameterError;

/// Errors that can occur while turning drawings into toolpaths.
#[derive(Error, Debug)]
pub enum CamToolError {
    /// G-code generation failed.
    #[error("G-code generation failed: {0}")]
    GenerationFailed(String),

    /// A geometry operation failed (boolean union, offset, non-finite input).
    #[error("Geometry error: {0}")]
    GeometryError(String),

    /// A parameter validation error occurred.
    #[error("Parameter error: {0}")]
    Parameter(#[from] ParameterError),

    /// A file format error occurred.
    #[error("File format error: {0}")]
    FileFormat(#[from] FileFormatError),

    /// An error bubbled up from the core crate.
    #[error(transparent)]
    Core(#[from] tracemill_core::Error),
}

/// Errors related to drawing file parsing.
#[derive(Error, Debug)]
pub enum FileFormatError {
    /// The Gerber file could not be parsed.
    #[error("Gerber parse error: {0}")]
    GerberParseError(String),

    /// The Excellon drill file could not be parsed.
    #[error("Excellon parse error: {0}")]
    ExcellonParseError(String),

    /// The file is empty or contains no usable data.
    #[error("Empty file: {0}")]
    EmptyFile(String),
}

/// Result type alias for CAM tool operations.
pub type CamToolResult<T> = Result<T, CamToolError>;
