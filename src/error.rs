// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Error types for loading, batching and rendering heatmap datasets.

use std::fmt;

/// Result type alias for dataset and visualization operations.
pub type Result<T> = std::result::Result<T, FlicError>;

/// Main error type for the crate.
#[derive(Debug)]
pub enum FlicError {
    /// An expected input file does not exist.
    FileNotFound(String),
    /// A file exists but is not a readable array archive of the expected type.
    FormatError(String),
    /// Two arrays that must agree in shape do not.
    ShapeMismatch(String),
    /// An index (sample or joint) is out of range.
    IndexError(String),
    /// Error processing or encoding images.
    ImageError(String),
    /// IO error with context (directory creation, file writes).
    IoError(String),
    /// Wrapped `std::io::Error`
    Io(std::io::Error),
    /// Invalid configuration provided.
    ConfigError(String),
    /// Window or rendering surface error.
    VisualizerError(String),
}

impl fmt::Display for FlicError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FileNotFound(msg) => write!(f, "File not found: {msg}"),
            Self::FormatError(msg) => write!(f, "Format error: {msg}"),
            Self::ShapeMismatch(msg) => write!(f, "Shape mismatch: {msg}"),
            Self::IndexError(msg) => write!(f, "Index error: {msg}"),
            Self::ImageError(msg) => write!(f, "Image error: {msg}"),
            Self::IoError(msg) => write!(f, "IO error: {msg}"),
            Self::Io(err) => write!(f, "IO error: {err}"),
            Self::ConfigError(msg) => write!(f, "Config error: {msg}"),
            Self::VisualizerError(msg) => write!(f, "Visualizer error: {msg}"),
        }
    }
}

impl std::error::Error for FlicError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for FlicError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<image::ImageError> for FlicError {
    fn from(err: image::ImageError) -> Self {
        Self::ImageError(err.to_string())
    }
}

impl From<ndarray::ShapeError> for FlicError {
    fn from(err: ndarray::ShapeError) -> Self {
        Self::ShapeMismatch(err.to_string())
    }
}

impl From<ndarray_npy::ReadNpzError> for FlicError {
    fn from(err: ndarray_npy::ReadNpzError) -> Self {
        Self::FormatError(err.to_string())
    }
}
