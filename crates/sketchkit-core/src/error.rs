//! Error handling for SketchKit
//!
//! Provides error types for the layers of the engine:
//! - Canvas errors (shape store / interaction related)
//! - Image errors (decode/load related)
//! - Export errors (performance CSV / snapshot I/O)
//!
//! All error types use `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Canvas error type
///
/// Represents errors raised by the shape store and the interaction
/// controller.
#[derive(Error, Debug, Clone)]
pub enum CanvasError {
    /// No shape with the given id exists in the store
    #[error("Shape {id} not found")]
    ShapeNotFound {
        /// The id that failed to resolve.
        id: u64,
    },

    /// A shape with the given id already exists in the store
    #[error("Shape {id} already exists")]
    DuplicateShape {
        /// The conflicting id.
        id: u64,
    },

    /// Shape geometry is not usable for the requested operation
    #[error("Invalid geometry for shape {id}: {reason}")]
    InvalidGeometry {
        /// The offending shape id.
        id: u64,
        /// Why the geometry was rejected.
        reason: String,
    },
}

/// Image error type
///
/// Represents errors raised while loading or decoding raster content.
#[derive(Error, Debug, Clone)]
pub enum ImageError {
    /// The image source could not be read
    #[error("Failed to read image source {url}: {reason}")]
    SourceUnavailable {
        /// The source the shape referenced.
        url: String,
        /// Why the read failed.
        reason: String,
    },

    /// The image bytes could not be decoded
    #[error("Failed to decode image {url}: {reason}")]
    DecodeFailed {
        /// The source the shape referenced.
        url: String,
        /// Why the decode failed.
        reason: String,
    },

    /// The decoded image carries no frames
    #[error("Image {url} decoded to zero frames")]
    EmptyImage {
        /// The source the shape referenced.
        url: String,
    },
}

/// Export error type
///
/// Represents errors raised while exporting performance samples or shape
/// snapshots.
#[derive(Error, Debug)]
pub enum ExportError {
    /// Writing the export stream failed
    #[error("Failed to write export: {0}")]
    Io(#[from] std::io::Error),

    /// Snapshot (de)serialization failed
    #[error("Snapshot serialization failed: {reason}")]
    Serialization {
        /// Why serialization failed.
        reason: String,
    },
}

/// Main error type for SketchKit
///
/// A unified error type that can represent any error from all layers.
/// This is the primary error type used in public APIs.
#[derive(Error, Debug)]
pub enum Error {
    /// Canvas error
    #[error(transparent)]
    Canvas(#[from] CanvasError),

    /// Image error
    #[error(transparent)]
    Image(#[from] ImageError),

    /// Export error
    #[error(transparent)]
    Export(#[from] ExportError),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an error from a string message
    pub fn other(msg: impl Into<String>) -> Self {
        Error::Other(msg.into())
    }

    /// Check if this is a canvas error
    pub fn is_canvas_error(&self) -> bool {
        matches!(self, Error::Canvas(_))
    }

    /// Check if this is an image error
    pub fn is_image_error(&self) -> bool {
        matches!(self, Error::Image(_))
    }
}

/// Result type using Error
pub type Result<T> = std::result::Result<T, Error>;
