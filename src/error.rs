//! Error types for the viewer pipeline.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur across the viewer pipeline.
#[derive(Error, Debug)]
pub enum ViewerError {
    /// A configured file or directory does not exist
    #[error("not found: {path:?}")]
    NotFound {
        /// The missing path
        path: PathBuf,
    },

    /// A required column header is absent from the class specification
    #[error("missing required column '{column}' in class specification")]
    Schema {
        /// Name of the missing column
        column: &'static str,
    },

    /// Unparseable class color or specification row
    #[error("invalid format: {message}")]
    Format {
        /// Description of the parse failure
        message: String,
    },

    /// A raster could not be opened or decoded
    #[error("failed to decode {path:?}: {source}")]
    Decode {
        /// The unreadable raster
        path: PathBuf,
        /// Error reported by the image backend
        source: image::ImageError,
    },

    /// Image and label rasters differ in pixel dimensions
    #[error(
        "dimension mismatch: image is {image_width}x{image_height}, label is {label_width}x{label_height}"
    )]
    DimensionMismatch {
        /// Width of the raw image
        image_width: u32,
        /// Height of the raw image
        image_height: u32,
        /// Width of the label raster
        label_width: u32,
        /// Height of the label raster
        label_height: u32,
    },

    /// Image and label trees could not be paired one-to-one by stem
    #[error(
        "unpaired dataset entries: {images} image(s) without a label, {labels} label(s) without an image",
        images = .images_only.len(),
        labels = .labels_only.len()
    )]
    UnpairedStems {
        /// Image files whose stem has no counterpart under the label root
        images_only: Vec<PathBuf>,
        /// Label files whose stem has no counterpart under the image root
        labels_only: Vec<PathBuf>,
    },

    /// Two files in the same tree share a pairing stem
    #[error("ambiguous stem '{stem}': both {first:?} and {second:?}")]
    DuplicateStem {
        /// The stem claimed by both files
        stem: String,
        /// First claimant
        first: PathBuf,
        /// Second claimant
        second: PathBuf,
    },

    /// I/O error during file operations
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization or deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ViewerError {
    /// Create a not-found error for a path.
    pub fn not_found(path: impl Into<PathBuf>) -> Self {
        Self::NotFound { path: path.into() }
    }

    /// Create a format error with a message.
    pub fn format(message: impl Into<String>) -> Self {
        Self::Format {
            message: message.into(),
        }
    }

    /// Create a decode error for a path.
    pub fn decode(path: &Path, source: image::ImageError) -> Self {
        Self::Decode {
            path: path.to_path_buf(),
            source,
        }
    }
}
