//! Error taxonomy shared by the engine, the scene and the exporters.

use crate::types::BlockId;
use std::path::PathBuf;

/// Convenience result type used across the crate.
pub type FlowResult<T> = Result<T, FlowError>;

/// Errors surfaced by scene construction, rendering and frame export.
///
/// Purely visual degeneracies (zero-length tangents, zero spark counts) are
/// never errors; they simply draw nothing.
#[derive(thiserror::Error, Debug)]
pub enum FlowError {
    /// An edge token other than `top`, `right`, `bottom` or `left`.
    #[error("invalid edge `{0}`: expected one of top, right, bottom, left")]
    InvalidEdge(String),

    /// A block was created with a non-positive or non-finite size.
    #[error("invalid block size {width}x{height}: width and height must be positive")]
    InvalidDimensions {
        /// Requested width
        width: f32,
        /// Requested height
        height: f32,
    },

    /// A connection references a block that is not in the scene.
    #[error("connection references unknown block {0}")]
    UnknownBlock(BlockId),

    /// A connection names a palette color the style does not define.
    #[error("unknown palette color `{0}`")]
    UnknownColor(String),

    /// The style configuration could not be parsed.
    #[error("invalid style configuration: {0}")]
    Style(String),

    /// A frame could not be rasterized.
    #[error("failed to render frame: {0}")]
    Render(String),

    /// Writing an exported frame failed.
    #[error("failed to export frame to {path}: {message}")]
    Export {
        /// Destination of the frame
        path: PathBuf,
        /// Underlying cause
        message: String,
    },

    /// Wrapped IO failure.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// The native window could not be created or crashed.
    #[error(transparent)]
    Window(#[from] eframe::Error),
}

impl FlowError {
    /// Build a [`FlowError::Export`] value.
    pub fn export(path: impl Into<PathBuf>, message: impl ToString) -> Self {
        Self::Export {
            path: path.into(),
            message: message.to_string(),
        }
    }
}
