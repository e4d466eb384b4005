//! Error types for flexagon generation and export.

use thiserror::Error;

/// Result type for flexagon operations.
pub type FlexResult<T> = Result<T, FlexError>;

/// Errors that can occur while generating or exporting a flexagon.
#[derive(Debug, Error)]
pub enum FlexError {
    /// A generation parameter is outside its valid range.
    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter {
        /// Name of the offending parameter.
        name: &'static str,
        /// Why the value was rejected.
        reason: String,
    },

    /// More side slots were requested than there are palette colors.
    #[error("palette exhausted: requested {requested} sides, but only {available} colors exist")]
    PaletteExhausted {
        /// Number of slots requested.
        requested: usize,
        /// Number of colors in the palette.
        available: usize,
    },

    /// A generated strip failed its integrity check.
    #[error("generated mesh failed validation: {reason}")]
    MeshValidationFailure {
        /// The first problem found.
        reason: String,
    },

    /// I/O error while writing output files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A parameter file could not be parsed.
    #[error("invalid parameter file: {0}")]
    Config(#[from] toml::de::Error),

    /// JSON encoding failed.
    #[error("JSON encoding error: {0}")]
    Json(#[from] serde_json::Error),
}

impl FlexError {
    pub(crate) fn invalid_scale(scale: f32) -> Self {
        Self::InvalidParameter {
            name: "scale",
            reason: format!(
                "must be between {:e} and {:e}, got {scale}",
                crate::params::MIN_SCALE,
                crate::params::MAX_SCALE
            ),
        }
    }

    pub(crate) fn unsupported_sides(sides: usize) -> Self {
        Self::InvalidParameter {
            name: "sides",
            reason: format!("no fold-order table exists for {sides} sides (supported: 3, 6)"),
        }
    }
}
