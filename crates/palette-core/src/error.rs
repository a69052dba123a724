//! Error types shared across the palette crates.
//!
//! One taxonomy covers the whole core: container operations, format codecs,
//! and the conversion front end all return [`PaletteError`].

use std::io;
use thiserror::Error;

/// Result type for palette operations.
pub type Result<T> = std::result::Result<T, PaletteError>;

/// Palette operation error.
#[derive(Debug, Error)]
pub enum PaletteError {
    /// Underlying reader/writer failure.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Malformed input: bad signature, unsupported version, truncation,
    /// bad UTF-16, unknown color type, unrecognized document shape.
    #[error("invalid file: {0}")]
    Format(String),

    /// A CSV row or JSON field could not be interpreted.
    #[error("parse error at {location}: {detail}")]
    Parse {
        /// Row number or JSON path of the offending value.
        location: String,
        /// What went wrong.
        detail: String,
    },

    /// Palette index outside the valid range.
    #[error("index {index} out of range [0, {len})")]
    OutOfRange {
        /// Requested index.
        index: usize,
        /// Number of colors in the palette.
        len: usize,
    },

    /// Palette name is empty.
    #[error("palette name cannot be empty")]
    NameEmpty,

    /// Two named colors share a name.
    #[error("duplicate color name: {0}")]
    DuplicateName(String),

    /// Color space name not one of RGB, CMYK, LAB, HSB.
    #[error("invalid color space: {0} (must be one of: RGB, CMYK, LAB, HSB)")]
    UnknownColorSpace(String),

    /// No codec registered for the format.
    #[error("unsupported format: {0}")]
    UnknownFormat(String),

    /// Book ID outside [4000, 65535] or not numeric.
    #[error("invalid book_id: {0} (must be a number between 4000-65535)")]
    InvalidBookId(String),
}

impl PaletteError {
    /// Builds a [`PaletteError::Parse`] from location and detail.
    pub fn parse(location: impl Into<String>, detail: impl Into<String>) -> Self {
        PaletteError::Parse {
            location: location.into(),
            detail: detail.into(),
        }
    }
}
