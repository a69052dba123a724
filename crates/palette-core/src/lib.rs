//! # palette-core
//!
//! Color model and palette container for palette file conversion.
//!
//! This crate holds the format-independent pieces of the palette toolkit:
//!
//! - [`Color`] - a color in one of four spaces (RGB, CMYK, HSB, L*a*b*)
//!   with total conversions between all of them
//! - [`Palette`] - an ordered list of [`NamedColor`] entries with a typed
//!   metadata side-channel
//! - [`PaletteError`] - the single error taxonomy shared with the codecs
//!   in `palette-io`
//!
//! # Quick Start
//!
//! ```rust
//! use palette_core::{Palette, Rgb};
//!
//! let mut palette = Palette::new("Brand");
//! palette.add(Rgb::new(220, 20, 60), "Crimson");
//! palette.add(Rgb::new(255, 215, 0), "Gold");
//!
//! let cmyk = palette.convert_to_space("CMYK");
//! assert_eq!(cmyk.len(), 2);
//! ```
//!
//! # Conversions
//!
//! RGB <-> CMYK and RGB <-> HSB use the classical formulas; RGB <-> L*a*b*
//! goes through gamma-decoded sRGB and CIE XYZ under the D65 illuminant.
//! Conversions without a direct formula compose through RGB. Storage is
//! integer-quantized, so round-trips are close but not exact: +/-2 per RGB
//! channel through CMYK or HSB, +/-5 through L*a*b*.

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod color;
mod error;
mod meta;
mod palette;

pub use color::{Cmyk, Color, ColorSpace, Hsb, Lab, Rgb};
pub use error::{PaletteError, Result};
pub use meta::MetaValue;
pub use palette::{NamedColor, Palette};
