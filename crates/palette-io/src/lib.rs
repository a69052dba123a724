//! # palette-io
//!
//! Palette I/O for the four interchange formats the toolkit speaks:
//!
//! - **ACB** - Adobe Color Book, Photoshop's binary swatch catalogs
//! - **ACO** - Adobe Color Swatch, v1 (bare) and v2 (named)
//! - **CSV** - color tables with auto-detected column layouts
//! - **JSON** - palette documents in three accepted shapes
//!
//! # Architecture
//!
//! Each format provides an importer and an exporter implementing the
//! [`Importer`]/[`Exporter`] traits. A [`Registry`] dispatches on
//! normalized format names (extensions, bare aliases, MIME types) and can
//! sniff a format from magic bytes. The default registry holds all four
//! codecs:
//!
//! ```rust
//! use palette_core::Rgb;
//! use palette_io::{export, import, Palette};
//!
//! let mut palette = Palette::new("Brand");
//! palette.add(Rgb::new(220, 20, 60), "Crimson");
//!
//! let mut buf = Vec::new();
//! export(&palette, &mut buf, ".json").unwrap();
//! let back = import(&mut buf.as_slice(), "json").unwrap();
//! assert_eq!(back.name, "Brand");
//! ```
//!
//! File-to-file conversion for front ends goes through
//! [`convert_file`]:
//!
//! ```rust,ignore
//! palette_io::convert_file("in.aco", "out.csv", "", "", "RGB", "")?;
//! ```
//!
//! # Error handling
//!
//! Codecs never partially succeed: the first invalid record aborts the
//! import and the palette under construction is dropped. The one
//! documented exception is the generic JSON object shape, which skips
//! values that are not colors.

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod acb;
pub mod aco;
mod convert;
pub mod csv;
pub mod json;
mod registry;
mod ustring;

pub use convert::{convert_file, detect_format, supported_formats, validate_color_space};
pub use registry::{export, import, normalize_format, Exporter, Importer, Registry};

// The container and error types travel with every codec signature.
pub use palette_core::{
    Cmyk, Color, ColorSpace, Hsb, Lab, MetaValue, NamedColor, Palette, PaletteError, Result, Rgb,
};
