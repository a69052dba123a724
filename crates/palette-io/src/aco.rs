//! Adobe Color Swatch (.aco) format support.
//!
//! Swatch files come in two versions. Version 1 is a bare list of
//! colors; version 2 repeats the same list with a name string appended to
//! each record. A v2 file is a complete v1 block immediately followed by
//! the v2 block, so old readers can stop after the first.
//!
//! # Format
//!
//! ```text
//! u16 version           (1 or 2)
//! u16 n
//! n x { u16 color space, 4 x u16 values }
//! -- version 2 only --
//! u16 version = 2
//! u16 n
//! n x { u16 color space, 4 x u16 values, UString name }
//! ```
//!
//! Values are fixed-point per color space: RGB channels occupy the high
//! byte (`0xff` stores as `0xff00`), HSB scales by 182/655, CMYK and Lab
//! by 100 (Lab a/b offset by 12800). Spot-catalog spaces (PANTONE,
//! FOCOLTONE, TRUMATCH, TOYO, HKS) carry an RGB approximation and are read
//! as RGB.

use crate::registry::{Exporter, Importer};
use crate::ustring;
use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use palette_core::{Cmyk, Color, Hsb, Lab, Palette, PaletteError, Result, Rgb};
use std::io::{Read, Write};
use tracing::debug;

/// Version 1: colors only.
pub const VERSION_1: u16 = 1;
/// Version 2: colors with names.
pub const VERSION_2: u16 = 2;

// Color space identifiers.
const SPACE_RGB: u16 = 0;
const SPACE_HSB: u16 = 1;
const SPACE_CMYK: u16 = 2;
const SPACE_PANTONE: u16 = 3;
const SPACE_FOCOLTONE: u16 = 4;
const SPACE_TRUMATCH: u16 = 5;
const SPACE_TOYO: u16 = 6;
const SPACE_LAB: u16 = 7;
const SPACE_GRAYSCALE: u16 = 8;
const SPACE_HKS: u16 = 10;

/// One swatch record as stored on disk.
#[derive(Debug, Clone)]
pub struct SwatchColor {
    /// Adobe color space identifier.
    pub space: u16,
    /// Four fixed-point values; unused slots are zero.
    pub values: [u16; 4],
    /// Color name; empty in v1 files.
    pub name: String,
}

/// Wire-level representation of a swatch file.
#[derive(Debug, Clone)]
pub struct ColorSwatch {
    /// Format version (1 or 2).
    pub version: u16,
    /// The swatch records.
    pub colors: Vec<SwatchColor>,
}

impl ColorSwatch {
    /// Parses a swatch file from a reader.
    pub fn read<R: Read + ?Sized>(r: &mut R) -> Result<Self> {
        let version = r.read_u16::<BigEndian>()?;
        if version != VERSION_1 && version != VERSION_2 {
            return Err(PaletteError::Format(format!(
                "color swatch version {version} not supported"
            )));
        }

        let num_colors = r.read_u16::<BigEndian>()?;
        debug!(version, num_colors, "parsed color swatch header");

        let mut colors = Vec::with_capacity(num_colors as usize);
        for _ in 0..num_colors {
            let (space, values) = read_record(r)?;
            colors.push(SwatchColor {
                space,
                values,
                name: String::new(),
            });
        }

        if version == VERSION_2 {
            // The v2 block repeats the header and every record, adding the
            // name string.
            let _ = r.read_u16::<BigEndian>()?;
            let num_colors_2 = r.read_u16::<BigEndian>()?;
            if num_colors_2 != num_colors {
                return Err(PaletteError::Format(format!(
                    "version 2 color count mismatch: expected {num_colors}, got {num_colors_2}"
                )));
            }

            for color in &mut colors {
                let (space, values) = read_record(r)?;
                color.space = space;
                color.values = values;
                color.name = ustring::read_string_nul(r)?;
            }
        }

        Ok(ColorSwatch { version, colors })
    }

    /// Writes the swatch file; v2 files get both blocks.
    pub fn write<W: Write + ?Sized>(&self, w: &mut W) -> Result<()> {
        w.write_u16::<BigEndian>(self.version)?;
        w.write_u16::<BigEndian>(self.colors.len() as u16)?;
        for color in &self.colors {
            write_record(w, color)?;
        }

        if self.version == VERSION_2 {
            w.write_u16::<BigEndian>(self.version)?;
            w.write_u16::<BigEndian>(self.colors.len() as u16)?;
            for color in &self.colors {
                write_record(w, color)?;
                ustring::write_string_nul(w, &color.name)?;
            }
        }

        Ok(())
    }
}

fn read_record<R: Read + ?Sized>(r: &mut R) -> Result<(u16, [u16; 4])> {
    let space = r.read_u16::<BigEndian>()?;
    let mut values = [0u16; 4];
    for v in &mut values {
        *v = r.read_u16::<BigEndian>()?;
    }
    Ok((space, values))
}

fn write_record<W: Write + ?Sized>(w: &mut W, color: &SwatchColor) -> Result<()> {
    w.write_u16::<BigEndian>(color.space)?;
    for v in color.values {
        w.write_u16::<BigEndian>(v)?;
    }
    Ok(())
}

/// Importer for Adobe Color Swatch files.
#[derive(Debug, Clone, Copy, Default)]
pub struct AcoImporter;

impl AcoImporter {
    /// Creates a new importer.
    pub fn new() -> Self {
        AcoImporter
    }
}

impl Importer for AcoImporter {
    fn import(&self, r: &mut dyn Read) -> Result<Palette> {
        let swatch = ColorSwatch::read(r)?;

        let name = if swatch.version == VERSION_2 {
            "Color Swatch (with names)"
        } else {
            "Color Swatch"
        };
        let mut palette = Palette::new(name);
        palette.set_metadata("version", swatch.version);
        palette.set_metadata("format", "Adobe Color Swatch");

        for (i, color) in swatch.colors.iter().enumerate() {
            let decoded = decode_swatch(color)?;
            let name = if color.name.is_empty() {
                format!("Color {}", i + 1)
            } else {
                color.name.clone()
            };
            palette.add(decoded, name);
        }

        Ok(palette)
    }

    fn can_import(&self, format: &str) -> bool {
        matches!(format, ".aco" | "colorswatch" | "swatch")
    }

    fn supported_formats(&self) -> &'static [&'static str] {
        &[".aco", "colorswatch", "swatch"]
    }
}

/// Exporter for Adobe Color Swatch files.
///
/// Each color is stored in the swatch space matching its own variant; no
/// cross-space conversion happens on export. Defaults to version 2; a
/// `version` metadata value of 1 or 2 overrides it.
#[derive(Debug, Clone, Copy)]
pub struct AcoExporter {
    /// Swatch version to write.
    pub version: u16,
}

impl AcoExporter {
    /// Creates an exporter writing version 2 (named) swatches.
    pub fn new() -> Self {
        AcoExporter { version: VERSION_2 }
    }

    /// Creates an exporter writing version 1 (nameless) swatches.
    pub fn v1() -> Self {
        AcoExporter { version: VERSION_1 }
    }
}

impl Default for AcoExporter {
    fn default() -> Self {
        AcoExporter::new()
    }
}

impl Exporter for AcoExporter {
    fn export(&self, palette: &Palette, w: &mut dyn Write) -> Result<()> {
        let version = palette
            .get_metadata("version")
            .and_then(|v| v.as_u16())
            .filter(|v| *v == VERSION_1 || *v == VERSION_2)
            .unwrap_or(self.version);

        let swatch = ColorSwatch {
            version,
            colors: palette
                .colors
                .iter()
                .map(|nc| {
                    let (space, values) = encode_swatch(&nc.color);
                    SwatchColor {
                        space,
                        values,
                        name: if version == VERSION_1 {
                            String::new()
                        } else {
                            nc.name.clone()
                        },
                    }
                })
                .collect(),
        };

        swatch.write(w)
    }

    fn can_export(&self, format: &str) -> bool {
        matches!(format, ".aco" | "colorswatch" | "swatch")
    }

    fn supported_formats(&self) -> &'static [&'static str] {
        &[".aco", "colorswatch", "swatch"]
    }
}

/// Decodes a swatch record into a kernel color.
///
/// Integer division mirrors the fixed-point scaling exactly, so reading
/// back a written value is lossless.
fn decode_swatch(color: &SwatchColor) -> Result<Color> {
    let v = color.values;
    match color.space {
        SPACE_RGB => Ok(Color::Rgb(Rgb::new(
            (v[0] >> 8) as u8,
            (v[1] >> 8) as u8,
            (v[2] >> 8) as u8,
        ))),

        SPACE_HSB => Ok(Color::Hsb(Hsb::new(
            v[0] / 182,
            (v[1] / 655) as u8,
            (v[2] / 655) as u8,
        ))),

        SPACE_CMYK => Ok(Color::Cmyk(Cmyk::new(
            (v[0] / 100) as u8,
            (v[1] / 100) as u8,
            (v[2] / 100) as u8,
            (v[3] / 100) as u8,
        ))),

        SPACE_LAB => Ok(Color::Lab(Lab::new(
            (v[0] / 100) as i8,
            ((i32::from(v[1]) - 12800) / 100) as i8,
            ((i32::from(v[2]) - 12800) / 100) as i8,
        ))),

        SPACE_GRAYSCALE => {
            let gray = (v[0] / 100) as u8;
            Ok(Color::Rgb(Rgb::new(gray, gray, gray)))
        }

        // Spot catalogs carry an RGB preview; colorimetry is out of scope.
        SPACE_PANTONE | SPACE_FOCOLTONE | SPACE_TRUMATCH | SPACE_TOYO | SPACE_HKS => {
            Ok(Color::Rgb(Rgb::new(
                (v[0] >> 8) as u8,
                (v[1] >> 8) as u8,
                (v[2] >> 8) as u8,
            )))
        }

        other => Err(PaletteError::Format(format!(
            "unknown color swatch color space: {other}"
        ))),
    }
}

/// Encodes a kernel color into the swatch space matching its variant.
fn encode_swatch(color: &Color) -> (u16, [u16; 4]) {
    match color {
        Color::Rgb(rgb) => (
            SPACE_RGB,
            [
                u16::from(rgb.r) << 8,
                u16::from(rgb.g) << 8,
                u16::from(rgb.b) << 8,
                0,
            ],
        ),
        Color::Hsb(hsb) => (
            SPACE_HSB,
            [hsb.h * 182, u16::from(hsb.s) * 655, u16::from(hsb.b) * 655, 0],
        ),
        Color::Cmyk(cmyk) => (
            SPACE_CMYK,
            [
                u16::from(cmyk.c) * 100,
                u16::from(cmyk.m) * 100,
                u16::from(cmyk.y) * 100,
                u16::from(cmyk.k) * 100,
            ],
        ),
        Color::Lab(lab) => (
            SPACE_LAB,
            [
                i32::from(lab.l) as u16 * 100,
                (i32::from(lab.a) * 100 + 12800) as u16,
                (i32::from(lab.b) * 100 + 12800) as u16,
                0,
            ],
        ),
    }
}
