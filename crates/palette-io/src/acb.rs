//! Adobe Color Book (.acb) format support.
//!
//! Color books are the binary swatch libraries Photoshop ships its
//! PANTONE/FOCOLTONE/TOYO catalogs in. The format is big-endian
//! throughout, with length-prefixed UTF-16BE strings and one of three
//! component layouts selected by a book-level color type.
//!
//! # Format
//!
//! ```text
//! "8BCB"              signature
//! u16                 version (always 1)
//! u16                 book id
//! UString             title, prefix, postfix, description
//! u16                 number of colors
//! u16                 colors per page
//! u16                 key color page index
//! u16                 color type (0 = RGB, 2 = CMYK, 7 = Lab)
//! per color: UString name, 6-byte catalog key, 3 or 4 component bytes
//! optional 8-byte spot-function trailer ("spflspot" / "spflproc")
//! ```
//!
//! Component encodings are Adobe's own: CMYK bytes are inverted ink
//! (0 = 100%), Lab packs L scaled by 2.55 and a/b offset by 128.
//!
//! # Example
//!
//! ```rust,ignore
//! use palette_io::acb::AcbImporter;
//! use palette_io::Importer;
//!
//! let data = std::fs::read("FOCOLTONE.acb")?;
//! let palette = AcbImporter::new().import(&mut data.as_slice())?;
//! ```

use crate::registry::{Exporter, Importer};
use crate::ustring;
use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use palette_core::{Cmyk, Color, Lab, Palette, PaletteError, Result, Rgb};
use std::io::{Read, Write};
use tracing::debug;

/// File signature, also the sniffing magic.
pub const SIGNATURE: &[u8; 4] = b"8BCB";

/// The only version Photoshop has ever written.
pub const VERSION: u16 = 1;

/// Adobe reserves book IDs 3000-3022 for its shipped catalogs; generated
/// IDs start above the reserved block.
const GENERATED_ID_BASE: u32 = 4000;
const GENERATED_ID_SPAN: u32 = 65535 - GENERATED_ID_BASE;

/// Component layout of a color book.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorType {
    /// Three bytes, R/G/B in 0-255.
    Rgb,
    /// Four bytes of inverted ink coverage (0 = 100%, 255 = 0%).
    Cmyk,
    /// Three bytes: L scaled by 2.55, a and b offset by 128.
    Lab,
}

impl ColorType {
    /// Decodes the wire value.
    pub fn from_u16(v: u16) -> Result<Self> {
        match v {
            0 => Ok(ColorType::Rgb),
            2 => Ok(ColorType::Cmyk),
            7 => Ok(ColorType::Lab),
            other => Err(PaletteError::Format(format!(
                "unknown color book color type: {other}"
            ))),
        }
    }

    /// Wire value.
    pub fn as_u16(&self) -> u16 {
        match self {
            ColorType::Rgb => 0,
            ColorType::Cmyk => 2,
            ColorType::Lab => 7,
        }
    }

    /// Component bytes per color record.
    fn component_len(&self) -> usize {
        match self {
            ColorType::Cmyk => 4,
            ColorType::Rgb | ColorType::Lab => 3,
        }
    }

    /// Spot-function trailer appended after the color records.
    fn trailer(&self) -> &'static [u8; 8] {
        match self {
            ColorType::Lab => b"spflspot",
            ColorType::Rgb | ColorType::Cmyk => b"spflproc",
        }
    }
}

/// One color record as stored on disk.
#[derive(Debug, Clone)]
pub struct BookColor {
    /// Color name; may be empty.
    pub name: String,
    /// Six-byte catalog key (ASCII, space-padded).
    pub key: [u8; 6],
    /// Raw component bytes; only the first `component_len` are meaningful.
    pub components: [u8; 4],
}

/// Wire-level representation of a color book file.
#[derive(Debug, Clone)]
pub struct ColorBook {
    /// Book identifier.
    pub id: u16,
    /// Format version.
    pub version: u16,
    /// Book title.
    pub title: String,
    /// Name prefix Photoshop shows before each color.
    pub prefix: String,
    /// Name postfix.
    pub postfix: String,
    /// Book description.
    pub description: String,
    /// Colors shown per page in the picker.
    pub colors_per_page: u16,
    /// Index of the key color on each page.
    pub key_color_page: u16,
    /// Component layout.
    pub color_type: ColorType,
    /// The color records.
    pub colors: Vec<BookColor>,
}

impl ColorBook {
    /// Parses a color book from a reader.
    pub fn read<R: Read + ?Sized>(r: &mut R) -> Result<Self> {
        let mut signature = [0u8; 4];
        r.read_exact(&mut signature)?;
        if &signature != SIGNATURE {
            return Err(PaletteError::Format(
                "not an Adobe Color Book (bad signature)".to_string(),
            ));
        }

        let version = r.read_u16::<BigEndian>()?;
        if version != VERSION {
            return Err(PaletteError::Format(format!(
                "color book version {version} not supported"
            )));
        }

        let id = r.read_u16::<BigEndian>()?;
        let title = ustring::read_string(r)?;
        let prefix = ustring::read_string(r)?;
        let postfix = ustring::read_string(r)?;
        let description = ustring::read_string(r)?;

        let num_colors = r.read_u16::<BigEndian>()?;
        let colors_per_page = r.read_u16::<BigEndian>()?;
        let key_color_page = r.read_u16::<BigEndian>()?;
        let color_type = ColorType::from_u16(r.read_u16::<BigEndian>()?)?;

        debug!(id, %title, num_colors, ?color_type, "parsed color book header");

        let mut colors = Vec::with_capacity(num_colors as usize);
        for i in 0..num_colors {
            let name = ustring::read_string(r)?;

            let mut key = [0u8; 6];
            r.read_exact(&mut key).map_err(|e| {
                PaletteError::Format(format!("truncated key for color {i}: {e}"))
            })?;

            let mut components = [0u8; 4];
            r.read_exact(&mut components[..color_type.component_len()])
                .map_err(|e| {
                    PaletteError::Format(format!("truncated components for color {i}: {e}"))
                })?;

            colors.push(BookColor { name, key, components });
        }

        // Optional spot-function trailer; tolerated in any form, including
        // absence.
        let mut rest = Vec::new();
        r.take(8).read_to_end(&mut rest)?;
        if !rest.is_empty() {
            debug!(trailer = ?String::from_utf8_lossy(&rest), "color book trailer");
        }

        Ok(ColorBook {
            id,
            version,
            title,
            prefix,
            postfix,
            description,
            colors_per_page,
            key_color_page,
            color_type,
            colors,
        })
    }

    /// Writes the color book, including the spot-function trailer.
    pub fn write<W: Write + ?Sized>(&self, w: &mut W) -> Result<()> {
        w.write_all(SIGNATURE)?;
        w.write_u16::<BigEndian>(self.version)?;
        w.write_u16::<BigEndian>(self.id)?;
        ustring::write_string(w, &self.title)?;
        ustring::write_string(w, &self.prefix)?;
        ustring::write_string(w, &self.postfix)?;
        ustring::write_string(w, &self.description)?;

        w.write_u16::<BigEndian>(self.colors.len() as u16)?;
        w.write_u16::<BigEndian>(self.colors_per_page)?;
        w.write_u16::<BigEndian>(self.key_color_page)?;
        w.write_u16::<BigEndian>(self.color_type.as_u16())?;

        for color in &self.colors {
            ustring::write_string(w, &color.name)?;
            w.write_all(&color.key)?;
            w.write_all(&color.components[..self.color_type.component_len()])?;
        }

        w.write_all(self.color_type.trailer())?;
        Ok(())
    }
}

/// Importer for Adobe Color Book files.
#[derive(Debug, Clone, Copy, Default)]
pub struct AcbImporter;

impl AcbImporter {
    /// Creates a new importer.
    pub fn new() -> Self {
        AcbImporter
    }
}

impl Importer for AcbImporter {
    fn import(&self, r: &mut dyn Read) -> Result<Palette> {
        let book = ColorBook::read(r)?;

        let mut palette = Palette::new(book.title.clone());
        if !book.description.is_empty() {
            palette.description = Some(book.description.clone());
        }

        palette.set_metadata("book_id", book.id);
        palette.set_metadata("version", book.version);
        palette.set_metadata("prefix", book.prefix.clone());
        palette.set_metadata("postfix", book.postfix.clone());
        palette.set_metadata("colors_per_page", book.colors_per_page);
        palette.set_metadata("key_color_page", book.key_color_page);
        palette.set_metadata("color_type", book.color_type.as_u16());
        palette.set_metadata("format", "Adobe Color Book");

        for color in &book.colors {
            palette.add(decode_components(color.components, book.color_type), color.name.clone());
        }

        Ok(palette)
    }

    fn can_import(&self, format: &str) -> bool {
        matches!(format, ".acb" | "colorbook")
    }

    fn supported_formats(&self) -> &'static [&'static str] {
        &[".acb", "colorbook"]
    }
}

/// Exporter for Adobe Color Book files.
///
/// The target color type is taken from the palette's `color_type` metadata
/// and defaults to RGB; every color is converted through the kernel before
/// encoding. A missing `book_id` is derived deterministically from the
/// palette contents.
#[derive(Debug, Clone, Copy, Default)]
pub struct AcbExporter;

impl AcbExporter {
    /// Creates a new exporter.
    pub fn new() -> Self {
        AcbExporter
    }
}

impl Exporter for AcbExporter {
    fn export(&self, palette: &Palette, w: &mut dyn Write) -> Result<()> {
        let color_type = palette
            .get_metadata("color_type")
            .and_then(|v| v.as_u16())
            .and_then(|v| ColorType::from_u16(v).ok())
            .unwrap_or(ColorType::Rgb);

        let id = palette
            .get_metadata("book_id")
            .and_then(|v| v.as_u16())
            .unwrap_or_else(|| generate_book_id(palette));

        let book = ColorBook {
            id,
            version: palette
                .get_metadata("version")
                .and_then(|v| v.as_u16())
                .unwrap_or(VERSION),
            title: palette.name.clone(),
            prefix: palette
                .get_metadata("prefix")
                .and_then(|v| v.as_str())
                .unwrap_or_default()
                .to_string(),
            postfix: palette
                .get_metadata("postfix")
                .and_then(|v| v.as_str())
                .unwrap_or_default()
                .to_string(),
            description: palette.description.clone().unwrap_or_default(),
            colors_per_page: palette
                .get_metadata("colors_per_page")
                .and_then(|v| v.as_u16())
                .unwrap_or(0),
            key_color_page: palette
                .get_metadata("key_color_page")
                .and_then(|v| v.as_u16())
                .unwrap_or(0),
            color_type,
            colors: palette
                .colors
                .iter()
                .enumerate()
                .map(|(i, nc)| BookColor {
                    name: nc.name.clone(),
                    key: color_key(&nc.name, i),
                    components: encode_components(&nc.color, color_type),
                })
                .collect(),
        };

        book.write(w)
    }

    fn can_export(&self, format: &str) -> bool {
        matches!(format, ".acb" | "colorbook")
    }

    fn supported_formats(&self) -> &'static [&'static str] {
        &[".acb", "colorbook"]
    }
}

fn round(v: f64) -> f64 {
    v.round_ties_even()
}

/// Decodes raw component bytes into a kernel color.
fn decode_components(c: [u8; 4], color_type: ColorType) -> Color {
    match color_type {
        ColorType::Rgb => Color::Rgb(Rgb::new(c[0], c[1], c[2])),
        ColorType::Cmyk => {
            // 0 is full ink, 255 is none.
            let pct = |b: u8| round(f64::from(255 - b) / 2.55) as u8;
            Color::Cmyk(Cmyk::new(pct(c[0]), pct(c[1]), pct(c[2]), pct(c[3])))
        }
        ColorType::Lab => Color::Lab(Lab::new(
            round(f64::from(c[0]) / 2.55) as i8,
            (i16::from(c[1]) - 128) as i8,
            (i16::from(c[2]) - 128) as i8,
        )),
    }
}

/// Encodes a kernel color into the book's component layout, converting the
/// color space first.
fn encode_components(color: &Color, color_type: ColorType) -> [u8; 4] {
    match color_type {
        ColorType::Rgb => {
            let rgb = color.to_rgb();
            [rgb.r, rgb.g, rgb.b, 0]
        }
        ColorType::Cmyk => {
            let cmyk = color.to_cmyk();
            let ink = |pct: u8| round(255.0 - f64::from(pct) * 2.55) as u8;
            [ink(cmyk.c), ink(cmyk.m), ink(cmyk.y), ink(cmyk.k)]
        }
        ColorType::Lab => {
            let lab = color.to_lab();
            [
                round(f64::from(lab.l) * 2.55) as u8,
                (i16::from(lab.a) + 128) as u8,
                (i16::from(lab.b) + 128) as u8,
                0,
            ]
        }
    }
}

/// Builds the 6-byte catalog key: first three letters of the name
/// (upper-cased, space-padded) followed by the index modulo 1000.
fn color_key(name: &str, index: usize) -> [u8; 6] {
    let prefix: String = name.chars().flat_map(char::to_uppercase).take(3).collect();
    let formatted = format!("{:<3}{:03}", prefix, index % 1000);

    let mut key = [b' '; 6];
    for (dst, src) in key.iter_mut().zip(formatted.bytes()) {
        *dst = src;
    }
    key
}

/// Derives a deterministic book ID for palettes that never had one:
/// FNV-1a over the name, the color count and the first color's name,
/// mapped into [4000, 65534] to stay clear of Adobe's reserved block.
fn generate_book_id(palette: &Palette) -> u16 {
    const FNV_OFFSET: u32 = 0x811c9dc5;
    const FNV_PRIME: u32 = 0x01000193;

    let mut hash = FNV_OFFSET;
    let mut feed = |bytes: &[u8]| {
        for &b in bytes {
            hash ^= u32::from(b);
            hash = hash.wrapping_mul(FNV_PRIME);
        }
    };

    feed(palette.name.as_bytes());
    feed(format!(":{}:", palette.len()).as_bytes());
    if let Ok(first) = palette.get(0) {
        feed(first.name.as_bytes());
    }

    (GENERATED_ID_BASE + hash % GENERATED_ID_SPAN) as u16
}
