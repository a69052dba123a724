//! File-to-file palette conversion.
//!
//! This is the whole surface the CLI (and any other front end) depends
//! on: convert a file between formats, validate a color space name, and
//! look up a format from a path.

use crate::registry::{self, Registry};
use palette_core::{ColorSpace, PaletteError, Result};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use tracing::debug;

/// Converts a palette file from one format to another.
///
/// Empty `from_format`/`to_format` are inferred from the file extensions;
/// bare names get a leading dot. A non-empty `color_space` converts every
/// color (it must be one of RGB/CMYK/LAB/HSB). A non-empty `book_id`
/// applies when writing `.acb` and must parse into [4000, 65535].
pub fn convert_file(
    input_path: &str,
    output_path: &str,
    from_format: &str,
    to_format: &str,
    color_space: &str,
    book_id: &str,
) -> Result<()> {
    let mut from_format = if from_format.is_empty() {
        detect_format(input_path)
    } else {
        from_format.to_string()
    };
    let mut to_format = if to_format.is_empty() {
        detect_format(output_path)
    } else {
        to_format.to_string()
    };

    if !from_format.is_empty() && !from_format.starts_with('.') {
        from_format.insert(0, '.');
    }
    if !to_format.is_empty() && !to_format.starts_with('.') {
        to_format.insert(0, '.');
    }

    if from_format.is_empty() {
        return Err(PaletteError::Format(format!(
            "cannot detect input format from file: {input_path}"
        )));
    }
    if to_format.is_empty() {
        return Err(PaletteError::Format(format!(
            "cannot detect output format from file: {output_path}"
        )));
    }

    if !color_space.is_empty() {
        validate_color_space(color_space)?;
    }

    debug!(input_path, output_path, %from_format, %to_format, "converting palette file");

    let input = File::open(input_path)?;
    let mut reader = BufReader::new(input);
    let mut palette = registry::import(&mut reader, &from_format)?;

    if !color_space.is_empty() {
        palette = palette.convert_to_space(color_space);
    }

    if !book_id.is_empty() && registry::normalize_format(&to_format) == ".acb" {
        palette.set_metadata("book_id", parse_book_id(book_id)?);
    }

    let output = File::create(output_path)?;
    let mut writer = BufWriter::new(output);
    registry::export(&palette, &mut writer, &to_format)?;
    writer.flush()?;

    Ok(())
}

/// Checks a color space name against RGB/CMYK/LAB/HSB, case-insensitive.
/// The empty string is valid (no conversion requested).
pub fn validate_color_space(color_space: &str) -> Result<()> {
    if color_space.is_empty() {
        return Ok(());
    }
    color_space.parse::<ColorSpace>().map(|_| ())
}

/// Returns the extension of the path, or an empty string when it has
/// none.
pub fn detect_format(path: &str) -> String {
    Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{e}"))
        .unwrap_or_default()
}

/// File extensions of all built-in formats.
pub fn supported_formats() -> Vec<String> {
    Registry::global().list_supported_imports()
}

fn parse_book_id(book_id: &str) -> Result<u16> {
    let id: u32 = book_id
        .parse()
        .map_err(|_| PaletteError::InvalidBookId(book_id.to_string()))?;
    if !(4000..=65535).contains(&id) {
        return Err(PaletteError::InvalidBookId(book_id.to_string()));
    }
    Ok(id as u16)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_detection_from_paths() {
        assert_eq!(detect_format("colors.acb"), ".acb");
        assert_eq!(detect_format("dir/colors.ACO"), ".ACO");
        assert_eq!(detect_format("noext"), "");
    }

    #[test]
    fn color_space_validation() {
        assert!(validate_color_space("").is_ok());
        assert!(validate_color_space("rgb").is_ok());
        assert!(validate_color_space("CMYK").is_ok());
        assert!(matches!(
            validate_color_space("XYZ"),
            Err(PaletteError::UnknownColorSpace(_))
        ));
    }

    #[test]
    fn book_id_parsing() {
        assert_eq!(parse_book_id("4000").unwrap(), 4000);
        assert_eq!(parse_book_id("65535").unwrap(), 65535);
        assert!(matches!(
            parse_book_id("3999"),
            Err(PaletteError::InvalidBookId(_))
        ));
        assert!(parse_book_id("65536").is_err());
        assert!(parse_book_id("abc").is_err());
    }

    #[test]
    fn supported_formats_cover_the_builtins() {
        let formats = supported_formats();
        for ext in [".acb", ".aco", ".csv", ".json"] {
            assert!(formats.contains(&ext.to_string()));
        }
    }
}
