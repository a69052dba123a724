//! CSV palette import/export.
//!
//! The importer auto-detects how colors are laid out from the first data
//! row (hex column, three integer columns for RGB, four for CMYK) and
//! accepts an optional name column at either end. The exporter writes any
//! of the six layouts with an optional header.
//!
//! Fields follow the usual double-quote convention: a field containing the
//! delimiter, a quote or a line break is wrapped in quotes, with embedded
//! quotes doubled. Lines are terminated with CRLF on export; both endings
//! are accepted on import.

use crate::registry::{Exporter, Importer};
use palette_core::{Cmyk, Color, Hsb, Lab, NamedColor, Palette, PaletteError, Result, Rgb};
use std::io::{Read, Write};
use tracing::debug;

/// Layout of the color columns in a CSV file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CsvColorFormat {
    /// Detect from the first data row.
    #[default]
    Auto,
    /// Three 0-255 integer columns.
    Rgb,
    /// Three 0.0-1.0 float columns.
    RgbFloat,
    /// One `#RRGGBB` column.
    Hex,
    /// Four 0-100 integer columns.
    Cmyk,
    /// Hue column plus two 0-100 columns.
    Hsb,
    /// Three signed integer columns.
    Lab,
}

impl CsvColorFormat {
    /// Canonical name, stored in palette metadata after detection.
    pub fn name(&self) -> &'static str {
        match self {
            CsvColorFormat::Auto => "Auto",
            CsvColorFormat::Rgb => "RGB",
            CsvColorFormat::RgbFloat => "RGBFloat",
            CsvColorFormat::Hex => "Hex",
            CsvColorFormat::Cmyk => "CMYK",
            CsvColorFormat::Hsb => "HSB",
            CsvColorFormat::Lab => "LAB",
        }
    }
}

/// Importer for CSV color tables.
#[derive(Debug, Clone)]
pub struct CsvImporter {
    /// Field delimiter.
    pub delimiter: char,
    /// Whether the first row is a header to skip.
    pub has_header: bool,
    /// Expected color layout.
    pub color_format: CsvColorFormat,
}

impl Default for CsvImporter {
    fn default() -> Self {
        CsvImporter {
            delimiter: ',',
            has_header: true,
            color_format: CsvColorFormat::Auto,
        }
    }
}

impl CsvImporter {
    /// Creates an importer with default settings (comma, header row,
    /// auto-detection).
    pub fn new() -> Self {
        CsvImporter::default()
    }
}

impl Importer for CsvImporter {
    fn import(&self, r: &mut dyn Read) -> Result<Palette> {
        let mut text = String::new();
        r.read_to_string(&mut text)?;

        let records = parse_records(&text, self.delimiter);
        if records.is_empty() {
            return Err(PaletteError::Format("CSV file is empty".to_string()));
        }

        let start_row = usize::from(self.has_header);
        if records.len() <= start_row {
            return Err(PaletteError::Format(
                "CSV file contains no data rows".to_string(),
            ));
        }

        let format = match self.color_format {
            CsvColorFormat::Auto => detect_format(&records[start_row]),
            other => other,
        };
        debug!(format = format.name(), rows = records.len(), "importing CSV");

        let mut palette = Palette::new("CSV Import");
        palette.set_metadata("format", "CSV");
        palette.set_metadata("color_format", format.name());

        for (row_index, record) in records.iter().enumerate().skip(start_row) {
            if record.iter().all(|f| f.trim().is_empty()) {
                continue;
            }

            let (name, color) = parse_row(record, format)
                .map_err(|detail| PaletteError::parse(format!("row {}", row_index + 1), detail))?;
            palette.add(color, name);
        }

        Ok(palette)
    }

    fn can_import(&self, format: &str) -> bool {
        format == ".csv"
    }

    fn supported_formats(&self) -> &'static [&'static str] {
        &[".csv"]
    }
}

/// Exporter for CSV color tables.
#[derive(Debug, Clone)]
pub struct CsvExporter {
    /// Field delimiter.
    pub delimiter: char,
    /// Whether to write a header row.
    pub include_header: bool,
    /// Color layout to write; `Auto` behaves like `Rgb`.
    pub color_format: CsvColorFormat,
}

impl Default for CsvExporter {
    fn default() -> Self {
        CsvExporter {
            delimiter: ',',
            include_header: true,
            color_format: CsvColorFormat::Rgb,
        }
    }
}

impl CsvExporter {
    /// Creates an exporter with default settings (comma, header, RGB).
    pub fn new() -> Self {
        CsvExporter::default()
    }

    fn header(&self) -> &'static [&'static str] {
        match self.color_format {
            CsvColorFormat::Hex => &["Name", "Hex"],
            CsvColorFormat::Cmyk => &["Name", "C", "M", "Y", "K"],
            CsvColorFormat::Hsb => &["Name", "H", "S", "B"],
            CsvColorFormat::Lab => &["Name", "L", "A", "B"],
            _ => &["Name", "R", "G", "B"],
        }
    }

    fn format_color(&self, nc: &NamedColor) -> Vec<String> {
        let name = if nc.name.is_empty() {
            nc.color.to_string()
        } else {
            nc.name.clone()
        };

        match self.color_format {
            CsvColorFormat::Hex => {
                vec![name, nc.color.to_rgb().hex()]
            }
            CsvColorFormat::RgbFloat => {
                let rgb = nc.color.to_rgb();
                vec![
                    name,
                    format!("{:.3}", f64::from(rgb.r) / 255.0),
                    format!("{:.3}", f64::from(rgb.g) / 255.0),
                    format!("{:.3}", f64::from(rgb.b) / 255.0),
                ]
            }
            CsvColorFormat::Cmyk => {
                let c = nc.color.to_cmyk();
                vec![
                    name,
                    c.c.to_string(),
                    c.m.to_string(),
                    c.y.to_string(),
                    c.k.to_string(),
                ]
            }
            CsvColorFormat::Hsb => {
                let h = nc.color.to_hsb();
                vec![name, h.h.to_string(), h.s.to_string(), h.b.to_string()]
            }
            CsvColorFormat::Lab => {
                let l = nc.color.to_lab();
                vec![name, l.l.to_string(), l.a.to_string(), l.b.to_string()]
            }
            _ => {
                let rgb = nc.color.to_rgb();
                vec![
                    name,
                    rgb.r.to_string(),
                    rgb.g.to_string(),
                    rgb.b.to_string(),
                ]
            }
        }
    }
}

impl Exporter for CsvExporter {
    fn export(&self, palette: &Palette, w: &mut dyn Write) -> Result<()> {
        if self.include_header {
            write_record(w, self.delimiter, self.header().iter().copied())?;
        }

        for nc in &palette.colors {
            let fields = self.format_color(nc);
            write_record(w, self.delimiter, fields.iter().map(String::as_str))?;
        }

        Ok(())
    }

    fn can_export(&self, format: &str) -> bool {
        format == ".csv"
    }

    fn supported_formats(&self) -> &'static [&'static str] {
        &[".csv"]
    }
}

/// Splits CSV text into records, honoring quoted fields. Blank lines are
/// skipped; a quoted field may span lines.
fn parse_records(text: &str, delimiter: char) -> Vec<Vec<String>> {
    let mut records = Vec::new();
    let mut record = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = text.chars().peekable();

    // True once the current record has any content, so a lone newline
    // doesn't produce an empty record.
    let mut started = false;

    while let Some(ch) = chars.next() {
        if in_quotes {
            if ch == '"' {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    field.push('"');
                } else {
                    in_quotes = false;
                }
            } else {
                field.push(ch);
            }
            continue;
        }

        match ch {
            '"' => {
                in_quotes = true;
                started = true;
            }
            c if c == delimiter => {
                record.push(std::mem::take(&mut field));
                started = true;
            }
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                if started || !field.is_empty() {
                    record.push(std::mem::take(&mut field));
                    records.push(std::mem::take(&mut record));
                }
                started = false;
            }
            '\n' => {
                if started || !field.is_empty() {
                    record.push(std::mem::take(&mut field));
                    records.push(std::mem::take(&mut record));
                }
                started = false;
            }
            _ => {
                field.push(ch);
                started = true;
            }
        }
    }

    if started || !field.is_empty() || !record.is_empty() {
        record.push(field);
        records.push(record);
    }

    records
}

fn write_record<'a, W: Write + ?Sized>(
    w: &mut W,
    delimiter: char,
    fields: impl Iterator<Item = &'a str>,
) -> Result<()> {
    let mut first = true;
    for field in fields {
        if !first {
            write!(w, "{delimiter}")?;
        }
        first = false;

        if field.contains(delimiter) || field.contains('"') || field.contains('\n') || field.contains('\r') {
            write!(w, "\"{}\"", field.replace('"', "\"\""))?;
        } else {
            write!(w, "{field}")?;
        }
    }
    write!(w, "\r\n")?;
    Ok(())
}

fn is_numeric(field: &str) -> bool {
    field.trim().parse::<f64>().is_ok()
}

/// Picks a color layout from a sample row: a `#` field means hex,
/// otherwise the numeric column count decides (3 = RGB, 4 = CMYK).
fn detect_format(record: &[String]) -> CsvColorFormat {
    if record
        .iter()
        .any(|f| f.trim().starts_with('#'))
    {
        return CsvColorFormat::Hex;
    }

    let numeric = record.iter().filter(|f| is_numeric(f)).count();
    match numeric {
        4 => CsvColorFormat::Cmyk,
        _ => CsvColorFormat::Rgb,
    }
}

type RowResult<T> = std::result::Result<T, String>;

/// Parses one record into a name and a color. The name is the first
/// column when non-numeric, or the last column when the record is wide
/// enough; a nameless color is named after its display form.
fn parse_row(record: &[String], format: CsvColorFormat) -> RowResult<(String, Color)> {
    if record.is_empty() {
        return Err("empty row".to_string());
    }

    let mut name = String::new();
    let mut data: &[String] = record;

    if !is_numeric(&record[0]) && !record[0].trim().starts_with('#') {
        name = record[0].trim().to_string();
        data = &record[1..];
    } else if record.len() > 3 && !is_numeric(&record[record.len() - 1]) {
        name = record[record.len() - 1].trim().to_string();
        data = &record[..record.len() - 1];
    }

    let color = parse_color(data, format)?;
    if name.is_empty() {
        name = color.to_string();
    }

    Ok((name, color))
}

fn parse_color(fields: &[String], format: CsvColorFormat) -> RowResult<Color> {
    match format {
        CsvColorFormat::Hex => parse_hex(fields),
        CsvColorFormat::Rgb => parse_rgb(fields),
        CsvColorFormat::RgbFloat => parse_rgb_float(fields),
        CsvColorFormat::Cmyk => parse_cmyk(fields),
        CsvColorFormat::Hsb => parse_hsb(fields),
        CsvColorFormat::Lab => parse_lab(fields),
        CsvColorFormat::Auto => Err("unresolved color format".to_string()),
    }
}

fn parse_hex(fields: &[String]) -> RowResult<Color> {
    let hex = fields
        .iter()
        .map(|f| f.trim())
        .find(|f| f.starts_with('#'))
        .ok_or_else(|| "no hex color found".to_string())?;

    Rgb::from_hex(hex)
        .map(Color::Rgb)
        .map_err(|e| e.to_string())
}

fn u8_field(fields: &[String], i: usize, what: &str) -> RowResult<u8> {
    fields[i]
        .trim()
        .parse::<u8>()
        .map_err(|_| format!("invalid {what} component: {}", fields[i].trim()))
}

fn parse_rgb(fields: &[String]) -> RowResult<Color> {
    if fields.len() < 3 {
        return Err(format!("insufficient RGB data: need 3 values, got {}", fields.len()));
    }
    Ok(Color::Rgb(Rgb::new(
        u8_field(fields, 0, "red")?,
        u8_field(fields, 1, "green")?,
        u8_field(fields, 2, "blue")?,
    )))
}

fn parse_rgb_float(fields: &[String]) -> RowResult<Color> {
    if fields.len() < 3 {
        return Err(format!("insufficient RGB data: need 3 values, got {}", fields.len()));
    }
    let f = |i: usize, what: &str| -> RowResult<f64> {
        fields[i]
            .trim()
            .parse::<f64>()
            .map_err(|_| format!("invalid {what} component: {}", fields[i].trim()))
    };
    Ok(Color::Rgb(Rgb::from_float(
        f(0, "red")?,
        f(1, "green")?,
        f(2, "blue")?,
    )))
}

fn parse_cmyk(fields: &[String]) -> RowResult<Color> {
    if fields.len() < 4 {
        return Err(format!("insufficient CMYK data: need 4 values, got {}", fields.len()));
    }
    Ok(Color::Cmyk(Cmyk::new(
        u8_field(fields, 0, "cyan")?,
        u8_field(fields, 1, "magenta")?,
        u8_field(fields, 2, "yellow")?,
        u8_field(fields, 3, "key")?,
    )))
}

fn parse_hsb(fields: &[String]) -> RowResult<Color> {
    if fields.len() < 3 {
        return Err(format!("insufficient HSB data: need 3 values, got {}", fields.len()));
    }
    let h = fields[0]
        .trim()
        .parse::<u16>()
        .map_err(|_| format!("invalid hue component: {}", fields[0].trim()))?;
    Ok(Color::Hsb(Hsb::new(
        h,
        u8_field(fields, 1, "saturation")?,
        u8_field(fields, 2, "brightness")?,
    )))
}

fn parse_lab(fields: &[String]) -> RowResult<Color> {
    if fields.len() < 3 {
        return Err(format!("insufficient LAB data: need 3 values, got {}", fields.len()));
    }
    let i8_field = |i: usize, what: &str| -> RowResult<i8> {
        fields[i]
            .trim()
            .parse::<i8>()
            .map_err(|_| format!("invalid {what} component: {}", fields[i].trim()))
    };
    Ok(Color::Lab(Lab::new(
        i8_field(0, "L")?,
        i8_field(1, "A")?,
        i8_field(2, "B")?,
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn import(text: &str) -> Result<Palette> {
        CsvImporter::new().import(&mut text.as_bytes())
    }

    #[test]
    fn named_rgb_rows() {
        let palette = import(
            "Name,R,G,B\nCrimson,220,20,60\nGold,255,215,0\nForest Green,34,139,34",
        )
        .unwrap();

        assert_eq!(palette.name, "CSV Import");
        assert_eq!(palette.len(), 3);
        assert_eq!(
            palette.get_metadata("color_format").unwrap().as_str(),
            Some("RGB")
        );

        let expected = [
            ("Crimson", Rgb::new(220, 20, 60)),
            ("Gold", Rgb::new(255, 215, 0)),
            ("Forest Green", Rgb::new(34, 139, 34)),
        ];
        for (i, (name, rgb)) in expected.iter().enumerate() {
            let nc = palette.get(i).unwrap();
            assert_eq!(nc.name, *name);
            assert_eq!(nc.color, Color::Rgb(*rgb));
        }
    }

    #[test]
    fn hex_export_is_byte_exact() {
        let mut palette = Palette::new("Primaries");
        palette.add(Rgb::new(255, 0, 0), "Red");
        palette.add(Rgb::new(255, 255, 0), "Yellow");
        palette.add(Rgb::new(0, 255, 0), "Green");

        let exporter = CsvExporter {
            color_format: CsvColorFormat::Hex,
            ..CsvExporter::default()
        };
        let mut buf = Vec::new();
        exporter.export(&palette, &mut buf).unwrap();

        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "Name,Hex\r\nRed,#FF0000\r\nYellow,#FFFF00\r\nGreen,#00FF00\r\n"
        );
    }

    #[test]
    fn auto_detects_hex_and_cmyk() {
        let hex = import("Name,Hex\nRed,#FF0000").unwrap();
        assert_eq!(
            hex.get_metadata("color_format").unwrap().as_str(),
            Some("Hex")
        );
        assert_eq!(hex.get(0).unwrap().color, Color::Rgb(Rgb::new(255, 0, 0)));

        let cmyk = import("Name,C,M,Y,K\nCyan,100,0,0,0").unwrap();
        assert_eq!(
            cmyk.get_metadata("color_format").unwrap().as_str(),
            Some("CMYK")
        );
        assert_eq!(
            cmyk.get(0).unwrap().color,
            Color::Cmyk(Cmyk::new(100, 0, 0, 0))
        );
    }

    #[test]
    fn name_at_the_end_of_wide_rows() {
        let palette = import("R,G,B,Name\n220,20,60,Crimson").unwrap();
        let nc = palette.get(0).unwrap();
        assert_eq!(nc.name, "Crimson");
        assert_eq!(nc.color, Color::Rgb(Rgb::new(220, 20, 60)));
    }

    #[test]
    fn nameless_rows_use_the_display_string() {
        let palette = import("R,G,B\n220,20,60").unwrap();
        assert_eq!(palette.get(0).unwrap().name, "RGB(220, 20, 60)");
    }

    #[test]
    fn quoted_fields_round_trip() {
        let palette = import("Name,R,G,B\n\"Red, deep\",120,10,10").unwrap();
        assert_eq!(palette.get(0).unwrap().name, "Red, deep");

        let mut buf = Vec::new();
        CsvExporter::new().export(&palette, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("\"Red, deep\",120,10,10\r\n"));
    }

    #[test]
    fn rgb_float_round_trip() {
        let mut palette = Palette::new("F");
        palette.add(Rgb::new(255, 128, 0), "Orange");

        let exporter = CsvExporter {
            color_format: CsvColorFormat::RgbFloat,
            ..CsvExporter::default()
        };
        let mut buf = Vec::new();
        exporter.export(&palette, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("Orange,1.000,0.502,0.000\r\n"));

        let importer = CsvImporter {
            color_format: CsvColorFormat::RgbFloat,
            ..CsvImporter::default()
        };
        let back = importer.import(&mut text.as_bytes()).unwrap();
        assert_eq!(back.get(0).unwrap().color, Color::Rgb(Rgb::new(255, 128, 0)));
    }

    #[test]
    fn alternate_delimiter() {
        let importer = CsvImporter {
            delimiter: ';',
            ..CsvImporter::default()
        };
        let palette = importer
            .import(&mut "Name;R;G;B\nRed;255;0;0".as_bytes())
            .unwrap();
        assert_eq!(palette.get(0).unwrap().color, Color::Rgb(Rgb::new(255, 0, 0)));
    }

    #[test]
    fn empty_and_header_only_files_fail() {
        assert!(matches!(import(""), Err(PaletteError::Format(_))));
        assert!(matches!(import("Name,R,G,B\n"), Err(PaletteError::Format(_))));
    }

    #[test]
    fn bad_rows_abort_with_the_row_number() {
        let err = import("Name,R,G,B\nRed,255,0,0\nBroken,256,0,0").unwrap_err();
        match err {
            PaletteError::Parse { location, detail } => {
                assert_eq!(location, "row 3");
                assert!(detail.contains("red"), "{detail}");
            }
            other => panic!("expected Parse, got {other:?}"),
        }
    }

    #[test]
    fn short_rows_are_rejected() {
        let err = import("Name,R,G,B\nRed,255,0").unwrap_err();
        assert!(matches!(err, PaletteError::Parse { .. }));
    }
}
