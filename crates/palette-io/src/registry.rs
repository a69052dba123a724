//! Format registry for palette importers and exporters.
//!
//! The registry dispatches by normalized format name (extension, bare
//! alias or MIME type) and can sniff a format from leading magic bytes.
//!
//! # Example
//!
//! ```rust,ignore
//! use palette_io::Registry;
//!
//! let registry = Registry::global();
//! let palette = registry.import_from(&mut reader, "acb")?;
//! registry.export_to(&palette, &mut writer, ".json")?;
//! ```

use crate::{acb, aco, csv, json};
use palette_core::{Palette, PaletteError, Result};
use std::io::{Read, Write};
use std::sync::OnceLock;

/// Reads palettes from one format family.
///
/// Implementations are stateless apart from their configuration fields;
/// a shared importer can be used from any thread.
pub trait Importer: Send + Sync {
    /// Reads a palette from the reader.
    fn import(&self, r: &mut dyn Read) -> Result<Palette>;

    /// True if this importer handles the (normalized) format name.
    fn can_import(&self, format: &str) -> bool;

    /// Format names this importer answers to.
    fn supported_formats(&self) -> &'static [&'static str];
}

/// Writes palettes into one format family.
pub trait Exporter: Send + Sync {
    /// Writes the palette to the writer.
    fn export(&self, palette: &Palette, w: &mut dyn Write) -> Result<()>;

    /// True if this exporter handles the (normalized) format name.
    fn can_export(&self, format: &str) -> bool;

    /// Format names this exporter answers to.
    fn supported_formats(&self) -> &'static [&'static str];
}

/// Registry of importers and exporters, dispatching by format name.
#[derive(Default)]
pub struct Registry {
    importers: Vec<Box<dyn Importer>>,
    exporters: Vec<Box<dyn Exporter>>,
}

impl Registry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Registry::default()
    }

    /// Creates a registry with all four built-in codecs registered.
    pub fn with_builtin_formats() -> Self {
        let mut registry = Registry::new();

        registry.register_importer(acb::AcbImporter::new());
        registry.register_exporter(acb::AcbExporter::new());

        registry.register_importer(aco::AcoImporter::new());
        registry.register_exporter(aco::AcoExporter::new());

        registry.register_importer(csv::CsvImporter::new());
        registry.register_exporter(csv::CsvExporter::new());

        registry.register_importer(json::JsonImporter::new());
        registry.register_exporter(json::JsonExporter::new());

        registry
    }

    /// Returns the shared default registry, populated once at first use.
    pub fn global() -> &'static Registry {
        static INSTANCE: OnceLock<Registry> = OnceLock::new();
        INSTANCE.get_or_init(Registry::with_builtin_formats)
    }

    /// Adds an importer.
    pub fn register_importer(&mut self, importer: impl Importer + 'static) {
        self.importers.push(Box::new(importer));
    }

    /// Adds an exporter.
    pub fn register_exporter(&mut self, exporter: impl Exporter + 'static) {
        self.exporters.push(Box::new(exporter));
    }

    /// Finds an importer for the format.
    pub fn find_importer(&self, format: &str) -> Result<&dyn Importer> {
        let normalized = normalize_format(format);
        self.importers
            .iter()
            .map(Box::as_ref)
            .find(|i| i.can_import(&normalized))
            .ok_or_else(|| PaletteError::UnknownFormat(format.to_string()))
    }

    /// Finds an exporter for the format.
    pub fn find_exporter(&self, format: &str) -> Result<&dyn Exporter> {
        let normalized = normalize_format(format);
        self.exporters
            .iter()
            .map(Box::as_ref)
            .find(|e| e.can_export(&normalized))
            .ok_or_else(|| PaletteError::UnknownFormat(format.to_string()))
    }

    /// Imports a palette using the importer registered for `format`.
    pub fn import_from(&self, reader: &mut dyn Read, format: &str) -> Result<Palette> {
        self.find_importer(format)?.import(reader)
    }

    /// Exports a palette using the exporter registered for `format`.
    pub fn export_to(&self, palette: &Palette, writer: &mut dyn Write, format: &str) -> Result<()> {
        self.find_exporter(format)?.export(palette, writer)
    }

    /// Lists all import formats, normalized and deduplicated.
    pub fn list_supported_imports(&self) -> Vec<String> {
        dedup_formats(self.importers.iter().flat_map(|i| i.supported_formats()))
    }

    /// Lists all export formats, normalized and deduplicated.
    pub fn list_supported_exports(&self) -> Vec<String> {
        dedup_formats(self.exporters.iter().flat_map(|e| e.supported_formats()))
    }

    /// Sniffs the format from up to 16 leading bytes of content.
    ///
    /// `8BCB` means a color book, a `{` or `[` means JSON, a comma in the
    /// first line means CSV. The bytes are consumed from the reader.
    pub fn autodetect(&self, reader: &mut dyn Read) -> Result<String> {
        let mut header = [0u8; 16];
        let mut n = 0;
        // A single read may return short; fill as far as the source allows.
        loop {
            let read = reader.read(&mut header[n..])?;
            if read == 0 {
                break;
            }
            n += read;
            if n == header.len() {
                break;
            }
        }

        if n < 4 {
            return Err(PaletteError::Format(
                "insufficient data to detect format".to_string(),
            ));
        }

        if &header[..4] == acb::SIGNATURE {
            return Ok(".acb".to_string());
        }
        if header[0] == b'{' || header[0] == b'[' {
            return Ok(".json".to_string());
        }

        let text = String::from_utf8_lossy(&header[..n]);
        if text.lines().next().is_some_and(|line| line.contains(',')) {
            return Ok(".csv".to_string());
        }

        Err(PaletteError::Format(
            "unable to detect format from content".to_string(),
        ))
    }
}

fn dedup_formats<'a>(formats: impl Iterator<Item = &'a &'a str>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    let mut out = Vec::new();
    for format in formats {
        let normalized = normalize_format(format);
        if seen.insert(normalized.clone()) {
            out.push(normalized);
        }
    }
    out
}

/// Normalizes a format name: lowercased and trimmed, with known bare
/// aliases and MIME types mapped to their dot extension. Unknown names
/// pass through unchanged.
pub fn normalize_format(format: &str) -> String {
    let format = format.trim().to_lowercase();

    if format.starts_with('.') {
        return format;
    }

    match format.as_str() {
        "acb" | "colorbook" => ".acb".to_string(),
        "aco" | "colorswatch" | "swatch" => ".aco".to_string(),
        "csv" | "text/csv" => ".csv".to_string(),
        "json" | "application/json" => ".json".to_string(),
        _ => format,
    }
}

/// Imports a palette with the default registry.
pub fn import(reader: &mut dyn Read, format: &str) -> Result<Palette> {
    Registry::global().import_from(reader, format)
}

/// Exports a palette with the default registry.
pub fn export(palette: &Palette, writer: &mut dyn Write, format: &str) -> Result<()> {
    Registry::global().export_to(palette, writer, format)
}

#[cfg(test)]
mod tests {
    use super::*;
    use palette_core::Rgb;

    #[test]
    fn normalization() {
        assert_eq!(normalize_format(" ACB "), ".acb");
        assert_eq!(normalize_format("colorbook"), ".acb");
        assert_eq!(normalize_format("swatch"), ".aco");
        assert_eq!(normalize_format("application/json"), ".json");
        assert_eq!(normalize_format("text/csv"), ".csv");
        assert_eq!(normalize_format(".JSON"), ".json");
        assert_eq!(normalize_format("xyz"), "xyz");
    }

    #[test]
    fn global_registry_has_all_formats() {
        let registry = Registry::global();

        let imports = registry.list_supported_imports();
        for ext in [".acb", ".aco", ".csv", ".json"] {
            assert!(imports.contains(&ext.to_string()), "missing {ext}");
            assert!(registry.find_importer(ext).is_ok());
            assert!(registry.find_exporter(ext).is_ok());
        }

        // Aliases resolve to the same codecs.
        assert!(registry.find_importer("colorswatch").is_ok());
        assert!(registry.find_exporter("application/json").is_ok());
    }

    #[test]
    fn unknown_format_is_an_error() {
        let registry = Registry::global();
        assert!(matches!(
            registry.find_importer(".xyz"),
            Err(PaletteError::UnknownFormat(_))
        ));
        assert!(matches!(
            registry.find_exporter("image/png"),
            Err(PaletteError::UnknownFormat(_))
        ));
    }

    #[test]
    fn import_export_through_the_registry() {
        let mut palette = Palette::new("Via Registry");
        palette.add(Rgb::new(10, 20, 30), "Slate");

        let mut buf = Vec::new();
        export(&palette, &mut buf, "json").unwrap();

        let imported = import(&mut buf.as_slice(), ".json").unwrap();
        assert_eq!(imported.name, "Via Registry");
        assert_eq!(imported.len(), 1);
    }

    #[test]
    fn autodetect_by_magic() {
        let registry = Registry::global();

        let acb = b"8BCB\x00\x01\x0b\xb8 more bytes";
        assert_eq!(registry.autodetect(&mut &acb[..]).unwrap(), ".acb");

        let json = br#"{"name": "x"}"#;
        assert_eq!(registry.autodetect(&mut &json[..]).unwrap(), ".json");

        let json_array = br##"[{"hex": "#000000"}]"##;
        assert_eq!(registry.autodetect(&mut &json_array[..]).unwrap(), ".json");

        let csv = b"name,r,g,b\nRed,255,0,0\n";
        assert_eq!(registry.autodetect(&mut &csv[..]).unwrap(), ".csv");
    }

    #[test]
    fn autodetect_failures() {
        let registry = Registry::global();

        let tiny = b"ab";
        assert!(registry.autodetect(&mut &tiny[..]).is_err());

        let opaque = b"PK\x03\x04 not a palette";
        assert!(registry.autodetect(&mut &opaque[..]).is_err());
    }

    #[test]
    fn custom_registry_is_independent() {
        let registry = Registry::new();
        assert!(registry.list_supported_imports().is_empty());
        assert!(registry.find_importer(".csv").is_err());
    }
}
