//! JSON palette import/export.
//!
//! The importer accepts three document shapes, tried in order:
//!
//! 1. a palette object (`{"name": ..., "colors": [...]}`),
//! 2. a bare array of color objects,
//! 3. a generic object whose values look like colors (hex strings or
//!    numeric triples); anything else in it is silently skipped.
//!
//! Each color object may carry several representations at once; the
//! importer picks one with the precedence RGB > hex > CMYK > HSB > LAB >
//! raw `values`. The exporter always writes the color's own space label
//! and appends the representations selected by a [`JsonColorFormat`]
//! mask.

use crate::registry::{Exporter, Importer};
use bitflags::bitflags;
use palette_core::{
    Cmyk, Color, Hsb, Lab, MetaValue, NamedColor, Palette, PaletteError, Result, Rgb,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::io::{Read, Write};
use tracing::debug;

bitflags! {
    /// Which color representations the exporter writes per color.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct JsonColorFormat: u32 {
        /// Include an `rgb` object.
        const RGB = 1 << 0;
        /// Include an upper-case `#RRGGBB` hex string.
        const HEX = 1 << 1;
        /// Include a `cmyk` object.
        const CMYK = 1 << 2;
        /// Include an `hsb` object.
        const HSB = 1 << 3;
        /// Include a `lab` object.
        const LAB = 1 << 4;
    }
}

impl Default for JsonColorFormat {
    fn default() -> Self {
        JsonColorFormat::RGB | JsonColorFormat::HEX
    }
}

/// JSON document shape for a complete palette.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PaletteJson {
    /// Palette name; required (non-empty) for this shape to match.
    #[serde(default)]
    pub name: String,
    /// Optional description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// The colors.
    #[serde(default)]
    pub colors: Vec<ColorJson>,
    /// Free-form metadata block, preserved through round-trips.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
}

/// JSON document shape for one color.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ColorJson {
    /// Color name.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    /// Color space label (`"RGB"`, `"CMYK"`, ...).
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub color_space: String,
    /// RGB representation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rgb: Option<RgbValues>,
    /// CMYK representation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cmyk: Option<CmykValues>,
    /// HSB representation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hsb: Option<HsbValues>,
    /// LAB representation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lab: Option<LabValues>,
    /// Hex representation.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub hex: String,
    /// Raw component values, interpreted under `color_space`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub values: Option<Vec<f64>>,
}

/// RGB channel values.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RgbValues {
    /// Red, 0-255.
    pub r: u8,
    /// Green, 0-255.
    pub g: u8,
    /// Blue, 0-255.
    pub b: u8,
}

/// CMYK channel values.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CmykValues {
    /// Cyan percentage.
    pub c: u8,
    /// Magenta percentage.
    pub m: u8,
    /// Yellow percentage.
    pub y: u8,
    /// Key percentage.
    pub k: u8,
}

/// HSB channel values.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct HsbValues {
    /// Hue in degrees.
    pub h: u16,
    /// Saturation percentage.
    pub s: u8,
    /// Brightness percentage.
    pub b: u8,
}

/// LAB channel values.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct LabValues {
    /// Lightness.
    pub l: i8,
    /// Green-red axis.
    pub a: i8,
    /// Blue-yellow axis.
    pub b: i8,
}

/// Importer for JSON palette documents.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonImporter;

impl JsonImporter {
    /// Creates a new importer.
    pub fn new() -> Self {
        JsonImporter
    }
}

impl Importer for JsonImporter {
    fn import(&self, r: &mut dyn Read) -> Result<Palette> {
        let mut data = Vec::new();
        r.read_to_end(&mut data)?;

        if let Ok(doc) = serde_json::from_slice::<PaletteJson>(&data) {
            if !doc.name.is_empty() {
                debug!(name = %doc.name, "importing JSON palette object");
                return convert_palette_json(doc);
            }
        }

        if let Ok(colors) = serde_json::from_slice::<Vec<ColorJson>>(&data) {
            if !colors.is_empty() {
                debug!(count = colors.len(), "importing JSON color array");
                return convert_color_array(colors);
            }
        }

        if let Ok(obj) = serde_json::from_slice::<serde_json::Map<String, Value>>(&data) {
            return convert_generic(obj);
        }

        Err(PaletteError::Format(
            "unable to parse JSON as palette data".to_string(),
        ))
    }

    fn can_import(&self, format: &str) -> bool {
        format == ".json"
    }

    fn supported_formats(&self) -> &'static [&'static str] {
        &[".json"]
    }
}

fn convert_palette_json(doc: PaletteJson) -> Result<Palette> {
    let mut palette = Palette::new(doc.name);
    palette.description = doc.description;
    palette.set_metadata("format", "JSON");
    if let Some(metadata) = doc.metadata {
        palette.set_metadata("original_metadata", value_to_meta(&metadata));
    }

    add_colors(&mut palette, doc.colors)?;
    Ok(palette)
}

fn convert_color_array(colors: Vec<ColorJson>) -> Result<Palette> {
    let mut palette = Palette::new("JSON Color Array");
    palette.set_metadata("format", "JSON");
    add_colors(&mut palette, colors)?;
    Ok(palette)
}

fn add_colors(palette: &mut Palette, colors: Vec<ColorJson>) -> Result<()> {
    for (i, color_json) in colors.into_iter().enumerate() {
        let color = convert_color_json(&color_json, i)?;
        let name = if color_json.name.is_empty() {
            format!("Color {}", i + 1)
        } else {
            color_json.name
        };
        palette.add(color, name);
    }
    Ok(())
}

/// Generic object shape: every value that looks like a color becomes an
/// entry named after its key; everything else is skipped. This is the one
/// place a codec recovers instead of aborting.
fn convert_generic(obj: serde_json::Map<String, Value>) -> Result<Palette> {
    let mut palette = Palette::new("JSON Import");
    palette.set_metadata("format", "JSON");

    for (key, value) in &obj {
        if let Some(color) = try_parse_color_value(value) {
            palette.add(color, key.clone());
        }
    }

    if palette.is_empty() {
        return Err(PaletteError::Format(
            "no recognizable color data found in JSON".to_string(),
        ));
    }

    Ok(palette)
}

/// Picks a color out of a [`ColorJson`] by representation precedence.
fn convert_color_json(data: &ColorJson, index: usize) -> Result<Color> {
    if let Some(rgb) = &data.rgb {
        return Ok(Color::Rgb(Rgb::new(rgb.r, rgb.g, rgb.b)));
    }

    if !data.hex.is_empty() {
        return Rgb::from_hex(&data.hex).map(Color::Rgb);
    }

    if let Some(cmyk) = &data.cmyk {
        return Ok(Color::Cmyk(Cmyk::new(cmyk.c, cmyk.m, cmyk.y, cmyk.k)));
    }

    if let Some(hsb) = &data.hsb {
        return Ok(Color::Hsb(Hsb::new(hsb.h, hsb.s, hsb.b)));
    }

    if let Some(lab) = &data.lab {
        return Ok(Color::Lab(Lab::new(lab.l, lab.a, lab.b)));
    }

    if let Some(values) = &data.values {
        return parse_values(values, &data.color_space, index);
    }

    Err(PaletteError::parse(
        format!("colors[{index}]"),
        "no valid color data found",
    ))
}

fn parse_values(values: &[f64], color_space: &str, index: usize) -> Result<Color> {
    let location = || format!("colors[{index}]");
    let need = |n: usize| -> Result<()> {
        if values.len() < n {
            Err(PaletteError::parse(
                location(),
                format!("insufficient {} values", color_space.to_uppercase()),
            ))
        } else {
            Ok(())
        }
    };

    match color_space.to_ascii_uppercase().as_str() {
        "RGB" => {
            need(3)?;
            Ok(Color::Rgb(Rgb::new(values[0] as u8, values[1] as u8, values[2] as u8)))
        }
        "CMYK" => {
            need(4)?;
            Ok(Color::Cmyk(Cmyk::new(
                values[0] as u8,
                values[1] as u8,
                values[2] as u8,
                values[3] as u8,
            )))
        }
        "HSB" | "HSV" => {
            need(3)?;
            Ok(Color::Hsb(Hsb::new(
                values[0] as u16,
                values[1] as u8,
                values[2] as u8,
            )))
        }
        "LAB" => {
            need(3)?;
            Ok(Color::Lab(Lab::new(
                values[0] as i8,
                values[1] as i8,
                values[2] as i8,
            )))
        }
        // No color space tag: three or more numbers read as RGB.
        _ if values.len() >= 3 => Ok(Color::Rgb(Rgb::new(
            values[0] as u8,
            values[1] as u8,
            values[2] as u8,
        ))),
        _ => Err(PaletteError::parse(location(), "unable to parse color values")),
    }
}

fn try_parse_color_value(value: &Value) -> Option<Color> {
    match value {
        Value::String(s) => Rgb::from_hex(s).ok().map(Color::Rgb),
        Value::Array(items) if items.len() >= 3 => {
            let mut nums = Vec::with_capacity(items.len());
            for item in items {
                nums.push(item.as_f64()?);
            }
            Some(Color::Rgb(Rgb::new(
                nums[0] as u8,
                nums[1] as u8,
                nums[2] as u8,
            )))
        }
        _ => None,
    }
}

/// Exporter for JSON palette documents.
#[derive(Debug, Clone)]
pub struct JsonExporter {
    /// Indent the output with two spaces.
    pub pretty_print: bool,
    /// Write the palette metadata block.
    pub include_metadata: bool,
    /// Which representations to write per color.
    pub color_format: JsonColorFormat,
}

impl Default for JsonExporter {
    fn default() -> Self {
        JsonExporter {
            pretty_print: true,
            include_metadata: true,
            color_format: JsonColorFormat::default(),
        }
    }
}

impl JsonExporter {
    /// Creates an exporter with default settings (pretty, metadata,
    /// RGB + hex).
    pub fn new() -> Self {
        JsonExporter::default()
    }

    fn convert_color(&self, nc: &NamedColor) -> ColorJson {
        let mut out = ColorJson {
            name: nc.name.clone(),
            color_space: nc.color.color_space().name().to_string(),
            ..ColorJson::default()
        };

        if self.color_format.contains(JsonColorFormat::RGB) {
            let rgb = nc.color.to_rgb();
            out.rgb = Some(RgbValues { r: rgb.r, g: rgb.g, b: rgb.b });
        }
        if self.color_format.contains(JsonColorFormat::HEX) {
            out.hex = nc.color.to_rgb().hex();
        }
        if self.color_format.contains(JsonColorFormat::CMYK) {
            let cmyk = nc.color.to_cmyk();
            out.cmyk = Some(CmykValues { c: cmyk.c, m: cmyk.m, y: cmyk.y, k: cmyk.k });
        }
        if self.color_format.contains(JsonColorFormat::HSB) {
            let hsb = nc.color.to_hsb();
            out.hsb = Some(HsbValues { h: hsb.h, s: hsb.s, b: hsb.b });
        }
        if self.color_format.contains(JsonColorFormat::LAB) {
            let lab = nc.color.to_lab();
            out.lab = Some(LabValues { l: lab.l, a: lab.a, b: lab.b });
        }

        out
    }
}

impl Exporter for JsonExporter {
    fn export(&self, palette: &Palette, w: &mut dyn Write) -> Result<()> {
        let mut doc = PaletteJson {
            name: palette.name.clone(),
            description: palette.description.clone(),
            colors: palette.colors.iter().map(|nc| self.convert_color(nc)).collect(),
            metadata: None,
        };

        if self.include_metadata {
            let entries: serde_json::Map<String, Value> = palette
                .list_metadata_keys()
                .iter()
                .filter_map(|key| {
                    palette
                        .get_metadata(key)
                        .map(|v| (key.to_string(), meta_to_value(v)))
                })
                .collect();
            if !entries.is_empty() {
                doc.metadata = Some(Value::Object(entries));
            }
        }

        let data = if self.pretty_print {
            serde_json::to_vec_pretty(&doc)
        } else {
            serde_json::to_vec(&doc)
        }
        .map_err(|e| PaletteError::Format(format!("failed to serialize JSON: {e}")))?;

        w.write_all(&data)?;
        Ok(())
    }

    fn can_export(&self, format: &str) -> bool {
        format == ".json"
    }

    fn supported_formats(&self) -> &'static [&'static str] {
        &[".json"]
    }
}

/// Converts a palette metadata value into JSON.
pub fn meta_to_value(meta: &MetaValue) -> Value {
    match meta {
        MetaValue::Null => Value::Null,
        MetaValue::Bool(v) => Value::Bool(*v),
        MetaValue::Str(v) => Value::String(v.clone()),
        MetaValue::UInt(v) => Value::from(*v),
        MetaValue::Int(v) => Value::from(*v),
        MetaValue::Float(v) => serde_json::Number::from_f64(*v)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        MetaValue::List(items) => Value::Array(items.iter().map(meta_to_value).collect()),
        MetaValue::Map(entries) => Value::Object(
            entries
                .iter()
                .map(|(k, v)| (k.clone(), meta_to_value(v)))
                .collect(),
        ),
    }
}

/// Converts arbitrary JSON into a palette metadata value.
pub fn value_to_meta(value: &Value) -> MetaValue {
    match value {
        Value::Null => MetaValue::Null,
        Value::Bool(v) => MetaValue::Bool(*v),
        Value::String(v) => MetaValue::Str(v.clone()),
        Value::Number(n) => {
            if let Some(u) = n.as_u64().and_then(|u| u32::try_from(u).ok()) {
                MetaValue::UInt(u)
            } else if let Some(i) = n.as_i64() {
                MetaValue::Int(i)
            } else {
                MetaValue::Float(n.as_f64().unwrap_or(0.0))
            }
        }
        Value::Array(items) => MetaValue::List(items.iter().map(value_to_meta).collect()),
        Value::Object(entries) => MetaValue::Map(
            entries
                .iter()
                .map(|(k, v)| (k.clone(), value_to_meta(v)))
                .collect::<BTreeMap<_, _>>(),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn import(text: &str) -> Result<Palette> {
        JsonImporter::new().import(&mut text.as_bytes())
    }

    fn export(palette: &Palette, exporter: JsonExporter) -> String {
        let mut buf = Vec::new();
        exporter.export(palette, &mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn palette_object_shape() {
        let palette = import(
            r##"{
                "name": "Brand",
                "description": "corporate colors",
                "colors": [
                    {"name": "Primary", "rgb": {"r": 220, "g": 20, "b": 60}},
                    {"hex": "#FFD700"}
                ],
                "metadata": {"source": "styleguide", "rev": 3}
            }"##,
        )
        .unwrap();

        assert_eq!(palette.name, "Brand");
        assert_eq!(palette.description.as_deref(), Some("corporate colors"));
        assert_eq!(palette.len(), 2);
        assert_eq!(palette.get(0).unwrap().name, "Primary");
        assert_eq!(palette.get(1).unwrap().name, "Color 2");
        assert_eq!(
            palette.get(1).unwrap().color,
            Color::Rgb(Rgb::new(255, 215, 0))
        );

        let original = palette.get_metadata("original_metadata").unwrap();
        match original {
            MetaValue::Map(entries) => {
                assert_eq!(entries["source"].as_str(), Some("styleguide"));
                assert_eq!(entries["rev"].as_u16(), Some(3));
            }
            other => panic!("expected map, got {other:?}"),
        }
    }

    #[test]
    fn color_array_shape() {
        let palette = import(
            r#"[
                {"name": "Red", "rgb": {"r": 255, "g": 0, "b": 0}},
                {"name": "Deep", "lab": {"l": 30, "a": 20, "b": -40}}
            ]"#,
        )
        .unwrap();

        assert_eq!(palette.name, "JSON Color Array");
        assert_eq!(
            palette.get(1).unwrap().color,
            Color::Lab(Lab::new(30, 20, -40))
        );
    }

    #[test]
    fn generic_object_shape_skips_non_colors() {
        let palette = import(
            r##"{
                "primary": "#DC143C",
                "accent": [255, 215, 0],
                "title": "not a color",
                "count": 7
            }"##,
        )
        .unwrap();

        assert_eq!(palette.name, "JSON Import");
        assert_eq!(palette.len(), 2);
        assert_eq!(
            palette.get_by_name("primary").unwrap().color,
            Color::Rgb(Rgb::new(220, 20, 60))
        );
        assert_eq!(
            palette.get_by_name("accent").unwrap().color,
            Color::Rgb(Rgb::new(255, 215, 0))
        );
    }

    #[test]
    fn generic_object_with_no_colors_fails() {
        assert!(matches!(
            import(r#"{"a": 1, "b": "two"}"#),
            Err(PaletteError::Format(_))
        ));
    }

    #[test]
    fn representation_precedence() {
        // RGB wins over hex even when both are present.
        let palette = import(
            r##"[{"rgb": {"r": 1, "g": 2, "b": 3}, "hex": "#FFFFFF"}]"##,
        )
        .unwrap();
        assert_eq!(palette.get(0).unwrap().color, Color::Rgb(Rgb::new(1, 2, 3)));

        // Hex wins over CMYK.
        let palette = import(
            r##"[{"hex": "#000000", "cmyk": {"c": 0, "m": 0, "y": 0, "k": 0}}]"##,
        )
        .unwrap();
        assert_eq!(palette.get(0).unwrap().color, Color::Rgb(Rgb::new(0, 0, 0)));
    }

    #[test]
    fn values_interpreted_under_color_space() {
        let palette = import(
            r#"[
                {"color_space": "CMYK", "values": [100, 0, 0, 0]},
                {"color_space": "HSB", "values": [200, 60, 90]},
                {"values": [10, 20, 30]}
            ]"#,
        )
        .unwrap();

        assert_eq!(
            palette.get(0).unwrap().color,
            Color::Cmyk(Cmyk::new(100, 0, 0, 0))
        );
        assert_eq!(
            palette.get(1).unwrap().color,
            Color::Hsb(Hsb::new(200, 60, 90))
        );
        assert_eq!(
            palette.get(2).unwrap().color,
            Color::Rgb(Rgb::new(10, 20, 30))
        );
    }

    #[test]
    fn color_without_data_fails() {
        let err = import(r##"[{"name": "Ghost"}, {"name": "Real", "hex": "#000000"}]"##)
            .unwrap_err();
        assert!(matches!(err, PaletteError::Parse { .. }));
    }

    #[test]
    fn export_round_trip_preserves_rgb() {
        let mut original = Palette::new("Round Trip");
        original.description = Some("via JSON".to_string());
        original.add(Rgb::new(220, 20, 60), "Crimson");
        original.add(Cmyk::new(100, 0, 0, 0), "Cyan");
        original.add(Hsb::new(120, 100, 100), "Green");

        let text = export(&original, JsonExporter::new());
        let imported = import(&text).unwrap();

        assert_eq!(imported.name, original.name);
        assert_eq!(imported.description, original.description);
        assert_eq!(imported.len(), original.len());
        for (a, b) in imported.colors.iter().zip(&original.colors) {
            assert_eq!(a.name, b.name);
            // RGB is carried verbatim in the default mask.
            assert_eq!(a.color.to_rgb(), b.color.to_rgb());
        }
    }

    #[test]
    fn export_writes_space_label_and_uppercase_hex() {
        let mut palette = Palette::new("Labels");
        palette.add(Lab::new(50, -10, 20), "L");

        let text = export(&palette, JsonExporter::new());
        let doc: Value = serde_json::from_str(&text).unwrap();
        let color = &doc["colors"][0];
        assert_eq!(color["color_space"], "LAB");
        let hex = color["hex"].as_str().unwrap();
        assert!(hex.starts_with('#'));
        assert_eq!(hex, hex.to_uppercase());
    }

    #[test]
    fn format_mask_selects_representations() {
        let mut palette = Palette::new("Mask");
        palette.add(Rgb::new(255, 0, 0), "Red");

        let exporter = JsonExporter {
            color_format: JsonColorFormat::CMYK | JsonColorFormat::LAB,
            ..JsonExporter::default()
        };
        let doc: Value = serde_json::from_str(&export(&palette, exporter)).unwrap();
        let color = &doc["colors"][0];
        assert!(color.get("rgb").is_none());
        assert!(color.get("hex").is_none());
        assert!(color.get("cmyk").is_some());
        assert!(color.get("lab").is_some());
    }

    #[test]
    fn metadata_block_round_trips() {
        let mut palette = Palette::new("Meta");
        palette.add(Rgb::new(0, 0, 0), "K");
        palette.set_metadata("book_id", 4242u16);
        palette.set_metadata("format", "Adobe Color Book");

        let text = export(&palette, JsonExporter::new());
        let doc: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(doc["metadata"]["book_id"], 4242);

        // Unknown keys survive a JSON round-trip under original_metadata.
        let imported = import(&text).unwrap();
        let original = imported.get_metadata("original_metadata").unwrap();
        match original {
            MetaValue::Map(entries) => {
                assert_eq!(entries["book_id"].as_u16(), Some(4242));
            }
            other => panic!("expected map, got {other:?}"),
        }
    }

    #[test]
    fn compact_output_has_no_newlines() {
        let mut palette = Palette::new("Compact");
        palette.add(Rgb::new(1, 2, 3), "X");

        let exporter = JsonExporter {
            pretty_print: false,
            ..JsonExporter::default()
        };
        let text = export(&palette, exporter);
        assert!(!text.contains('\n'));

        let pretty = export(&palette, JsonExporter::new());
        assert!(pretty.contains("\n  \"name\""));
    }
}
