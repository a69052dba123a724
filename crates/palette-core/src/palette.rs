//! Ordered collections of named colors with a metadata side-channel.

use crate::{Color, ColorSpace, MetaValue, PaletteError, Result};
use std::collections::BTreeMap;
use std::fmt;

/// A color paired with an optional display name.
///
/// An empty name means an unnamed swatch; unnamed entries are exempt from
/// the uniqueness check in [`Palette::validate`].
#[derive(Debug, Clone, PartialEq)]
pub struct NamedColor {
    /// Display name; may be empty.
    pub name: String,
    /// The color value.
    pub color: Color,
}

impl NamedColor {
    /// Creates a named color.
    pub fn new(name: impl Into<String>, color: impl Into<Color>) -> Self {
        NamedColor {
            name: name.into(),
            color: color.into(),
        }
    }
}

/// An ordered sequence of named colors with palette-level metadata.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Palette {
    /// Display name of the palette.
    pub name: String,
    /// Optional free-form description.
    pub description: Option<String>,
    /// The colors, in insertion order.
    pub colors: Vec<NamedColor>,
    metadata: BTreeMap<String, MetaValue>,
}

impl Palette {
    /// Creates an empty palette with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Palette {
            name: name.into(),
            description: None,
            colors: Vec::new(),
            metadata: BTreeMap::new(),
        }
    }

    /// Creates a palette preloaded with the given colors.
    pub fn with_colors(name: impl Into<String>, colors: impl IntoIterator<Item = NamedColor>) -> Self {
        let mut p = Palette::new(name);
        p.colors.extend(colors);
        p
    }

    /// Appends a named color.
    pub fn add(&mut self, color: impl Into<Color>, name: impl Into<String>) {
        self.colors.push(NamedColor::new(name, color));
    }

    /// Appends an unnamed color.
    pub fn add_anonymous(&mut self, color: impl Into<Color>) {
        self.colors.push(NamedColor::new("", color));
    }

    /// Removes the color at `index`, preserving the order of the rest.
    pub fn remove(&mut self, index: usize) -> Result<()> {
        if index >= self.colors.len() {
            return Err(PaletteError::OutOfRange {
                index,
                len: self.colors.len(),
            });
        }
        self.colors.remove(index);
        Ok(())
    }

    /// Removes the first color with the given name. Returns whether a color
    /// was removed.
    pub fn remove_by_name(&mut self, name: &str) -> bool {
        match self.colors.iter().position(|c| c.name == name) {
            Some(i) => {
                self.colors.remove(i);
                true
            }
            None => false,
        }
    }

    /// Borrows the color at `index`.
    pub fn get(&self, index: usize) -> Result<&NamedColor> {
        self.colors.get(index).ok_or(PaletteError::OutOfRange {
            index,
            len: self.colors.len(),
        })
    }

    /// Borrows the first color with the given name.
    pub fn get_by_name(&self, name: &str) -> Option<&NamedColor> {
        self.colors.iter().find(|c| c.name == name)
    }

    /// Number of colors.
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// True if the palette holds no colors.
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Removes all colors. Metadata is untouched.
    pub fn clear(&mut self) {
        self.colors.clear();
    }

    /// Returns a new palette containing only the colors matching the
    /// predicate, named `"{name} (filtered)"`.
    pub fn filter(&self, predicate: impl Fn(&NamedColor) -> bool) -> Palette {
        let mut filtered = Palette::new(format!("{} (filtered)", self.name));
        filtered.description = self.description.clone();
        filtered
            .colors
            .extend(self.colors.iter().filter(|c| predicate(c)).cloned());
        filtered
    }

    /// Returns a new palette with only the colors stored in `space`.
    pub fn filter_by_space(&self, space: ColorSpace) -> Palette {
        self.filter(|c| c.color.color_space() == space)
    }

    /// Applies `mapper` to each color positionally, returning a new palette
    /// named `"{name} (mapped)"`.
    pub fn map(&self, mapper: impl Fn(NamedColor) -> NamedColor) -> Palette {
        let mut mapped = Palette::new(format!("{} (mapped)", self.name));
        mapped.description = self.description.clone();
        mapped.colors = self.colors.iter().cloned().map(mapper).collect();
        mapped
    }

    /// Returns a new palette with every color converted to `space`
    /// (case-insensitive). An unrecognized space passes colors through
    /// unchanged; the call always succeeds.
    pub fn convert_to_space(&self, space: &str) -> Palette {
        match space.parse::<ColorSpace>() {
            Ok(target) => self.map(|c| NamedColor {
                name: c.name,
                color: c.color.converted_to(target),
            }),
            Err(_) => self.map(|c| c),
        }
    }

    /// Sets a metadata value. An empty key is silently ignored.
    pub fn set_metadata(&mut self, key: impl Into<String>, value: impl Into<MetaValue>) {
        let key = key.into();
        if key.is_empty() {
            return;
        }
        self.metadata.insert(key, value.into());
    }

    /// Gets a metadata value by key.
    pub fn get_metadata(&self, key: &str) -> Option<&MetaValue> {
        self.metadata.get(key)
    }

    /// Removes a metadata key.
    pub fn remove_metadata(&mut self, key: &str) {
        self.metadata.remove(key);
    }

    /// Lists metadata keys in ascending order.
    pub fn list_metadata_keys(&self) -> Vec<&str> {
        self.metadata.keys().map(String::as_str).collect()
    }

    /// Checks the palette is well formed: non-empty name, and no duplicate
    /// among the non-empty color names.
    pub fn validate(&self) -> Result<()> {
        if self.name.is_empty() {
            return Err(PaletteError::NameEmpty);
        }

        let mut seen = std::collections::HashSet::new();
        for c in &self.colors {
            if !c.name.is_empty() && !seen.insert(c.name.as_str()) {
                return Err(PaletteError::DuplicateName(c.name.clone()));
            }
        }

        Ok(())
    }
}

impl fmt::Display for Palette {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let noun = if self.colors.len() == 1 { "color" } else { "colors" };
        match &self.description {
            Some(desc) => write!(f, "{} - {} ({} {})", self.name, desc, self.colors.len(), noun)?,
            None => write!(f, "{} ({} {})", self.name, self.colors.len(), noun)?,
        }

        for c in &self.colors {
            if c.name.is_empty() {
                write!(f, "\n  {}", c.color)?;
            } else {
                write!(f, "\n  {}: {}", c.name, c.color)?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Cmyk, Rgb};

    fn sample() -> Palette {
        let mut p = Palette::new("Sample");
        p.add(Rgb::new(255, 0, 0), "Red");
        p.add(Rgb::new(0, 255, 0), "Green");
        p.add(Cmyk::new(0, 0, 0, 100), "Black");
        p
    }

    #[test]
    fn add_get_remove() {
        let mut p = sample();
        assert_eq!(p.len(), 3);
        assert_eq!(p.get(1).unwrap().name, "Green");
        assert!(matches!(
            p.get(3),
            Err(PaletteError::OutOfRange { index: 3, len: 3 })
        ));

        p.remove(0).unwrap();
        assert_eq!(p.get(0).unwrap().name, "Green");
        assert!(p.remove_by_name("Black"));
        assert!(!p.remove_by_name("Black"));
        assert_eq!(p.len(), 1);

        p.clear();
        assert!(p.is_empty());
    }

    #[test]
    fn get_by_name_finds_first_match() {
        let mut p = sample();
        p.add(Rgb::new(1, 1, 1), "Red");
        let found = p.get_by_name("Red").unwrap();
        assert_eq!(found.color, Color::Rgb(Rgb::new(255, 0, 0)));
        assert!(p.get_by_name("Missing").is_none());
    }

    #[test]
    fn clone_is_deep() {
        let mut p = sample();
        p.set_metadata("format", "CSV");

        let mut clone = p.clone();
        assert_eq!(clone, p);

        clone.add(Rgb::new(9, 9, 9), "Extra");
        clone.set_metadata("format", "JSON");
        assert_eq!(p.len(), 3);
        assert_eq!(p.get_metadata("format").unwrap().as_str(), Some("CSV"));
    }

    #[test]
    fn filter_and_map_leave_receiver_alone() {
        let p = sample();
        let rgb_only = p.filter_by_space(ColorSpace::Rgb);
        assert_eq!(rgb_only.name, "Sample (filtered)");
        assert_eq!(rgb_only.len(), 2);

        let mapped = p.map(|mut c| {
            c.name.push('!');
            c
        });
        assert_eq!(mapped.name, "Sample (mapped)");
        assert_eq!(mapped.get(0).unwrap().name, "Red!");

        // Receiver untouched by either.
        assert_eq!(p.len(), 3);
        assert_eq!(p.get(0).unwrap().name, "Red");
    }

    #[test]
    fn convert_to_space_converts_known_spaces() {
        let p = sample();
        let cmyk = p.convert_to_space("cmyk");
        assert!(cmyk
            .colors
            .iter()
            .all(|c| c.color.color_space() == ColorSpace::Cmyk));
    }

    #[test]
    fn convert_to_unknown_space_passes_through() {
        let p = sample();
        let unchanged = p.convert_to_space("XYZ");
        assert_eq!(unchanged.len(), p.len());
        for (a, b) in unchanged.colors.iter().zip(&p.colors) {
            assert_eq!(a.color.color_space(), b.color.color_space());
            assert_eq!(a.color, b.color);
        }
    }

    #[test]
    fn metadata_keys_stay_sorted() {
        let mut p = sample();
        p.set_metadata("zeta", 1u16);
        p.set_metadata("alpha", 2u16);
        p.set_metadata("mid", 3u16);
        assert_eq!(p.list_metadata_keys(), vec!["alpha", "mid", "zeta"]);

        p.remove_metadata("mid");
        p.set_metadata("beta", 4u16);
        assert_eq!(p.list_metadata_keys(), vec!["alpha", "beta", "zeta"]);
    }

    #[test]
    fn empty_metadata_key_is_rejected_silently() {
        let mut p = sample();
        p.set_metadata("", "ignored");
        assert!(p.list_metadata_keys().is_empty());
    }

    #[test]
    fn validate_rules() {
        let empty_name = Palette::new("");
        assert!(matches!(empty_name.validate(), Err(PaletteError::NameEmpty)));

        let mut dupes = Palette::new("Dupes");
        dupes.add(Rgb::new(1, 0, 0), "Red");
        dupes.add(Rgb::new(2, 0, 0), "Red");
        assert!(matches!(
            dupes.validate(),
            Err(PaletteError::DuplicateName(name)) if name == "Red"
        ));

        let mut anon = Palette::new("Anon");
        anon.add_anonymous(Rgb::new(1, 0, 0));
        anon.add_anonymous(Rgb::new(2, 0, 0));
        assert!(anon.validate().is_ok());
    }

    #[test]
    fn display_form() {
        let mut p = Palette::new("Warm");
        p.add(Rgb::new(255, 128, 64), "Sunset");
        assert_eq!(p.to_string(), "Warm (1 color)\n  Sunset: RGB(255, 128, 64)");

        p.description = Some("evening tones".to_string());
        p.add_anonymous(Rgb::new(200, 100, 50));
        assert_eq!(
            p.to_string(),
            "Warm - evening tones (2 colors)\n  Sunset: RGB(255, 128, 64)\n  RGB(200, 100, 50)"
        );
    }
}
