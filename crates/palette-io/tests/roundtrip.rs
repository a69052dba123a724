//! Cross-format round-trips and the file conversion front end.

use palette_core::{Cmyk, Color, Palette, PaletteError, Rgb};
use palette_io::{convert_file, export, import};

#[test]
fn csv_to_every_format_and_back() {
    let csv = "Name,R,G,B\r\nCrimson,220,20,60\r\nGold,255,215,0\r\nForest Green,34,139,34\r\n";
    let original = import(&mut csv.as_bytes(), ".csv").unwrap();
    assert_eq!(original.len(), 3);

    for format in [".acb", ".aco", ".json", ".csv"] {
        let mut buf = Vec::new();
        export(&original, &mut buf, format).unwrap();
        let back = import(&mut buf.as_slice(), format).unwrap();

        assert_eq!(back.len(), original.len(), "{format}");
        for (a, b) in back.colors.iter().zip(&original.colors) {
            assert_eq!(a.color.to_rgb(), b.color.to_rgb(), "{format}");
        }
    }
}

#[test]
fn acb_import_export_import_is_stable() {
    // Second-generation import must equal the first under the format's
    // quantization grid.
    let mut palette = Palette::new("Stable");
    palette.set_metadata("color_type", 2u16);
    palette.add(Cmyk::new(100, 0, 0, 0), "Cyan");
    palette.add(Cmyk::new(30, 60, 0, 10), "Violet");

    let mut first_bytes = Vec::new();
    export(&palette, &mut first_bytes, ".acb").unwrap();
    let first = import(&mut first_bytes.as_slice(), ".acb").unwrap();

    let mut second_bytes = Vec::new();
    export(&first, &mut second_bytes, ".acb").unwrap();
    let second = import(&mut second_bytes.as_slice(), ".acb").unwrap();

    assert_eq!(second, first);
}

#[test]
fn aco_preserves_native_spaces_across_formats() {
    let mut palette = Palette::new("Spaces");
    palette.add(Rgb::new(10, 20, 30), "R");
    palette.add(Cmyk::new(1, 2, 3, 4), "C");

    let mut buf = Vec::new();
    export(&palette, &mut buf, "aco").unwrap();
    let back = import(&mut buf.as_slice(), "colorswatch").unwrap();

    assert_eq!(back.get(0).unwrap().color, Color::Rgb(Rgb::new(10, 20, 30)));
    assert_eq!(back.get(1).unwrap().color, Color::Cmyk(Cmyk::new(1, 2, 3, 4)));
}

#[test]
fn convert_file_end_to_end() {
    let dir = std::env::temp_dir();
    let csv_path = dir.join("palette_io_e2e.csv");
    let aco_path = dir.join("palette_io_e2e.aco");
    let acb_path = dir.join("palette_io_e2e.acb");

    std::fs::write(&csv_path, "Name,R,G,B\nRed,255,0,0\nGold,255,215,0\n").unwrap();

    // CSV -> ACO with no explicit formats: both inferred from extensions.
    convert_file(
        csv_path.to_str().unwrap(),
        aco_path.to_str().unwrap(),
        "",
        "",
        "",
        "",
    )
    .unwrap();

    // ACO -> ACB with a color space conversion and a pinned book ID.
    convert_file(
        aco_path.to_str().unwrap(),
        acb_path.to_str().unwrap(),
        "",
        "",
        "CMYK",
        "4100",
    )
    .unwrap();

    let data = std::fs::read(&acb_path).unwrap();
    let book = import(&mut data.as_slice(), ".acb").unwrap();
    assert_eq!(book.len(), 2);
    assert_eq!(book.get_metadata("book_id").unwrap().as_u16(), Some(4100));
    assert_eq!(book.get(0).unwrap().name, "Red");

    for path in [&csv_path, &aco_path, &acb_path] {
        let _ = std::fs::remove_file(path);
    }
}

#[test]
fn convert_file_rejects_bad_book_ids() {
    let dir = std::env::temp_dir();
    let csv_path = dir.join("palette_io_bad_book_id.csv");
    let acb_path = dir.join("palette_io_bad_book_id.acb");
    std::fs::write(&csv_path, "Name,R,G,B\nRed,255,0,0\n").unwrap();

    let err = convert_file(
        csv_path.to_str().unwrap(),
        acb_path.to_str().unwrap(),
        "",
        "",
        "",
        "123",
    )
    .unwrap_err();
    assert!(matches!(err, PaletteError::InvalidBookId(_)));

    // A non-.acb target ignores the book ID entirely.
    let json_path = dir.join("palette_io_bad_book_id.json");
    convert_file(
        csv_path.to_str().unwrap(),
        json_path.to_str().unwrap(),
        "",
        "",
        "",
        "123",
    )
    .unwrap();

    for path in [&csv_path, &acb_path, &json_path] {
        let _ = std::fs::remove_file(path);
    }
}

#[test]
fn convert_file_needs_an_extension_or_format() {
    let dir = std::env::temp_dir();
    let noext = dir.join("palette_io_noext");
    std::fs::write(&noext, "Name,R,G,B\nRed,255,0,0\n").unwrap();

    let out = dir.join("palette_io_noext_out.json");
    let err = convert_file(
        noext.to_str().unwrap(),
        out.to_str().unwrap(),
        "",
        "",
        "",
        "",
    )
    .unwrap_err();
    assert!(matches!(err, PaletteError::Format(_)));

    // An explicit --from works without an extension.
    convert_file(
        noext.to_str().unwrap(),
        out.to_str().unwrap(),
        "csv",
        "",
        "",
        "",
    )
    .unwrap();

    let _ = std::fs::remove_file(&noext);
    let _ = std::fs::remove_file(&out);
}

#[test]
fn large_palettes_survive_the_binary_formats() {
    let mut palette = Palette::new("Big");
    for i in 0..500u32 {
        let r = (i % 256) as u8;
        let g = ((i * 7) % 256) as u8;
        let b = ((i * 13) % 256) as u8;
        palette.add(Rgb::new(r, g, b), format!("Color {i:03}"));
    }

    for format in [".acb", ".aco"] {
        let mut buf = Vec::new();
        export(&palette, &mut buf, format).unwrap();
        let back = import(&mut buf.as_slice(), format).unwrap();

        assert_eq!(back.len(), 500, "{format}");
        for (a, b) in back.colors.iter().zip(&palette.colors) {
            assert_eq!(a.name, b.name, "{format}");
            assert_eq!(a.color, b.color, "{format}");
        }
    }
}

#[test]
fn unknown_color_space_passes_through_convert_to_space() {
    let mut palette = Palette::new("Pass");
    palette.add(Rgb::new(1, 2, 3), "X");
    let converted = palette.convert_to_space("XYZ");
    assert_eq!(converted.get(0).unwrap().color, Color::Rgb(Rgb::new(1, 2, 3)));
}
