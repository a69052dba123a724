//! Palette inspection command.

use crate::InfoArgs;
use anyhow::{Context, Result};
use palette_io::{detect_format, Registry};
use std::fs::File;
use std::io::BufReader;

/// Runs the info command: imports the palette and prints its contents
/// and metadata.
pub fn run(args: InfoArgs, verbose: bool) -> Result<()> {
    let path = args.input.to_string_lossy().into_owned();
    let format = match args.format {
        Some(f) => f,
        None => detect_format(&path),
    };

    let registry = Registry::global();
    let file = File::open(&args.input).with_context(|| format!("failed to open {path}"))?;
    let mut reader = BufReader::new(file);

    let palette = if format.is_empty() {
        // No extension to go by; sniff the content instead.
        let detected = registry.autodetect(&mut reader)?;
        if verbose {
            println!("Detected format: {detected}");
        }
        let file = File::open(&args.input)?;
        let mut reader = BufReader::new(file);
        registry.import_from(&mut reader, &detected)?
    } else {
        registry.import_from(&mut reader, &format)?
    };

    println!("{palette}");

    let keys = palette.list_metadata_keys();
    if !keys.is_empty() {
        println!("\nMetadata:");
        for key in keys {
            if let Some(value) = palette.get_metadata(key) {
                println!("  {key}: {value}");
            }
        }
    }

    Ok(())
}
