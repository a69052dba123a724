//! Palette conversion command.

use crate::ConvertArgs;
use anyhow::{bail, Result};
use palette_io::{convert_file, detect_format, validate_color_space};

/// Runs the convert command.
pub fn run(args: ConvertArgs, verbose: bool) -> Result<()> {
    let input = args.input.to_string_lossy().into_owned();
    let output = args.output.to_string_lossy().into_owned();
    let from = args.from.unwrap_or_default();
    let to = args.to.unwrap_or_default();
    let colorspace = args.colorspace.unwrap_or_default();
    let book_id = args.book_id.unwrap_or_default();

    validate_color_space(&colorspace)?;

    if !args.input.exists() {
        bail!("input file does not exist: {input}");
    }

    if verbose {
        println!("Converting {input} -> {output}");
    }

    convert_file(&input, &output, &from, &to, &colorspace, &book_id)?;

    let from_fmt = if from.is_empty() { detect_format(&input) } else { from };
    let to_fmt = if to.is_empty() { detect_format(&output) } else { to };

    println!("Successfully converted {from_fmt} to {to_fmt}");
    if !colorspace.is_empty() {
        println!("Colors converted to {colorspace} color space");
    }
    println!("Output written to: {output}");

    Ok(())
}
