//! Supported-format listing command.

use anyhow::Result;
use palette_io::Registry;

/// Runs the formats command.
pub fn run() -> Result<()> {
    let registry = Registry::global();

    println!("Import formats:");
    for format in registry.list_supported_imports() {
        println!("  {format}");
    }

    println!("\nExport formats:");
    for format in registry.list_supported_exports() {
        println!("  {format}");
    }

    Ok(())
}
