//! palette - color palette conversion CLI
//!
//! Converts palette files between Adobe Color Book, Adobe Color Swatch,
//! CSV and JSON.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "palette")]
#[command(author, version, about = "Color palette conversion tool")]
#[command(long_about = "
Convert color palette files between supported formats:
  .acb  - Adobe Color Book
  .aco  - Adobe Color Swatch
  .csv  - Comma-Separated Values
  .json - JSON

Examples:
  palette convert colors.aco colors.json
  palette convert book.acb book.csv --colorspace RGB
  palette convert brand.json brand.acb --book-id 4100
  palette info FOCOLTONE.acb
  palette formats
")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert palette files between formats
    #[command(visible_alias = "c")]
    Convert(ConvertArgs),

    /// Show the contents of a palette file
    #[command(visible_alias = "i")]
    Info(InfoArgs),

    /// List supported formats
    Formats,
}

/// Arguments for the `convert` command.
#[derive(Args)]
struct ConvertArgs {
    /// Input file
    input: PathBuf,

    /// Output file
    output: PathBuf,

    /// Source format (detected from the input extension if omitted)
    #[arg(long)]
    from: Option<String>,

    /// Target format (detected from the output extension if omitted)
    #[arg(long)]
    to: Option<String>,

    /// Convert all colors to this color space: RGB, CMYK, LAB, HSB
    #[arg(short, long)]
    colorspace: Option<String>,

    /// Book ID for .acb output (4000-65535)
    #[arg(long = "book-id")]
    book_id: Option<String>,
}

/// Arguments for the `info` command.
#[derive(Args)]
struct InfoArgs {
    /// Palette file
    input: PathBuf,

    /// Format override (detected from the extension if omitted)
    #[arg(long)]
    format: Option<String>,
}

fn main() {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Convert(args) => commands::convert::run(args, cli.verbose),
        Commands::Info(args) => commands::info::run(args, cli.verbose),
        Commands::Formats => commands::formats::run(),
    };

    if let Err(err) = result {
        eprintln!("Error: {err:#}");
        std::process::exit(1);
    }
}
