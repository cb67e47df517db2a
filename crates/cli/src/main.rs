//! CLI tool for converting a PowerPoint file into static HTML pages.

use anyhow::{Context, Result};
use clap::Parser;
use deck_html::{Converter, Stylesheet, DEFAULT_OUTPUT_DIR};
use std::path::PathBuf;

/// Convert a .pptx presentation into browsable HTML pages.
#[derive(Parser, Debug)]
#[command(name = "deck2html")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Input PowerPoint file (.pptx)
    input: PathBuf,

    /// Output directory (created if missing)
    #[arg(short, long, default_value = DEFAULT_OUTPUT_DIR)]
    output: PathBuf,

    /// Stylesheet to copy instead of the bundled style.css
    #[arg(short, long)]
    stylesheet: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    if args.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    }

    let stylesheet = match args.stylesheet {
        Some(path) => Stylesheet::File(path),
        None => Stylesheet::Bundled,
    };

    let converter = Converter::new(&args.input, &args.output)
        .with_context(|| format!("Failed to load {}", args.input.display()))?
        .with_stylesheet(stylesheet);

    let summary = converter
        .run()
        .with_context(|| format!("Failed to write pages to {}", args.output.display()))?;

    if args.verbose {
        eprintln!(
            "Written {} slides, {} shape fragments, {} cell fragments to {}",
            summary.slides,
            summary.shape_fragments,
            summary.cell_fragments,
            args.output.display()
        );
    }

    Ok(())
}
