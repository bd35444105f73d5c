// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Rasterwerk — PDF page rasterizer and flattener.
//
// Entry point. Parses arguments, initialises logging, and dispatches to the
// info / rasterize / flatten paths.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use rasterwerk_core::error::Result;
use rasterwerk_core::settings::{OutputFormat, RasterSettings};
use rasterwerk_document::pdf::inspector::{PdfInfo, PdfInspector};
use rasterwerk_document::pdf::renderer::{OutputOptions, PageRenderer};
use rasterwerk_document::pipeline::Flattener;

/// Rasterize PDF pages to high-quality images.
#[derive(Debug, Parser)]
#[command(
    name = "rasterwerk",
    version,
    about = "Rasterize PDF pages to images, optionally rebuilding them into a flattened PDF"
)]
struct Cli {
    /// Path to the input PDF file.
    input_pdf: PathBuf,

    /// Resolution in DPI.
    #[arg(long, default_value_t = 300)]
    dpi: u32,

    /// Output image format (PNG, JPEG, JPG, TIFF, BMP).
    #[arg(long, default_value = "PNG")]
    format: String,

    /// Output directory (default: same directory as the input).
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Filename prefix (default: input filename stem).
    #[arg(long)]
    prefix: Option<String>,

    /// Disable image quality enhancement.
    #[arg(long)]
    no_enhance: bool,

    /// Show PDF information and exit.
    #[arg(long)]
    info: bool,

    /// With --info: print the information as JSON.
    #[arg(long, requires = "info")]
    json: bool,

    /// Create a new PDF from the rasterized pages (flattened PDF).
    #[arg(long)]
    create_pdf: bool,

    /// Keep the individual page images when creating a PDF.
    #[arg(long, requires = "create_pdf")]
    keep_images: bool,

    /// Enable verbose logging.
    #[arg(long, short)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    init_logging(cli.verbose);
    tracing::debug!(input = %cli.input_pdf.display(), "Rasterwerk starting");

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {}", err);
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .init();
}

fn run(cli: &Cli) -> Result<()> {
    let format: OutputFormat = cli.format.parse()?;
    let mut settings = RasterSettings::new(cli.dpi, format)?;
    settings.enhance = !cli.no_enhance;

    if cli.info {
        let inspector = PdfInspector::open(&cli.input_pdf)?;
        let info = inspector.info();
        if cli.json {
            println!("{}", serde_json::to_string_pretty(&info)?);
        } else {
            print_info(&info);
        }
        return Ok(());
    }

    let options = OutputOptions {
        output_dir: cli.output_dir.clone(),
        prefix: cli.prefix.clone(),
    };

    if cli.create_pdf {
        let flattener = Flattener::new(settings)?;
        let outcome = flattener.flatten(&cli.input_pdf, &options, cli.keep_images)?;

        println!();
        println!("Successfully created rasterized PDF:");
        println!("  {}", outcome.pdf.display());
        println!();
        if cli.keep_images {
            println!("Also generated {} individual images:", outcome.images.len());
            for path in &outcome.images {
                println!("  {}", path.display());
            }
        } else {
            println!("Temporary images were cleaned up after PDF creation.");
        }
    } else {
        let renderer = PageRenderer::new(settings)?;
        let run = renderer.rasterize(&cli.input_pdf, &options)?;
        let files = run.output_files();

        println!();
        println!("Successfully generated {} images:", files.len());
        for path in &files {
            println!("  {}", path.display());
        }

        let skipped = run.failed_pages();
        if !skipped.is_empty() {
            println!();
            println!(
                "Skipped {} page(s) due to errors: {:?}",
                skipped.len(),
                skipped
            );
        }
    }

    Ok(())
}

fn print_info(info: &PdfInfo) {
    println!();
    println!("PDF Information:");
    println!("Title: {}", info.title);
    println!("Author: {}", info.author);
    println!("Subject: {}", info.subject);
    println!("Pages: {}", info.page_count);
    println!();
    println!("Page Details:");
    for page in &info.pages {
        println!(
            "  Page {}: {:.1}x{:.1} pts (rotation: {}°)",
            page.page, page.width, page.height, page.rotation
        );
    }
}

// -- Tests --------------------------------------------------------------------
