use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ngayky::core::classifier::classify_pdf_text;
use ngayky::ocr::OcrBridge;
use ngayky::reader::{DocumentReader, LibreOfficeConverter, PopplerReader};
use ngayky::{DateExtractor, DocumentKind, ExtractorConfig};

#[derive(Parser, Debug)]
#[command(name = "ngayky")]
#[command(version, about = "Contract signing-date extraction for Vietnamese business documents", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Maximum number of PDF pages to inspect
    #[arg(long, global = true, default_value_t = 10)]
    max_pages: usize,

    /// Rendering DPI for the image recognition path
    #[arg(long, global = true, default_value_t = 300)]
    dpi: u32,

    /// OCR bridge script (detection + handwriting recognition)
    #[arg(long, global = true, default_value = "scripts/ocr_bridge.py")]
    ocr_script: PathBuf,

    /// Save cropped date lines under this directory for audit
    #[arg(long, global = true)]
    save_crops: Option<PathBuf>,

    /// Log more
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Extract the signing date from one document
    Extract {
        /// Input PDF/DOCX/DOC file
        input: PathBuf,
    },

    /// Extract signing dates from every document in a directory
    Batch {
        /// Directory of documents
        dir: PathBuf,
    },

    /// Show how a document would be classified
    Info {
        /// Input file path
        input: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose {
        "ngayky=debug"
    } else {
        "ngayky=info"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let extractor = build_extractor(&cli);
    match &cli.command {
        Commands::Extract { input } => extract_single(&extractor, input),
        Commands::Batch { dir } => extract_batch(&extractor, dir),
        Commands::Info { input } => show_info(input),
    }
}

fn build_extractor(cli: &Cli) -> DateExtractor {
    let config = ExtractorConfig {
        max_pdf_pages: cli.max_pages,
        render_dpi: cli.dpi,
        crop_save_dir: cli.save_crops.clone(),
    };
    DateExtractor::new(
        config,
        Box::new(PopplerReader::new()),
        Box::new(OcrBridge::new(cli.ocr_script.clone())),
        Box::new(LibreOfficeConverter::new()),
    )
}

fn extract_single(extractor: &DateExtractor, input: &Path) -> Result<()> {
    if !input.is_file() {
        anyhow::bail!("input is not a file: {}", input.display());
    }

    let date = extractor
        .extract_date(input)
        .with_context(|| format!("failed to process {}", input.display()))?;

    match date {
        Some(date) => println!("{date}"),
        None => println!("no signing date found"),
    }
    Ok(())
}

fn extract_batch(extractor: &DateExtractor, dir: &Path) -> Result<()> {
    let mut entries: Vec<PathBuf> = std::fs::read_dir(dir)
        .with_context(|| format!("failed to list {}", dir.display()))?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .collect();
    entries.sort();

    if entries.is_empty() {
        anyhow::bail!("no files found in {}", dir.display());
    }

    println!("[*] Processing {} file(s) from {}", entries.len(), dir.display());

    let mut found = 0;
    let mut missing = 0;
    let mut failed = 0;

    for (i, path) in entries.iter().enumerate() {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        match extractor.extract_date(path) {
            Ok(Some(date)) => {
                println!("[{}/{}] {} -> {}", i + 1, entries.len(), name, date);
                found += 1;
            }
            Ok(None) => {
                println!("[{}/{}] {} -> no date", i + 1, entries.len(), name);
                missing += 1;
            }
            Err(err) => {
                eprintln!("[{}/{}] {} -> error: {}", i + 1, entries.len(), name, err);
                failed += 1;
            }
        }
    }

    println!("\n[*] Summary: {found} with date, {missing} without, {failed} failed");
    Ok(())
}

fn show_info(input: &Path) -> Result<()> {
    if !input.exists() {
        anyhow::bail!("input file does not exist: {}", input.display());
    }

    let kind = DocumentKind::from_path(input);
    println!("File: {}", input.display());
    println!("Kind: {kind:?}");

    if kind == DocumentKind::Pdf {
        let reader = PopplerReader::new();
        let pages = reader
            .page_count(input)
            .with_context(|| format!("failed to read {}", input.display()))?;
        let first = reader.read_page_text(input, 0).unwrap_or_default();
        let last = reader
            .read_page_text(input, pages.saturating_sub(1))
            .unwrap_or_default();
        println!("Pages: {pages}");
        println!("Content: {:?}", classify_pdf_text(&(first + &last)));
    }
    Ok(())
}
