use anyhow::{Context, Result};
use image::RgbImage;
use std::path::Path;
use std::process::Command;

use crate::reader::{docx, DocumentReader};

/// Poppler-backed reader shelling out to `pdfinfo`, `pdftotext` and
/// `pdftoppm`. Stateless; every call is one tool invocation.
#[derive(Debug, Clone, Default)]
pub struct PopplerReader;

impl PopplerReader {
    pub fn new() -> Self {
        Self
    }
}

impl DocumentReader for PopplerReader {
    fn page_count(&self, pdf: &Path) -> Result<usize> {
        get_page_count(pdf)
    }

    fn read_page_text(&self, pdf: &Path, page_idx: usize) -> Result<String> {
        // poppler tools use 1-based page indices
        let page_number = page_idx + 1;
        let output = Command::new("pdftotext")
            .arg("-f")
            .arg(page_number.to_string())
            .arg("-l")
            .arg(page_number.to_string())
            .arg("-layout")
            .arg(pdf)
            .arg("-")
            .output()
            .with_context(|| format!("failed to invoke pdftotext on {}", pdf.display()))?;

        if !output.status.success() {
            anyhow::bail!("pdftotext failed with status: {}", output.status);
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    fn read_docx_text(&self, path: &Path) -> Result<String> {
        docx::paragraph_text(path)
    }

    fn render_page(&self, pdf: &Path, page_idx: usize, dpi: u32) -> Result<RgbImage> {
        render_page(pdf, page_idx, dpi)
    }
}

fn get_page_count(pdf_path: &Path) -> Result<usize> {
    let output = Command::new("pdfinfo")
        .arg(pdf_path)
        .output()
        .with_context(|| format!("failed to invoke pdfinfo on {}", pdf_path.display()))?;

    if !output.status.success() {
        anyhow::bail!("pdfinfo failed with status: {}", output.status);
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    for line in stdout.lines() {
        if let Some(rest) = line.strip_prefix("Pages:") {
            let num_str = rest.trim();
            let pages: usize = num_str.parse().with_context(|| {
                format!("failed to parse page count from 'Pages:' line: {num_str}")
            })?;
            return Ok(pages);
        }
    }

    anyhow::bail!(
        "pdfinfo output did not contain a 'Pages:' line for {}",
        pdf_path.display()
    );
}

fn render_page(pdf_path: &Path, page_idx: usize, dpi: u32) -> Result<RgbImage> {
    let scratch = tempfile::tempdir().context("failed to create scratch dir for page render")?;

    // pdftoppm uses 1-based page indices
    let page_number = page_idx + 1;
    let prefix = scratch.path().join("page");
    let prefix_str = prefix
        .to_str()
        .ok_or_else(|| anyhow::anyhow!("non-UTF8 scratch path not supported"))?;

    let status = Command::new("pdftoppm")
        .arg("-png")
        .arg("-r")
        .arg(dpi.to_string())
        .arg("-f")
        .arg(page_number.to_string())
        .arg("-l")
        .arg(page_number.to_string())
        .arg(pdf_path)
        .arg(prefix_str)
        .status()
        .with_context(|| "failed to invoke pdftoppm; is poppler-utils installed?")?;

    if !status.success() {
        anyhow::bail!("pdftoppm failed with status: {status}");
    }

    // pdftoppm writes `<prefix>-<page>.png`, zero-padding the page number
    // to the width of the document's last page; take whatever landed.
    let rendered = std::fs::read_dir(scratch.path())
        .context("failed to list rendered pages")?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .find(|path| path.extension().is_some_and(|ext| ext == "png"))
        .ok_or_else(|| anyhow::anyhow!("pdftoppm produced no image for page {page_number}"))?;

    let image = image::open(&rendered)
        .with_context(|| format!("failed to load rendered page {}", rendered.display()))?;
    Ok(image.to_rgb8())
}
