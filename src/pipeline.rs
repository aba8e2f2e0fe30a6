use std::path::{Path, PathBuf};
use std::time::Instant;

use tracing::{info, warn};

use crate::core::classifier::classify_pdf_text;
use crate::core::model::{DocumentKind, ExtractedDate, PageOutcome, PdfContent};
use crate::date::evaluate_lines;
use crate::error::ExtractError;
use crate::ocr::{PageDateReader, TextRecognizer};
use crate::reader::{DocToDocxConverter, DocumentReader};
use crate::scan::{PageScanner, ScanState};

#[derive(Debug, Clone)]
pub struct ExtractorConfig {
    /// Upper bound on pages inspected per PDF, text and image path alike.
    pub max_pdf_pages: usize,
    /// Rasterization DPI for the image path.
    pub render_dpi: u32,
    /// When set, cropped date lines are saved here for audit.
    pub crop_save_dir: Option<PathBuf>,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            max_pdf_pages: 10,
            render_dpi: 300,
            crop_save_dir: None,
        }
    }
}

/// The extraction pipeline: classifies a document, routes it to the right
/// strategy and returns at most one signing date.
///
/// Collaborators are injected once at construction and reused across
/// requests; the recognizer in particular is expensive to initialize.
/// `extract_date` itself keeps no mutable state, so one extractor may serve
/// concurrent requests if its collaborators allow it.
pub struct DateExtractor {
    config: ExtractorConfig,
    reader: Box<dyn DocumentReader>,
    recognizer: Box<dyn TextRecognizer>,
    converter: Box<dyn DocToDocxConverter>,
}

impl DateExtractor {
    pub fn new(
        config: ExtractorConfig,
        reader: Box<dyn DocumentReader>,
        recognizer: Box<dyn TextRecognizer>,
        converter: Box<dyn DocToDocxConverter>,
    ) -> Self {
        Self {
            config,
            reader,
            recognizer,
            converter,
        }
    }

    /// Extracts the signing date, or `None` when the document has no
    /// resolvable date (including a located but blank date field).
    pub fn extract_date(&self, path: &Path) -> Result<Option<ExtractedDate>, ExtractError> {
        let started = Instant::now();
        let kind = DocumentKind::from_path(path);
        let date = match kind {
            DocumentKind::Unsupported => {
                return Err(ExtractError::UnsupportedFileType(extension_of(path)));
            }
            DocumentKind::Doc => {
                let converted = self
                    .converter
                    .convert(path)
                    .map_err(ExtractError::ConversionFailure)?;
                info!(from = %path.display(), to = %converted.display(), "converted doc to docx");
                self.extract_from_docx(&converted)
            }
            DocumentKind::Docx => self.extract_from_docx(path),
            DocumentKind::Pdf => self.extract_from_pdf(path),
        };

        let rendered = date.as_ref().map(|d| d.to_string());
        info!(
            file = %path.display(),
            date = ?rendered,
            elapsed_s = started.elapsed().as_secs_f32(),
            "extraction finished"
        );
        Ok(date)
    }

    /// DOCX has no pages; the whole document is one unit of lines.
    fn extract_from_docx(&self, path: &Path) -> Option<ExtractedDate> {
        let content = match self.reader.read_docx_text(path) {
            Ok(content) => content,
            Err(err) => {
                let err = ExtractError::ReaderFailure(err);
                warn!(file = %path.display(), error = %err, "treating document as empty");
                return None;
            }
        };
        let lines: Vec<&str> = content.lines().collect();
        match evaluate_lines(&lines) {
            PageOutcome::Found(date) => Some(date),
            PageOutcome::Blank => {
                info!(file = %path.display(), "date field is blank");
                None
            }
            PageOutcome::NotFound => None,
        }
    }

    fn extract_from_pdf(&self, path: &Path) -> Option<ExtractedDate> {
        match self.pdf_content(path) {
            PdfContent::TextBased => self.extract_from_pdf_text(path).or_else(|| {
                info!(file = %path.display(), "text strategy found nothing, falling back to image recognition");
                self.extract_from_pdf_images(path)
            }),
            PdfContent::ImageBased => self.extract_from_pdf_images(path),
        }
    }

    /// Text-based vs image-based, decided from the first and last page's
    /// extracted text. Any read failure routes to the image strategy, which
    /// handles a superset of inputs.
    fn pdf_content(&self, path: &Path) -> PdfContent {
        let pages = match self.reader.page_count(path) {
            Ok(pages) if pages > 0 => pages,
            Ok(_) => return PdfContent::ImageBased,
            Err(err) => {
                let err = ExtractError::ReaderFailure(err);
                warn!(file = %path.display(), error = %err, "treating pdf as image-based");
                return PdfContent::ImageBased;
            }
        };
        let first = self.reader.read_page_text(path, 0).unwrap_or_default();
        let last = self
            .reader
            .read_page_text(path, pages - 1)
            .unwrap_or_default();
        let content = classify_pdf_text(&(first + &last));
        info!(file = %path.display(), content = ?content, "classified pdf");
        content
    }

    /// Per-page text extraction: the first page with a context line decides
    /// the outcome, whether or not its date parses.
    fn extract_from_pdf_text(&self, path: &Path) -> Option<ExtractedDate> {
        let pages = match self.reader.page_count(path) {
            Ok(pages) => pages,
            Err(err) => {
                let err = ExtractError::ReaderFailure(err);
                warn!(file = %path.display(), error = %err, "page count failed");
                return None;
            }
        };
        for page_idx in 0..pages.min(self.config.max_pdf_pages) {
            let text = match self.reader.read_page_text(path, page_idx) {
                Ok(text) => text,
                Err(err) => {
                    let err = ExtractError::ReaderFailure(err);
                    warn!(page = page_idx + 1, error = %err, "skipping unreadable page");
                    continue;
                }
            };
            let lines: Vec<&str> = text.lines().collect();
            match evaluate_lines(&lines) {
                PageOutcome::Found(date) => {
                    info!(page = page_idx + 1, %date, "found date in pdf text");
                    return Some(date);
                }
                PageOutcome::Blank => {
                    info!(page = page_idx + 1, "date field is blank in pdf text");
                    return None;
                }
                PageOutcome::NotFound => {}
            }
        }
        None
    }

    fn extract_from_pdf_images(&self, path: &Path) -> Option<ExtractedDate> {
        let pages = match self.reader.page_count(path) {
            Ok(pages) => pages,
            Err(err) => {
                let err = ExtractError::ReaderFailure(err);
                warn!(file = %path.display(), error = %err, "page count failed");
                return None;
            }
        };
        let source = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| "document".to_string());
        let mut page_reader = PageDateReader::new(self.recognizer.as_ref());
        if let Some(dir) = &self.config.crop_save_dir {
            page_reader = page_reader.with_crop_dir(dir.clone());
        }

        let state = PageScanner::new(self.config.max_pdf_pages).scan(pages, |page_idx| {
            let image = self
                .reader
                .render_page(path, page_idx, self.config.render_dpi)
                .map_err(ExtractError::ReaderFailure)?;
            page_reader
                .read_page(&image, &source, page_idx)
                .map_err(ExtractError::RecognizerFailure)
        });

        match state {
            ScanState::Found(date) => Some(date),
            _ => None,
        }
    }
}

fn extension_of(path: &Path) -> String {
    path.extension()
        .map(|ext| ext.to_string_lossy().into_owned())
        .unwrap_or_default()
}
