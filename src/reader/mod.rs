pub mod convert;
pub mod docx;
pub mod poppler;

pub use convert::{DocToDocxConverter, LibreOfficeConverter};
pub use poppler::PopplerReader;

use anyhow::Result;
use image::RgbImage;
use std::path::Path;

/// Access to raw document content. Page indices are zero-based.
///
/// Calls are blocking; the pipeline imposes no timeout of its own. A reader
/// shared across concurrent extractions must be internally synchronized.
pub trait DocumentReader {
    fn page_count(&self, pdf: &Path) -> Result<usize>;

    /// Extracted machine text of one page. A page without a text layer
    /// yields an empty string, not an error.
    fn read_page_text(&self, pdf: &Path, page_idx: usize) -> Result<String>;

    /// Full paragraph text of a DOCX document, one paragraph per line.
    fn read_docx_text(&self, docx: &Path) -> Result<String>;

    /// Rasterizes one page for image-based recognition.
    fn render_page(&self, pdf: &Path, page_idx: usize, dpi: u32) -> Result<RgbImage>;
}
