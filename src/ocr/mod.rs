pub mod bridge;
pub mod page;

pub use bridge::OcrBridge;
pub use page::PageDateReader;

use anyhow::Result;
use image::RgbImage;

use crate::core::geometry::Quad;

/// One detected text line and the quadrilateral it was read from.
#[derive(Debug, Clone)]
pub struct RecognizedLine {
    pub text: String,
    pub region: Quad,
}

/// Text detection and recognition over rendered page images.
///
/// Implementations typically wrap models loaded once at process start;
/// construct the recognizer explicitly and inject it into the pipeline
/// rather than initializing it on first use. Calls are blocking, and an
/// instance shared across concurrent extractions must be internally
/// synchronized.
pub trait TextRecognizer {
    /// Detects text lines with their bounding geometry, in reading order.
    /// Returns an empty vector when nothing is detected.
    fn detect_lines(&self, image: &RgbImage) -> Result<Vec<RecognizedLine>>;

    /// Reads one cropped line image. The default bridge backs this with a
    /// handwriting model; the crop should cover exactly one line.
    fn read_line(&self, line: &RgbImage) -> Result<String>;
}
