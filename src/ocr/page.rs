use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use image::{imageops, RgbImage};
use tracing::{debug, warn};

use crate::core::model::PageOutcome;
use crate::date::{find_date_context, parse_date};
use crate::ocr::TextRecognizer;

/// Two-stage date recognition over one rendered page.
///
/// The detector is good at finding the printed label text; the numbers are
/// frequently handwritten into the template. So the detected line texts are
/// only used to locate the context line, then its region is cropped out of
/// the page raster and re-read by the line reader before parsing.
pub struct PageDateReader<'a> {
    recognizer: &'a dyn TextRecognizer,
    crop_dir: Option<PathBuf>,
}

impl<'a> PageDateReader<'a> {
    pub fn new(recognizer: &'a dyn TextRecognizer) -> Self {
        Self {
            recognizer,
            crop_dir: None,
        }
    }

    /// Saves every cropped date line under `dir/<yyyy-mm-dd>/` for audit.
    pub fn with_crop_dir(mut self, dir: PathBuf) -> Self {
        self.crop_dir = Some(dir);
        self
    }

    pub fn read_page(
        &self,
        image: &RgbImage,
        source: &str,
        page_idx: usize,
    ) -> Result<PageOutcome> {
        let lines = self.recognizer.detect_lines(image)?;
        if lines.is_empty() {
            warn!(page = page_idx + 1, "no text detected on page");
            return Ok(PageOutcome::NotFound);
        }

        let Some(idx) = find_date_context(lines.iter().map(|line| line.text.as_str())) else {
            return Ok(PageOutcome::NotFound);
        };

        let (x, y, w, h) = lines[idx]
            .region
            .bounds()
            .pixel_rect(image.width(), image.height());
        let crop = imageops::crop_imm(image, x, y, w, h).to_image();

        if let Some(dir) = &self.crop_dir {
            if let Err(err) = save_crop(dir, &crop, source, page_idx) {
                warn!(error = %err, "failed to save date line crop");
            }
        }

        let line_text = self.recognizer.read_line(&crop)?;
        debug!(page = page_idx + 1, line = %line_text, "re-read date line");
        match parse_date(&line_text) {
            Some(date) => Ok(PageOutcome::Found(date)),
            None => Ok(PageOutcome::Blank),
        }
    }
}

fn save_crop(dir: &Path, crop: &RgbImage, source: &str, page_idx: usize) -> Result<PathBuf> {
    let dated = dir.join(chrono::Local::now().format("%Y-%m-%d").to_string());
    fs::create_dir_all(&dated)
        .with_context(|| format!("failed to create crop dir {}", dated.display()))?;
    let path = dated.join(format!("date_line_{source}_page_{}.png", page_idx + 1));
    crop.save(&path)
        .with_context(|| format!("failed to save crop {}", path.display()))?;
    debug!(path = %path.display(), "saved date line crop");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::geometry::Quad;
    use crate::ocr::RecognizedLine;
    use std::cell::RefCell;

    struct StubRecognizer {
        lines: Vec<RecognizedLine>,
        line_text: String,
        read_calls: RefCell<usize>,
    }

    impl TextRecognizer for StubRecognizer {
        fn detect_lines(&self, _image: &RgbImage) -> Result<Vec<RecognizedLine>> {
            Ok(self.lines.clone())
        }

        fn read_line(&self, _line: &RgbImage) -> Result<String> {
            *self.read_calls.borrow_mut() += 1;
            Ok(self.line_text.clone())
        }
    }

    fn line(text: &str) -> RecognizedLine {
        RecognizedLine {
            text: text.to_string(),
            region: Quad([[0.0, 0.0], [4.0, 0.0], [4.0, 2.0], [0.0, 2.0]]),
        }
    }

    #[test]
    fn reads_the_located_line_and_parses_it() {
        let recognizer = StubRecognizer {
            lines: vec![line("CỘNG HÒA XÃ HỘI"), line("Ngày ký: ../../....")],
            line_text: "Ngày ký: 01/02/2024".to_string(),
            read_calls: RefCell::new(0),
        };
        let reader = PageDateReader::new(&recognizer);
        let outcome = reader
            .read_page(&RgbImage::new(8, 4), "contract", 0)
            .unwrap();
        match outcome {
            PageOutcome::Found(date) => assert_eq!(date.to_string(), "01/02/2024"),
            other => panic!("expected a date, got {other:?}"),
        }
        assert_eq!(*recognizer.read_calls.borrow(), 1);
    }

    #[test]
    fn context_line_with_unreadable_numbers_is_blank() {
        let recognizer = StubRecognizer {
            lines: vec![line("Hôm nay ngày .. tháng .. năm ..")],
            line_text: "ngày tháng năm".to_string(),
            read_calls: RefCell::new(0),
        };
        let reader = PageDateReader::new(&recognizer);
        let outcome = reader
            .read_page(&RgbImage::new(8, 4), "contract", 2)
            .unwrap();
        assert_eq!(outcome, PageOutcome::Blank);
    }

    #[test]
    fn no_context_means_not_found_without_a_read() {
        let recognizer = StubRecognizer {
            lines: vec![line("Điều 1: Phạm vi hợp đồng")],
            line_text: String::new(),
            read_calls: RefCell::new(0),
        };
        let reader = PageDateReader::new(&recognizer);
        let outcome = reader
            .read_page(&RgbImage::new(8, 4), "contract", 0)
            .unwrap();
        assert_eq!(outcome, PageOutcome::NotFound);
        assert_eq!(*recognizer.read_calls.borrow(), 0);
    }
}
