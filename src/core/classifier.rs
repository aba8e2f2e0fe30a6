use crate::core::model::PdfContent;

/// True if the text contains at least one Vietnamese-specific scalar:
/// Latin-1 supplement letters, a-breve, d-with-stroke, or the Latin
/// Extended Additional block that carries the Vietnamese tone marks.
pub fn has_vietnamese_marks(text: &str) -> bool {
    text.chars().any(|c| {
        matches!(c,
            '\u{00C0}'..='\u{00FF}'
            | '\u{0102}' | '\u{0103}'
            | '\u{0110}' | '\u{0111}'
            | '\u{1EA0}'..='\u{1EFF}')
    })
}

/// Decides whether a PDF is text-based from a sample of its extracted text
/// (the concatenation of the first and last page).
///
/// A sample without Vietnamese diacritics is treated as image-based even if
/// non-empty: scanned pages often carry a garbage text layer of bare Latin
/// glyphs, and misrouting a genuine text page to the image strategy is safe
/// while the reverse loses the date.
pub fn classify_pdf_text(sample: &str) -> PdfContent {
    if !sample.trim().is_empty() && has_vietnamese_marks(sample) {
        PdfContent::TextBased
    } else {
        PdfContent::ImageBased
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_vietnamese_scalars() {
        assert!(has_vietnamese_marks("Hôm nay ngày ký"));
        assert!(has_vietnamese_marks("HỢP ĐỒNG"));
        assert!(!has_vietnamese_marks("plain ascii text 12/05/2024"));
    }

    #[test]
    fn classifies_vietnamese_text_page() {
        assert_eq!(
            classify_pdf_text("CỘNG HÒA XÃ HỘI CHỦ NGHĨA VIỆT NAM"),
            PdfContent::TextBased
        );
    }

    #[test]
    fn empty_or_plain_samples_are_image_based() {
        assert_eq!(classify_pdf_text(""), PdfContent::ImageBased);
        assert_eq!(classify_pdf_text("   \n  "), PdfContent::ImageBased);
        // A text layer without any diacritic is assumed to be OCR garbage.
        assert_eq!(classify_pdf_text("lorem ipsum 123"), PdfContent::ImageBased);
    }
}
