use std::fmt;
use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Document kind derived from the file extension, case-insensitively.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    Pdf,
    Docx,
    Doc,
    Unsupported,
}

impl DocumentKind {
    pub fn from_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .map(|e| e.to_string_lossy().to_ascii_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "pdf" => DocumentKind::Pdf,
            "docx" => DocumentKind::Docx,
            "doc" => DocumentKind::Doc,
            _ => DocumentKind::Unsupported,
        }
    }
}

/// Whether a PDF carries a usable machine-text layer or must be treated as
/// a scan and routed through image recognition.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PdfContent {
    TextBased,
    ImageBased,
}

/// A validated calendar date, rendered as `dd/mm/yyyy`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedDate {
    day: u32,
    month: u32,
    year: i32,
}

impl ExtractedDate {
    /// Builds a date only if day/month/year form a real calendar date
    /// (leap years included). Returns `None` for e.g. 31/04 or 29/02/2023.
    pub fn from_ymd(day: u32, month: u32, year: i32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day)?;
        Some(Self { day, month, year })
    }

    pub fn day(&self) -> u32 {
        self.day
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn year(&self) -> i32 {
        self.year
    }
}

impl fmt::Display for ExtractedDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}/{:02}/{}", self.day, self.month, self.year)
    }
}

/// Result of evaluating one page (or one unpaginated document) for a date.
///
/// `Blank` means a context line was located but carried no parseable date:
/// the template field exists and was left empty. It is distinct from
/// `NotFound`, where no context line matched at all.
#[derive(Debug, Clone, PartialEq)]
pub enum PageOutcome {
    Found(ExtractedDate),
    Blank,
    NotFound,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_extensions_case_insensitively() {
        assert_eq!(DocumentKind::from_path(Path::new("a/b.PDF")), DocumentKind::Pdf);
        assert_eq!(DocumentKind::from_path(Path::new("hop_dong.docx")), DocumentKind::Docx);
        assert_eq!(DocumentKind::from_path(Path::new("old.DOC")), DocumentKind::Doc);
        assert_eq!(DocumentKind::from_path(Path::new("notes.txt")), DocumentKind::Unsupported);
        assert_eq!(DocumentKind::from_path(Path::new("no_extension")), DocumentKind::Unsupported);
    }

    #[test]
    fn rejects_impossible_dates() {
        assert!(ExtractedDate::from_ymd(31, 4, 2024).is_none());
        assert!(ExtractedDate::from_ymd(29, 2, 2023).is_none());
        assert!(ExtractedDate::from_ymd(0, 13, 2024).is_none());
    }

    #[test]
    fn accepts_leap_day_and_pads() {
        let date = ExtractedDate::from_ymd(29, 2, 2024).unwrap();
        assert_eq!(date.to_string(), "29/02/2024");
        let date = ExtractedDate::from_ymd(1, 3, 2023).unwrap();
        assert_eq!(date.to_string(), "01/03/2023");
    }
}
