use std::fs::File;
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use quick_xml::events::Event;
use quick_xml::Reader;
use zip::ZipArchive;

/// Paragraph text of a DOCX file, one paragraph per line. DOCX has no page
/// structure in the source format; the document is evaluated as a single
/// unpaginated unit.
pub fn paragraph_text(path: &Path) -> Result<String> {
    let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    let mut archive = ZipArchive::new(file)
        .with_context(|| format!("failed to open {} as a ZIP container", path.display()))?;

    let mut xml = String::new();
    archive
        .by_name("word/document.xml")
        .context("missing word/document.xml")?
        .read_to_string(&mut xml)
        .context("failed to read word/document.xml")?;

    Ok(paragraphs_from_xml(&xml)?.join("\n"))
}

/// Streams `document.xml`, collecting the character data of `w:t` runs and
/// closing a paragraph at each `</w:p>`.
fn paragraphs_from_xml(xml: &str) -> Result<Vec<String>> {
    let mut reader = Reader::from_str(xml);
    let mut paragraphs = Vec::new();
    let mut current = String::new();
    let mut in_text_run = false;

    loop {
        match reader.read_event().context("malformed document.xml")? {
            Event::Start(e) if e.name().as_ref() == b"w:t" => in_text_run = true,
            Event::End(e) => match e.name().as_ref() {
                b"w:t" => in_text_run = false,
                b"w:p" => paragraphs.push(std::mem::take(&mut current)),
                _ => {}
            },
            Event::Empty(e) if e.name().as_ref() == b"w:p" => paragraphs.push(String::new()),
            Event::Text(t) if in_text_run => {
                current.push_str(&t.unescape().context("bad entity in document.xml")?);
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !current.is_empty() {
        paragraphs.push(current);
    }
    Ok(paragraphs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;
    use zip::write::SimpleFileOptions;
    use zip::ZipWriter;

    const DOCUMENT_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:body>
    <w:p><w:r><w:t>HỢP ĐỒNG MUA BÁN</w:t></w:r></w:p>
    <w:p><w:r><w:t>Hôm nay ngày 15 tháng 03 năm 2023, </w:t></w:r><w:r><w:t>hai bên ký hợp đồng</w:t></w:r></w:p>
    <w:p/>
  </w:body>
</w:document>"#;

    #[test]
    fn splits_paragraphs_and_joins_runs() {
        let paragraphs = paragraphs_from_xml(DOCUMENT_XML).unwrap();
        assert_eq!(
            paragraphs,
            vec![
                "HỢP ĐỒNG MUA BÁN".to_string(),
                "Hôm nay ngày 15 tháng 03 năm 2023, hai bên ký hợp đồng".to_string(),
                String::new(),
            ]
        );
    }

    #[test]
    fn reads_a_docx_container() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let mut writer = ZipWriter::new(file.reopen().unwrap());
        writer
            .start_file("word/document.xml", SimpleFileOptions::default())
            .unwrap();
        writer.write_all(DOCUMENT_XML.as_bytes()).unwrap();
        writer.finish().unwrap();

        let text = paragraph_text(file.path()).unwrap();
        assert_eq!(
            text,
            "HỢP ĐỒNG MUA BÁN\nHôm nay ngày 15 tháng 03 năm 2023, hai bên ký hợp đồng\n"
        );
    }

    #[test]
    fn missing_document_xml_is_an_error() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let mut writer = ZipWriter::new(file.reopen().unwrap());
        writer
            .start_file("word/other.xml", SimpleFileOptions::default())
            .unwrap();
        writer.write_all(b"<w:document/>").unwrap();
        writer.finish().unwrap();

        assert!(paragraph_text(file.path()).is_err());
    }
}
