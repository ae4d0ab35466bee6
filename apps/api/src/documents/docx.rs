//! Best-effort DOCX → plain text.
//!
//! Reads the main document part out of the zip container and keeps only the
//! run text: tabs and line breaks are preserved, paragraphs are separated by
//! a blank line. Headers, footers, comments and formatting are dropped.

use std::io::{Cursor, Read};

use quick_xml::events::Event;
use quick_xml::Reader;
use zip::ZipArchive;

use super::DocumentError;

const DOCUMENT_PART: &str = "word/document.xml";

/// Ceiling on the inflated size of `word/document.xml`. Text-only resumes
/// stay far below it; anything larger is treated as unreadable.
pub const MAX_DOCUMENT_XML_BYTES: u64 = 16 * 1024 * 1024;

pub fn extract_docx_text(bytes: &[u8]) -> Result<String, DocumentError> {
    let xml = read_document_part(bytes, MAX_DOCUMENT_XML_BYTES)?;
    document_xml_to_text(&xml)
}

fn read_document_part(bytes: &[u8], limit: u64) -> Result<String, DocumentError> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| DocumentError::Parse(format!("not a DOCX container: {e}")))?;

    let part = archive
        .by_name(DOCUMENT_PART)
        .map_err(|e| DocumentError::Parse(format!("missing {DOCUMENT_PART}: {e}")))?;

    if part.size() > limit {
        return Err(oversized(part.size(), limit));
    }

    // The declared size is not trusted: never inflate more than limit + 1 bytes.
    let mut xml = String::new();
    part.take(limit + 1)
        .read_to_string(&mut xml)
        .map_err(|e| DocumentError::Parse(format!("unreadable {DOCUMENT_PART}: {e}")))?;

    if xml.len() as u64 > limit {
        return Err(oversized(xml.len() as u64, limit));
    }
    Ok(xml)
}

fn oversized(size: u64, limit: u64) -> DocumentError {
    DocumentError::Parse(format!(
        "{DOCUMENT_PART} inflates to {size} bytes, over the {limit} byte limit"
    ))
}

fn document_xml_to_text(xml: &str) -> Result<String, DocumentError> {
    let mut reader = Reader::from_str(xml);

    let mut paragraphs: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut in_text = false;
    // <w:tab/> inside paragraph properties is a tab stop, not a tab character.
    let mut in_paragraph_props = false;

    loop {
        let event = reader
            .read_event()
            .map_err(|e| DocumentError::Parse(format!("malformed XML: {e}")))?;

        match event {
            Event::Start(e) => match e.name().as_ref() {
                b"w:t" => in_text = true,
                b"w:pPr" => in_paragraph_props = true,
                _ => {}
            },
            Event::End(e) => match e.name().as_ref() {
                b"w:t" => in_text = false,
                b"w:pPr" => in_paragraph_props = false,
                b"w:p" => paragraphs.push(std::mem::take(&mut current)),
                _ => {}
            },
            Event::Empty(e) => match e.name().as_ref() {
                b"w:tab" if !in_paragraph_props => current.push('\t'),
                b"w:br" | b"w:cr" => current.push('\n'),
                b"w:p" => paragraphs.push(String::new()),
                _ => {}
            },
            Event::Text(t) if in_text => {
                let text = t
                    .unescape()
                    .map_err(|e| DocumentError::Parse(format!("bad text escape: {e}")))?;
                current.push_str(&text);
            }
            Event::CData(t) if in_text => current.push_str(&String::from_utf8_lossy(&t)),
            Event::Eof => break,
            _ => {}
        }
    }

    if !current.is_empty() {
        paragraphs.push(current);
    }

    Ok(paragraphs.join("\n\n").trim().to_string())
}

#[cfg(test)]
pub(crate) mod fixtures {
    //! Minimal DOCX packages built in memory.

    use std::io::{Cursor, Write};

    use zip::write::SimpleFileOptions;
    use zip::ZipWriter;

    use super::DOCUMENT_PART;

    pub const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
  <Default Extension="xml" ContentType="application/xml"/>
  <Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/>
</Types>"#;

    fn wrap_body(body: &str) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:body>{body}</w:body>
</w:document>"#
        )
    }

    pub fn build_docx(parts: &[(&str, &str)]) -> Vec<u8> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        for (name, content) in parts {
            writer.start_file(*name, SimpleFileOptions::default()).unwrap();
            writer.write_all(content.as_bytes()).unwrap();
        }
        writer.finish().unwrap().into_inner()
    }

    pub fn minimal_docx(body: &str) -> Vec<u8> {
        let document = wrap_body(body);
        build_docx(&[
            ("[Content_Types].xml", CONTENT_TYPES),
            (DOCUMENT_PART, document.as_str()),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::{build_docx, minimal_docx, CONTENT_TYPES};
    use super::*;

    #[test]
    fn test_minimal_docx_yields_text() {
        let bytes = minimal_docx(
            r#"<w:p><w:r><w:t>John Doe</w:t></w:r></w:p>
               <w:p><w:r><w:t xml:space="preserve">Software </w:t></w:r><w:r><w:t>Engineer</w:t></w:r></w:p>"#,
        );
        let text = extract_docx_text(&bytes).unwrap();
        assert_eq!(text, "John Doe\n\nSoftware Engineer");
    }

    #[test]
    fn test_tabs_breaks_and_entities() {
        let bytes = minimal_docx(
            r#"<w:p>
                 <w:pPr><w:tabs><w:tab w:val="left" w:pos="720"/></w:tabs></w:pPr>
                 <w:r><w:t>Skills</w:t><w:tab/><w:t>Rust &amp; Go</w:t><w:br/><w:t>SQL</w:t></w:r>
               </w:p>"#,
        );
        let text = extract_docx_text(&bytes).unwrap();
        assert_eq!(text, "Skills\tRust & Go\nSQL");
    }

    #[test]
    fn test_table_cells_are_paragraphs() {
        let bytes = minimal_docx(
            r#"<w:tbl><w:tr>
                 <w:tc><w:p><w:r><w:t>Developer</w:t></w:r></w:p></w:tc>
                 <w:tc><w:p><w:r><w:t>2020 - Present</w:t></w:r></w:p></w:tc>
               </w:tr></w:tbl>"#,
        );
        let text = extract_docx_text(&bytes).unwrap();
        assert_eq!(text, "Developer\n\n2020 - Present");
    }

    #[test]
    fn test_markup_outside_text_runs_is_ignored() {
        let bytes = minimal_docx(
            r#"<w:p><w:pPr><w:pStyle w:val="Heading1"/></w:pPr><w:r><w:rPr><w:b/></w:rPr><w:t>Experience</w:t></w:r></w:p>"#,
        );
        assert_eq!(extract_docx_text(&bytes).unwrap(), "Experience");
    }

    #[test]
    fn test_document_without_text_yields_empty_string() {
        let bytes = minimal_docx("<w:p/><w:p></w:p>");
        assert_eq!(extract_docx_text(&bytes).unwrap(), "");
    }

    #[test]
    fn test_non_zip_bytes_fail_to_parse() {
        assert!(matches!(
            extract_docx_text(b"%PDF-1.7 not a zip"),
            Err(DocumentError::Parse(_))
        ));
    }

    #[test]
    fn test_zip_without_document_part_fails_to_parse() {
        let bytes = build_docx(&[("[Content_Types].xml", CONTENT_TYPES)]);
        assert!(matches!(extract_docx_text(&bytes), Err(DocumentError::Parse(_))));
    }

    #[test]
    fn test_highly_compressible_document_over_limit_fails_to_parse() {
        let run = "<w:p><w:r><w:t>aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa</w:t></w:r></w:p>".repeat(2048);
        let bytes = minimal_docx(&run);
        assert!(bytes.len() < 16 * 1024);

        match read_document_part(&bytes, 8 * 1024) {
            Err(DocumentError::Parse(detail)) => assert!(detail.contains("limit")),
            other => panic!("expected oversized part to be rejected, got {other:?}"),
        }
    }

    #[test]
    fn test_document_within_limit_is_read() {
        let bytes = minimal_docx("<w:p><w:r><w:t>Jane Roe</w:t></w:r></w:p>");
        let xml = read_document_part(&bytes, MAX_DOCUMENT_XML_BYTES).unwrap();
        assert!(xml.contains("Jane Roe"));
    }

    #[test]
    fn test_broken_xml_fails_to_parse() {
        let bytes = build_docx(&[(DOCUMENT_PART, "<w:document><w:body><w:p></w:body>")]);
        assert!(matches!(extract_docx_text(&bytes), Err(DocumentError::Parse(_))));
    }
}
