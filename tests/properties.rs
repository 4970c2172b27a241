use std::io::{Cursor, Read};

use codedoc::normalize::PLACEHOLDER_PREFIX;
use codedoc::{
    clean_content, export, extract_code_blocks, parse_line_numbers, ExportError, ExportFormat,
    FormatError,
};

#[test]
fn test_clean_then_extract_round_trip() {
    let html = r#"<html><body>
        <h2>Install</h2>
        <p>Run the installer:</p>
        <pre><code>cargo install codedoc</code></pre>
        <p>Then call <code>codedoc clean</code> on a page.</p>
    </body></html>"#;

    let text = clean_content(html);
    assert!(!text.contains(PLACEHOLDER_PREFIX));
    assert!(text.contains("Install"));

    let blocks = extract_code_blocks(&text);
    let code: Vec<&str> = blocks.iter().map(|b| b.code.as_str()).collect();
    assert_eq!(code, vec!["cargo install codedoc", "codedoc clean"]);
    assert!(blocks.iter().all(|b| b.language == "text"));
}

#[test]
fn test_normalizing_plain_output_is_stable() {
    let plain = "Notes\n\n- first point\n- second point";
    assert_eq!(clean_content(plain), plain);
    assert_eq!(clean_content(&clean_content(plain)), plain);
}

#[test]
fn test_line_ranges_from_overview() {
    assert_eq!(parse_line_numbers("1-3, 5, 7-9").unwrap(), vec![1, 2, 3, 5, 7, 8, 9]);
    assert_eq!(parse_line_numbers("5").unwrap(), vec![5]);
    assert_eq!(parse_line_numbers("2-2").unwrap(), vec![2]);
    assert_eq!(parse_line_numbers("1-3,2-4").unwrap(), vec![1, 2, 3, 4]);

    let err = parse_line_numbers("a-b").unwrap_err();
    assert_eq!(err.segment(), Some("a-b"));
    assert!(err.to_string().contains("a-b"));
    assert!(matches!(parse_line_numbers("3-1"), Err(FormatError::InvertedRange(_))));
}

fn pdf_text_blocks(bytes: &[u8]) -> usize {
    let doc = lopdf::Document::load_mem(bytes).unwrap();
    doc.get_pages()
        .values()
        .map(|id| {
            let raw = doc.get_page_content(*id).unwrap();
            lopdf::content::Content::decode(&raw)
                .unwrap()
                .operations
                .iter()
                .filter(|op| op.operator == "Tj")
                .count()
        })
        .sum()
}

fn docx_paragraphs(bytes: &[u8]) -> usize {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
    let mut xml = String::new();
    archive
        .by_name("word/document.xml")
        .unwrap()
        .read_to_string(&mut xml)
        .unwrap();
    xml.matches("<w:p>").count() + xml.matches("<w:p/>").count()
}

#[test]
fn test_every_format_exports_two_lines() {
    let notes = "line1\nline2";
    for format in ExportFormat::ALL {
        let out = export(notes, format).unwrap();
        assert_eq!(out.format, format);
        match format {
            ExportFormat::Markdown => assert_eq!(out.bytes, notes.as_bytes()),
            ExportFormat::Pdf => assert_eq!(pdf_text_blocks(&out.bytes), 2),
            ExportFormat::Docx => assert_eq!(docx_paragraphs(&out.bytes), 2),
            ExportFormat::Html => {
                let page = String::from_utf8(out.bytes).unwrap();
                assert!(page.contains("line1\nline2"));
            }
        }
    }
}

#[test]
fn test_failed_format_leaves_notes_usable() {
    let notes = String::from("keep me");
    let err = "rtf".parse::<ExportFormat>().unwrap_err();
    assert!(matches!(err, ExportError::UnsupportedFormat(_)));

    let retry = export(&notes, ExportFormat::Html).unwrap();
    assert!(String::from_utf8(retry.bytes).unwrap().contains("keep me"));
    assert_eq!(notes, "keep me");
}
