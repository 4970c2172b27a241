use std::io::{Cursor, Write};

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::ExportError;

const WORD_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/></Types>"#;

const ROOT_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/></Relationships>"#;

/// Minimal WordprocessingML package: one `<w:p>` per input line.
pub(super) fn render(notes: &str) -> Result<Vec<u8>, ExportError> {
    let document = document_xml(notes)?;

    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    for (name, body) in [
        ("[Content_Types].xml", CONTENT_TYPES.as_bytes()),
        ("_rels/.rels", ROOT_RELS.as_bytes()),
        ("word/document.xml", document.as_slice()),
    ] {
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
        zip.start_file(name, options).map_err(docx_err)?;
        zip.write_all(body).map_err(docx_err)?;
    }

    let cursor = zip.finish().map_err(docx_err)?;
    Ok(cursor.into_inner())
}

fn document_xml(notes: &str) -> Result<Vec<u8>, ExportError> {
    let mut writer = Writer::new(Vec::new());

    write(&mut writer, Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))?;
    let mut root = BytesStart::new("w:document");
    root.push_attribute(("xmlns:w", WORD_NS));
    write(&mut writer, Event::Start(root))?;
    write(&mut writer, Event::Start(BytesStart::new("w:body")))?;

    for line in notes.lines() {
        let text = xml_safe(line);
        if text.is_empty() {
            write(&mut writer, Event::Empty(BytesStart::new("w:p")))?;
            continue;
        }
        write(&mut writer, Event::Start(BytesStart::new("w:p")))?;
        write(&mut writer, Event::Start(BytesStart::new("w:r")))?;
        let mut t = BytesStart::new("w:t");
        t.push_attribute(("xml:space", "preserve"));
        write(&mut writer, Event::Start(t))?;
        write(&mut writer, Event::Text(BytesText::new(&text)))?;
        write(&mut writer, Event::End(BytesEnd::new("w:t")))?;
        write(&mut writer, Event::End(BytesEnd::new("w:r")))?;
        write(&mut writer, Event::End(BytesEnd::new("w:p")))?;
    }

    write(&mut writer, Event::End(BytesEnd::new("w:body")))?;
    write(&mut writer, Event::End(BytesEnd::new("w:document")))?;
    Ok(writer.into_inner())
}

fn write(writer: &mut Writer<Vec<u8>>, event: Event<'_>) -> Result<(), ExportError> {
    writer.write_event(event).map_err(docx_err)
}

/// XML 1.0 forbids most control characters; tabs survive, the rest are dropped.
fn xml_safe(line: &str) -> String {
    line.chars()
        .filter(|c| *c == '\t' || !c.is_control())
        .collect()
}

fn docx_err(e: impl std::fmt::Display) -> ExportError {
    ExportError::Docx(e.to_string())
}
