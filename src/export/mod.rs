//! Notes → downloadable payload.
//!
//! Markdown passes through untouched. PDF and DOCX are deliberately flat:
//! every input line becomes exactly one text block / paragraph, in order,
//! with no styling. HTML renders the Markdown notes.

mod docx;
mod html;
mod pdf;

use std::fmt;
use std::str::FromStr;

use itertools::Itertools;
use tracing::debug;

use crate::error::ExportError;

/// The canonical set of export formats. Every tag list in the crate derives
/// from [`ExportFormat::ALL`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExportFormat {
    Markdown,
    Pdf,
    Html,
    Docx,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 4] = [
        ExportFormat::Markdown,
        ExportFormat::Pdf,
        ExportFormat::Html,
        ExportFormat::Docx,
    ];

    pub fn tag(self) -> &'static str {
        match self {
            ExportFormat::Markdown => "markdown",
            ExportFormat::Pdf => "pdf",
            ExportFormat::Html => "html",
            ExportFormat::Docx => "docx",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Markdown => "md",
            other => other.tag(),
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            ExportFormat::Markdown => "text/markdown; charset=utf-8",
            ExportFormat::Pdf => "application/pdf",
            ExportFormat::Html => "text/html; charset=utf-8",
            ExportFormat::Docx => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
        }
    }

    /// "markdown, pdf, html, docx"
    pub fn tag_list() -> String {
        Self::ALL.iter().map(|f| f.tag()).join(", ")
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|f| f.tag() == wanted)
            .ok_or_else(|| ExportError::UnsupportedFormat(s.to_string()))
    }
}

/// A rendered export, ready to be written or offered for download.
#[derive(Debug, Clone)]
pub struct Export {
    pub format: ExportFormat,
    pub bytes: Vec<u8>,
}

impl Export {
    pub fn file_name(&self) -> String {
        format!("notes.{}", self.format.extension())
    }
}

/// Render `notes` in the requested format. The notes are only borrowed, so a
/// failed export leaves the caller free to retry with another format.
pub fn export(notes: &str, format: ExportFormat) -> Result<Export, ExportError> {
    let bytes = match format {
        ExportFormat::Markdown => notes.as_bytes().to_vec(),
        ExportFormat::Html => html::render(notes).into_bytes(),
        ExportFormat::Pdf => pdf::render(notes)?,
        ExportFormat::Docx => docx::render(notes)?,
    };
    debug!(format = %format, bytes = bytes.len(), "exported notes");
    Ok(Export { format, bytes })
}
