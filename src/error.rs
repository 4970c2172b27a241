use thiserror::Error;

/// A line-range expression that could not be turned into line numbers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    #[error("line range is empty")]
    Empty,
    /// `index` is the 1-based position of the blank segment.
    #[error("line range segment {index} is empty")]
    EmptySegment { index: usize },
    #[error("invalid line range segment {0:?}: expected N or N-M")]
    InvalidSegment(String),
    #[error("line numbers start at 1, got {0:?}")]
    ZeroLine(String),
    #[error("inverted range {0:?}: start is greater than end")]
    InvertedRange(String),
    #[error("line number in {segment:?} exceeds the maximum of {max}")]
    TooLarge { segment: String, max: usize },
}

impl FormatError {
    /// The segment of the expression that caused the error, if any.
    pub fn segment(&self) -> Option<&str> {
        match self {
            FormatError::Empty | FormatError::EmptySegment { .. } => None,
            FormatError::InvalidSegment(s)
            | FormatError::ZeroLine(s)
            | FormatError::InvertedRange(s) => Some(s),
            FormatError::TooLarge { segment, .. } => Some(segment),
        }
    }
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("unsupported export format {0:?} (expected one of: {})", crate::export::ExportFormat::tag_list())]
    UnsupportedFormat(String),
    #[error("failed to build PDF: {0}")]
    Pdf(String),
    #[error("failed to build DOCX: {0}")]
    Docx(String),
}
