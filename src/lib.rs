//! Local text handling for a code & documentation assistant: cleaning fetched
//! documentation, picking out code lines, pulling code blocks from model
//! output and exporting generated notes.

pub mod blocks;
pub mod config;
pub mod error;
pub mod export;
pub mod lines;
pub mod normalize;

pub use blocks::{extract_code_blocks, CodeBlock};
pub use error::{ExportError, FormatError};
pub use export::{export, Export, ExportFormat};
pub use lines::{parse_line_numbers, render_numbered, select_lines, SelectedLine};
pub use normalize::clean_content;
