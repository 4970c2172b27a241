//! Line-range expressions ("1-3, 5, 7-9") and picking those lines from a snippet.

use std::collections::BTreeSet;

use serde::Serialize;
use tracing::warn;

use crate::error::FormatError;

/// Upper bound on any line number, keeps "1-4000000000" from eating memory.
pub const MAX_LINE_NUMBER: usize = 1_000_000;

/// Parse a comma-separated list of line numbers and inclusive `start-end`
/// ranges into ascending, deduplicated line numbers.
///
/// Inverted ranges (`"3-1"`) are rejected rather than read as empty.
pub fn parse_line_numbers(input: &str) -> Result<Vec<usize>, FormatError> {
    if input.trim().is_empty() {
        return Err(FormatError::Empty);
    }

    let mut numbers = BTreeSet::new();
    for (i, part) in input.split(',').enumerate() {
        let part = part.trim();
        if part.is_empty() {
            return Err(FormatError::EmptySegment { index: i + 1 });
        }

        match part.split_once('-') {
            Some((start, end)) => {
                let start = parse_number(start, part)?;
                let end = parse_number(end, part)?;
                if start > end {
                    return Err(FormatError::InvertedRange(part.to_string()));
                }
                numbers.extend(start..=end);
            }
            None => {
                numbers.insert(parse_number(part, part)?);
            }
        }
    }

    Ok(numbers.into_iter().collect())
}

fn parse_number(raw: &str, segment: &str) -> Result<usize, FormatError> {
    let raw = raw.trim();
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(FormatError::InvalidSegment(segment.to_string()));
    }
    let n: usize = raw.parse().map_err(|_| FormatError::TooLarge {
        segment: segment.to_string(),
        max: MAX_LINE_NUMBER,
    })?;
    if n == 0 {
        return Err(FormatError::ZeroLine(segment.to_string()));
    }
    if n > MAX_LINE_NUMBER {
        return Err(FormatError::TooLarge {
            segment: segment.to_string(),
            max: MAX_LINE_NUMBER,
        });
    }
    Ok(n)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectedLine {
    pub number: usize,
    pub text: String,
}

/// Pick the given 1-based lines out of `code`. Numbers past the end of the
/// snippet are skipped.
pub fn select_lines(code: &str, numbers: &[usize]) -> Vec<SelectedLine> {
    let lines: Vec<&str> = code.lines().collect();
    let mut wanted: Vec<usize> = numbers.to_vec();
    wanted.sort_unstable();
    wanted.dedup();

    let mut selected = Vec::with_capacity(wanted.len());
    let mut missing = 0usize;
    for n in wanted {
        match n.checked_sub(1).and_then(|i| lines.get(i)) {
            Some(text) => selected.push(SelectedLine {
                number: n,
                text: text.to_string(),
            }),
            None => missing += 1,
        }
    }

    if missing > 0 {
        warn!(
            missing,
            total_lines = lines.len(),
            "requested lines past the end of the snippet were skipped"
        );
    }
    selected
}

/// Render selected lines as a fenced block with right-aligned line numbers.
pub fn render_numbered(lines: &[SelectedLine], language: Option<&str>) -> String {
    let width = lines
        .iter()
        .map(|l| l.number.to_string().len())
        .max()
        .unwrap_or(1);

    let mut out = String::from("```");
    out.push_str(language.unwrap_or_default());
    out.push('\n');
    for line in lines {
        out.push_str(&format!("{:>width$} | {}\n", line.number, line.text, width = width));
    }
    out.push_str("```");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_mixed_expression() {
        assert_eq!(
            parse_line_numbers("1-3, 5, 7-9").unwrap(),
            vec![1, 2, 3, 5, 7, 8, 9]
        );
    }

    #[test]
    fn test_parse_single_and_degenerate() {
        assert_eq!(parse_line_numbers("5").unwrap(), vec![5]);
        assert_eq!(parse_line_numbers("2-2").unwrap(), vec![2]);
        assert_eq!(parse_line_numbers(" 4 - 6 ").unwrap(), vec![4, 5, 6]);
    }

    #[test]
    fn test_parse_overlapping_deduplicates() {
        assert_eq!(parse_line_numbers("1-3,2-4").unwrap(), vec![1, 2, 3, 4]);
        assert_eq!(parse_line_numbers("9, 1, 9, 3").unwrap(), vec![1, 3, 9]);
    }

    #[test]
    fn test_parse_rejects_bad_segments() {
        assert_eq!(
            parse_line_numbers("a-b"),
            Err(FormatError::InvalidSegment("a-b".into()))
        );
        assert_eq!(
            parse_line_numbers("1, x"),
            Err(FormatError::InvalidSegment("x".into()))
        );
        assert_eq!(
            parse_line_numbers("1-2-3"),
            Err(FormatError::InvalidSegment("1-2-3".into()))
        );
        assert_eq!(
            parse_line_numbers("-3"),
            Err(FormatError::InvalidSegment("-3".into()))
        );
        assert_eq!(
            parse_line_numbers("+3"),
            Err(FormatError::InvalidSegment("+3".into()))
        );
    }

    #[test]
    fn test_parse_rejects_inverted_range() {
        let err = parse_line_numbers("3-1").unwrap_err();
        assert_eq!(err, FormatError::InvertedRange("3-1".into()));
        assert_eq!(err.segment(), Some("3-1"));
    }

    #[test]
    fn test_parse_rejects_empty_and_zero() {
        assert_eq!(parse_line_numbers("   "), Err(FormatError::Empty));
        assert_eq!(
            parse_line_numbers("1,,2"),
            Err(FormatError::EmptySegment { index: 2 })
        );
        assert_eq!(
            parse_line_numbers("1, 2,"),
            Err(FormatError::EmptySegment { index: 3 })
        );
        assert_eq!(
            FormatError::EmptySegment { index: 2 }.to_string(),
            "line range segment 2 is empty"
        );
        assert_eq!(
            parse_line_numbers("0-2"),
            Err(FormatError::ZeroLine("0-2".into()))
        );
    }

    #[test]
    fn test_parse_rejects_huge_numbers() {
        assert!(matches!(
            parse_line_numbers("1-4000000000"),
            Err(FormatError::TooLarge { .. })
        ));
        assert!(matches!(
            parse_line_numbers("99999999999999999999999"),
            Err(FormatError::TooLarge { .. })
        ));
    }

    #[test]
    fn test_select_lines_skips_out_of_range() {
        let code = "a\nb\nc";
        let picked = select_lines(code, &[3, 1, 7, 1]);
        assert_eq!(
            picked,
            vec![
                SelectedLine { number: 1, text: "a".into() },
                SelectedLine { number: 3, text: "c".into() },
            ]
        );
    }

    #[test]
    fn test_render_numbered() {
        let code: String = (1..=10).map(|i| format!("line{}\n", i)).collect();
        let picked = select_lines(&code, &[9, 10]);
        assert_eq!(
            render_numbered(&picked, Some("rust")),
            "```rust\n 9 | line9\n10 | line10\n```"
        );
    }
}
