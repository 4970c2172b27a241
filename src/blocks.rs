use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

static FENCE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)```(\w+)?\n(.*?)\n```").unwrap());

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CodeBlock {
    pub language: String,
    pub code: String,
}

/// Pull fenced code blocks out of a Markdown response, in order.
/// Blocks without a language tag are reported as `text`.
pub fn extract_code_blocks(content: &str) -> Vec<CodeBlock> {
    FENCE_RE
        .captures_iter(content)
        .map(|caps| CodeBlock {
            language: caps
                .get(1)
                .map(|m| m.as_str().to_string())
                .unwrap_or_else(|| "text".to_string()),
            code: caps[2].trim().to_string(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_tagged_and_untagged() {
        let md = "Intro\n```rust\nfn main() {}\n```\ntext\n```\n  plain  \n```\n";
        let blocks = extract_code_blocks(md);
        assert_eq!(
            blocks,
            vec![
                CodeBlock { language: "rust".into(), code: "fn main() {}".into() },
                CodeBlock { language: "text".into(), code: "plain".into() },
            ]
        );
    }

    #[test]
    fn test_multiline_block() {
        let md = "```python\nimport os\n\nprint(os.getcwd())\n```";
        let blocks = extract_code_blocks(md);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].code, "import os\n\nprint(os.getcwd())");
    }

    #[test]
    fn test_unterminated_fence_ignored() {
        assert!(extract_code_blocks("```js\nlet x = 1;\n").is_empty());
        assert!(extract_code_blocks("no code here").is_empty());
    }
}
