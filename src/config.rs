use std::path::Path;

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::Deserialize;

pub const ENV_PREFIX: &str = "CODEDOC";
pub const DEFAULT_CONFIG_FILE: &str = "codedoc.toml";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Snippets longer than this (in bytes) are refused by `lines`.
    pub max_code_length: usize,
    pub supported_languages: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            max_code_length: 5000,
            supported_languages: [
                "python",
                "javascript",
                "java",
                "cpp",
                "rust",
                "go",
                "ruby",
                "php",
                "swift",
                "kotlin",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
        }
    }
}

impl Settings {
    /// Defaults, overlaid by the config file (optional unless given
    /// explicitly), overlaid by `CODEDOC_*` environment variables.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let file = match path {
            Some(p) => File::from(p).required(true),
            None => File::with_name(DEFAULT_CONFIG_FILE).required(false),
        };

        Config::builder()
            .add_source(file)
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("supported_languages"),
            )
            .build()
            .and_then(|c| c.try_deserialize::<Settings>())
            .context("Failed to load settings")
    }

    pub fn supports_language(&self, language: &str) -> bool {
        self.supported_languages
            .iter()
            .any(|l| l.eq_ignore_ascii_case(language))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let s = Settings::default();
        assert_eq!(s.max_code_length, 5000);
        assert_eq!(s.supported_languages.len(), 10);
        assert!(s.supports_language("Rust"));
        assert!(!s.supports_language("cobol"));
    }

    #[test]
    fn test_missing_default_file_is_fine() {
        let s = Settings::load(None).unwrap();
        assert!(s.max_code_length > 0);
    }

    #[test]
    fn test_file_overrides_defaults() {
        let dir = std::env::temp_dir().join(format!("codedoc-cfg-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("codedoc.toml");
        std::fs::write(&path, "max_code_length = 42\nsupported_languages = [\"zig\"]\n").unwrap();

        let s = Settings::load(Some(&path)).unwrap();
        assert_eq!(s.max_code_length, 42);
        assert_eq!(s.supported_languages, vec!["zig".to_string()]);

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_explicit_missing_file_errors() {
        let path = std::env::temp_dir().join("codedoc-does-not-exist.toml");
        assert!(Settings::load(Some(&path)).is_err());
    }
}
