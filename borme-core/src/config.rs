use anyhow::Result;
use serde::{Deserialize, Serialize};

// Default value functions for serde
fn default_boilerplate_patterns() -> Vec<String> {
    vec![
        r"^BOLETÍN OFICIAL".to_string(),
        r"^Núm\.".to_string(),
        r"^cv".to_string(),
        r"^Verificable en https://www\.boe\.es".to_string(),
        r"^https".to_string(),
    ]
}

fn default_header_lines() -> usize {
    4 // Masthead lines left after boilerplate removal
}

fn default_page_separator() -> char {
    '\u{0c}' // Form feed, as written by pdftotext and friends
}

fn default_min_paragraph_chars() -> usize {
    40 // Shorter than any real record; flags a premature split
}

fn default_placeholder() -> String {
    "None".to_string()
}

fn default_skip_stem_suffixes() -> Vec<String> {
    vec!["99".to_string()] // Bulletin index file
}

fn default_extensions() -> Vec<String> {
    vec!["txt".to_string()]
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PipelineConfig {
    #[serde(default)]
    pub cleaner: CleanerConfig,
    #[serde(default)]
    pub segmenter: SegmenterConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub input: InputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CleanerConfig {
    /// Regex patterns; a trimmed line matching any of them is dropped
    #[serde(default = "default_boilerplate_patterns")]
    pub boilerplate_patterns: Vec<String>,
    /// Lines dropped from the top after boilerplate removal
    #[serde(default = "default_header_lines")]
    pub header_lines: usize,
    /// Character separating pages in extracted text files
    #[serde(default = "default_page_separator")]
    pub page_separator: char,
}

impl Default for CleanerConfig {
    fn default() -> Self {
        Self {
            boilerplate_patterns: default_boilerplate_patterns(),
            header_lines: default_header_lines(),
            page_separator: default_page_separator(),
        }
    }
}

/// What to do with the text after the last code whose successor never appears
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrailingParagraph {
    /// Emit it as the last paragraph, running to end of text
    #[default]
    Keep,
    /// Drop it and report how much text was lost
    Discard,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SegmenterConfig {
    /// Paragraphs shorter than this are reported as suspected premature splits
    #[serde(default = "default_min_paragraph_chars")]
    pub min_paragraph_chars: usize,
    #[serde(default)]
    pub trailing_paragraph: TrailingParagraph,
}

impl Default for SegmenterConfig {
    fn default() -> Self {
        Self {
            min_paragraph_chars: default_min_paragraph_chars(),
            trailing_paragraph: TrailingParagraph::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Literal written in the tabular output for absent values
    #[serde(default = "default_placeholder")]
    pub absent_placeholder: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            absent_placeholder: default_placeholder(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputConfig {
    /// File extensions picked up when the input is a directory
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
    /// Files whose stem ends with one of these are skipped
    #[serde(default = "default_skip_stem_suffixes")]
    pub skip_stem_suffixes: Vec<String>,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            extensions: default_extensions(),
            skip_stem_suffixes: default_skip_stem_suffixes(),
        }
    }
}

impl InputConfig {
    /// Whether a bulletin file should be processed
    pub fn accepts(&self, path: &std::path::Path) -> bool {
        let extension_ok = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| {
                self.extensions
                    .iter()
                    .any(|allowed| allowed.eq_ignore_ascii_case(e))
            })
            .unwrap_or(false);
        let skipped = path
            .file_stem()
            .and_then(|s| s.to_str())
            .map(|stem| {
                self.skip_stem_suffixes
                    .iter()
                    .any(|suffix| stem.ends_with(suffix.as_str()))
            })
            .unwrap_or(false);
        extension_ok && !skipped
    }
}

impl PipelineConfig {
    /// Load config from file path
    pub fn load_from_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: PipelineConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Load config with fallback to default
    pub fn load_with_fallback(path: Option<&str>) -> Self {
        match path {
            Some(p) => Self::load_from_file(p).unwrap_or_else(|e| {
                eprintln!("⚠️  Failed to load config from {}, using defaults: {}", p, e);
                Self::default()
            }),
            None => Self::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn partial_yaml_keeps_defaults() {
        let yaml = "segmenter:\n  trailing_paragraph: discard\n";
        let config: PipelineConfig = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(
            config.segmenter.trailing_paragraph,
            TrailingParagraph::Discard
        );
        assert_eq!(config.segmenter.min_paragraph_chars, 40);
        assert_eq!(config.cleaner.header_lines, 4);
        assert_eq!(config.output.absent_placeholder, "None");
    }

    #[test]
    fn empty_yaml_is_default() {
        let config: PipelineConfig = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config.cleaner.boilerplate_patterns.len(), 5);
        assert_eq!(config.segmenter.trailing_paragraph, TrailingParagraph::Keep);
    }

    #[test]
    fn input_filter_skips_index_files() {
        let input = InputConfig::default();
        assert!(input.accepts(Path::new("in/BORME-A-2024-1-28.txt")));
        assert!(input.accepts(Path::new("in/BORME-A-2024-1-28.TXT")));
        assert!(!input.accepts(Path::new("in/BORME-S-2024-1-99.txt")));
        assert!(!input.accepts(Path::new("in/BORME-A-2024-1-28.pdf")));
    }

    #[test]
    fn shipped_configs_load() {
        let configs = Path::new(env!("CARGO_MANIFEST_DIR")).join("../configs");

        let default =
            PipelineConfig::load_from_file(configs.join("default.yaml").to_str().unwrap()).unwrap();
        assert_eq!(
            default.cleaner.boilerplate_patterns,
            CleanerConfig::default().boilerplate_patterns
        );
        assert_eq!(default.cleaner.page_separator, '\u{0c}');
        assert_eq!(default.segmenter.trailing_paragraph, TrailingParagraph::Keep);

        let strict =
            PipelineConfig::load_from_file(configs.join("strict.yaml").to_str().unwrap()).unwrap();
        assert_eq!(strict.segmenter.trailing_paragraph, TrailingParagraph::Discard);
        assert_eq!(strict.output.absent_placeholder, "");
        assert_eq!(strict.cleaner.header_lines, 4);
    }

    #[test]
    fn fallback_on_missing_file() {
        let config = PipelineConfig::load_with_fallback(Some("/nonexistent/borme.yaml"));
        assert_eq!(config.output.absent_placeholder, "None");
    }
}
