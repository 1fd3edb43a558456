use crate::config::CleanerConfig;
use crate::preprocessors::preprocessor::Preprocessor;
use anyhow::Result;
use regex::Regex;

/// Strips page furniture from extracted bulletin pages.
///
/// Lines are trimmed, blank lines and boilerplate lines are removed, then the
/// masthead (the first `header_lines` surviving lines) is dropped.
pub struct TextCleaner {
    patterns: Vec<Regex>,
    header_lines: usize,
    page_separator: char,
}

impl TextCleaner {
    pub fn new(config: &CleanerConfig) -> Result<Self> {
        // Compile patterns from config
        let mut patterns = Vec::new();
        for pattern_str in &config.boilerplate_patterns {
            patterns.push(Regex::new(pattern_str)?);
        }

        Ok(Self {
            patterns,
            header_lines: config.header_lines,
            page_separator: config.page_separator,
        })
    }

    fn is_boilerplate(&self, line: &str) -> bool {
        self.patterns.iter().any(|pattern| pattern.is_match(line))
    }
}

impl Preprocessor for TextCleaner {
    fn clean_pages(&self, pages: &[&str]) -> String {
        let full_text = pages.join("\n");
        full_text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !self.is_boilerplate(line))
            .skip(self.header_lines)
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn split_pages<'a>(&self, raw: &'a str) -> Vec<&'a str> {
        raw.split(self.page_separator).collect()
    }

    fn name(&self) -> &str {
        "TextCleaner"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cleaner() -> TextCleaner {
        TextCleaner::new(&CleanerConfig::default()).unwrap()
    }

    #[test]
    fn removes_boilerplate_and_masthead() {
        let page = "BOLETÍN OFICIAL DEL REGISTRO MERCANTIL\n\
                    Núm. 12 Miércoles 17 de enero de 2024\n\
                    SECCIÓN PRIMERA\n\
                    Empresarios\n\
                    Actos inscritos\n\
                    MADRID\n\
                    \n\
                    123456 - ACME SL.\n\
                    cve: BORME-A-2024-12-28\n\
                    Verificable en https://www.boe.es\n";

        let cleaned = cleaner().clean_pages(&[page]);
        assert_eq!(cleaned, "123456 - ACME SL.");
    }

    #[test]
    fn joins_pages_and_trims_lines() {
        let cleaner = TextCleaner::new(&CleanerConfig {
            header_lines: 0,
            ..CleanerConfig::default()
        })
        .unwrap();

        let raw = "  100001-A SL.  \nConstitución.\u{0c}100002-B SA.\n";
        let cleaned = cleaner.clean_document(raw);
        assert_eq!(cleaned, "100001-A SL.\nConstitución.\n100002-B SA.");
    }

    #[test]
    fn invalid_pattern_is_rejected() {
        let config = CleanerConfig {
            boilerplate_patterns: vec!["([unclosed".to_string()],
            ..CleanerConfig::default()
        };
        assert!(TextCleaner::new(&config).is_err());
    }
}
