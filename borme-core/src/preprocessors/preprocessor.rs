// Preprocessor abstraction for bulletin text
//
// This module defines the boundary between text acquisition (pages extracted
// by some external tool) and record extraction (cleaned text -> paragraphs).

use anyhow::Result;
use std::path::Path;

/// Preprocessor trait - converts extracted pages into one cleaned text blob
///
/// Everything after this point works with the cleaned string and never sees
/// page boundaries or page furniture again.
pub trait Preprocessor: Send + Sync {
    /// Clean the pages of one bulletin and join them
    fn clean_pages(&self, pages: &[&str]) -> String;

    /// Split a whole extracted file into pages
    fn split_pages<'a>(&self, raw: &'a str) -> Vec<&'a str>;

    /// Convenience method: clean an already-extracted file's content
    fn clean_document(&self, raw: &str) -> String {
        let pages = self.split_pages(raw);
        self.clean_pages(&pages)
    }

    /// Convenience method: read and clean a text file
    fn clean_file(&self, input: &Path) -> Result<String> {
        let raw = std::fs::read_to_string(input)?;
        Ok(self.clean_document(&raw))
    }

    /// Get preprocessor name for debugging/logging
    fn name(&self) -> &str;
}
