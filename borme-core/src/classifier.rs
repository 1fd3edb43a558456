use crate::types::{Paragraph, RecordKind};

/// Record-type keywords, checked in order; the first hit wins
const KEYWORDS: [(&str, RecordKind); 2] = [
    ("Constitución", RecordKind::Incorporation),
    ("Extinción", RecordKind::Dissolution),
];

/// Decides which grammar, if any, applies to a paragraph
#[derive(Debug, Default, Clone, Copy)]
pub struct RecordClassifier;

impl RecordClassifier {
    pub fn new() -> Self {
        Self
    }

    /// `None` means the paragraph is a record type we do not model
    pub fn classify(&self, paragraph: &Paragraph) -> Option<RecordKind> {
        self.classify_text(&paragraph.text)
    }

    pub fn classify_text(&self, text: &str) -> Option<RecordKind> {
        KEYWORDS
            .iter()
            .find(|(keyword, _)| text.contains(keyword))
            .map(|(_, kind)| *kind)
    }

    pub fn keyword(kind: RecordKind) -> &'static str {
        KEYWORDS
            .iter()
            .find(|(_, k)| *k == kind)
            .map(|(keyword, _)| *keyword)
            .unwrap_or_default()
    }
}
