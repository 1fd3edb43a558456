use super::cursor::{required, Cursor};
use super::RecordGrammar;
use crate::error::GrammarError;
use crate::types::{fields, Paragraph, RawRecord, RecordKind, DISSOLUTION_ACT_VALUE};

const DISSOLUTION_KEYWORD: &str = "Disolución";
const DISSOLUTION_ANCHOR: &str = "Disolución.";

/// Grammar for company dissolution ("Extinción") records.
///
/// Only the header line is mandatory. The dissolution clause, when the word
/// appears at all, is the sentence that follows it.
#[derive(Debug, Default, Clone, Copy)]
pub struct DissolutionGrammar;

impl DissolutionGrammar {
    pub fn new() -> Self {
        Self
    }

    pub fn parse_text(&self, text: &str) -> Result<RawRecord, GrammarError> {
        let mut record = RawRecord::new(RecordKind::Dissolution);
        let mut cursor = Cursor::new(text);

        let header = cursor.take_until("header", "\n")?;
        let mut header = Cursor::new(header);
        let code = header.take_until("header code", "-")?;

        record.set(fields::ID, required(code, "header code", fields::ID)?);
        record.set(
            fields::NAME,
            required(header.rest(), "header name", fields::NAME)?,
        );
        record.set(fields::DISSOLUTION_ACT, DISSOLUTION_ACT_VALUE);

        if let Some(clause) = Self::dissolution_clause(cursor.rest()) {
            record.set(fields::DISSOLUTION, clause);
        }

        Ok(record)
    }

    /// Sentence after "Disolución." (or after the bare word when the period
    /// is missing), up to the next period
    fn dissolution_clause(body: &str) -> Option<String> {
        if !body.contains(DISSOLUTION_KEYWORD) {
            return None;
        }
        let mut cursor = Cursor::new(body);
        if cursor.try_take_until(DISSOLUTION_ANCHOR).is_none() {
            cursor.try_take_until(DISSOLUTION_KEYWORD)?;
        }
        let clause = cursor.rest().split('.').next().unwrap_or_default();
        Some(clause.trim().to_string())
    }
}

impl RecordGrammar for DissolutionGrammar {
    fn kind(&self) -> RecordKind {
        RecordKind::Dissolution
    }

    fn parse(&self, paragraph: &Paragraph) -> Result<RawRecord, GrammarError> {
        self.parse_text(&paragraph.text)
    }

    fn name(&self) -> &str {
        "Dissolution"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_header_and_clause() {
        let record = DissolutionGrammar::new()
            .parse_text("654321-BETA SA.\nExtinción. Disolución. Acordada por la junta general.Otros datos.")
            .unwrap();

        let fields: Vec<(&str, &str)> = record.fields().collect();
        assert_eq!(
            fields,
            vec![
                ("Id", "654321"),
                ("nombre", "BETA SA."),
                ("Actolegal", "Extinción"),
                ("Disolución", "Acordada por la junta general"),
            ]
        );
        assert_eq!(record.kind, RecordKind::Dissolution);
    }

    #[test]
    fn clause_is_absent_without_the_keyword() {
        let record = DissolutionGrammar::new()
            .parse_text("654322-GAMMA SL.\nExtinción. Datos registrales. T 1, F 2.")
            .unwrap();

        assert_eq!(record.get(fields::DISSOLUTION_ACT), Some("Extinción"));
        assert!(!record.contains(fields::DISSOLUTION));
    }

    #[test]
    fn keyword_without_period_still_yields_a_clause() {
        let record = DissolutionGrammar::new()
            .parse_text("654323-DELTA SL.\nExtinción. Disolución voluntaria. Datos.")
            .unwrap();

        assert_eq!(record.get(fields::DISSOLUTION), Some("voluntaria"));
    }

    #[test]
    fn header_needs_a_line_break_and_a_dash() {
        let grammar = DissolutionGrammar::new();
        assert!(matches!(
            grammar.parse_text("654321-BETA SA. Extinción."),
            Err(GrammarError::MissingAnchor { step: "header", .. })
        ));
        assert!(matches!(
            grammar.parse_text("654321 BETA SA.\nExtinción."),
            Err(GrammarError::MissingAnchor { step: "header code", .. })
        ));
    }
}
