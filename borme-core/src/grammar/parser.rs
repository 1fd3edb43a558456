use super::{DissolutionGrammar, IncorporationGrammar, RecordGrammar};
use crate::classifier::RecordClassifier;
use crate::error::PipelineError;
use crate::observer::Observer;
use crate::types::{Paragraph, RawRecord};
use std::sync::Arc;

/// Outcome of parsing every paragraph of one bulletin
#[derive(Debug, Clone, Default)]
pub struct ParseReport {
    pub records: Vec<RawRecord>,
    /// Paragraphs of a record type we do not model
    pub unmodeled: usize,
    /// Paragraphs whose grammar did not match
    pub unrecognized: Vec<PipelineError>,
}

pub struct RecordParser {
    classifier: RecordClassifier,
    grammars: Vec<Box<dyn RecordGrammar>>,
    observer: Arc<dyn Observer>,
}

impl RecordParser {
    pub fn new(observer: Arc<dyn Observer>) -> Self {
        Self::with_grammars(
            vec![
                Box::new(IncorporationGrammar::new()),
                Box::new(DissolutionGrammar::new()),
            ],
            observer,
        )
    }

    pub fn with_grammars(grammars: Vec<Box<dyn RecordGrammar>>, observer: Arc<dyn Observer>) -> Self {
        Self {
            classifier: RecordClassifier::new(),
            grammars,
            observer,
        }
    }

    /// Parse one paragraph.
    ///
    /// `Ok(None)` when the paragraph is not a modeled record type;
    /// `UnrecognizedParagraph` when its grammar does not match.
    pub fn parse(&self, paragraph: &Paragraph) -> Result<Option<RawRecord>, PipelineError> {
        let Some(kind) = self.classifier.classify(paragraph) else {
            return Ok(None);
        };
        let Some(grammar) = self.grammars.iter().find(|g| g.kind() == kind) else {
            return Ok(None);
        };

        grammar
            .parse(paragraph)
            .map(Some)
            .map_err(|source| PipelineError::UnrecognizedParagraph {
                code: paragraph.code.to_string(),
                kind,
                source,
            })
    }

    /// Parse every paragraph, skipping the ones that fail
    pub fn parse_all(&self, bulletin_id: &str, paragraphs: &[Paragraph]) -> ParseReport {
        let mut report = ParseReport::default();

        for paragraph in paragraphs {
            match self.parse(paragraph) {
                Ok(Some(record)) => report.records.push(record),
                Ok(None) => report.unmodeled += 1,
                Err(err) => {
                    self.observer.warn(
                        &format!("Skipping paragraph: {err}"),
                        &[
                            ("bulletin", bulletin_id),
                            ("code", paragraph.code.to_string().as_str()),
                        ],
                    );
                    report.unrecognized.push(err);
                }
            }
        }

        report
    }

    pub fn grammar_names(&self) -> Vec<&str> {
        self.grammars.iter().map(|g| g.name()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observer::{Level, MemoryObserver};
    use crate::types::{fields, RecordCode, RecordKind};

    fn paragraph(code: u64, text: &str) -> Paragraph {
        Paragraph {
            code: RecordCode(code),
            text: text.to_string(),
        }
    }

    #[test]
    fn unmodeled_paragraphs_are_not_errors() {
        let observer = Arc::new(MemoryObserver::new());
        let parser = RecordParser::new(observer.clone());
        let paragraphs = [
            paragraph(1, "1-A SL.\nNombramientos. Adm. Unico: PEREZ."),
            paragraph(2, "2-B SA.\nExtinción. Disolución. Voluntaria.Datos."),
        ];

        let report = parser.parse_all("b", &paragraphs);
        assert_eq!(report.records.len(), 1);
        assert_eq!(report.unmodeled, 1);
        assert!(report.unrecognized.is_empty());
        assert_eq!(observer.count_at(Level::Warn), 0);
    }

    #[test]
    fn grammar_failures_are_skipped_and_reported() {
        let observer = Arc::new(MemoryObserver::new());
        let parser = RecordParser::new(observer.clone());
        let paragraphs = [
            paragraph(10, "10-ROTA SL.\nConstitución de sociedad. Sin más datos."),
            paragraph(11, "11-BUENA SA.\nExtinción."),
        ];

        let report = parser.parse_all("b", &paragraphs);
        assert_eq!(report.records.len(), 1);
        assert_eq!(report.records[0].get(fields::ID), Some("11"));
        assert_eq!(report.unrecognized.len(), 1);
        assert!(matches!(
            &report.unrecognized[0],
            PipelineError::UnrecognizedParagraph { code, kind: RecordKind::Incorporation, .. } if code == "10"
        ));

        let warnings: Vec<_> = observer
            .events()
            .into_iter()
            .filter(|e| e.level == Level::Warn)
            .collect();
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].context_value("code"), Some("10"));
    }

    #[test]
    fn registers_both_grammars() {
        let parser = RecordParser::new(Arc::new(MemoryObserver::new()));
        assert_eq!(parser.grammar_names(), vec!["Incorporation", "Dissolution"]);
    }
}
