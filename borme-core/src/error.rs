use thiserror::Error;

use crate::types::RecordKind;

/// Errors that stop a bulletin or a single record.
///
/// None of these are fatal to a run: the processor reports them through the
/// observer and moves on to the next unit of work.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PipelineError {
    /// Segmentation could not start; the whole bulletin is abandoned
    #[error("malformed bulletin {bulletin}: {reason}")]
    MalformedBulletin { bulletin: String, reason: String },

    /// A paragraph did not match the grammar of its record type
    #[error("unrecognized {kind:?} paragraph {code}: {source}")]
    UnrecognizedParagraph {
        code: String,
        kind: RecordKind,
        #[source]
        source: GrammarError,
    },

    /// A raw record is missing what every record must carry
    #[error("raw record {index} has the wrong shape: {reason}")]
    RecordShape { index: usize, reason: String },
}

/// The grammar step that failed while parsing a paragraph.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GrammarError {
    #[error("step '{step}': anchor {anchor:?} not found")]
    MissingAnchor {
        step: &'static str,
        anchor: &'static str,
    },

    #[error("step '{step}': field '{field}' is empty")]
    EmptyField {
        step: &'static str,
        field: &'static str,
    },
}

/// A single field could not be converted; the field becomes absent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("field '{field}' could not be normalized from {value:?}: {reason}")]
pub struct FieldError {
    pub field: &'static str,
    pub value: String,
    pub reason: String,
}

impl FieldError {
    pub fn new(field: &'static str, value: &str, reason: impl Into<String>) -> Self {
        Self {
            field,
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}
