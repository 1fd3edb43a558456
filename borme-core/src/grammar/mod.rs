// Record grammars - paragraph text → raw field maps
// This module coordinates the grammars; implementations are in:
// - cursor.rs: anchored, forward-only text cursor shared by every grammar
// - incorporation.rs: "Constitución" records
// - dissolution.rs: "Extinción" records
// - parser.rs: RecordParser, classification and dispatch

pub mod cursor;
pub mod dissolution;
pub mod incorporation;
pub mod parser;

use crate::error::GrammarError;
use crate::types::{Paragraph, RawRecord, RecordKind};

pub use dissolution::DissolutionGrammar;
pub use incorporation::IncorporationGrammar;
pub use parser::{ParseReport, RecordParser};

/// A field-extraction grammar for one record type
pub trait RecordGrammar: Send + Sync {
    fn kind(&self) -> RecordKind;

    fn parse(&self, paragraph: &Paragraph) -> Result<RawRecord, GrammarError>;

    fn name(&self) -> &str;
}
