// BORME Core Library
//
// Turns the extracted text of mercantile-registry bulletins into company
// records: cleaning, segmentation into numbered paragraphs, per-type
// grammars producing raw field maps, and normalization into a fixed
// tabular schema.

pub mod types;
pub mod error;
pub mod observer;
pub mod config;
pub mod preprocessors;
pub mod segmenter;
pub mod classifier;
pub mod grammar;
pub mod normalizer;
pub mod processor;
pub mod storage;

// Re-export main types and functions for easy use
pub use types::*;
pub use error::{FieldError, GrammarError, PipelineError};
pub use observer::{Level, MemoryObserver, NullObserver, Observer, TracingObserver};
pub use config::{PipelineConfig, TrailingParagraph};
pub use preprocessors::{Preprocessor, TextCleaner};
pub use segmenter::Segmenter;
pub use classifier::RecordClassifier;
pub use grammar::{DissolutionGrammar, IncorporationGrammar, RecordGrammar, RecordParser};
pub use normalizer::Normalizer;
pub use processor::{BulletinOutcome, BulletinProcessor, BulletinStats, PipelineStages};
pub use storage::{read_raw_records, FileSink, NoOpSink, RecordSink};
