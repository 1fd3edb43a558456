use crate::config::PipelineConfig;
use crate::error::PipelineError;
use crate::grammar::RecordParser;
use crate::normalizer::Normalizer;
use crate::observer::Observer;
use crate::preprocessors::{Preprocessor, TextCleaner};
use crate::segmenter::Segmenter;
use crate::types::*;
use anyhow::Result;
use rayon::prelude::*;
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Captured intermediate outputs from each pipeline stage
/// Used for testing and diagnostics: lets you inspect/compare each boundary
#[derive(Debug, Clone, Default, Serialize)]
pub struct PipelineStages {
    pub paragraphs: Vec<Paragraph>,
    pub raw_records: Vec<RawRecord>,
    pub normalized: Vec<NormalizedRecord>,
}

/// Per-bulletin counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BulletinStats {
    pub paragraphs: usize,
    pub parsed: usize,
    pub unmodeled: usize,
    pub unrecognized: usize,
    pub normalized: usize,
    pub dropped: usize,
    pub field_failures: usize,
}

impl BulletinStats {
    pub fn merge(&mut self, other: &BulletinStats) {
        self.paragraphs += other.paragraphs;
        self.parsed += other.parsed;
        self.unmodeled += other.unmodeled;
        self.unrecognized += other.unrecognized;
        self.normalized += other.normalized;
        self.dropped += other.dropped;
        self.field_failures += other.field_failures;
    }
}

#[derive(Debug, Clone)]
pub struct BulletinOutcome {
    pub bulletin_id: String,
    pub stages: PipelineStages,
    pub stats: BulletinStats,
}

/// Simple profiler that collects timings for pipeline steps
pub struct StepProfiler {
    enabled: bool,
    timings: Vec<(String, Duration)>,
}

impl StepProfiler {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            timings: Vec::new(),
        }
    }

    pub fn time_step<F, R>(&mut self, step_name: &str, f: F) -> R
    where
        F: FnOnce() -> R,
    {
        if !self.enabled {
            return f();
        }

        let start = Instant::now();
        let result = f();
        self.timings.push((step_name.to_string(), start.elapsed()));
        result
    }

    pub fn timings(&self) -> &[(String, Duration)] {
        &self.timings
    }

    pub fn report(&self, bulletin_id: &str, observer: &dyn Observer) {
        if !self.enabled || self.timings.is_empty() {
            return;
        }

        let total: Duration = self.timings.iter().map(|(_, d)| *d).sum();
        for (step, duration) in &self.timings {
            observer.info(
                "Step timing",
                &[
                    ("bulletin", bulletin_id),
                    ("step", step.as_str()),
                    ("micros", duration.as_micros().to_string().as_str()),
                ],
            );
        }
        observer.info(
            "Bulletin timing",
            &[
                ("bulletin", bulletin_id),
                ("micros", total.as_micros().to_string().as_str()),
            ],
        );
    }
}

pub struct BulletinProcessor {
    preprocessor: Box<dyn Preprocessor>,
    segmenter: Segmenter,
    parser: RecordParser,
    normalizer: Normalizer,
    observer: Arc<dyn Observer>,
    profiling: bool,
}

impl BulletinProcessor {
    /// Create BulletinProcessor with full dependency injection
    pub fn new_with_dependencies(
        preprocessor: Box<dyn Preprocessor>,
        config: &PipelineConfig,
        observer: Arc<dyn Observer>,
    ) -> Self {
        Self {
            preprocessor,
            segmenter: Segmenter::new(config.segmenter.clone(), observer.clone()),
            parser: RecordParser::new(observer.clone()),
            normalizer: Normalizer::new(observer.clone()),
            observer,
            profiling: false,
        }
    }

    /// Convenience constructor using the default text cleaner
    pub fn new(config: &PipelineConfig, observer: Arc<dyn Observer>) -> Result<Self> {
        let preprocessor = Box::new(TextCleaner::new(&config.cleaner)?);
        Ok(Self::new_with_dependencies(preprocessor, config, observer))
    }

    pub fn with_profiling(mut self, enabled: bool) -> Self {
        self.profiling = enabled;
        self
    }

    pub fn observer(&self) -> &Arc<dyn Observer> {
        &self.observer
    }

    /// Clean an extracted text file into a bulletin named after its stem
    pub fn load_bulletin(&self, path: &Path) -> Result<Bulletin> {
        let id = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("bulletin")
            .to_string();
        let text = self.preprocessor.clean_file(path)?;
        Ok(Bulletin::new(id, text))
    }

    /// Segment, parse and normalize one cleaned bulletin
    pub fn process_bulletin(&self, bulletin: &Bulletin) -> Result<BulletinOutcome, PipelineError> {
        let mut profiler = StepProfiler::new(self.profiling);
        let id = bulletin.id.as_str();

        let paragraphs = profiler.time_step("1. Segmentation", || self.segmenter.segment(bulletin))?;
        let parsed = profiler.time_step("2. Record parsing", || {
            self.parser.parse_all(id, &paragraphs)
        });
        let normalized = profiler.time_step("3. Normalization", || {
            self.normalizer.normalize_all(id, &parsed.records)
        });
        profiler.report(id, self.observer.as_ref());

        let stats = BulletinStats {
            paragraphs: paragraphs.len(),
            parsed: parsed.records.len(),
            unmodeled: parsed.unmodeled,
            unrecognized: parsed.unrecognized.len(),
            normalized: normalized.records.len(),
            dropped: normalized.dropped.len(),
            field_failures: normalized.field_failures.len(),
        };

        self.observer.info(
            "Processed bulletin",
            &[
                ("bulletin", id),
                ("paragraphs", stats.paragraphs.to_string().as_str()),
                ("records", stats.parsed.to_string().as_str()),
                ("unrecognized", stats.unrecognized.to_string().as_str()),
                ("field_failures", stats.field_failures.to_string().as_str()),
            ],
        );

        Ok(BulletinOutcome {
            bulletin_id: bulletin.id.clone(),
            stages: PipelineStages {
                paragraphs,
                raw_records: parsed.records,
                normalized: normalized.records,
            },
            stats,
        })
    }

    /// Only the extraction stage: paragraphs → raw records
    pub fn extract_records(&self, bulletin: &Bulletin) -> Result<Vec<RawRecord>, PipelineError> {
        let paragraphs = self.segmenter.segment(bulletin)?;
        Ok(self.parser.parse_all(&bulletin.id, &paragraphs).records)
    }

    /// Only the normalization stage
    pub fn normalize_records(&self, bulletin_id: &str, records: &[RawRecord]) -> Vec<NormalizedRecord> {
        self.normalizer.normalize_all(bulletin_id, records).records
    }

    /// Process bulletins in parallel; each bulletin fails on its own
    pub fn process_batch(&self, bulletins: &[Bulletin]) -> Vec<Result<BulletinOutcome, PipelineError>> {
        bulletins
            .par_iter()
            .map(|bulletin| {
                self.process_bulletin(bulletin).map_err(|err| {
                    self.observer.error(
                        &format!("Abandoning bulletin: {err}"),
                        &[("bulletin", bulletin.id.as_str())],
                    );
                    err
                })
            })
            .collect()
    }
}
