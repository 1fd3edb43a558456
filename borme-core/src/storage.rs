use crate::observer::Observer;
use crate::types::{NormalizedRecord, RawRecord, TABULAR_COLUMNS};
use anyhow::{anyhow, Context, Result};
use std::fs;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Storage abstraction for the two pipeline outputs
pub trait RecordSink: Send + Sync {
    // Extraction stage: one JSON object per line
    fn store_raw_records(&self, bulletin_id: &str, records: &[RawRecord]) -> Result<()>;

    // Normalization stage: one tabular row per record
    fn store_normalized(&self, bulletin_id: &str, records: &[NormalizedRecord]) -> Result<()>;
}

/// File-based sink writing `jsonlines/` and `csv/` under an output directory
pub struct FileSink {
    output_dir: PathBuf,
    placeholder: String,
}

impl FileSink {
    pub fn new(output_dir: impl AsRef<Path>, placeholder: &str) -> Result<Self> {
        let output_dir = output_dir.as_ref().to_path_buf();
        fs::create_dir_all(output_dir.join("jsonlines"))?;
        fs::create_dir_all(output_dir.join("csv"))?;

        Ok(Self {
            output_dir,
            placeholder: placeholder.to_string(),
        })
    }

    pub fn jsonlines_path(&self, bulletin_id: &str) -> PathBuf {
        self.output_dir
            .join("jsonlines")
            .join(format!("{bulletin_id}.json"))
    }

    pub fn csv_path(&self, bulletin_id: &str) -> PathBuf {
        self.output_dir.join("csv").join(format!("{bulletin_id}.csv"))
    }
}

impl RecordSink for FileSink {
    fn store_raw_records(&self, bulletin_id: &str, records: &[RawRecord]) -> Result<()> {
        let path = self.jsonlines_path(bulletin_id);
        let file = fs::File::create(&path)
            .with_context(|| format!("Failed to create {}", path.display()))?;
        let mut writer = BufWriter::new(file);
        for record in records {
            serde_json::to_writer(&mut writer, record)
                .map_err(|e| anyhow!("Failed to serialize raw record: {}", e))?;
            writer.write_all(b"\n")?;
        }
        writer.flush()?;
        Ok(())
    }

    fn store_normalized(&self, bulletin_id: &str, records: &[NormalizedRecord]) -> Result<()> {
        let path = self.csv_path(bulletin_id);
        let mut writer = csv::Writer::from_path(&path)
            .with_context(|| format!("Failed to create {}", path.display()))?;
        writer.write_record(TABULAR_COLUMNS)?;
        for record in records {
            writer.write_record(record.to_row(&self.placeholder))?;
        }
        writer.flush()?;
        Ok(())
    }
}

/// No-op sink that discards all output
pub struct NoOpSink;

impl Default for NoOpSink {
    fn default() -> Self {
        Self::new()
    }
}

impl NoOpSink {
    pub fn new() -> Self {
        Self
    }
}

impl RecordSink for NoOpSink {
    fn store_raw_records(&self, _bulletin_id: &str, _records: &[RawRecord]) -> Result<()> {
        Ok(()) // No-op
    }

    fn store_normalized(&self, _bulletin_id: &str, _records: &[NormalizedRecord]) -> Result<()> {
        Ok(()) // No-op
    }
}

/// Read an extraction-stage file back. Lines that do not decode are
/// reported and skipped.
pub fn read_raw_records(path: &Path, observer: &dyn Observer) -> Result<Vec<RawRecord>> {
    let file =
        fs::File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let file_name = path.display().to_string();

    let mut records = Vec::new();
    for (index, line) in BufReader::new(file).lines().enumerate() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match serde_json::from_str::<RawRecord>(line) {
            Ok(record) => records.push(record),
            Err(e) => observer.error(
                &format!("Failed to decode raw record: {e}"),
                &[
                    ("file", file_name.as_str()),
                    ("line", (index + 1).to_string().as_str()),
                ],
            ),
        }
    }
    Ok(records)
}
