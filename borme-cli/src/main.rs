use anyhow::{anyhow, Result};
use clap::{Parser, ValueEnum};
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

// Import from borme-core
use borme_core::{
    read_raw_records, Bulletin, BulletinOutcome, BulletinProcessor, BulletinStats, FileSink,
    Observer, PipelineConfig, RecordSink, TracingObserver, TrailingParagraph,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Stage {
    /// Bulletin text → JSON-lines raw records
    Extract,
    /// JSON-lines raw records → CSV
    Normalize,
    /// Bulletin text → JSON-lines and CSV
    All,
}

#[derive(Parser)]
#[command(name = "borme")]
#[command(about = "Extract company records from mercantile-registry bulletin text")]
struct Args {
    /// Bulletin text file, JSON-lines file, or a directory of them
    #[arg(short, long, default_value = "bulletins")]
    input: String,

    /// Directory receiving jsonlines/ and csv/
    #[arg(short, long, default_value = "output")]
    output_dir: String,

    /// Path to custom config file (YAML format)
    #[arg(short, long)]
    config: Option<String>,

    /// Which part of the pipeline to run
    #[arg(short, long, value_enum, default_value = "all")]
    stage: Stage,

    /// Worker threads for the bulletin pool (default: one per core)
    #[arg(short, long)]
    jobs: Option<usize>,

    /// Literal written for absent values in CSV output
    #[arg(long)]
    placeholder: Option<String>,

    /// Drop the undelimited text after the last record code
    #[arg(long)]
    discard_trailing: bool,

    /// Enable per-step timings
    #[arg(long)]
    profile: bool,

    /// Dump paragraphs, raw records and normalized records per bulletin
    #[arg(long)]
    dump_stages: bool,

    /// Directory for stage dump output (default: test_outputs/stages)
    #[arg(long, default_value = "test_outputs/stages")]
    stages_dir: String,

    /// Show available config options and exit
    #[arg(long)]
    show_configs: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .try_init();

    println!("🦀 BORME Bulletin Parser");

    if args.show_configs {
        show_help();
        return Ok(());
    }

    let input = Path::new(&args.input);
    if !input.exists() {
        println!("⚠️  Input not found at: {}", args.input);
        println!("   Please check the path.");
        return Ok(());
    }

    let mut config = PipelineConfig::load_with_fallback(args.config.as_deref());
    if let Some(config_path) = &args.config {
        println!("📋 Loaded config from: {}", config_path);
    } else {
        println!("📋 Using default config");
    }

    // Apply CLI overrides to config
    if let Some(placeholder) = &args.placeholder {
        config.output.absent_placeholder = placeholder.clone();
    }
    if args.discard_trailing {
        config.segmenter.trailing_paragraph = TrailingParagraph::Discard;
    }
    tracing::debug!(?config, "Effective configuration");

    if let Some(jobs) = args.jobs {
        rayon::ThreadPoolBuilder::new()
            .num_threads(jobs)
            .build_global()?;
        println!("🧵 Using {} worker threads", jobs);
    }

    let observer: Arc<dyn Observer> = Arc::new(TracingObserver);
    let processor =
        BulletinProcessor::new(&config, observer.clone())?.with_profiling(args.profile);
    let sink = FileSink::new(&args.output_dir, &config.output.absent_placeholder)?;

    let stats = match args.stage {
        Stage::Normalize => run_normalize(input, &processor, &sink, observer.as_ref())?,
        Stage::Extract | Stage::All => run_bulletins(input, &args, &config, &processor, &sink)?,
    };

    println!("📊 Totals:");
    println!("   - Paragraphs: {}", stats.paragraphs);
    println!("   - Records parsed: {}", stats.parsed);
    println!("   - Unmodeled paragraphs: {}", stats.unmodeled);
    println!("   - Unrecognized paragraphs: {}", stats.unrecognized);
    println!("   - Records normalized: {}", stats.normalized);
    println!("   - Records dropped: {}", stats.dropped);
    println!("   - Field failures: {}", stats.field_failures);
    println!("💾 Output written to: {}", args.output_dir);

    Ok(())
}

/// File or directory → sorted list of accepted files
fn collect_inputs(input: &Path, accept: impl Fn(&Path) -> bool) -> Result<Vec<PathBuf>> {
    if input.is_file() {
        return Ok(vec![input.to_path_buf()]);
    }

    let mut paths = Vec::new();
    for entry in fs::read_dir(input)? {
        let path = entry?.path();
        if path.is_file() && accept(&path) {
            paths.push(path);
        }
    }
    paths.sort();
    Ok(paths)
}

fn run_bulletins(
    input: &Path,
    args: &Args,
    config: &PipelineConfig,
    processor: &BulletinProcessor,
    sink: &FileSink,
) -> Result<BulletinStats> {
    let paths = collect_inputs(input, |p| config.input.accepts(p))?;
    if paths.is_empty() {
        return Err(anyhow!("No bulletin files found in {}", input.display()));
    }
    println!("📄 Processing {} bulletin file(s)", paths.len());

    let mut bulletins = Vec::new();
    for path in &paths {
        match processor.load_bulletin(path) {
            Ok(bulletin) => bulletins.push(bulletin),
            Err(e) => eprintln!("❌ Failed to read {}: {e}", path.display()),
        }
    }

    let mut totals = BulletinStats::default();
    let mut failed = 0;
    for (bulletin, result) in bulletins.iter().zip(processor.process_batch(&bulletins)) {
        match result {
            Ok(outcome) => {
                write_outcome(&outcome, args.stage, sink)?;
                if args.dump_stages {
                    save_stages(bulletin, &outcome, &args.stages_dir)?;
                }
                totals.merge(&outcome.stats);
                println!(
                    "✅ {}: {} records from {} paragraphs",
                    outcome.bulletin_id, outcome.stats.parsed, outcome.stats.paragraphs
                );
            }
            Err(e) => {
                failed += 1;
                eprintln!("❌ {}: {e}", bulletin.id);
            }
        }
    }

    if failed > 0 {
        println!("⚠️  {} bulletin(s) could not be processed", failed);
    }
    Ok(totals)
}

fn write_outcome(outcome: &BulletinOutcome, stage: Stage, sink: &FileSink) -> Result<()> {
    sink.store_raw_records(&outcome.bulletin_id, &outcome.stages.raw_records)?;
    if stage == Stage::All {
        sink.store_normalized(&outcome.bulletin_id, &outcome.stages.normalized)?;
    }
    Ok(())
}

fn run_normalize(
    input: &Path,
    processor: &BulletinProcessor,
    sink: &FileSink,
    observer: &dyn Observer,
) -> Result<BulletinStats> {
    let is_jsonlines = |p: &Path| p.extension().and_then(|e| e.to_str()) == Some("json");
    let paths = collect_inputs(input, is_jsonlines)?;
    if paths.is_empty() {
        return Err(anyhow!("No JSON-lines files found in {}", input.display()));
    }
    println!("📄 Normalizing {} JSON-lines file(s)", paths.len());

    let results: Vec<Result<BulletinStats>> = paths
        .par_iter()
        .map(|path| {
            let bulletin_id = path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("bulletin")
                .to_string();
            let raw_records = read_raw_records(path, observer)?;
            let normalized = processor.normalize_records(&bulletin_id, &raw_records);
            sink.store_normalized(&bulletin_id, &normalized)?;

            Ok(BulletinStats {
                parsed: raw_records.len(),
                normalized: normalized.len(),
                dropped: raw_records.len() - normalized.len(),
                ..BulletinStats::default()
            })
        })
        .collect();

    let mut totals = BulletinStats::default();
    for (path, result) in paths.iter().zip(results) {
        match result {
            Ok(stats) => totals.merge(&stats),
            Err(e) => eprintln!("❌ {}: {e}", path.display()),
        }
    }
    Ok(totals)
}

fn show_help() {
    println!("\n📋 Available Configuration Options:");
    println!("  --config <path>         Load custom config file");
    println!("  --input <path>          Bulletin text file, JSON-lines file, or directory");
    println!("  --output-dir <path>     Directory receiving jsonlines/ and csv/");
    println!("  --stage <stage>         extract, normalize, or all");
    println!("  --jobs <n>              Worker threads for the bulletin pool");
    println!("  --placeholder <text>    Literal for absent CSV values (default: None)");
    println!("  --discard-trailing      Drop text after the last delimited record");

    println!("\n🔀 Stages:");
    println!("  extract     - bulletin text → jsonlines/<bulletin>.json");
    println!("  normalize   - jsonlines/<bulletin>.json → csv/<bulletin>.csv");
    println!("  all         - both, in one pass (default)");

    println!("\n📁 Config file sections (YAML, every key optional):");
    println!("  cleaner     - boilerplate_patterns, header_lines, page_separator");
    println!("  segmenter   - min_paragraph_chars, trailing_paragraph (keep|discard)");
    println!("  output      - absent_placeholder");
    println!("  input       - extensions, skip_stem_suffixes");

    println!("\n📝 Usage Examples:");
    println!("  cargo run -- -i bulletins/ -o output/");
    println!("  cargo run -- -i output/jsonlines -s normalize");
    println!("  cargo run -- -i BORME-A-2021-1-28.txt --dump-stages --profile");
    println!("  RUST_LOG=debug cargo run -- -i bulletins/ -c configs/default.yaml");
}

fn save_stages(bulletin: &Bulletin, outcome: &BulletinOutcome, stages_dir: &str) -> Result<()> {
    let output_dir = Path::new(stages_dir).join(&outcome.bulletin_id);
    fs::create_dir_all(&output_dir)?;

    // Stage 0: Cleaned text
    let text_path = output_dir.join("stage0_cleaned.txt");
    fs::write(&text_path, &bulletin.text)?;
    println!("  💾 {}", text_path.display());

    // Stage 1: Paragraphs
    let paragraphs_path = output_dir.join("stage1_paragraphs.json");
    fs::write(
        &paragraphs_path,
        serde_json::to_string_pretty(&outcome.stages.paragraphs)?,
    )?;
    println!(
        "  💾 {} ({} paragraphs)",
        paragraphs_path.display(),
        outcome.stages.paragraphs.len()
    );

    // Stage 2: Raw records
    let raw_path = output_dir.join("stage2_raw_records.json");
    fs::write(
        &raw_path,
        serde_json::to_string_pretty(&outcome.stages.raw_records)?,
    )?;
    println!(
        "  💾 {} ({} records)",
        raw_path.display(),
        outcome.stages.raw_records.len()
    );

    // Stage 3: Normalized records
    let normalized_path = output_dir.join("stage3_normalized.json");
    fs::write(
        &normalized_path,
        serde_json::to_string_pretty(&outcome.stages.normalized)?,
    )?;
    println!(
        "  💾 {} ({} records)",
        normalized_path.display(),
        outcome.stages.normalized.len()
    );

    // Summary file: quick reference for validation scripts
    let summary = serde_json::json!({
        "bulletin": outcome.bulletin_id,
        "captured_at": chrono::Utc::now().to_rfc3339(),
        "stats": outcome.stats,
    });
    let summary_path = output_dir.join("summary.json");
    fs::write(&summary_path, serde_json::to_string_pretty(&summary)?)?;
    println!("  💾 {}", summary_path.display());

    Ok(())
}
