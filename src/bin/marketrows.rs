//! marketrows CLI - ingest demographic CSV exports into normalized records
//!
//! Reads an export, upserts one record per row into an in-memory store keyed
//! by the content-derived id, and writes the resulting documents as NDJSON or
//! a JSON array. The per-row report goes to stderr.

use clap::{Parser, Subcommand, ValueEnum};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::process;
use tracing_subscriber::EnvFilter;

use marketrows::decode::{RangeTable, AGE_RANGE, HOME_VALUE, HOUSEHOLD_INCOME, TENURE, WEALTH};
use marketrows::identity;
use marketrows::record::columns;
use marketrows::{HeaderIndex, IngestConfig, Ingestor, MemoryStore, OutputFormat, Record, RecordWriter};

#[derive(Parser)]
#[command(name = "marketrows")]
#[command(version, about = "Ingest demographic CSV exports into normalized, geo-aware records", long_about = None)]
struct Cli {
    /// YAML configuration file (MARKETROWS_* variables override it)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Ingest a CSV export and write the resulting documents
    Ingest {
        /// CSV export with a header line
        #[arg(short, long)]
        input: PathBuf,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format (ndjson, json) - overrides config
        #[arg(short, long)]
        format: Option<OutputFormat>,

        /// Attach decoded income/home value/wealth/age/tenure estimates
        #[arg(long)]
        estimates: bool,
    },

    /// Show how a CSV header resolves
    InspectHeader {
        /// CSV export (only the first line is read)
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Print the record id for an address
    Id {
        #[arg(long)]
        address: String,

        #[arg(long)]
        city: String,

        #[arg(long)]
        state: String,
    },

    /// Decode a categorical label to its representative value
    Decode {
        #[arg(short, long, value_enum)]
        kind: DecodeKind,

        /// Raw label, e.g. "$100,000 to $124,999"
        raw: String,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum DecodeKind {
    Income,
    HomeValue,
    Wealth,
    Age,
    Tenure,
}

fn main() {
    let cli = Cli::parse();

    dotenv::dotenv().ok();

    let config = match load_config(cli.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    init_tracing(&config.log_filter);

    let result = match cli.command {
        Commands::Ingest { input, output, format, estimates } => {
            ingest(config, input, output, format, estimates)
        }
        Commands::InspectHeader { input } => inspect_header(input),
        Commands::Id { address, city, state } => print_id(&address, &city, &state),
        Commands::Decode { kind, raw } => {
            decode(kind, &raw);
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn load_config(path: Option<PathBuf>) -> Result<IngestConfig, String> {
    let config = match path {
        Some(path) => IngestConfig::load_from_file(&path).map_err(|e| e.to_string())?,
        None => IngestConfig::default(),
    };
    config.with_env_overrides().map_err(|e| e.to_string())
}

fn init_tracing(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Ingest an export and write documents
fn ingest(
    mut config: IngestConfig,
    input: PathBuf,
    output: Option<PathBuf>,
    format: Option<OutputFormat>,
    estimates: bool,
) -> Result<(), String> {
    if let Some(format) = format {
        config.output_format = format;
    }
    if estimates {
        config.include_estimates = true;
    }

    let ingestor = Ingestor::new(config.clone());
    let mut store = MemoryStore::new();
    let report = ingestor
        .ingest_path(&input, &mut store)
        .map_err(|e| e.to_string())?;

    let records: Vec<Record> = store.load_all().map_err(|e| e.to_string())?;

    let sink: Box<dyn Write> = match &output {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).map_err(|e| format!("Failed to create {}: {}", path.display(), e))?,
        )),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };

    let mut writer = RecordWriter::new(sink, config.output_format, config.include_estimates)
        .map_err(|e| e.to_string())?;
    writer.write_all(&records).map_err(|e| e.to_string())?;
    let written = writer.written();
    writer.finish().map_err(|e| e.to_string())?;

    if let Some(path) = &output {
        tracing::info!("Wrote {} documents to {}", written, path.display());
    }

    let summary = serde_json::to_string_pretty(&report).map_err(|e| e.to_string())?;
    eprintln!("{}", summary);

    if report.has_failures() && config.fail_on_row_error {
        eprintln!("{} of {} rows failed", report.failed, report.rows.len());
        process::exit(2);
    }

    Ok(())
}

/// Print resolved columns and the known columns the header lacks
fn inspect_header(input: PathBuf) -> Result<(), String> {
    let contents = std::fs::read_to_string(&input)
        .map_err(|e| format!("Failed to read {}: {}", input.display(), e))?;
    let first_line = contents
        .lines()
        .next()
        .ok_or_else(|| format!("{} is empty", input.display()))?;

    let header = HeaderIndex::parse(first_line.trim_start_matches('\u{feff}'));

    println!("Resolved columns:");
    for (name, index) in header.columns() {
        let marker = if columns::ALL.contains(&name) { "✓" } else { " " };
        println!("  {} [{}] {}", marker, index, name);
    }

    for name in header.duplicates() {
        println!("  ⚠ '{}' appears more than once; the last occurrence is used", name);
    }

    let missing = header.missing(columns::ALL);
    if missing.is_empty() {
        println!("All known columns present");
    } else {
        println!("Missing columns:");
        for name in missing {
            let note = if columns::IDENTITY.contains(&name) { " (required)" } else { "" };
            println!("  - {}{}", name, note);
        }
    }

    Ok(())
}

fn print_id(address: &str, city: &str, state: &str) -> Result<(), String> {
    let id = identity::record_id(Some(address), Some(city), Some(state)).map_err(|e| e.to_string())?;
    println!("{}", id);
    Ok(())
}

fn decode(kind: DecodeKind, raw: &str) {
    let (table, value) = match kind {
        DecodeKind::Income => lookup(&HOUSEHOLD_INCOME, raw, |v| v.to_string()),
        DecodeKind::HomeValue => lookup(&HOME_VALUE, raw, |v| v.to_string()),
        DecodeKind::Wealth => lookup(&WEALTH, raw, |v| v.to_string()),
        DecodeKind::Age => lookup(&AGE_RANGE, raw, |v| v.to_string()),
        DecodeKind::Tenure => lookup(&TENURE, raw, |t| t.code().to_string()),
    };

    match value {
        Some(value) => println!("{}", value),
        None => {
            tracing::warn!("No {} bucket matches {:?}", table, raw);
            println!("unknown");
        }
    }
}

fn lookup<T: Copy + 'static>(
    table: &RangeTable<T>,
    raw: &str,
    render: impl Fn(T) -> String,
) -> (&'static str, Option<String>) {
    (table.name, table.decode(Some(raw)).map(render))
}
