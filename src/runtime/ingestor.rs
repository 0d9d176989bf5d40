//! Batch ingestion driver.
//!
//! Resolves the header once, converts each data line into a [`Record`] and
//! upserts it into a [`DocumentStore`]. A row that fails (bad cells, missing
//! identity, store rejection) is reported and skipped; it never reaches the
//! store and never stops the rows after it, unless the configured failure
//! budget runs out.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

use crate::extraction::{split_row, HeaderIndex};
use crate::record::{columns, Record};
use crate::runtime::config_loader::IngestConfig;
use crate::store::{DocumentStore, UpsertOutcome};

#[derive(Debug)]
pub enum IngestError {
    /// Input has no header line.
    EmptyInput,
    Io { path: PathBuf, source: std::io::Error },
}

impl fmt::Display for IngestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IngestError::EmptyInput => write!(f, "Input is empty: expected a header line"),
            IngestError::Io { path, source } => {
                write!(f, "Failed to read {}: {}", path.display(), source)
            }
        }
    }
}

impl std::error::Error for IngestError {}

/// Outcome of one data line.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum RowStatus {
    Persisted { id: String, outcome: UpsertOutcome },
    Failed { kind: String, error: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RowReport {
    /// 1-based line number in the input, header included.
    pub line: usize,
    #[serde(flatten)]
    pub status: RowStatus,
}

/// Per-batch summary returned to the caller.
#[derive(Debug, Clone, Serialize)]
pub struct IngestReport {
    pub batch_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub persisted: usize,
    pub failed: usize,
    pub skipped: usize,
    /// Set when the failure budget stopped the batch early.
    pub aborted: bool,
    pub rows: Vec<RowReport>,
}

impl IngestReport {
    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }

    /// Ids persisted by this batch, in row order.
    pub fn persisted_ids(&self) -> impl Iterator<Item = &str> {
        self.rows.iter().filter_map(|row| match &row.status {
            RowStatus::Persisted { id, .. } => Some(id.as_str()),
            RowStatus::Failed { .. } => None,
        })
    }
}

/// Drives a CSV export into a document store.
#[derive(Debug, Clone, Default)]
pub struct Ingestor {
    config: IngestConfig,
}

impl Ingestor {
    pub fn new(config: IngestConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &IngestConfig {
        &self.config
    }

    /// Read a file and ingest it. See [`Ingestor::ingest_str`].
    pub fn ingest_path<P, S>(&self, path: P, store: &mut S) -> Result<IngestReport, IngestError>
    where
        P: AsRef<Path>,
        S: DocumentStore,
    {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| IngestError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        tracing::info!("Ingesting {}", path.display());
        self.ingest_str(&contents, store)
    }

    /// Ingest CSV text: a header line followed by data lines.
    ///
    /// # Errors
    /// Only `IngestError::EmptyInput`. Row problems are reported in the
    /// returned [`IngestReport`], not as errors.
    pub fn ingest_str<S: DocumentStore>(
        &self,
        csv: &str,
        store: &mut S,
    ) -> Result<IngestReport, IngestError> {
        let started_at = Utc::now();
        let batch_id = Uuid::new_v4();

        let mut lines = csv.lines().enumerate();
        let header_line = match lines.next() {
            Some((_, line)) => line.trim_start_matches('\u{feff}'),
            None => return Err(IngestError::EmptyInput),
        };

        let header = resolve_header(header_line);

        let mut report = IngestReport {
            batch_id,
            started_at,
            finished_at: started_at,
            persisted: 0,
            failed: 0,
            skipped: 0,
            aborted: false,
            rows: Vec::new(),
        };

        for (index, line) in lines {
            let line_no = index + 1;

            if self.config.skip_blank_lines && line.trim().is_empty() {
                report.skipped += 1;
                continue;
            }

            let status = ingest_line(&header, line, store);
            let failed = match &status {
                RowStatus::Persisted { .. } => {
                    report.persisted += 1;
                    false
                }
                RowStatus::Failed { kind, error } => {
                    tracing::warn!("Line {} rejected ({}): {}", line_no, kind, error);
                    report.failed += 1;
                    true
                }
            };
            report.rows.push(RowReport {
                line: line_no,
                status,
            });

            // Only a failed row can exhaust the budget; `Some(0)` stops at the first one.
            if failed && self.config.max_failures.is_some_and(|limit| report.failed >= limit) {
                tracing::warn!("Stopping batch {} after {} failed rows", batch_id, report.failed);
                report.aborted = true;
                break;
            }
        }

        report.finished_at = Utc::now();
        tracing::info!(
            "Batch {} finished: {} persisted, {} failed, {} skipped",
            batch_id,
            report.persisted,
            report.failed,
            report.skipped
        );

        Ok(report)
    }
}

fn resolve_header(line: &str) -> HeaderIndex {
    let header = HeaderIndex::parse(line);

    for name in header.duplicates() {
        tracing::warn!("Header column '{}' appears more than once; using the last one", name);
    }

    let missing_identity = header.missing(columns::IDENTITY);
    if !missing_identity.is_empty() {
        tracing::warn!(
            "Header lacks identity columns {:?}; every row will be rejected",
            missing_identity
        );
    }

    tracing::debug!(
        "Resolved {} columns, unmapped: {:?}",
        header.len(),
        header.missing(columns::ALL)
    );

    header
}

fn ingest_line<S: DocumentStore>(header: &HeaderIndex, line: &str, store: &mut S) -> RowStatus {
    let record = match Record::from_row(header, &split_row(line)) {
        Ok(record) => record,
        Err(err) => {
            return RowStatus::Failed {
                kind: err.kind().to_string(),
                error: err.to_string(),
            }
        }
    };

    match store.upsert(&record) {
        Ok(outcome) => RowStatus::Persisted {
            id: record.id().to_string(),
            outcome,
        },
        Err(err) => RowStatus::Failed {
            kind: "store".to_string(),
            error: err.to_string(),
        },
    }
}
