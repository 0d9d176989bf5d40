//! Batch ingestion runtime.
//!
//! Everything outside the per-row transform lives here: configuration
//! loading and the driver that feeds a whole export into a store.

pub mod config_loader;
pub mod ingestor;

pub use config_loader::{ConfigError, IngestConfig};
pub use ingestor::{IngestError, IngestReport, Ingestor, RowReport, RowStatus};
