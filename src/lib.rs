//! # marketrows: demographic CSV exports as normalized records
//!
//! Turns rows of address/demographic exports into [`Record`]s that can be
//! upserted into a document store and queried geospatially.
//!
//! ## Features
//!
//! - **Header-tolerant extraction**: columns are found by name, in any order; unknown columns are ignored
//! - **Content-derived ids**: a record's id is a hash of its normalized address, city and state, so re-ingestion upserts
//! - **Geo points**: latitude/longitude cells become a (latitude, longitude) point
//! - **Range decoding**: income, home value, wealth, age and tenure labels decode to representative numbers on demand
//! - **Batch driver**: per-row success/failure reporting over a pluggable [`DocumentStore`]
//!
//! ## Example
//!
//! ```
//! use marketrows::{HeaderIndex, Record};
//! use marketrows::extraction::split_row;
//!
//! let header = HeaderIndex::parse("City,Address,State,Estimated Household Income");
//! let record = Record::from_row(&header, &split_row("Springfield,1 Main St,IL,Under $20")).unwrap();
//!
//! assert_eq!(record.address(), "1 Main St");
//! assert_eq!(record.id().len(), 24);
//! assert_eq!(record.household_income_estimate(), Some(10_000));
//! ```

// Core transform
pub mod error;
pub mod extraction;
pub mod identity;
pub mod geo;
pub mod decode;
pub mod record;

// Persistence seam and output
pub mod entity;
pub mod store;
pub mod serialization;

// Batch ingestion driver and configuration
pub mod runtime;

// Re-export key types
pub use error::{ErrorKind, RecordError};
pub use extraction::HeaderIndex;
pub use geo::GeoPoint;
pub use decode::{Estimates, RangeTable, Tenure};
pub use record::Record;
pub use entity::{Document, Entity, FieldValue};
pub use store::{DocumentStore, MemoryStore, StoreError, UpsertOutcome};
pub use serialization::{OutputFormat, RecordWriter, SerializationError};
pub use runtime::{IngestConfig, IngestReport, Ingestor};
