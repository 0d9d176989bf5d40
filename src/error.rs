//! Row-level error taxonomy for record construction.
//!
//! Only the fatal kinds are represented as errors. A column missing from the
//! header and a categorical value that no decode table recognises both
//! resolve to `None` instead of failing.

use std::fmt;

/// Classification of everything that can go wrong (or merely be absent)
/// while turning a CSV row into a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Field name absent from the header. Non-fatal.
    MissingColumn,
    /// Row shorter than a resolved column index. Fatal to the row.
    RowTooShort,
    /// Latitude or longitude text that does not parse. Fatal to the row.
    MalformedNumeric,
    /// Address, city or state absent. Fatal to the row.
    MissingIdentityField,
    /// No decode-table entry matched. Non-fatal.
    UnrecognizedCategory,
}

impl ErrorKind {
    /// Whether this kind aborts construction of the row it occurs in.
    pub fn is_fatal(self) -> bool {
        matches!(
            self,
            ErrorKind::RowTooShort | ErrorKind::MalformedNumeric | ErrorKind::MissingIdentityField
        )
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::MissingColumn => "missing_column",
            ErrorKind::RowTooShort => "row_too_short",
            ErrorKind::MalformedNumeric => "malformed_numeric",
            ErrorKind::MissingIdentityField => "missing_identity_field",
            ErrorKind::UnrecognizedCategory => "unrecognized_category",
        };
        write!(f, "{}", name)
    }
}

/// Fatal failure while constructing a single record.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordError {
    RowTooShort {
        field: String,
        index: usize,
        len: usize,
    },
    MalformedNumeric {
        field: &'static str,
        value: String,
    },
    MissingIdentityField {
        field: &'static str,
    },
}

impl RecordError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            RecordError::RowTooShort { .. } => ErrorKind::RowTooShort,
            RecordError::MalformedNumeric { .. } => ErrorKind::MalformedNumeric,
            RecordError::MissingIdentityField { .. } => ErrorKind::MissingIdentityField,
        }
    }
}

impl fmt::Display for RecordError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordError::RowTooShort { field, index, len } => write!(
                f,
                "Row too short: column '{}' is at index {} but the row has {} cells",
                field, index, len
            ),
            RecordError::MalformedNumeric { field, value } => {
                write!(f, "Malformed numeric value for '{}': {:?}", field, value)
            }
            RecordError::MissingIdentityField { field } => {
                write!(f, "Identity field '{}' is missing", field)
            }
        }
    }
}

impl std::error::Error for RecordError {}
