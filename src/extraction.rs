//! Header resolution and by-name field extraction for comma-delimited rows.
//!
//! Export files do not agree on column order, and many carry columns this
//! crate has no use for. A [`HeaderIndex`] is built once from the header line
//! and then used to pull cells out of every data row by column name.
//!
//! Splitting is on bare commas. Quoted fields are not understood, so a cell
//! containing a comma shifts every following column.

use indexmap::IndexMap;

use crate::error::RecordError;

/// Split a line into cells on commas.
///
/// No quoting or escaping is applied and cells are not trimmed.
pub fn split_row(line: &str) -> Vec<&str> {
    line.split(',').collect()
}

/// Normalize a column name for lookup: trimmed and lowercased.
pub fn normalize_column(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Mapping from normalized column name to zero-based cell index.
///
/// # Example
///
/// ```
/// use marketrows::HeaderIndex;
///
/// let header = HeaderIndex::parse(" City ,ADDRESS,state");
/// assert_eq!(header.get("address"), Some(1));
/// assert_eq!(header.get("city"), Some(0));
/// assert_eq!(header.get("zip code"), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderIndex {
    columns: IndexMap<String, usize>,
    duplicates: Vec<String>,
}

impl HeaderIndex {
    /// Resolve a header line.
    ///
    /// Blank column names are skipped, so an empty header yields an empty
    /// index. When two columns normalize to the same name the later one
    /// wins; the overwritten names are kept in [`HeaderIndex::duplicates`].
    pub fn parse(header: &str) -> Self {
        let mut index = HeaderIndex::default();

        for (position, raw) in header.split(',').enumerate() {
            let name = normalize_column(raw);
            if name.is_empty() {
                continue;
            }
            if index.columns.insert(name.clone(), position).is_some() {
                index.duplicates.push(name);
            }
        }

        index
    }

    /// Index of a column, looked up by its normalized name.
    pub fn get(&self, name: &str) -> Option<usize> {
        self.columns.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.columns.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Resolved columns in first-seen order.
    pub fn columns(&self) -> impl Iterator<Item = (&str, usize)> {
        self.columns.iter().map(|(name, idx)| (name.as_str(), *idx))
    }

    /// Column names that appeared more than once, in the order the
    /// repeats were seen.
    pub fn duplicates(&self) -> &[String] {
        &self.duplicates
    }

    /// Names from `wanted` that this header does not resolve.
    pub fn missing<'a>(&self, wanted: &[&'a str]) -> Vec<&'a str> {
        wanted
            .iter()
            .filter(|name| !self.contains(name))
            .copied()
            .collect()
    }

    /// Extract a cell by column name.
    ///
    /// # Returns
    /// * `Ok(Some(cell))` - column resolved and present in the row
    /// * `Ok(None)` - column not in the header
    /// * `Err(RecordError::RowTooShort)` - column resolved but the row ends
    ///   before its index
    ///
    /// The cell is returned untouched; callers trim what they need trimmed.
    pub fn field<'r, S: AsRef<str>>(
        &self,
        name: &str,
        row: &'r [S],
    ) -> Result<Option<&'r str>, RecordError> {
        let index = match self.get(name) {
            Some(index) => index,
            None => return Ok(None),
        };

        row.get(index)
            .map(|cell| Some(cell.as_ref()))
            .ok_or_else(|| RecordError::RowTooShort {
                field: name.to_string(),
                index,
                len: row.len(),
            })
    }
}
