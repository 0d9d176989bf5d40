//! Writers for ingested records.
//!
//! Records go out either as NDJSON (one document per line) or as a single
//! JSON array. With estimates enabled every document gains an `estimates`
//! object holding the decoded income, home value, wealth, age and tenure.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::Write;
use std::str::FromStr;

use crate::decode::Estimates;
use crate::record::Record;

#[derive(Debug)]
pub enum SerializationError {
    JsonError(serde_json::Error),
    IoError(std::io::Error),
}

impl From<serde_json::Error> for SerializationError {
    fn from(err: serde_json::Error) -> Self {
        SerializationError::JsonError(err)
    }
}

impl From<std::io::Error> for SerializationError {
    fn from(err: std::io::Error) -> Self {
        SerializationError::IoError(err)
    }
}

impl fmt::Display for SerializationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SerializationError::JsonError(e) => write!(f, "JSON error: {}", e),
            SerializationError::IoError(e) => write!(f, "IO error: {}", e),
        }
    }
}

impl std::error::Error for SerializationError {}

/// Output layout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Ndjson,
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ndjson" | "jsonl" => Ok(OutputFormat::Ndjson),
            "json" => Ok(OutputFormat::Json),
            other => Err(format!("unknown output format '{}' (expected ndjson or json)", other)),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Ndjson => write!(f, "ndjson"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

#[derive(Serialize)]
struct WithEstimates<'a> {
    #[serde(flatten)]
    record: &'a Record,
    estimates: Estimates,
}

/// Streams records to any `Write` in the chosen [`OutputFormat`].
pub struct RecordWriter<W: Write> {
    writer: W,
    format: OutputFormat,
    include_estimates: bool,
    written: usize,
}

impl<W: Write> RecordWriter<W> {
    /// Create a writer. For JSON output the opening bracket is written
    /// immediately.
    pub fn new(
        mut writer: W,
        format: OutputFormat,
        include_estimates: bool,
    ) -> Result<Self, SerializationError> {
        if format == OutputFormat::Json {
            write!(writer, "[")?;
        }
        Ok(Self {
            writer,
            format,
            include_estimates,
            written: 0,
        })
    }

    pub fn write(&mut self, record: &Record) -> Result<(), SerializationError> {
        let json = if self.include_estimates {
            serde_json::to_string(&WithEstimates {
                record,
                estimates: record.estimates(),
            })?
        } else {
            serde_json::to_string(record)?
        };

        match self.format {
            OutputFormat::Ndjson => writeln!(self.writer, "{}", json)?,
            OutputFormat::Json => {
                if self.written > 0 {
                    write!(self.writer, ",")?;
                }
                write!(self.writer, "{}", json)?;
            }
        }

        self.written += 1;
        Ok(())
    }

    pub fn write_all<'a, I>(&mut self, records: I) -> Result<(), SerializationError>
    where
        I: IntoIterator<Item = &'a Record>,
    {
        for record in records {
            self.write(record)?;
        }
        Ok(())
    }

    /// Number of records written so far.
    pub fn written(&self) -> usize {
        self.written
    }

    /// Close the array (JSON output) and flush. Returns the inner writer.
    pub fn finish(mut self) -> Result<W, SerializationError> {
        if self.format == OutputFormat::Json {
            write!(self.writer, "]")?;
        }
        self.writer.flush()?;
        Ok(self.writer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(address: &str) -> Record {
        Record::from_csv_line(
            "address,city,state,estimated household income",
            &format!("{},Springfield,IL,Under $20", address),
        )
        .unwrap()
    }

    #[test]
    fn test_ndjson_writer() {
        let mut writer = RecordWriter::new(Vec::new(), OutputFormat::Ndjson, false).unwrap();
        writer.write(&sample("1 Main St")).unwrap();
        writer.write(&sample("2 Main St")).unwrap();
        assert_eq!(writer.written(), 2);

        let output = String::from_utf8(writer.finish().unwrap()).unwrap();
        let lines: Vec<&str> = output.lines().collect();

        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("1 Main St"));
        assert!(lines[1].contains("2 Main St"));
        assert!(!output.contains("estimates"));
    }

    #[test]
    fn test_json_array_writer_with_estimates() {
        let records = vec![sample("1 Main St"), sample("2 Main St")];
        let mut writer = RecordWriter::new(Vec::new(), OutputFormat::Json, true).unwrap();
        writer.write_all(&records).unwrap();

        let output = String::from_utf8(writer.finish().unwrap()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();

        assert_eq!(value.as_array().unwrap().len(), 2);
        assert_eq!(value[0]["estimates"]["householdIncome"], 10_000);
        assert!(value[0]["estimates"]["wealth"].is_null());
        assert_eq!(value[1]["address"], "2 Main St");
    }

    #[test]
    fn test_empty_json_array() {
        let writer = RecordWriter::new(Vec::new(), OutputFormat::Json, false).unwrap();
        let output = String::from_utf8(writer.finish().unwrap()).unwrap();
        assert_eq!(output, "[]");
    }

    #[test]
    fn test_output_format_parse() {
        assert_eq!("NDJSON".parse::<OutputFormat>().unwrap(), OutputFormat::Ndjson);
        assert_eq!("json".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert!("csv".parse::<OutputFormat>().is_err());
        assert_eq!(OutputFormat::default().to_string(), "ndjson");
    }
}
