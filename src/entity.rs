//! Entities as attribute bags for a document store.
//!
//! Stores in this crate do not know about [`crate::Record`]; they receive an
//! ordered map of [`FieldValue`]s plus the key the entity supplies for itself.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single attribute value in a stored document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum FieldValue {
    String(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    List(Vec<FieldValue>),
    Map(IndexMap<String, FieldValue>),
    Null,
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::String(s) => write!(f, "{}", s),
            FieldValue::Int(i) => write!(f, "{}", i),
            FieldValue::Float(fl) => write!(f, "{}", fl),
            FieldValue::Bool(b) => write!(f, "{}", b),
            FieldValue::List(l) => write!(f, "{:?}", l),
            FieldValue::Map(m) => write!(f, "{:?}", m),
            FieldValue::Null => write!(f, "null"),
        }
    }
}

/// An ordered attribute bag, keyed by serialized field name.
pub type Document = IndexMap<String, FieldValue>;

/// Something that can be persisted under a key it computes itself.
///
/// # Example
///
/// ```
/// use marketrows::Entity;
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct Store {
///     code: String,
/// }
///
/// impl Entity for Store {
///     const COLLECTION: &'static str = "stores";
///
///     fn key(&self) -> &str {
///         &self.code
///     }
/// }
///
/// let doc = Store { code: "s-1".to_string() }.to_document().unwrap();
/// assert_eq!(doc["code"].to_string(), "s-1");
/// ```
pub trait Entity: Serialize {
    /// Collection the entity is stored in.
    const COLLECTION: &'static str;

    /// Store key. No store-generated keys are used.
    fn key(&self) -> &str;

    /// Convert to an ordered attribute bag.
    fn to_document(&self) -> Result<Document, serde_json::Error> {
        match serde_json::to_value(self)? {
            serde_json::Value::Object(map) => Ok(map
                .into_iter()
                .map(|(k, v)| (k, json_value_to_field_value(v)))
                .collect()),
            other => Err(serde::ser::Error::custom(format!(
                "entity in '{}' did not serialize to an object: {}",
                Self::COLLECTION,
                other
            ))),
        }
    }

    fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Convert to an NDJSON line (trailing newline included).
    fn to_ndjson_line(&self) -> Result<String, serde_json::Error> {
        let json = self.to_json()?;
        Ok(format!("{}\n", json))
    }
}

fn json_value_to_field_value(value: serde_json::Value) -> FieldValue {
    match value {
        serde_json::Value::String(s) => FieldValue::String(s),
        serde_json::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                FieldValue::Int(i)
            } else if let Some(f) = n.as_f64() {
                FieldValue::Float(f)
            } else {
                FieldValue::Null
            }
        }
        serde_json::Value::Bool(b) => FieldValue::Bool(b),
        serde_json::Value::Array(arr) => {
            FieldValue::List(arr.into_iter().map(json_value_to_field_value).collect())
        }
        serde_json::Value::Object(map) => FieldValue::Map(
            map.into_iter()
                .map(|(k, v)| (k, json_value_to_field_value(v)))
                .collect(),
        ),
        serde_json::Value::Null => FieldValue::Null,
    }
}
