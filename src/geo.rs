//! Geographic points derived from raw latitude/longitude cells.

use serde::ser::SerializeStruct;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::RecordError;

/// A point in degrees, always (latitude, longitude).
///
/// Values are not range checked. Serialized as a GeoJSON-style object whose
/// `coordinates` array keeps the same (latitude, longitude) order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// Build a point from optional raw cells.
    ///
    /// # Returns
    /// * `Ok(Some(point))` - both cells present and numeric
    /// * `Ok(None)` - either cell absent
    /// * `Err(RecordError::MalformedNumeric)` - a present cell does not parse
    pub fn from_strings(lat: Option<&str>, lon: Option<&str>) -> Result<Option<Self>, RecordError> {
        match (lat, lon) {
            (Some(lat), Some(lon)) => {
                let latitude = parse_degrees("latitude", lat)?;
                let longitude = parse_degrees("longitude", lon)?;
                Ok(Some(Self::new(latitude, longitude)))
            }
            _ => Ok(None),
        }
    }

    pub fn coordinates(&self) -> [f64; 2] {
        [self.latitude, self.longitude]
    }
}

fn parse_degrees(field: &'static str, raw: &str) -> Result<f64, RecordError> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|degrees| degrees.is_finite())
        .ok_or_else(|| RecordError::MalformedNumeric {
            field,
            value: raw.to_string(),
        })
}

impl Serialize for GeoPoint {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("GeoPoint", 2)?;
        state.serialize_field("type", "Point")?;
        state.serialize_field("coordinates", &self.coordinates())?;
        state.end()
    }
}

#[derive(Deserialize)]
struct PointDocument {
    #[serde(rename = "type")]
    kind: String,
    coordinates: [f64; 2],
}

impl<'de> Deserialize<'de> for GeoPoint {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let doc = PointDocument::deserialize(deserializer)?;
        if doc.kind != "Point" {
            return Err(serde::de::Error::custom(format!(
                "expected geometry type 'Point', got '{}'",
                doc.kind
            )));
        }
        Ok(Self::new(doc.coordinates[0], doc.coordinates[1]))
    }
}
