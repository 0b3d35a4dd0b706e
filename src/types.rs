//! Shared types used across the codebase
//!
//! Sensor and Measure are owned by the data adapter. The gateway only reads
//! them: each keeps the record exactly as the adapter sent it and exposes the
//! few fields the gateway relies on. Serializing writes the record back out
//! unchanged.

use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};
use thiserror::Error;

/// Why an upstream record could not be used
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RecordError {
    #[error("missing field `{0}`")]
    Missing(&'static str),

    #[error("field `{0}` has an unexpected type")]
    Mistyped(&'static str),
}

/// Sensor record as reported by the data adapter
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "Map<String, Value>")]
pub struct Sensor {
    id: String,
    owner_email: String,
    record: Map<String, Value>,
}

impl Sensor {
    /// Id in the form used for upstream paths and lookups; numeric ids are
    /// rendered in decimal
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn owner_email(&self) -> &str {
        &self.owner_email
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.record.get(field)
    }
}

impl TryFrom<Map<String, Value>> for Sensor {
    type Error = RecordError;

    fn try_from(record: Map<String, Value>) -> Result<Self, Self::Error> {
        let id = match record.get("id") {
            None | Some(Value::Null) => return Err(RecordError::Missing("id")),
            Some(Value::String(s)) => s.clone(),
            Some(Value::Number(n)) if n.is_u64() || n.is_i64() => n.to_string(),
            Some(_) => return Err(RecordError::Mistyped("id")),
        };
        let owner_email = match record.get("ownerEmail") {
            None | Some(Value::Null) => return Err(RecordError::Missing("ownerEmail")),
            Some(Value::String(s)) => s.clone(),
            Some(_) => return Err(RecordError::Mistyped("ownerEmail")),
        };

        Ok(Self {
            id,
            owner_email,
            record,
        })
    }
}

impl Serialize for Sensor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.record.serialize(serializer)
    }
}

/// A single time-series point belonging to one sensor
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "Map<String, Value>")]
pub struct Measure {
    record: Map<String, Value>,
}

impl Measure {
    /// Timestamp text as the adapter wrote it
    pub fn timestamp(&self) -> &str {
        self.record
            .get("timestamp")
            .and_then(Value::as_str)
            .unwrap_or_default()
    }

    pub fn value(&self) -> &Value {
        static NULL: Value = Value::Null;
        self.record.get("value").unwrap_or(&NULL)
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.record.get(field)
    }
}

impl TryFrom<Map<String, Value>> for Measure {
    type Error = RecordError;

    fn try_from(record: Map<String, Value>) -> Result<Self, Self::Error> {
        match record.get("timestamp") {
            None | Some(Value::Null) => return Err(RecordError::Missing("timestamp")),
            Some(Value::String(_)) => {}
            Some(_) => return Err(RecordError::Mistyped("timestamp")),
        }
        if matches!(record.get("value"), None | Some(Value::Null)) {
            return Err(RecordError::Missing("value"));
        }

        Ok(Self { record })
    }
}

impl Serialize for Measure {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.record.serialize(serializer)
    }
}
