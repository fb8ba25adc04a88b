//! Attribute codec
//!
//! Entities persisted by the store declare a fixed, named attribute set.
//! The codec writes every declared attribute as a JSON object and reads
//! objects back leniently: keys outside the declared set are skipped with a
//! warning instead of failing the parse, so older readers accept blobs
//! written by newer executors.
//!
//! ## Contract
//!
//! - `ATTRIBUTES` lists exactly the serde field names of the implementing type
//! - Every field tolerates `null` (use `Option<_>` or `serde_json::Value`)
//! - The declared set is never inferred from the blob

use crate::error::{Error, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::warn;

/// An entity with a fixed, declared attribute set
///
/// # Example
///
/// ```
/// use serde::{Deserialize, Serialize};
/// use testdb_core::AttributeSet;
///
/// #[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
/// struct Probe {
///     host: Option<String>,
///     port: Option<u16>,
/// }
///
/// impl AttributeSet for Probe {
///     const KIND: &'static str = "Probe";
///     const ATTRIBUTES: &'static [&'static str] = &["host", "port"];
/// }
///
/// let blob = r#"{"host":"localhost","port":9001,"color":"red"}"#;
/// let probe = Probe::from_blob(blob).unwrap();
/// assert_eq!(probe.port, Some(9001));
/// ```
pub trait AttributeSet: Serialize + DeserializeOwned + Default {
    /// Entity kind, used in diagnostics
    const KIND: &'static str;

    /// Declared attribute names
    const ATTRIBUTES: &'static [&'static str];

    /// Collect every declared attribute; unset ones map to `null`.
    fn to_attributes(&self) -> Result<Map<String, Value>> {
        let mut fields = match serde_json::to_value(self)? {
            Value::Object(fields) => fields,
            other => {
                return Err(Error::internal(format!(
                    "{} serialized to {} instead of an object",
                    Self::KIND,
                    json_kind(&other)
                )))
            }
        };
        let mut attributes = Map::new();
        for name in Self::ATTRIBUTES {
            let value = fields.remove(*name).unwrap_or(Value::Null);
            attributes.insert((*name).to_string(), value);
        }
        Ok(attributes)
    }

    /// Encode the declared attributes as a JSON text blob.
    fn encode(&self) -> Result<String> {
        let attributes = self.to_attributes()?;
        Ok(serde_json::to_string(&Value::Object(attributes))?)
    }

    /// Merge a JSON text blob into this entity.
    ///
    /// Attributes absent from the blob keep their current value. On failure
    /// the entity is left unchanged.
    fn decode(&mut self, blob: &str) -> Result<()> {
        match serde_json::from_str::<Value>(blob)? {
            Value::Object(incoming) => self.set_attributes(incoming),
            other => Err(Error::decode(format!(
                "{} blob must be an object, got {}",
                Self::KIND,
                json_kind(&other)
            ))),
        }
    }

    /// Apply an already-parsed key/value map, skipping undeclared keys.
    fn set_attributes(&mut self, incoming: Map<String, Value>) -> Result<()> {
        let mut merged = self.to_attributes()?;
        for (name, value) in incoming {
            if Self::ATTRIBUTES.contains(&name.as_str()) {
                merged.insert(name, value);
            } else {
                warn!(kind = Self::KIND, attribute = %name, "skipping unknown attribute");
            }
        }
        *self = serde_json::from_value(Value::Object(merged))?;
        Ok(())
    }

    /// Build a fresh entity from a blob.
    fn from_blob(blob: &str) -> Result<Self> {
        let mut entity = Self::default();
        entity.decode(blob)?;
        Ok(entity)
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
