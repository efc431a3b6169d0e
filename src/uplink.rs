// Callback body posted by the Sigfox backend for each uplink message.
//
// `data` and `time` are the only reserved keys; every other key is carried
// through as a tag. Deserializing into `extra` keeps the reserved keys out of
// the tag set without touching the inbound object afterwards.
use crate::error::IngestError;
use crate::frame;
use crate::point::{self, DataPoint, MEASUREMENT};
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;

/// Tag key under which the route's device identifier is stored.
pub const DEVICE_TAG: &str = "device";

#[derive(Debug, Deserialize)]
pub struct Uplink {
    #[serde(default)]
    pub data: Option<String>,
    #[serde(default)]
    pub time: Option<i64>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl Uplink {
    pub fn from_slice(body: &[u8]) -> Result<Self, IngestError> {
        serde_json::from_slice(body).map_err(|e| IngestError::InvalidPayload(e.to_string()))
    }

    /// Decode the frame and assemble the point to write. Nothing is produced
    /// unless every step succeeds.
    pub fn into_data_point(self, device: &str) -> Result<DataPoint, IngestError> {
        let data = self.data.ok_or(IngestError::MissingField("data"))?;
        let time = self.time.ok_or(IngestError::MissingField("time"))?;

        let frame = frame::decode(&data)?;
        let timestamp_ns = point::seconds_to_nanos(time)
            .ok_or_else(|| IngestError::InvalidPayload(format!("timestamp {time} out of range")))?;

        let mut tags = BTreeMap::new();
        for (key, value) in self.extra {
            if let Some(rendered) = tag_value(&key, &value)? {
                tags.insert(key, rendered);
            }
        }
        // The route parameter is authoritative over any `device` key in the body.
        tags.insert(DEVICE_TAG.to_string(), device.to_string());

        Ok(DataPoint {
            measurement: MEASUREMENT.to_string(),
            timestamp_ns,
            fields: frame.fields(),
            tags,
        })
    }
}

/// Render a scalar JSON value as a tag. The store refuses empty tag keys and
/// values, so empty keys, nulls and empty strings are skipped.
fn tag_value(key: &str, value: &Value) -> Result<Option<String>, IngestError> {
    if key.is_empty() {
        return Ok(None);
    }
    match value {
        Value::Null => Ok(None),
        Value::String(s) if s.is_empty() => Ok(None),
        Value::String(s) => Ok(Some(s.clone())),
        Value::Number(n) => Ok(Some(n.to_string())),
        Value::Bool(b) => Ok(Some(b.to_string())),
        Value::Array(_) | Value::Object(_) => Err(IngestError::UnsupportedTag(key.to_string())),
    }
}
