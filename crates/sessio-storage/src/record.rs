//! Persisted session record

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::Result;

/// The serialized form every backend stores: the session's key-value data
/// plus its creation and last-access timestamps.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionRecord {
    pub data: Map<String, Value>,
    pub start_time: DateTime<Utc>,
    pub access_time: DateTime<Utc>,
}

impl SessionRecord {
    pub fn new(
        data: Map<String, Value>,
        start_time: DateTime<Utc>,
        access_time: DateTime<Utc>,
    ) -> Self {
        Self {
            data,
            start_time,
            access_time,
        }
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }

    /// Decode a stored blob. A record that fails to decode is treated as
    /// absent by every backend, so this returns `None` rather than an error.
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        serde_json::from_slice(bytes).ok()
    }
}

/// A decoded record together with the byte length of its stored form.
#[derive(Debug, Clone)]
pub struct ReadRecord {
    pub record: SessionRecord,
    pub length: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_round_trip_preserves_timestamps() {
        let mut data = Map::new();
        data.insert("user".to_string(), json!("alice"));

        let start = Utc::now();
        let access = start + chrono::Duration::seconds(30);
        let record = SessionRecord::new(data.clone(), start, access);

        let bytes = record.to_bytes().unwrap();
        let decoded = SessionRecord::from_bytes(&bytes).unwrap();

        assert_eq!(decoded.data, data);
        assert_eq!(decoded.start_time, start);
        assert_eq!(decoded.access_time, access);
    }

    #[test]
    fn test_garbage_decodes_as_absent() {
        assert!(SessionRecord::from_bytes(b"not a record").is_none());
        assert!(SessionRecord::from_bytes(b"").is_none());
        assert!(SessionRecord::from_bytes(b"{\"data\":{}}").is_none());
    }
}
