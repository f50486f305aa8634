//! In-process memory backend

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use serde_json::{Map, Value};

use crate::backend::SessionStorage;
use crate::record::{ReadRecord, SessionRecord};
use crate::Result;

struct StoredEntry {
    bytes: Vec<u8>,
    expires_at: DateTime<Utc>,
}

/// Session storage held in process memory.
///
/// Records disappear with the process; useful for tests and single-process
/// deployments. Expiry is enforced on read: an entry older than the
/// configured duration reads as absent.
pub struct MemoryStorage {
    duration: Duration,
    records: HashMap<String, StoredEntry>,
}

impl MemoryStorage {
    pub fn new(duration: Duration) -> Self {
        Self {
            duration,
            records: HashMap::new(),
        }
    }
}

impl SessionStorage for MemoryStorage {
    fn open(&mut self) -> Result<bool> {
        Ok(true)
    }

    fn read(&mut self, id: &str) -> Result<Option<ReadRecord>> {
        let expired = match self.records.get(id) {
            Some(entry) => entry.expires_at < Utc::now(),
            None => return Ok(None),
        };

        if expired {
            self.records.remove(id);
            return Ok(None);
        }

        let entry = match self.records.get(id) {
            Some(entry) => entry,
            None => return Ok(None),
        };

        Ok(SessionRecord::from_bytes(&entry.bytes).map(|record| ReadRecord {
            record,
            length: entry.bytes.len(),
        }))
    }

    fn write(
        &mut self,
        id: &str,
        data: &Map<String, Value>,
        start_time: DateTime<Utc>,
        access_time: DateTime<Utc>,
    ) -> Result<usize> {
        let record = SessionRecord::new(data.clone(), start_time, access_time);
        let bytes = record.to_bytes()?;
        let length = bytes.len();

        self.records.insert(
            id.to_string(),
            StoredEntry {
                bytes,
                expires_at: Utc::now() + self.duration,
            },
        );

        Ok(length)
    }

    fn destroy(&mut self, id: &str) -> Result<bool> {
        Ok(self.records.remove(id).is_some())
    }

    fn duration(&self) -> Duration {
        self.duration
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_data() -> Map<String, Value> {
        let mut data = Map::new();
        data.insert("user".to_string(), json!("alice"));
        data
    }

    #[test]
    fn test_write_then_read() {
        let mut storage = MemoryStorage::new(Duration::seconds(1800));
        storage.open().unwrap();

        let now = Utc::now();
        let length = storage.write("abc123", &sample_data(), now, now).unwrap();
        assert!(length > 0);

        let found = storage.read("abc123").unwrap().unwrap();
        assert_eq!(found.length, length);
        assert_eq!(found.record.data, sample_data());
    }

    #[test]
    fn test_read_absent() {
        let mut storage = MemoryStorage::new(Duration::seconds(1800));
        assert!(storage.read("nothing").unwrap().is_none());
    }

    #[test]
    fn test_destroy_reports_removal() {
        let mut storage = MemoryStorage::new(Duration::seconds(1800));
        let now = Utc::now();
        storage.write("abc123", &sample_data(), now, now).unwrap();

        assert!(storage.destroy("abc123").unwrap());
        assert!(!storage.destroy("abc123").unwrap());
    }

    #[test]
    fn test_expired_entry_reads_as_absent() {
        let mut storage = MemoryStorage::new(Duration::zero());
        let now = Utc::now();
        storage.write("abc123", &sample_data(), now, now).unwrap();

        std::thread::sleep(std::time::Duration::from_millis(50));
        assert!(storage.read("abc123").unwrap().is_none());
    }
}
