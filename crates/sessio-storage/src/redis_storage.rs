//! Redis-backed session storage

use chrono::{DateTime, Duration, Utc};
use redis::{Client, Commands, Connection};
use serde_json::{Map, Value};
use url::Url;

use crate::backend::SessionStorage;
use crate::error::StorageError;
use crate::record::{ReadRecord, SessionRecord};
use crate::Result;

/// Session records stored in Redis.
///
/// Key layout is `<prefix>:<id>` when a prefix is configured, else the bare
/// id. Writes use `SETEX` so the value TTL is the backend duration; a
/// missing or empty value reads as absent.
pub struct RedisStorage {
    url: Url,
    prefix: Option<String>,
    duration: Duration,
    conn: Option<Connection>,
}

impl RedisStorage {
    pub fn new(url: Url, prefix: Option<String>, duration: Duration) -> Self {
        Self {
            url,
            prefix,
            duration,
            conn: None,
        }
    }

    /// Parse and validate a connection URI (`redis://` or `rediss://`).
    pub fn from_url(url: &str, prefix: Option<&str>, duration: Duration) -> Result<Self> {
        let parsed = Url::parse(url).map_err(|_| StorageError::InvalidUri(url.to_string()))?;
        if parsed.scheme() != "redis" && parsed.scheme() != "rediss" {
            return Err(StorageError::InvalidUri(url.to_string()));
        }

        Ok(Self::new(parsed, prefix.map(str::to_string), duration))
    }

    fn key(&self, id: &str) -> String {
        match &self.prefix {
            Some(prefix) => format!("{prefix}:{id}"),
            None => id.to_string(),
        }
    }

    fn conn(&mut self) -> Result<&mut Connection> {
        self.conn.as_mut().ok_or(StorageError::NotOpen)
    }
}

impl SessionStorage for RedisStorage {
    fn open(&mut self) -> Result<bool> {
        if self.conn.is_none() {
            let client = Client::open(self.url.as_str())?;
            self.conn = Some(client.get_connection()?);
        }

        Ok(true)
    }

    fn close(&mut self) -> Result<bool> {
        self.conn = None;
        Ok(true)
    }

    fn read(&mut self, id: &str) -> Result<Option<ReadRecord>> {
        let key = self.key(id);
        let bytes: Option<Vec<u8>> = self.conn()?.get(&key)?;

        let bytes = match bytes {
            Some(bytes) if !bytes.is_empty() => bytes,
            _ => return Ok(None),
        };

        let length = bytes.len();
        match SessionRecord::from_bytes(&bytes) {
            Some(record) => Ok(Some(ReadRecord { record, length })),
            None => {
                tracing::debug!(id, length, "discarding undecodable session value");
                Ok(None)
            }
        }
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

        let key = self.key(id);
        let seconds = self.duration.num_seconds().max(1) as u64;
        let _: () = self.conn()?.set_ex(&key, bytes.as_slice(), seconds)?;

        Ok(bytes.len())
    }

    fn destroy(&mut self, id: &str) -> Result<bool> {
        let key = self.key(id);
        let removed: i64 = self.conn()?.del(&key)?;
        Ok(removed > 0)
    }

    fn duration(&self) -> Duration {
        self.duration
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_key_includes_prefix_when_configured() {
        let storage =
            RedisStorage::from_url("redis://127.0.0.1:6379", Some("app"), Duration::seconds(1800))
                .unwrap();
        assert_eq!(storage.key("abc123"), "app:abc123");

        let bare =
            RedisStorage::from_url("redis://127.0.0.1:6379", None, Duration::seconds(1800))
                .unwrap();
        assert_eq!(bare.key("abc123"), "abc123");
    }

    #[test]
    fn test_rejects_non_redis_uri() {
        assert!(matches!(
            RedisStorage::from_url("http://127.0.0.1:6379", None, Duration::seconds(1800)),
            Err(StorageError::InvalidUri(_))
        ));
        assert!(matches!(
            RedisStorage::from_url("not a uri", None, Duration::seconds(1800)),
            Err(StorageError::InvalidUri(_))
        ));
    }

    #[test]
    fn test_read_before_open_fails() {
        let mut storage =
            RedisStorage::from_url("redis://127.0.0.1:6379", None, Duration::seconds(1800))
                .unwrap();
        assert!(matches!(
            storage.read("abc123"),
            Err(StorageError::NotOpen)
        ));
    }

    #[test]
    #[ignore = "requires a running redis server on 127.0.0.1:6379"]
    fn test_round_trip_against_live_server() {
        let mut storage = RedisStorage::from_url(
            "redis://127.0.0.1:6379",
            Some("sessio-test"),
            Duration::seconds(60),
        )
        .unwrap();
        storage.open().unwrap();

        let mut data = Map::new();
        data.insert("user".to_string(), json!("alice"));

        let now = Utc::now();
        let length = storage.write("abc123", &data, now, now).unwrap();
        assert!(length > 0);

        let found = storage.read("abc123").unwrap().unwrap();
        assert_eq!(found.length, length);
        assert_eq!(found.record.data, data);

        assert!(storage.destroy("abc123").unwrap());
        assert!(!storage.destroy("abc123").unwrap());
        assert!(storage.read("abc123").unwrap().is_none());
    }
}
