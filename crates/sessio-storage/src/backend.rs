//! Storage backend contract

use chrono::{DateTime, Duration, Utc};
use serde_json::{Map, Value};

use crate::record::ReadRecord;
use crate::Result;

/// Max idle lifetime a backend applies when none is configured.
pub const DEFAULT_DURATION_SECS: i64 = 1800;

/// A session persistence backend.
///
/// One backend instance serves one request; methods take `&mut self` and
/// perform ordinary synchronous I/O. Concurrent writers to the same id are
/// not coordinated: last writer wins.
pub trait SessionStorage: Send {
    /// Establish backend resources (verify the directory, connect to the
    /// server). Idempotent.
    fn open(&mut self) -> Result<bool>;

    /// Release backend resources.
    fn close(&mut self) -> Result<bool> {
        Ok(true)
    }

    /// Fetch a stored record. `Ok(None)` when no record exists or the
    /// stored blob fails to decode.
    fn read(&mut self, id: &str) -> Result<Option<ReadRecord>>;

    /// Upsert a record, applying this backend's TTL at write time. Returns
    /// the serialized byte length.
    fn write(
        &mut self,
        id: &str,
        data: &Map<String, Value>,
        start_time: DateTime<Utc>,
        access_time: DateTime<Utc>,
    ) -> Result<usize>;

    /// Refresh a record's TTL and access time. There is no lighter-weight
    /// primitive than a rewrite, so the default delegates to [`write`].
    ///
    /// [`write`]: SessionStorage::write
    fn touch(
        &mut self,
        id: &str,
        data: &Map<String, Value>,
        start_time: DateTime<Utc>,
        access_time: DateTime<Utc>,
    ) -> Result<usize> {
        self.write(id, data, start_time, access_time)
    }

    /// Remove a record. `Ok(true)` iff a record was actually deleted.
    fn destroy(&mut self, id: &str) -> Result<bool>;

    /// Configured max idle lifetime for records in this backend.
    fn duration(&self) -> Duration;
}
