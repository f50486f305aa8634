//! File-backed session storage

use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use chrono::{DateTime, Duration, Utc};
use serde_json::{Map, Value};

use crate::backend::SessionStorage;
use crate::error::StorageError;
use crate::record::{ReadRecord, SessionRecord};
use crate::Result;

/// One file per session under a base directory, filename = session id.
///
/// Ids come from a client cookie, so only ASCII alphanumeric ids are ever
/// mapped to a path: anything else reads as absent and is rejected on
/// write. Writes go through a temp file and rename so a reader never sees
/// a half-written record.
#[derive(Debug)]
pub struct FileStorage {
    dir: PathBuf,
    duration: Duration,
}

impl FileStorage {
    pub fn new<P: Into<PathBuf>>(dir: P, duration: Duration) -> Self {
        Self {
            dir: dir.into(),
            duration,
        }
    }

    fn path_for(&self, id: &str) -> PathBuf {
        self.dir.join(id)
    }

    fn is_safe_id(id: &str) -> bool {
        !id.is_empty() && id.chars().all(|c| c.is_ascii_alphanumeric())
    }
}

impl SessionStorage for FileStorage {
    fn open(&mut self) -> Result<bool> {
        fs::create_dir_all(&self.dir)?;
        Ok(true)
    }

    fn read(&mut self, id: &str) -> Result<Option<ReadRecord>> {
        if !Self::is_safe_id(id) {
            return Ok(None);
        }

        let bytes = match fs::read(self.path_for(id)) {
            Ok(bytes) => bytes,
            Err(error) if error.kind() == ErrorKind::NotFound => return Ok(None),
            Err(error) => return Err(error.into()),
        };

        let length = bytes.len();
        match SessionRecord::from_bytes(&bytes) {
            Some(record) => Ok(Some(ReadRecord { record, length })),
            None => {
                tracing::debug!(id, length, "discarding undecodable session file");
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
        if !Self::is_safe_id(id) {
            return Err(StorageError::InvalidId(id.to_string()));
        }

        let record = SessionRecord::new(data.clone(), start_time, access_time);
        let bytes = record.to_bytes()?;

        let path = self.path_for(id);
        let tmp = self.dir.join(format!("{id}.tmp"));
        fs::write(&tmp, &bytes)?;
        fs::rename(&tmp, &path)?;

        Ok(bytes.len())
    }

    fn destroy(&mut self, id: &str) -> Result<bool> {
        if !Self::is_safe_id(id) {
            return Ok(false);
        }

        match fs::remove_file(self.path_for(id)) {
            Ok(()) => Ok(true),
            Err(error) if error.kind() == ErrorKind::NotFound => Ok(false),
            Err(error) => Err(error.into()),
        }
    }

    fn duration(&self) -> Duration {
        self.duration
    }
}
