//! Sessio Storage Layer
//!
//! Pluggable persistence for serialized session records. A backend stores a
//! `(data, start_time, access_time)` triple keyed by session id and applies
//! its configured idle TTL at write time. Three implementations: in-process
//! memory, one-file-per-session, and Redis (behind the `redis` feature).

mod backend;
mod error;
mod file;
mod memory;
mod record;
#[cfg(feature = "redis")]
mod redis_storage;

pub use backend::{SessionStorage, DEFAULT_DURATION_SECS};
pub use error::StorageError;
pub use file::FileStorage;
pub use memory::MemoryStorage;
pub use record::{ReadRecord, SessionRecord};
#[cfg(feature = "redis")]
pub use redis_storage::RedisStorage;

pub type Result<T> = std::result::Result<T, StorageError>;
