//! Storage error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("session id not usable by this backend: {0}")]
    InvalidId(String),

    #[error("storage backend is not open")]
    NotOpen,

    #[error("invalid storage URI: {0}")]
    InvalidUri(String),

    #[cfg(feature = "redis")]
    #[error("redis error: {0}")]
    Redis(#[from] redis::RedisError),
}
