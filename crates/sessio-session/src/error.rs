//! Session error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("cookie name cannot be empty")]
    EmptyCookieName,

    #[error("cookie name {0:?} contains invalid characters")]
    InvalidCookieName(String),

    #[error("storage error: {0}")]
    Storage(#[from] sessio_storage::StorageError),
}
