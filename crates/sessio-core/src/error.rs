//! Core error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("session error: {0}")]
    Session(#[from] sessio_session::SessionError),

    #[error("storage error: {0}")]
    Storage(#[from] sessio_storage::StorageError),

    #[error("unsupported session storage: {0}")]
    UnsupportedStorage(String),
}
