//! Sessio Core
//!
//! Facade over the session workspace: configuration, the storage backend
//! factory, and the scoped request runner that guarantees the end-of-request
//! save.

mod config;
mod error;
mod runtime;

pub use config::{SessionConfig, StorageConfig, DEFAULT_COOKIE_NAME, DEFAULT_REFRESH_TTL_SECS};
pub use error::CoreError;
pub use runtime::with_session;

// Re-export the session and storage surface
pub use sessio_session::{
    CookieDirective, CookieName, ResponseDirectives, Session, SessionError, SessionSnapshot,
    CACHE_HEADERS,
};
#[cfg(feature = "redis")]
pub use sessio_storage::RedisStorage;
pub use sessio_storage::{
    FileStorage, MemoryStorage, ReadRecord, SessionRecord, SessionStorage, StorageError,
    DEFAULT_DURATION_SECS,
};

pub type Result<T> = std::result::Result<T, CoreError>;

/// Initialize logging
pub fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt().with_env_filter(filter).with_target(true).init();
}
