//! Sessio Session Management
//!
//! A per-request, server-side key-value store keyed by a cookie-carried
//! identifier. The session initializes lazily on first access, tracks a
//! dirty flag across mutations, and persists once at end of request through
//! a pluggable storage backend. The HTTP transport stays outside: the
//! incoming cookie value arrives at construction and outgoing cookies and
//! headers are drained as [`ResponseDirectives`] afterwards.

mod cookie;
mod error;
mod events;
mod response;
mod session;
mod snapshot;

pub use cookie::CookieName;
pub use error::SessionError;
pub use response::{CookieDirective, ResponseDirectives, CACHE_HEADERS};
pub use session::Session;
pub use snapshot::SessionSnapshot;

pub type Result<T> = std::result::Result<T, SessionError>;
