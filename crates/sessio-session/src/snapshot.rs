//! Session-backed object snapshots
//!
//! Lets arbitrary serializable types persist themselves through the session
//! store under a named key. The two hooks have serde-based defaults; a type
//! that wants to store a lighter representation than its full serialized
//! form overrides `to_snapshot`, and rebuilds itself in `from_snapshot`.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::session::Session;

pub trait SessionSnapshot: Serialize + DeserializeOwned + Sized {
    /// Key used when the caller does not pass one. Defaults to the type's
    /// name.
    fn snapshot_key() -> &'static str {
        std::any::type_name::<Self>()
    }

    /// The representation stored in the session. Defaults to the type's
    /// serialized form; `None` skips the save.
    fn to_snapshot(&self) -> Option<Value> {
        match serde_json::to_value(self) {
            Ok(value) => Some(value),
            Err(error) => {
                tracing::warn!(%error, "snapshot serialization failed");
                None
            }
        }
    }

    /// Rebuild from a stored representation. Defaults to deserialization;
    /// a stored value that no longer matches reads as `None`.
    fn from_snapshot(value: Value) -> Option<Self> {
        serde_json::from_value(value).ok()
    }

    fn session_save(&self, session: &mut Session, key: Option<&str>) {
        let key = key.unwrap_or_else(|| Self::snapshot_key());
        if let Some(value) = self.to_snapshot() {
            session.set(key, value);
        }
    }

    fn session_exists(session: &mut Session, key: Option<&str>) -> bool {
        session.exist(key.unwrap_or_else(|| Self::snapshot_key()))
    }

    fn session_reload(session: &mut Session, key: Option<&str>) -> Option<Self> {
        let key = key.unwrap_or_else(|| Self::snapshot_key());
        session.get(key).and_then(Self::from_snapshot)
    }

    /// Remove the stored snapshot; reports whether one was present.
    fn session_remove(session: &mut Session, key: Option<&str>) -> bool {
        let key = key.unwrap_or_else(|| Self::snapshot_key());
        if !session.exist(key) {
            return false;
        }

        session.remove(key);
        true
    }
}
