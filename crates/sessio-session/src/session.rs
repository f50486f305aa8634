//! Session state machine
//!
//! One `Session` instance serves one HTTP request/response cycle:
//! uninitialized until first access, then loaded from the backend (or
//! created fresh), mutated in memory with a dirty flag, and persisted once
//! by `save()` at end of request. Expired records are destroyed and
//! replaced with a fresh session on read.

use chrono::{DateTime, Duration, Utc};
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use sessio_storage::SessionStorage;

use crate::cookie::CookieName;
use crate::events::{self, EventTimer};
use crate::response::{ResponseDirectives, CACHE_HEADERS};
use crate::Result;

pub struct Session {
    storage: Box<dyn SessionStorage>,
    name: CookieName,
    refresh_ttl: Duration,
    /// Session id carried by the incoming request cookie, if any.
    incoming_id: Option<String>,
    id: Option<String>,
    data: Map<String, Value>,
    start_time: DateTime<Utc>,
    access_time: Option<DateTime<Utc>>,
    changed: bool,
    initialized: bool,
    response: ResponseDirectives,
}

impl Session {
    /// Build a session for one request. `incoming_cookie` is the value of
    /// the session cookie on the request, when present. Fails fast on an
    /// invalid cookie name.
    pub fn new(
        name: &str,
        storage: Box<dyn SessionStorage>,
        refresh_ttl: Duration,
        incoming_cookie: Option<String>,
    ) -> Result<Self> {
        let name = CookieName::new(name)?;

        Ok(Self {
            storage,
            name,
            refresh_ttl,
            incoming_id: incoming_cookie,
            id: None,
            data: Map::new(),
            start_time: Utc::now(),
            access_time: None,
            changed: false,
            initialized: false,
            response: ResponseDirectives::default(),
        })
    }

    fn have_cookie(&self) -> bool {
        self.incoming_id.is_some()
    }

    /// Open the backend and load (or create) this request's session. Runs
    /// at most once per instance; every accessor goes through here first.
    /// I/O failures on open/read degrade to a fresh session rather than
    /// failing the request.
    fn init(&mut self) {
        if self.initialized {
            return;
        }

        let timer = EventTimer::start();
        if let Err(error) = self.storage.open() {
            tracing::warn!(%error, "session storage open failed");
        }
        events::open(&timer);

        match self.incoming_id.clone() {
            None => self.create(),
            Some(id) => {
                let timer = EventTimer::start();
                match self.storage.read(&id) {
                    Ok(Some(found)) => {
                        events::read(&timer, Some(&found));

                        let record = found.record;
                        self.id = Some(id.clone());
                        self.data = record.data;
                        self.start_time = record.start_time;
                        self.access_time = Some(record.access_time);

                        if is_expired(record.access_time, self.storage.duration(), Utc::now()) {
                            if let Err(error) = self.storage.destroy(&id) {
                                tracing::warn!(%error, "expired session destroy failed");
                            }
                            self.create();
                        }
                    }
                    Ok(None) => {
                        events::read(&timer, None);
                        self.create();
                    }
                    Err(error) => {
                        tracing::warn!(%error, "session storage read failed");
                        events::read(&timer, None);
                        self.create();
                    }
                }
            }
        }

        for (name, value) in CACHE_HEADERS {
            self.response.add_header(name, value);
        }

        self.initialized = true;
    }

    /// Mint a fresh session: new id, empty data, a Set-Cookie directive for
    /// the response. A stale or unknown cookie id is never reused.
    fn create(&mut self) {
        let id = mint_id();
        tracing::debug!(id = %id, "created fresh session");

        self.response.set_cookie(self.name.as_str(), &id);
        self.id = Some(id);
        self.start_time = Utc::now();
        self.access_time = None;
        self.data = Map::new();
    }

    /// Look up a value. A request that carried no session cookie has no
    /// session to read from, so this returns `None` without minting one.
    pub fn get(&mut self, name: &str) -> Option<Value> {
        if !self.have_cookie() {
            return None;
        }

        self.init();
        self.data.get(name).cloned()
    }

    /// `get` followed by `remove`: read-once semantics.
    pub fn get_flush(&mut self, name: &str) -> Option<Value> {
        if !self.have_cookie() {
            return None;
        }

        let value = self.get(name);
        self.remove(name);
        value
    }

    /// Store a value. Re-setting a key to an equal value leaves the dirty
    /// flag untouched.
    pub fn set(&mut self, name: &str, value: impl Into<Value>) {
        self.init();

        let value = value.into();
        if self.data.get(name) == Some(&value) {
            return;
        }

        self.changed = true;
        self.data.insert(name.to_string(), value);
    }

    /// Append to the sequence stored under `name`, starting one when the
    /// key is absent or holds a non-sequence.
    pub fn push(&mut self, name: &str, value: impl Into<Value>) {
        let mut items = match self.get(name) {
            Some(Value::Array(items)) => items,
            _ => Vec::new(),
        };
        items.push(value.into());

        self.set(name, Value::Array(items));
    }

    /// Merge a mapping over the one stored under `name` (later keys win),
    /// starting empty when the key is absent or holds a non-mapping.
    pub fn merge(&mut self, name: &str, value: Map<String, Value>) {
        let mut merged = match self.get(name) {
            Some(Value::Object(map)) => map,
            _ => Map::new(),
        };
        for (key, item) in value {
            merged.insert(key, item);
        }

        self.set(name, Value::Object(merged));
    }

    /// Delete a key. Removing an absent key leaves the dirty flag
    /// untouched.
    pub fn remove(&mut self, name: &str) {
        self.init();

        if !self.data.contains_key(name) {
            return;
        }

        self.changed = true;
        self.data.remove(name);
    }

    pub fn exist(&mut self, name: &str) -> bool {
        self.init();
        self.data.contains_key(name)
    }

    /// Drop the stored record and clear the session cookie. Returns whether
    /// the backend actually removed a record; backend failure reads as
    /// `false`, never a panic.
    pub fn destroy(&mut self) -> bool {
        self.init();

        let timer = EventTimer::start();
        self.initialized = false;

        let removed = match self.id.as_deref() {
            Some(id) => match self.storage.destroy(id) {
                Ok(removed) => removed,
                Err(error) => {
                    tracing::warn!(%error, "session storage destroy failed");
                    false
                }
            },
            None => false,
        };

        self.response.clear_cookie(self.name.as_str());
        events::destroy(&timer);

        removed
    }

    /// Persist once at end of request. A session that was never initialized
    /// has nothing to persist. Unchanged data is only re-touched when the
    /// access time has drifted past the refresh TTL; changed data is
    /// written. Returns `false` only when the backend call fails.
    pub fn save(&mut self) -> bool {
        if !self.initialized {
            return true;
        }

        let id = match self.id.clone() {
            Some(id) => id,
            None => return true,
        };

        let now = Utc::now();
        let access_time = match self.access_time {
            Some(access_time) => access_time,
            None => {
                self.access_time = Some(now);
                now
            }
        };

        if !self.changed && access_time + self.refresh_ttl < now {
            self.access_time = Some(now);

            let timer = EventTimer::start();
            match self.storage.touch(&id, &self.data, self.start_time, now) {
                Ok(length) => {
                    events::touch(&timer, length);
                    true
                }
                Err(error) => {
                    tracing::warn!(%error, "session touch failed");
                    false
                }
            }
        } else if self.changed {
            self.access_time = Some(now);

            let timer = EventTimer::start();
            match self.storage.write(&id, &self.data, self.start_time, now) {
                Ok(length) => {
                    self.changed = false;
                    events::write(&timer, length);
                    true
                }
                Err(error) => {
                    tracing::warn!(%error, "session write failed");
                    false
                }
            }
        } else {
            true
        }
    }

    /// The session id, once init has assigned one.
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    pub fn is_started(&self) -> bool {
        self.initialized
    }

    pub fn start_time(&self) -> DateTime<Utc> {
        self.start_time
    }

    pub fn access_time(&self) -> Option<DateTime<Utc>> {
        self.access_time
    }

    /// The full data mapping, initializing the session first.
    pub fn data(&mut self) -> &Map<String, Value> {
        self.init();
        &self.data
    }

    /// Accumulated response directives (headers, cookies).
    pub fn response(&self) -> &ResponseDirectives {
        &self.response
    }

    /// Drain the accumulated response directives for the HTTP layer.
    pub fn take_response(&mut self) -> ResponseDirectives {
        std::mem::take(&mut self.response)
    }
}

/// Expiry check: a record is expired once its access time plus the backend
/// duration lies strictly before `now`.
fn is_expired(access_time: DateTime<Utc>, max_duration: Duration, now: DateTime<Utc>) -> bool {
    access_time + max_duration < now
}

/// A random, practically-unique token: sha-256 over a fresh UUID and a
/// nanosecond timestamp, hex-encoded.
fn mint_id() -> String {
    let seed = Uuid::new_v4();
    let unique = Utc::now().timestamp_nanos_opt().unwrap_or_default();
    hex::encode(Sha256::digest(format!("{seed}:{unique}").as_bytes()))
}
