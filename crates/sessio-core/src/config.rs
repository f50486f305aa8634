//! Session configuration
//!
//! Plain serde structs with defaults. `StorageConfig` doubles as the
//! backend factory: the `class` tag selects the implementation and the
//! remaining fields are its arguments.

use std::path::PathBuf;

use chrono::Duration;
use serde::{Deserialize, Serialize};

use sessio_session::Session;
use sessio_storage::{SessionStorage, DEFAULT_DURATION_SECS};

use crate::error::CoreError;
use crate::Result;

pub const DEFAULT_COOKIE_NAME: &str = "SID";
pub const DEFAULT_REFRESH_TTL_SECS: u64 = 60;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Name of the cookie carrying the session id.
    pub name: String,
    /// Seconds before an unchanged session's access time is re-persisted.
    pub refresh_ttl: u64,
    pub storage: StorageConfig,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_COOKIE_NAME.to_string(),
            refresh_ttl: DEFAULT_REFRESH_TTL_SECS,
            storage: StorageConfig::default(),
        }
    }
}

impl SessionConfig {
    /// Build the session serving one request, wired to the configured
    /// backend. `incoming_cookie` is the session cookie value from the
    /// request, when present.
    pub fn build_session(&self, incoming_cookie: Option<String>) -> Result<Session> {
        let storage = self.storage.build()?;
        let refresh_ttl = Duration::seconds(self.refresh_ttl as i64);

        Ok(Session::new(
            &self.name,
            storage,
            refresh_ttl,
            incoming_cookie,
        )?)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "class", rename_all = "lowercase")]
pub enum StorageConfig {
    Memory {
        #[serde(default = "default_duration")]
        duration: i64,
    },
    File {
        #[serde(default = "default_session_dir")]
        path: PathBuf,
        #[serde(default = "default_duration")]
        duration: i64,
    },
    Redis {
        url: String,
        #[serde(default)]
        prefix: Option<String>,
        #[serde(default = "default_duration")]
        duration: i64,
    },
}

fn default_duration() -> i64 {
    DEFAULT_DURATION_SECS
}

fn default_session_dir() -> PathBuf {
    std::env::temp_dir().join("sessio")
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self::File {
            path: default_session_dir(),
            duration: default_duration(),
        }
    }
}

impl StorageConfig {
    /// Construct the configured backend. Selecting a backend this build
    /// cannot provide is an explicit error, never a silent fallback.
    pub fn build(&self) -> Result<Box<dyn SessionStorage>> {
        match self {
            StorageConfig::Memory { duration } => Ok(Box::new(
                sessio_storage::MemoryStorage::new(Duration::seconds(*duration)),
            )),
            StorageConfig::File { path, duration } => Ok(Box::new(
                sessio_storage::FileStorage::new(path.clone(), Duration::seconds(*duration)),
            )),
            StorageConfig::Redis {
                url,
                prefix,
                duration,
            } => {
                #[cfg(feature = "redis")]
                {
                    let storage = sessio_storage::RedisStorage::from_url(
                        url,
                        prefix.as_deref(),
                        Duration::seconds(*duration),
                    )
                    .map_err(|error| CoreError::UnsupportedStorage(error.to_string()))?;

                    Ok(Box::new(storage))
                }
                #[cfg(not(feature = "redis"))]
                {
                    let _ = (url, prefix, duration);
                    Err(CoreError::UnsupportedStorage(
                        "redis storage support is not compiled in".to_string(),
                    ))
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults() {
        let config = SessionConfig::default();

        assert_eq!(config.name, "SID");
        assert_eq!(config.refresh_ttl, 60);
        assert!(matches!(config.storage, StorageConfig::File { .. }));
    }

    #[test]
    fn test_deserializes_with_partial_fields() {
        let config: SessionConfig = serde_json::from_value(json!({
            "name": "APPSID",
            "storage": { "class": "memory" },
        }))
        .unwrap();

        assert_eq!(config.name, "APPSID");
        assert_eq!(config.refresh_ttl, 60);
        assert!(matches!(
            config.storage,
            StorageConfig::Memory { duration: 1800 }
        ));
    }

    #[cfg(feature = "redis")]
    #[test]
    fn test_deserializes_redis_arguments() {
        let config: SessionConfig = serde_json::from_value(json!({
            "storage": {
                "class": "redis",
                "url": "redis://127.0.0.1:6379",
                "prefix": "app",
                "duration": 600,
            },
        }))
        .unwrap();

        match &config.storage {
            StorageConfig::Redis {
                url,
                prefix,
                duration,
            } => {
                assert_eq!(url, "redis://127.0.0.1:6379");
                assert_eq!(prefix.as_deref(), Some("app"));
                assert_eq!(*duration, 600);
            }
            other => panic!("expected redis storage, got {other:?}"),
        }
    }

    #[test]
    fn test_memory_and_file_backends_build() {
        assert!(StorageConfig::Memory { duration: 60 }.build().is_ok());

        let dir = tempfile::TempDir::new().unwrap();
        assert!(StorageConfig::File {
            path: dir.path().to_path_buf(),
            duration: 60,
        }
        .build()
        .is_ok());
    }

    #[cfg(feature = "redis")]
    #[test]
    fn test_unsupported_scheme_fails_loudly() {
        let result = StorageConfig::Redis {
            url: "http://127.0.0.1:6379".to_string(),
            prefix: None,
            duration: 60,
        }
        .build();

        assert!(matches!(result, Err(CoreError::UnsupportedStorage(_))));
    }

    #[test]
    fn test_invalid_cookie_name_fails_fast() {
        let config = SessionConfig {
            name: "S;D".to_string(),
            ..SessionConfig::default()
        };

        assert!(config.build_session(None).is_err());
    }
}
