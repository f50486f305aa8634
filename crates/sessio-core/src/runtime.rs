//! Scoped request lifecycle
//!
//! The session persists once, after all mutations for the request are
//! done. Rather than hooking an end-of-request dispatcher, the runner
//! wraps request handling and guarantees the final `save()` before the
//! response directives are handed back.

use sessio_session::{ResponseDirectives, Session};

use crate::config::SessionConfig;
use crate::Result;

/// Build a session for the request, run `handler` with it, then save and
/// drain the response directives. A failed save is logged and does not
/// fail the request.
pub fn with_session<F, T>(
    config: &SessionConfig,
    incoming_cookie: Option<String>,
    handler: F,
) -> Result<(T, ResponseDirectives)>
where
    F: FnOnce(&mut Session) -> T,
{
    let mut session = config.build_session(incoming_cookie)?;
    let output = handler(&mut session);

    if !session.save() {
        tracing::warn!(
            id = session.id().unwrap_or_default(),
            "session save failed at end of request"
        );
    }

    Ok((output, session.take_response()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use sessio_session::CookieDirective;
    use tempfile::TempDir;

    use crate::config::StorageConfig;

    fn file_config(dir: &TempDir) -> SessionConfig {
        SessionConfig {
            storage: StorageConfig::File {
                path: dir.path().to_path_buf(),
                duration: 1800,
            },
            ..SessionConfig::default()
        }
    }

    #[test]
    fn test_round_trip_across_requests() {
        let dir = TempDir::new().unwrap();
        let config = file_config(&dir);

        let (_, directives) = with_session(&config, None, |session| {
            session.set("cart", json!([1, 2]));
        })
        .unwrap();

        let id = directives
            .cookies()
            .iter()
            .find_map(|cookie| match cookie {
                CookieDirective::Set { name, value } if name == "SID" => Some(value.clone()),
                _ => None,
            })
            .unwrap();

        let (cart, _) = with_session(&config, Some(id), |session| session.get("cart")).unwrap();
        assert_eq!(cart, Some(json!([1, 2])));
    }

    #[test]
    fn test_cookieless_request_emits_no_directives() {
        let dir = TempDir::new().unwrap();
        let config = file_config(&dir);

        let (value, directives) =
            with_session(&config, None, |session| session.get("anything")).unwrap();

        assert_eq!(value, None);
        assert!(directives.is_empty());
    }
}
