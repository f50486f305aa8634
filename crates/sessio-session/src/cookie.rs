//! Session cookie name validation

use std::fmt;

use crate::error::SessionError;
use crate::Result;

/// Characters a cookie name may never contain.
const FORBIDDEN: [char; 9] = ['=', ',', ';', ' ', '\t', '\r', '\n', '\x0b', '\x0c'];

/// A validated cookie name: non-empty, free of separators and control
/// characters. Invalid names are a configuration error and fail fast.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CookieName(String);

impl CookieName {
    pub fn new(name: &str) -> Result<Self> {
        if name.is_empty() {
            return Err(SessionError::EmptyCookieName);
        }

        if name.contains(&FORBIDDEN[..]) {
            return Err(SessionError::InvalidCookieName(name.to_string()));
        }

        Ok(Self(name.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CookieName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_ordinary_names() {
        assert_eq!(CookieName::new("SID").unwrap().as_str(), "SID");
        assert!(CookieName::new("my_session.id-2").unwrap().as_str() == "my_session.id-2");
    }

    #[test]
    fn test_rejects_empty_name() {
        assert!(matches!(
            CookieName::new(""),
            Err(SessionError::EmptyCookieName)
        ));
    }

    #[test]
    fn test_rejects_each_forbidden_character() {
        for c in FORBIDDEN {
            let name = format!("SID{c}");
            assert!(
                matches!(CookieName::new(&name), Err(SessionError::InvalidCookieName(_))),
                "{c:?} should be rejected"
            );
        }
    }
}
