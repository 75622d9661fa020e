use core::fmt;

use axum::http::{HeaderMap, header::SET_COOKIE};
use axum_extra::extract::cookie::{Cookie, SameSite};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("Failed to encode session value for key '{key}': {source}")]
    Encode {
        key: String,
        source: serde_json::Error,
    },

    #[error("Failed to decode session value for key '{key}': {source}")]
    Decode {
        key: String,
        source: serde_json::Error,
    },
}

/// Identifies one visitor's session, carried in the session cookie.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VisitorId(Uuid);

impl VisitorId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn parse(value: &str) -> Option<Self> {
        value.parse::<Uuid>().ok().map(Self)
    }
}

impl fmt::Display for VisitorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone)]
pub struct CookieSettings {
    pub name: String,
    pub secure: bool,
}

impl CookieSettings {
    pub fn cookie_for(&self, visitor: VisitorId) -> Cookie<'static> {
        Cookie::build((self.name.clone(), visitor.to_string()))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .secure(self.secure)
            .build()
    }

    /// True when the response already carries this session cookie.
    pub fn is_set_on(&self, headers: &HeaderMap) -> bool {
        let prefix = format!("{}=", self.name);
        headers
            .get_all(SET_COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .any(|value| value.starts_with(&prefix))
    }
}
