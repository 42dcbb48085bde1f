// Copyright (c) 2025 Fortress Labs. All rights reserved.
// This software is proprietary and confidential.

//! Operator session storage and the auth guard
//!
//! The browser dashboard keeps the JWT pair in cookies/local storage;
//! the console keeps it in a JSON file under the user config dir.
//! Every non-public command goes through [`SessionStore::require`],
//! which refuses to proceed without a stored, unexpired access token.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use thiserror::Error;
use tracing::{debug, warn};

/// Environment variable that bypasses the session file entirely
pub const ACCESS_TOKEN_ENV: &str = "FORTRESS_ACCESS_TOKEN";

/// Stored JWT pair.
///
/// The refresh token is persisted because the backend issues one, but
/// no refresh flow exists; expiry forces a fresh login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub access: String,
    #[serde(default)]
    pub refresh: Option<String>,
}

impl Session {
    pub fn new(access: String, refresh: Option<String>) -> Self {
        Self { access, refresh }
    }

    /// Value for the `Authorization` header
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.access)
    }
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("not authenticated - run `fortress login` first")]
    NotAuthenticated,

    #[error("session expired - run `fortress login` again")]
    Expired,

    #[error("session storage error: {0}")]
    Storage(#[from] std::io::Error),

    #[error("malformed session file: {0}")]
    Malformed(String),
}

/// File-backed session store
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    /// Store at the default location under the user config dir
    pub fn open_default() -> Self {
        let path = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("fortress")
            .join("session.json");
        Self { path }
    }

    /// Store at an explicit path (used by tests)
    pub fn at(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn load(&self) -> Result<Option<Session>, SessionError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&self.path)?;
        let session =
            serde_json::from_str(&content).map_err(|e| SessionError::Malformed(e.to_string()))?;
        Ok(Some(session))
    }

    pub fn save(&self, session: &Session) -> Result<(), SessionError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(session)
            .map_err(|e| SessionError::Malformed(e.to_string()))?;
        fs::write(&self.path, content)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&self.path, fs::Permissions::from_mode(0o600))?;
        }

        debug!("Session saved to {:?}", self.path);
        Ok(())
    }

    pub fn clear(&self) -> Result<(), SessionError> {
        if self.path.exists() {
            fs::remove_file(&self.path)?;
            debug!("Session cleared");
        }
        Ok(())
    }

    /// The auth guard: return a usable session or refuse.
    ///
    /// An expired access token is removed on sight, the same way the
    /// login view clears a stale cookie before redirecting.
    pub fn require(&self) -> Result<Session, SessionError> {
        if let Ok(token) = std::env::var(ACCESS_TOKEN_ENV) {
            if !token.is_empty() {
                return Ok(Session::new(token, None));
            }
        }

        let session = self.load()?.ok_or(SessionError::NotAuthenticated)?;
        if !token_is_valid(&session.access) {
            warn!("Stored access token is expired or malformed; clearing session");
            let _ = self.clear();
            return Err(SessionError::Expired);
        }
        Ok(session)
    }
}

/// Whether a JWT access token exists and has an unexpired `exp` claim
pub fn token_is_valid(token: &str) -> bool {
    match token_expiry(token) {
        Some(exp) => exp > chrono::Utc::now().timestamp(),
        None => false,
    }
}

/// Decode the `exp` claim from a JWT without verifying the signature.
/// Signature verification is the backend's job; the console only needs
/// to know whether a login round trip can be skipped.
pub fn token_expiry(token: &str) -> Option<i64> {
    let mut parts = token.split('.');
    let _header = parts.next()?;
    let payload = parts.next()?;
    let _signature = parts.next()?;
    if parts.next().is_some() {
        return None;
    }

    let bytes = URL_SAFE_NO_PAD.decode(payload.as_bytes()).ok()?;
    let claims: serde_json::Value = serde_json::from_slice(&bytes).ok()?;
    claims.get("exp")?.as_i64()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Unsigned JWT with the given exp claim, enough for expiry checks
    pub(crate) fn make_token(exp: i64) -> String {
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
        let payload = URL_SAFE_NO_PAD.encode(format!(r#"{{"exp":{}}}"#, exp).as_bytes());
        format!("{}.{}.sig", header, payload)
    }

    #[test]
    fn test_token_expiry_decodes_exp() {
        let token = make_token(1_900_000_000);
        assert_eq!(token_expiry(&token), Some(1_900_000_000));
    }

    #[test]
    fn test_token_without_exp_is_invalid() {
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256"}"#);
        let payload = URL_SAFE_NO_PAD.encode(br#"{"sub":"admin"}"#);
        let token = format!("{}.{}.sig", header, payload);
        assert!(!token_is_valid(&token));
    }

    #[test]
    fn test_garbage_token_is_invalid() {
        assert!(!token_is_valid("not-a-jwt"));
        assert!(!token_is_valid("a.b"));
        assert!(!token_is_valid("a.b.c.d"));
    }

    #[test]
    fn test_future_token_is_valid() {
        let exp = chrono::Utc::now().timestamp() + 3600;
        assert!(token_is_valid(&make_token(exp)));
    }

    #[test]
    fn test_past_token_is_invalid() {
        let exp = chrono::Utc::now().timestamp() - 3600;
        assert!(!token_is_valid(&make_token(exp)));
    }
}
