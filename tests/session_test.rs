// Copyright (c) 2025 Fortress Labs. All rights reserved.
// This software is proprietary and confidential.

/**
 * Fortress Console - Session Store Tests
 * Token persistence and the auth guard
 *
 * @copyright 2025 Fortress Labs
 * @license Proprietary
 */

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use fortress_console::session::{Session, SessionError, SessionStore};

/// Unsigned JWT carrying only an exp claim
fn make_token(exp: i64) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(format!(r#"{{"exp":{}}}"#, exp).as_bytes());
    format!("{}.{}.sig", header, payload)
}

fn future_exp() -> i64 {
    chrono::Utc::now().timestamp() + 3600
}

fn past_exp() -> i64 {
    chrono::Utc::now().timestamp() - 3600
}

#[test]
fn test_save_load_clear_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    let store = SessionStore::at(dir.path().join("session.json"));

    assert!(store.load().unwrap().is_none());

    let session = Session::new(make_token(future_exp()), Some("refresh-token".to_string()));
    store.save(&session).unwrap();

    let loaded = store.load().unwrap().unwrap();
    assert_eq!(loaded.access, session.access);
    assert_eq!(loaded.refresh.as_deref(), Some("refresh-token"));

    store.clear().unwrap();
    assert!(store.load().unwrap().is_none());
}

#[test]
fn test_guard_refuses_without_session() {
    let dir = tempfile::tempdir().unwrap();
    let store = SessionStore::at(dir.path().join("session.json"));

    let err = store.require().unwrap_err();
    assert!(matches!(err, SessionError::NotAuthenticated));
    assert!(err.to_string().contains("fortress login"));
}

#[test]
fn test_guard_accepts_valid_session() {
    let dir = tempfile::tempdir().unwrap();
    let store = SessionStore::at(dir.path().join("session.json"));

    let session = Session::new(make_token(future_exp()), None);
    store.save(&session).unwrap();

    let loaded = store.require().unwrap();
    assert_eq!(loaded.access, session.access);
    assert_eq!(loaded.bearer(), format!("Bearer {}", session.access));
}

#[test]
fn test_guard_clears_expired_session() {
    let dir = tempfile::tempdir().unwrap();
    let store = SessionStore::at(dir.path().join("session.json"));

    store
        .save(&Session::new(make_token(past_exp()), None))
        .unwrap();

    let err = store.require().unwrap_err();
    assert!(matches!(err, SessionError::Expired));

    // expired token was removed, so the next failure is NotAuthenticated
    let err = store.require().unwrap_err();
    assert!(matches!(err, SessionError::NotAuthenticated));
}

#[test]
fn test_malformed_session_file_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");
    std::fs::write(&path, "not json at all").unwrap();

    let store = SessionStore::at(path);
    let err = store.load().unwrap_err();
    assert!(matches!(err, SessionError::Malformed(_)));
}

#[cfg(unix)]
#[test]
fn test_session_file_is_private() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");
    let store = SessionStore::at(path.clone());

    store
        .save(&Session::new(make_token(future_exp()), None))
        .unwrap();

    let mode = std::fs::metadata(&path).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o600);
}
