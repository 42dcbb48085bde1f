// Copyright (c) 2025 Fortress Labs. All rights reserved.
// This software is proprietary and confidential.

/**
 * Fortress Console - API Client Tests
 * Endpoint coverage, error taxonomy and response caching
 *
 * @copyright 2025 Fortress Labs
 * @license Proprietary
 */

use fortress_console::api::auth::AuthClient;
use fortress_console::api::{ApiClient, ExportFormat};
use fortress_console::config::ConsoleConfig;
use fortress_console::errors::ApiError;
use fortress_console::types::{
    NewThreatLog, RiskLevel, ScanState, ScannerConfigUpdate, ThreatKind, TriggerOutcome,
};
use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config_for(server: &MockServer) -> ConsoleConfig {
    ConsoleConfig {
        backend_url: server.uri(),
        ..Default::default()
    }
}

fn client_for(server: &MockServer) -> ApiClient {
    ApiClient::new(&config_for(server), Some("token123".to_string())).unwrap()
}

#[tokio::test]
async fn test_trigger_scan_success() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/xss/scan/"))
        .and(header("Authorization", "Bearer token123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": "Scan started",
            "scan_id": "scan-42",
            "status": "success"
        })))
        .mount(&server)
        .await;

    let trigger = client_for(&server)
        .trigger_scan("https://example.com")
        .await
        .unwrap();

    assert_eq!(trigger.status, TriggerOutcome::Success);
    assert_eq!(trigger.scan_id.as_deref(), Some("scan-42"));
}

#[tokio::test]
async fn test_scan_status_parses_states() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/xss/scan-status/scan-42/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "scan_id": "scan-42",
            "target_url": "https://example.com",
            "status": "scanning",
            "spider_progress": 100,
            "scan_progress": 30,
            "total_progress": 65
        })))
        .mount(&server)
        .await;

    let status = client_for(&server).scan_status("scan-42").await.unwrap();
    assert_eq!(status.status, ScanState::Scanning);
    assert!(!status.status.is_terminal());
    assert_eq!(status.total_progress, 65);
}

#[tokio::test]
async fn test_scan_logs_and_single_log() {
    let server = MockServer::start().await;

    let log = json!({
        "id": 7,
        "alert": "Reflected XSS",
        "risk": "High",
        "url": "https://example.com/search",
        "description": "Input reflected unencoded",
        "solution": "Encode output",
        "created_at": "2025-06-01T10:00:00Z",
        "updated_at": "2025-06-01T10:00:00Z"
    });

    Mock::given(method("GET"))
        .and(path("/api/xss/logs/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([log])))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/xss/logs/7/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(log))
        .mount(&server)
        .await;

    let client = client_for(&server);

    let logs = client.scan_logs().await.unwrap();
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].risk, RiskLevel::High);

    let single = client.scan_log(7).await.unwrap();
    assert_eq!(single.alert, "Reflected XSS");
}

#[tokio::test]
async fn test_delete_scan_log() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/api/xss/logs/7/"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"message": "Log deleted"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let ack = client_for(&server).delete_scan_log(7).await.unwrap();
    assert_eq!(ack.text(), "Log deleted");
}

#[tokio::test]
async fn test_export_logs_returns_raw_bytes() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/xss/logs/export/"))
        .and(query_param("type", "csv"))
        .respond_with(ResponseTemplate::new(200).set_body_string("id,alert\n1,XSS\n"))
        .mount(&server)
        .await;

    let bytes = client_for(&server)
        .export_logs(ExportFormat::Csv)
        .await
        .unwrap();
    assert_eq!(bytes, b"id,alert\n1,XSS\n");
}

#[tokio::test]
async fn test_scanner_config_roundtrip() {
    let server = MockServer::start().await;

    let config_body = json!({
        "scan_depth": 2,
        "timeout": 60,
        "exclude_urls": "",
        "enable_alerts": true,
        "enable_toast": true,
        "enable_email": false,
        "updated_at": "2025-06-01T10:00:00Z"
    });

    Mock::given(method("GET"))
        .and(path("/api/xss/scanner-config/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(config_body.clone()))
        .mount(&server)
        .await;

    Mock::given(method("PUT"))
        .and(path("/api/xss/scanner-config/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "scan_depth": 5,
            "timeout": 60,
            "exclude_urls": "",
            "enable_alerts": true,
            "enable_toast": true,
            "enable_email": false,
            "updated_at": "2025-06-01T11:00:00Z"
        })))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/xss/scanner-config/reset/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(config_body))
        .mount(&server)
        .await;

    let client = client_for(&server);

    let current = client.scanner_config().await.unwrap();
    assert_eq!(current.scan_depth, 2);

    let update = ScannerConfigUpdate {
        scan_depth: Some(5),
        ..Default::default()
    };
    let saved = client.update_scanner_config(&update).await.unwrap();
    assert_eq!(saved.scan_depth, 5);

    let reset = client.reset_scanner_config().await.unwrap();
    assert_eq!(reset.scan_depth, 2);
}

#[tokio::test]
async fn test_threat_logs_list_and_create() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/threats/logs/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "id": 1,
            "type": "BruteForce",
            "source_ip": "10.0.0.9",
            "description": "Repeated login failures",
            "timestamp": "2025-06-03T02:00:00Z"
        }])))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/threats/logs/"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": 2,
            "type": "XSS",
            "source_ip": "10.0.0.7",
            "description": "Script injection attempt",
            "timestamp": "2025-06-03T03:00:00Z"
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);

    let logs = client.threat_logs().await.unwrap();
    assert_eq!(logs[0].kind, ThreatKind::BruteForce);

    let created = client
        .create_threat_log(&NewThreatLog {
            kind: ThreatKind::Xss,
            source_ip: "10.0.0.7".to_string(),
            description: "Script injection attempt".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(created.id, 2);
    assert_eq!(created.kind, ThreatKind::Xss);
}

#[tokio::test]
async fn test_sql_scan_endpoints() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/threats/sql-scan/"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"scan_id": "sql-9"})),
        )
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/threats/sql-scan/status/sql-9/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "scan_id": "sql-9",
            "status": "complete",
            "total_progress": 100
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/threats/sql-scan/logs/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "id": 3,
            "url": "https://example.com/item",
            "param": "id",
            "description": "Boolean-based blind injection",
            "risk": "High",
            "timestamp": "2025-06-04T09:00:00Z"
        }])))
        .mount(&server)
        .await;

    let client = client_for(&server);

    let trigger = client.trigger_sql_scan("https://example.com").await.unwrap();
    // the sql trigger omits message/status; defaults apply
    assert_eq!(trigger.status, TriggerOutcome::Success);
    assert_eq!(trigger.scan_id.as_deref(), Some("sql-9"));

    let status = client.sql_scan_status("sql-9").await.unwrap();
    assert!(status.status.is_terminal());

    let logs = client.sql_scan_logs().await.unwrap();
    assert_eq!(logs[0].param, "id");
}

#[tokio::test]
async fn test_server_error_carries_backend_message() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/xss/scan/"))
        .respond_with(
            ResponseTemplate::new(500).set_body_json(json!({"message": "scanner offline"})),
        )
        .mount(&server)
        .await;

    let err = client_for(&server)
        .trigger_scan("https://example.com")
        .await
        .unwrap_err();

    match err {
        ApiError::Server { status, message } => {
            assert_eq!(status, 500);
            assert_eq!(message, "scanner offline");
        }
        other => panic!("expected server error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_unreachable_backend_is_a_connection_error() {
    // nothing listens on this port
    let config = ConsoleConfig {
        backend_url: "http://127.0.0.1:9".to_string(),
        request_timeout_secs: 2,
        ..Default::default()
    };
    let client = ApiClient::new(&config, None).unwrap();

    let err = client.scan_logs().await.unwrap_err();
    assert!(err.is_connection_error(), "got {:?}", err);
    assert_eq!(err.status(), None);
}

#[tokio::test]
async fn test_malformed_body_is_invalid_response() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/xss/logs/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("this is not json"))
        .mount(&server)
        .await;

    let err = client_for(&server).scan_logs().await.unwrap_err();
    assert!(matches!(err, ApiError::InvalidResponse(_)), "got {:?}", err);
}

#[tokio::test]
async fn test_get_cache_serves_second_read() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/xss/logs/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server).with_cache(16, 60);

    let first = client.scan_logs().await.unwrap();
    let second = client.scan_logs().await.unwrap();
    assert_eq!(first.len(), second.len());
}

#[tokio::test]
async fn test_mutation_invalidates_cached_reads() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/xss/logs/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(2)
        .mount(&server)
        .await;

    Mock::given(method("DELETE"))
        .and(path("/api/xss/logs/1/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "deleted"})))
        .mount(&server)
        .await;

    let client = client_for(&server).with_cache(16, 60);

    let _ = client.scan_logs().await.unwrap();
    let _ = client.delete_scan_log(1).await.unwrap();
    // the delete dropped the cache entry, so this hits the backend again
    let _ = client.scan_logs().await.unwrap();
}

#[tokio::test]
async fn test_login_returns_session() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/fortress_auth/login/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access": "header.payload.sig",
            "refresh": "header.payload2.sig"
        })))
        .mount(&server)
        .await;

    let auth = AuthClient::new(&config_for(&server)).unwrap();
    let session = auth.login("admin", "hunter2").await.unwrap();
    assert_eq!(session.access, "header.payload.sig");
    assert_eq!(session.refresh.as_deref(), Some("header.payload2.sig"));
}

#[tokio::test]
async fn test_login_rejection_surfaces_detail() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/fortress_auth/login/"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "detail": "No active account found with the given credentials"
        })))
        .mount(&server)
        .await;

    let auth = AuthClient::new(&config_for(&server)).unwrap();
    let err = auth.login("admin", "wrong").await.unwrap_err();

    assert_eq!(err.status(), Some(401));
    assert!(err.to_string().contains("No active account"));
}

#[tokio::test]
async fn test_register_and_reset_password() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/fortress_auth/register/"))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(json!({"message": "User created"})),
        )
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/fortress_auth/reset-password/"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"message": "Password updated"})),
        )
        .mount(&server)
        .await;

    let auth = AuthClient::new(&config_for(&server)).unwrap();
    assert_eq!(auth.register("op", "pw").await.unwrap().text(), "User created");
    assert_eq!(
        auth.reset_password("op", "pw2").await.unwrap().text(),
        "Password updated"
    );
}
