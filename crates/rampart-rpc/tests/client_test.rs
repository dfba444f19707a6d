// Integration tests for `DaemonClient` using wiremock.
#![allow(clippy::unwrap_used)]

use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use rampart_rpc::{DaemonClient, Error, RpcTimeouts, TransportConfig};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, DaemonClient) {
    let server = MockServer::start().await;
    let client = DaemonClient::from_reqwest(
        &server.uri(),
        reqwest::Client::new(),
        RpcTimeouts::default(),
    )
    .unwrap();
    (server, client)
}

fn short_timeouts() -> RpcTimeouts {
    RpcTimeouts {
        read: Duration::from_millis(100),
        apply: Duration::from_millis(100),
        discard: Duration::from_millis(100),
        save: Duration::from_millis(100),
        restore: Duration::from_millis(100),
        backup: Duration::from_millis(100),
        ping_grace: Duration::from_millis(100),
    }
}

// ── Happy-path tests ────────────────────────────────────────────────

#[tokio::test]
async fn test_status() {
    let (server, client) = setup().await;

    let body = json!({
        "version": "1.4.2",
        "uptime_secs": 86400,
        "config_loaded": true
    });

    Mock::given(method("GET"))
        .and(path("/v1/status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let status = client.status().await.unwrap();

    assert_eq!(status.version, "1.4.2");
    assert_eq!(status.uptime_secs, 86400);
    assert!(status.config_loaded);
}

#[tokio::test]
async fn test_get_config() {
    let (server, client) = setup().await;

    let body = json!({
        "schema_version": "1.1",
        "zones": [{ "name": "lan" }]
    });

    Mock::given(method("GET"))
        .and(path("/v1/config/staged"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let config: serde_json::Value = client.get_config().await.unwrap();

    assert_eq!(config["schema_version"], "1.1");
    assert_eq!(config["zones"][0]["name"], "lan");
}

#[tokio::test]
async fn test_apply_config() {
    let (server, client) = setup().await;

    let config = json!({ "schema_version": "1.1", "zones": [] });

    Mock::given(method("POST"))
        .and(path("/v1/config/apply"))
        .and(body_json(&config))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    client.apply_config(&config).await.unwrap();
}

#[tokio::test]
async fn test_save_and_discard() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/v1/config/save"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/v1/config/discard"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    client.save_config().await.unwrap();
    client.discard_config().await.unwrap();
}

#[tokio::test]
async fn test_create_backup() {
    let (server, client) = setup().await;

    let body = json!({
        "version": 17,
        "description": "pre-apply safety backup",
        "pinned": false,
        "created_at": "2025-06-01T12:00:00Z",
        "size_bytes": 4096
    });

    Mock::given(method("POST"))
        .and(path("/v1/backups"))
        .and(body_json(json!({
            "description": "pre-apply safety backup",
            "pinned": false
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(&body))
        .mount(&server)
        .await;

    let backup = client
        .create_backup("pre-apply safety backup", false)
        .await
        .unwrap();

    assert_eq!(backup.version, 17);
    assert_eq!(backup.description, "pre-apply safety backup");
    assert!(!backup.pinned);
    assert_eq!(backup.size_bytes, 4096);
}

#[tokio::test]
async fn test_restore_backup() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/v1/backups/restore"))
        .and(body_json(json!({ "version": 17 })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    client.restore_backup(17).await.unwrap();
}

#[tokio::test]
async fn test_get_backup_content() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/v1/backups/17/content"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{\n  \"zones\": []\n}"))
        .mount(&server)
        .await;

    let content = client.get_backup_content(17).await.unwrap();

    assert!(content.contains("zones"));
}

#[tokio::test]
async fn test_ping() {
    let (server, client) = setup().await;

    let body = json!({
        "reachable": true,
        "rtt_ms": 3.2
    });

    Mock::given(method("POST"))
        .and(path("/v1/ping"))
        .and(body_json(json!({ "target": "8.8.8.8", "timeout_secs": 5 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let reply = client.ping("8.8.8.8", 5).await.unwrap();

    assert!(reply.reachable);
    assert!((reply.rtt_ms - 3.2).abs() < f64::EPSILON);
    assert!(reply.error.is_none());
}

// ── Auth header ─────────────────────────────────────────────────────

#[tokio::test]
async fn test_token_header_attached() {
    let server = MockServer::start().await;
    let transport = TransportConfig {
        auth_token: Some("s3cret".to_owned().into()),
        ..TransportConfig::default()
    };
    let client = DaemonClient::new(&server.uri(), &transport, RpcTimeouts::default()).unwrap();

    Mock::given(method("GET"))
        .and(path("/v1/status"))
        .and(header("x-rampart-token", "s3cret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "version": "1.0.0",
            "uptime_secs": 1
        })))
        .expect(1)
        .mount(&server)
        .await;

    client.status().await.unwrap();
}

// ── Error handling ──────────────────────────────────────────────────

#[tokio::test]
async fn test_unauthorized() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/v1/status"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let err = client.status().await.unwrap_err();

    assert!(matches!(err, Error::Unauthorized));
}

#[tokio::test]
async fn test_daemon_error_parsed() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/v1/config/apply"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "message": "nftables transaction rejected",
            "code": "NFT_COMMIT_FAILED"
        })))
        .mount(&server)
        .await;

    let err = client.apply_config(&json!({})).await.unwrap_err();

    match err {
        Error::Daemon {
            status,
            message,
            code,
        } => {
            assert_eq!(status, 500);
            assert_eq!(message, "nftables transaction rejected");
            assert_eq!(code.as_deref(), Some("NFT_COMMIT_FAILED"));
        }
        other => panic!("expected daemon error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_daemon_error_plain_body() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/v1/backups/restore"))
        .respond_with(ResponseTemplate::new(500).set_body_string("restore failed"))
        .mount(&server)
        .await;

    let err = client.restore_backup(3).await.unwrap_err();

    match err {
        Error::Daemon { status, message, code } => {
            assert_eq!(status, 500);
            assert_eq!(message, "restore failed");
            assert!(code.is_none());
        }
        other => panic!("expected daemon error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_apply_timeout() {
    let server = MockServer::start().await;
    let client =
        DaemonClient::from_reqwest(&server.uri(), reqwest::Client::new(), short_timeouts())
            .unwrap();

    Mock::given(method("POST"))
        .and(path("/v1/config/apply"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
        .mount(&server)
        .await;

    let err = client.apply_config(&json!({})).await.unwrap_err();

    assert!(err.is_timeout());
    match err {
        Error::Timeout { operation, .. } => assert_eq!(operation, "apply_config"),
        other => panic!("expected timeout, got {other:?}"),
    }
}

#[tokio::test]
async fn test_ping_budget_includes_grace() {
    let server = MockServer::start().await;
    let timeouts = RpcTimeouts {
        ping_grace: Duration::from_millis(400),
        ..short_timeouts()
    };
    let client =
        DaemonClient::from_reqwest(&server.uri(), reqwest::Client::new(), timeouts).unwrap();

    // Delay under 1s probe budget + 400ms grace, so the call succeeds.
    Mock::given(method("POST"))
        .and(path("/v1/ping"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "reachable": false, "error": "timed out" }))
                .set_delay(Duration::from_millis(1200)),
        )
        .mount(&server)
        .await;

    let reply = client.ping("10.0.0.1", 1).await.unwrap();

    assert!(!reply.reachable);
    assert_eq!(reply.error.as_deref(), Some("timed out"));
}

#[tokio::test]
async fn test_deserialization_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/v1/status"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let err = client.status().await.unwrap_err();

    assert!(matches!(err, Error::Deserialization { .. }));
}
