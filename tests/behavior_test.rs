//! Integration tests for the behavior recorder
//!
//! Covers the logged-out no-op, delivery, swallowed failures and the
//! drop-on-full queue policy.

use std::sync::Arc;

use serde_json::json;
use wiremock::{
    matchers::{body_json, header, method, path},
    Mock, MockServer, ResponseTemplate,
};

use energy_portal_client::api::ApiClient;
use energy_portal_client::behavior::{BehaviorRecorder, BehaviorStats, BehaviorType};
use energy_portal_client::config::{BehaviorConfig, PortalConfig, RequestConfig};
use energy_portal_client::storage::{MemoryStore, SessionManager};

/// Create a client with an empty in-memory session, optionally signed in
async fn create_client(server: &MockServer, token: Option<&str>) -> ApiClient {
    let session = SessionManager::load(Arc::new(MemoryStore::new()))
        .await
        .expect("Failed to load session");
    if let Some(token) = token {
        session.set_token(token).await.expect("Failed to set token");
    }

    let config = PortalConfig {
        base_url: server.uri(),
    };
    ApiClient::new(&config, RequestConfig { timeout_ms: 5000 }, Arc::new(session))
        .expect("Failed to create client")
}

fn behavior_config(capacity: usize) -> BehaviorConfig {
    BehaviorConfig {
        enabled: true,
        queue_capacity: capacity,
    }
}

#[cfg(test)]
mod delivery_tests {
    use super::*;

    #[tokio::test]
    async fn test_logged_out_sends_nothing() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/user/behavior"))
            .respond_with(ResponseTemplate::new(201))
            .expect(0)
            .mount(&mock_server)
            .await;

        let client = create_client(&mock_server, None).await;
        let recorder = BehaviorRecorder::spawn(client, &behavior_config(8));

        recorder.record(BehaviorType::View, json!({"content_type": "news"}));
        recorder.shutdown().await;

        assert_eq!(recorder.stats(), BehaviorStats::default());
    }

    #[tokio::test]
    async fn test_logged_in_posts_event() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/user/behavior"))
            .and(header("Authorization", "Bearer t1"))
            .and(body_json(json!({
                "behavior_type": "search",
                "details": {"query": "LNG"}
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({"success": true})))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = create_client(&mock_server, Some("t1")).await;
        let recorder = BehaviorRecorder::spawn(client, &behavior_config(8));

        recorder.record("search", json!({"query": "LNG"}));
        recorder.shutdown().await;

        let stats = recorder.stats();
        assert_eq!(stats.queued, 1);
        assert_eq!(stats.sent, 1);
        assert_eq!(stats.failed, 0);
    }

    #[tokio::test]
    async fn test_delivery_failure_is_swallowed() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/user/behavior"))
            .respond_with(ResponseTemplate::new(500).set_body_json(json!({"error": "boom"})))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = create_client(&mock_server, Some("t1")).await;
        let recorder = BehaviorRecorder::spawn(client, &behavior_config(8));

        recorder.record(BehaviorType::Click, json!({"target": "upgrade"}));
        recorder.shutdown().await;

        let stats = recorder.stats();
        assert_eq!(stats.sent, 0);
        assert_eq!(stats.failed, 1);
    }

    #[tokio::test]
    async fn test_custom_type_sent_verbatim() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/user/behavior"))
            .and(body_json(json!({
                "behavior_type": "export_csv",
                "details": {}
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({"success": true})))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = create_client(&mock_server, Some("t1")).await;
        let recorder = BehaviorRecorder::spawn(client, &behavior_config(8));

        recorder.record("export_csv", json!({}));
        recorder.shutdown().await;
    }
}

#[cfg(test)]
mod queue_tests {
    use super::*;

    // Current-thread runtime: the worker cannot run until this test yields,
    // so the queue fills deterministically.
    #[tokio::test]
    async fn test_full_queue_drops_events() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/user/behavior"))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({"success": true})))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = create_client(&mock_server, Some("t1")).await;
        let recorder = BehaviorRecorder::spawn(client, &behavior_config(1));

        recorder.record(BehaviorType::View, json!({"n": 1}));
        recorder.record(BehaviorType::View, json!({"n": 2}));
        recorder.record(BehaviorType::View, json!({"n": 3}));

        let stats = recorder.stats();
        assert_eq!(stats.queued, 1);
        assert_eq!(stats.dropped, 2);

        recorder.shutdown().await;
        assert_eq!(recorder.stats().sent, 1);
    }

    #[tokio::test]
    async fn test_disabled_recorder_drops_events() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/user/behavior"))
            .respond_with(ResponseTemplate::new(201))
            .expect(0)
            .mount(&mock_server)
            .await;

        let client = create_client(&mock_server, Some("t1")).await;
        let config = BehaviorConfig {
            enabled: false,
            queue_capacity: 8,
        };
        let recorder = BehaviorRecorder::spawn(client, &config);

        recorder.record(BehaviorType::View, json!({}));
        recorder.shutdown().await;

        assert_eq!(recorder.stats().dropped, 1);
    }

    #[tokio::test]
    async fn test_record_after_shutdown_is_dropped() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/user/behavior"))
            .respond_with(ResponseTemplate::new(201))
            .expect(0)
            .mount(&mock_server)
            .await;

        let client = create_client(&mock_server, Some("t1")).await;
        let recorder = BehaviorRecorder::spawn(client, &behavior_config(8));

        recorder.shutdown().await;
        recorder.record(BehaviorType::View, json!({}));

        let stats = recorder.stats();
        assert_eq!(stats.queued, 0);
        assert_eq!(stats.dropped, 1);
    }
}
