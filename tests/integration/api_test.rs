//! Integration tests for the HTTP surface.

mod helpers;

use axum::body::Body;
use http::{Request, StatusCode};
use serde_json::json;

use warehub_entity::alert::AlertStatus;

use helpers::TestApp;

#[tokio::test]
async fn test_send_alerts_without_body_processes_queue() {
    let app = TestApp::new();
    app.with_office_emails("ops@acme-storage.test").await;
    let alert = app.enqueue("shipment_received", None).await;

    let response = app.request("POST", "/send-alerts", None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["processed"], 1);
    assert_eq!(response.body["sent"], 1);
    assert_eq!(
        response.body["message"],
        "Processed 1 alert(s): 1 sent, 0 failed, 0 skipped"
    );
    assert_eq!(app.status(alert.id).await, AlertStatus::Sent);
}

#[tokio::test]
async fn test_send_alerts_empty_queue() {
    let app = TestApp::new();

    let response = app.request("POST", "/send-alerts", Some(json!({}))).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["message"], "No pending alerts to process");
    assert_eq!(response.body["processed"], 0);
}

#[tokio::test]
async fn test_send_alerts_scoped_to_alert_id() {
    let app = TestApp::new();
    app.with_office_emails("ops@acme-storage.test").await;
    let first = app.enqueue("shipment_received", None).await;
    let second = app.enqueue("shipment_received", None).await;

    let response = app
        .request(
            "POST",
            "/send-alerts",
            Some(json!({ "alert_queue_id": second.id, "tenant_id": app.tenant_id })),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["processed"], 1);
    assert_eq!(app.status(first.id).await, AlertStatus::Pending);
    assert_eq!(app.status(second.id).await, AlertStatus::Sent);
}

#[tokio::test]
async fn test_send_alerts_rejects_unparsable_body() {
    let app = TestApp::new();

    let req = Request::builder()
        .method("POST")
        .uri("/send-alerts")
        .header("Content-Type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = app.send(req).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_send_alerts_queue_failure_is_500() {
    let app = TestApp::new();
    app.store.set_unavailable(true).await;

    let response = app.request("POST", "/send-alerts", None).await;

    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(response.body["message"].as_str().unwrap().contains("unavailable"));
}

#[tokio::test]
async fn test_test_send_success() {
    let app = TestApp::new();

    let response = app
        .request(
            "POST",
            "/send-alerts",
            Some(json!({ "test_send": true, "test_email": "qa@acme-storage.test" })),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["success"], true);
    assert_eq!(response.body["message"], "Test email sent to qa@acme-storage.test");
    assert_eq!(app.outbox.sent().await.len(), 1);
}

#[tokio::test]
async fn test_test_send_requires_valid_email() {
    let app = TestApp::new();

    let response = app
        .request("POST", "/send-alerts", Some(json!({ "test_send": true })))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["success"], false);

    let response = app
        .request(
            "POST",
            "/send-alerts",
            Some(json!({ "test_send": true, "test_email": "not-an-email" })),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["success"], false);
    assert!(app.outbox.sent().await.is_empty());
}

#[tokio::test]
async fn test_test_send_provider_failure() {
    let app = TestApp::new();
    app.outbox.fail_with("Email provider rejected the message (401): invalid key").await;

    let response = app
        .request(
            "POST",
            "/send-alerts",
            Some(json!({ "test_send": true, "test_email": "qa@acme-storage.test" })),
        )
        .await;

    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.body["success"], false);
    assert!(response.body["error"].as_str().unwrap().contains("invalid key"));
}

#[tokio::test]
async fn test_preflight_returns_permissive_cors() {
    let app = TestApp::new();

    let req = Request::builder()
        .method("OPTIONS")
        .uri("/send-alerts")
        .header("Origin", "https://admin.warehub.app")
        .header("Access-Control-Request-Method", "POST")
        .header("Access-Control-Request-Headers", "content-type,authorization")
        .body(Body::empty())
        .unwrap();
    let response = app.send(req).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(
        response.headers.get("access-control-allow-origin").unwrap(),
        "*"
    );
    assert!(response.headers.contains_key("access-control-allow-methods"));
}

#[tokio::test]
async fn test_health() {
    let app = TestApp::new();

    let response = app.request("GET", "/api/health", None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["status"], "ok");
    assert!(response.body["version"].is_string());
}

#[tokio::test]
async fn test_validate_template_reports_problems() {
    let app = TestApp::new();

    let response = app
        .request(
            "POST",
            "/api/templates/validate",
            Some(json!({
                "subject": "Shipment [[shipment_number]]",
                "body": "<p>{{shipment_number}} for {{acount_name}}</p>"
            })),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["valid"], false);
    assert_eq!(response.body["unknown_placeholders"], json!(["acount_name"]));

    let response = app
        .request(
            "POST",
            "/api/templates/validate",
            Some(json!({ "body": "<p>{{shipment_number}} for {account_name}</p>" })),
        )
        .await;
    assert_eq!(response.body["valid"], true);
}

#[tokio::test]
async fn test_validate_template_requires_body() {
    let app = TestApp::new();

    let response = app
        .request("POST", "/api/templates/validate", Some(json!({ "body": "" })))
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}
