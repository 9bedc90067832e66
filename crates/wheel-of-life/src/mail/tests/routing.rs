use super::common::*;
use axum::body::Body;
use axum::extract::State;
use axum::http::{header, Request, StatusCode};
use axum::Json;
use serde_json::json;
use std::sync::Arc;
use tower::ServiceExt;

use crate::config::MailConfig;
use crate::mail::router::{results_router, send_results_handler, SEND_RESULTS_PATH};

fn post_json(body: serde_json::Value) -> Request<Body> {
    Request::post(SEND_RESULTS_PATH)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request builds")
}

fn valid_payload() -> serde_json::Value {
    json!({
        "email": "someone@example.com",
        "name": "Avery",
        "updates": false,
        "assessmentData": {
            "satisfaction": { "health": 7 },
            "motivation": { "health": 9 }
        }
    })
}

#[tokio::test]
async fn handler_acknowledges_successful_send() {
    let transport = Arc::new(RecordingTransport::default());
    let mailer = mailer_with(configured_mail(), transport.clone());

    let response =
        send_results_handler::<RecordingTransport>(State(mailer), Ok(Json(request()))).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Results sent to someone@example.com");
    assert_eq!(transport.attempts().len(), 1);
}

#[tokio::test]
async fn acknowledgment_carries_send_timestamp() {
    let before = chrono::Utc::now();
    let mailer = mailer_with(configured_mail(), Arc::new(RecordingTransport::default()));

    let response =
        send_results_handler::<RecordingTransport>(State(mailer), Ok(Json(request()))).await;

    let body = read_json_body(response).await;
    let sent_at = body["sentAt"].as_str().expect("timestamp string");
    let sent_at = chrono::DateTime::parse_from_rfc3339(sent_at)
        .expect("rfc3339 timestamp")
        .with_timezone(&chrono::Utc);
    assert!(sent_at >= before);
    assert!(sent_at <= chrono::Utc::now());
}

#[tokio::test]
async fn route_reports_missing_configuration_without_sending() {
    let transport = Arc::new(RecordingTransport::default());
    let router = results_router(mailer_with(MailConfig::default(), transport.clone()));

    let response = router
        .oneshot(post_json(valid_payload()))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body = read_json_body(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "email service is not configured");
    assert!(transport.attempts().is_empty());
}

#[tokio::test]
async fn route_rejects_invalid_email() {
    let transport = Arc::new(RecordingTransport::default());
    let router = results_router(mailer_with(configured_mail(), transport.clone()));

    let mut payload = valid_payload();
    payload["email"] = json!("not-an-email");
    let response = router
        .oneshot(post_json(payload))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = read_json_body(response).await;
    assert_eq!(body["error"], "'not-an-email' is not a valid email address");
    assert!(transport.attempts().is_empty());
}

#[tokio::test]
async fn route_rejects_out_of_range_ratings() {
    let transport = Arc::new(RecordingTransport::default());
    let router = results_router(mailer_with(configured_mail(), transport.clone()));

    let mut payload = valid_payload();
    payload["assessmentData"]["motivation"]["career"] = json!(11);
    let response = router
        .oneshot(post_json(payload))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = read_json_body(response).await;
    assert_eq!(body["success"], false);
    assert!(transport.attempts().is_empty());
}

#[tokio::test]
async fn route_rejects_missing_assessment_data() {
    let transport = Arc::new(RecordingTransport::default());
    let router = results_router(mailer_with(configured_mail(), transport.clone()));

    let response = router
        .oneshot(post_json(json!({ "email": "someone@example.com" })))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(transport.attempts().is_empty());
}

#[tokio::test]
async fn route_maps_delivery_failures_to_generic_error() {
    let transport = Arc::new(FailingTransport::default());
    let router = results_router(mailer_with(configured_mail(), transport.clone()));

    let response = router
        .oneshot(post_json(valid_payload()))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let body = read_json_body(response).await;
    assert_eq!(
        body["error"],
        "failed to send email; verify the address and try again"
    );
    assert_eq!(transport.attempts(), 1);
}
