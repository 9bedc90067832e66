use crate::infra::AppState;
use axum::extract::rejection::JsonRejection;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Extension;
use axum::Json;
use serde_json::json;
use std::sync::Arc;
use tracing::debug;
use wheel_of_life::assessment::{score, AssessmentInput};
use wheel_of_life::mail::{failure_response, results_router, MailTransport, ResultsMailer};

pub(crate) const SCORE_PATH: &str = "/api/v1/assessment/score";

pub(crate) fn with_assessment_routes<T>(mailer: Arc<ResultsMailer<T>>) -> axum::Router
where
    T: MailTransport + 'static,
{
    results_router(mailer)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route(SCORE_PATH, axum::routing::post(score_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

/// Score answers for interactive front-ends using the same scorer as the mailer.
pub(crate) async fn score_endpoint(
    payload: Result<Json<AssessmentInput>, JsonRejection>,
) -> Response {
    match payload {
        Ok(Json(input)) => {
            let result = score(&input);
            debug!(
                answered = input.satisfaction.len() + input.motivation.len(),
                "scored assessment"
            );
            (StatusCode::OK, Json(result)).into_response()
        }
        Err(rejection) => failure_response(
            StatusCode::BAD_REQUEST,
            format!("invalid assessment payload: {}", rejection.body_text()),
        ),
    }
}
