use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde_json::json;
use tracing::warn;

use super::request::{SendResultsRequest, ValidationError};
use super::service::{MailDispatchError, ResultsMailer};
use super::transport::MailTransport;

pub const SEND_RESULTS_PATH: &str = "/api/send-results";

const DELIVERY_FAILURE_MESSAGE: &str = "failed to send email; verify the address and try again";

/// Router exposing the results email endpoint.
pub fn results_router<T>(mailer: Arc<ResultsMailer<T>>) -> Router
where
    T: MailTransport + 'static,
{
    Router::new()
        .route(SEND_RESULTS_PATH, post(send_results_handler::<T>))
        .with_state(mailer)
}

pub(crate) async fn send_results_handler<T>(
    State(mailer): State<Arc<ResultsMailer<T>>>,
    payload: Result<Json<SendResultsRequest>, JsonRejection>,
) -> Response
where
    T: MailTransport + 'static,
{
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            warn!(error = %rejection.body_text(), "malformed results email payload");
            return failure_response(
                StatusCode::BAD_REQUEST,
                ValidationError::Payload(rejection.body_text()).to_string(),
            );
        }
    };

    match mailer.send(request).await {
        Ok(receipt) => {
            let payload = json!({
                "success": true,
                "message": format!("Results sent to {}", receipt.recipient),
                "sentAt": receipt.sent_at,
            });
            (StatusCode::OK, Json(payload)).into_response()
        }
        Err(MailDispatchError::Validation(error)) => {
            failure_response(StatusCode::BAD_REQUEST, error.to_string())
        }
        Err(MailDispatchError::NotConfigured(_)) => failure_response(
            StatusCode::SERVICE_UNAVAILABLE,
            "email service is not configured".to_string(),
        ),
        Err(MailDispatchError::Delivery(_)) => failure_response(
            StatusCode::BAD_GATEWAY,
            DELIVERY_FAILURE_MESSAGE.to_string(),
        ),
    }
}

/// JSON error envelope shared by the assessment endpoints.
pub fn failure_response(status: StatusCode, error: String) -> Response {
    let payload = json!({
        "success": false,
        "error": error,
    });
    (status, Json(payload)).into_response()
}
