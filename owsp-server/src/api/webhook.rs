//! Open WebUI webhook handler.
//!
//! Decodes the delivery, runs the [`SignupProcessor`] and maps its result to
//! the response shapes the sender expects:
//!
//! | Result                     | Status | Body                                   |
//! |----------------------------|--------|----------------------------------------|
//! | undecodable body / user    | 400    | `{"error": ...}`                       |
//! | ignored or provisioned     | 200    | `{"status":"success"}`                 |
//! | rejected (empty/duplicate) | 200    | `{"success":false,"message":...}`      |
//! | store or mail failure      | 500    | `{"success":false,"message":...}`      |

use axum::{
    Json,
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use kanau::processor::Processor;
use owsp_core::processors::{ProvisioningNotifier, SignupError, SignupOutcome, SignupProcessor};
use owsp_sdk::objects::{Acknowledgement, DecodeError, ErrorBody, Rejection, WebhookEvent};
use std::error::Error as _;
use uuid::Uuid;

use crate::state::AppState;

/// `POST {webhook_path}` — handle one Open WebUI event delivery.
#[tracing::instrument(name = "open_webui_webhook", skip_all, fields(request_id = %Uuid::now_v7()))]
pub async fn open_webui_webhook(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Response, WebhookApiError> {
    let event = WebhookEvent::decode(&body).map_err(|e| {
        let cause = e.source().map(ToString::to_string).unwrap_or_default();
        tracing::error!(error = %e, cause = %cause, "Failed to decode webhook delivery");
        WebhookApiError::Decode(e)
    })?;

    let site = state.config.site().await.clone();
    let processor = SignupProcessor {
        store: state.store.clone(),
        notifier: ProvisioningNotifier::new(state.mailer.clone(), site),
        config: state.config.provisioning().await,
    };

    let outcome = processor.process(event).await.map_err(|e| {
        match &e {
            SignupError::Store(err) => {
                tracing::error!(error = %err, "Failed to create local account");
            }
            SignupError::Notify(err) => {
                tracing::error!(error = %err, "Local account created but welcome mail failed");
            }
        }
        WebhookApiError::Signup(e)
    })?;

    let response = match outcome {
        SignupOutcome::Ignored | SignupOutcome::Provisioned { .. } => {
            Json(Acknowledgement::success()).into_response()
        }
        SignupOutcome::Rejected(rejection) => Json(Rejection::new(rejection.message())).into_response(),
    };
    Ok(response)
}

/// Errors that end a webhook delivery with a non-success status.
#[derive(Debug)]
pub enum WebhookApiError {
    /// The body or its embedded user document could not be decoded.
    Decode(DecodeError),
    /// A collaborator failed while provisioning.
    Signup(SignupError),
}

impl IntoResponse for WebhookApiError {
    fn into_response(self) -> Response {
        match self {
            WebhookApiError::Decode(e) => {
                (StatusCode::BAD_REQUEST, Json(ErrorBody::new(e.to_string()))).into_response()
            }
            WebhookApiError::Signup(SignupError::Store(_)) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(Rejection::new("failed to create account")),
            )
                .into_response(),
            WebhookApiError::Signup(SignupError::Notify(_)) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(Rejection::new("failed to send welcome email")),
            )
                .into_response(),
        }
    }
}
