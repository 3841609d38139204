//! Request handlers and their JSON envelopes.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use super::AppState;
use crate::domain::{EntryId, FeedbackEntry, StoreKind};
use crate::error::{DomainError, Error, StoreError};

#[derive(Debug, Deserialize)]
pub struct SubmitRequest {
    #[serde(default)]
    pub feedback: String,
}

#[derive(Debug, Deserialize)]
pub struct DeleteRequest {
    pub id: String,
    pub store: StoreKind,
}

#[derive(Debug, Serialize)]
pub struct OutcomeResponse {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct FetchResponse {
    pub success: bool,
    pub source: StoreKind,
    pub items: Vec<FeedbackItem>,
}

#[derive(Debug, Serialize)]
pub struct FeedbackItem {
    pub timestamp: String,
    pub feedback: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub success: bool,
    /// Configured backends in fallback priority order.
    pub stores: Vec<StoreKind>,
}

impl From<FeedbackEntry> for FeedbackItem {
    fn from(entry: FeedbackEntry) -> Self {
        Self {
            timestamp: entry.timestamp.to_rfc3339(),
            feedback: entry.text,
            id: entry.id.map(|id| id.to_string()),
        }
    }
}

fn outcome(status: StatusCode, success: bool, message: &str) -> Response {
    (
        status,
        Json(OutcomeResponse {
            success,
            message: message.to_string(),
        }),
    )
        .into_response()
}

pub async fn submit(
    State(service): State<AppState>,
    Json(request): Json<SubmitRequest>,
) -> Response {
    match service.submit(&request.feedback).await {
        Ok(stored_to) => {
            info!(store = %stored_to, "feedback stored");
            outcome(
                StatusCode::OK,
                true,
                "Thank you! Your feedback has been saved.",
            )
        }
        Err(Error::Domain(DomainError::EmptyFeedback)) => outcome(
            StatusCode::BAD_REQUEST,
            false,
            "Please enter your feedback.",
        ),
        Err(e) => {
            error!(error = %e, "submit failed on every store");
            outcome(
                StatusCode::BAD_GATEWAY,
                false,
                "Failed to save feedback. Please try again.",
            )
        }
    }
}

pub async fn fetch(State(service): State<AppState>) -> Response {
    match service.fetch().await {
        Ok(page) => (
            StatusCode::OK,
            Json(FetchResponse {
                success: true,
                source: page.source,
                items: page.items.into_iter().map(FeedbackItem::from).collect(),
            }),
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, "fetch failed on every store");
            outcome(
                StatusCode::BAD_GATEWAY,
                false,
                "Failed to load feedback. Please try again.",
            )
        }
    }
}

pub async fn remove(
    State(service): State<AppState>,
    Json(request): Json<DeleteRequest>,
) -> Response {
    let id = EntryId::new(request.id);
    match service.delete(request.store, &id).await {
        Ok(true) => {
            info!(store = %request.store, id = %id, "feedback deleted");
            outcome(StatusCode::OK, true, "Feedback deleted.")
        }
        Ok(false) => outcome(StatusCode::NOT_FOUND, false, "No matching feedback entry."),
        Err(Error::Store(StoreError::DeleteUnsupported { store })) => outcome(
            StatusCode::BAD_REQUEST,
            false,
            &format!("The {store} store does not support deletion."),
        ),
        Err(Error::Store(StoreError::UnknownStore(name))) => outcome(
            StatusCode::BAD_REQUEST,
            false,
            &format!("No {name} store is configured."),
        ),
        Err(e) => {
            error!(error = %e, "delete failed");
            outcome(
                StatusCode::BAD_GATEWAY,
                false,
                "Failed to delete feedback. Please try again.",
            )
        }
    }
}

pub async fn status(State(service): State<AppState>) -> Json<StatusResponse> {
    Json(StatusResponse {
        success: true,
        stores: service.stores(),
    })
}
