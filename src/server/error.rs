//! HTTP rendering of relay errors

use crate::error::RelayError;
use axum::{
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Body: `{"error": message, "kind": kind, "details": provider error?}`
impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        if self.is_client_error() {
            tracing::warn!("{} {}: {}", self.status, self.kind.as_str(), self.message);
        } else {
            tracing::error!("{} {}: {}", self.status, self.kind.as_str(), self.message);
        }

        let mut body = json!({
            "error": self.message,
            "kind": self.kind.as_str(),
        });
        if let Some(raw) = self.raw {
            body["details"] = raw;
        }
        (self.status, Json(body)).into_response()
    }
}
