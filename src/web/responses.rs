//! Error-to-response mapping for the API handlers.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde_json::json;
use tracing::error;

use crate::errors::QueryError;

impl IntoResponse for QueryError {
    fn into_response(self) -> Response {
        let message = match &self {
            QueryError::Sampling(_) => "Error fetching system data",
            QueryError::Persistence(_) => "Error fetching system logs",
        };
        error!("{message}: {self}");

        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({
                "message": message,
                "error": self.to_string(),
            })),
        )
            .into_response()
    }
}
