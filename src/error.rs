use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Unsupported action: {0}")]
    UnsupportedAction(String),

    #[error("Invalid params: {0}")]
    InvalidParams(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("RPC error: {0}")]
    Rpc(String),

    #[error("Request timeout after {0} seconds")]
    Timeout(u64),

    #[error("External API error: {0}")]
    ExternalApi(String),

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl GatewayError {
    pub fn status(&self) -> StatusCode {
        match self {
            GatewayError::UnsupportedAction(_)
            | GatewayError::InvalidParams(_)
            | GatewayError::BadRequest(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<reqwest::Error> for GatewayError {
    fn from(e: reqwest::Error) -> Self {
        GatewayError::ExternalApi(e.to_string())
    }
}

impl From<serde_json::Error> for GatewayError {
    fn from(e: serde_json::Error) -> Self {
        GatewayError::Decode(e.to_string())
    }
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        } else {
            tracing::debug!("Rejected request: {}", self);
        }

        let message = match self {
            GatewayError::UnsupportedAction(_) => "Unsupported action".to_string(),
            other => other.to_string(),
        };

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

pub type Result<T> = std::result::Result<T, GatewayError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsupported_action_and_params_are_client_errors() {
        assert_eq!(
            GatewayError::UnsupportedAction("mint".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            GatewayError::InvalidParams("missing address".into()).status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn upstream_failures_are_server_errors() {
        assert_eq!(
            GatewayError::Rpc("connection refused".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            GatewayError::Timeout(30).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
