use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ports::UpstreamError;

/// JSON error body returned by the proxy endpoints
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("Mint parameter is required")]
    MissingIdentifier,

    #[error("Invalid mint parameter")]
    InvalidIdentifier,

    /// The cause is logged server-side; callers only see a generic message
    #[error("Failed to fetch data")]
    Upstream(#[source] UpstreamError),
}

impl GatewayError {
    pub fn status(&self) -> StatusCode {
        match self {
            GatewayError::MissingIdentifier | GatewayError::InvalidIdentifier => StatusCode::BAD_REQUEST,
            GatewayError::Upstream(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(GatewayError::MissingIdentifier.status(), StatusCode::BAD_REQUEST);
        assert_eq!(GatewayError::InvalidIdentifier.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            GatewayError::Upstream(UpstreamError::Status(500)).status(),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn test_upstream_message_is_generic() {
        let err = GatewayError::Upstream(UpstreamError::ParseError("secret detail".into()));
        assert_eq!(err.to_string(), "Failed to fetch data");
    }
}
