//! HTTP status mapping for handler errors.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;

use rampart_core::Error as CoreError;

/// Envelope returned by every failing handler.
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Rpc(#[from] rampart_rpc::Error),

    #[error("{0}")]
    BadRequest(String),
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    /// Validation and malformed input are the caller's fault; lookup
    /// misses are 404; daemon timeouts are 504 so clients can tell an
    /// unknown outcome from a failed one (502).
    fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Rpc(e) => rpc_status(e),
            Self::Core(core) => match core {
                CoreError::Validation(_) | CoreError::InvalidInput { .. } => {
                    StatusCode::BAD_REQUEST
                }
                CoreError::NotFound { .. } => StatusCode::NOT_FOUND,
                CoreError::Rpc(e) => rpc_status(e),
                CoreError::Serialization(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }
}

fn rpc_status(err: &rampart_rpc::Error) -> StatusCode {
    if err.is_timeout() {
        StatusCode::GATEWAY_TIMEOUT
    } else {
        StatusCode::BAD_GATEWAY
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ErrorBody {
            error: self.to_string(),
        };
        if status.is_server_error() {
            tracing::error!("{status}: {}", body.error);
        } else {
            tracing::debug!("{status}: {}", body.error);
        }
        (status, Json(body)).into_response()
    }
}
