use crate::frame::DecodeError;
use crate::store::StoreError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// Reasons an uplink callback is refused. Everything except a store failure
/// is the caller's fault and is reported before any write is attempted.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("missing required field `{0}`")]
    MissingField(&'static str),

    #[error(transparent)]
    MalformedHex(#[from] DecodeError),

    #[error("invalid payload: {0}")]
    InvalidPayload(String),

    #[error("tag `{0}` must be a string, number or boolean")]
    UnsupportedTag(String),

    #[error("failed to write data point: {0}")]
    StoreWriteFailure(#[from] StoreError),
}

impl IngestError {
    pub fn status(&self) -> StatusCode {
        match self {
            IngestError::StoreWriteFailure(_) => StatusCode::BAD_GATEWAY,
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for IngestError {
    fn into_response(self) -> Response {
        (self.status(), self.to_string()).into_response()
    }
}
