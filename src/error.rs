use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::clients::github::DispatchError;

/// Everything that can end a relay request early. Each variant maps to one
/// status and a fixed plain-text body; details only go to the log.
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("method not allowed")]
    MethodNotAllowed,

    #[error("unauthorized")]
    Unauthorized,

    #[error("request body exceeds {limit} bytes")]
    PayloadTooLarge { limit: usize },

    #[error("failed to read request body: {0}")]
    BodyRead(String),

    #[error("invalid JSON body: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error(transparent)]
    Dispatch(#[from] DispatchError),
}

impl RelayError {
    pub fn status(&self) -> StatusCode {
        match self {
            RelayError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            RelayError::Unauthorized => StatusCode::UNAUTHORIZED,
            RelayError::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            RelayError::BodyRead(_) | RelayError::InvalidJson(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            RelayError::Dispatch(DispatchError::Downstream { .. }) => StatusCode::BAD_GATEWAY,
            RelayError::Dispatch(DispatchError::Transport(_)) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn public_message(&self) -> &'static str {
        match self {
            RelayError::MethodNotAllowed => "Method Not Allowed",
            RelayError::Unauthorized => "Unauthorized",
            RelayError::PayloadTooLarge { .. } => "Payload Too Large",
            RelayError::Dispatch(DispatchError::Downstream { .. }) => "GitHub dispatch failed",
            RelayError::BodyRead(_)
            | RelayError::InvalidJson(_)
            | RelayError::Dispatch(DispatchError::Transport(_)) => "Error",
        }
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        (self.status(), self.public_message()).into_response()
    }
}
