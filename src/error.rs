//! Errors surfaced by the SIGAC API pipeline.

use reqwest::StatusCode;
use thiserror::Error;

/// Error produced by any call through the client.
///
/// Cloneable so one refresh failure can be delivered to every request
/// waiting on the same refresh window.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The API answered with a non-success status; carries the server's
    /// `message` body.
    #[error("{message}")]
    Api { status: StatusCode, message: String },

    /// No usable session credentials while handling a server-rendered
    /// request. Guards translate this into a sign-in redirect.
    #[error("authentication token missing or unusable")]
    AuthToken,

    /// The request never produced a response.
    #[error("request failed: {0}")]
    Transport(String),

    /// The response body did not match the expected shape.
    #[error("{0}")]
    Decode(String),
}

impl ApiError {
    /// HTTP status of the response, when there was one.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_auth_token(&self) -> bool {
        matches!(self, ApiError::AuthToken)
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(error: reqwest::Error) -> Self {
        ApiError::Transport(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_variant_displays_server_message() {
        let error = ApiError::Api {
            status: StatusCode::UNPROCESSABLE_ENTITY,
            message: "Horas inválidas.".to_string(),
        };
        assert_eq!(error.to_string(), "Horas inválidas.");
        assert_eq!(error.status(), Some(StatusCode::UNPROCESSABLE_ENTITY));
    }

    #[test]
    fn only_auth_token_variant_is_distinguished() {
        assert!(ApiError::AuthToken.is_auth_token());
        assert!(!ApiError::Transport("connection refused".into()).is_auth_token());
        assert_eq!(ApiError::Transport("x".into()).status(), None);
    }
}
