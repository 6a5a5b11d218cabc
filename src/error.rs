// src/error.rs
//! Error taxonomy shared by the API client, the credential store and the views

use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

pub type PortalResult<T> = std::result::Result<T, PortalError>;

/// Shown when the server rejects the stored token.
pub const SESSION_EXPIRED: &str = "Your session has expired. Please log in again.";

#[derive(Debug, Error)]
pub enum PortalError {
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("API error (status {status}): {}", .message.as_deref().unwrap_or("no message"))]
    Api {
        status: StatusCode,
        message: Option<String>,
    },

    #[error("Failed to decode response from {endpoint}: {reason}")]
    Decode { endpoint: String, reason: String },

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("No token stored, log in first")]
    MissingToken,

    #[error("Credential storage error: {0}")]
    Credentials(String),
}

/// Body shape the API uses for error responses.
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: Option<String>,
    error: Option<String>,
}

impl PortalError {
    /// Build an `Api` error from a non-2xx status and the raw response body.
    pub fn from_response(status: StatusCode, body: &str) -> Self {
        let message = serde_json::from_str::<ApiErrorBody>(body)
            .ok()
            .and_then(|parsed| parsed.message.or(parsed.error))
            .filter(|m| !m.trim().is_empty());

        PortalError::Api { status, message }
    }

    /// Message supplied by the server, if any.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            PortalError::Api { message, .. } => message.as_deref(),
            _ => None,
        }
    }

    /// The server's message when it sent one, otherwise the given fallback.
    /// A rejected token always asks the user to log in again.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            PortalError::Validation(msg) => msg.clone(),
            PortalError::MissingToken => self.to_string(),
            PortalError::Api { .. } if self.is_auth_failure() => SESSION_EXPIRED.to_string(),
            _ => self
                .server_message()
                .map(str::to_string)
                .unwrap_or_else(|| fallback.to_string()),
        }
    }

    /// True when the server rejected the bearer token. No re-authentication is
    /// attempted; the user has to log in again.
    pub fn is_auth_failure(&self) -> bool {
        match self {
            PortalError::Api { status, .. } => {
                *status == StatusCode::UNAUTHORIZED || *status == StatusCode::FORBIDDEN
            }
            PortalError::MissingToken => true,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_response_picks_message_field() {
        let err = PortalError::from_response(
            StatusCode::BAD_REQUEST,
            r#"{"message":"Email already registered"}"#,
        );
        assert_eq!(err.server_message(), Some("Email already registered"));
        assert_eq!(
            err.user_message("An error occurred"),
            "Email already registered"
        );
    }

    #[test]
    fn test_from_response_falls_back_to_error_field() {
        let err = PortalError::from_response(StatusCode::NOT_FOUND, r#"{"error":"not found"}"#);
        assert_eq!(err.server_message(), Some("not found"));
    }

    #[test]
    fn test_from_response_without_json_body() {
        let err = PortalError::from_response(StatusCode::INTERNAL_SERVER_ERROR, "<html>oops</html>");
        assert_eq!(err.server_message(), None);
        assert_eq!(err.user_message("An error occurred"), "An error occurred");
    }

    #[test]
    fn test_auth_failure_detection() {
        let unauthorized = PortalError::from_response(StatusCode::UNAUTHORIZED, "");
        assert!(unauthorized.is_auth_failure());
        assert!(PortalError::MissingToken.is_auth_failure());

        let bad_request = PortalError::from_response(StatusCode::BAD_REQUEST, "");
        assert!(!bad_request.is_auth_failure());
    }

    #[test]
    fn test_rejected_token_asks_for_login() {
        let expired = PortalError::from_response(
            StatusCode::UNAUTHORIZED,
            r#"{"message":"jwt expired"}"#,
        );
        assert_eq!(expired.user_message("Failed to delete. Try again."), SESSION_EXPIRED);

        let forbidden = PortalError::from_response(StatusCode::FORBIDDEN, "");
        assert_eq!(forbidden.user_message("Update failed. Try again."), SESSION_EXPIRED);
    }
}
