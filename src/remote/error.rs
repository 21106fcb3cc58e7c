//! HTTP error classification for the ticketing backend.

use std::fmt;

use reqwest::StatusCode;

use crate::error::DeskError;

/// A failed backend call, with the HTTP status when one was received.
#[derive(Debug)]
pub struct ApiError {
    /// HTTP status code, if available
    pub status: Option<StatusCode>,
    /// Human-readable error message
    pub message: String,
    /// Endpoint path that failed
    pub endpoint: String,
}

impl ApiError {
    pub fn new(message: impl Into<String>, endpoint: impl Into<String>) -> Self {
        Self {
            status: None,
            message: message.into(),
            endpoint: endpoint.into(),
        }
    }

    pub fn with_status(
        message: impl Into<String>,
        endpoint: impl Into<String>,
        status: StatusCode,
    ) -> Self {
        Self {
            status: Some(status),
            message: message.into(),
            endpoint: endpoint.into(),
        }
    }

    /// Server-side failures worth retrying later
    pub fn is_transient(&self) -> bool {
        self.status.is_some_and(|s| s.is_server_error())
    }

    /// The backend rejected the session token
    pub fn is_auth(&self) -> bool {
        matches!(
            self.status,
            Some(StatusCode::UNAUTHORIZED) | Some(StatusCode::FORBIDDEN)
        )
    }

    pub fn to_desk_error(&self) -> DeskError {
        if self.is_auth() {
            return DeskError::Auth(format!(
                "{} rejected the session ({}), run `ticketdesk login` again",
                self.endpoint, self
            ));
        }
        if self.is_transient() {
            return DeskError::Api(format!(
                "{}: {} (the backend may be temporarily unavailable, try again shortly)",
                self.endpoint, self
            ));
        }
        DeskError::Api(format!("{}: {}", self.endpoint, self))
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status {
            Some(status) => write!(
                f,
                "HTTP {} {}: {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("Unknown"),
                self.message
            ),
            None => write!(f, "{}", self.message),
        }
    }
}

impl From<ApiError> for DeskError {
    fn from(error: ApiError) -> Self {
        error.to_desk_error()
    }
}
