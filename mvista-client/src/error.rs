//! Client error types

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    /// Connection could not be made or was dropped
    #[error("Network connection failed, please check your network settings ({0})")]
    Network(String),

    #[error("Request timeout, please try again later")]
    Timeout,

    /// Base URL is not an absolute http(s) URL
    #[error("Invalid API URL: {0}")]
    InvalidUrl(String),

    /// Non-success HTTP status; `detail` is the server's error text when it sent one
    #[error("{message}")]
    Status {
        status: u16,
        message: String,
        detail: Option<String>,
    },

    /// Success status carrying a failure envelope
    #[error("{0}")]
    Api(String),

    /// Response body did not match the expected shape
    #[error("Unexpected response: {0}")]
    Decode(String),
}

impl ClientError {
    /// Error for a non-success response
    pub fn from_status(status: u16, detail: Option<String>) -> Self {
        ClientError::Status {
            status,
            message: status_message(status).to_string(),
            detail,
        }
    }

    /// HTTP status of the failed response, if there was one
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Server-provided error text, if any
    pub fn detail(&self) -> Option<&str> {
        match self {
            ClientError::Status { detail, .. } => detail.as_deref(),
            ClientError::Api(msg) => Some(msg),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ClientError::Timeout
        } else if e.is_decode() {
            ClientError::Decode(e.to_string())
        } else {
            ClientError::Network(e.to_string())
        }
    }
}

/// User-facing message for an HTTP status
pub fn status_message(status: u16) -> &'static str {
    match status {
        400 => "Request parameters are invalid",
        401 => "Authentication failed, please log in again",
        403 => "You do not have permission to perform this action",
        404 => "The requested resource does not exist",
        402..=499 => "Request parameters are invalid",
        500..=599 => "Internal server error, please try again later",
        _ => "Unknown error, please try again later",
    }
}
