//! Error types for redact-gateway

use thiserror::Error;

pub type Result<T> = std::result::Result<T, GatewayError>;

/// Normalized backend failure
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    /// Connection failed, timed out, or the body could not be read
    #[error("Network error: {0}")]
    Transport(String),

    /// Non-2xx with a structured error body
    #[error("Server error {status}: {message}")]
    ServerRejected { status: u16, message: String },

    /// Non-2xx without a parseable body
    #[error("Server error {status}: {status_text}")]
    ServerRejectedOpaque { status: u16, status_text: String },

    /// Every method in the fallback policy was refused
    #[error("{operation} rejected every method tried ({tried})")]
    ProtocolMismatch {
        operation: &'static str,
        tried: String,
    },

    /// 2xx whose payload reports failure
    #[error("{0}")]
    Unsuccessful(String),

    /// 2xx whose payload could not be decoded
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl GatewayError {
    /// Short label used in logs
    pub fn kind(&self) -> &'static str {
        match self {
            GatewayError::Transport(_) => "transport",
            GatewayError::ServerRejected { .. } => "server_rejected",
            GatewayError::ServerRejectedOpaque { .. } => "server_rejected_opaque",
            GatewayError::ProtocolMismatch { .. } => "protocol_mismatch",
            GatewayError::Unsuccessful(_) => "unsuccessful",
            GatewayError::InvalidResponse(_) => "invalid_response",
            GatewayError::InvalidRequest(_) => "invalid_request",
        }
    }

    /// Message shown to the operator, without the status prefix
    pub fn user_message(&self) -> String {
        match self {
            GatewayError::ServerRejected { message, .. } => message.clone(),
            GatewayError::ServerRejectedOpaque { status, status_text } => {
                format!("{} {}", status, status_text)
            }
            other => other.to_string(),
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            GatewayError::ServerRejected { status, .. }
            | GatewayError::ServerRejectedOpaque { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for GatewayError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            GatewayError::Transport("request timed out".to_string())
        } else if e.is_decode() {
            GatewayError::InvalidResponse(e.to_string())
        } else if e.is_builder() {
            GatewayError::InvalidRequest(e.to_string())
        } else {
            GatewayError::Transport(e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message_strips_prefix() {
        let err = GatewayError::ServerRejected {
            status: 404,
            message: "File not found".to_string(),
        };
        assert_eq!(err.user_message(), "File not found");
        assert_eq!(err.status(), Some(404));

        let err = GatewayError::ServerRejectedOpaque {
            status: 502,
            status_text: "Bad Gateway".to_string(),
        };
        assert_eq!(err.user_message(), "502 Bad Gateway");
    }

    #[test]
    fn test_protocol_mismatch_message() {
        let err = GatewayError::ProtocolMismatch {
            operation: "detect",
            tried: "POST, GET".to_string(),
        };
        assert_eq!(err.to_string(), "detect rejected every method tried (POST, GET)");
        assert_eq!(err.kind(), "protocol_mismatch");
    }
}
