//! Client error types.

use kasir_core::PosError;
use std::time::Duration;
use thiserror::Error;

/// Errors talking to the POS API.
#[derive(Error, Debug)]
pub enum ClientError {
    /// Transport failure: connection refused, DNS, TLS, body read.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success response or an envelope reporting failure.
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// An authenticated call was made without a session.
    #[error("Not logged in")]
    Unauthenticated,

    /// The server rejected the session token.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// The response did not match the expected schema.
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Timed out after {0:?}")]
    Timeout(Duration),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ClientError {
    /// Message suitable for showing to the cashier as-is.
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Api { message, .. } | ClientError::Unauthorized(message) => {
                message.clone()
            }
            other => other.to_string(),
        }
    }

    /// Whether the stored session should be discarded.
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, ClientError::Unauthorized(_) | ClientError::Unauthenticated)
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;

/// Outcome of a failed checkout or restock.
#[derive(Error, Debug)]
pub enum CheckoutError {
    /// Rejected locally; nothing was sent.
    #[error(transparent)]
    Rejected(#[from] PosError),

    /// The collaborator refused or could not be reached.
    #[error("Submission failed: {message}")]
    SubmissionFailed {
        message: String,
        #[source]
        source: Option<ClientError>,
    },
}

impl CheckoutError {
    pub(crate) fn submission(err: ClientError) -> Self {
        CheckoutError::SubmissionFailed {
            message: err.user_message(),
            source: Some(err),
        }
    }

    /// Local validation failure, if that is what this is.
    pub fn as_rejection(&self) -> Option<&PosError> {
        match self {
            CheckoutError::Rejected(err) => Some(err),
            CheckoutError::SubmissionFailed { .. } => None,
        }
    }
}

/// Receipt printer failures.
#[derive(Error, Debug)]
pub enum PrinterError {
    #[error("Printer connection timed out after {0:?}")]
    ConnectTimeout(Duration),

    #[error("Printer disconnected")]
    Disconnected,

    #[error("Printer is not connected")]
    NotConnected,

    #[error("Printer I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message_passes_server_text_through() {
        let err = ClientError::Api {
            status: 422,
            message: "Stok tidak mencukupi".to_string(),
        };
        assert_eq!(err.user_message(), "Stok tidak mencukupi");
        assert_eq!(err.to_string(), "API error (422): Stok tidak mencukupi");
    }

    #[test]
    fn test_submission_failed_keeps_message() {
        let err = CheckoutError::submission(ClientError::Api {
            status: 500,
            message: "Server Error".to_string(),
        });
        match &err {
            CheckoutError::SubmissionFailed { message, .. } => assert_eq!(message, "Server Error"),
            other => panic!("unexpected {other:?}"),
        }
        assert!(err.as_rejection().is_none());
    }

    #[test]
    fn test_auth_failure() {
        assert!(ClientError::Unauthorized("expired".into()).is_auth_failure());
        assert!(!ClientError::MalformedResponse("x".into()).is_auth_failure());
    }
}
