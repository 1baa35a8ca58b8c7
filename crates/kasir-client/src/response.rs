//! Response envelope handling.
//!
//! Every endpoint answers with `{ status, message, data }`. `status` is a
//! boolean on most routes and the string `"success"` / `"error"` on a few.
//! Bodies are checked here before anything reaches the caller.

use crate::error::{ClientError, Result};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;

/// A buffered HTTP response.
#[derive(Debug, Clone)]
pub struct Response {
    pub status: u16,
    pub body: Vec<u8>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Status {
    Flag(bool),
    Text(String),
}

impl Status {
    fn is_success(&self) -> bool {
        match self {
            Status::Flag(ok) => *ok,
            Status::Text(s) => matches!(s.to_ascii_lowercase().as_str(), "success" | "ok" | "true"),
        }
    }
}

#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default)]
    status: Option<Status>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    data: Option<Value>,
    /// Per-field validation messages.
    #[serde(default)]
    errors: Option<BTreeMap<String, Vec<String>>>,
}

impl Envelope {
    fn message_or(&self, fallback: &str) -> String {
        if let Some(msg) = self.message.as_deref().filter(|m| !m.trim().is_empty()) {
            return msg.to_string();
        }
        self.errors
            .as_ref()
            .and_then(|errs| errs.values().flatten().next().cloned())
            .unwrap_or_else(|| fallback.to_string())
    }
}

impl Response {
    pub fn new(status: u16, body: Vec<u8>) -> Self {
        Self { status, body }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Fail on HTTP errors and on envelopes reporting failure.
    fn envelope(&self) -> Result<Envelope> {
        let parsed = serde_json::from_slice::<Envelope>(&self.body);

        if self.status == 401 {
            let message = parsed
                .as_ref()
                .map(|env| env.message_or("Unauthenticated."))
                .unwrap_or_else(|_| "Unauthenticated.".to_string());
            return Err(ClientError::Unauthorized(message));
        }

        if !self.is_success() {
            let message = match &parsed {
                Ok(env) => env.message_or(&format!("HTTP {}", self.status)),
                Err(_) if !self.body.is_empty() => self.text(),
                Err(_) => format!("HTTP {}", self.status),
            };
            return Err(ClientError::Api {
                status: self.status,
                message,
            });
        }

        let envelope = parsed.map_err(|e| {
            ClientError::MalformedResponse(format!("response is not a JSON envelope: {}", e))
        })?;

        if let Some(status) = &envelope.status {
            if !status.is_success() {
                return Err(ClientError::Api {
                    status: self.status,
                    message: envelope.message_or("request was not successful"),
                });
            }
        }
        Ok(envelope)
    }

    /// Decode the `data` member as `T`.
    pub fn data<T: DeserializeOwned>(&self) -> Result<T> {
        let envelope = self.envelope()?;
        let data = envelope
            .data
            .ok_or_else(|| ClientError::MalformedResponse("missing 'data'".to_string()))?;
        serde_json::from_value(data)
            .map_err(|e| ClientError::MalformedResponse(format!("unexpected 'data': {}", e)))
    }

    /// Accept a successful envelope whose `data` is not needed. Returns the message.
    pub fn ack(&self) -> Result<String> {
        let envelope = self.envelope()?;
        Ok(envelope.message.unwrap_or_default())
    }

    /// Raw body of a successful response (non-JSON endpoints such as images).
    pub fn bytes(self) -> Result<Vec<u8>> {
        if self.is_success() {
            return Ok(self.body);
        }
        // Error bodies are still envelopes.
        self.envelope()?;
        Err(ClientError::Api {
            status: self.status,
            message: format!("HTTP {}", self.status),
        })
    }
}
