//! HTTP client for the POS API.

use crate::config::ClientConfig;
use crate::error::{ClientError, Result};
use crate::response::Response;
use crate::session::Session;
use reqwest::header::ACCEPT;
use reqwest::{Method, RequestBuilder};
use tracing::{debug, warn};

/// Client for the POS REST API.
///
/// Holds the configuration and, once logged in, the [`Session`] whose
/// token authenticates every other call. Calls are never retried.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    config: ClientConfig,
    session: Option<Session>,
}

impl ApiClient {
    /// Build a client. Fails if the configuration is invalid.
    pub fn new(config: ClientConfig) -> Result<Self> {
        config.validate()?;
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .connect_timeout(config.connect_timeout)
            .user_agent(config.user_agent.clone())
            .build()?;
        Ok(Self {
            http,
            config,
            session: None,
        })
    }

    /// Attach a session restored from elsewhere.
    pub fn with_session(mut self, session: Session) -> Self {
        self.session = Some(session);
        self
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }

    pub fn set_session(&mut self, session: Session) {
        self.session = Some(session);
    }

    /// Drop the session without telling the server.
    pub fn clear_session(&mut self) -> Option<Session> {
        self.session.take()
    }

    /// Request builder for `path`. Authenticated requests need a session.
    pub(crate) fn request(&self, method: Method, path: &str, auth: bool) -> Result<RequestBuilder> {
        let mut req = self
            .http
            .request(method, self.config.url(path))
            .header(ACCEPT, "application/json");
        if auth {
            let session = self.session.as_ref().ok_or(ClientError::Unauthenticated)?;
            req = req.bearer_auth(session.token());
        }
        Ok(req)
    }

    /// Send a request and buffer the body.
    pub(crate) async fn send(&self, req: RequestBuilder) -> Result<Response> {
        let request = req.build()?;
        let method = request.method().clone();
        let path = request.url().path().to_string();
        debug!(%method, %path, "sending request");

        let resp = self.http.execute(request).await.map_err(|e| self.transport_error(e))?;
        let status = resp.status().as_u16();
        let body = resp.bytes().await.map_err(|e| self.transport_error(e))?.to_vec();

        if !(200..300).contains(&status) {
            warn!(%method, %path, status, "request failed");
        } else {
            debug!(%method, %path, status, bytes = body.len(), "response received");
        }
        Ok(Response::new(status, body))
    }

    fn transport_error(&self, err: reqwest::Error) -> ClientError {
        if err.is_timeout() {
            warn!(timeout = ?self.config.request_timeout, "request timed out");
            ClientError::Timeout(self.config.request_timeout)
        } else {
            warn!(error = %err, "transport error");
            ClientError::Http(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::User;

    fn client() -> ApiClient {
        ApiClient::new(ClientConfig::new("http://localhost:9")).unwrap()
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        assert!(matches!(
            ApiClient::new(ClientConfig::new("localhost")),
            Err(ClientError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_authenticated_request_requires_session() {
        let client = client();
        assert!(matches!(
            client.request(Method::GET, "/api/products", true),
            Err(ClientError::Unauthenticated)
        ));
        assert!(client.request(Method::POST, "/api/login", false).is_ok());
    }

    #[test]
    fn test_request_carries_bearer_token() {
        let user: User = serde_json::from_str("{}").unwrap();
        let client = client().with_session(Session::new("tok", user));
        let request = client
            .request(Method::GET, "/api/products", true)
            .unwrap()
            .build()
            .unwrap();
        let auth = request.headers().get("authorization").unwrap();
        assert_eq!(auth.to_str().unwrap(), "Bearer tok");
        assert_eq!(request.url().as_str(), "http://localhost:9/api/products");
    }

    #[test]
    fn test_clear_session() {
        let user: User = serde_json::from_str("{}").unwrap();
        let mut client = client().with_session(Session::new("tok", user));
        assert!(client.is_authenticated());
        assert!(client.clear_session().is_some());
        assert!(!client.is_authenticated());
    }
}
