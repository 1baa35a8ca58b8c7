//! Login, registration and password reset.

use crate::client::ApiClient;
use crate::error::{ClientError, Result};
use crate::session::{Session, User};
use reqwest::Method;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Account creation request.
#[derive(Debug, Clone, Serialize)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub address: String,
    pub password: String,
    pub password_confirmation: String,
}

#[derive(Serialize)]
struct Credentials<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct LoginData {
    token: String,
    user: User,
}

#[derive(Serialize)]
struct EmailOnly<'a> {
    email: &'a str,
}

#[derive(Serialize)]
struct ResetToken<'a> {
    email: &'a str,
    token: &'a str,
}

#[derive(Serialize)]
struct PasswordReset<'a> {
    email: &'a str,
    token: &'a str,
    password: &'a str,
    password_confirmation: &'a str,
}

impl ApiClient {
    /// `POST /api/login`. Stores and returns the new session.
    pub async fn login(&mut self, email: &str, password: &str) -> Result<Session> {
        let req = self
            .request(Method::POST, "/api/login", false)?
            .json(&Credentials { email, password });
        let data: LoginData = self.send(req).await?.data()?;
        if data.token.trim().is_empty() {
            return Err(ClientError::MalformedResponse("login returned an empty token".into()));
        }
        let session = Session::new(data.token, data.user);
        info!(email = %session.user.email, "logged in");
        self.set_session(session.clone());
        Ok(session)
    }

    /// `POST /api/register`. Returns the server's confirmation message.
    pub async fn register(&self, registration: &Registration) -> Result<String> {
        let req = self
            .request(Method::POST, "/api/register", false)?
            .json(registration);
        self.send(req).await?.ack()
    }

    /// `POST /api/logout`.
    ///
    /// The local session is cleared whatever the server answers. A rejected
    /// token counts as logged out.
    pub async fn logout(&mut self) -> Result<()> {
        if self.session().is_none() {
            return Ok(());
        }
        let result = match self.request(Method::POST, "/api/logout", true) {
            Ok(req) => self.send(req).await.and_then(|resp| resp.ack()),
            Err(e) => Err(e),
        };
        self.clear_session();
        match result {
            Ok(_) | Err(ClientError::Unauthorized(_)) => Ok(()),
            Err(e) => {
                warn!(error = %e, "logout request failed; session cleared locally");
                Err(e)
            }
        }
    }

    /// `GET /check-auth`. `false` when the server rejects the token.
    pub async fn check_auth(&self) -> Result<bool> {
        let req = self.request(Method::GET, "/check-auth", true)?;
        let resp = self.send(req).await?;
        match resp.status {
            200..=299 => Ok(true),
            401 | 403 => Ok(false),
            status => Err(ClientError::Api {
                status,
                message: format!("auth check failed with HTTP {}", status),
            }),
        }
    }

    /// `POST /api/forgot-password`: mail a reset token.
    pub async fn forgot_password(&self, email: &str) -> Result<String> {
        let req = self
            .request(Method::POST, "/api/forgot-password", false)?
            .json(&EmailOnly { email });
        self.send(req).await?.ack()
    }

    /// `POST /api/verify-token`.
    pub async fn verify_reset_token(&self, email: &str, token: &str) -> Result<String> {
        let req = self
            .request(Method::POST, "/api/verify-token", false)?
            .json(&ResetToken { email, token });
        self.send(req).await?.ack()
    }

    /// `POST /api/reset-password`.
    pub async fn reset_password(
        &self,
        email: &str,
        token: &str,
        password: &str,
        password_confirmation: &str,
    ) -> Result<String> {
        let req = self
            .request(Method::POST, "/api/reset-password", false)?
            .json(&PasswordReset {
                email,
                token,
                password,
                password_confirmation,
            });
        self.send(req).await?.ack()
    }
}
