//! Authenticated session.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The user record returned on login.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub store_id: Option<i64>,
}

/// Bearer token plus the user it belongs to.
///
/// Created by a successful login and dropped on logout; nothing else
/// holds the token.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    token: String,
    pub user: User,
}

impl Session {
    pub fn new(token: impl Into<String>, user: User) -> Self {
        Self {
            token: token.into(),
            user,
        }
    }

    pub fn token(&self) -> &str {
        &self.token
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("token", &"<redacted>")
            .field("user", &self.user)
            .finish()
    }
}
