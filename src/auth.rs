// src/auth.rs

use crate::error::{Result, WorklogError};
use serde::Deserialize;

/// Body of a login request. Accepts `user`/`pass` as well.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default, alias = "user")]
    pub username: String,
    #[serde(default, alias = "pass")]
    pub password: String,
}

/// Static admin credential plus the bearer token handed out on login.
#[derive(Debug, Clone)]
pub struct AdminAuth {
    user: String,
    password: String,
    token: String,
}

impl AdminAuth {
    /// Mints a fresh token; it lives as long as the process.
    pub fn new(user: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            password: password.into(),
            token: ulid::Ulid::new().to_string(),
        }
    }

    pub fn login(&self, req: &LoginRequest) -> Result<&str> {
        if req.username.trim() == self.user && req.password.trim() == self.password {
            Ok(&self.token)
        } else {
            tracing::warn!(username = %req.username, "rejected admin login");
            Err(WorklogError::Auth)
        }
    }

    /// Checks an `Authorization` header value of the form `Bearer <token>`.
    pub fn verify(&self, header: Option<&str>) -> Result<()> {
        let token = header
            .and_then(|h| h.strip_prefix("Bearer "))
            .map(str::trim)
            .ok_or(WorklogError::Auth)?;
        if token.is_empty() || token != self.token {
            return Err(WorklogError::Auth);
        }
        Ok(())
    }

    #[cfg(test)]
    pub fn token(&self) -> &str {
        &self.token
    }
}
