// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Request authentication seam
//!
//! Hosts plug their own session check in behind `SessionVerifier`; the
//! handlers only care whether a request belongs to a logged-in user.

use axum::http::HeaderMap;

/// Decides whether a request carries a valid session.
/// Returns the user identifier when it does.
pub trait SessionVerifier: Send + Sync {
    fn verify(&self, headers: &HeaderMap) -> Option<String>;
}

/// Static bearer token check, for standalone deployments
pub struct BearerTokenVerifier {
    token: String,
}

impl BearerTokenVerifier {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

impl SessionVerifier for BearerTokenVerifier {
    fn verify(&self, headers: &HeaderMap) -> Option<String> {
        let value = headers.get("authorization")?.to_str().ok()?;
        let presented = value.strip_prefix("Bearer ")?;
        if presented == self.token {
            Some("api-token".to_string())
        } else {
            None
        }
    }
}

/// Accepts every request; fixtures and local development only
pub struct AllowAll;

impl SessionVerifier for AllowAll {
    fn verify(&self, _headers: &HeaderMap) -> Option<String> {
        Some("anonymous".to_string())
    }
}
