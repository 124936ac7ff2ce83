//! Bearer token holder and JWT expiry inspection

use std::collections::HashSet;
use std::fmt::Debug;
use std::sync::{Arc, RwLock};

use chrono::Utc;
use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::Deserialize;

/// Claims the client cares about; the signature is the backend's concern
#[derive(Debug, Clone, Deserialize)]
struct ExpiryClaims {
    #[serde(default)]
    exp: Option<i64>,
}

/// Result of inspecting a stored token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenStatus {
    /// JWT whose `exp` lies in the future, or that carries no `exp`
    Valid,
    /// JWT whose `exp` has passed
    Expired,
    /// Not a decodable JWT; only the backend can judge it
    Opaque,
}

impl TokenStatus {
    pub fn is_expired(&self) -> bool {
        matches!(self, Self::Expired)
    }
}

/// Inspect a token's expiry without verifying its signature
pub fn token_status(token: &str) -> TokenStatus {
    let mut validation = Validation::default();
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.validate_aud = false;
    validation.required_spec_claims = HashSet::new();

    match decode::<ExpiryClaims>(token, &DecodingKey::from_secret(&[]), &validation) {
        Ok(data) => match data.claims.exp {
            Some(exp) if exp <= Utc::now().timestamp() => TokenStatus::Expired,
            _ => TokenStatus::Valid,
        },
        Err(_) => TokenStatus::Opaque,
    }
}

/// Shared slot for the current bearer token
///
/// The auth service writes it on login/logout; the REST backend reads it
/// when building request headers.
#[derive(Clone, Default)]
pub struct TokenCell {
    inner: Arc<RwLock<Option<String>>>,
}

impl Debug for TokenCell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let present = self.inner.read().map(|t| t.is_some()).unwrap_or(false);
        f.debug_struct("TokenCell")
            .field("token", if present { &"[hidden]" } else { &"none" })
            .finish()
    }
}

impl TokenCell {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> Option<String> {
        self.inner.read().ok().and_then(|token| token.clone())
    }

    pub fn set(&self, token: Option<String>) {
        if let Ok(mut slot) = self.inner.write() {
            *slot = token;
        }
    }

    pub fn is_set(&self) -> bool {
        self.inner.read().map(|t| t.is_some()).unwrap_or(false)
    }

    /// `Authorization` header value for the current token
    pub fn bearer(&self) -> Option<String> {
        self.get().map(|token| format!("Bearer {}", token))
    }
}
