//! Per-request credential verification.
//!
//! Clients send `u` (username) and `p` (password) with every request. The
//! password is either plain text or `enc:` followed by its hex encoding.

use super::user_store::CredentialStore;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

const ENCODED_PASSWORD_PREFIX: &str = "enc:";

#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl Credentials {
    /// Picks `u` and `p` out of the query parameters.
    ///
    /// Each must be present exactly once, otherwise there are no usable
    /// credentials.
    pub fn from_params(params: &[(String, String)]) -> Option<Credentials> {
        Some(Credentials {
            username: single_value(params, "u")?.to_string(),
            password: single_value(params, "p")?.to_string(),
        })
    }
}

fn single_value<'a>(params: &'a [(String, String)], key: &str) -> Option<&'a str> {
    let mut values = params.iter().filter(|(k, _)| k == key).map(|(_, v)| v);
    match (values.next(), values.next()) {
        (Some(value), None) => Some(value.as_str()),
        _ => None,
    }
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("malformed encoded password")]
    MalformedPassword,

    #[error("credential lookup failed: {0:#}")]
    Lookup(anyhow::Error),

    #[error("wrong username or password")]
    Mismatch,
}

/// Resolves the password as submitted into the bytes of the literal
/// password. Hex-encoded passwords are not required to be UTF-8.
pub fn decode_password(raw: &str) -> Result<Vec<u8>, AuthError> {
    match raw.strip_prefix(ENCODED_PASSWORD_PREFIX) {
        Some(encoded) if raw.len() > ENCODED_PASSWORD_PREFIX.len() => {
            hex::decode(encoded).map_err(|_| AuthError::MalformedPassword)
        }
        _ => Ok(raw.as_bytes().to_vec()),
    }
}

/// Checks credentials against a `CredentialStore`.
///
/// Stored passwords are compared as plain text.
#[derive(Clone)]
pub struct AuthGate {
    store: Arc<dyn CredentialStore>,
}

impl AuthGate {
    pub fn new(store: Arc<dyn CredentialStore>) -> AuthGate {
        AuthGate { store }
    }

    pub fn verify(&self, credentials: &Credentials) -> Result<(), AuthError> {
        let password = decode_password(&credentials.password)?;
        match self.store.check_password(&credentials.username, &password) {
            Ok(true) => Ok(()),
            Ok(false) => Err(AuthError::Mismatch),
            Err(err) => Err(AuthError::Lookup(err)),
        }
    }
}
