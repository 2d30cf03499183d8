//! Token presentation for the Vault KV SDK
//!
//! Only static tokens are supported. A token can be presented in one of two
//! headers; both are accepted by Vault:
//!
//! 1. **Vault token** - `X-Vault-Token: <token>` (default)
//! 2. **Bearer** - `Authorization: Bearer <token>`, for deployments behind
//!    proxies that only forward standard headers
//!
//! # Examples
//!
//! ```
//! use vault_kv_sdk::Auth;
//!
//! let auth = Auth::token("hvs.CAESI...");
//! let auth = Auth::bearer("hvs.CAESI...");
//! ```

use secrecy::{ExposeSecret, SecretString};
use std::fmt;

/// Header name used for Vault tokens
pub const VAULT_TOKEN_HEADER: &str = "X-Vault-Token";

/// Authentication token and the header it is presented in
///
/// # Security
///
/// Tokens are stored using [`SecretString`] so they are zeroized on drop
/// and never printed by `Debug`.
#[derive(Clone)]
pub enum Auth {
    /// Sent as `X-Vault-Token: <token>`
    Token(SecretString),
    /// Sent as `Authorization: Bearer <token>`
    Bearer(SecretString),
}

impl Auth {
    /// Create a token presented in the `X-Vault-Token` header
    pub fn token(token: impl Into<String>) -> Self {
        Auth::Token(SecretString::new(token.into()))
    }

    /// Create a token presented as a bearer credential
    pub fn bearer(token: impl Into<String>) -> Self {
        Auth::Bearer(SecretString::new(token.into()))
    }

    /// Get the authorization header name and value
    pub(crate) fn header(&self) -> (&'static str, String) {
        match self {
            Auth::Token(token) => (VAULT_TOKEN_HEADER, token.expose_secret().clone()),
            Auth::Bearer(token) => ("Authorization", format!("Bearer {}", token.expose_secret())),
        }
    }

    /// Whether the wrapped token is empty
    pub(crate) fn is_empty(&self) -> bool {
        match self {
            Auth::Token(token) | Auth::Bearer(token) => token.expose_secret().is_empty(),
        }
    }
}

impl fmt::Debug for Auth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Auth::Token(_) => write!(f, "Auth::Token(****)"),
            Auth::Bearer(_) => write!(f, "Auth::Bearer(****)"),
        }
    }
}

impl From<&str> for Auth {
    fn from(token: &str) -> Self {
        Auth::token(token)
    }
}

impl From<String> for Auth {
    fn from(token: String) -> Self {
        Auth::token(token)
    }
}
