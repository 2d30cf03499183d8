//! Vault KV SDK for Rust
//!
//! A thin async client for the versioned key/value (KV v2) secrets engine of
//! HashiCorp Vault compatible servers: write, read, list and delete secrets
//! over HTTP(S) with a static token.
//!
//! # Features
//!
//! - Async/await support with tokio runtime
//! - Typed or untyped (`serde_json`) secret payloads
//! - Token presented as `X-Vault-Token` or `Authorization: Bearer`
//! - Vault namespaces, custom CA certificates, request timeouts
//! - Configuration from the standard `VAULT_*` environment variables
//! - Structured errors carrying the server's status code and messages
//! - Optional OpenTelemetry metrics (`metrics` feature)
//!
//! # Example
//!
//! ```no_run
//! use vault_kv_sdk::Client;
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut client = Client::new("http://localhost:8200")?;
//!     client.set_token("root");
//!
//!     let written = client.write("secret/data/test", &json!({"data": {"key": "value"}})).await?;
//!     println!("Secret version: {}", written.version());
//!
//!     let secret = client.read("secret/data/test").await?;
//!     println!("key = {}", secret.data["key"]);
//!
//!     Ok(())
//! }
//! ```

#![deny(
    missing_docs,
    missing_debug_implementations,
    unsafe_code,
    unused_results,
    warnings
)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod auth;
mod client;
mod config;
mod endpoints;
mod errors;
mod models;
/// Telemetry and observability support
#[cfg(feature = "metrics")]
pub mod telemetry;

#[cfg(not(feature = "metrics"))]
mod telemetry;
mod util;

pub use auth::Auth;
pub use client::Client;
pub use config::{ClientBuilder, ClientConfig};
pub use errors::{Error, ErrorKind, Result};
pub use models::*;

// Re-export commonly used types
pub use secrecy::SecretString;

/// SDK version, matches Cargo.toml version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default timeout in milliseconds
pub const DEFAULT_TIMEOUT_MS: u64 = 60_000;

/// Address used by [`ClientBuilder::from_env`] when `VAULT_ADDR` is unset
pub const DEFAULT_ADDRESS: &str = "https://127.0.0.1:8200";
