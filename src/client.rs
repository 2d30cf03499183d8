//! Vault KV Client Implementation
//!
//! This module contains the main `Client` struct that provides the core functionality
//! for interacting with the versioned key/value engine of a Vault server.
//!
//! # Architecture
//!
//! - **HTTP Layer**: Built on `reqwest` for async HTTP operations
//! - **Authentication**: A static token attached to every request
//! - **Telemetry**: Optional OpenTelemetry integration for observability
//!
//! Each operation issues exactly one request. There are no retries and nothing
//! is cached; failures are returned to the caller as [`Error`] values.
//!
//! # Examples
//!
//! ```no_run
//! use vault_kv_sdk::Client;
//! use serde_json::json;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut client = Client::new("http://localhost:8200")?;
//! client.set_token("root");
//!
//! let written = client.write("secret/data/test", &json!({"data": {"key": "value"}})).await?;
//! println!("version {}", written.version());
//!
//! let secret = client.read("secret/data/test").await?;
//! println!("key = {}", secret.data["key"]);
//!
//! let listed = client.list("secret/metadata").await?;
//! println!("keys: {:?}", listed.keys);
//!
//! client.delete("secret/data/test").await?;
//! # Ok(())
//! # }
//! ```

use crate::{
    auth::Auth,
    config::{ClientBuilder, ClientConfig},
    endpoints::Endpoints,
    errors::{Error, ErrorKind, ErrorResponse, Result},
    models::*,
    telemetry::{self, Metrics},
    util::{generate_request_id, header_str, path_segments},
};

use reqwest::{
    header::{HeaderMap, HeaderValue},
    Client as HttpClient, Method, RequestBuilder, Response, StatusCode,
};
use serde::{de::DeserializeOwned, Serialize};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, trace, warn};

const USER_AGENT_PREFIX: &str = "vault-kv-sdk-rust";

/// Longest non-JSON error body kept in an error message
const MAX_ERROR_BODY: usize = 512;

/// Vault KV client
///
/// Cloning is cheap and clones share the underlying connection pool. Operations
/// take `&self` and may run concurrently; changing the token takes `&mut self`,
/// so it can never overlap with a request in flight on the same instance.
#[derive(Clone)]
pub struct Client {
    pub(crate) config: ClientConfig,
    http: HttpClient,
    endpoints: Endpoints,
    metrics: Arc<Metrics>,
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("base_url", &self.config.base_url)
            .field("auth", &self.config.auth)
            .field("namespace", &self.config.namespace)
            .field("timeout", &self.config.timeout)
            .finish()
    }
}

impl Client {
    /// Create an unauthenticated client bound to `address`
    ///
    /// Fails with [`Error::Config`] if `address` is not an absolute
    /// `http://` or `https://` URL. Use [`ClientBuilder`] for timeouts, TLS
    /// and namespaces.
    pub fn new(address: impl Into<String>) -> Result<Self> {
        ClientBuilder::new(address).build()
    }

    /// Create a new client with the given configuration
    pub(crate) fn from_config(config: ClientConfig) -> Result<Self> {
        // Build user agent
        let user_agent = if let Some(suffix) = &config.user_agent_suffix {
            format!("{}/{} {}", USER_AGENT_PREFIX, crate::VERSION, suffix)
        } else {
            format!("{}/{}", USER_AGENT_PREFIX, crate::VERSION)
        };

        let mut default_headers = HeaderMap::new();
        let _ = default_headers.insert("X-Vault-Request", HeaderValue::from_static("true"));
        if let Some(namespace) = &config.namespace {
            let value = HeaderValue::from_str(namespace)
                .map_err(|e| Error::Config(format!("Invalid namespace: {}", e)))?;
            let _ = default_headers.insert("X-Vault-Namespace", value);
        }

        let mut http_builder = HttpClient::builder()
            .user_agent(user_agent)
            .default_headers(default_headers)
            .timeout(config.timeout)
            .pool_idle_timeout(Duration::from_secs(90))
            .pool_max_idle_per_host(10);

        // Configure TLS
        if config.accept_invalid_certs {
            warn!("TLS certificate verification is disabled");
            http_builder = http_builder.danger_accept_invalid_certs(true);
        }
        if let Some(pem) = &config.ca_cert_pem {
            let cert = reqwest::Certificate::from_pem(pem)
                .map_err(|e| Error::Config(format!("Invalid CA certificate: {}", e)))?;
            http_builder = http_builder.add_root_certificate(cert);
        }

        let http = http_builder
            .build()
            .map_err(|e| Error::Config(format!("Failed to build HTTP client: {}", e)))?;

        let metrics = if config.telemetry_config.enabled {
            telemetry::init_telemetry(&config.telemetry_config)
        } else {
            Arc::new(Metrics::new(&config.telemetry_config))
        };

        Ok(Self {
            endpoints: Endpoints::new(&config.base_url),
            http,
            metrics,
            config,
        })
    }

    /// Base address the client is bound to
    pub fn address(&self) -> &str {
        &self.config.base_url
    }

    /// Store the token used for subsequent requests
    ///
    /// No request is made; an invalid token is only discovered on first use.
    /// Passing a `&str` or `String` presents it as `X-Vault-Token`.
    pub fn set_token(&mut self, token: impl Into<Auth>) {
        self.config.auth = Some(token.into());
    }

    /// Forget the stored token
    pub fn clear_token(&mut self) {
        self.config.auth = None;
    }

    /// Whether a non-empty token is set
    pub fn has_token(&self) -> bool {
        self.config.auth.as_ref().is_some_and(|auth| !auth.is_empty())
    }

    /// Write a new version of a secret
    ///
    /// `payload` must serialize to a JSON object, conventionally
    /// `{"data": {...fields}}`. KV v2 write options such as check-and-set go
    /// alongside it as `{"options": {"cas": 1}, "data": {...}}`.
    ///
    /// # Errors
    ///
    /// * `Error::Validation` if the path is empty, the payload is not an object,
    ///   or the server rejects the body (400)
    /// * `Error::Auth` if no token is set or the server rejects it (401/403)
    /// * `Error::NotFound` if the mount does not exist (404)
    /// * `Error::Transport` / `Error::Timeout` for connection issues
    /// * `Error::Server` for 5xx responses
    /// * `Error::Deserialize` if the response carries no version metadata
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use vault_kv_sdk::Client;
    /// # use serde_json::json;
    /// # async fn example(client: &Client) -> Result<(), Box<dyn std::error::Error>> {
    /// let result = client
    ///     .write("secret/data/db", &json!({"data": {"user": "app", "password": "s3cr3t"}}))
    ///     .await?;
    /// assert!(result.version() >= 1);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn write<P>(&self, path: &str, payload: &P) -> Result<WriteResult>
    where
        P: Serialize + ?Sized,
    {
        let path = normalize_path(path)?;

        let body = serde_json::to_value(payload).map_err(|e| Error::Validation {
            status: None,
            message: format!("payload is not serializable: {}", e),
        })?;
        if !body.is_object() {
            return Err(Error::Validation {
                status: None,
                message: "payload must be a JSON object".to_string(),
            });
        }

        let url = self.endpoints.write(&path);
        let request = self.build_request(Method::POST, &url, &path)?.json(&body);
        let response = self.execute("write", request).await?;
        let response = self.check_status(response, &path).await?;

        let envelope: VaultResponse<VersionMetadata> = parse_json_response(response)
            .await?
            .ok_or_else(|| Error::Deserialize("write returned no version metadata".to_string()))?;
        let metadata = envelope
            .data
            .ok_or_else(|| Error::Deserialize("write returned no version metadata".to_string()))?;

        debug!(path = %path, version = metadata.version, "Wrote secret");

        Ok(WriteResult {
            metadata,
            request_id: envelope.request_id,
            warnings: envelope.warnings.unwrap_or_default(),
        })
    }

    /// Read the latest version of a secret
    ///
    /// # Errors
    ///
    /// * `Error::NotFound` if the path never existed or its latest version was
    ///   deleted or destroyed; the two cases are not distinguished
    /// * `Error::Auth`, `Error::Transport`, `Error::Timeout`, `Error::Server`
    pub async fn read(&self, path: &str) -> Result<Secret> {
        self.read_as(path).await
    }

    /// Read the latest version of a secret into a caller-defined type
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use vault_kv_sdk::Client;
    /// #[derive(serde::Deserialize)]
    /// struct DbCreds {
    ///     user: String,
    ///     password: String,
    /// }
    ///
    /// # async fn example(client: &Client) -> Result<(), Box<dyn std::error::Error>> {
    /// let creds = client.read_as::<DbCreds>("secret/data/db").await?;
    /// println!("connecting as {}", creds.data.user);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn read_as<T: DeserializeOwned>(&self, path: &str) -> Result<Secret<T>> {
        let path = normalize_path(path)?;
        let url = self.endpoints.read(&path);
        self.fetch_secret(url, path).await
    }

    /// Read a specific version of a secret
    pub async fn read_version(&self, path: &str, version: u64) -> Result<Secret> {
        let path = normalize_path(path)?;
        let url = self.endpoints.read_version(&path, version);
        self.fetch_secret(url, path).await
    }

    /// List the immediate children of a metadata path
    ///
    /// Keys are returned as the server sent them; sub-collections keep their
    /// trailing `/`. A path with no children, including one that does not
    /// exist, yields an empty list rather than an error.
    pub async fn list(&self, path: &str) -> Result<ListResult> {
        let path = normalize_path(path)?;
        let url = self.endpoints.list(&path);
        let request = self.build_request(Method::GET, &url, &path)?;
        let response = self.execute("list", request).await?;

        if response.status() == StatusCode::NOT_FOUND {
            trace!(path = %path, "No keys under path");
            return Ok(ListResult::default());
        }
        let response = self.check_status(response, &path).await?;

        let Some(envelope) = parse_json_response::<VaultResponse<KvKeys>>(response).await? else {
            return Ok(ListResult::default());
        };

        Ok(ListResult {
            keys: envelope.data.unwrap_or_default().keys,
            request_id: envelope.request_id,
        })
    }

    /// Soft-delete the latest version of a secret
    ///
    /// Deleting a path that does not exist is not an error: the result has
    /// `deleted == false`.
    pub async fn delete(&self, path: &str) -> Result<DeleteResult> {
        let path = normalize_path(path)?;
        let url = self.endpoints.delete(&path);
        let request = self.build_request(Method::DELETE, &url, &path)?;
        let response = self.execute("delete", request).await?;
        // Vault answers 204 without a body; only a proxy echoes a request ID
        let request_id = header_str(response.headers(), "x-request-id");

        if response.status() == StatusCode::NOT_FOUND {
            debug!(path = %path, "Delete of absent path");
            return Ok(DeleteResult {
                deleted: false,
                request_id,
            });
        }
        let _ = self.check_status(response, &path).await?;

        Ok(DeleteResult {
            deleted: true,
            request_id,
        })
    }

    // Helper methods

    async fn fetch_secret<T: DeserializeOwned>(&self, url: String, path: String) -> Result<Secret<T>> {
        let request = self.build_request(Method::GET, &url, &path)?;
        let response = self.execute("read", request).await?;
        let response = self.check_status(response, &path).await?;

        let envelope: VaultResponse<KvData<T>> = parse_json_response(response)
            .await?
            .ok_or_else(|| Error::Deserialize("read returned an empty body".to_string()))?;
        let kv = envelope
            .data
            .ok_or_else(|| Error::Deserialize("read returned no data".to_string()))?;

        // Some server versions answer a deleted latest version with 200 and null data
        let Some(data) = kv.data else {
            debug!(path = %path, version = kv.metadata.version, "Latest version is deleted");
            return Err(Error::NotFound {
                path,
                messages: Vec::new(),
            });
        };

        Ok(Secret {
            path,
            data,
            metadata: kv.metadata,
            request_id: envelope.request_id,
            warnings: envelope.warnings.unwrap_or_default(),
        })
    }

    /// Build a request with the token and common headers
    fn build_request(&self, method: Method, url: &str, path: &str) -> Result<RequestBuilder> {
        let auth = self
            .config
            .auth
            .as_ref()
            .filter(|auth| !auth.is_empty())
            .ok_or_else(|| Error::Auth {
                status: None,
                message: "no token set; call set_token before issuing requests".to_string(),
            })?;

        let request_id = generate_request_id();
        debug!(method = %method, path = %path, request_id = %request_id, "Sending request");

        let (auth_header, auth_value) = auth.header();
        let mut auth_value = HeaderValue::from_str(&auth_value).map_err(|_| Error::Auth {
            status: None,
            message: "token is not a valid header value".to_string(),
        })?;
        auth_value.set_sensitive(true);

        Ok(self
            .http
            .request(method, url)
            .header(auth_header, auth_value)
            .header("X-Request-ID", request_id))
    }

    /// Send a request once, recording metrics
    async fn execute(&self, operation: &'static str, request: RequestBuilder) -> Result<Response> {
        self.metrics.inc_active_requests();
        let start = Instant::now();
        let result = request.send().await;
        self.metrics.dec_active_requests();
        let elapsed = start.elapsed().as_secs_f64();

        match result {
            Ok(response) => {
                let status = response.status();
                trace!(operation, status = status.as_u16(), elapsed, "Received response");
                self.metrics.record_request(operation, Some(status.as_u16()), elapsed);
                Ok(response)
            }
            Err(e) => {
                warn!(operation, error = %e, "Request failed");
                self.metrics.record_request(operation, None, elapsed);
                Err(Error::from(e))
            }
        }
    }

    /// Pass successful responses through, turn everything else into an error
    async fn check_status(&self, response: Response, path: &str) -> Result<Response> {
        if response.status().is_success() {
            Ok(response)
        } else {
            Err(self.parse_error_response(response, path).await)
        }
    }

    /// Parse error response from server
    async fn parse_error_response(&self, response: Response, path: &str) -> Error {
        let status = response.status().as_u16();
        let body = response.bytes().await.unwrap_or_default();

        let messages = match serde_json::from_slice::<ErrorResponse>(&body) {
            Ok(parsed) => parsed.errors,
            Err(_) => {
                let text = String::from_utf8_lossy(&body);
                let text = text.trim();
                if text.is_empty() {
                    Vec::new()
                } else {
                    vec![text.chars().take(MAX_ERROR_BODY).collect()]
                }
            }
        };

        let error = Error::from_response(status, path, messages);
        match error.kind() {
            ErrorKind::Authentication => warn!(path = %path, status, "Token rejected"),
            ErrorKind::Server => warn!(path = %path, status, error = %error, "Server error"),
            _ => debug!(path = %path, status, error = %error, "Request rejected"),
        }
        error
    }
}

/// Decode a JSON body; `None` for an empty body (e.g. 204)
async fn parse_json_response<T: DeserializeOwned>(response: Response) -> Result<Option<T>> {
    let body = response.bytes().await.map_err(Error::from)?;
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }
    serde_json::from_slice(&body).map(Some).map_err(Error::from)
}

/// Normalize a logical path, rejecting paths with no segments
///
/// `.` and `..` segments are rejected: URL parsing would resolve them and the
/// request could leave the mount it names.
fn normalize_path(path: &str) -> Result<String> {
    let segments = path_segments(path);
    if segments.is_empty() {
        return Err(Error::Validation {
            status: None,
            message: format!("path {:?} is empty", path),
        });
    }
    if segments.iter().any(|s| *s == "." || *s == "..") {
        return Err(Error::Validation {
            status: None,
            message: format!("path {:?} contains a relative segment", path),
        });
    }
    Ok(segments.join("/"))
}
