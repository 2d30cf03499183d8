use crate::{auth::Auth, errors::Result, telemetry::TelemetryConfig, Error};
use reqwest::Url;
use std::path::PathBuf;
use std::time::Duration;

/// Environment variable holding the server address
pub const ENV_VAULT_ADDR: &str = "VAULT_ADDR";
/// Environment variable holding the token
pub const ENV_VAULT_TOKEN: &str = "VAULT_TOKEN";
/// Environment variable holding the Vault namespace
pub const ENV_VAULT_NAMESPACE: &str = "VAULT_NAMESPACE";
/// Environment variable holding the request timeout
pub const ENV_VAULT_CLIENT_TIMEOUT: &str = "VAULT_CLIENT_TIMEOUT";
/// Environment variable disabling TLS verification
pub const ENV_VAULT_SKIP_VERIFY: &str = "VAULT_SKIP_VERIFY";
/// Environment variable holding a PEM CA certificate path
pub const ENV_VAULT_CACERT: &str = "VAULT_CACERT";

/// Client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the Vault server
    pub base_url: String,
    /// Token, if one has been set
    pub auth: Option<Auth>,
    /// Request timeout
    pub timeout: Duration,
    /// Vault namespace sent as `X-Vault-Namespace`
    pub namespace: Option<String>,
    /// User agent suffix
    pub user_agent_suffix: Option<String>,
    /// Skip TLS certificate verification
    pub accept_invalid_certs: bool,
    /// Extra CA certificate (PEM) to trust
    pub ca_cert_pem: Option<Vec<u8>>,
    /// Telemetry configuration
    pub telemetry_config: TelemetryConfig,
}

#[derive(Debug, Clone)]
enum CaCert {
    Pem(Vec<u8>),
    File(PathBuf),
}

/// Builder for creating a configured Client
///
/// # Example
///
/// ```no_run
/// use vault_kv_sdk::{Auth, ClientBuilder};
///
/// # fn example() -> Result<(), vault_kv_sdk::Error> {
/// let client = ClientBuilder::new("https://vault.example.com:8200")
///     .auth(Auth::token("hvs.example"))
///     .namespace("team-a")
///     .timeout_ms(10_000)
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct ClientBuilder {
    base_url: String,
    auth: Option<Auth>,
    timeout_ms: u64,
    namespace: Option<String>,
    user_agent_suffix: Option<String>,
    accept_invalid_certs: bool,
    ca_cert: Option<CaCert>,
    telemetry_config: TelemetryConfig,
}

impl ClientBuilder {
    /// Create a new client builder with the given base URL
    ///
    /// # Arguments
    ///
    /// * `base_url` - Address of the Vault server (e.g., `"http://localhost:8200"`)
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            auth: None,
            timeout_ms: crate::DEFAULT_TIMEOUT_MS,
            namespace: None,
            user_agent_suffix: None,
            accept_invalid_certs: false,
            ca_cert: None,
            telemetry_config: TelemetryConfig::default(),
        }
    }

    /// Create a builder from the standard `VAULT_*` environment variables
    ///
    /// Reads `VAULT_ADDR` (default `https://127.0.0.1:8200`), `VAULT_TOKEN`,
    /// `VAULT_NAMESPACE`, `VAULT_CLIENT_TIMEOUT`, `VAULT_SKIP_VERIFY` and
    /// `VAULT_CACERT`. Empty variables are treated as unset.
    pub fn from_env() -> Result<Self> {
        let addr = env_var(ENV_VAULT_ADDR).unwrap_or_else(|| crate::DEFAULT_ADDRESS.to_string());
        let mut builder = Self::new(addr);

        if let Some(token) = env_var(ENV_VAULT_TOKEN) {
            builder = builder.auth(Auth::token(token));
        }
        if let Some(namespace) = env_var(ENV_VAULT_NAMESPACE) {
            builder = builder.namespace(namespace);
        }
        if let Some(raw) = env_var(ENV_VAULT_CLIENT_TIMEOUT) {
            builder.timeout_ms = parse_timeout(&raw)?.as_millis() as u64;
        }
        if let Some(raw) = env_var(ENV_VAULT_SKIP_VERIFY) {
            builder.accept_invalid_certs = parse_bool(&raw).ok_or_else(|| {
                Error::Config(format!("{} must be a boolean, got {:?}", ENV_VAULT_SKIP_VERIFY, raw))
            })?;
        }
        if let Some(path) = env_var(ENV_VAULT_CACERT) {
            builder = builder.ca_cert_file(path);
        }

        Ok(builder)
    }

    /// Set the token
    pub fn auth(mut self, auth: impl Into<Auth>) -> Self {
        self.auth = Some(auth.into());
        self
    }

    /// Set the request timeout in milliseconds
    pub fn timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Send every request in the given Vault namespace
    pub fn namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    /// Add a custom user agent suffix
    pub fn user_agent_extra(mut self, suffix: impl Into<String>) -> Self {
        self.user_agent_suffix = Some(suffix.into());
        self
    }

    /// Trust an additional CA certificate in PEM format
    pub fn ca_cert_pem(mut self, pem: impl Into<Vec<u8>>) -> Self {
        self.ca_cert = Some(CaCert::Pem(pem.into()));
        self
    }

    /// Trust an additional CA certificate read from a PEM file at build time
    pub fn ca_cert_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.ca_cert = Some(CaCert::File(path.into()));
        self
    }

    /// Disable TLS certificate verification (dangerous!)
    pub fn danger_accept_invalid_certs(mut self, accept: bool) -> Self {
        self.accept_invalid_certs = accept;
        self
    }

    /// Configure telemetry/metrics
    #[cfg(feature = "metrics")]
    pub fn with_telemetry(mut self, config: TelemetryConfig) -> Self {
        self.telemetry_config = config;
        self
    }

    /// Enable telemetry with default settings
    #[cfg(feature = "metrics")]
    pub fn enable_telemetry(mut self) -> Self {
        self.telemetry_config.enabled = true;
        self
    }

    /// Build the client with the configured options
    pub fn build(self) -> Result<crate::Client> {
        let url = validate_base_url(&self.base_url)?;

        if let Some(namespace) = &self.namespace {
            if namespace.trim().is_empty() {
                return Err(Error::Config("Namespace must not be empty".to_string()));
            }
        }

        let ca_cert_pem = match self.ca_cert {
            Some(CaCert::Pem(pem)) => Some(pem),
            Some(CaCert::File(path)) => Some(std::fs::read(&path).map_err(|e| {
                Error::Config(format!("Failed to read CA certificate {}: {}", path.display(), e))
            })?),
            None => None,
        };

        let config = ClientConfig {
            base_url: url,
            auth: self.auth,
            timeout: Duration::from_millis(self.timeout_ms),
            namespace: self.namespace,
            user_agent_suffix: self.user_agent_suffix,
            accept_invalid_certs: self.accept_invalid_certs,
            ca_cert_pem,
            telemetry_config: self.telemetry_config,
        };

        crate::client::Client::from_config(config)
    }
}

/// Check that `raw` is an absolute http(s) URL with a host, returning it
/// without a trailing slash.
fn validate_base_url(raw: &str) -> Result<String> {
    let trimmed = raw.trim();
    let url = Url::parse(trimmed)
        .map_err(|e| Error::Config(format!("Invalid base URL {:?}: {}", raw, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(Error::Config(
            "Base URL must start with http:// or https://".to_string(),
        ));
    }
    if url.host_str().map_or(true, str::is_empty) {
        return Err(Error::Config(format!("Base URL {:?} has no host", raw)));
    }
    if url.query().is_some() || url.fragment().is_some() {
        return Err(Error::Config(format!(
            "Base URL {:?} must not carry a query or fragment",
            raw
        )));
    }

    Ok(trimmed.trim_end_matches('/').to_string())
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// Parse `"30"`, `"30s"` or `"1500ms"`; bare numbers are seconds
fn parse_timeout(raw: &str) -> Result<Duration> {
    let raw = raw.trim();
    let invalid = || {
        Error::Config(format!(
            "{} must be a number of seconds or end in s/ms, got {:?}",
            ENV_VAULT_CLIENT_TIMEOUT, raw
        ))
    };

    if let Some(ms) = raw.strip_suffix("ms") {
        return ms.trim().parse::<u64>().map(Duration::from_millis).map_err(|_| invalid());
    }
    let secs = raw.strip_suffix('s').unwrap_or(raw);
    secs.trim().parse::<u64>().map(Duration::from_secs).map_err(|_| invalid())
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "t" | "yes" => Some(true),
        "0" | "false" | "f" | "no" => Some(false),
        _ => None,
    }
}
