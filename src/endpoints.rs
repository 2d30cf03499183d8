//! API endpoint URL construction

use crate::util::encode_path;

/// API v1 base path
pub const API_V1_BASE: &str = "/v1";

/// Endpoint builder
#[derive(Clone, Debug)]
pub struct Endpoints {
    base_url: String,
}

impl Endpoints {
    /// Create a new endpoints builder
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Get the full URL for a logical path
    fn url(&self, path: &str) -> String {
        format!("{}{}/{}", self.base_url, API_V1_BASE, encode_path(path))
    }

    // KV v2 data
    pub fn read(&self, path: &str) -> String {
        self.url(path)
    }

    pub fn read_version(&self, path: &str, version: u64) -> String {
        format!("{}?version={}", self.url(path), version)
    }

    pub fn write(&self, path: &str) -> String {
        self.url(path)
    }

    pub fn delete(&self, path: &str) -> String {
        self.url(path)
    }

    // KV v2 metadata
    pub fn list(&self, path: &str) -> String {
        format!("{}?list=true", self.url(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoints() {
        let endpoints = Endpoints::new("http://localhost:8200");

        assert_eq!(
            endpoints.read("secret/data/test"),
            "http://localhost:8200/v1/secret/data/test"
        );

        assert_eq!(
            endpoints.read_version("secret/data/test", 3),
            "http://localhost:8200/v1/secret/data/test?version=3"
        );

        assert_eq!(
            endpoints.list("secret/metadata"),
            "http://localhost:8200/v1/secret/metadata?list=true"
        );

        assert_eq!(
            endpoints.write("secret/data/my app"),
            "http://localhost:8200/v1/secret/data/my%20app"
        );
    }

    #[test]
    fn test_trailing_slash() {
        let endpoints = Endpoints::new("http://localhost:8200/");
        assert_eq!(
            endpoints.delete("/secret/data/test/"),
            "http://localhost:8200/v1/secret/data/test"
        );
    }

    #[test]
    fn test_base_path_prefix_is_kept() {
        let endpoints = Endpoints::new("https://vault.example.com/proxy");
        assert_eq!(
            endpoints.read("secret/data/test"),
            "https://vault.example.com/proxy/v1/secret/data/test"
        );
    }
}
