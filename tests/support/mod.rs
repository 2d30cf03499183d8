//! In-memory KV v2 engine mounted at `secret/`, served through wiremock.
//!
//! Mirrors the answers a Vault dev server gives for the endpoints the SDK
//! uses: versioned writes, soft deletes that hide the latest version, and
//! list answering 404 when there are no keys.

#![allow(dead_code)]

use serde_json::{json, Value};
use std::collections::{BTreeSet, HashMap};
use std::sync::Mutex;
use vault_kv_sdk::Client;
use wiremock::{matchers::any, Mock, MockServer, Request, Respond, ResponseTemplate};

pub const ROOT_TOKEN: &str = "root";

const DATA_PREFIX: &str = "/v1/secret/data/";
const METADATA_PATH: &str = "/v1/secret/metadata";

#[derive(Debug, Default)]
struct Entry {
    // `None` marks a soft-deleted version
    versions: Vec<Option<Value>>,
}

#[derive(Debug, Default)]
pub struct FakeKv {
    secrets: Mutex<HashMap<String, Entry>>,
}

fn errors(status: u16, messages: &[&str]) -> ResponseTemplate {
    ResponseTemplate::new(status).set_body_json(json!({ "errors": messages }))
}

fn metadata(version: usize, deleted: bool) -> Value {
    json!({
        "created_time": "2024-01-01T00:00:00.000000001Z",
        "custom_metadata": null,
        "deletion_time": if deleted { "2024-01-02T00:00:00Z" } else { "" },
        "destroyed": false,
        "version": version
    })
}

fn envelope(data: Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "request_id": uuid::Uuid::new_v4().to_string(),
        "lease_id": "",
        "renewable": false,
        "lease_duration": 0,
        "data": data,
        "wrap_info": null,
        "warnings": null,
        "auth": null
    }))
}

impl FakeKv {
    fn write(&self, name: &str, body: &[u8]) -> ResponseTemplate {
        let Ok(body) = serde_json::from_slice::<Value>(body) else {
            return errors(400, &["failed to parse JSON input"]);
        };
        let Some(data) = body.get("data").filter(|d| d.is_object()).cloned() else {
            return errors(400, &["no data provided"]);
        };

        let mut secrets = self.secrets.lock().unwrap();
        let entry = secrets.entry(name.to_string()).or_default();
        entry.versions.push(Some(data));
        envelope(metadata(entry.versions.len(), false))
    }

    fn read(&self, name: &str, version: Option<usize>) -> ResponseTemplate {
        let secrets = self.secrets.lock().unwrap();
        let Some(entry) = secrets.get(name) else {
            return errors(404, &[]);
        };
        let version = version.unwrap_or(entry.versions.len());
        match entry.versions.get(version.wrapping_sub(1)) {
            Some(Some(data)) => envelope(json!({
                "data": data,
                "metadata": metadata(version, false)
            })),
            Some(None) => ResponseTemplate::new(404).set_body_json(json!({
                "data": {"data": null, "metadata": metadata(version, true)}
            })),
            None => errors(404, &[]),
        }
    }

    fn delete(&self, name: &str) -> ResponseTemplate {
        let mut secrets = self.secrets.lock().unwrap();
        if let Some(latest) = secrets.get_mut(name).and_then(|e| e.versions.last_mut()) {
            *latest = None;
        }
        ResponseTemplate::new(204)
    }

    fn list(&self, prefix: &str) -> ResponseTemplate {
        let secrets = self.secrets.lock().unwrap();
        let keys: BTreeSet<String> = secrets
            .keys()
            .filter_map(|name| {
                let rest = if prefix.is_empty() {
                    name.as_str()
                } else {
                    name.strip_prefix(prefix)?.strip_prefix('/')?
                };
                Some(match rest.split_once('/') {
                    Some((child, _)) => format!("{}/", child),
                    None => rest.to_string(),
                })
            })
            .collect();

        if keys.is_empty() {
            return errors(404, &[]);
        }
        envelope(json!({ "keys": keys }))
    }
}

impl Respond for FakeKv {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let token = request
            .headers
            .get("x-vault-token")
            .and_then(|v| v.to_str().ok());
        if token != Some(ROOT_TOKEN) {
            return errors(403, &["permission denied"]);
        }

        let path = request.url.path();
        let query: HashMap<String, String> = request.url.query_pairs().into_owned().collect();

        if let Some(name) = path.strip_prefix(DATA_PREFIX) {
            return match request.method.as_str() {
                "POST" | "PUT" => self.write(name, &request.body),
                "GET" => {
                    let version = query.get("version").and_then(|v| v.parse().ok());
                    self.read(name, version.filter(|v| *v > 0))
                }
                "DELETE" => self.delete(name),
                _ => errors(405, &["unsupported operation"]),
            };
        }

        if let Some(rest) = path.strip_prefix(METADATA_PATH) {
            if request.method.as_str() == "GET" && query.get("list").map(String::as_str) == Some("true") {
                return self.list(rest.trim_matches('/'));
            }
        }

        errors(404, &[])
    }
}

/// Start a mock server backed by a fresh [`FakeKv`]
pub async fn start_fake_vault() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(any())
        .respond_with(FakeKv::default())
        .mount(&server)
        .await;
    server
}

/// Client pointed at `server`, authenticated with the root token
pub fn root_client(server: &MockServer) -> Client {
    let mut client = Client::new(server.uri()).expect("Failed to build client");
    client.set_token(ROOT_TOKEN);
    client
}
