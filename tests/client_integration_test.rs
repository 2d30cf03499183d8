//! Integration tests for the Vault KV SDK client

use serde_json::json;
use tokio_test::{assert_err, assert_ok};
use vault_kv_sdk::{Auth, Client, ClientBuilder, Error, ErrorKind};
use wiremock::{
    matchers::{any, header, header_regex, method, path},
    Mock, MockServer, ResponseTemplate,
};

/// Create a mock server and test client
async fn setup() -> (MockServer, Client) {
    let server = MockServer::start().await;

    let client = ClientBuilder::new(server.uri())
        .auth(Auth::token("test-token"))
        .timeout_ms(5000)
        .user_agent_extra("integration-test/1.0")
        .build()
        .expect("Failed to build client");

    (server, client)
}

#[test]
fn test_malformed_address_is_configuration_error() {
    for address in ["", "localhost", "//localhost:8200", "mailto:ops@example.com"] {
        let err = assert_err!(Client::new(address));
        assert_eq!(err.kind(), ErrorKind::Configuration, "address {:?}", address);
    }
    let _ = assert_ok!(Client::new("http://localhost:8200"));
    let _ = assert_ok!(Client::new("https://vault.example.com:8200/"));
}

#[tokio::test]
async fn test_every_operation_requires_token() {
    let server = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let client = Client::new(server.uri()).unwrap();

    let write = client.write("secret/data/test", &json!({"data": {}})).await;
    let read = client.read("secret/data/test").await;
    let list = client.list("secret/metadata").await;
    let delete = client.delete("secret/data/test").await;

    for kind in [
        write.unwrap_err().kind(),
        read.unwrap_err().kind(),
        list.unwrap_err().kind(),
        delete.unwrap_err().kind(),
    ] {
        assert_eq!(kind, ErrorKind::Authentication);
    }
}

#[tokio::test]
async fn test_token_set_after_construction_is_used() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/v1/secret/data/test"))
        .and(header("X-Vault-Token", "late-token"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let mut client = Client::new(server.uri()).unwrap();
    assert!(client.delete("secret/data/test").await.is_err());

    client.set_token("late-token");
    let result = client.delete("secret/data/test").await.unwrap();
    assert!(result.deleted);
}

#[tokio::test]
async fn test_common_headers() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/v1/secret/data/test"))
        .and(header("X-Vault-Request", "true"))
        .and(header_regex("User-Agent", r"^vault-kv-sdk-rust/\S+ integration-test/1\.0$"))
        .and(header_regex("X-Request-ID", r"^sdk-[0-9a-f-]{36}$"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "request_id": "req-headers",
            "data": {
                "data": {"key": "value"},
                "metadata": {"version": 1, "created_time": "2024-01-01T00:00:00Z", "deletion_time": "", "destroyed": false}
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let secret = client.read("secret/data/test").await.unwrap();
    assert_eq!(secret.data["key"], json!("value"));
}

#[tokio::test]
async fn test_status_mapping() {
    let cases = [
        (400, ErrorKind::Validation),
        (401, ErrorKind::Authentication),
        (403, ErrorKind::Authentication),
        (404, ErrorKind::NotFound),
        (405, ErrorKind::Other),
        (429, ErrorKind::Other),
        (500, ErrorKind::Server),
        (503, ErrorKind::Server),
    ];

    for (status, expected) in cases {
        let (server, client) = setup().await;
        Mock::given(method("GET"))
            .and(path("/v1/secret/data/test"))
            .respond_with(
                ResponseTemplate::new(status).set_body_json(json!({"errors": ["boom"]})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let err = client.read("secret/data/test").await.unwrap_err();
        assert_eq!(err.kind(), expected, "status {}", status);
        assert_eq!(err.status_code(), Some(status));
    }
}

#[tokio::test]
async fn test_sealed_vault_message_is_kept() {
    let (server, client) = setup().await;
    Mock::given(method("POST"))
        .and(path("/v1/secret/data/test"))
        .respond_with(
            ResponseTemplate::new(503).set_body_json(json!({"errors": ["Vault is sealed"]})),
        )
        .mount(&server)
        .await;

    let err = client
        .write("secret/data/test", &json!({"data": {"key": "value"}}))
        .await
        .unwrap_err();
    match err {
        Error::Server { status: 503, message } => assert_eq!(message, "Vault is sealed"),
        other => panic!("Expected server error, got: {:?}", other),
    }
}

#[tokio::test]
async fn test_connection_refused_is_transport_error() {
    // Bind then drop a listener so nothing is accepting on the port
    let uri = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        format!("http://{}", listener.local_addr().unwrap())
    };

    let mut client = ClientBuilder::new(uri).timeout_ms(2_000).build().unwrap();
    client.set_token("test-token");

    let err = client.list("secret/metadata").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Transport);
    assert_eq!(err.status_code(), None);
}

#[tokio::test]
async fn test_undecodable_body_is_deserialize_error() {
    let (server, client) = setup().await;
    Mock::given(method("GET"))
        .and(path("/v1/secret/data/test"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>proxy login</html>"))
        .mount(&server)
        .await;

    let err = client.read("secret/data/test").await.unwrap_err();
    assert!(matches!(err, Error::Deserialize(_)));
}

#[tokio::test]
async fn test_empty_path_is_rejected_locally() {
    let (server, client) = setup().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let err = client.read("/").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
    let err = client.write("", &json!({"data": {}})).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
}
