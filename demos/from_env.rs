//! Configure the client from `VAULT_ADDR`, `VAULT_TOKEN` and friends, then
//! decode a secret into a typed struct.
//!
//! ```sh
//! VAULT_ADDR=http://localhost:8200 VAULT_TOKEN=root cargo run --example from_env
//! ```

use serde::Deserialize;
use serde_json::json;
use vault_kv_sdk::{ClientBuilder, ErrorKind};

#[derive(Debug, Deserialize)]
struct DatabaseConfig {
    host: String,
    port: u16,
    user: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let client = ClientBuilder::from_env()?
        .user_agent_extra("from-env-demo/0.1")
        .build()?;

    let written = client
        .write(
            "secret/data/demo/database",
            &json!({"data": {"host": "db.internal", "port": 5432, "user": "app"}}),
        )
        .await?;
    println!("wrote version {}", written.version());

    let secret = client.read_as::<DatabaseConfig>("secret/data/demo/database").await?;
    println!(
        "connecting to {}:{} as {} (v{})",
        secret.data.host,
        secret.data.port,
        secret.data.user,
        secret.version()
    );

    let children = client.list("secret/metadata/demo").await?;
    println!("demo/ contains {:?}", children.keys);

    match client.read("secret/data/demo/does-not-exist").await {
        Err(e) if e.kind() == ErrorKind::NotFound => println!("missing secret reported as not found"),
        other => println!("unexpected: {:?}", other.map(|s| s.version())),
    }

    let _ = client.delete("secret/data/demo/database").await?;
    Ok(())
}
