//! Write, read, list and delete a secret on a local Vault dev server.
//!
//! Start the server with:
//! ```sh
//! docker run --rm --cap-add=IPC_LOCK -p 8200:8200 hashicorp/vault server -dev -dev-root-token-id=root
//! ```
//!
//! Then run:
//! ```sh
//! RUST_LOG=vault_kv_sdk=debug cargo run --example basic_usage
//! ```

use serde_json::json;
use tracing_subscriber::EnvFilter;
use vault_kv_sdk::Client;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut vault = Client::new("http://localhost:8200")?;
    vault.set_token("root");

    let w = vault
        .write("secret/data/test", &json!({"data": {"key": "value"}}))
        .await?;
    println!("{}", w.version());

    let r = vault.read("secret/data/test").await?;
    println!("{}", r.data["key"]);

    let l = vault.list("secret/metadata").await?;
    println!("{:?}", l.keys);

    let d = vault.delete("secret/data/test").await?;
    println!("{:?}", d);

    match vault.read("secret/data/test").await {
        Err(e) if e.is_not_found() => println!("secret/data/test is gone"),
        Err(e) => return Err(e.into()),
        Ok(secret) => println!("still readable at v{}", secret.version()),
    }

    Ok(())
}
