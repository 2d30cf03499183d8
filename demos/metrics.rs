//! Record OpenTelemetry metrics for every request.
//!
//! Run with:
//! ```sh
//! VAULT_ADDR=http://localhost:8200 VAULT_TOKEN=root cargo run --example metrics --features metrics
//! ```

use serde_json::json;
use vault_kv_sdk::{telemetry::TelemetryConfig, ClientBuilder};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let telemetry_config = TelemetryConfig {
        enabled: true,
        service_name: "vault-kv-metrics-demo".to_string(),
        service_version: "0.1.0".to_string(),
    };

    let client = ClientBuilder::from_env()?
        .with_telemetry(telemetry_config)
        .build()?;

    println!("Performing operations to generate metrics...");
    for i in 0..5 {
        let path = format!("secret/data/metrics-demo/{}", i);
        let written = client.write(&path, &json!({"data": {"n": i}})).await?;
        println!("  wrote {} v{}", path, written.version());
    }

    // Not-found reads show up as client errors
    for i in 0..3 {
        let path = format!("secret/data/metrics-demo/missing-{}", i);
        if let Err(e) = client.read(&path).await {
            println!("  {} -> {}", path, e);
        }
    }

    let listed = client.list("secret/metadata/metrics-demo").await?;
    for key in &listed.keys {
        let _ = client
            .delete(&format!("secret/data/metrics-demo/{}", key))
            .await?;
    }

    println!("Done. Install an OpenTelemetry meter provider to export the recorded instruments.");
    Ok(())
}
