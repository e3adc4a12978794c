use std::time::Duration;

use clap::Parser;
use serde_json::Value;
use service_gateway::error::{GatewayError, Result};
use service_gateway::services::client::GatewayClient;

#[derive(Parser, Debug)]
#[command(name = "service-gateway")]
#[command(about = "Send one request to a running service gateway and print the reply")]
struct Cli {
    #[arg(long, env = "SERVICE_GATEWAY_ENDPOINT", default_value = "tcp://127.0.0.1:5559")]
    endpoint: String,

    #[arg(long, default_value_t = 60)]
    timeout_seconds: u64,

    /// Service tag, e.g. geocoding, autocomplete, nws or ai.
    service: String,

    /// Payload as JSON; anything that is not valid JSON is sent as a string.
    data: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let data = serde_json::from_str::<Value>(&cli.data).unwrap_or(Value::String(cli.data));

    let mut client =
        GatewayClient::connect(&cli.endpoint, Duration::from_secs(cli.timeout_seconds)).await?;
    let reply = client.request(&cli.service, data).await?;
    let rendered = serde_json::to_string_pretty(&reply)
        .map_err(|e| GatewayError::Serialization(e.to_string()))?;
    println!("{rendered}");
    Ok(())
}
