use clap::Parser;
use service_gateway::config::{Config, ServerConfig};
use service_gateway::error::Result;
use service_gateway::services::transport::ZmqTransport;
use service_gateway::GatewayFactory;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "service-gatewayd")]
#[command(about = "Request/reply gateway for geocoding, autocomplete, weather and AI services")]
struct Cli {
    #[arg(long, env = "SERVICE_GATEWAY_CONFIG")]
    config: Option<String>,

    #[arg(long, env = "SERVICE_GATEWAY_HOST")]
    host: Option<String>,

    #[arg(long, env = "SERVICE_GATEWAY_PORT")]
    port: Option<u16>,

    #[arg(long, env = "SERVICE_GATEWAY_GOOGLE_API_KEY", hide_env_values = true)]
    google_api_key: Option<String>,

    #[arg(long, env = "SERVICE_GATEWAY_AI_API_KEY", hide_env_values = true)]
    ai_api_key: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,service_gateway=info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
    let cli = Cli::parse();

    let mut config = match cli.config.as_deref() {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    }
    .with_keys(cli.google_api_key, cli.ai_api_key)
    .resolve_env();
    let server = config.server.get_or_insert_with(ServerConfig::default);
    if cli.host.is_some() {
        server.host = cli.host;
    }
    if cli.port.is_some() {
        server.port = cli.port;
    }

    let transport = ZmqTransport::bind(&config.bind_endpoint()).await?;
    let router = GatewayFactory::create_from_config(&config, transport.reply_channel())?;
    transport
        .serve(&router, async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await
}
