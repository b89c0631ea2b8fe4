//! Scholar Graph MCP Server - Entry Point
//!
//! Provides both stdio and streamable HTTP transports.

use clap::Parser;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use scholar_graph_mcp::{
    SemanticScholarClient,
    config::{Config, TransportMode},
    server::McpServer,
};

#[derive(Parser, Debug)]
#[command(name = "scholar-graph-mcp")]
#[command(about = "MCP server for the Semantic Scholar Academic Graph API")]
#[command(version)]
struct Cli {
    /// Transport mode (overrides MCP_TRANSPORT)
    #[arg(long)]
    transport: Option<TransportMode>,

    /// HTTP bind host (overrides MCP_SERVER_HOST)
    #[arg(long)]
    host: Option<String>,

    /// HTTP bind port (overrides MCP_SERVER_PORT)
    #[arg(long)]
    port: Option<u16>,

    /// Log level used when RUST_LOG is unset (overrides MCP_LOG_LEVEL)
    #[arg(long)]
    log_level: Option<String>,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,
}

impl Cli {
    fn apply(self, config: &mut Config) -> bool {
        if let Some(transport) = self.transport {
            config.transport = transport;
        }
        if let Some(host) = self.host {
            config.host = host;
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(level) = self.log_level {
            config.log_level = level;
        }
        self.json_logs
    }
}

/// Logs always go to stderr; stdout belongs to the stdio transport.
fn init_tracing(log_level: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level.to_ascii_lowercase()));

    let subscriber = tracing_subscriber::registry().with(filter);

    if json {
        subscriber
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        subscriber
            .with(tracing_subscriber::fmt::layer().compact().with_writer(std::io::stderr))
            .init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    let cli = Cli::parse();
    let mut config = Config::from_env()?;
    let json_logs = cli.apply(&mut config);

    init_tracing(&config.log_level, json_logs);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        transport = ?config.transport,
        has_api_key = config.has_api_key(),
        base_url = %config.base_url,
        pacing_delay_s = config.pacing_delay.as_secs_f64(),
        max_retries = config.max_retries,
        "Starting Semantic Scholar Graph MCP server"
    );
    if !config.has_api_key() {
        tracing::warn!("No SEMANTIC_SCHOLAR_API_KEY set; using the slower unauthenticated pacing");
    }

    let client = SemanticScholarClient::new(config.clone())?;
    let server = McpServer::new(&config, client);

    match config.transport {
        TransportMode::Stdio => server.run_stdio().await?,
        TransportMode::StreamableHttp => server.run_http(&config.host, config.port).await?,
    }

    Ok(())
}
