use anyhow::Context as _;
use clap::{Parser, ValueEnum};
use ols_mcp::client::redact_url_str;
use ols_mcp::{BackendClient, BackendConfig, LightspeedServer, ToolGateway};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
enum LogFormat {
    #[default]
    Text,
    Json,
}

/// MCP server exposing OpenShift LightSpeed as the `openshift-lightspeed` tool.
///
/// Backend settings come from OLS_API_URL, OLS_API_TOKEN, OLS_TIMEOUT and OLS_VERIFY_SSL
/// (a `.env` file in the working directory is honored).
#[derive(Debug, Parser)]
#[command(name = "ols-mcp", version, about)]
struct Cli {
    /// Log filter (`RUST_LOG` syntax). Logs are written to stderr.
    #[arg(long, env = "OLS_MCP_LOG", default_value = "info")]
    log_level: String,

    /// Log output format.
    #[arg(long, env = "OLS_MCP_LOG_FORMAT", value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env is fine.
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    init_tracing(&cli)?;

    let config = match BackendConfig::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::error!(error = %e, "invalid backend configuration");
            return Err(e).context("load backend configuration");
        }
    };

    tracing::info!(
        base_url = %redact_url_str(&config.base_url),
        timeout_secs = config.timeout_seconds,
        verify_tls = config.verify_tls,
        auth = config.auth_token.is_some(),
        "OpenShift LightSpeed MCP server starting"
    );

    let gateway = ToolGateway::new(BackendClient::new(Arc::new(config)));
    LightspeedServer::new(gateway)
        .serve_stdio()
        .await
        .inspect_err(|e| tracing::error!(error = ?e, "MCP serve error"))
}

// stdout carries the MCP stream, so logs always go to stderr.
fn init_tracing(cli: &Cli) -> anyhow::Result<()> {
    let filter = EnvFilter::try_new(&cli.log_level)
        .with_context(|| format!("invalid log filter '{}'", cli.log_level))?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false);

    match cli.log_format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
    Ok(())
}
