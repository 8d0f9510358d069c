use anyhow::Context;
use aws_readonly_server::{logging, run, ServerConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServerConfig::load().unwrap_or_else(|e| e.exit());
    logging::init(config.log_level).context("failed to initialize logging")?;

    if let Err(e) = run(config).await {
        tracing::error!(error = %e, "Server failed");
        return Err(e.into());
    }
    Ok(())
}
