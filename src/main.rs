//! Linear MCP probe
//!
//! Entry point: lists the Linear MCP server's tools and calls `list_issues`.

use mimalloc::MiMalloc;

/// Global allocator for improved performance (M-MIMALLOC-APPS).
#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

use std::process::ExitCode;

use dotenvy::dotenv;
use linear_mcp_probe::{
    config::AppConfig,
    driver::{self, RunPlan},
    error::ProbeError,
    mcp::StdioConnector,
};
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // Initialize tracing (M-LOG-STRUCTURED); stdout is reserved for results
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Load .env (if present)
    let _ = dotenv();

    match probe().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(name: "probe.failed", "{e}");
            ExitCode::from(e.exit_code())
        }
    }
}

async fn probe() -> Result<(), ProbeError> {
    let cfg = AppConfig::load().map_err(|e| ProbeError::Config(e.into()))?;
    driver::check_token(&cfg.client.token_env);

    let plan = RunPlan::from_config(&cfg)?;
    info!(
        name: "probe.config.loaded",
        server = %plan.server,
        tool = %plan.tool,
        "Configuration loaded"
    );

    let mut stdout = std::io::stdout().lock();
    driver::run(&StdioConnector, &plan, &mut stdout).await
}
