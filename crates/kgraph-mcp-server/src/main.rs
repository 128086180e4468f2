//! Binary entry point. Initializes tracing to stderr (stdout is reserved
//! for the JSON-RPC stream) and hands off to [`kgraph_mcp_server::lifecycle::run`].

use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let runtime = tokio::runtime::Runtime::new()?;
    match runtime.block_on(kgraph_mcp_server::lifecycle::run()) {
        Ok(()) => Ok(()),
        Err(err) => {
            tracing::error!("fatal error: {err:#}");
            std::process::exit(1);
        }
    }
}
