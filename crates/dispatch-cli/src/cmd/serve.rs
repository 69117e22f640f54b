use anyhow::{anyhow, Result};
use clap::Args;
use dispatch_core::config::{ServerConfig, DEFAULT_CONFIG_FILE};
use std::path::{Path, PathBuf};

#[derive(Args, Debug, Default)]
pub struct ServeArgs {
    /// Config file (missing file = defaults)
    #[arg(long, env = "DISPATCH_CONFIG", default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    /// Interface to bind
    #[arg(long, env = "DISPATCH_HOST")]
    pub host: Option<String>,

    /// Port to listen on (0 = OS-assigned)
    #[arg(long, env = "DISPATCH_PORT")]
    pub port: Option<u16>,

    /// Seconds a driver poll waits for a command
    #[arg(long, env = "DISPATCH_POLL_TIMEOUT")]
    pub poll_timeout: Option<u64>,

    /// Directory holding the driver's browser UI
    #[arg(long, env = "DISPATCH_STATIC_DIR")]
    pub static_dir: Option<PathBuf>,

    /// Open the driver UI in a browser once listening
    #[arg(long)]
    pub open: bool,
}

/// Config file values with any flags / env vars layered on top.
pub fn resolve_config(args: &ServeArgs) -> Result<ServerConfig> {
    let mut config = ServerConfig::load(&args.config)
        .map_err(|e| anyhow!("{}: {e}", args.config.display()))?;
    apply_overrides(&mut config, args);
    config.validate().map_err(|e| anyhow!("{e}"))?;
    Ok(config)
}

fn apply_overrides(config: &mut ServerConfig, args: &ServeArgs) {
    if let Some(host) = &args.host {
        config.host = host.clone();
    }
    if let Some(port) = args.port {
        config.port = port;
    }
    if let Some(secs) = args.poll_timeout {
        config.poll_timeout_secs = secs;
    }
    if let Some(dir) = &args.static_dir {
        config.static_dir = dir.clone();
    }
}

pub fn run(args: ServeArgs) -> Result<()> {
    let config = resolve_config(&args)?;
    warn_if_missing(&config.static_dir);

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async move {
        let listener = tokio::net::TcpListener::bind(config.bind_addr()).await?;
        let actual_port = listener.local_addr()?.port();
        println!(
            "dispatch → http://{}:{actual_port}  (PID {})",
            config.host,
            std::process::id()
        );

        tokio::select! {
            res = dispatch_server::serve_on(config, listener, args.open) => res,
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("shutting down, abandoning pending polls");
                Ok(())
            }
        }
    })
}

fn warn_if_missing(dir: &Path) {
    if !dir.is_dir() {
        eprintln!(
            "warning: static directory '{}' not found; the driver UI will not be served",
            dir.display()
        );
    }
}
