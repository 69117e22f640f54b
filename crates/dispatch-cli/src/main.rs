mod client;
mod cmd;
mod output;
mod tools;

use clap::{Parser, Subcommand};
use client::CommanderClient;
use cmd::serve::ServeArgs;

#[derive(Parser)]
#[command(
    name = "dispatch",
    about = "Long-poll command relay between a driving simulator and its commander",
    version,
    propagate_version = true
)]
struct Cli {
    /// Base URL of a running dispatch server (commander commands and MCP)
    #[arg(long, global = true, env = "DISPATCH_URL", default_value = client::DEFAULT_URL)]
    url: String,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the server the driver polls and the commander posts to
    Serve(ServeArgs),

    /// Tell the vehicle to head for the nearest target
    Nearest,

    /// Tell the vehicle to head for a specific target
    Target {
        /// Target id from the driver's latest report
        id: i64,
    },

    /// List the driver's known targets, nearest first
    Targets,

    /// Run as an MCP stdio server exposing the commander actions as tools
    Mcp,
}

fn main() {
    let cli = Cli::parse();

    let default_level = match &cli.command {
        Commands::Serve(_) | Commands::Mcp => tracing::Level::INFO,
        _ => tracing::Level::WARN,
    };

    // stdout carries MCP messages and command output; logs go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let client = CommanderClient::new(&cli.url);

    let result = match cli.command {
        Commands::Serve(args) => cmd::serve::run(args),
        Commands::Nearest => cmd::command::go_to_nearest(&client, cli.json),
        Commands::Target { id } => cmd::command::go_to_target(&client, id, cli.json),
        Commands::Targets => cmd::command::list_targets(&client, cli.json),
        Commands::Mcp => cmd::mcp::run(&client),
    };

    if let Err(e) = result {
        // Print the full error chain (anyhow's alternate Display)
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
