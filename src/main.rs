extern crate log;
pub mod config;
pub mod edits;
pub mod error;
pub mod feature;
pub mod geometry;
pub mod mcp;
pub mod service;
pub mod tools;
use crate::config::Config;
use crate::mcp::McpServer;
use crate::service::RestFeatureService;
use clap::Parser;
use std::path::PathBuf;

/// MCP server exposing query and edit tools for hosted feature layers.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to an optional YAML config file.
    #[arg(short, long)]
    config_filepath: Option<PathBuf>,
}

fn try_main() -> anyhow::Result<()> {
    let args = Args::try_parse()?;
    let config = Config::load(args.config_filepath.as_deref())?;

    let service = RestFeatureService::new(&config.user_agent, config.request_timeout())?;
    let server = McpServer::new(service, config.server_info());
    log::info!(
        "{} v{} running on stdio",
        config.server_name,
        config.server_version
    );
    server.run_stdio()
}

fn main() {
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "info")
    }
    // env_logger writes to stderr, which keeps stdout free for protocol frames.
    env_logger::init();
    if let Err(e) = try_main() {
        eprintln!("Error: {:?}", e);
        std::process::exit(1)
    }
}
