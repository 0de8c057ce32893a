use std::path::PathBuf;

use clap::Parser;

/// Concierge chat backend
#[derive(Debug, Parser)]
#[command(name = "concierge", about = "Multi-channel AI chat backend with tool calling and support routing")]
pub struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "concierge.toml", env = "CONCIERGE_CONFIG")]
    pub config: PathBuf,

    /// Override the listen address
    #[arg(long, env = "CONCIERGE_LISTEN")]
    pub listen: Option<std::net::SocketAddr>,
}
