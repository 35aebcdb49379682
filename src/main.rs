//! `vidgrab` CLI - serve the API, or resolve and download from the terminal

mod cmd;

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use vidgrab::Config;

#[derive(Parser)]
#[command(name = "vidgrab")]
#[command(about = "Resolve direct video URLs from social media pages and proxy their download")]
#[command(version)]
struct Cli {
    /// Config file (default: ~/.config/vidgrab/config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Debug logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Upstream timeout in seconds
    #[arg(long, global = true)]
    timeout: Option<u64>,

    /// Write debug_page.html and debug_scripts.txt into this directory
    #[arg(long, global = true)]
    debug_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API
    Serve {
        /// Listen address
        #[arg(short, long)]
        bind: Option<SocketAddr>,

        /// Allowed CORS origin
        #[arg(long)]
        origin: Option<String>,
    },

    /// Print the direct media URL found on a page
    Resolve {
        /// Page URL
        url: String,
    },

    /// Download a direct media URL to disk
    Download {
        /// Direct media URL
        url: String,

        /// Output path (default: filename derived from the URL)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(secs) = cli.timeout {
        anyhow::ensure!(secs > 0, "--timeout must be greater than zero");
        config.http.timeout_secs = secs;
    }
    if let Some(dir) = cli.debug_dir {
        config.debug.dir = Some(dir);
    }

    match cli.command {
        Commands::Serve { bind, origin } => {
            if let Some(bind) = bind {
                config.server.bind = bind;
            }
            if let Some(origin) = origin {
                config.server.allowed_origin = origin;
            }
            cmd::cmd_serve(&config).await?;
        }
        Commands::Resolve { url } => {
            cmd::cmd_resolve(&config, &url).await?;
        }
        Commands::Download { url, output } => {
            cmd::cmd_download(&config, &url, output).await?;
        }
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}
