//! pkgindex CLI - package dependency index server.
//!
//! Usage:
//!   pkgindex serve                        # Listen on 0.0.0.0:8080
//!   pkgindex serve --throttle 100         # Limit each connection to 100 msg/s
//!   pkgindex serve --config index.toml    # Load settings from a TOML file
//!   pkgindex send 'INDEX|pkg1|' 'QUERY|pkg1|'

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

use pkgindex::config::MAX_THROTTLE;
use pkgindex::logging::{init_tracing, LogLevel};
use pkgindex::{Config, IndexClient, IndexServer, IndexService};

#[derive(Parser)]
#[command(name = "pkgindex")]
#[command(about = "pkgindex - package dependency index", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the index server
    Serve {
        /// TOML config file (flags below override its values)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Address to bind
        #[arg(long)]
        bind: Option<String>,

        /// Port to listen on
        #[arg(short, long)]
        port: Option<u16>,

        /// Limit on messages/second from each connection (0 = unlimited, max 10000)
        #[arg(short, long)]
        throttle: Option<u32>,

        /// Log level: TRACE, DEBUG, INFO, WARN, ERROR, FATAL
        #[arg(short, long)]
        log_level: Option<String>,

        /// Cap on concurrently served connections (0 = unlimited)
        #[arg(long)]
        max_connections: Option<usize>,
    },

    /// Send messages to a running server and print each response
    Send {
        /// Server address
        #[arg(short, long, default_value = "127.0.0.1:8080")]
        addr: String,

        /// Messages, e.g. 'INDEX|pkg1|dep1,dep2'
        #[arg(required = true)]
        messages: Vec<String>,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Serve {
            config,
            bind,
            port,
            throttle,
            log_level,
            max_connections,
        } => {
            let mut settings = match &config {
                Some(path) => Config::load(path)
                    .with_context(|| format!("loading config {}", path.display()))?,
                None => Config::default(),
            };

            if let Some(level) = log_level {
                settings.log_level = level;
            }
            if let Some(bind) = bind {
                settings.bind_address = bind;
            }
            if let Some(port) = port {
                settings.port = port;
            }
            if let Some(throttle) = throttle {
                settings.throttle = throttle;
            }
            if let Some(max) = max_connections {
                settings.max_connections = max;
            }

            init_tracing(settings.level());
            if let Some(level) = settings.unknown_log_level() {
                warn!(level = ?level, default = %LogLevel::default(), "unknown log level");
            }

            serve(settings).await
        }

        Commands::Send { addr, messages } => {
            let mut client = IndexClient::connect(addr.as_str())
                .await
                .with_context(|| format!("connecting to {}", addr))?;
            for message in &messages {
                let response = client
                    .send(message)
                    .await
                    .with_context(|| format!("sending {:?}", message))?;
                println!("{}", response);
            }
            Ok(())
        }
    }
}

async fn serve(settings: Config) -> Result<()> {
    let service = Arc::new(IndexService::new());
    let server = IndexServer::bind(&settings, service)
        .await
        .with_context(|| format!("binding {}", settings.listen_addr()))?;

    info!(
        throttle = settings.throttle.min(MAX_THROTTLE),
        max_connections = settings.max_connections,
        "index ready"
    );

    server
        .serve_until(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!(error = %e, "cannot listen for shutdown signal");
                std::future::pending::<()>().await;
            }
        })
        .await?;
    Ok(())
}
