//! jobtrack - job application tracker
//!
//! ```bash
//! # REST API on 127.0.0.1:5000
//! jobtrack serve
//!
//! # Terminal client against a running server
//! jobtrack shell --api-url http://127.0.0.1:5000/api/jobs
//!
//! # Terminal client straight on the database file
//! jobtrack shell --local
//! ```

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};

use jobtrack::config::Config;
use jobtrack::{init_logging, load_or_default, Database, HttpJobsApi, JobService, LocalJobsApi, Tracker};

mod server;
mod shell;

#[derive(Parser, Debug)]
#[command(name = "jobtrack")]
#[command(version)]
#[command(about = "Track job applications from the terminal", long_about = None)]
struct Cli {
    /// Configuration file (defaults to ~/.jobtrack/config.json when present)
    #[arg(long = "config", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the REST API server
    Serve {
        /// Bind address
        #[arg(long = "host")]
        host: Option<String>,

        /// Bind port
        #[arg(short = 'p', long = "port")]
        port: Option<u16>,

        /// SQLite database file
        #[arg(long = "db")]
        db: Option<PathBuf>,
    },

    /// Open the interactive tracker
    Shell {
        /// Jobs collection URL of a running server
        #[arg(short = 'u', long = "api-url", conflicts_with = "local")]
        api_url: Option<String>,

        /// Work on the database directly instead of over HTTP
        #[arg(long = "local")]
        local: bool,

        /// SQLite database file (with --local)
        #[arg(long = "db", requires = "local")]
        db: Option<PathBuf>,
    },
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = load_or_default(cli.config.as_deref())
        .context("Failed to load configuration")?;

    match cli.command {
        Commands::Serve { host, port, db } => {
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            if db.is_some() {
                config.database.path = db;
            }
            init_logging(&config.logging)?;
            server::run(&config).await
        }
        Commands::Shell { api_url, local, db } => {
            // Log lines would interleave with the screen, so stay quiet
            // unless a level was asked for explicitly.
            if std::env::var_os("JOBTRACK_LOG").is_none() {
                config.logging.level = "warn".to_string();
            }
            if let Some(url) = api_url {
                config.client.api_url = url;
            }
            if db.is_some() {
                config.database.path = db;
            }
            init_logging(&config.logging)?;
            run_shell(&config, local).await
        }
    }
}

async fn run_shell(config: &Config, local: bool) -> anyhow::Result<()> {
    if local {
        let path = config.database.resolved_path();
        let db = Database::open(&path)
            .with_context(|| format!("Failed to open database at {}", path.display()))?;
        shell::run(Tracker::new(LocalJobsApi::new(JobService::new(db)))).await
    } else {
        let api = HttpJobsApi::new(&config.client.api_url)?;
        tracing::info!(url = %api.base_url(), "Connecting to jobs API");
        shell::run(Tracker::new(api)).await
    }
}
