//! docpack CLI - documentation bundles from code and external sources.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

mod commands;
mod config;

#[derive(Parser)]
#[command(name = "docpack")]
#[command(about = "Generate ready-to-host documentation bundles")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to docpack.toml config file
    #[arg(short, long, default_value = "docpack.toml")]
    config: PathBuf,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a starter config, example request and templates
    Init {
        /// Overwrite existing files
        #[arg(short, long)]
        yes: bool,
    },

    /// Fetch external sources and print what was collected
    Fetch {
        /// Comma or newline separated URLs
        sources: String,
    },

    /// Generate a documentation bundle from a request file
    Generate {
        /// Request file (.json or .toml)
        request: PathBuf,

        /// Output directory (defaults to config or "dist")
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Minify the CSS theme
        #[arg(long)]
        minify: bool,
    },

    /// Preview a generated bundle
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "4000")]
        port: u16,

        /// Directory to serve
        #[arg(short, long, default_value = "dist")]
        dir: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    fmt().with_env_filter(filter).with_target(false).init();

    // Execute command
    match cli.command {
        Commands::Init { yes } => {
            commands::init::run(&cli.config, yes).await?;
        }
        Commands::Fetch { sources } => {
            commands::fetch::run(&cli.config, sources).await?;
        }
        Commands::Generate {
            request,
            output,
            minify,
        } => {
            commands::generate::run(&cli.config, request, output, minify).await?;
        }
        Commands::Serve { port, dir } => {
            commands::serve::run(port, dir).await?;
        }
    }

    Ok(())
}
