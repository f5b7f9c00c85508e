//! CLI for pullkit.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use pullkit_core::config;
use std::path::PathBuf;

use commands::{run_bucket, run_doc, run_fetch};

/// Top-level CLI for pullkit.
#[derive(Debug, Parser)]
#[command(name = "pullkit")]
#[command(about = "pullkit: fetch files by URL and reach the cloud backend", long_about = None)]
pub struct Cli {
    /// Read configuration from this file instead of ~/.config/pullkit/config.toml.
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Download a URL into the download directory.
    Fetch {
        /// HTTP/HTTPS URL; the last path segment becomes the file name.
        url: String,
        /// Save into DIR instead of the configured download directory.
        #[arg(long, value_name = "DIR")]
        dir: Option<PathBuf>,
    },

    /// Show metadata of the storage bucket (checks that it exists).
    Bucket {
        /// Service-account key file.
        #[arg(long, value_name = "PATH")]
        credentials: Option<PathBuf>,
        /// Bucket name; defaults to the configured bucket.
        #[arg(long)]
        name: Option<String>,
    },

    /// Print a document from the document database as JSON.
    Doc {
        /// Document path, e.g. `users/abc123`.
        path: String,
        /// Service-account key file.
        #[arg(long, value_name = "PATH")]
        credentials: Option<PathBuf>,
    },
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = match &cli.config {
            Some(path) => config::load_from(path)?,
            None => config::load_or_init()?,
        };
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command {
            CliCommand::Fetch { url, dir } => run_fetch(&cfg, &url, dir).await?,
            CliCommand::Bucket { credentials, name } => run_bucket(&cfg, credentials, name).await?,
            CliCommand::Doc { path, credentials } => run_doc(&cfg, &path, credentials).await?,
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
