//! CLI for the smuledl downloader.

mod commands;
mod input;

use anyhow::Result;
use clap::{Parser, Subcommand};
use clap_complete::Shell;
use smuledl_core::config::{self, SmuledlConfig};
use std::path::PathBuf;

use commands::{
    run_checksum, run_completions, run_delete, run_download, run_list, run_man, run_path,
    run_resolve,
};

/// Top-level CLI for smuledl.
#[derive(Debug, Parser)]
#[command(name = "smuledl", version)]
#[command(about = "Download recordings from Smule performance pages", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Resolve a performance link and print the direct media URL.
    Resolve {
        /// Performance page link, or `-` to read it from stdin.
        link: String,
    },

    /// Resolve a performance link and download the recording.
    Download {
        /// Performance page link, or `-` to read it from stdin.
        link: String,
        /// Download directory (default: `download_dir` from config, else ~/Downloads).
        #[arg(long, value_name = "DIR")]
        dir: Option<PathBuf>,
        /// File name to save as instead of the recording title.
        #[arg(long, value_name = "NAME")]
        name: Option<String>,
    },

    /// List downloaded recordings, newest first.
    List {
        /// Directory to scan instead of the configured download directory.
        #[arg(long, value_name = "DIR")]
        dir: Option<PathBuf>,
    },

    /// Delete downloaded recordings by ID (or file name).
    Delete {
        /// IDs as shown by `list`.
        #[arg(required = true, value_name = "ID")]
        ids: Vec<String>,
        /// Do not ask for confirmation.
        #[arg(long, short = 'y')]
        yes: bool,
        /// Directory to look in instead of the configured download directory.
        #[arg(long, value_name = "DIR")]
        dir: Option<PathBuf>,
    },

    /// Print the absolute path of a downloaded recording (for a player or share tool).
    Path {
        /// ID as shown by `list`.
        id: String,
        /// Directory to look in instead of the configured download directory.
        #[arg(long, value_name = "DIR")]
        dir: Option<PathBuf>,
    },

    /// Compute SHA-256 of a file (e.g. after download).
    Checksum {
        /// Path to the file.
        path: PathBuf,
    },

    /// Print shell completions to stdout.
    Completions {
        /// Target shell.
        #[arg(value_enum)]
        shell: Shell,
    },

    /// Print the man page (roff) to stdout.
    Man,
}

fn library_dir(cfg: &SmuledlConfig, dir: Option<PathBuf>) -> Result<PathBuf> {
    match dir {
        Some(dir) => Ok(dir),
        None => cfg.resolved_download_dir(),
    }
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();

        // These need neither config nor network.
        match cli.command {
            CliCommand::Completions { shell } => return run_completions(shell),
            CliCommand::Man => return run_man(),
            CliCommand::Checksum { ref path } => return run_checksum(path).await,
            _ => {}
        }

        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command {
            CliCommand::Resolve { link } => run_resolve(&cfg, &link).await?,
            CliCommand::Download { link, dir, name } => {
                let dir = library_dir(&cfg, dir)?;
                run_download(&cfg, &link, &dir, name.as_deref()).await?;
            }
            CliCommand::List { dir } => run_list(&cfg, &library_dir(&cfg, dir)?)?,
            CliCommand::Delete { ids, yes, dir } => {
                run_delete(&cfg, &library_dir(&cfg, dir)?, &ids, yes)?
            }
            CliCommand::Path { id, dir } => run_path(&cfg, &library_dir(&cfg, dir)?, &id)?,
            CliCommand::Checksum { .. } | CliCommand::Completions { .. } | CliCommand::Man => {}
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
