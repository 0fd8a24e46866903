use clap::{Parser, Subcommand};
use log::LevelFilter;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about = "Stage executable payloads in a scratch directory")]
pub struct Cli {
    /// TOML config file (defaults to $STAGEDIR_CONFIG, then built-in defaults)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log level used when RUST_LOG is not set
    #[arg(long, global = true)]
    pub log_level: Option<LevelFilter>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create the payloads directory, print it and keep it
    Path,
    /// Report whether PATH lives on a filesystem mounted noexec
    Check { path: PathBuf },
    /// Run a command with the payloads directory staged, then clean up
    Exec {
        #[arg(last = true, required = true)]
        command: Vec<String>,
    },
}
