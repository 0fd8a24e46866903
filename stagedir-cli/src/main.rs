use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use stagedir_core::hal::NativeHal;
use stagedir_core::{logging, ScratchConfig, ScratchDirs, ScratchGuard};
use std::process::Command as Process;

mod cli;

use cli::{Cli, Command};

/// Variable pointing launched commands at the staged payloads.
const PAYLOADS_ENV: &str = "STAGEDIR_PAYLOADS";

fn load_config(cli: &Cli) -> Result<ScratchConfig> {
    match &cli.config {
        Some(path) => ScratchConfig::load(path),
        None => Ok(ScratchConfig::from_env()),
    }
}

fn exec(scratch: &ScratchDirs<NativeHal>, command: &[String]) -> Result<i32> {
    let guard = ScratchGuard::new(scratch);
    let dir = scratch.payloads_dir()?;
    scratch.update_search_path(&dir);

    let (program, args) = command
        .split_first()
        .context("no command given to exec")?;
    info!("running {} with payloads in {}", program, dir.display());
    let status = Process::new(program)
        .args(args)
        .env(PAYLOADS_ENV, &dir)
        .status()
        .with_context(|| format!("failed to run `{program}`"))?;

    drop(guard);
    Ok(status.code().unwrap_or(1))
}

fn run(cli: Cli) -> Result<i32> {
    let config = load_config(&cli)?;
    let scratch = ScratchDirs::new(NativeHal::new(), config);

    match &cli.command {
        Command::Path => {
            let dir = scratch.payloads_dir()?;
            println!("{}", dir.display());
            Ok(0)
        }
        Command::Check { path } => {
            let noexec = scratch.is_noexec(path);
            println!("{}: {}", path.display(), if noexec { "noexec" } else { "exec" });
            Ok(0)
        }
        Command::Exec { command } => exec(&scratch, command),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.log_level);
    let code = run(cli)?;
    std::process::exit(code);
}
