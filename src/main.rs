//! routerlab - terminal control panel for a router discovery and comparison host
//!
//! This is the binary entry point. All logic lives in the library.

use std::path::PathBuf;

use clap::Parser;
use routerlab_app::{config, EngineOptions};
use routerlab_core::prelude::*;

/// routerlab - terminal control panel for a router discovery and comparison host
#[derive(Parser, Debug)]
#[command(name = "routerlab")]
#[command(about = "Scan a network, then start, stop and save router comparisons", long_about = None)]
struct Args {
    /// Directory holding .routerlab/config.toml (defaults to the current directory)
    #[arg(value_name = "PATH")]
    path: Option<PathBuf>,

    /// Host bridge URL, e.g. ws://localhost:8080/eel (overrides config and ROUTERLAB_HOST)
    #[arg(long, value_name = "URL")]
    host: Option<String>,

    /// Read settings from this file instead of .routerlab/config.toml
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Run in headless mode (NDJSON events on stdout, commands on stdin)
    #[arg(long)]
    headless: bool,

    /// Write a commented default config to .routerlab/config.toml and exit
    #[arg(long)]
    init: bool,
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let args = Args::parse();

    let project_path = args
        .path
        .unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")));

    if args.init {
        config::init_config_dir(&project_path).context("Failed to write default config")?;
        eprintln!(
            "Wrote {}",
            config::project_config_path(&project_path).display()
        );
        return Ok(());
    }

    // Log to file, since the TUI and headless mode both own stdout
    routerlab_core::logging::init()?;
    info!("Config directory: {}", project_path.display());

    let options = EngineOptions {
        project_path,
        config_path: args.config,
        host_override: args.host,
    };

    if args.headless {
        routerlab::run_headless(options).await?;
    } else {
        routerlab::run_tui(options).await?;
    }
    Ok(())
}
