// SPDX-FileCopyrightText: 2026 Bazaar Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Bazaar - a second-hand marketplace backend.
//!
//! This is the binary entry point.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod serve;
mod shutdown;

use std::path::PathBuf;

use bazaar_config::{BazaarConfig, ConfigError};
use clap::{Parser, Subcommand};

/// Bazaar - a second-hand marketplace backend.
#[derive(Parser, Debug)]
#[command(name = "bazaar", version, about, long_about = None)]
struct Cli {
    /// Read configuration from this file instead of the standard locations.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the HTTP API server.
    Serve,
    /// Apply database migrations and exit.
    Migrate,
}

fn load_config(path: Option<&PathBuf>) -> Result<BazaarConfig, Vec<ConfigError>> {
    match path {
        None => bazaar_config::load_and_validate(),
        Some(path) => {
            let config = bazaar_config::load_config_from_path(path).map_err(|e| {
                vec![ConfigError::validation(format!(
                    "cannot load {}: {e}",
                    path.display()
                ))]
            })?;
            bazaar_config::validation::validate_config(&config)?;
            Ok(config)
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match load_config(cli.config.as_ref()) {
        Ok(config) => config,
        Err(errors) => {
            bazaar_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    serve::init_tracing(&config.logging.level);

    let result = match cli.command {
        Some(Commands::Serve) => serve::run_serve(config).await,
        Some(Commands::Migrate) => serve::run_migrate(&config).await,
        None => {
            println!("bazaar: use --help for available commands");
            Ok(())
        }
    };

    if let Err(e) = result {
        tracing::error!(error = %e, "bazaar exited with an error");
        eprintln!("bazaar: {e}");
        std::process::exit(1);
    }
}
