// SPDX-FileCopyrightText: 2026 Shopclerk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shopclerk - E-commerce customer support service.
//!
//! This is the binary entry point for the Shopclerk server.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

use clap::{Parser, Subcommand};

mod serve;

/// Shopclerk - E-commerce customer support service.
#[derive(Parser, Debug)]
#[command(name = "shopclerk", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the Shopclerk HTTP server.
    Serve,
    /// Print the effective configuration.
    Config,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match shopclerk_config::load_and_validate() {
        Ok(config) => config,
        Err(errors) => {
            shopclerk_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    match cli.command {
        Some(Commands::Serve) => {
            if let Err(e) = serve::run_serve(config).await {
                eprintln!("error: {e}");
                std::process::exit(1);
            }
        }
        Some(Commands::Config) => match toml::to_string_pretty(&config) {
            Ok(rendered) => print!("{rendered}"),
            Err(e) => {
                eprintln!("error: failed to render config: {e}");
                std::process::exit(1);
            }
        },
        None => {
            println!("shopclerk: use --help for available commands");
        }
    }
}
