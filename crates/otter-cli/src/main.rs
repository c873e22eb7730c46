// Copyright 2026 Otter Contributors
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

use clap::{Parser, Subcommand};
use otter_cli::commands;
use otter_cli::config::Config;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "otter")]
#[command(version)]
#[command(about = "Toolkit CLI for server-rendered applications", long_about = None)]
struct Cli {
    /// Log level: error, warn, info, debug, trace
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    /// Verbose mode: log at debug level with source locations
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Migration utils
    Migrate {
        #[command(subcommand)]
        command: MigrateCommand,
    },
}

#[derive(Subcommand)]
enum MigrateCommand {
    /// Run missing migrations
    Up,
    /// Show applied and pending migrations, failing if any are pending
    Status,
    /// Generate a new migration file pair
    New {
        /// Migration description, e.g. `create users table`
        #[arg(required = true, num_args = 1..)]
        description: Vec<String>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with the specified log level
    let level = if cli.verbose { "debug" } else { cli.log_level.as_str() };
    let filter = EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_file(cli.verbose)
        .with_line_number(cli.verbose)
        .with_writer(std::io::stderr)
        .init();

    let root = std::env::current_dir()?;
    let config = Config::load(&root)?;

    match cli.command {
        Commands::Migrate { command } => match command {
            MigrateCommand::Up => commands::migrate::up(&config, &root),
            MigrateCommand::Status => commands::migrate::status(&config, &root),
            MigrateCommand::New { description } => {
                commands::migrate::new(&config, &root, &description.join(" "))
            }
        },
    }
}
