//! The `k` journal.
//!
//! Each run opens today's note file in `$EDITOR` under a fresh
//! `#>> Note opened at ...` header. Anything written there is prepended to
//! the day, locally or through a sync server.
//!
//! # Commands
//!
//! - `edit` - Write a new note for today (default)
//! - `show` - Print a day's notes
//! - `path` - Print the file holding a day
//! - `serve` - Run the sync server

mod commands;
mod settings;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use commands::{day_time, CliResult};
use kday_storage::DayStore;
use settings::{default_config_dir, UserSettings};
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// One note file per day, optionally mirrored to a server.
#[derive(Parser)]
#[command(name = "k")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Directory holding settings.json (default: <config dir>/k)
    #[arg(global = true, short, long)]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(global = true, short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a new note for today
    Edit {
        /// Do not contact the sync server
        #[arg(long)]
        offline: bool,
    },

    /// Print a day's notes
    Show {
        /// Day to show, YYYY-MM-DD (default: today)
        #[arg(short, long)]
        date: Option<NaiveDate>,

        /// List segment headers instead of the full text
        #[arg(short, long)]
        list: bool,
    },

    /// Print the file holding a day
    Path {
        /// Day to resolve, YYYY-MM-DD (default: today)
        #[arg(short, long)]
        date: Option<NaiveDate>,
    },

    /// Run the sync server
    Serve {
        /// Directory holding the server's day files
        #[arg(short, long, default_value = ".")]
        root: PathBuf,

        /// Address to listen on (default: 0.0.0.0:$PORT, or port 8080)
        #[arg(short, long)]
        bind: Option<SocketAddr>,

        /// Largest accepted upload in bytes
        #[arg(long)]
        max_body_bytes: Option<usize>,
    },

    /// Show version information
    Version,
}

fn main() -> CliResult<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let load_settings = || -> CliResult<UserSettings> {
        let dir = match &cli.config {
            Some(dir) => dir.clone(),
            None => default_config_dir()?,
        };
        Ok(UserSettings::load_or_create(&dir)?)
    };

    match cli.command.unwrap_or(Commands::Edit { offline: false }) {
        Commands::Edit { offline } => {
            commands::edit::run(&load_settings()?, offline)?;
        }
        Commands::Show { date, list } => {
            let store = DayStore::open(load_settings()?.storage_config())?;
            let time = day_time(date)?;
            commands::show::run(&store, &time, list, &mut std::io::stdout().lock())?;
        }
        Commands::Path { date } => {
            let store = DayStore::open(load_settings()?.storage_config())?;
            let path = commands::path::run(&store, &day_time(date)?)?;
            println!("{}", path.display());
        }
        Commands::Serve {
            root,
            bind,
            max_body_bytes,
        } => {
            commands::serve::run(&root, bind, max_body_bytes)?;
        }
        Commands::Version => {
            println!("k v{}", env!("CARGO_PKG_VERSION"));
            println!("header format: {} at <h:mm am|pm> on <host>", kday_codec::HEADER_INDICATOR);
        }
    }

    Ok(())
}
