// src/main.rs

mod auth;
mod cli;
mod commands;
mod config;
mod dates;
mod db;
mod error;
mod export;
mod filter;
mod import;
mod ledger;
mod models;
mod roster;
mod server;


use clap::Parser;
use crate::cli::{Cli, Commands};
use crate::config::Config;
use crate::error::Result;
use crate::models::NewEntry;
use tracing_subscriber::EnvFilter;

/// Priority: RUST_LOG > --debug > configured level. Logs go to stderr.
fn init_logging(debug_flag: bool, config_level: &str) {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if debug_flag {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new(config_level)
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let mut cfg = Config::from_env()?;
    if let Some(kind) = cli.store {
        cfg.store = kind;
    }
    if let Some(path) = cli.data {
        cfg.data_path = Some(path);
    }

    init_logging(cli.debug, &cfg.log_level);

    let data_path = cfg.resolve_data_path()?;
    tracing::debug!(store = ?cfg.store, path = %data_path.display(), "configuration loaded");

    if let Commands::Init = cli.command {
        return commands::handle_init(cfg.store, &data_path);
    }
    if let Commands::Operators = cli.command {
        return commands::handle_operators(&cfg);
    }

    let ledger = commands::open_ledger(cfg.store, &data_path)?;
    match cli.command {
        Commands::Add {
            operator,
            machine,
            line,
            hours,
            date,
            description,
        } => commands::handle_add(
            &ledger,
            NewEntry {
                operator,
                machine,
                line,
                hours: Some(hours),
                date: date.unwrap_or_else(commands::today),
                description,
            },
        ),
        Commands::Search { filter, json } => {
            commands::handle_search(&ledger, &filter.into(), json)
        }
        Commands::Del { id } => commands::handle_del(&ledger, id),
        Commands::DelFiltered { filter, yes } => {
            commands::handle_del_filtered(&ledger, &filter.into(), yes)
        }
        Commands::DelAll { yes } => commands::handle_del_all(&ledger, yes),
        Commands::Export {
            filter,
            format,
            out,
        } => commands::handle_export(&ledger, &filter.into(), format, out),
        Commands::Import { file } => commands::handle_import(&ledger, &file),
        Commands::Serve => commands::handle_serve(&cfg, ledger),
        Commands::Init | Commands::Operators => Ok(()),
    }
}

fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
