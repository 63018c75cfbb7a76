//! Inventory Tracker - Product Inventory over SQLite
//!
//! Imports product data from a CSV file into a local SQLite database at
//! startup, then runs an interactive console menu for viewing, adding and
//! backing up products.

use clap::Parser;
use inventory_tracker::{csv_io, database, menu};
use rusqlite::Connection;
use std::path::PathBuf;

/// Single-user inventory tracker over a local SQLite store
#[derive(Parser, Debug)]
#[command(name = "inventory_tracker")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the SQLite database file
    #[arg(short, long, default_value_t = default_db_path())]
    database: String,

    /// Path to the inventory CSV imported at startup
    #[arg(short, long, default_value = "inventory.csv")]
    inventory: PathBuf,

    /// Path the backup command writes to
    #[arg(long, default_value = "inventory_backup.csv")]
    backup_file: PathBuf,

    /// Import the inventory CSV and exit without entering the menu
    #[arg(long, default_value_t = false)]
    import_only: bool,
}

/// Returns the default database path: ~/.local/share/inventory_tracker/inventory.db
fn default_db_path() -> String {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("inventory_tracker")
        .join("inventory.db")
        .to_string_lossy()
        .to_string()
}

fn main() {
    // Initialize logging. Set RUST_LOG to control the log level.
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let db_path = PathBuf::from(&args.database);

    log::info!("Starting inventory tracker");
    log::info!("Database path: {}", db_path.display());

    // Ensure parent directory exists
    if let Some(parent) = db_path.parent() {
        if !parent.exists() {
            if let Err(e) = std::fs::create_dir_all(parent) {
                log::error!("Failed to create database directory: {}", e);
                std::process::exit(1);
            }
            log::info!("Created directory: {}", parent.display());
        }
    }

    let mut conn = match Connection::open(&db_path) {
        Ok(conn) => {
            log::info!("Opened database: {}", db_path.display());
            conn
        }
        Err(e) => {
            log::error!("Failed to open database: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = database::init_schema(&conn) {
        log::error!("Failed to initialize database schema: {}", e);
        std::process::exit(1);
    }

    // Startup import is best-effort: a missing inventory CSV only logs a
    // warning, unless --import-only asked for the import explicitly.
    if args.inventory.exists() {
        match csv_io::import_csv(&mut conn, &args.inventory) {
            Ok(stats) => log::info!(
                "Inventory import: {} inserted, {} updated, {} skipped",
                stats.inserted,
                stats.updated,
                stats.skipped
            ),
            Err(e) => {
                log::error!("Failed to import {}: {}", args.inventory.display(), e);
                if args.import_only {
                    std::process::exit(1);
                }
            }
        }
    } else if args.import_only {
        log::error!("Inventory CSV not found: {}", args.inventory.display());
        std::process::exit(1);
    } else {
        log::warn!(
            "Inventory CSV not found, skipping import: {}",
            args.inventory.display()
        );
    }

    if args.import_only {
        return;
    }

    if let Err(e) = menu::run_menu(&mut conn, &args.backup_file) {
        log::error!("Application error: {e}");
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
