//! CaskKV CLI
//!
//! Runs a single command against a local data directory.

use std::path::PathBuf;
use std::process;

use caskkv::config::DEFAULT_MAX_FILE_SIZE;
use caskkv::{CaskError, Config, DiskStore};
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

/// CaskKV CLI
#[derive(Parser, Debug)]
#[command(name = "caskkv-cli")]
#[command(about = "CLI for the CaskKV storage engine")]
#[command(version)]
struct Args {
    /// Data directory
    #[arg(short, long, default_value = "./caskkv_data")]
    data_dir: PathBuf,

    /// Rotate the active data file past this many bytes
    #[arg(short = 'm', long, default_value_t = DEFAULT_MAX_FILE_SIZE)]
    max_file_size: u64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Get a value by key
    Get {
        /// The key to get
        key: String,
    },

    /// Set a key-value pair
    Set {
        /// The key to set
        key: String,

        /// The value to set
        value: String,
    },

    /// Delete a key
    Del {
        /// The key to delete
        key: String,
    },

    /// List all live keys
    Keys,
}

fn main() {
    // Logs go to stderr so command output stays clean on stdout
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,caskkv=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config = Config::builder()
        .data_dir(&args.data_dir)
        .max_file_size(args.max_file_size)
        .build();

    let store = match DiskStore::open(config) {
        Ok(store) => store,
        Err(e) => {
            tracing::error!("Failed to open store: {}", e);
            process::exit(1);
        }
    };

    let code = match run(&store, args.command) {
        Ok(()) => 0,
        Err(CaskError::KeyNotFound) => {
            eprintln!("(not found)");
            2
        }
        Err(e) => {
            tracing::error!("Command failed: {}", e);
            1
        }
    };

    if let Err(e) = store.close() {
        tracing::error!("Failed to close store: {}", e);
        process::exit(1);
    }

    process::exit(code);
}

fn run(store: &DiskStore, command: Commands) -> caskkv::Result<()> {
    match command {
        Commands::Get { key } => {
            let value = store.get(key.as_bytes())?;
            println!("{}", String::from_utf8_lossy(&value));
        }
        Commands::Set { key, value } => {
            store.set(key.as_bytes(), value.as_bytes())?;
            println!("OK");
        }
        Commands::Del { key } => {
            store.delete(key.as_bytes())?;
            println!("OK");
        }
        Commands::Keys => {
            for key in store.list_keys() {
                println!("{}", String::from_utf8_lossy(&key));
            }
        }
    }
    Ok(())
}
