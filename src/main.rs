//! Risi CLI - Command-line interface for the rice inventory

use clap::{Parser, Subcommand};
use risi::config::{self, RisiConfig};
use risi::storage::RiceStore;
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod commands;

#[derive(Parser)]
#[command(name = "risi")]
#[command(version)]
#[command(about = "Rice inventory - record rice products in a local SQLite store")]
#[command(long_about = r#"
Risi keeps a catalogue of rice products: name, breed, packaging and price.

Example usage:
  risi add --name "Conad Integrale" --breed "Parboiled Integrale" --packaging vacuum_carton --price 240
  risi list --filter "price < ?" --arg 300 --sort "price DESC"
  risi edit 1 --price 260
  risi serve --port 8080
"#)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit machine-readable JSON instead of human output
    #[arg(long, global = true)]
    json: bool,

    /// Path to the database file (overrides risi.toml)
    #[arg(short, long, global = true)]
    database: Option<PathBuf>,

    /// Path to the config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write risi.toml and create the database
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },

    /// List rices
    List {
        /// Filter clause, e.g. "price < ?"
        #[arg(short, long)]
        filter: Option<String>,

        /// Positional argument for the filter (repeatable)
        #[arg(short, long = "arg", allow_hyphen_values = true)]
        args: Vec<String>,

        /// Sort order, e.g. "price DESC"
        #[arg(short, long)]
        sort: Option<String>,

        /// Comma-separated columns to show
        #[arg(long, value_delimiter = ',')]
        columns: Vec<String>,
    },

    /// Show one rice
    Show {
        id: i64,
    },

    /// Add a rice
    Add {
        #[arg(short, long)]
        name: String,

        #[arg(short, long)]
        breed: Option<String>,

        /// vacuum, carton, vacuum_carton, bag (or code 0-3)
        #[arg(short, long)]
        packaging: String,

        /// Price in cents
        #[arg(long, allow_hyphen_values = true)]
        price: Option<String>,
    },

    /// Edit fields of a rice
    Edit {
        id: i64,

        #[arg(short, long)]
        name: Option<String>,

        #[arg(short, long)]
        breed: Option<String>,

        #[arg(short, long)]
        packaging: Option<String>,

        /// Price in cents
        #[arg(long, allow_hyphen_values = true)]
        price: Option<String>,
    },

    /// Delete one rice
    Delete {
        id: i64,
    },

    /// Delete every rice, or those matching a filter
    DeleteAll {
        #[arg(short, long)]
        filter: Option<String>,

        #[arg(short, long = "arg", allow_hyphen_values = true)]
        args: Vec<String>,
    },

    /// Insert a sample rice
    Seed,

    /// Print the MIME marker of an address
    Type {
        /// e.g. "rices" or "rices/3"
        address: String,
    },

    /// Show statistics about the inventory
    Stats,

    /// Serve the JSON API
    Serve {
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Show version information
    Version,
}

/// How command results are printed
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputMode {
    Human,
    Json,
}

impl OutputMode {
    pub fn is_human(&self) -> bool {
        matches!(self, OutputMode::Human)
    }
}

/// Print a JSON success envelope
pub fn emit_success(
    output_mode: OutputMode,
    command: &str,
    data: serde_json::Value,
) -> anyhow::Result<()> {
    debug_assert!(!output_mode.is_human());
    let envelope = serde_json::json!({
        "ok": true,
        "command": command,
        "data": data,
    });
    println!("{}", serde_json::to_string_pretty(&envelope)?);
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("info")
        }
    });

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let output_mode = if cli.json { OutputMode::Json } else { OutputMode::Human };
    let config_path = cli.config.clone().unwrap_or_else(config::default_config_path);
    let settings = config::load_config(Some(&config_path))?.unwrap_or_default();
    let database = settings.database_path(cli.database.as_deref());

    let open_store = || -> anyhow::Result<RiceStore> {
        config::ensure_db_dir(&database)?;
        Ok(RiceStore::open(&database)?)
    };

    match cli.command {
        Commands::Init { force } => {
            let written = RisiConfig {
                database: Some(database.to_string_lossy().to_string()),
                ..settings
            };
            commands::run_init(output_mode, &config_path, &written, force, open_store()?)?;
        }

        Commands::List { filter, args, sort, columns } => {
            let store = open_store()?;
            commands::run_list(output_mode, &store, filter, args, sort.as_deref(), &columns)?;
        }

        Commands::Show { id } => {
            commands::run_show(output_mode, &open_store()?, id)?;
        }

        Commands::Add { name, breed, packaging, price } => {
            let fields = commands::fields_from_args(Some(name), breed, Some(packaging), price);
            commands::run_add(output_mode, &open_store()?, &fields)?;
        }

        Commands::Edit { id, name, breed, packaging, price } => {
            let fields = commands::fields_from_args(name, breed, packaging, price);
            commands::run_edit(output_mode, &open_store()?, id, &fields)?;
        }

        Commands::Delete { id } => {
            commands::run_delete(output_mode, &open_store()?, id)?;
        }

        Commands::DeleteAll { filter, args } => {
            commands::run_delete_all(output_mode, &open_store()?, filter, args)?;
        }

        Commands::Seed => {
            commands::run_seed(output_mode, &open_store()?)?;
        }

        Commands::Type { address } => {
            commands::run_type(output_mode, &address)?;
        }

        Commands::Stats => {
            commands::run_stats(output_mode, &open_store()?, &database)?;
        }

        Commands::Serve { port } => {
            let port = settings.port(port);
            let store = open_store()?;
            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(risi::server::start_server(port, store))?;
        }

        Commands::Version => {
            commands::run_version(output_mode)?;
        }
    }

    Ok(())
}
