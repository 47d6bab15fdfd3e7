//! Strukt command line
//!
//! Inspects structure entries against schema files without a live API.
//!
//! Usage:
//!   strukt --schema-dir schemas schema 10
//!   strukt --schema-dir schemas decode entries.json
//!   strukt prepare --structure 10 entries.json

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use strukt_cli::{build_engine, decode_records, describe_schema, prepare_records, read_records};
use strukt_engine::EngineConfig;
use strukt_types::StructureId;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "strukt")]
#[command(about = "Inspect structure entries against schema files")]
struct Args {
    /// Path to the engine config file
    #[arg(short, long, default_value = "strukt.toml")]
    config: PathBuf,

    /// Directory of `{id}.json` structure files
    #[arg(short, long)]
    schema_dir: Option<PathBuf>,

    /// Enable verbose debug logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print a structure's fields and casts
    Schema {
        id: u64,
    },
    /// Decode entries into their visible projection
    Decode {
        file: PathBuf,
        /// Structure of entries without a directory_id
        #[arg(long)]
        structure: Option<u64>,
    },
    /// Prepare entries for a bulk import
    Prepare {
        file: PathBuf,
        #[arg(long)]
        structure: u64,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();
    let log_level = if args.verbose { Level::DEBUG } else { Level::INFO };
    FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();

    let output = match args.command {
        Command::Schema { id } => {
            let engine = build_engine(EngineConfig::load_from(&args.config), args.schema_dir)?;
            describe_schema(&engine, StructureId::new(id))?
        }
        Command::Decode { file, structure } => {
            let engine = build_engine(EngineConfig::load_from(&args.config), args.schema_dir)?;
            let records = read_records(&file)?;
            decode_records(&engine, records, structure.map(StructureId::new))
        }
        Command::Prepare { file, structure } => {
            let records = read_records(&file)?;
            prepare_records(&records, StructureId::new(structure))
        }
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
