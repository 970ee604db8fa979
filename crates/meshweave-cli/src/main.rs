//! Meshweave CLI
//!
//! Command-line surface over the mesh framework:
//! - importing mesh-object-set XML documents into mesh bases
//! - exporting snapshots back to XML
//! - inspecting snapshots and the registered model
//! - parse-only validation of documents

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod app;
mod export;
mod import;
mod model_info;
mod show;
mod validate;

#[derive(Parser)]
#[command(name = "meshweave")]
#[command(author, version, about = "Meshweave: semantic mesh toolkit")]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace); RUST_LOG overrides.
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the probe over an XML document and report the resulting mesh.
    Import {
        /// Input mesh-object-set XML document
        input: PathBuf,
        /// Data-source URL (defaults to a file:// URL for the input)
        #[arg(long)]
        data_source: Option<String>,
        /// Also write a binary snapshot of the imported base
        #[arg(long)]
        snapshot: Option<PathBuf>,
        /// Print the externalized objects as JSON instead of a summary
        #[arg(long)]
        json: bool,
    },
    /// Export a snapshot back to mesh-object-set XML.
    Export {
        snapshot: PathBuf,
        /// Output file (defaults to stdout)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// List the objects in a snapshot.
    Show {
        snapshot: PathBuf,
        /// Only objects blessed with this entity type
        #[arg(long = "type")]
        entity_type: Option<String>,
    },
    /// List registered subject areas and their types.
    Model {
        /// Dump one subject area in full
        #[arg(long)]
        subject_area: Option<String>,
    },
    /// Parse documents without building a mesh base; non-zero exit on error.
    Validate {
        /// XML files, or directories to scan for `.xml`
        paths: Vec<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    app::init_tracing(cli.verbose);

    match cli.command {
        Commands::Import {
            input,
            data_source,
            snapshot,
            json,
        } => import::run(&input, data_source.as_deref(), snapshot.as_deref(), json),
        Commands::Export { snapshot, out } => export::run(&snapshot, out.as_deref()),
        Commands::Show {
            snapshot,
            entity_type,
        } => show::run(&snapshot, entity_type.as_deref()),
        Commands::Model { subject_area } => model_info::run(subject_area.as_deref()),
        Commands::Validate { paths } => validate::run(&paths),
    }
}
