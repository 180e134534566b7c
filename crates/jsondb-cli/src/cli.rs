use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "jsondb",
    about = "jsondb — JSON documents on disk, one file per record",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Database root directory (overrides the config file)
    #[arg(short, long, global = true)]
    pub root: Option<PathBuf>,

    /// TOML file with store settings
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Create the database directory, or attach to an existing one
    Init,
    /// Store a JSON document
    Write(WriteArgs),
    /// Print a stored document
    Read(ReadArgs),
    /// Print every document in a collection
    ReadAll(ReadAllArgs),
    /// Delete a document, or a whole collection
    Delete(DeleteArgs),
    /// Populate the sample `users` collection and read it back
    Seed,
}

#[derive(Args)]
pub struct WriteArgs {
    pub collection: String,
    pub resource: String,
    /// Document body as JSON text
    pub json: String,
}

#[derive(Args)]
pub struct ReadArgs {
    pub collection: String,
    pub resource: String,
}

#[derive(Args)]
pub struct ReadAllArgs {
    pub collection: String,
}

#[derive(Args)]
pub struct DeleteArgs {
    pub collection: String,
    /// Omit to delete the entire collection
    pub resource: Option<String>,
}
