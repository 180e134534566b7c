use std::path::{Path, PathBuf};

use anyhow::Context;
use colored::Colorize;
use jsondb_store::{RecordStore, StoreConfig};

use crate::cli::*;
use crate::seed;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let config = load_config(cli.root, cli.config.as_deref())?;
    let store = RecordStore::open_with(config)?;

    match cli.command {
        Command::Init => cmd_init(&store),
        Command::Write(args) => cmd_write(&store, args),
        Command::Read(args) => cmd_read(&store, args),
        Command::ReadAll(args) => cmd_read_all(&store, args),
        Command::Delete(args) => cmd_delete(&store, args),
        Command::Seed => cmd_seed(&store),
    }
}

/// Settings from `config_path` (if any), with `root` taking precedence.
fn load_config(root: Option<PathBuf>, config_path: Option<&Path>) -> anyhow::Result<StoreConfig> {
    let mut config = match config_path {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            toml::from_str(&text).with_context(|| format!("parsing config {}", path.display()))?
        }
        None => StoreConfig::default(),
    };
    if let Some(root) = root {
        config.root = root;
    }
    Ok(config)
}

fn cmd_init(store: &RecordStore) -> anyhow::Result<()> {
    println!("{} Database ready at {}", "✓".green().bold(), store.root().display().to_string().bold());
    Ok(())
}

fn cmd_write(store: &RecordStore, args: WriteArgs) -> anyhow::Result<()> {
    let value: serde_json::Value = serde_json::from_str(&args.json).context("document body is not valid JSON")?;
    store.write(&args.collection, &args.resource, &value)?;
    println!("{} Wrote {}/{}", "✓".green(), args.collection.yellow(), args.resource.bold());
    Ok(())
}

fn cmd_read(store: &RecordStore, args: ReadArgs) -> anyhow::Result<()> {
    let value: serde_json::Value = store.read(&args.collection, &args.resource)?;
    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}

fn cmd_read_all(store: &RecordStore, args: ReadAllArgs) -> anyhow::Result<()> {
    let records = store.read_all(&args.collection)?;
    for record in &records {
        print!("{record}");
    }
    println!("{} {} record(s) in {}", "✓".green(), records.len().to_string().bold(), args.collection.yellow());
    Ok(())
}

fn cmd_delete(store: &RecordStore, args: DeleteArgs) -> anyhow::Result<()> {
    let resource = args.resource.unwrap_or_default();
    store.delete(&args.collection, &resource)?;
    if resource.is_empty() {
        println!("{} Deleted collection {}", "✓".green(), args.collection.yellow());
    } else {
        println!("{} Deleted {}/{}", "✓".green(), args.collection.yellow(), resource.bold());
    }
    Ok(())
}

fn cmd_seed(store: &RecordStore) -> anyhow::Result<()> {
    for user in seed::users() {
        store.write(seed::COLLECTION, &user.name, &user)?;
    }

    let users: Vec<seed::User> = store.read_all_as(seed::COLLECTION)?;
    for user in &users {
        println!("  {} ({}) {}, {}", user.name.bold(), user.age, user.address.city, user.address.country);
    }
    println!("{} Seeded {} users", "✓".green().bold(), users.len());
    Ok(())
}
