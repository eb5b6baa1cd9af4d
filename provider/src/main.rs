use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use simpleauth_provider::{admin, PlayerRecordStore, StoreConfig};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "simpleauth-admin")]
#[command(about = "Inspect and edit SimpleAuth player registrations")]
struct Args {
    /// Directory holding players.db (overrides SIMPLEAUTH_DATA_DIR)
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Schema script for a fresh database (overrides SIMPLEAUTH_SCHEMA_PATH)
    #[arg(long)]
    schema: Option<PathBuf>,

    #[command(subcommand)]
    command: admin::AdminCommand,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let args = Args::parse();

    let mut config = StoreConfig::from_env();
    if let Some(data_dir) = args.data_dir {
        config.data_dir = data_dir;
    }
    if let Some(schema) = args.schema {
        config.schema_path = Some(schema);
    }
    info!(data_dir = %config.data_dir.display(), "opening player store");

    let store = PlayerRecordStore::open(&config)
        .await
        .context("opening player store")?;

    let result = admin::run(&store, args.command).await;
    store.close().await.context("closing player store")?;

    println!("{}", result.context("running command")?);
    Ok(())
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into());
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
}
