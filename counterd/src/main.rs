#![warn(unused_extern_crates, missing_debug_implementations, rust_2018_idioms)]
#![forbid(unsafe_code)]

mod cli;

use anyhow::Context;
use cli::{Command, Options};
use counterd::{
    config::{read_config, File, Settings},
    default_config_path,
    storage::Sqlite,
    trace,
};
use std::sync::Arc;
use structopt::StructOpt;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let options = Options::from_args();

    let file = read_config(&options.config_file, default_config_path)?;
    let settings = Settings::from_config_file_and_defaults(file)?;

    if let Some(Command::DumpConfig) = options.cmd {
        return dump_config(settings);
    }

    trace::init_tracing(settings.logging.level).context("failed to initialize tracing")?;

    let storage = Arc::new(Sqlite::new(&settings.database.file)?);
    let (addr, server) = counterd::serve(settings.http_api.socket, storage, shutdown_signal())?;

    tracing::info!("Starting HTTP server on {}", addr);
    server.await;
    tracing::info!("HTTP server stopped");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for ctrl-c, shutting down: {}", e);
    }
}

#[allow(clippy::print_stdout)]
fn dump_config(settings: Settings) -> anyhow::Result<()> {
    let file = File::from(settings);
    let serialized = toml::to_string(&file)?;
    println!("{}", serialized);
    Ok(())
}
