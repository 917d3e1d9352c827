#![warn(unused_extern_crates, missing_debug_implementations, rust_2018_idioms)]
#![forbid(unsafe_code)]

mod cli;
mod command;
mod config;
mod trace;

use crate::{
    cli::{Command, Options},
    config::{default_config_path, read_config, File, Settings},
};
use anyhow::Context;
use counter::Client;
use structopt::StructOpt;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let options = Options::from_args();

    let file = read_config(&options.config_file, default_config_path)?;
    let settings = Settings::from_config_file_and_defaults(file, options.base_url)
        .context("could not initialize configuration")?;

    trace::init_tracing(settings.log_level).context("failed to initialize tracing")?;

    let mut out = std::io::stdout();
    let client = || {
        Client::with_timeout(settings.base_url.clone(), settings.timeout)
            .context("failed to create counter api client")
    };

    match options.cmd {
        Command::Get { key } => command::get(&client()?, &key, &mut out).await,
        Command::Put { key, value } => command::put(&client()?, &key, value, &mut out).await,
        Command::Demo { key } => command::demo(&client()?, &key, &mut out).await,
        Command::Openapi => command::openapi(&mut out),
        Command::DumpConfig => dump_config(settings.clone()),
    }
}

#[allow(clippy::print_stdout)]
fn dump_config(settings: Settings) -> anyhow::Result<()> {
    let file = File::from(settings);
    let serialized = toml::to_string(&file)?;
    println!("{}", serialized);
    Ok(())
}
