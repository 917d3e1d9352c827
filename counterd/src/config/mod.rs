pub mod file;
pub mod settings;

pub use self::{
    file::File,
    settings::{Database, HttpApi, Logging, Settings},
};

use anyhow::{anyhow, Context};
use std::path::PathBuf;

/// Reads the config file given on the command line, else the one at the
/// default path if it exists, else falls back to an empty file.
pub fn read_config<T>(config_file: &Option<PathBuf>, default_config_path: T) -> anyhow::Result<File>
where
    T: FnOnce() -> anyhow::Result<PathBuf>,
{
    let path = match config_file {
        Some(path) => {
            eprintln!("Using config file {}", path.display());
            Some(path.clone())
        }
        None => default_config_path()
            .and_then(|default_path| {
                if default_path.exists() {
                    eprintln!(
                        "Using config file at default path: {}",
                        default_path.display()
                    );
                    Ok(default_path)
                } else {
                    Err(anyhow!("no config file at {}", default_path.display()))
                }
            })
            .ok(),
    };

    match path {
        Some(path) => File::read(&path)
            .with_context(|| format!("failed to read config file {}", path.display())),
        None => Ok(File::default()),
    }
}
