#![warn(
    unused_extern_crates,
    missing_debug_implementations,
    rust_2018_idioms,
    clippy::dbg_macro
)]
#![cfg_attr(not(test), warn(clippy::unwrap_used))]
#![forbid(unsafe_code)]

#[macro_use]
extern crate diesel;
#[macro_use]
extern crate diesel_migrations;

pub mod config;
pub mod http_api;
pub mod storage;
pub mod trace;

use crate::storage::Storage;
use anyhow::{anyhow, Context};
use directories::ProjectDirs;
use std::{future::Future, net::SocketAddr, path::PathBuf, sync::Arc};

// Linux: /home/<user>/.config/counterd/
// Windows: C:\Users\<user>\AppData\Roaming\counterd\config\
// OSX: /Users/<user>/Library/Application Support/counterd/
pub fn config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "counterd").map(|proj_dirs| proj_dirs.config_dir().to_path_buf())
}

// Linux: /home/<user>/.local/share/counterd/
// Windows: C:\Users\<user>\AppData\Roaming\counterd\data\
// OSX: /Users/<user>/Library/Application Support/counterd/
pub fn data_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "counterd").map(|proj_dirs| proj_dirs.data_dir().to_path_buf())
}

pub fn default_config_path() -> anyhow::Result<PathBuf> {
    config_dir()
        .map(|dir| dir.join("counterd.toml"))
        .ok_or_else(|| anyhow!("unable to determine default config path"))
}

/// Binds the http api to `socket` and returns the bound address together
/// with the server future, which completes once `shutdown` does.
pub fn serve<S, F>(
    socket: SocketAddr,
    storage: Arc<S>,
    shutdown: F,
) -> anyhow::Result<(SocketAddr, impl Future<Output = ()>)>
where
    S: Storage,
    F: Future<Output = ()> + Send + 'static,
{
    let routes = http_api::route_factory::create(storage);

    warp::serve(routes)
        .try_bind_with_graceful_shutdown(socket, shutdown)
        .with_context(|| format!("failed to bind http api to {}", socket))
}
