use crate::config::file::{self, File};
use anyhow::Context;
use log::LevelFilter;
use std::{
    net::{IpAddr, Ipv4Addr, SocketAddr},
    path::{Path, PathBuf},
};

/// This structs represents the settings as they are used through out the code.
///
/// Everything that is optional in the config file has a default here.
#[derive(Clone, Debug, PartialEq)]
pub struct Settings {
    pub http_api: HttpApi,
    pub database: Database,
    pub logging: Logging,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HttpApi {
    pub socket: SocketAddr,
}

impl Default for HttpApi {
    fn default() -> Self {
        Self {
            socket: SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 8080),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Database {
    pub file: PathBuf,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Logging {
    pub level: LevelFilter,
}

impl Default for Logging {
    fn default() -> Self {
        Self {
            level: LevelFilter::Info,
        }
    }
}

impl Settings {
    pub fn from_config_file_and_defaults(config_file: File) -> anyhow::Result<Self> {
        let File {
            http_api,
            database,
            logging,
        } = config_file;

        let default_socket = HttpApi::default().socket;
        let http_api = http_api
            .map(|file::HttpApi { address, port }| HttpApi {
                socket: SocketAddr::new(
                    address.unwrap_or_else(|| default_socket.ip()),
                    port.unwrap_or_else(|| default_socket.port()),
                ),
            })
            .unwrap_or_default();

        let logging = logging
            .and_then(|logging| logging.level)
            .map(|level| Logging {
                level: level.into(),
            })
            .unwrap_or_default();

        let database = match database.and_then(|database| database.file) {
            Some(file) => Database { file },
            None => Database {
                file: crate::data_dir()
                    .map(|dir| Path::join(&dir, "counterd.sqlite"))
                    .context("unable to determine default database path")?,
            },
        };

        Ok(Self {
            http_api,
            database,
            logging,
        })
    }
}

impl From<Settings> for File {
    fn from(settings: Settings) -> Self {
        let Settings {
            http_api,
            database,
            logging,
        } = settings;

        File {
            http_api: Some(file::HttpApi {
                address: Some(http_api.socket.ip()),
                port: Some(http_api.socket.port()),
            }),
            database: Some(file::Database {
                file: Some(database.file),
            }),
            logging: Some(file::Logging {
                level: Some(logging.level.into()),
            }),
        }
    }
}
