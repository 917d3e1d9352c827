use anyhow::{anyhow, Context};
use config as config_rs;
use directories::ProjectDirs;
use log::LevelFilter;
use serde::{Deserialize, Serialize};
use std::{ffi::OsStr, path::Path, path::PathBuf, time::Duration};
use url::Url;

/// The configuration file as it appears on disk; every field is optional.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct File {
    pub api: Option<Api>,
    pub logging: Option<Logging>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Api {
    pub base_url: Option<Url>,
    pub timeout_secs: Option<u64>,
}

#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Logging {
    pub level: Option<Level>,
}

/// Log level as spelled in the config file, the same spelling `counterd`
/// uses.
#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq)]
pub enum Level {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LevelFilter> for Level {
    fn from(level: LevelFilter) -> Self {
        match level {
            LevelFilter::Off => Level::Off,
            LevelFilter::Error => Level::Error,
            LevelFilter::Warn => Level::Warn,
            LevelFilter::Info => Level::Info,
            LevelFilter::Debug => Level::Debug,
            LevelFilter::Trace => Level::Trace,
        }
    }
}

impl From<Level> for LevelFilter {
    fn from(level: Level) -> Self {
        match level {
            Level::Off => LevelFilter::Off,
            Level::Error => LevelFilter::Error,
            Level::Warn => LevelFilter::Warn,
            Level::Info => LevelFilter::Info,
            Level::Debug => LevelFilter::Debug,
            Level::Trace => LevelFilter::Trace,
        }
    }
}

impl File {
    pub fn read<D: AsRef<OsStr>>(config_file: D) -> Result<Self, config_rs::ConfigError> {
        let config_file = Path::new(&config_file);

        config_rs::Config::builder()
            .add_source(config_rs::File::from(config_file))
            .build()?
            .try_deserialize()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Settings {
    pub base_url: Url,
    /// `None` leaves the http stack's default, which is no timeout.
    pub timeout: Option<Duration>,
    pub log_level: LevelFilter,
}

impl Settings {
    pub fn from_config_file_and_defaults(
        file: File,
        base_url_override: Option<Url>,
    ) -> anyhow::Result<Self> {
        let File { api, logging } = file;
        let Api {
            base_url,
            timeout_secs,
        } = api.unwrap_or_default();

        let base_url = match base_url_override.or(base_url) {
            Some(base_url) => base_url,
            None => counter::schema::DEFAULT_BASE_URL
                .parse()
                .context("default base url is invalid")?,
        };

        Ok(Self {
            base_url,
            timeout: timeout_secs.map(Duration::from_secs),
            log_level: logging
                .and_then(|logging| logging.level)
                .map(LevelFilter::from)
                .unwrap_or(LevelFilter::Warn),
        })
    }
}

impl From<Settings> for File {
    fn from(settings: Settings) -> Self {
        File {
            api: Some(Api {
                base_url: Some(settings.base_url),
                timeout_secs: settings.timeout.map(|timeout| timeout.as_secs()),
            }),
            logging: Some(Logging {
                level: Some(settings.log_level.into()),
            }),
        }
    }
}

// Linux: /home/<user>/.config/counter-cli/counter-cli.toml
// OSX: /Users/<user>/Library/Application Support/counter-cli/counter-cli.toml
pub fn default_config_path() -> anyhow::Result<PathBuf> {
    ProjectDirs::from("", "", "counter-cli")
        .map(|proj_dirs| proj_dirs.config_dir().join("counter-cli.toml"))
        .ok_or_else(|| anyhow!("unable to determine default config path"))
}

pub fn read_config<T>(config_file: &Option<PathBuf>, default_config_path: T) -> anyhow::Result<File>
where
    T: FnOnce() -> anyhow::Result<PathBuf>,
{
    let path = match config_file {
        Some(path) => path.clone(),
        None => match default_config_path() {
            Ok(path) if path.exists() => path,
            _ => return Ok(File::default()),
        },
    };

    File::read(&path).with_context(|| format!("failed to read config file {}", path.display()))
}
