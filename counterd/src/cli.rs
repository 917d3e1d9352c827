use std::path::PathBuf;
use structopt::StructOpt;

#[derive(StructOpt, Debug)]
#[structopt(name = "counterd", about = "Serves the counter api over HTTP")]
pub struct Options {
    /// Path to configuration file
    #[structopt(short = "c", long = "config", parse(from_os_str))]
    pub config_file: Option<PathBuf>,

    #[structopt(subcommand)]
    pub cmd: Option<Command>,
}

#[derive(StructOpt, Debug, Clone, Copy, PartialEq)]
pub enum Command {
    /// Dump the current configuration
    DumpConfig,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_config_and_subcommand() {
        let options =
            Options::from_iter_safe(&["counterd", "--config", "/tmp/c.toml", "dump-config"]).unwrap();

        assert_eq!(options.config_file, Some(PathBuf::from("/tmp/c.toml")));
        assert_eq!(options.cmd, Some(Command::DumpConfig));
    }

    #[test]
    fn runs_server_without_subcommand() {
        let options = Options::from_iter_safe(&["counterd"]).unwrap();

        assert_eq!(options.cmd, None);
    }
}
