use std::path::PathBuf;
use structopt::StructOpt;
use url::Url;

#[derive(StructOpt, Debug)]
#[structopt(name = "counter-cli", about = "Reads and writes counters of a counter api server")]
pub struct Options {
    /// Path to configuration file
    #[structopt(short = "c", long = "config", parse(from_os_str))]
    pub config_file: Option<PathBuf>,

    /// Base url of the server, overrides the configuration file
    #[structopt(short = "u", long = "base-url")]
    pub base_url: Option<Url>,

    #[structopt(subcommand)]
    pub cmd: Command,
}

#[derive(StructOpt, Debug, Clone, PartialEq)]
pub enum Command {
    /// Print the value of a counter
    Get { key: String },
    /// Overwrite the value of a counter
    Put { key: String, value: u32 },
    /// Read a counter, set it to 11 and read it again
    Demo {
        #[structopt(default_value = "bdfdc549-f507-4405-836b-7901f35a8b0f")]
        key: String,
    },
    /// Print the OpenAPI document of the counter api
    Openapi,
    /// Dump the current configuration
    DumpConfig,
}
