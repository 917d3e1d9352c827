use atty::{self, Stream};
use log::LevelFilter;
use tracing::{subscriber, Level};
use tracing_log::LogTracer;
use tracing_subscriber::FmtSubscriber;

/// Logs go to stderr so they never mix with command output on stdout.
pub fn init_tracing(level: LevelFilter) -> anyhow::Result<()> {
    let level = match level {
        LevelFilter::Off => return Ok(()),
        LevelFilter::Error => Level::ERROR,
        LevelFilter::Warn => Level::WARN,
        LevelFilter::Info => Level::INFO,
        LevelFilter::Debug => Level::DEBUG,
        LevelFilter::Trace => Level::TRACE,
    };

    LogTracer::init()?;

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_ansi(atty::is(Stream::Stderr))
        .without_time()
        .finish();
    subscriber::set_global_default(subscriber)?;

    Ok(())
}
