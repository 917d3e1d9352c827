use atty::{self, Stream};
use log::LevelFilter;
use tracing::{info, subscriber, Level};
use tracing_log::LogTracer;
use tracing_subscriber::FmtSubscriber;

pub fn init_tracing(level: LevelFilter) -> anyhow::Result<()> {
    if level == LevelFilter::Off {
        return Ok(());
    }

    // upstream crates (warp, hyper) log through `log`
    LogTracer::init_with_filter(level)?;

    let is_terminal = atty::is(Stream::Stderr);
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level_from_level_filter(level))
        .with_writer(std::io::stderr)
        .with_ansi(is_terminal)
        .finish();

    subscriber::set_global_default(subscriber)?;
    info!("Initialized tracing with level: {}", level);

    Ok(())
}

fn level_from_level_filter(level: LevelFilter) -> Level {
    match level {
        LevelFilter::Off => unreachable!("caller returns early for Off"),
        LevelFilter::Error => Level::ERROR,
        LevelFilter::Warn => Level::WARN,
        LevelFilter::Info => Level::INFO,
        LevelFilter::Debug => Level::DEBUG,
        LevelFilter::Trace => Level::TRACE,
    }
}
