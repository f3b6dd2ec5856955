//! Diagnostics go to stderr so they never mix with conversion output.

use tracing::level_filters::LevelFilter;
use tracing_subscriber::{
    EnvFilter, filter::Targets, fmt, prelude::__tracing_subscriber_SubscriberExt,
    util::SubscriberInitExt,
};

/// `fxconv` events at debug with `--verbose`, off otherwise. HTTP client
/// crates stay at warn so a verbose run shows rate requests, not socket
/// chatter.
fn app_targets(verbose: bool) -> Targets {
    let level = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::OFF
    };
    Targets::new()
        .with_target("fxconv", level)
        .with_target("reqwest", level.min(LevelFilter::WARN))
        .with_target("hyper_util", level.min(LevelFilter::WARN))
}

pub fn init_logging(verbose: bool) {
    let default_directive = if verbose { "debug" } else { "off" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    tracing_subscriber::registry()
        .with(fmt::layer().pretty().without_time().with_writer(std::io::stderr))
        .with(app_targets(verbose))
        .with(env_filter)
        .init();
}
