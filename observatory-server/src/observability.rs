use std::env;
use std::io::IsTerminal;

use secrecy::ExposeSecret;
use sentry::integrations::tracing as sentry_tracing;
use tracing::Level;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{EnvFilter, Layer, prelude::*};

use crate::config::{Config, LogFormat};

/// Initializes the Sentry client if a DSN is configured.
///
/// The returned guard flushes pending events when dropped and must be kept alive for the
/// lifetime of the process.
pub fn init_sentry(config: &Config) -> Option<sentry::ClientInitGuard> {
    let sentry_config = &config.sentry;
    let dsn = sentry_config.dsn.as_ref()?;

    Some(sentry::init(sentry::ClientOptions {
        dsn: dsn.expose_secret().as_str().parse().ok(),
        environment: sentry_config.environment.clone(),
        server_name: sentry_config.server_name.clone(),
        sample_rate: sentry_config.sample_rate,
        traces_sample_rate: sentry_config.traces_sample_rate,
        debug: sentry_config.debug,
        release: sentry::release_name!(),
        ..Default::default()
    }))
}

/// Installs the global tracing subscriber.
///
/// Log lines are written to stderr in the configured [`LogFormat`]. When Sentry is enabled,
/// warnings and errors are additionally reported as events.
pub fn init_tracing(config: &Config) {
    // Same as the default filter, except it converts warnings into events
    // and also records everything at INFO as breadcrumbs.
    let sentry_layer = config.sentry.is_enabled().then(|| {
        sentry_tracing::layer().event_filter(|metadata| match *metadata.level() {
            Level::ERROR | Level::WARN => sentry_tracing::EventFilter::Event,
            Level::INFO => sentry_tracing::EventFilter::Breadcrumb,
            Level::DEBUG | Level::TRACE => sentry_tracing::EventFilter::Ignore,
        })
    });

    let (level, env_filter) = parse_rust_log(config.logging.level);

    let format = match config.logging.format {
        LogFormat::Auto if std::io::stderr().is_terminal() => LogFormat::Pretty,
        LogFormat::Auto => LogFormat::Simplified,
        format => format,
    };

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true);
    let fmt_layer = match format {
        LogFormat::Json => fmt_layer.json().flatten_event(true).boxed(),
        LogFormat::Simplified => fmt_layer.compact().with_ansi(false).boxed(),
        LogFormat::Pretty | LogFormat::Auto => fmt_layer.with_ansi(true).boxed(),
    };

    tracing_subscriber::registry()
        .with(fmt_layer.with_filter(level))
        .with(sentry_layer)
        .with(env_filter)
        .init();
}

/// Resolves the effective log level and the per-module filter.
///
/// `RUST_LOG` takes precedence over the configured level. If it contains a plain level, that level
/// is applied to the default filter. Otherwise, it is used literally if the user knows which
/// overrides they want to run.
pub fn parse_rust_log(configured: LevelFilter) -> (LevelFilter, EnvFilter) {
    let level = match env::var(EnvFilter::DEFAULT_ENV) {
        Ok(value) => match value.parse::<LevelFilter>() {
            Ok(level) => level,
            Err(_) => return (LevelFilter::TRACE, EnvFilter::new(value)),
        },
        Err(_) => configured,
    };

    // This is the maximum verbosity that will be logged, we filter this down to `level`.
    let env_filter = EnvFilter::new(
        "INFO,\
        tower_http=TRACE,\
        observatory=TRACE,\
        observatory_server=TRACE,\
        ",
    );

    (level, env_filter)
}
