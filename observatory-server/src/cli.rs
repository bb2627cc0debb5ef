use std::path::PathBuf;

use anyhow::Result;
use argh::FromArgs;
use tokio::runtime::Runtime;

use crate::config::Config;
use crate::{healthcheck, observability, web};

/// Observability demo webserver.
#[derive(Debug, FromArgs)]
struct Args {
    /// path to the YAML configuration file
    #[argh(option, short = 'c')]
    config: Option<PathBuf>,

    #[argh(subcommand)]
    command: Command,
}

#[derive(Debug, FromArgs)]
#[argh(subcommand)]
enum Command {
    Run(RunCommand),
    Healthcheck(HealthcheckCommand),
    Version(VersionCommand),
}

/// serve the demo endpoints until a termination signal arrives
#[derive(Debug, FromArgs)]
#[argh(subcommand, name = "run")]
struct RunCommand {}

/// exit successfully if the server on the configured address answers `/health`
#[derive(Debug, FromArgs)]
#[argh(subcommand, name = "healthcheck")]
struct HealthcheckCommand {}

/// print the version and exit
#[derive(Debug, FromArgs)]
#[argh(subcommand, name = "version")]
struct VersionCommand {}

/// Parses the command line and runs the selected command.
pub fn execute() -> Result<()> {
    let args: Args = argh::from_env();

    let run_server = match args.command {
        Command::Version(VersionCommand {}) => {
            println!("{}", env!("CARGO_PKG_VERSION"));
            return Ok(());
        }
        Command::Run(RunCommand {}) => true,
        Command::Healthcheck(HealthcheckCommand {}) => false,
    };

    let config = Config::load(args.config.as_deref())?;

    // The Sentry client must exist before any runtime thread is spawned.
    let _sentry = observability::init_sentry(&config);
    let runtime = build_runtime(&config)?;
    let _entered = runtime.enter();

    observability::init_tracing(&config);
    tracing::debug!(?config);

    if run_server {
        runtime.block_on(web::server(config))
    } else {
        runtime.block_on(healthcheck::healthcheck(config))
    }
}

fn build_runtime(config: &Config) -> Result<Runtime> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .thread_name("observatory-rt")
        .worker_threads(config.runtime.worker_threads)
        .enable_all()
        .build()?;
    Ok(runtime)
}
