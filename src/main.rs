use std::process::ExitCode;

use armatext::cli::{Arguments, ExitStatus};
use clap::Parser;

/// Log filter variable, e.g. `ARMATEXT_LOG=armatext=debug`. Logging is off
/// when it is unset.
const LOG_ENV: &str = "ARMATEXT_LOG";

fn init_tracing() {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    if let Ok(filter) = EnvFilter::try_from_env(LOG_ENV) {
        tracing_subscriber::registry()
            .with(fmt::layer().with_writer(std::io::stderr).with_target(true))
            .with(filter)
            .init();
    }
}

fn main() -> ExitCode {
    init_tracing();
    let args = Arguments::parse();

    match armatext::cli::run_cli(args) {
        Ok(status) => status.into(),
        Err(err) => {
            eprintln!("Error: {:#}", err);
            ExitStatus::Error.into()
        }
    }
}
