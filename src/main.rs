use clap::Parser;
use site_builder::capabilities::Capabilities;
use site_builder::config::BuildArgs;
use site_builder::{logging, output, pipeline};
use std::process::ExitCode;

fn main() -> ExitCode {
    let config = BuildArgs::parse().into_config();
    let dispatch = logging::dispatch(config.verbose);

    tracing::dispatcher::with_default(&dispatch, || {
        let caps = Capabilities::probe();
        match pipeline::run(&config, &caps) {
            Ok(report) => {
                output::log_report(&report);
                ExitCode::SUCCESS
            }
            Err(err) => {
                output::log_failure(&err, config.verbose);
                ExitCode::FAILURE
            }
        }
    })
}
