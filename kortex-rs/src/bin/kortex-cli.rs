use clap::Parser;
use env_logger::Builder;
use kortex_rs::application::{run, Cli};
use log::{error, LevelFilter};
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();

    if std::env::var("RUST_LOG").is_ok() {
        env_logger::init();
    } else {
        let mut verbosity_level = LevelFilter::Info;
        if cli.verbose {
            verbosity_level = LevelFilter::Debug
        };
        if cli.trace {
            verbosity_level = LevelFilter::Trace
        };

        let mut builder = Builder::new();
        builder
            .filter_module("kortex_rs", verbosity_level)
            .filter_module("kortex_message", verbosity_level)
            .filter_module("kortex_cli", verbosity_level)
            .format_target(false)
            .init();
    }

    let stdout = std::io::stdout();
    let mut output = stdout.lock();
    let Err(error) = run(cli, &mut output) else {
        return ExitCode::SUCCESS;
    };
    error!("{error}");
    ExitCode::FAILURE
}
