//! pairset CLI - curate paired front/back document scans.

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod commands;
mod config;
mod output;

use commands::args::CurateArgs;
use commands::{Cli, Commands, ExitCode};
use config::AppConfig;

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let config = AppConfig::load();
    if let Err(e) = config.validate() {
        eprintln!("error: {e:#}");
        return ExitCode::Error.into();
    }

    let result = match cli.command {
        Commands::Score(mut args) => {
            args.curate = CurateArgs::with_config(args.curate, &config);
            commands::score::run(&args)
        }
        Commands::Split(mut args) => {
            args.curate = CurateArgs::with_config(args.curate, &config);
            commands::split::run(&args)
        }
        Commands::Run(mut args) => {
            args.curate = CurateArgs::with_config(args.curate, &config);
            commands::run::run(&args)
        }
    };

    let exit_code = match result {
        Ok(()) => ExitCode::Success,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::Error
        }
    };

    exit_code.into()
}
