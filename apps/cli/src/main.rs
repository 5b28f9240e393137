use clap::Parser;
use hdac_cli::Cli;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();

    match hdac_cli::run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            hdac_cli::report(&err);
            hdac_cli::exit_code(&err)
        },
    }
}
