use clap::Parser;
use vmgr_cli::{cli::Cli, logging};

#[tokio::main]
async fn main() -> std::process::ExitCode {
    let cli = Cli::parse();

    if let Err(e) = logging::init_logging(cli.global.verbose) {
        eprintln!("failed to initialize logging: {e}");
    }

    match vmgr_cli::run(cli).await {
        Ok(()) => std::process::ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            std::process::ExitCode::FAILURE
        }
    }
}
