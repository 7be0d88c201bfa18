use clap::Parser;
use std::process::ExitCode;

use search_mcp_gateway::{cli::Cli, infra};

#[tokio::main]
async fn main() -> ExitCode {
    // A missing .env is fine; real env vars still apply.
    let _ = dotenvy::dotenv();
    infra::logging::init();

    let cli = Cli::parse();
    match infra::boot::run_server(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}
