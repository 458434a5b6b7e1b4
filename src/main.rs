mod cli;
mod config;
mod error;
mod logging;
mod model;
mod providers;
mod sheet;
mod sync;

use clap::Parser;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // .env must be in place before arguments and credentials are read.
    let env_file = dotenvy::dotenv();
    let cli = cli::Cli::parse();

    if let Err(error) = cli::run(cli, env_file).await {
        tracing::error!("Run aborted: {error:#}");
        eprintln!("error: {error:#}");
        std::process::exit(1);
    }
}
