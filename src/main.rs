use clap::Parser;
use tracing::{error, info};

use candor::app;
use candor::cli::{self, Cli, Command};
use candor::config::Config;

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();

    let args = Cli::parse();

    let config = match Config::load_or_default(args.config.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load config: {e}");
            std::process::exit(1);
        }
    };

    config.init_logging();

    match args.command.unwrap_or(Command::Serve) {
        Command::Serve => {
            info!("candor starting");
            if let Err(e) = app::run(config).await {
                error!(error = %e, "Fatal error");
                std::process::exit(1);
            }
            info!("candor stopped");
        }
        Command::Check => {
            if let Err(e) = cli::check(&config).await {
                eprintln!("check failed: {e}");
                std::process::exit(1);
            }
        }
    }
}
