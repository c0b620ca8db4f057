// SIGA availability scheduler
// Main entry point

use clap::Parser;

use siga_scheduler::cli::{self, Cli};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Initialize logging
    env_logger::init();

    log::info!("Starting SIGA scheduler");

    let cli = Cli::parse();
    if let Err(e) = cli::run(cli).await {
        log::error!("Command failed: {:#}", e);
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
