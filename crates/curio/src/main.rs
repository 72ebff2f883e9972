//! Curio CLI binary.
//!
//! This binary provides operator access to the asset registry:
//! - List the reconciled view of a collection
//! - Upload files into a collection, or as standalone documents
//! - Remove assets by position, remote id, or URL

use clap::Parser;
use curio::observability::{LoggingConfig, init_logging};
use curio::{AssetRegistry, RegistryConfig};

mod cli;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use cli::{Cli, run_command};

    dotenvy::dotenv().ok();

    // Parse command-line arguments
    let cli = Cli::parse();

    let mut logging = LoggingConfig::new().with_json_logs(cli.json_logs);
    if cli.verbose {
        logging = logging.with_log_level("debug");
    }
    init_logging(logging)?;

    let config = match &cli.config {
        Some(path) => RegistryConfig::from_file(path)?,
        None => RegistryConfig::load()?,
    };
    let registry = AssetRegistry::from_config(config)?;

    let (output, success) = run_command(&registry, cli.command).await;
    println!("{}", output);

    if !success {
        std::process::exit(1);
    }
    Ok(())
}
