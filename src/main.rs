use clap::Parser;

use bucketry::cli;
use bucketry::error::Result;
use bucketry::storage::StorageClient;

use bucketry::cli::Args;
use bucketry::config::load_storage_config;

#[tokio::main]
async fn main() {
    // Logs go to stderr; stdout carries results and progress.
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();

    let args = Args::parse();

    if let Err(e) = run_app(args).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run_app(args: Args) -> Result<()> {
    let config = load_storage_config()?;
    let client = StorageClient::new(config).await?;
    log::debug!("using provider {:?}", client.provider());
    cli::run(args, client).await?;
    Ok(())
}
