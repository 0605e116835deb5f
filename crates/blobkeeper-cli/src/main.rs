//! # blobkeeper
//!
//! Interactive console for a blob container. Every upload, download and
//! delete leaves a record in the daily log blob (`log_YYYYMMDD.txt`).
//!
//! ```bash
//! BLOBKEEPER_STORE_ROOT=/var/lib/blobkeeper blobkeeper --container pictures
//! ```

use std::process::ExitCode;
use std::sync::Arc;

use blobkeeper_core::app::BlobService;
use blobkeeper_core::impls::{InMemoryObjectStore, LocalFsObjectStore};
use blobkeeper_core::ports::{ObjectStore, SystemClock};
use clap::Parser;
use tokio::io::BufReader;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod args;
mod console;
mod error;

use args::Cli;
use console::Console;
use error::CliError;

// 1コマンドずつ順に処理するので current_thread で十分
#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}

/// Logs go to stderr so the menu on stdout stays readable.
fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let store: Arc<dyn ObjectStore> = match &cli.store_root {
        Some(root) => {
            info!(root = %root.display(), "using directory-backed store");
            Arc::new(LocalFsObjectStore::open(root).await?)
        }
        None => {
            warn!("no store root configured; blobs live in memory and are lost on exit");
            Arc::new(InMemoryObjectStore::new())
        }
    };

    let config = cli.service_config();
    info!(
        container = %config.container,
        log_container = %config.log_container,
        log_mode = %config.log_mode,
        "starting console"
    );
    let service = BlobService::new(store, Arc::new(SystemClock), config);

    let mut console = Console::new(BufReader::new(tokio::io::stdin()), tokio::io::stdout());
    console.run(&service).await
}
