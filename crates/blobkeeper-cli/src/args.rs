use std::path::PathBuf;

use blobkeeper_core::app::config::{DEFAULT_CONTAINER, DEFAULT_LOG_CONTAINER};
use blobkeeper_core::app::{LogMode, ServiceConfig};
use clap::builder::BoolishValueParser;
use clap::{ArgAction, Parser};

/// Interactive console for uploading, listing, downloading and deleting blobs.
#[derive(Debug, Parser)]
#[command(name = "blobkeeper", version)]
pub struct Cli {
    /// Directory used as the object store; blobs are kept in memory when unset
    #[arg(long, env = "BLOBKEEPER_STORE_ROOT")]
    pub store_root: Option<PathBuf>,

    /// Container holding data blobs
    #[arg(long, env = "BLOBKEEPER_CONTAINER", default_value = DEFAULT_CONTAINER)]
    pub container: String,

    /// Container holding the daily log blobs
    #[arg(long, env = "BLOBKEEPER_LOG_CONTAINER", default_value = DEFAULT_LOG_CONTAINER)]
    pub log_container: String,

    /// How records are written to the daily log blob: overwrite or append
    #[arg(long, env = "BLOBKEEPER_LOG_MODE", default_value_t = LogMode::Overwrite)]
    pub log_mode: LogMode,

    /// Let downloads replace an existing local file
    ///
    /// The environment variable also accepts 1/0, yes/no and on/off.
    #[arg(
        long,
        env = "BLOBKEEPER_OVERWRITE_DOWNLOADS",
        action = ArgAction::SetTrue,
        value_parser = BoolishValueParser::new()
    )]
    pub overwrite_downloads: bool,

    /// Enable debug logging on stderr
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    pub fn service_config(&self) -> ServiceConfig {
        ServiceConfig {
            container: self.container.clone(),
            log_container: self.log_container.clone(),
            log_mode: self.log_mode,
            overwrite_downloads: self.overwrite_downloads,
        }
    }
}
