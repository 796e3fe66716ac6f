//! `doclib upload`: push the library to remote storage.

use std::process::ExitCode;

use anyhow::Context;
use doclib_core::Config;
use doclib_store::{StoreError, list_documents};
use doclib_sync::{EnvSource, StorageClient, Uploader, credentials};
use tracing::{error, info, warn};

pub async fn run(config: &Config) -> anyhow::Result<ExitCode> {
    let rule = "=".repeat(70);
    info!("Protected documents - storage deployment");
    info!("{rule}");

    // Credentials gate everything else.
    let creds = credentials::resolve(&EnvSource, &config.storage)
        .context("storage credentials not found")?;
    let client = StorageClient::new(&creds, &config.storage).context("building HTTP client")?;

    preflight(config);

    let summary = Uploader::new(&client, config.library.extension.as_str())
        .deploy(&config.library.languages)
        .await;

    if summary.is_success() {
        info!("All protected documents deployed successfully");
        Ok(ExitCode::SUCCESS)
    } else {
        warn!(
            "{} files failed to upload. Check the log for details.",
            summary.failed
        );
        Ok(ExitCode::FAILURE)
    }
}

/// Log how many documents each language directory holds before uploading.
fn preflight(config: &Config) {
    let mut total = 0;
    for lang in &config.library.languages {
        match list_documents(&lang.path, &config.library.extension) {
            Ok(files) => {
                info!(lang = %lang.code, count = files.len(), "found protected documents");
                total += files.len();
            }
            Err(StoreError::DirectoryNotFound(dir)) => {
                warn!(
                    lang = %lang.code,
                    dir = %dir.display(),
                    "protected document directory not found"
                );
            }
            Err(e) => error!(lang = %lang.code, error = %e, "cannot list documents"),
        }
    }
    info!(total, "protected documents ready for upload");
}
