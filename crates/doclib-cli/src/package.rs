//! `doclib package`: stage the library for a manual upload.

use std::path::Path;
use std::process::ExitCode;

use anyhow::Context;
use doclib_core::Config;
use doclib_store::Protection;
use doclib_store::package::{build_package, verify_sources};
use doclib_store::protection::probe_sample;
use tracing::{info, warn};

pub fn run(config: &Config, package_dir: &Path) -> anyhow::Result<ExitCode> {
    let rule = "=".repeat(70);
    let library = &config.library;
    info!("Protected documents - deployment package");
    info!("{rule}");

    info!("verifying protected documents");
    verify_sources(&library.languages, &library.extension)
        .context("protected documents verification failed")?;

    if let Some(sample_lang) = library.languages.first() {
        match probe_sample(&sample_lang.path, &library.extension) {
            Protection::Protected => info!("documents are password protected"),
            Protection::NotProtected => warn!("documents may not be properly protected"),
            Protection::Indeterminate(reason) => {
                warn!(%reason, "protection check inconclusive")
            }
        }
    }

    let manifest = build_package(
        &library.languages,
        package_dir,
        &config.package.instructions_file,
        &config.storage.bucket,
    )
    .context("building deployment package")?;

    info!("{rule}");
    info!("DEPLOYMENT PACKAGE READY");
    info!("{rule}");
    info!("Package location: {}", manifest.dir.display());
    info!("Documents packaged: {}", manifest.total_entries());
    info!("Instructions: {}", manifest.instructions.display());
    info!("Next steps:");
    info!("1. Go to your Supabase project dashboard");
    info!("2. Navigate to Storage → {} bucket", config.storage.bucket);
    let mut step = 3;
    for lang in &manifest.languages {
        info!(
            "{step}. Upload the '{code}' folder contents to '{code}' path in storage ({n} files)",
            code = lang.code,
            n = lang.entries
        );
        step += 1;
    }
    info!("{step}. Use 'Replace' option to overwrite existing files");
    info!("{rule}");
    Ok(ExitCode::SUCCESS)
}
