//! Batch upload of the document library.
//!
//! Every file is attempted exactly once. A failure is logged and counted and
//! the batch moves on; nothing here aborts the run. An unreadable directory
//! is counted as a single failure.

use std::path::{Path, PathBuf};

use doclib_core::LanguageDir;
use doclib_store::{StoreError, list_documents};
use tracing::{error, info, warn};

use crate::{ObjectSink, SyncError};

/// Outcome counts for one language directory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectoryTally {
    pub code: String,
    pub uploaded: usize,
    pub failed: usize,
}

/// Run-level outcome across all language directories.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadSummary {
    pub directories: Vec<DirectoryTally>,
    pub uploaded: usize,
    pub failed: usize,
}

impl UploadSummary {
    pub fn attempted(&self) -> usize {
        self.uploaded + self.failed
    }

    /// Percentage of attempted files that uploaded, `None` if nothing was attempted.
    pub fn success_rate(&self) -> Option<f64> {
        let attempted = self.attempted();
        (attempted > 0).then(|| self.uploaded as f64 / attempted as f64 * 100.0)
    }

    pub fn is_success(&self) -> bool {
        self.failed == 0
    }

    fn push(&mut self, tally: DirectoryTally) {
        self.uploaded += tally.uploaded;
        self.failed += tally.failed;
        self.directories.push(tally);
    }
}

/// Object path for a document: `<language-code>/<filename>`.
pub fn object_path(code: &str, filename: &str) -> String {
    format!("{code}/{filename}")
}

pub struct Uploader<'a, S: ObjectSink> {
    sink: &'a S,
    extension: String,
}

impl<'a, S: ObjectSink> Uploader<'a, S> {
    pub fn new(sink: &'a S, extension: impl Into<String>) -> Self {
        Self {
            sink,
            extension: extension.into(),
        }
    }

    /// Read one file and send it. Returns whether it uploaded.
    pub async fn upload_file(&self, local: &Path, object_path: &str) -> bool {
        let result = match tokio::fs::read(local).await {
            Ok(bytes) => self.sink.put_object(object_path, bytes).await,
            Err(source) => Err(SyncError::Read {
                path: local.to_path_buf(),
                source,
            }),
        };
        match result {
            Ok(()) => {
                info!(object = %object_path, "uploaded");
                true
            }
            Err(SyncError::Server { status, body }) => {
                error!(object = %object_path, status, body = %body, "upload rejected");
                false
            }
            Err(e) => {
                error!(file = %local.display(), error = %e, "upload failed");
                false
            }
        }
    }

    /// Upload every matching file in one language directory.
    ///
    /// A missing directory is a warning and counts as zero of each. A
    /// directory that exists but cannot be listed counts as one failure.
    pub async fn upload_directory(&self, lang: &LanguageDir) -> DirectoryTally {
        let listing = list_documents(&lang.path, &self.extension);
        self.upload_listing(lang, listing).await
    }

    async fn upload_listing(
        &self,
        lang: &LanguageDir,
        listing: Result<Vec<PathBuf>, StoreError>,
    ) -> DirectoryTally {
        let mut tally = DirectoryTally {
            code: lang.code.clone(),
            ..Default::default()
        };
        let files = match listing {
            Ok(files) => files,
            Err(StoreError::DirectoryNotFound(dir)) => {
                warn!(dir = %dir.display(), "directory not found");
                return tally;
            }
            Err(e) => {
                error!(lang = %lang.code, error = %e, "cannot list directory");
                tally.failed += 1;
                return tally;
            }
        };

        info!(lang = %lang.code, count = files.len(), "uploading documents");
        for file in &files {
            let Some(name) = file.file_name() else {
                continue;
            };
            let object = object_path(&lang.code, &name.to_string_lossy());
            if self.upload_file(file, &object).await {
                tally.uploaded += 1;
            } else {
                tally.failed += 1;
            }
        }
        tally
    }

    /// Upload every language directory in order.
    pub async fn deploy(&self, languages: &[LanguageDir]) -> UploadSummary {
        info!("starting deployment of protected documents");
        let mut summary = UploadSummary::default();
        for lang in languages {
            info!(lang = %lang.code, dir = %lang.path.display(), "deploying documents");
            summary.push(self.upload_directory(lang).await);
        }
        log_summary(&summary);
        summary
    }
}

fn log_summary(summary: &UploadSummary) {
    let rule = "=".repeat(60);
    info!("{rule}");
    info!("DEPLOYMENT COMPLETE");
    info!("{rule}");
    info!("Total files uploaded: {}", summary.uploaded);
    info!("Total files failed: {}", summary.failed);
    match summary.success_rate() {
        Some(rate) => info!("Success rate: {rate:.1}%"),
        None => info!("Success rate: 0%"),
    }
    info!("{rule}");
}
