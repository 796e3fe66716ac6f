//! Remote storage: credential resolution, HTTP object client, batch uploader.

pub mod credentials;
pub mod http;
pub mod uploader;

pub use credentials::{CredentialError, CredentialSource, Credentials, EnvSource};
pub use http::{ObjectSink, StorageClient, SyncError};
pub use uploader::{DirectoryTally, UploadSummary, Uploader};
