//! Local document library: directory scans, PDF protection probe, deployment packages.

mod error;
pub use error::StoreError;

pub mod library;
pub mod package;
pub mod protection;

pub use library::{list_documents, list_templates};
pub use package::{PackageManifest, PackagedLanguage, SourceCount};
pub use protection::Protection;
