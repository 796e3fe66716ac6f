//! Configuration for the doclib tools.
//!
//! Every field has a default, so a missing config file (or an empty one)
//! reproduces the fixed layout the tools were first written against:
//!
//! ```toml
//! [catalog]
//! markup = "app/resource-center/document-generator/index.html"
//! metadata = "assets/data/document-metadata.json"
//! templates = "assets/templates"
//! template_extension = "txt"
//!
//! [library]
//! extension = "pdf"
//!
//! [[library.languages]]
//! code = "en"
//! path = "./Document Library - Final English"
//!
//! [[library.languages]]
//! code = "es"
//! path = "./Document Library - Final Spanish"
//!
//! [storage]
//! bucket = "documents"
//! content_type = "application/pdf"
//! url_var = "SUPABASE_URL"
//! token_vars = ["SUPABASE_SERVICE_ROLE_KEY", "SUPABASE_ANON_KEY"]
//!
//! [package]
//! dir = "protected_documents_package"
//! instructions_file = "UPLOAD_INSTRUCTIONS.txt"
//!
//! [logging]
//! upload_log = "deploy_to_response_center.log"
//! package_log = "upload_to_response_center.log"
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::CatalogError;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub catalog: CatalogConfig,
    pub library: LibraryConfig,
    pub storage: StorageConfig,
    pub package: PackageConfig,
    pub logging: LoggingConfig,
}

impl Config {
    /// Read and parse a TOML config file.
    pub fn from_file(path: &Path) -> Result<Self, CatalogError> {
        let raw = std::fs::read_to_string(path).map_err(|source| CatalogError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&raw).map_err(|source| CatalogError::Config {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load `path` if given, otherwise return the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, CatalogError> {
        match path {
            Some(p) => Self::from_file(p),
            None => Ok(Self::default()),
        }
    }
}

/// Inputs of the two auditors.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Catalog markup scanned for `type=` references.
    pub markup: PathBuf,
    /// Metadata catalog (JSON array).
    pub metadata: PathBuf,
    /// Directory holding template files.
    pub templates: PathBuf,
    /// Template file extension, without the dot. Matched case-sensitively.
    pub template_extension: String,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            markup: PathBuf::from("app/resource-center/document-generator/index.html"),
            metadata: PathBuf::from("assets/data/document-metadata.json"),
            templates: PathBuf::from("assets/templates"),
            template_extension: "txt".to_string(),
        }
    }
}

/// A local document directory and the language code it is published under.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LanguageDir {
    pub code: String,
    pub path: PathBuf,
}

impl LanguageDir {
    pub fn new(code: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            code: code.into(),
            path: path.into(),
        }
    }
}

/// The protected document library, one directory per language.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LibraryConfig {
    /// Document extension, without the dot. Matched case-insensitively.
    pub extension: String,
    pub languages: Vec<LanguageDir>,
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self {
            extension: "pdf".to_string(),
            languages: vec![
                LanguageDir::new("en", "./Document Library - Final English"),
                LanguageDir::new("es", "./Document Library - Final Spanish"),
            ],
        }
    }
}

/// Remote object storage.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub bucket: String,
    pub content_type: String,
    /// Variable holding the storage base URL.
    pub url_var: String,
    /// Variables holding the bearer token, in order of preference.
    pub token_vars: Vec<String>,
    /// Per-request timeout. Unset means requests never time out.
    pub request_timeout_secs: Option<u64>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            bucket: "documents".to_string(),
            content_type: "application/pdf".to_string(),
            url_var: "SUPABASE_URL".to_string(),
            token_vars: vec![
                "SUPABASE_SERVICE_ROLE_KEY".to_string(),
                "SUPABASE_ANON_KEY".to_string(),
            ],
            request_timeout_secs: None,
        }
    }
}

/// Local deployment package.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PackageConfig {
    /// Package directory. Deleted and recreated on every build.
    pub dir: PathBuf,
    pub instructions_file: String,
}

impl Default for PackageConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("protected_documents_package"),
            instructions_file: "UPLOAD_INSTRUCTIONS.txt".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub upload_log: PathBuf,
    pub package_log: PathBuf,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            upload_log: PathBuf::from("deploy_to_response_center.log"),
            package_log: PathBuf::from("upload_to_response_center.log"),
        }
    }
}
