//! Core types, metadata catalog, and shared configuration for doclib.

pub mod catalog;
pub mod config;
mod error;
pub mod markup;

pub use catalog::{Catalog, DocumentType};
pub use config::{Config, LanguageDir};
pub use error::CatalogError;
pub use markup::{distinct_type_tokens, extract_type_tokens};
