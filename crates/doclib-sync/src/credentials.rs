//! Storage credential resolution.
//!
//! The base URL comes from one variable; the bearer token from the first
//! non-empty variable in an ordered list (privileged key first, restricted
//! key as fallback). Lookups go through [`CredentialSource`] so callers can
//! resolve against something other than the process environment.

use std::collections::HashMap;
use std::fmt;

use doclib_core::config::StorageConfig;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("storage base URL not set (expected {var})")]
    MissingBaseUrl { var: String },
    #[error("storage token not set (expected one of {vars})")]
    MissingToken { vars: String },
}

/// A named-variable lookup.
pub trait CredentialSource {
    fn var(&self, name: &str) -> Option<String>;
}

/// Reads the process environment.
pub struct EnvSource;

impl CredentialSource for EnvSource {
    fn var(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

impl CredentialSource for HashMap<String, String> {
    fn var(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

#[derive(Clone)]
pub struct Credentials {
    pub base_url: String,
    token: String,
    /// Variable the token was read from.
    pub token_var: String,
}

impl Credentials {
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            token: token.into(),
            token_var: String::new(),
        }
    }

    pub fn token(&self) -> &str {
        &self.token
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("base_url", &self.base_url)
            .field("token", &"<redacted>")
            .field("token_var", &self.token_var)
            .finish()
    }
}

fn non_empty(source: &impl CredentialSource, name: &str) -> Option<String> {
    source.var(name).filter(|v| !v.trim().is_empty())
}

/// Resolve credentials once, before any upload starts.
pub fn resolve(
    source: &impl CredentialSource,
    storage: &StorageConfig,
) -> Result<Credentials, CredentialError> {
    let base_url =
        non_empty(source, &storage.url_var).ok_or_else(|| CredentialError::MissingBaseUrl {
            var: storage.url_var.clone(),
        })?;

    let (token_var, token) = storage
        .token_vars
        .iter()
        .find_map(|name| non_empty(source, name).map(|v| (name.clone(), v)))
        .ok_or_else(|| CredentialError::MissingToken {
            vars: storage.token_vars.join(", "),
        })?;

    info!(%base_url, %token_var, "resolved storage credentials");
    Ok(Credentials {
        base_url,
        token,
        token_var,
    })
}
