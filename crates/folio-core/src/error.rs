//! Error types for bundle loading and language resolution.

use std::path::PathBuf;

use thiserror::Error;

use crate::bundle::BundleName;
use crate::language::LanguageCode;

/// A bundle file exists but cannot be used.
#[derive(Error, Debug)]
pub enum BundleError {
    #[error("failed to read bundle file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse bundle file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("bundle file {path} is missing required key '{key}'")]
    MissingKey { path: PathBuf, key: &'static str },

    #[error("bundle file {path}: value of '{key}' is not a string")]
    NotAString { path: PathBuf, key: String },
}

/// Failures surfaced to route handlers. Any of these aborts rendering.
#[derive(Error, Debug)]
pub enum ResolveError {
    #[error("no '{bundle}' bundle for language '{language}' nor for the default language")]
    BundleNotFound {
        language: LanguageCode,
        bundle: BundleName,
    },

    #[error("session store error: {0}")]
    Session(#[from] anyhow::Error),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid language code '{0}': expected two ASCII letters")]
pub struct LanguageCodeError(pub String);
