//! Localized string bundles
//!
//! A bundle is a flat TOML table of display strings for one page or section,
//! in one language. Bundles live on disk as `{root}/{language}/{bundle}.toml`
//! and are read fresh on every lookup.
//!
//! Lookup tries the requested language first and then [`DEFAULT_LANGUAGE`].
//! A missing file moves on to the next candidate; a file that exists but is
//! invalid ends the lookup.

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::BundleError;
use crate::language::{LanguageCode, DEFAULT_LANGUAGE};

/// The bundles a page can ask for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BundleName {
    /// Navigation and footer strings shared by every page
    Common,
    /// Cold-arrival home page
    Landing,
    /// Warm-arrival home page
    Presentation,
    LanguageSelector,
}

impl BundleName {
    /// File stem of the bundle on disk.
    pub fn as_str(self) -> &'static str {
        match self {
            BundleName::Common => "common",
            BundleName::Landing => "landing",
            BundleName::Presentation => "presentation",
            BundleName::LanguageSelector => "language_selector",
        }
    }

    /// Keys every file for this bundle must define.
    pub fn required_keys(self) -> &'static [&'static str] {
        match self {
            BundleName::Common => &[
                "HomeText",
                "AboutText",
                "WorkText",
                "ContactText",
                "LanguageText",
                "CopyrightText",
                "LicenseText",
                "PrivacyPolicyText",
            ],
            BundleName::Landing => &["WelcomeText", "MessageText"],
            BundleName::Presentation => &["WelcomeText", "PresentationText", "MessageText"],
            BundleName::LanguageSelector => &["LanguageSelectionText"],
        }
    }
}

impl fmt::Display for BundleName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable set of strings for one `(language, bundle)` pair.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StringBundle {
    language: LanguageCode,
    strings: BTreeMap<String, String>,
}

impl StringBundle {
    /// Parse bundle text. `path` is only used in error messages.
    pub fn parse(
        language: LanguageCode,
        name: BundleName,
        text: &str,
        path: &Path,
    ) -> Result<Self, BundleError> {
        let table: toml::Table = text.parse().map_err(|source| BundleError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        let mut strings = BTreeMap::new();
        for (key, value) in table {
            match value {
                toml::Value::String(s) => {
                    strings.insert(key, s);
                }
                _ => {
                    return Err(BundleError::NotAString {
                        path: path.to_path_buf(),
                        key,
                    })
                }
            }
        }

        if let Some(key) = name
            .required_keys()
            .iter()
            .copied()
            .find(|key| !strings.contains_key(*key))
        {
            return Err(BundleError::MissingKey {
                path: path.to_path_buf(),
                key,
            });
        }

        Ok(Self { language, strings })
    }

    /// Language the bundle was actually loaded for (after any fallback).
    pub fn language(&self) -> LanguageCode {
        self.language
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.strings.get(key).map(String::as_str)
    }

    pub fn strings(&self) -> &BTreeMap<String, String> {
        &self.strings
    }
}

/// Result of the ordered bundle lookup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BundleLookup {
    Found(StringBundle),
    NotFound,
}

/// Storage that bundles are read from.
pub trait BundleSource: Send + Sync {
    /// Load one bundle. `Ok(None)` means no bundle exists for the pair.
    fn load(
        &self,
        language: LanguageCode,
        name: BundleName,
    ) -> Result<Option<StringBundle>, BundleError>;

    /// Languages that have at least a `common` bundle, sorted.
    fn languages(&self) -> Vec<LanguageCode>;
}

/// Bundles stored as `{root}/{language}/{bundle}.toml`.
#[derive(Clone, Debug)]
pub struct FsBundleSource {
    root: PathBuf,
}

impl FsBundleSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn path_for(&self, language: LanguageCode, name: BundleName) -> PathBuf {
        self.root
            .join(language.as_str())
            .join(format!("{}.toml", name.as_str()))
    }
}

impl BundleSource for FsBundleSource {
    fn load(
        &self,
        language: LanguageCode,
        name: BundleName,
    ) -> Result<Option<StringBundle>, BundleError> {
        let path = self.path_for(language, name);
        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(BundleError::Io { path, source }),
        };
        StringBundle::parse(language, name, &text, &path).map(Some)
    }

    fn languages(&self) -> Vec<LanguageCode> {
        let entries = match fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!(root = %self.root.display(), error = %e, "Cannot list bundle directory");
                return Vec::new();
            }
        };

        let mut languages: Vec<LanguageCode> = entries
            .filter_map(|entry| entry.ok())
            .filter_map(|entry| {
                let code = LanguageCode::parse(entry.file_name().to_str()?).ok()?;
                self.path_for(code, BundleName::Common)
                    .is_file()
                    .then_some(code)
            })
            .collect();
        languages.sort();
        languages
    }
}

/// Requested language first, then the default, without repeats.
fn fallback_chain(language: LanguageCode) -> Vec<LanguageCode> {
    if language == DEFAULT_LANGUAGE {
        vec![language]
    } else {
        vec![language, DEFAULT_LANGUAGE]
    }
}

/// Find the bundle to render for `language`.
pub fn lookup_bundle(
    source: &dyn BundleSource,
    language: LanguageCode,
    name: BundleName,
) -> BundleLookup {
    for candidate in fallback_chain(language) {
        match source.load(candidate, name) {
            Ok(Some(bundle)) => {
                if candidate != language {
                    tracing::debug!(
                        requested = %language,
                        used = %candidate,
                        bundle = %name,
                        "Falling back to default language bundle"
                    );
                }
                return BundleLookup::Found(bundle);
            }
            Ok(None) => {
                tracing::debug!(language = %candidate, bundle = %name, "Bundle does not exist");
            }
            Err(e) => {
                tracing::warn!(language = %candidate, bundle = %name, error = %e, "Invalid bundle file");
                return BundleLookup::NotFound;
            }
        }
    }
    BundleLookup::NotFound
}
