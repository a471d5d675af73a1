//! Folio core
//!
//! The request-independent logic behind the Folio portfolio site:
//!
//! - [`language`]: two-letter language codes
//! - [`bundle`]: localized string bundles and their ordered fallback lookup
//! - [`session`]: the per-visitor session store
//! - [`resolver`]: picks the visitor's language and the bundle to render
//! - [`arrival`]: classifies a request as a cold arrival or a warm navigation
//!
//! # Architecture
//!
//! ```text
//!   request headers ──► RequestMetadata ──► classify_arrival ──► Arrival (cold | warm)
//!
//!   ?lang / session / Accept-Language ──► LanguageResolver ──► LanguageCode
//!                                              │                    │
//!                                        SessionStore         lookup_bundle
//!                                                                   │
//!                                                       {lang}/{bundle}.toml → en/{bundle}.toml
//! ```

pub mod arrival;
pub mod bundle;
pub mod error;
pub mod language;
pub mod resolver;
pub mod session;

pub use arrival::{classify_arrival, Arrival, RequestMetadata};
pub use bundle::{
    lookup_bundle, BundleLookup, BundleName, BundleSource, FsBundleSource, StringBundle,
};
pub use error::{BundleError, LanguageCodeError, ResolveError};
pub use language::{LanguageCode, DEFAULT_LANGUAGE};
pub use resolver::{choose_language, LanguageRequest, LanguageResolver, LanguageSource};
pub use session::{
    run_session_sweeper, MemorySessionStore, SessionId, SessionStore, DEFAULT_SESSION_LIFETIME,
};
