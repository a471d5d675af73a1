//! Shared application state

use std::sync::Arc;

use folio_core::{FsBundleSource, LanguageResolver, SessionStore};

use crate::config::ServerConfig;
use crate::render::{PageRenderer, TemplateError};
use crate::session::SessionCookie;

/// State shared by every handler. Cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub resolver: LanguageResolver,
    pub renderer: Arc<PageRenderer>,
    pub cookie: SessionCookie,
}

impl AppState {
    /// Load templates and wire the resolver to `sessions` and the bundle directory.
    pub fn new(
        config: &ServerConfig,
        sessions: Arc<dyn SessionStore>,
    ) -> Result<Self, TemplateError> {
        let renderer = PageRenderer::from_dir(&config.template_dir, config.template_reload)?;
        let bundles = Arc::new(FsBundleSource::new(&config.data_dir));

        Ok(Self {
            resolver: LanguageResolver::new(sessions, bundles),
            renderer: Arc::new(renderer),
            cookie: SessionCookie::new(config.session_lifetime, config.cookie_secure),
        })
    }

    pub fn sessions(&self) -> &Arc<dyn SessionStore> {
        self.resolver.sessions()
    }
}
