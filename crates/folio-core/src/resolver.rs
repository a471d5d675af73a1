//! Language resolution
//!
//! Picks the language a visitor sees and loads the bundles for it.
//!
//! Precedence, highest first:
//!
//! 1. explicit override (`?lang=xx`)
//! 2. language stored in the visitor's session
//! 3. first two characters of `Accept-Language`
//! 4. [`DEFAULT_LANGUAGE`]
//!
//! Whenever the result does not come from the session it is written back, so
//! later requests from the same visitor skip header inspection.

use std::sync::Arc;

use crate::bundle::{lookup_bundle, BundleLookup, BundleName, BundleSource, StringBundle};
use crate::error::ResolveError;
use crate::language::{LanguageCode, DEFAULT_LANGUAGE};
use crate::session::{SessionId, SessionStore};

/// Where a resolved language came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LanguageSource {
    Override,
    Session,
    AcceptLanguage,
    Default,
}

impl LanguageSource {
    /// Whether a language from this source is persisted into the session.
    pub fn persists(self) -> bool {
        !matches!(self, LanguageSource::Session)
    }
}

/// Raw language hints carried by one request.
#[derive(Clone, Copy, Debug, Default)]
pub struct LanguageRequest<'a> {
    /// Value of the `lang` query parameter
    pub override_code: Option<&'a str>,
    /// Value of the `Accept-Language` header
    pub accept_language: Option<&'a str>,
}

/// Apply the precedence rules. Pure; malformed hints count as absent.
pub fn choose_language(
    override_code: Option<LanguageCode>,
    session: Option<LanguageCode>,
    accept_language: Option<&str>,
) -> (LanguageCode, LanguageSource) {
    if let Some(code) = override_code {
        return (code, LanguageSource::Override);
    }
    if let Some(code) = session {
        return (code, LanguageSource::Session);
    }
    match accept_language.and_then(LanguageCode::from_prefix) {
        Some(code) => (code, LanguageSource::AcceptLanguage),
        None => (DEFAULT_LANGUAGE, LanguageSource::Default),
    }
}

/// Resolves languages against a session store and loads bundles from a source.
#[derive(Clone)]
pub struct LanguageResolver {
    sessions: Arc<dyn SessionStore>,
    bundles: Arc<dyn BundleSource>,
}

impl LanguageResolver {
    pub fn new(sessions: Arc<dyn SessionStore>, bundles: Arc<dyn BundleSource>) -> Self {
        Self { sessions, bundles }
    }

    pub fn sessions(&self) -> &Arc<dyn SessionStore> {
        &self.sessions
    }

    /// Resolve the visitor's language, persisting it when it did not come
    /// from the session.
    pub async fn resolve_language(
        &self,
        session_id: SessionId,
        request: &LanguageRequest<'_>,
    ) -> Result<LanguageCode, ResolveError> {
        let override_code = request
            .override_code
            .filter(|raw| !raw.trim().is_empty())
            .and_then(|raw| match LanguageCode::parse(raw) {
                Ok(code) => Some(code),
                Err(e) => {
                    tracing::debug!(error = %e, "Ignoring language override");
                    None
                }
            });

        let stored = if override_code.is_some() {
            None
        } else {
            self.sessions.language(session_id).await?
        };

        let (language, source) = choose_language(override_code, stored, request.accept_language);

        if source.persists() {
            self.sessions.set_language(session_id, language).await?;
            tracing::debug!(
                session_id = %session_id,
                language = %language,
                source = ?source,
                "Language stored in session"
            );
        }

        Ok(language)
    }

    /// Load `name` for `language`, falling back to the default language.
    pub fn bundle(
        &self,
        language: LanguageCode,
        name: BundleName,
    ) -> Result<StringBundle, ResolveError> {
        match lookup_bundle(self.bundles.as_ref(), language, name) {
            BundleLookup::Found(bundle) => Ok(bundle),
            BundleLookup::NotFound => Err(ResolveError::BundleNotFound {
                language,
                bundle: name,
            }),
        }
    }

    /// Languages a visitor can pick from.
    pub fn available_languages(&self) -> Vec<LanguageCode> {
        self.bundles.languages()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BundleError;
    use crate::session::MemorySessionStore;
    use std::collections::HashMap;
    use std::path::Path;

    /// Bundles held in memory, keyed by language and bundle name.
    #[derive(Default)]
    struct MemoryBundles {
        files: HashMap<(LanguageCode, BundleName), String>,
    }

    impl MemoryBundles {
        fn with(mut self, lang: &str, name: BundleName, text: &str) -> Self {
            self.files.insert((code(lang), name), text.to_string());
            self
        }
    }

    impl BundleSource for MemoryBundles {
        fn load(
            &self,
            language: LanguageCode,
            name: BundleName,
        ) -> Result<Option<StringBundle>, BundleError> {
            self.files
                .get(&(language, name))
                .map(|text| StringBundle::parse(language, name, text, Path::new("memory")))
                .transpose()
        }

        fn languages(&self) -> Vec<LanguageCode> {
            let mut langs: Vec<_> = self
                .files
                .keys()
                .filter(|(_, name)| *name == BundleName::Common)
                .map(|(lang, _)| *lang)
                .collect();
            langs.sort();
            langs
        }
    }

    const SELECTOR_EN: &str = "LanguageSelectionText = \"Choose a language\"";
    const SELECTOR_FR: &str = "LanguageSelectionText = \"Choisissez une langue\"";

    fn code(s: &str) -> LanguageCode {
        LanguageCode::parse(s).unwrap()
    }

    fn resolver(bundles: MemoryBundles) -> (LanguageResolver, Arc<MemorySessionStore>) {
        let sessions = Arc::new(MemorySessionStore::default());
        let resolver = LanguageResolver::new(sessions.clone(), Arc::new(bundles));
        (resolver, sessions)
    }

    #[test]
    fn test_choose_language_precedence() {
        let fr = Some(code("fr"));
        let de = Some(code("de"));
        assert_eq!(
            choose_language(de, fr, Some("es")),
            (code("de"), LanguageSource::Override)
        );
        assert_eq!(
            choose_language(None, fr, Some("es")),
            (code("fr"), LanguageSource::Session)
        );
        assert_eq!(
            choose_language(None, None, Some("es-ES")),
            (code("es"), LanguageSource::AcceptLanguage)
        );
        assert_eq!(
            choose_language(None, None, None),
            (DEFAULT_LANGUAGE, LanguageSource::Default)
        );
    }

    #[test]
    fn test_choose_language_malformed_header_falls_to_default() {
        for header in ["", "f", "*", " "] {
            assert_eq!(
                choose_language(None, None, Some(header)),
                (DEFAULT_LANGUAGE, LanguageSource::Default),
                "header {header:?}"
            );
        }
    }

    #[tokio::test]
    async fn test_accept_language_is_persisted() {
        let (resolver, sessions) = resolver(MemoryBundles::default());
        let id = sessions.create().await.unwrap();

        let request = LanguageRequest {
            override_code: None,
            accept_language: Some("fr-FR,fr;q=0.9"),
        };
        assert_eq!(resolver.resolve_language(id, &request).await.unwrap(), code("fr"));
        assert_eq!(sessions.language(id).await.unwrap(), Some(code("fr")));

        // The header no longer matters once the session knows the language.
        let request = LanguageRequest {
            override_code: None,
            accept_language: Some("es"),
        };
        assert_eq!(resolver.resolve_language(id, &request).await.unwrap(), code("fr"));
    }

    #[tokio::test]
    async fn test_override_sticks_to_session() {
        let (resolver, sessions) = resolver(MemoryBundles::default());
        let id = sessions.create().await.unwrap();

        let with_override = LanguageRequest {
            override_code: Some("de"),
            accept_language: Some("fr"),
        };
        assert_eq!(
            resolver.resolve_language(id, &with_override).await.unwrap(),
            code("de")
        );

        let without = LanguageRequest {
            override_code: None,
            accept_language: Some("fr"),
        };
        assert_eq!(resolver.resolve_language(id, &without).await.unwrap(), code("de"));
    }

    #[tokio::test]
    async fn test_invalid_override_is_ignored() {
        let (resolver, sessions) = resolver(MemoryBundles::default());
        let id = sessions.create().await.unwrap();
        sessions.set_language(id, code("es")).await.unwrap();

        for bad in ["../etc", "deutsch", "", "1"] {
            let request = LanguageRequest {
                override_code: Some(bad),
                accept_language: None,
            };
            assert_eq!(
                resolver.resolve_language(id, &request).await.unwrap(),
                code("es"),
                "override {bad:?}"
            );
        }
    }

    #[tokio::test]
    async fn test_default_is_persisted() {
        let (resolver, sessions) = resolver(MemoryBundles::default());
        let id = sessions.create().await.unwrap();
        let language = resolver
            .resolve_language(id, &LanguageRequest::default())
            .await
            .unwrap();
        assert_eq!(language, DEFAULT_LANGUAGE);
        assert_eq!(sessions.language(id).await.unwrap(), Some(DEFAULT_LANGUAGE));
    }

    #[test]
    fn test_bundle_found_and_fallback() {
        let bundles = MemoryBundles::default()
            .with("en", BundleName::LanguageSelector, SELECTOR_EN)
            .with("fr", BundleName::LanguageSelector, SELECTOR_FR);
        let (resolver, _) = resolver(bundles);

        let fr = resolver
            .bundle(code("fr"), BundleName::LanguageSelector)
            .unwrap();
        assert_eq!(fr.get("LanguageSelectionText"), Some("Choisissez une langue"));

        let de = resolver
            .bundle(code("de"), BundleName::LanguageSelector)
            .unwrap();
        assert_eq!(de.language(), DEFAULT_LANGUAGE);
    }

    #[test]
    fn test_bundle_not_found() {
        let (resolver, _) = resolver(MemoryBundles::default());
        let err = resolver.bundle(code("fr"), BundleName::Landing).unwrap_err();
        assert!(matches!(
            err,
            ResolveError::BundleNotFound {
                bundle: BundleName::Landing,
                ..
            }
        ));
    }
}
