//! Page handlers
//!
//! Every handler resolves the visitor's language, loads the bundles its page
//! needs and renders. A missing bundle aborts the request with a 500; nothing
//! is rendered with partial strings.

use std::collections::BTreeMap;

use axum::{
    extract::State,
    http::{header::ACCEPT_LANGUAGE, HeaderMap, Uri},
    response::Html,
    Extension,
};
use axum_extra::extract::Query;
use folio_core::{
    classify_arrival, Arrival, BundleName, LanguageCode, LanguageRequest, RequestMetadata,
};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::layout::Layout;
use crate::render::Page;
use crate::session::VisitorSession;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LanguageQuery {
    /// Explicit language choice, e.g. `?lang=fr`. Only the first value counts.
    #[serde(default)]
    pub lang: Vec<String>,
}

#[derive(Debug, Serialize)]
struct LanguageOption {
    code: String,
    active: bool,
}

#[derive(Debug, Serialize)]
struct PageContext<'a> {
    /// Language of the common strings after fallback, not the stored choice
    lang: String,
    common: &'a BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    strings: Option<&'a BTreeMap<String, String>>,
    layout: Layout,
    languages: Vec<LanguageOption>,
}

async fn resolve_language(
    state: &AppState,
    session: VisitorSession,
    headers: &HeaderMap,
    override_code: Option<&str>,
) -> Result<LanguageCode, AppError> {
    let accept_language = headers
        .get(ACCEPT_LANGUAGE)
        .and_then(|value| value.to_str().ok());
    let request = LanguageRequest {
        override_code,
        accept_language,
    };
    Ok(state.resolver.resolve_language(session.id, &request).await?)
}

/// GET /: landing page on a cold arrival, presentation page otherwise.
pub async fn home(
    State(state): State<AppState>,
    Extension(session): Extension<VisitorSession>,
    headers: HeaderMap,
    uri: Uri,
) -> Result<Html<String>, AppError> {
    let language = resolve_language(&state, session, &headers, None).await?;

    let meta = RequestMetadata::from_headers(&headers, uri.authority().map(|a| a.as_str()));
    let arrival = classify_arrival(&meta);
    tracing::debug!(
        session_id = %session.id,
        new_session = session.is_new,
        language = %language,
        arrival = arrival.as_str(),
        "Home page"
    );

    let (page, bundle_name) = match arrival {
        Arrival::Cold => (Page::Landing, BundleName::Landing),
        Arrival::Warm => (Page::Presentation, BundleName::Presentation),
    };

    let common = state.resolver.bundle(language, BundleName::Common)?;
    let strings = state.resolver.bundle(language, bundle_name)?;

    let context = PageContext {
        lang: common.language().to_string(),
        common: common.strings(),
        strings: Some(strings.strings()),
        layout: Layout::for_arrival(arrival, meta.referer.as_deref(), &uri),
        languages: Vec::new(),
    };
    Ok(Html(state.renderer.render(page, &context)?))
}

/// GET /language: language selector. `?lang=xx` switches the visitor's language.
pub async fn language(
    State(state): State<AppState>,
    Extension(session): Extension<VisitorSession>,
    headers: HeaderMap,
    Query(query): Query<LanguageQuery>,
) -> Result<Html<String>, AppError> {
    let override_code = query.lang.first().map(String::as_str);
    let language = resolve_language(&state, session, &headers, override_code).await?;

    let common = state.resolver.bundle(language, BundleName::Common)?;
    let strings = state.resolver.bundle(language, BundleName::LanguageSelector)?;
    let shown = common.language();
    let languages = state
        .resolver
        .available_languages()
        .into_iter()
        .map(|code| LanguageOption {
            code: code.to_string(),
            active: code == shown,
        })
        .collect();

    let context = PageContext {
        lang: shown.to_string(),
        common: common.strings(),
        strings: Some(strings.strings()),
        layout: Layout::inner_page(),
        languages,
    };
    Ok(Html(state.renderer.render(Page::LanguageSelector, &context)?))
}

/// Pages that only need the common bundle.
async fn render_inner_page(
    state: &AppState,
    session: VisitorSession,
    headers: &HeaderMap,
    page: Page,
) -> Result<Html<String>, AppError> {
    let language = resolve_language(state, session, headers, None).await?;
    let common = state.resolver.bundle(language, BundleName::Common)?;

    let context = PageContext {
        lang: common.language().to_string(),
        common: common.strings(),
        strings: None,
        layout: Layout::inner_page(),
        languages: Vec::new(),
    };
    Ok(Html(state.renderer.render(page, &context)?))
}

/// GET /about
pub async fn about(
    State(state): State<AppState>,
    Extension(session): Extension<VisitorSession>,
    headers: HeaderMap,
) -> Result<Html<String>, AppError> {
    render_inner_page(&state, session, &headers, Page::About).await
}

/// GET /work
pub async fn work(
    State(state): State<AppState>,
    Extension(session): Extension<VisitorSession>,
    headers: HeaderMap,
) -> Result<Html<String>, AppError> {
    render_inner_page(&state, session, &headers, Page::Work).await
}

/// GET /contact
pub async fn contact(
    State(state): State<AppState>,
    Extension(session): Extension<VisitorSession>,
    headers: HeaderMap,
) -> Result<Html<String>, AppError> {
    render_inner_page(&state, session, &headers, Page::Contact).await
}

/// GET /legal
pub async fn legal(
    State(state): State<AppState>,
    Extension(session): Extension<VisitorSession>,
    headers: HeaderMap,
) -> Result<Html<String>, AppError> {
    render_inner_page(&state, session, &headers, Page::Legal).await
}
