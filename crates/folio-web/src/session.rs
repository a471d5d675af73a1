//! Session cookie middleware
//!
//! Every page request is tied to a session. The id travels in the
//! `folio_session` cookie; an unknown or expired id gets a fresh session and a
//! new cookie. Handlers read the session from the request extensions as
//! [`VisitorSession`].

use std::time::Duration;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use folio_core::SessionId;
use uuid::Uuid;

use crate::error::AppError;
use crate::state::AppState;

pub const SESSION_COOKIE: &str = "folio_session";

/// The session attached to the current request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VisitorSession {
    pub id: SessionId,
    /// Created by this request
    pub is_new: bool,
}

/// Attributes of the session cookie.
#[derive(Clone, Copy, Debug)]
pub struct SessionCookie {
    max_age: Duration,
    secure: bool,
}

impl SessionCookie {
    pub fn new(max_age: Duration, secure: bool) -> Self {
        Self { max_age, secure }
    }

    /// Persistent, `HttpOnly`, `SameSite=Lax` cookie for `id`.
    pub fn build(&self, id: SessionId) -> Cookie<'static> {
        let max_age = i64::try_from(self.max_age.as_secs()).unwrap_or(i64::MAX);
        Cookie::build((SESSION_COOKIE, id.to_string()))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .secure(self.secure)
            .max_age(time::Duration::seconds(max_age))
            .build()
    }
}

/// Load the visitor's session, creating one when needed.
pub async fn session_layer(
    State(state): State<AppState>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let presented = jar
        .get(SESSION_COOKIE)
        .and_then(|cookie| Uuid::parse_str(cookie.value()).ok());

    let live = match presented {
        Some(id) => state.sessions().exists(id).await?.then_some(id),
        None => None,
    };

    let (session, jar) = match live {
        Some(id) => (VisitorSession { id, is_new: false }, jar),
        None => {
            let id = state.sessions().create().await?;
            if presented.is_some() {
                tracing::debug!(session_id = %id, "Replacing unknown or expired session");
            }
            (
                VisitorSession { id, is_new: true },
                jar.add(state.cookie.build(id)),
            )
        }
    };

    request.extensions_mut().insert(session);
    let response = next.run(request).await;
    Ok((jar, response).into_response())
}
