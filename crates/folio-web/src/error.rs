//! HTTP error mapping.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use folio_core::ResolveError;
use thiserror::Error;

use crate::render::TemplateError;

/// Anything that stops a page from rendering completely.
#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error(transparent)]
    Template(#[from] TemplateError),

    #[error("session store error: {0}")]
    Session(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self, "Request failed");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Something went wrong, please try again later.",
        )
            .into_response()
    }
}
