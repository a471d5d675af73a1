//! Folio web server
//!
//! Serves the portfolio pages over axum. Language resolution and arrival
//! classification come from `folio-core`; this crate owns configuration,
//! the session cookie, Handlebars rendering and HTTP error mapping.
//!
//! | Route | Page |
//! |---|---|
//! | `/` | landing (cold arrival) or presentation (warm) |
//! | `/language` | language selector, `?lang=xx` switches |
//! | `/about`, `/work`, `/contact`, `/legal` | inner pages |
//! | `/health` | liveness |
//! | `/static/*` | assets |

pub mod config;
pub mod error;
pub mod layout;
pub mod render;
pub mod router;
pub mod routes;
pub mod session;
pub mod state;

pub use config::{ConfigError, ServerConfig};
pub use error::AppError;
pub use router::build_router;
pub use state::AppState;
