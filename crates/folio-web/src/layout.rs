//! Layout flags handed to templates.

use axum::http::Uri;
use folio_core::Arrival;
use serde::Serialize;

/// How the shared layout presents a page.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Layout {
    /// `"cold"` or `"warm"`
    pub arrival: &'static str,
    /// Navigation header shown from the start
    pub show_header: bool,
    /// Warm request whose referer is this very page (a reload)
    pub revisit: bool,
}

impl Layout {
    pub fn for_arrival(arrival: Arrival, referer: Option<&str>, uri: &Uri) -> Self {
        let warm = !arrival.is_cold();
        let target = uri
            .path_and_query()
            .map(|pq| pq.as_str())
            .unwrap_or_else(|| uri.path());
        Self {
            arrival: arrival.as_str(),
            show_header: warm,
            revisit: warm && referer.is_some_and(|r| r.ends_with(target)),
        }
    }

    /// Inner pages always carry the navigation header.
    pub fn inner_page() -> Self {
        Self {
            arrival: Arrival::Warm.as_str(),
            show_header: true,
            revisit: false,
        }
    }
}
