//! Arrival classification
//!
//! Decides from request headers alone whether a request is a visitor's first
//! entry into the site (cold) or a navigation inside it (warm). Rules, first
//! match wins:
//!
//! 1. no `Sec-Fetch-Site`, `Origin` or `Referer` at all: cold
//! 2. `Sec-Fetch-Site`: `same-origin`/`same-site` warm, `none`/`cross-site` cold
//! 3. `Origin`: warm if its host is the request host, otherwise cold
//! 4. `Referer`: same comparison as `Origin`
//! 5. cold
//!
//! Anything ambiguous or unparseable ends up cold.

use http::header::{HeaderMap, HeaderName, HOST, ORIGIN, REFERER};
use url::Url;

const SEC_FETCH_SITE: HeaderName = HeaderName::from_static("sec-fetch-site");

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Arrival {
    /// First arrival from outside the site
    Cold,
    /// Navigation from a page of this site
    Warm,
}

impl Arrival {
    pub fn is_cold(self) -> bool {
        self == Arrival::Cold
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Arrival::Cold => "cold",
            Arrival::Warm => "warm",
        }
    }
}

/// The request fields classification looks at.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RequestMetadata {
    pub sec_fetch_site: Option<String>,
    pub origin: Option<String>,
    pub referer: Option<String>,
    /// `host[:port]` the request was addressed to
    pub host: Option<String>,
}

impl RequestMetadata {
    /// Snapshot the relevant headers. `authority` is used as the host when
    /// there is no `Host` header (HTTP/2 requests carry it in the URI).
    pub fn from_headers(headers: &HeaderMap, authority: Option<&str>) -> Self {
        let value = |name: &HeaderName| {
            headers
                .get(name)
                .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned())
        };

        Self {
            sec_fetch_site: value(&SEC_FETCH_SITE),
            origin: value(&ORIGIN),
            referer: value(&REFERER),
            host: value(&HOST).or_else(|| authority.map(str::to_string)),
        }
    }

    fn has_navigation_headers(&self) -> bool {
        self.sec_fetch_site.is_some() || self.origin.is_some() || self.referer.is_some()
    }
}

/// Classify a request. Never fails; same input, same answer.
pub fn classify_arrival(meta: &RequestMetadata) -> Arrival {
    if !meta.has_navigation_headers() {
        return Arrival::Cold;
    }

    if let Some(site) = meta.sec_fetch_site.as_deref() {
        let site = site.trim();
        if site.eq_ignore_ascii_case("same-origin") || site.eq_ignore_ascii_case("same-site") {
            return Arrival::Warm;
        }
        if site.eq_ignore_ascii_case("none") || site.eq_ignore_ascii_case("cross-site") {
            return Arrival::Cold;
        }
    }

    let host = meta.host.as_deref();
    let non_empty = |v: &&str| !v.trim().is_empty();

    if let Some(origin) = meta.origin.as_deref().filter(non_empty) {
        return if same_host(origin, host) {
            Arrival::Warm
        } else {
            Arrival::Cold
        };
    }

    if let Some(referer) = meta.referer.as_deref().filter(non_empty) {
        return if same_host(referer, host) {
            Arrival::Warm
        } else {
            Arrival::Cold
        };
    }

    Arrival::Cold
}

/// Whether `url` points at the host the request was sent to.
fn same_host(url: &str, request_host: Option<&str>) -> bool {
    let Some(request_host) = request_host else {
        return false;
    };
    let Ok(url) = Url::parse(url.trim()) else {
        return false;
    };
    let Some(url_host) = url.host_str() else {
        return false;
    };

    let (host, port) = split_authority(request_host);
    if !url_host.eq_ignore_ascii_case(host) {
        return false;
    }

    match port {
        Some(port) => url.port_or_known_default() == Some(port),
        // `Url::port` is None for the scheme's default port
        None => url.port().is_none(),
    }
}

/// Split `host[:port]`, keeping IPv6 brackets on the host.
fn split_authority(authority: &str) -> (&str, Option<u16>) {
    let authority = authority.trim();

    if let Some(rest) = authority.strip_prefix('[') {
        return match rest.find(']') {
            Some(end) => {
                let host = &authority[..end + 2];
                let port = rest[end + 1..]
                    .strip_prefix(':')
                    .and_then(|p| p.parse().ok());
                (host, port)
            }
            None => (authority, None),
        };
    }

    match authority.rsplit_once(':') {
        Some((host, port)) => match port.parse() {
            Ok(port) => (host, Some(port)),
            Err(_) => (authority, None),
        },
        None => (authority, None),
    }
}
