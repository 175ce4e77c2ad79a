//! Map short-link resolution.
//!
//! Shortened map links carry no coordinate pattern, so they must be expanded
//! before parsing. Resolution is an I/O-bound network round trip; everything
//! here collapses failures into one error class so the check-in and branch
//! registration flows can surface "could not resolve link" without crashing.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::redirect::Policy;
use reqwest::Client;
use thiserror::Error;
use tracing::{debug, warn};
use url::Url;

use crate::geo::{parse_coordinates, Coordinate};

/// Short-link hosts used by the map provider.
const SHORT_LINK_HOSTS: &[&str] = &["maps.app.goo.gl", "goo.gl", "g.co"];

/// Errors that can occur while resolving a short link.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Resolved content contained no coordinates")]
    NoCoordinates,
}

/// What a resolver hands back: the expanded URL plus, as a fallback, any
/// body text worth scanning for a coordinate pattern.
#[derive(Debug, Clone)]
pub struct Resolved {
    /// Final URL after following redirects
    pub final_url: String,

    /// Response body, if the final URL itself carries no coordinates
    pub body: Option<String>,
}

/// Anything that can expand a short URL.
///
/// The production implementation follows redirects over HTTP; tests
/// substitute a canned resolver. Any service satisfying "resolve the
/// redirect chain and return the resulting URL or content" fits.
#[async_trait]
pub trait RedirectResolver: Send + Sync {
    async fn resolve(&self, url: &str) -> Result<Resolved, ResolveError>;
}

/// Configuration for the HTTP resolver.
#[derive(Debug, Clone)]
pub struct ResolverConfig {
    /// Bound on the whole round trip; the flow must never sit in a stuck
    /// "resolving" state
    pub timeout: Duration,

    /// User agent string
    pub user_agent: String,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            user_agent: format!("presence-agent/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Redirect-following resolver backed by reqwest.
pub struct HttpResolver {
    client: Client,
}

impl HttpResolver {
    pub fn new(config: ResolverConfig) -> Result<Self, ResolveError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .redirect(Policy::limited(10))
            .user_agent(config.user_agent)
            .build()?;
        Ok(Self { client })
    }

    pub fn with_defaults() -> Result<Self, ResolveError> {
        Self::new(ResolverConfig::default())
    }
}

#[async_trait]
impl RedirectResolver for HttpResolver {
    async fn resolve(&self, url: &str) -> Result<Resolved, ResolveError> {
        debug!("Resolving short link {}", url);
        let response = self.client.get(url).send().await?;
        let final_url = response.url().to_string();
        let body = response.text().await.ok();
        Ok(Resolved { final_url, body })
    }
}

/// Whether a URL points at a known map short-link host.
pub fn is_short_link(input: &str) -> bool {
    let Ok(url) = Url::parse(input) else {
        return false;
    };
    match url.host_str() {
        Some(host) => SHORT_LINK_HOSTS.contains(&host),
        None => false,
    }
}

/// Extract a coordinate from location input, expanding short links first.
///
/// Non-link input and full map links are parsed directly. Short links go
/// through the resolver; the expanded URL is parsed first and the raw body
/// is the fallback. Network failure or unparseable content both end in an
/// error the caller reports to the user; no panic, no partial state.
pub async fn resolve_and_parse(
    resolver: &dyn RedirectResolver,
    input: &str,
) -> Result<Coordinate, ResolveError> {
    if !is_short_link(input) {
        return parse_coordinates(input).ok_or(ResolveError::NoCoordinates);
    }

    let resolved = resolver.resolve(input).await.inspect_err(|e| {
        warn!("Short link resolution failed for {}: {}", input, e);
    })?;

    if let Some(coord) = parse_coordinates(&resolved.final_url) {
        return Ok(coord);
    }
    if let Some(body) = &resolved.body {
        if let Some(coord) = parse_coordinates(body) {
            return Ok(coord);
        }
    }

    Err(ResolveError::NoCoordinates)
}
