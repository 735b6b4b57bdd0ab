//! Boundary facade around the engine.
//!
//! The inbound contract is deliberately forgiving: input may arrive quoted,
//! percent-encoded or schemeless, and every outcome — including a blocked or
//! failed scrape — comes back as a (possibly empty) product list. Callers
//! who want the failure instead use [`scrape_listing`].

use tracing::{error, info, warn};

use crate::engine::{Engine, EngineOptions, Fetcher};
use crate::error::{Result, ScrapeError};
use crate::services::fetch::ReqwestFetcher;
use crate::types::{Listing, Product};

pub struct Components {
    pub fetcher: Box<dyn Fetcher>,
    pub opts: EngineOptions,
}

impl Components {
    pub fn new() -> Result<Self> {
        Ok(Self {
            fetcher: Box::new(ReqwestFetcher::new()?),
            opts: EngineOptions::default(),
        })
    }
}

/// Scrape a listing, swallowing failures into an empty list. Empty input is
/// "no results", not an error.
pub fn scrape(raw_url: &str, components: &Components) -> Vec<Product> {
    let Some(url) = normalize_input(raw_url) else {
        warn!("empty url provided");
        return Vec::new();
    };

    info!(url = %url, "received scraping request");
    match run_engine(&url, components) {
        Ok(listing) => listing.products,
        Err(e) => {
            error!(url = %url, error = %e, "scrape failed, returning empty list");
            Vec::new()
        }
    }
}

/// Error-surfacing variant of [`scrape`]: same input normalization, but
/// blocked access and transport failures propagate to the caller.
pub fn scrape_listing(raw_url: &str, components: &Components) -> Result<Listing> {
    let url = normalize_input(raw_url)
        .ok_or_else(|| ScrapeError::InvalidUrl("empty url".to_string()))?;
    run_engine(&url, components)
}

fn run_engine(url: &str, components: &Components) -> Result<Listing> {
    let engine = Engine::new(&*components.fetcher, components.opts);
    engine.scrape(url)
}

/// Strip wrapping quotes, percent-decode, and default the scheme to https.
fn normalize_input(raw: &str) -> Option<String> {
    let unquoted = raw.replace('"', "");
    let trimmed = unquoted.trim();
    let decoded = urlencoding::decode(trimmed)
        .map(|cow| cow.into_owned())
        .unwrap_or_else(|_| trimmed.to_string());

    let decoded = decoded.trim();
    if decoded.is_empty() {
        return None;
    }
    if decoded.starts_with("http://") || decoded.starts_with("https://") {
        Some(decoded.to_string())
    } else {
        Some(format!("https://{decoded}"))
    }
}
