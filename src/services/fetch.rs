//! `reqwest::blocking` implementation of [`Fetcher`] with browser-like
//! header profiles. Retail sites reject default client fingerprints, so the
//! profile is a functional requirement, not decoration.

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, REFERER, USER_AGENT};
use tracing::debug;

use crate::engine::{FetchedPage, Fetcher};
use crate::error::{Result, ScrapeError};
use crate::types::HeaderProfile;

const TIMEOUT_MS: u64 = 30_000;
const REDIRECT_LIMIT: usize = 10;

/// Arriving from a search engine looks far more organic than no referrer.
const SEARCH_REFERRER: &str = "https://www.google.com";

pub struct ReqwestFetcher {
    client: Client,
}

impl ReqwestFetcher {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .cookie_store(true)
            .gzip(true)
            .brotli(true)
            .deflate(true)
            .redirect(reqwest::redirect::Policy::limited(REDIRECT_LIMIT))
            .timeout(Duration::from_millis(TIMEOUT_MS))
            .build()
            .map_err(|e| ScrapeError::Other(format!("failed to build http client: {e}")))?;
        Ok(Self { client })
    }
}

impl Fetcher for ReqwestFetcher {
    fn name(&self) -> &'static str {
        "reqwest-blocking"
    }

    fn fetch(&self, url: &str, profile: HeaderProfile) -> Result<FetchedPage> {
        debug!(url, profile = ?profile, "fetching document");
        let resp = self
            .client
            .get(url)
            .headers(headers_for_profile(profile))
            .send()
            .map_err(|source| ScrapeError::transport(url, source))?;

        let status = resp.status().as_u16();
        let html = resp
            .text()
            .map_err(|source| ScrapeError::transport(url, source))?;

        debug!(url, status, bytes = html.len(), "document fetched");
        Ok(FetchedPage { status, html })
    }
}

/// Build the complete header map for a profile, User-Agent and referrer
/// included.
pub(crate) fn headers_for_profile(profile: HeaderProfile) -> HeaderMap {
    let mut headers = HeaderMap::new();

    for (k, v) in header_pairs_for_profile(profile) {
        let name = HeaderName::from_lowercase(k.to_ascii_lowercase().as_bytes())
            .unwrap_or_else(|_| HeaderName::from_static("accept"));
        if let Ok(value) = HeaderValue::from_str(v) {
            headers.insert(name, value);
        }
    }

    let ua = user_agent_for_profile(profile);
    headers.insert(
        USER_AGENT,
        HeaderValue::from_str(ua).unwrap_or(HeaderValue::from_static("Mozilla/5.0")),
    );
    headers.insert(REFERER, HeaderValue::from_static(SEARCH_REFERRER));

    headers
}

fn user_agent_for_profile(profile: HeaderProfile) -> &'static str {
    match profile {
        // Desktop Chrome on Windows; accepted everywhere
        HeaderProfile::Classic => {
            "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36"
        }
        // Edge on Windows, matching the sec-ch-ua suite below
        HeaderProfile::SecChUa => {
            "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/121.0.0.0 Safari/537.36 Edg/121.0.0.0"
        }
    }
}

fn header_pairs_for_profile(profile: HeaderProfile) -> Vec<(&'static str, &'static str)> {
    match profile {
        HeaderProfile::Classic => vec![
            ("Accept", "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8"),
            ("Accept-Language", "en-US,en;q=0.5"),
            ("Accept-Encoding", "gzip, deflate, br"),
            ("DNT", "1"),
            ("Connection", "keep-alive"),
            ("Upgrade-Insecure-Requests", "1"),
        ],
        HeaderProfile::SecChUa => vec![
            ("Accept", "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,image/apng,*/*;q=0.8,application/signed-exchange;v=b3;q=0.7"),
            ("Accept-Language", "en-US,en;q=0.9"),
            ("Accept-Encoding", "gzip, deflate, br"),
            ("Cache-Control", "no-cache"),
            ("Pragma", "no-cache"),
            ("Dnt", "1"),
            ("Sec-Ch-Ua", "\"Not A(Brand\";v=\"99\", \"Microsoft Edge\";v=\"121\", \"Chromium\";v=\"121\""),
            ("Sec-Ch-Ua-Mobile", "?0"),
            ("Sec-Ch-Ua-Platform", "\"Windows\""),
            ("Sec-Fetch-Dest", "document"),
            ("Sec-Fetch-Mode", "navigate"),
            ("Sec-Fetch-Site", "none"),
            ("Sec-Fetch-User", "?1"),
            ("Upgrade-Insecure-Requests", "1"),
        ],
    }
}
