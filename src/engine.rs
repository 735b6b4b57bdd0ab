use std::time::Duration;

use chrono::Utc;
use scraper::Html;
use tracing::{debug, info, warn};
use url::Url;

use crate::error::{Result, ScrapeError};
use crate::guard;
use crate::sites::{extract_listing, Pagination, Site};
use crate::types::{HeaderProfile, Listing, Product, StopReason};

/// Hard caps every pagination run honors, plus a delay override so tests
/// (and embedders who know what they are doing) can run without pacing.
#[derive(Debug, Clone, Copy)]
pub struct EngineOptions {
    pub max_pages: u32,
    pub max_products: usize,
    /// `None` uses the site's own pacing delay.
    pub page_delay_override: Option<Duration>,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            max_pages: 20,
            max_products: 1000,
            page_delay_override: None,
        }
    }
}

/// A fetched document plus the status it arrived with. Non-2xx statuses are
/// data here, not errors; the engine decides what they mean.
#[derive(Debug, Clone)]
pub struct FetchedPage {
    pub status: u16,
    pub html: String,
}

pub trait Fetcher: Send + Sync {
    fn name(&self) -> &'static str;
    fn fetch(&self, url: &str, profile: HeaderProfile) -> Result<FetchedPage>;
}

pub struct Engine<'a> {
    pub fetcher: &'a dyn Fetcher,
    pub opts: EngineOptions,
}

impl<'a> Engine<'a> {
    pub fn new(fetcher: &'a dyn Fetcher, opts: EngineOptions) -> Self {
        Self { fetcher, opts }
    }

    /// Classify the URL, dispatch to the site's ruleset, paginate where the
    /// site supports it, and return every record in discovery order. An
    /// empty product list is a valid outcome, never an error — except on
    /// Amazon, where coming away empty-handed means we were blocked.
    pub fn scrape(&self, url: &str) -> Result<Listing> {
        Url::parse(url).map_err(|_| ScrapeError::InvalidUrl(url.to_string()))?;

        let domain = crate::types::Domain::classify(url);
        let site = Site::classify(domain.as_ref());
        info!(url, site = ?site, fetcher = self.fetcher.name(), "scraping listing");

        let first = self.fetcher.fetch(url, HeaderProfile::Classic)?;
        if first.status == guard::HTTP_FORBIDDEN {
            warn!(url, "access forbidden (403) on first fetch");
            return Err(guard::forbidden());
        }

        let doc = Html::parse_document(&first.html);
        if site.serves_captcha() && guard::is_captcha_page(&doc) {
            warn!(url, "CAPTCHA interstitial on first page");
            return Err(guard::blocked(site));
        }

        let (products, pages_fetched, stopped) = match site.pagination() {
            Some(cfg) => Paginator {
                fetcher: self.fetcher,
                site,
                base_url: url,
                cfg,
                opts: self.opts,
            }
            .run(doc),
            None => {
                let harvest = extract_listing(&doc, site);
                (harvest.products, 1, StopReason::SinglePage)
            }
        };

        // A full Amazon walk that produced nothing is a block, not an empty
        // catalog; the site always pads real result pages.
        if site == Site::Amazon && products.is_empty() {
            warn!(url, "no Amazon records after pagination, treating as blocked");
            return Err(guard::blocked(site));
        }

        info!(url, count = products.len(), pages_fetched, stopped = ?stopped, "scrape finished");
        Ok(Listing {
            url: url.to_string(),
            website: site.label().map(str::to_string),
            products,
            pages_fetched,
            stopped,
            fetched_at: Utc::now(),
        })
    }
}

/// Walks listing pages for a paginating site. Page 1 reuses the document the
/// orchestrator already fetched; every later page is fetched fresh after the
/// pacing delay. Whatever was accumulated when a stop condition fires is
/// returned, never discarded.
struct Paginator<'a> {
    fetcher: &'a dyn Fetcher,
    site: Site,
    base_url: &'a str,
    cfg: Pagination,
    opts: EngineOptions,
}

impl Paginator<'_> {
    fn run(self, first_page: Html) -> (Vec<Product>, u32, StopReason) {
        let mut products: Vec<Product> = Vec::new();
        let mut pages_fetched = 1u32;
        let mut page = 1u32;
        let mut doc = first_page;

        let stopped = loop {
            // The orchestrator already screened page 1.
            if page > 1 && self.site.serves_captcha() && guard::is_captcha_page(&doc) {
                warn!(site = ?self.site, page, "CAPTCHA on later page, keeping partial results");
                break StopReason::Blocked;
            }

            let harvest = extract_listing(&doc, self.site);
            if harvest.candidates == 0 {
                debug!(site = ?self.site, page, "no candidate containers, assuming end of results");
                break StopReason::Exhausted;
            }
            products.extend(harvest.products);

            if products.len() >= self.opts.max_products {
                products.truncate(self.opts.max_products);
                break StopReason::ProductCap;
            }
            if page >= self.opts.max_pages {
                break StopReason::PageCap;
            }

            page += 1;
            self.pause();

            doc = match self.fetch_page(page) {
                Ok(page_doc) => page_doc,
                Err(reason) => break reason,
            };
            pages_fetched += 1;
        };

        (products, pages_fetched, stopped)
    }

    /// Scheduled-delay step: pace before every subsequent-page fetch. This
    /// blocks the request's worker thread, like the rest of the pipeline.
    fn pause(&self) {
        let delay = self.opts.page_delay_override.unwrap_or(self.cfg.delay);
        if !delay.is_zero() {
            std::thread::sleep(delay);
        }
    }

    fn fetch_page(&self, page: u32) -> std::result::Result<Html, StopReason> {
        let separator = if self.base_url.contains('?') { '&' } else { '?' };
        let url = format!("{}{}{}={}", self.base_url, separator, self.cfg.page_param, page);
        debug!(url = %url, page, "fetching listing page");

        match self.fetcher.fetch(&url, self.cfg.profile) {
            Ok(fetched) if fetched.status < 400 => Ok(Html::parse_document(&fetched.html)),
            Ok(fetched) => {
                warn!(url = %url, status = fetched.status, "listing page fetch rejected");
                Err(StopReason::FetchFailed)
            }
            Err(e) => {
                warn!(url = %url, error = %e, "listing page fetch failed");
                Err(StopReason::FetchFailed)
            }
        }
    }
}
