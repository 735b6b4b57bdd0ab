use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Domain(pub String);

static HOST_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^https?://(?:www\.)?([^/]+)").expect("valid host regex"));

impl Domain {
    /// Canonicalize host to a stable key: lowercase + IDNA/Punycode
    fn canonicalize(host: &str) -> String {
        let lower = host.to_ascii_lowercase();
        idna::domain_to_ascii(&lower).unwrap_or(lower)
    }

    /// Registrable host of an absolute http(s) URL. `None` for anything that
    /// is not http(s) syntax; callers route that to the generic ruleset.
    /// Invariant to a leading `www.` and to `http` vs `https`.
    pub fn classify(url: &str) -> Option<Self> {
        HOST_RE
            .captures(url)
            .map(|caps| Domain(Self::canonicalize(&caps[1])))
    }
}

/// Which browser fingerprint a fetch should carry. The header tables live in
/// `services::fetch`; sites pick a profile per request kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HeaderProfile {
    /// Long-standing desktop Chrome fingerprint. Default for every site.
    Classic,
    /// Edge fingerprint with the full sec-ch-ua suite, used for Amazon
    /// pagination fetches.
    SecChUa,
}

/// One normalized product record. Field names mirror the JSON the service
/// has always returned, so serialization is camelCase and absent fields stay
/// explicit nulls. `category`, `brand`, `rating` and `review_count` are
/// reserved: no current ruleset fills them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub name: Option<String>,
    pub price: Option<f64>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub product_url: Option<String>,
    pub website: Option<String>,
    pub category: Option<String>,
    pub brand: Option<String>,
    pub rating: Option<f64>,
    pub review_count: Option<u64>,
}

/// Accumulates the fields pulled off one candidate element. Nothing becomes
/// a [`Product`] until [`ProductDraft::finish`] runs the acceptance rule.
#[derive(Debug, Default)]
pub struct ProductDraft {
    name: Option<String>,
    price: Option<f64>,
    description: Option<String>,
    image_url: Option<String>,
    product_url: Option<String>,
}

#[derive(Debug)]
pub enum DraftOutcome {
    Accepted(Box<Product>),
    Rejected(RejectReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    MissingName,
    MissingPrice,
    /// Price text was found but did not survive cleaning and parsing.
    /// Skips the candidate on every site, strict or not.
    UnparseablePrice,
}

impl ProductDraft {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, value: Option<String>) -> Self {
        self.name = value;
        self
    }

    pub fn price(mut self, value: Option<f64>) -> Self {
        self.price = value;
        self
    }

    pub fn description(mut self, value: Option<String>) -> Self {
        self.description = value;
        self
    }

    pub fn image_url(mut self, value: Option<String>) -> Self {
        self.image_url = value;
        self
    }

    pub fn product_url(mut self, value: Option<String>) -> Self {
        self.product_url = value;
        self
    }

    /// Finalize the draft. With `require_complete` the candidate must carry
    /// a non-empty name and a parsed price; without it partial records pass
    /// through (Walmart and the generic ruleset accept those).
    pub fn finish(self, website: Option<&str>, require_complete: bool) -> DraftOutcome {
        if require_complete {
            match self.name.as_deref() {
                Some(n) if !n.is_empty() => {}
                _ => return DraftOutcome::Rejected(RejectReason::MissingName),
            }
            if self.price.is_none() {
                return DraftOutcome::Rejected(RejectReason::MissingPrice);
            }
        }
        DraftOutcome::Accepted(Box::new(Product {
            name: self.name,
            price: self.price,
            description: self.description,
            image_url: self.image_url,
            product_url: self.product_url,
            website: website.map(str::to_string),
            ..Product::default()
        }))
    }
}

/// Why a pagination run (or a single-page scrape) ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// The site has no pagination; one page is the whole listing.
    SinglePage,
    /// A page produced zero candidate containers: no more results.
    Exhausted,
    /// Hit the hard page cap.
    PageCap,
    /// Hit the hard product cap.
    ProductCap,
    /// A bot-detection signal appeared after the first page.
    Blocked,
    /// A later page could not be fetched; earlier pages are kept.
    FetchFailed,
}

/// Everything one scrape produced, in discovery order.
#[derive(Debug, Clone, Serialize)]
pub struct Listing {
    pub url: String,
    pub website: Option<String>,
    pub products: Vec<Product>,
    pub pages_fetched: u32,
    pub stopped: StopReason,
    pub fetched_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub ok: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}
impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            ok: true,
            data: Some(data),
            error: None,
        }
    }
    pub fn err(msg: impl Into<String>) -> Self {
        Self {
            ok: false,
            data: None,
            error: Some(msg.into()),
        }
    }
}
