//! Bot-detection signals: blocking status codes and CAPTCHA interstitials.

use once_cell::sync::Lazy;
use scraper::{Html, Selector};

use crate::error::ScrapeError;
use crate::sites::Site;

pub const HTTP_FORBIDDEN: u16 = 403;

/// Amazon serves its CAPTCHA interstitial as a form posting back to
/// /errors/validateCaptcha.
static CAPTCHA_FORM: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("form[action='/errors/validateCaptcha']").expect("valid captcha selector")
});

/// True when the document is a CAPTCHA interstitial instead of a listing.
pub fn is_captcha_page(doc: &Html) -> bool {
    doc.select(&CAPTCHA_FORM).next().is_some()
}

/// Error for a 403 on the very first fetch, before any site ruleset ran.
pub fn forbidden() -> ScrapeError {
    ScrapeError::BlockedAccess(
        "This website is blocking automated access. \
         Try a different website or use their official API if available."
            .to_string(),
    )
}

/// Error for a site that identified us as a bot. Amazon's message points at
/// eBay, which tolerates listing scrapes far better.
pub fn blocked(site: Site) -> ScrapeError {
    let message = match site {
        Site::Amazon => "Amazon is blocking automated access. Please try using eBay instead \
                         (https://www.ebay.com/sch/i.html?_nkw=laptop)."
            .to_string(),
        other => format!(
            "{} is blocking automated access. Try a different website or use their official \
             API if available.",
            other.label().unwrap_or("This website")
        ),
    };
    ScrapeError::BlockedAccess(message)
}
