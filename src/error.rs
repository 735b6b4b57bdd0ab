use thiserror::Error;

pub type Result<T> = std::result::Result<T, ScrapeError>;

#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("invalid url: {0}")]
    InvalidUrl(String),

    /// The target site actively refused automated access: HTTP 403, a
    /// CAPTCHA interstitial, or a known-strict site returning nothing at
    /// all. The message is user-facing and names an alternative site when
    /// one exists.
    #[error("{0}")]
    BlockedAccess(String),

    #[error("failed to connect to {url}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{0}")]
    Other(String),
}

impl ScrapeError {
    pub fn transport(url: &str, source: reqwest::Error) -> Self {
        ScrapeError::Transport {
            url: url.to_string(),
            source,
        }
    }
}
