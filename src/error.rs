use thiserror::Error;

/// Failures reported by the catalog client.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The catalog answered 429 Too Many Requests.
    #[error("rate limited by catalog")]
    RateLimited,

    /// Any other non-success status. Never retried.
    #[error("HTTP {status}: {reason}")]
    Http { status: u16, reason: String },

    /// Connection, TLS or body transfer failure.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The body was not the JSON shape the catalog documents.
    #[error("malformed catalog response: {0}")]
    Decode(#[from] serde_json::Error),

    /// The page held no displayable records once filtered.
    #[error("No artworks found")]
    EmptyResult,

    /// Every attempt allowed by the retry policy failed.
    #[error("gave up after {attempts} attempts: {last}")]
    RetriesExhausted {
        attempts: u32,
        #[source]
        last: Box<FetchError>,
    },
}

impl FetchError {
    /// Whether another attempt may succeed.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::RateLimited | Self::Network(_))
    }
}
