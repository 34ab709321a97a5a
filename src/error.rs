use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// The webhook URL is not an absolute URI.
    #[error("invalid webhook URL {url:?}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("invalid webhook token: {0}")]
    InvalidToken(String),
    #[error("could not serialize message: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("the thread making the blocking request panicked")]
    HelperThread,
}
