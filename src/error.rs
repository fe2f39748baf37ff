use thiserror::Error;

/// Every way a backend fetch can fail. The UI collapses all of them into a
/// single "could not load" message per fetch site.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("http {status}: {body}")]
    Status { status: u16, body: String },

    #[error("backend reported failure: {0}")]
    Api(String),

    #[error("invalid json: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("invalid url: {0}")]
    Url(String),
}

pub type FetchResult<T> = Result<T, FetchError>;
