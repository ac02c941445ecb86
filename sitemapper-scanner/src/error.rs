use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Unexpected status {status} from {url}")]
    BadStatus { url: String, status: u16 },

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

impl ScanError {
    /// Whether another fetch attempt could plausibly succeed.
    ///
    /// Connection failures, timeouts, redirect loops, non-2xx statuses and
    /// errors while reading the response are transient. Everything else
    /// (bad scheme, a request that cannot be built, ...) is fatal.
    pub fn is_retryable(&self) -> bool {
        match self {
            ScanError::HttpError(e) => {
                e.is_connect()
                    || e.is_timeout()
                    || e.is_redirect()
                    || e.is_request()
                    || e.is_status()
                    || e.is_body()
                    || e.is_decode()
            }
            ScanError::BadStatus { .. } => true,
            ScanError::InvalidUrl(_) => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, ScanError>;
