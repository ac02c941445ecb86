use crate::error::{Result, ScanError};
use async_trait::async_trait;
use rand::Rng;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, error, info, warn};
use url::Url;

/// Outcome of fetching one URL, after retries.
#[derive(Debug)]
pub enum FetchOutcome {
    Success { status_code: u16, body: String },
    RetryableFailure { cause: ScanError },
    FatalFailure { cause: ScanError },
}

impl FetchOutcome {
    /// The page body, if the fetch succeeded.
    pub fn into_body(self) -> Option<String> {
        match self {
            FetchOutcome::Success { body, .. } => Some(body),
            _ => None,
        }
    }
}

/// Anything that can turn a URL into a [`FetchOutcome`].
///
/// Implementations never return an error: every failure is folded into the
/// outcome so that one bad page cannot abort a crawl.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &Url) -> FetchOutcome;
}

/// Retry, backoff and throttling parameters for [`HttpFetcher`].
#[derive(Debug, Clone)]
pub struct FetchPolicy {
    /// Total attempts per URL, including the first one.
    pub max_attempts: u32,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Backoff before retrying after attempt `i` is `backoff_base * 2^i` plus jitter.
    pub backoff_base: Duration,
    /// Upper bound of the uniform random jitter added to each backoff.
    pub jitter: Duration,
    /// Pause after every attempt, whatever its outcome.
    pub throttle: Duration,
    pub max_redirects: usize,
}

impl Default for FetchPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            timeout: Duration::from_secs(10),
            backoff_base: Duration::from_secs(1),
            jitter: Duration::from_secs(1),
            throttle: Duration::from_secs(1),
            max_redirects: 10,
        }
    }
}

impl FetchPolicy {
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_backoff(mut self, base: Duration, jitter: Duration) -> Self {
        self.backoff_base = base;
        self.jitter = jitter;
        self
    }

    pub fn with_throttle(mut self, throttle: Duration) -> Self {
        self.throttle = throttle;
        self
    }

    /// Delay to wait after a retryable failure on attempt `attempt` (0-indexed).
    pub fn backoff_delay(&self, attempt: u32) -> Duration {
        let exponential = self
            .backoff_base
            .saturating_mul(2u32.saturating_pow(attempt));
        let jitter = self.jitter.mul_f64(rand::rng().random_range(0.0..1.0));
        exponential.saturating_add(jitter)
    }
}

/// [`PageFetcher`] backed by a pooled reqwest client.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    policy: FetchPolicy,
}

impl HttpFetcher {
    pub fn new() -> Result<Self> {
        Self::with_policy(FetchPolicy::default())
    }

    pub fn with_policy(policy: FetchPolicy) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("Sitemapper/", env!("CARGO_PKG_VERSION")))
            .connect_timeout(policy.timeout)
            .pool_max_idle_per_host(50)
            .pool_idle_timeout(Duration::from_secs(90))
            .tcp_keepalive(Duration::from_secs(60))
            .redirect(reqwest::redirect::Policy::limited(policy.max_redirects))
            .build()?;

        Ok(Self { client, policy })
    }

    /// A single GET, with no retry and no throttle.
    async fn attempt(&self, url: &Url) -> Result<(u16, String)> {
        let response = self
            .client
            .get(url.as_str())
            .timeout(self.policy.timeout)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScanError::BadStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        Ok((status.as_u16(), body))
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &Url) -> FetchOutcome {
        let max_attempts = self.policy.max_attempts.max(1);
        let mut attempt = 0;

        loop {
            let result = self.attempt(url).await;

            let outcome = match result {
                Ok((status_code, body)) => {
                    debug!("Fetched {} ({})", url, status_code);
                    Some(FetchOutcome::Success { status_code, body })
                }
                Err(cause) if cause.is_retryable() => {
                    warn!("Error fetching {}: {}", url, cause);
                    if attempt + 1 < max_attempts {
                        let wait = self.policy.backoff_delay(attempt);
                        info!("Retrying {} in {:.2} seconds...", url, wait.as_secs_f64());
                        tokio::time::sleep(wait).await;
                        None
                    } else {
                        error!("Max retries reached for {}", url);
                        Some(FetchOutcome::RetryableFailure { cause })
                    }
                }
                Err(cause) => {
                    error!("Unexpected error fetching {}: {}", url, cause);
                    Some(FetchOutcome::FatalFailure { cause })
                }
            };

            tokio::time::sleep(self.policy.throttle).await;

            if let Some(outcome) = outcome {
                return outcome;
            }
            attempt += 1;
        }
    }
}
