//! Caller-initiated repeats of a failed search with exponential backoff.
//!
//! The core never retries on its own. The CLI opts in with `--retries N`,
//! and each attempt is a full [`Desk::run`], so the store goes through
//! `loading → failed → loading → …` like any other repeated search.
//!
//! # Backoff Strategy
//!
//! ```text
//! delay = min(base_delay * 2^(attempt-1), max_delay) + random_jitter(0..=jitter)
//! ```
//!
//! Only [`SearchError::RequestFailed`] is repeated; a malformed response or
//! an unknown provider will not change on a second try.

use rand::{Rng, rng};
use std::time::{Duration, Instant};
use tokio::time::sleep;
use tracing::{error, instrument, warn};

use crate::desk::{Desk, SearchRequest};
use crate::search::{SearchError, Transport};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Backoff {
    /// Repeats after the first attempt; zero disables retrying.
    pub max_retries: usize,
    /// Delay before the first repeat, doubled each time.
    pub base_delay: Duration,
    /// Cap on the exponential part of the delay.
    pub max_delay: Duration,
    /// Upper bound of the random jitter added to every delay.
    pub jitter: Duration,
}

impl Backoff {
    pub fn new(max_retries: usize, base_delay: Duration) -> Self {
        Self {
            max_retries,
            base_delay,
            max_delay: Duration::from_secs(30),
            jitter: Duration::from_millis(250),
        }
    }

    /// Delay before repeat number `attempt` (1-based), without jitter.
    pub fn delay(&self, attempt: usize) -> Duration {
        let shift = attempt.saturating_sub(1).min(31) as u32;
        self.base_delay.saturating_mul(1 << shift).min(self.max_delay)
    }

    fn jittered(&self, attempt: usize) -> Duration {
        let jitter_ms: u64 = rng().random_range(0..=self.jitter.as_millis() as u64);
        self.delay(attempt) + Duration::from_millis(jitter_ms)
    }
}

/// Run `request` on `desk`, repeating retryable failures per `backoff`.
#[instrument(level = "info", skip_all, fields(provider = %request.provider, max = backoff.max_retries))]
pub async fn run_with_retries<T: Transport>(
    desk: &mut Desk<T>,
    request: &SearchRequest,
    backoff: &Backoff,
) -> Result<usize, SearchError> {
    let total_t0 = Instant::now();
    let mut attempt = 0usize;

    loop {
        match desk.run(request).await {
            Ok(count) => return Ok(count),
            Err(e) if !e.is_retryable() => return Err(e),
            Err(e) => {
                attempt += 1;
                if attempt > backoff.max_retries {
                    if backoff.max_retries > 0 {
                        error!(
                            attempt,
                            elapsed_ms_total = total_t0.elapsed().as_millis() as u64,
                            error = %e,
                            "search exhausted retries"
                        );
                    }
                    return Err(e);
                }

                let delay = backoff.jittered(attempt);
                warn!(attempt, ?delay, error = %e, "search failed; backing off");
                sleep(delay).await;
            }
        }
    }
}
