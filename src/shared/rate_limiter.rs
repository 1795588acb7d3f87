use std::future::Future;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;
use tokio::time::Instant;

/// Response types that can tell the limiter they were rejected for rate reasons.
pub trait ThrottleSignal {
    /// True when the upstream answered "429 Too Many Requests"
    fn is_throttled(&self) -> bool;

    /// Server-supplied wait hint (`Retry-After`), if any
    fn retry_after(&self) -> Option<Duration>;
}

impl ThrottleSignal for reqwest::Response {
    fn is_throttled(&self) -> bool {
        self.status() == reqwest::StatusCode::TOO_MANY_REQUESTS
    }

    fn retry_after(&self) -> Option<Duration> {
        self.headers()
            .get(reqwest::header::RETRY_AFTER)?
            .to_str()
            .ok()?
            .trim()
            .parse::<u64>()
            .ok()
            .map(Duration::from_secs)
    }
}

/// RateLimiter paces requests to a fixed number per minute.
///
/// Every call reserves the next free slot before it sleeps, so concurrent
/// callers queue up behind each other instead of bursting. A throttled
/// response pushes the next free slot forward for everybody, not just for
/// the caller that was rejected.
///
/// The limiter composes with a bounded worker pool: the pool caps how many
/// requests are in flight, the limiter caps how fast new ones start.
pub struct RateLimiter {
    interval: Duration,
    next_slot: Mutex<Option<Instant>>,
    base_backoff: Duration,
    max_retries: u32,
}

impl RateLimiter {
    /// Retries granted to a single call after a 429
    pub const MAX_RETRIES: u32 = 3;

    /// Backoff unit when the server does not send `Retry-After`
    pub const BASE_BACKOFF: Duration = Duration::from_secs(10);

    /// Creates a limiter allowing `requests_per_minute` request starts per minute
    pub fn per_minute(requests_per_minute: u32) -> Self {
        Self {
            interval: Duration::from_secs(60) / requests_per_minute.max(1),
            next_slot: Mutex::new(None),
            base_backoff: Self::BASE_BACKOFF,
            max_retries: Self::MAX_RETRIES,
        }
    }

    /// Minimum spacing between two request starts
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Reserves the next free slot and returns the instant the caller may start
    fn reserve_slot(&self) -> Instant {
        let now = Instant::now();
        let mut next = self.next_slot.lock().unwrap_or_else(PoisonError::into_inner);
        let slot = match *next {
            Some(reserved) if reserved > now => reserved,
            _ => now,
        };
        *next = Some(slot + self.interval);
        slot
    }

    /// Moves the next free slot to `until` unless it is already later
    fn defer_future_slots(&self, until: Instant) {
        let mut next = self.next_slot.lock().unwrap_or_else(PoisonError::into_inner);
        if next.map_or(true, |reserved| reserved < until) {
            *next = Some(until);
        }
    }

    /// Runs `send` inside the rate budget.
    ///
    /// Errors from `send` are returned untouched. A throttled response is
    /// retried up to [`Self::MAX_RETRIES`] times, waiting
    /// `attempt x (Retry-After or BASE_BACKOFF)` each time; once the retries
    /// are used up the last throttled response is handed back to the caller.
    pub async fn execute<F, Fut, R, E>(&self, mut send: F) -> Result<R, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<R, E>>,
        R: ThrottleSignal,
    {
        let mut attempt: u32 = 0;

        loop {
            let slot = self.reserve_slot();
            tokio::time::sleep_until(slot).await;

            let response = send().await?;
            if !response.is_throttled() || attempt >= self.max_retries {
                return Ok(response);
            }

            attempt += 1;
            let wait = response.retry_after().unwrap_or(self.base_backoff) * attempt;
            self.defer_future_slots(Instant::now() + wait);
        }
    }
}
