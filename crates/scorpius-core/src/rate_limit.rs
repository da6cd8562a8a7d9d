//! Client-side throttling for explorer APIs with a per-call quota.
//!
//! [`RateLimitAvoider`] spaces permitted calls at least `per_call + margin`
//! apart, where `per_call` is the explorer's documented minimum and `margin`
//! covers jitter between our clock and the explorer's accounting.

use std::future::Future;
use std::time::Duration;

use governor::clock::{Clock, DefaultClock, ReasonablyRealtime};
use governor::middleware::NoOpMiddleware;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use tracing::debug;

use crate::error::CoreError;

/// Margin added on top of every provider interval.
pub const DEFAULT_SAFETY_MARGIN: Duration = Duration::from_millis(200);

type DirectRateLimiter<C> =
    RateLimiter<NotKeyed, InMemoryState, C, NoOpMiddleware<<C as Clock>::Instant>>;

/// A single-timer gate enforcing a minimum interval between permitted calls.
///
/// Backed by a burst-1 GCRA limiter, so the "time of last call" is updated
/// atomically and one avoider can be shared across tasks.
pub struct RateLimitAvoider<C: Clock = DefaultClock> {
    per_call: Duration,
    margin: Duration,
    clock: C,
    limiter: DirectRateLimiter<C>,
}

impl RateLimitAvoider {
    /// Create an avoider spacing calls `per_call + margin` apart.
    pub fn new(per_call: Duration, margin: Duration) -> Result<Self, CoreError> {
        Self::with_clock(per_call, margin, DefaultClock::default())
    }

    /// Create an avoider with [`DEFAULT_SAFETY_MARGIN`].
    pub fn with_default_margin(per_call: Duration) -> Result<Self, CoreError> {
        Self::new(per_call, DEFAULT_SAFETY_MARGIN)
    }
}

impl<C: Clock + Clone> RateLimitAvoider<C> {
    pub fn with_clock(per_call: Duration, margin: Duration, clock: C) -> Result<Self, CoreError> {
        let interval = per_call.checked_add(margin).ok_or_else(|| {
            CoreError::Config("rate limit interval overflows a Duration".to_owned())
        })?;
        let quota = Quota::with_period(interval).ok_or_else(|| {
            CoreError::Config("rate limit interval must be greater than zero".to_owned())
        })?;

        Ok(Self {
            per_call,
            margin,
            limiter: RateLimiter::direct_with_clock(quota, clock.clone()),
            clock,
        })
    }

    /// The provider's minimum duration between calls, without margin.
    pub fn per_call(&self) -> Duration {
        self.per_call
    }

    pub fn margin(&self) -> Duration {
        self.margin
    }

    /// Effective spacing between permitted calls.
    pub fn interval(&self) -> Duration {
        self.per_call + self.margin
    }

    /// Take a permit if one is available right now.
    ///
    /// On refusal, returns how long the caller would have to wait.
    pub fn try_acquire(&self) -> Result<(), Duration> {
        self.limiter
            .check()
            .map_err(|not_until| not_until.wait_time_from(self.clock.now()))
    }
}

impl<C: ReasonablyRealtime + Clone> RateLimitAvoider<C> {
    /// Wait until a call is permitted, then consume the permit.
    ///
    /// Waiting is never an error; dropping the future cancels the wait
    /// without consuming a permit.
    pub async fn acquire(&self) {
        if let Err(wait) = self.try_acquire() {
            debug!(
                wait_ms = wait.as_millis() as u64,
                interval_ms = self.interval().as_millis() as u64,
                "rate limit: delaying call"
            );
            self.limiter.until_ready().await;
        }
    }

    /// Acquire a permit, then drive `call` to completion.
    pub async fn throttle<F, T>(&self, call: F) -> T
    where
        F: Future<Output = T>,
    {
        self.acquire().await;
        call.await
    }
}

impl<C: Clock> std::fmt::Debug for RateLimitAvoider<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateLimitAvoider")
            .field("per_call", &self.per_call)
            .field("margin", &self.margin)
            .finish_non_exhaustive()
    }
}
