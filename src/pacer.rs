//! # Request Pacing
//!
//! Rate limiting for outbound calls, expressed as a `Pacer` that callers await
//! before each rate-limited operation. Production code uses a governor token
//! bucket; tests inject `CountingPacer`, which only counts, so no real time passes.

use std::future::Future;
use std::sync::Arc;
#[cfg(test)]
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use tracing::{Instrument, debug_span};

/// Something that decides when the next rate-limited operation may start.
pub trait Pacer {
    /// Resolve once the next operation is allowed to proceed.
    fn ready(&self) -> impl Future<Output = ()> + Send;
}

impl<P: Pacer + Sync> Pacer for &P {
    fn ready(&self) -> impl Future<Output = ()> + Send {
        (**self).ready()
    }
}

/// Token-bucket pacer allowing one operation per `period`.
///
/// The first call resolves immediately; each later call waits until a full
/// period has elapsed since the previous one was admitted.
#[derive(Clone)]
pub struct GovernorPacer {
    limiter: Option<Arc<DefaultDirectRateLimiter>>,
}

impl GovernorPacer {
    /// Create a pacer admitting one operation per `period`. A zero period
    /// disables pacing.
    pub fn with_period(period: Duration) -> Self {
        let limiter = Quota::with_period(period).map(|quota| Arc::new(RateLimiter::direct(quota)));
        Self { limiter }
    }

    /// Create a pacer from a period in milliseconds.
    pub fn from_millis(millis: u64) -> Self {
        Self::with_period(Duration::from_millis(millis))
    }

    /// Whether this pacer ever waits.
    pub fn is_enabled(&self) -> bool {
        self.limiter.is_some()
    }
}

impl std::fmt::Debug for GovernorPacer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GovernorPacer")
            .field("enabled", &self.is_enabled())
            .finish()
    }
}

impl Pacer for GovernorPacer {
    async fn ready(&self) {
        if let Some(limiter) = &self.limiter {
            limiter.until_ready().instrument(debug_span!("limiter")).await;
        }
    }
}

/// Pacer that never waits and counts how often it was consulted.
#[cfg(test)]
#[derive(Debug, Clone, Default)]
pub(crate) struct CountingPacer {
    calls: Arc<AtomicUsize>,
}

#[cfg(test)]
impl CountingPacer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of times `ready` has been awaited.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
impl Pacer for CountingPacer {
    async fn ready(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}
