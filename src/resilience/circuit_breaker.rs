//! Circuit breaker for downstream dependency protection.
//!
//! # States
//! - Closed: normal operation, calls pass through and are recorded
//! - Open: dependency assumed unhealthy, calls fail fast
//! - Half-Open: a limited number of trial calls test recovery
//!
//! # State Transitions
//! ```text
//! Closed → Open: failure rate or slow-call rate >= threshold once the window is evaluable
//! Open → Half-Open: first permission request after the open-state wait
//! Half-Open → Closed: every permitted trial succeeded without being slow
//! Half-Open → Open: first failing or slow trial
//! ```
//!
//! # Design Decisions
//! - One breaker per dependency name, shared through the registry
//! - State lives behind a short-lived mutex, never held across an await
//! - Outcomes of calls admitted before a transition are discarded
//! - A call dropped before completion is recorded as a failure

use std::future::Future;
use std::time::Duration;

use parking_lot::Mutex;
use thiserror::Error;
use tokio::time::Instant;

use crate::config::{CircuitBreakerConfig, SlidingWindowType};
use crate::observability::metrics;
use crate::resilience::window::{CallOutcome, OutcomeWindow, WindowSnapshot};

/// Hold used when the configured open-state wait does not fit in an `Instant`.
const FAR_FUTURE: Duration = Duration::from_secs(86_400 * 365 * 30);

/// Externally visible breaker state.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CircuitState {
    Closed = 0,
    Open = 1,
    HalfOpen = 2,
}

impl CircuitState {
    pub fn as_str(&self) -> &'static str {
        match self {
            CircuitState::Closed => "closed",
            CircuitState::Open => "open",
            CircuitState::HalfOpen => "half_open",
        }
    }
}

impl std::fmt::Display for CircuitState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned by [`CircuitBreaker::call`].
#[derive(Debug, Error)]
pub enum BreakerError<E> {
    /// The breaker refused to attempt the call.
    #[error("circuit breaker '{name}' is open")]
    Open { name: String },

    /// The call was attempted and failed; the failure has been recorded.
    #[error("{0}")]
    Inner(E),
}

impl<E> BreakerError<E> {
    pub fn is_open(&self) -> bool {
        matches!(self, BreakerError::Open { .. })
    }
}

/// Point-in-time statistics of a breaker.
#[derive(Debug, Clone, PartialEq)]
pub struct BreakerMetrics {
    pub state: CircuitState,
    /// Failure rate in percent, `None` until enough calls are buffered.
    pub failure_rate: Option<f32>,
    /// Slow-call rate in percent, `None` until enough calls are buffered.
    pub slow_call_rate: Option<f32>,
    pub buffered_calls: u32,
    pub failed_calls: u32,
    pub slow_calls: u32,
    pub not_permitted_calls: u64,
}

#[derive(Debug)]
enum StateData {
    Closed,
    Open { until: Instant },
    HalfOpen { admitted: u32, succeeded: u32 },
}

impl StateData {
    fn kind(&self) -> CircuitState {
        match self {
            StateData::Closed => CircuitState::Closed,
            StateData::Open { .. } => CircuitState::Open,
            StateData::HalfOpen { .. } => CircuitState::HalfOpen,
        }
    }
}

#[derive(Debug)]
struct Inner {
    state: StateData,
    window: OutcomeWindow,
    /// Bumped on every transition; permits from older generations are stale.
    generation: u64,
    not_permitted: u64,
}

/// Admission ticket for one call.
#[derive(Debug, Clone, Copy)]
struct Permit {
    generation: u64,
    started: Instant,
}

/// Records a permit as failed if the call is dropped before completing.
struct CallGuard<'a> {
    breaker: &'a CircuitBreaker,
    permit: Option<Permit>,
}

impl CallGuard<'_> {
    fn complete(mut self, failed: bool) {
        if let Some(permit) = self.permit.take() {
            self.breaker.on_result(permit, failed);
        }
    }
}

impl Drop for CallGuard<'_> {
    fn drop(&mut self) {
        if let Some(permit) = self.permit.take() {
            tracing::debug!(name = %self.breaker.name, "Call abandoned before completion");
            self.breaker.on_result(permit, true);
        }
    }
}

/// A named circuit breaker guarding one downstream dependency.
#[derive(Debug)]
pub struct CircuitBreaker {
    name: String,
    config: CircuitBreakerConfig,
    inner: Mutex<Inner>,
}

impl CircuitBreaker {
    /// Create a closed breaker with an empty window.
    pub fn new(name: impl Into<String>, config: CircuitBreakerConfig) -> Self {
        let name = name.into();
        let window = OutcomeWindow::new(config.sliding_window_type, config.sliding_window_size);
        metrics::record_breaker_state(&name, CircuitState::Closed as u8);
        Self {
            name,
            config,
            inner: Mutex::new(Inner {
                state: StateData::Closed,
                window,
                generation: 0,
                not_permitted: 0,
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn config(&self) -> &CircuitBreakerConfig {
        &self.config
    }

    /// Current state. An elapsed open-state wait is only acted on by the next call.
    pub fn state(&self) -> CircuitState {
        self.inner.lock().state.kind()
    }

    /// Run `f` under the breaker.
    ///
    /// Rejected calls return [`BreakerError::Open`] without invoking `f`.
    /// Admitted calls are timed and their outcome recorded before returning.
    pub async fn call<F, Fut, T, E>(&self, f: F) -> Result<T, BreakerError<E>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let permit = match self.acquire_permission() {
            Some(permit) => permit,
            None => {
                metrics::record_breaker_call(&self.name, "not_permitted");
                return Err(BreakerError::Open {
                    name: self.name.clone(),
                });
            }
        };

        let guard = CallGuard {
            breaker: self,
            permit: Some(permit),
        };
        let result = f().await;
        guard.complete(result.is_err());

        result.map_err(BreakerError::Inner)
    }

    /// Statistics of the current state's window.
    pub fn metrics(&self) -> BreakerMetrics {
        let mut inner = self.inner.lock();
        let snapshot = inner.window.snapshot(Instant::now());
        let evaluable = snapshot.total >= self.minimum_calls();
        BreakerMetrics {
            state: inner.state.kind(),
            failure_rate: evaluable.then(|| snapshot.failure_rate()),
            slow_call_rate: evaluable.then(|| snapshot.slow_call_rate()),
            buffered_calls: snapshot.total,
            failed_calls: snapshot.failed,
            slow_calls: snapshot.slow,
            not_permitted_calls: inner.not_permitted,
        }
    }

    /// Return to a fresh closed state.
    pub fn reset(&self) {
        let mut inner = self.inner.lock();
        self.transition(&mut inner, StateData::Closed, WindowSnapshot::default());
        inner.not_permitted = 0;
    }

    fn minimum_calls(&self) -> u32 {
        match self.config.sliding_window_type {
            SlidingWindowType::CountBased => self
                .config
                .minimum_number_of_calls
                .min(self.config.sliding_window_size),
            SlidingWindowType::TimeBased => self.config.minimum_number_of_calls,
        }
    }

    fn acquire_permission(&self) -> Option<Permit> {
        let now = Instant::now();
        let mut guard = self.inner.lock();
        let inner = &mut *guard;

        let admitted = match &mut inner.state {
            StateData::Closed => true,
            StateData::Open { until } => {
                if now >= *until {
                    self.transition(
                        inner,
                        StateData::HalfOpen { admitted: 1, succeeded: 0 },
                        WindowSnapshot::default(),
                    );
                    true
                } else {
                    false
                }
            }
            StateData::HalfOpen { admitted, .. } => {
                if *admitted < self.config.permitted_calls_in_half_open_state {
                    *admitted += 1;
                    true
                } else {
                    false
                }
            }
        };

        if admitted {
            Some(Permit {
                generation: inner.generation,
                started: now,
            })
        } else {
            inner.not_permitted += 1;
            None
        }
    }

    fn on_result(&self, permit: Permit, failed: bool) {
        let now = Instant::now();
        let outcome = CallOutcome {
            failed,
            slow: now.duration_since(permit.started) > self.config.slow_call_duration(),
        };

        let mut guard = self.inner.lock();
        let inner = &mut *guard;
        if permit.generation != inner.generation {
            tracing::trace!(
                name = %self.name,
                outcome = outcome.label(),
                "Discarding stale outcome"
            );
            return;
        }
        metrics::record_breaker_call(&self.name, outcome.label());

        match &mut inner.state {
            StateData::Closed => {
                inner.window.record(now, outcome);
                let snapshot = inner.window.snapshot(now);
                if snapshot.total >= self.minimum_calls()
                    && (snapshot.failure_rate() >= self.config.failure_rate_threshold
                        || snapshot.slow_call_rate() >= self.config.slow_call_rate_threshold)
                {
                    let until = self.open_until(now);
                    self.transition(inner, StateData::Open { until }, snapshot);
                }
            }
            StateData::HalfOpen { succeeded, .. } => {
                inner.window.record(now, outcome);
                if outcome.failed || outcome.slow {
                    let snapshot = inner.window.snapshot(now);
                    let until = self.open_until(now);
                    self.transition(inner, StateData::Open { until }, snapshot);
                } else {
                    *succeeded += 1;
                    if *succeeded >= self.config.permitted_calls_in_half_open_state {
                        let snapshot = inner.window.snapshot(now);
                        self.transition(inner, StateData::Closed, snapshot);
                    }
                }
            }
            StateData::Open { .. } => {}
        }
    }

    /// End of the open-state hold starting at `now`.
    fn open_until(&self, now: Instant) -> Instant {
        now.checked_add(self.config.wait_duration_in_open_state())
            .unwrap_or_else(|| now + FAR_FUTURE)
    }

    /// Enter `to` with a fresh window. Returns whether the visible state changed.
    fn transition(&self, inner: &mut Inner, to: StateData, snapshot: WindowSnapshot) -> bool {
        let from = inner.state.kind();
        let to_kind = to.kind();

        inner.state = to;
        inner.generation += 1;
        inner.window.clear();

        if from == to_kind {
            return false;
        }

        metrics::record_breaker_state(&self.name, to_kind as u8);
        metrics::record_breaker_transition(&self.name, to_kind.as_str());

        if to_kind == CircuitState::Open {
            tracing::warn!(
                name = %self.name,
                from = %from,
                to = %to_kind,
                failure_rate = snapshot.failure_rate(),
                slow_call_rate = snapshot.slow_call_rate(),
                buffered_calls = snapshot.total,
                "Circuit breaker opened"
            );
        } else {
            tracing::info!(
                name = %self.name,
                from = %from,
                to = %to_kind,
                "Circuit breaker state changed"
            );
        }
        true
    }
}
