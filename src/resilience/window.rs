//! Rolling window of recorded call outcomes.
//!
//! Count-based windows keep the last `size` outcomes; time-based windows keep
//! outcomes recorded within the last `size` seconds. Aggregate counters are
//! maintained incrementally so evaluating rates does not walk the window.

use std::collections::VecDeque;
use std::time::Duration;

use tokio::time::Instant;

use crate::config::SlidingWindowType;

/// Outcome of one call admitted by the breaker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallOutcome {
    pub failed: bool,
    pub slow: bool,
}

impl CallOutcome {
    /// Metric label for this outcome.
    pub fn label(&self) -> &'static str {
        match (self.failed, self.slow) {
            (false, false) => "success",
            (true, false) => "failure",
            (false, true) => "slow_success",
            (true, true) => "slow_failure",
        }
    }
}

/// Aggregate view of a window at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WindowSnapshot {
    pub total: u32,
    pub failed: u32,
    pub slow: u32,
}

impl WindowSnapshot {
    /// Failure rate in percent.
    pub fn failure_rate(&self) -> f32 {
        percentage(self.failed, self.total)
    }

    /// Slow-call rate in percent.
    pub fn slow_call_rate(&self) -> f32 {
        percentage(self.slow, self.total)
    }
}

fn percentage(part: u32, total: u32) -> f32 {
    if total == 0 {
        0.0
    } else {
        part as f32 * 100.0 / total as f32
    }
}

#[derive(Debug)]
pub struct OutcomeWindow {
    kind: SlidingWindowType,
    size: u32,
    entries: VecDeque<(Instant, CallOutcome)>,
    failed: u32,
    slow: u32,
}

impl OutcomeWindow {
    pub fn new(kind: SlidingWindowType, size: u32) -> Self {
        let capacity = match kind {
            SlidingWindowType::CountBased => size as usize,
            SlidingWindowType::TimeBased => 0,
        };
        Self {
            kind,
            size,
            entries: VecDeque::with_capacity(capacity),
            failed: 0,
            slow: 0,
        }
    }

    pub fn record(&mut self, now: Instant, outcome: CallOutcome) {
        self.entries.push_back((now, outcome));
        self.failed += outcome.failed as u32;
        self.slow += outcome.slow as u32;
        self.evict(now);
    }

    pub fn snapshot(&mut self, now: Instant) -> WindowSnapshot {
        self.evict(now);
        WindowSnapshot {
            total: self.entries.len() as u32,
            failed: self.failed,
            slow: self.slow,
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.failed = 0;
        self.slow = 0;
    }

    fn evict(&mut self, now: Instant) {
        match self.kind {
            SlidingWindowType::CountBased => {
                while self.entries.len() > self.size as usize {
                    self.pop_front();
                }
            }
            SlidingWindowType::TimeBased => {
                let span = Duration::from_secs(self.size as u64);
                while let Some((recorded_at, _)) = self.entries.front() {
                    if now.duration_since(*recorded_at) < span {
                        break;
                    }
                    self.pop_front();
                }
            }
        }
    }

    fn pop_front(&mut self) {
        if let Some((_, outcome)) = self.entries.pop_front() {
            self.failed -= outcome.failed as u32;
            self.slow -= outcome.slow as u32;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const OK: CallOutcome = CallOutcome { failed: false, slow: false };
    const FAIL: CallOutcome = CallOutcome { failed: true, slow: false };
    const SLOW_FAIL: CallOutcome = CallOutcome { failed: true, slow: true };

    #[test]
    fn test_count_based_keeps_last_n() {
        let now = Instant::now();
        let mut window = OutcomeWindow::new(SlidingWindowType::CountBased, 3);

        window.record(now, FAIL);
        window.record(now, FAIL);
        window.record(now, OK);
        assert_eq!(window.snapshot(now), WindowSnapshot { total: 3, failed: 2, slow: 0 });

        window.record(now, OK);
        window.record(now, SLOW_FAIL);
        let snapshot = window.snapshot(now);
        assert_eq!(snapshot, WindowSnapshot { total: 3, failed: 1, slow: 1 });
        assert!((snapshot.failure_rate() - 33.333).abs() < 0.01);
    }

    #[tokio::test(start_paused = true)]
    async fn test_time_based_expires_old_outcomes() {
        let mut window = OutcomeWindow::new(SlidingWindowType::TimeBased, 10);

        window.record(Instant::now(), FAIL);
        tokio::time::advance(Duration::from_secs(6)).await;
        window.record(Instant::now(), OK);
        assert_eq!(window.snapshot(Instant::now()).total, 2);

        tokio::time::advance(Duration::from_secs(5)).await;
        let snapshot = window.snapshot(Instant::now());
        assert_eq!(snapshot, WindowSnapshot { total: 1, failed: 0, slow: 0 });
    }

    #[test]
    fn test_empty_window_rates_are_zero() {
        let snapshot = WindowSnapshot::default();
        assert_eq!(snapshot.failure_rate(), 0.0);
        assert_eq!(snapshot.slow_call_rate(), 0.0);
    }

    #[test]
    fn test_outcome_labels() {
        assert_eq!(OK.label(), "success");
        assert_eq!(SLOW_FAIL.label(), "slow_failure");
    }
}
