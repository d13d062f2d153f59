//! Bounded polling policy.
//!
//! # Invariants
//! - `check` runs at most `max_attempts` times.
//! - The sleeper is never invoked after the final attempt.
//! - An `Err` from `check` stops polling immediately.

use std::time::Duration;

pub const DEFAULT_MAX_ATTEMPTS: u32 = 10;
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(1);

/// Waits between polling attempts.
pub trait Sleeper {
    fn sleep(&self, duration: Duration);
}

/// Sleeper backed by `std::thread::sleep`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Terminal outcome of a polling loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome<T> {
    Ready { value: T, attempts: u32 },
    Exhausted { attempts: u32 },
}

/// Fixed-interval retry policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    interval: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            interval: DEFAULT_INTERVAL,
        }
    }
}

impl RetryPolicy {
    /// Creates a policy; `max_attempts` is clamped to at least one.
    pub fn new(max_attempts: u32, interval: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            interval,
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Runs `check` until it yields a value or attempts run out.
    pub fn poll<T, E>(
        &self,
        sleeper: &dyn Sleeper,
        mut check: impl FnMut(u32) -> Result<Option<T>, E>,
    ) -> Result<PollOutcome<T>, E> {
        for attempt in 1..=self.max_attempts {
            if let Some(value) = check(attempt)? {
                return Ok(PollOutcome::Ready {
                    value,
                    attempts: attempt,
                });
            }
            if attempt < self.max_attempts {
                sleeper.sleep(self.interval);
            }
        }
        Ok(PollOutcome::Exhausted {
            attempts: self.max_attempts,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{PollOutcome, RetryPolicy, Sleeper};
    use std::cell::RefCell;
    use std::time::Duration;

    #[derive(Default)]
    struct RecordingSleeper {
        waits: RefCell<Vec<Duration>>,
    }

    impl Sleeper for RecordingSleeper {
        fn sleep(&self, duration: Duration) {
            self.waits.borrow_mut().push(duration);
        }
    }

    #[test]
    fn ready_on_third_attempt_sleeps_twice() {
        let sleeper = RecordingSleeper::default();
        let policy = RetryPolicy::new(5, Duration::from_millis(200));

        let outcome: Result<_, ()> =
            policy.poll(&sleeper, |attempt| Ok((attempt == 3).then_some("done")));

        assert_eq!(
            outcome,
            Ok(PollOutcome::Ready {
                value: "done",
                attempts: 3
            })
        );
        assert_eq!(sleeper.waits.borrow().len(), 2);
    }

    #[test]
    fn exhausted_never_sleeps_after_last_attempt() {
        let sleeper = RecordingSleeper::default();
        let policy = RetryPolicy::new(3, Duration::from_millis(10));

        let outcome: Result<PollOutcome<()>, ()> = policy.poll(&sleeper, |_| Ok(None));

        assert_eq!(outcome, Ok(PollOutcome::Exhausted { attempts: 3 }));
        assert_eq!(sleeper.waits.borrow().len(), 2);
    }

    #[test]
    fn error_stops_polling() {
        let sleeper = RecordingSleeper::default();
        let mut calls = 0;
        let outcome: Result<PollOutcome<()>, &str> =
            RetryPolicy::default().poll(&sleeper, |_| {
                calls += 1;
                Err("offline")
            });

        assert_eq!(outcome, Err("offline"));
        assert_eq!(calls, 1);
        assert!(sleeper.waits.borrow().is_empty());
    }

    #[test]
    fn zero_attempts_is_clamped_to_one() {
        assert_eq!(RetryPolicy::new(0, Duration::ZERO).max_attempts(), 1);
    }
}
