use std::thread;
use std::time::{Duration, Instant};

/// Retry strategy for element resolution and explicit waits.
#[derive(Debug, Clone)]
pub enum ElementPoller {
    /// No polling, single attempt.
    NoWait,
    /// Poll up to the specified timeout, with the specified interval
    /// between attempts.
    TimeoutWithInterval(Duration, Duration),
    /// Poll for a fixed number of attempts, with the specified interval
    /// between them.
    NumTriesWithInterval(u32, Duration),
    /// Poll up to the specified timeout, but never fewer than the
    /// specified number of attempts.
    TimeoutWithIntervalAndMinTries(Duration, Duration, u32),
}

impl ElementPoller {
    /// Start the clock on this strategy.
    pub fn start(&self) -> ElementPollerTicker {
        ElementPollerTicker::new(self.clone())
    }
}

/// Drives one polling loop for an [`ElementPoller`] strategy.
///
/// `tick()` is called after each failed attempt: it sleeps until the next
/// attempt is due and reports whether the strategy allows another one.
/// Sleeps maintain a cadence relative to the first attempt rather than a
/// fixed delay, so slow remote calls do not stretch the overall deadline.
pub struct ElementPollerTicker {
    timeout: Option<Duration>,
    interval: Option<Duration>,
    min_tries: u32,
    start: Instant,
    cur_tries: u32,
}

impl ElementPollerTicker {
    pub fn new(poller: ElementPoller) -> Self {
        let (timeout, interval, min_tries) = match poller {
            ElementPoller::NoWait => (None, None, 0),
            ElementPoller::TimeoutWithInterval(timeout, interval) => {
                (Some(timeout), Some(interval), 0)
            }
            ElementPoller::NumTriesWithInterval(num_tries, interval) => {
                (None, Some(interval), num_tries)
            }
            ElementPoller::TimeoutWithIntervalAndMinTries(timeout, interval, num_tries) => {
                (Some(timeout), Some(interval), num_tries)
            }
        };

        Self {
            timeout,
            interval,
            min_tries,
            start: Instant::now(),
            cur_tries: 0,
        }
    }

    /// Time since the first attempt started.
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Record a finished attempt and, if another is allowed, sleep until
    /// it is due. Returns false once the strategy is exhausted.
    pub fn tick(&mut self) -> bool {
        self.cur_tries += 1;

        let deadline_passed = match self.timeout {
            Some(t) => self.start.elapsed() >= t,
            None => true,
        };
        if deadline_passed && self.cur_tries >= self.min_tries {
            return false;
        }

        if let Some(interval) = self.interval {
            // The next attempt is due this long after the first one started.
            let due = interval * self.cur_tries;
            let elapsed = self.start.elapsed();
            if elapsed < due {
                thread::sleep(due - elapsed);
            }
        }

        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_wait_allows_a_single_attempt() {
        let mut ticker = ElementPoller::NoWait.start();
        assert!(!ticker.tick());
    }

    #[test]
    fn timeout_with_interval_stops_at_the_deadline() {
        let mut ticker = ElementPoller::TimeoutWithInterval(
            Duration::from_millis(50),
            Duration::from_millis(10),
        )
        .start();

        let mut ticks = 0;
        while ticker.tick() {
            ticks += 1;
            assert!(ticks < 100, "ticker did not terminate");
        }
        assert!(ticker.elapsed() >= Duration::from_millis(50));
        // One interval of slop: the final sleep may land just past the
        // deadline before tick() observes it.
        assert!(ticker.elapsed() < Duration::from_millis(250));
    }

    #[test]
    fn min_tries_outlives_an_expired_deadline() {
        let mut ticker = ElementPoller::TimeoutWithIntervalAndMinTries(
            Duration::from_millis(0),
            Duration::from_millis(1),
            3,
        )
        .start();

        assert!(ticker.tick());
        assert!(ticker.tick());
        assert!(!ticker.tick());
    }

    #[test]
    fn num_tries_counts_attempts() {
        let mut ticker =
            ElementPoller::NumTriesWithInterval(2, Duration::from_millis(1)).start();
        assert!(ticker.tick());
        assert!(!ticker.tick());
    }
}
