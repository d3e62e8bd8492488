use std::time::Duration;

use crate::common::command::SelectorStrategy;
use crate::query::ElementPoller;

/// Retry/poll policy applied to element resolution and waits.
///
/// Policies are immutable values. Operations that need to tolerate a
/// missing element derive an effective policy via
/// [`with_ignore_not_found`](ElementPolicy::with_ignore_not_found) and pass
/// it down explicitly; the policy stored on an element or session is never
/// mutated behind the caller's back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ElementPolicy {
    /// Maximum wall-clock time a resolution retry loop may take.
    pub retry_timeout: Duration,
    /// Delay between successive resolution attempts or condition checks.
    pub poll_interval: Duration,
    /// Whether a "no such element" response is reported as an empty result
    /// rather than an error.
    pub ignore_not_found: bool,
}

impl ElementPolicy {
    pub fn new(retry_timeout: Duration, poll_interval: Duration) -> Self {
        ElementPolicy {
            retry_timeout,
            poll_interval,
            ignore_not_found: false,
        }
    }

    pub fn with_ignore_not_found(mut self, ignore: bool) -> Self {
        self.ignore_not_found = ignore;
        self
    }
}

impl Default for ElementPolicy {
    fn default() -> Self {
        ElementPolicy {
            retry_timeout: Duration::from_secs(10),
            poll_interval: Duration::from_millis(500),
            ignore_not_found: false,
        }
    }
}

/// Per-session configuration shared by the session and every element
/// derived from it.
#[derive(Debug, Clone)]
pub struct WebDriverConfig {
    /// Strategy used when an element is created from a bare selector
    /// string.
    pub default_selector: SelectorStrategy,
    /// Policy copied onto newly created elements.
    pub element_policy: ElementPolicy,
    /// Default poller for `wait_until()`-style waits.
    pub query_poller: ElementPoller,
    /// When true, classified failures are recorded on the session instead
    /// of tearing it down.
    pub soft_asserts: bool,
}

impl WebDriverConfig {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Default for WebDriverConfig {
    fn default() -> Self {
        let policy = ElementPolicy::default();
        WebDriverConfig {
            default_selector: SelectorStrategy::Css,
            element_policy: policy,
            query_poller: ElementPoller::TimeoutWithInterval(
                policy.retry_timeout,
                policy.poll_interval,
            ),
            soft_asserts: false,
        }
    }
}
