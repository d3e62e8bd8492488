use std::path::Path;
use std::time::Duration;

use log::{info, warn};
use serde::Deserialize;
use serde_json::Value;

use crate::common::capabilities::DesiredCapabilities;
use crate::common::command::SelectorStrategy;
use crate::common::config::{ElementPolicy, WebDriverConfig};
use crate::error::WebDriverResult;
use crate::query::ElementPoller;

/// Default config file name, looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "selenite.json";

const DEFAULT_REMOTE_URL: &str = "http://localhost:4444";
const DEFAULT_RETRY_TIMEOUT_MS: u64 = 10_000;
const DEFAULT_POLL_INTERVAL_MS: u64 = 500;
const DEFAULT_STARTUP_TIMEOUT_MS: u64 = 10_000;

/// Element defaults from the config file. Durations are integer
/// milliseconds.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ElementSettings {
    pub selector_type: SelectorStrategy,
    pub ignore_not_found: bool,
    pub retry_timeout_ms: u64,
    pub poll_interval_ms: u64,
}

impl Default for ElementSettings {
    fn default() -> Self {
        ElementSettings {
            selector_type: SelectorStrategy::Css,
            ignore_not_found: false,
            retry_timeout_ms: DEFAULT_RETRY_TIMEOUT_MS,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
        }
    }
}

/// WebDriver server settings from the config file.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DriverSettings {
    pub browser: String,
    pub binary_path: String,
    pub remote_url: String,
    pub startup_timeout_ms: u64,
    /// When true, the caller starts the driver process; the launcher is
    /// not used.
    pub manual_start: bool,
    pub capabilities: Option<Value>,
}

impl Default for DriverSettings {
    fn default() -> Self {
        DriverSettings {
            browser: "chrome".to_string(),
            binary_path: "chromedriver".to_string(),
            remote_url: DEFAULT_REMOTE_URL.to_string(),
            startup_timeout_ms: DEFAULT_STARTUP_TIMEOUT_MS,
            manual_start: false,
            capabilities: None,
        }
    }
}

/// Client configuration loaded from a JSON file.
///
/// Missing fields fall back to defaults field by field, with a warning
/// for values that had to be corrected; a missing file yields the full
/// default configuration. Loading never writes to disk.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub soft_asserts: bool,
    pub element: ElementSettings,
    pub webdriver: DriverSettings,
}

impl ClientConfig {
    /// Load configuration from the given file, or defaults if it does not
    /// exist.
    pub fn load(path: impl AsRef<Path>) -> WebDriverResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            info!(
                "no config file found at {:?}; using default config",
                path
            );
            return Ok(ClientConfig::default().validated());
        }

        let data = std::fs::read_to_string(path)?;
        Self::from_json(&data)
    }

    /// Parse configuration from a JSON string.
    pub fn from_json(data: &str) -> WebDriverResult<Self> {
        let config: ClientConfig = serde_json::from_str(data)?;
        Ok(config.validated())
    }

    fn validated(mut self) -> Self {
        if self.element.retry_timeout_ms == 0 {
            warn!(
                "\"retry_timeout_ms\" is not set; defaulting to {}ms",
                DEFAULT_RETRY_TIMEOUT_MS
            );
            self.element.retry_timeout_ms = DEFAULT_RETRY_TIMEOUT_MS;
        }
        if self.element.poll_interval_ms == 0 {
            warn!(
                "\"poll_interval_ms\" is not set; defaulting to {}ms",
                DEFAULT_POLL_INTERVAL_MS
            );
            self.element.poll_interval_ms = DEFAULT_POLL_INTERVAL_MS;
        }
        if self.webdriver.remote_url.is_empty() {
            warn!(
                "\"remote_url\" is not set; defaulting to {:?}",
                DEFAULT_REMOTE_URL
            );
            self.webdriver.remote_url = DEFAULT_REMOTE_URL.to_string();
        }
        if self.webdriver.startup_timeout_ms == 0 {
            warn!(
                "\"startup_timeout_ms\" is not set; defaulting to {}ms",
                DEFAULT_STARTUP_TIMEOUT_MS
            );
            self.webdriver.startup_timeout_ms = DEFAULT_STARTUP_TIMEOUT_MS;
        }
        self
    }

    /// The element retry/poll policy described by this config.
    pub fn element_policy(&self) -> ElementPolicy {
        ElementPolicy {
            retry_timeout: Duration::from_millis(self.element.retry_timeout_ms),
            poll_interval: Duration::from_millis(self.element.poll_interval_ms),
            ignore_not_found: self.element.ignore_not_found,
        }
    }

    /// The per-session configuration described by this config.
    pub fn webdriver_config(&self) -> WebDriverConfig {
        let policy = self.element_policy();
        WebDriverConfig {
            default_selector: self.element.selector_type,
            element_policy: policy,
            query_poller: ElementPoller::TimeoutWithInterval(
                policy.retry_timeout,
                policy.poll_interval,
            ),
            soft_asserts: self.soft_asserts,
        }
    }

    /// Capabilities for session creation: the configured capabilities
    /// object if present, otherwise a preset for the configured browser.
    pub fn capabilities(&self) -> DesiredCapabilities {
        match &self.webdriver.capabilities {
            Some(caps) => DesiredCapabilities::new(caps.clone()),
            None if self.webdriver.browser == "firefox" => DesiredCapabilities::firefox(),
            None => DesiredCapabilities::chrome(),
        }
    }

    pub fn startup_timeout(&self) -> Duration {
        Duration::from_millis(self.webdriver.startup_timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_when_fields_are_missing() {
        let config = ClientConfig::from_json(r#"{ "soft_asserts": true }"#).unwrap();
        assert!(config.soft_asserts);
        assert_eq!(config.element.retry_timeout_ms, 10_000);
        assert_eq!(config.element.poll_interval_ms, 500);
        assert_eq!(config.webdriver.remote_url, "http://localhost:4444");
        assert_eq!(config.element.selector_type, SelectorStrategy::Css);
    }

    #[test]
    fn zero_durations_fall_back_with_defaults() {
        let config = ClientConfig::from_json(
            r#"{ "element": { "retry_timeout_ms": 0, "poll_interval_ms": 0 } }"#,
        )
        .unwrap();
        assert_eq!(config.element.retry_timeout_ms, 10_000);
        assert_eq!(config.element.poll_interval_ms, 500);
    }

    #[test]
    fn selector_type_parses_wire_names() {
        let config = ClientConfig::from_json(
            r#"{ "element": { "selector_type": "xpath", "retry_timeout_ms": 2000 } }"#,
        )
        .unwrap();
        assert_eq!(config.element.selector_type, SelectorStrategy::XPath);
        let policy = config.element_policy();
        assert_eq!(policy.retry_timeout, Duration::from_secs(2));
    }

    #[test]
    fn invalid_json_is_an_error() {
        assert!(ClientConfig::from_json("{ not json").is_err());
    }

    #[test]
    fn missing_file_yields_defaults() {
        let config = ClientConfig::load("definitely-not-a-real-config.json").unwrap();
        assert!(!config.soft_asserts);
        assert_eq!(
            config.webdriver_config().element_policy.poll_interval,
            Duration::from_millis(500)
        );
    }

    #[test]
    fn capabilities_follow_the_configured_browser() {
        let config = ClientConfig::from_json(r#"{ "webdriver": { "browser": "firefox" } }"#)
            .unwrap();
        assert_eq!(
            config.capabilities().as_value()["browserName"],
            "firefox"
        );
    }
}
