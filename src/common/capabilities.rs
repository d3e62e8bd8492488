use serde::Serialize;
use serde_json::{json, Value};

/// Browser capabilities sent in the `alwaysMatch` field of the session
/// creation payload.
///
/// # Example:
/// ```rust
/// use selenite::DesiredCapabilities;
///
/// let mut caps = DesiredCapabilities::chrome();
/// caps.set_headless();
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(transparent)]
pub struct DesiredCapabilities {
    capabilities: Value,
}

impl DesiredCapabilities {
    /// Wrap an arbitrary capabilities object, e.g. one loaded from a
    /// config file.
    pub fn new(capabilities: Value) -> Self {
        DesiredCapabilities { capabilities }
    }

    pub fn chrome() -> Self {
        DesiredCapabilities {
            capabilities: json!({
                "browserName": "chrome",
                "goog:chromeOptions": { "args": [] }
            }),
        }
    }

    pub fn firefox() -> Self {
        DesiredCapabilities {
            capabilities: json!({
                "browserName": "firefox",
                "moz:firefoxOptions": { "args": [] }
            }),
        }
    }

    /// Ask the browser to run without a visible window. Supported for the
    /// chrome and firefox presets.
    pub fn set_headless(&mut self) {
        for key in &["goog:chromeOptions", "moz:firefoxOptions"] {
            if let Some(args) = self.capabilities[*key]["args"].as_array_mut() {
                args.push(json!("--headless"));
            }
        }
    }

    pub fn as_value(&self) -> &Value {
        &self.capabilities
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn headless_appends_browser_arg() {
        let mut caps = DesiredCapabilities::chrome();
        caps.set_headless();
        assert_eq!(
            caps.as_value()["goog:chromeOptions"]["args"],
            json!(["--headless"])
        );
    }

    #[test]
    fn custom_capabilities_pass_through() {
        let caps = DesiredCapabilities::new(json!({ "browserName": "safari" }));
        assert_eq!(caps.as_value()["browserName"], "safari");
    }
}
