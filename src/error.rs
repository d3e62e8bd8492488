use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::common::response::ResponseValue;

pub type WebDriverResult<T> = Result<T, WebDriverError>;

/// The structured error object a WebDriver server returns in the `value`
/// field of a failed response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebDriverErrorInfo {
    #[serde(default)]
    pub error: String,
    #[serde(default)]
    pub message: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub stacktrace: String,
}

impl fmt::Display for WebDriverErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:?}: {:?}", self.error, self.message)
    }
}

/// All error conditions surfaced by this crate.
///
/// Variants carrying a [`WebDriverErrorInfo`] correspond 1:1 to WebDriver
/// error codes; the remaining variants are produced by this library itself
/// (misuse, transport failures, and the resolution/wait deadlines).
#[derive(Debug, Error)]
pub enum WebDriverError {
    #[error("invalid parameters: {0}")]
    InvalidParameters(String),
    #[error("failed to execute request: {0}")]
    FailedRequest(String),
    #[error("failed to decode response: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unexpected response from the WebDriver server: {0}")]
    UnknownResponse(String),
    #[error("failed to decode screenshot data: {0}")]
    Base64Decode(#[from] base64::DecodeError),
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("element {selector:?} ({strategy}) not found after {elapsed:?}")]
    ElementNotFound {
        selector: String,
        strategy: String,
        elapsed: Duration,
    },
    #[error("element {selector:?} did not become {condition} after {elapsed:?}")]
    ConditionTimeout {
        selector: String,
        condition: String,
        elapsed: Duration,
    },
    #[error("assertion failed: {0}")]
    AssertionFailed(String),

    #[error("no such element: {0}")]
    NoSuchElement(WebDriverErrorInfo),
    #[error("stale element reference: {0}")]
    StaleElementReference(WebDriverErrorInfo),
    #[error("element not interactable: {0}")]
    ElementNotInteractable(WebDriverErrorInfo),
    #[error("element click intercepted: {0}")]
    ElementClickIntercepted(WebDriverErrorInfo),
    #[error("invalid selector: {0}")]
    InvalidSelector(WebDriverErrorInfo),
    #[error("invalid session id: {0}")]
    InvalidSessionId(WebDriverErrorInfo),
    #[error("session not created: {0}")]
    SessionNotCreated(WebDriverErrorInfo),
    #[error("the WebDriver server timed out: {0}")]
    Timeout(WebDriverErrorInfo),
    #[error("unknown WebDriver error: {0}")]
    UnknownError(WebDriverErrorInfo),
}

impl From<reqwest::Error> for WebDriverError {
    fn from(e: reqwest::Error) -> Self {
        WebDriverError::FailedRequest(e.to_string())
    }
}

/// The HTTP status code classes, by `code / 100`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusClass {
    Informational,
    Successful,
    Redirection,
    ClientError,
    ServerError,
    Unknown,
}

impl StatusClass {
    pub fn of(status: u16) -> Self {
        match status / 100 {
            1 => StatusClass::Informational,
            2 => StatusClass::Successful,
            3 => StatusClass::Redirection,
            4 => StatusClass::ClientError,
            5 => StatusClass::ServerError,
            _ => StatusClass::Unknown,
        }
    }
}

impl WebDriverError {
    /// Classify a failed response into the error taxonomy.
    ///
    /// Called for every non-2xx response after the body has been decoded,
    /// so the parsed error object travels inside the returned variant and
    /// callers never need a second round trip to inspect it.
    pub fn classify(status: u16, value: ResponseValue) -> Self {
        let info = match value {
            ResponseValue::Error(info) => info,
            other => {
                return WebDriverError::FailedRequest(format!(
                    "server returned status {} with body {:?}",
                    status, other
                ))
            }
        };

        match info.error.as_str() {
            "no such element" => WebDriverError::NoSuchElement(info),
            "stale element reference" => WebDriverError::StaleElementReference(info),
            "element not interactable" => WebDriverError::ElementNotInteractable(info),
            "element click intercepted" => WebDriverError::ElementClickIntercepted(info),
            "invalid selector" => WebDriverError::InvalidSelector(info),
            "invalid session id" => WebDriverError::InvalidSessionId(info),
            "session not created" => WebDriverError::SessionNotCreated(info),
            "timeout" | "script timeout" => WebDriverError::Timeout(info),
            _ => WebDriverError::UnknownError(info),
        }
    }

    /// True for the "element is not there yet" family: the one class of
    /// error the resolution engine and the waiter may treat as transient.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            WebDriverError::NoSuchElement(_) | WebDriverError::ElementNotFound { .. }
        )
    }

    /// True for errors that indicate a programming or transport fault
    /// rather than a flaky browser condition. These are never subject to
    /// the soft-assert policy.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            WebDriverError::InvalidParameters(_)
                | WebDriverError::FailedRequest(_)
                | WebDriverError::Json(_)
                | WebDriverError::UnknownResponse(_)
                | WebDriverError::Base64Decode(_)
                | WebDriverError::Io(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info(code: &str) -> ResponseValue {
        ResponseValue::Error(WebDriverErrorInfo {
            error: code.to_string(),
            message: "m".to_string(),
            stacktrace: String::new(),
        })
    }

    #[test]
    fn status_classes_follow_code_over_100() {
        assert_eq!(StatusClass::of(101), StatusClass::Informational);
        assert_eq!(StatusClass::of(200), StatusClass::Successful);
        assert_eq!(StatusClass::of(204), StatusClass::Successful);
        assert_eq!(StatusClass::of(302), StatusClass::Redirection);
        assert_eq!(StatusClass::of(404), StatusClass::ClientError);
        assert_eq!(StatusClass::of(500), StatusClass::ServerError);
        assert_eq!(StatusClass::of(999), StatusClass::Unknown);
    }

    #[test]
    fn classifies_webdriver_error_codes() {
        assert!(matches!(
            WebDriverError::classify(404, info("no such element")),
            WebDriverError::NoSuchElement(_)
        ));
        assert!(matches!(
            WebDriverError::classify(404, info("stale element reference")),
            WebDriverError::StaleElementReference(_)
        ));
        assert!(matches!(
            WebDriverError::classify(400, info("element not interactable")),
            WebDriverError::ElementNotInteractable(_)
        ));
        assert!(matches!(
            WebDriverError::classify(500, info("session not created")),
            WebDriverError::SessionNotCreated(_)
        ));
        assert!(matches!(
            WebDriverError::classify(500, info("some future code")),
            WebDriverError::UnknownError(_)
        ));
    }

    #[test]
    fn non_error_body_is_a_failed_request() {
        let err = WebDriverError::classify(502, ResponseValue::String("gateway".to_string()));
        assert!(matches!(err, WebDriverError::FailedRequest(_)));
        assert!(err.is_fatal());
    }

    #[test]
    fn not_found_family_is_retryable_only() {
        assert!(WebDriverError::classify(404, info("no such element")).is_not_found());
        assert!(!WebDriverError::classify(404, info("stale element reference")).is_not_found());
        let timeout = WebDriverError::ElementNotFound {
            selector: "#q".to_string(),
            strategy: "css selector".to_string(),
            elapsed: Duration::from_millis(100),
        };
        assert!(timeout.is_not_found());
        assert!(!timeout.is_fatal());
    }
}
