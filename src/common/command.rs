use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::common::types::{ElementId, SessionId};

/// The W3C element identifier key used in element-reference responses.
pub const MAGIC_ELEMENTID: &str = "element-6066-11e4-a52e-4f735466cecf";
/// The pre-W3C element identifier key still emitted by some drivers.
pub const LEGACY_ELEMENTID: &str = "ELEMENT";

/// The WebDriver location strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectorStrategy {
    Css,
    #[serde(rename = "xpath")]
    XPath,
    LinkText,
    PartialLinkText,
    Tag,
}

impl SelectorStrategy {
    /// The wire name sent as the `using` field of a find request.
    pub fn using(self) -> &'static str {
        match self {
            SelectorStrategy::Css => "css selector",
            SelectorStrategy::XPath => "xpath",
            SelectorStrategy::LinkText => "link text",
            SelectorStrategy::PartialLinkText => "partial link text",
            SelectorStrategy::Tag => "tag name",
        }
    }

    /// Build a locator from this strategy and a raw selector string.
    pub fn by(self, selector: impl Into<String>) -> By {
        let selector = selector.into();
        match self {
            SelectorStrategy::Css => By::Css(selector),
            SelectorStrategy::XPath => By::XPath(selector),
            SelectorStrategy::LinkText => By::LinkText(selector),
            SelectorStrategy::PartialLinkText => By::PartialLinkText(selector),
            SelectorStrategy::Tag => By::Tag(selector),
        }
    }
}

impl fmt::Display for SelectorStrategy {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.using())
    }
}

/// An element locator: a location strategy plus a selector string.
///
/// `Id`, `Name` and `ClassName` are conveniences that lower to CSS
/// selectors on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum By {
    Css(String),
    XPath(String),
    LinkText(String),
    PartialLinkText(String),
    Tag(String),
    Id(String),
    Name(String),
    ClassName(String),
}

impl By {
    /// The strategy sent as the `using` field.
    pub fn strategy(&self) -> SelectorStrategy {
        match self {
            By::XPath(_) => SelectorStrategy::XPath,
            By::LinkText(_) => SelectorStrategy::LinkText,
            By::PartialLinkText(_) => SelectorStrategy::PartialLinkText,
            By::Tag(_) => SelectorStrategy::Tag,
            _ => SelectorStrategy::Css,
        }
    }

    /// The selector sent as the `value` field, lowered to the W3C form.
    pub fn selector(&self) -> String {
        match self {
            By::Css(s)
            | By::XPath(s)
            | By::LinkText(s)
            | By::PartialLinkText(s)
            | By::Tag(s) => s.clone(),
            By::Id(s) => format!(r#"[id="{}"]"#, s),
            By::Name(s) => format!(r#"[name="{}"]"#, s),
            By::ClassName(s) => format!(".{}", s),
        }
    }

    pub(crate) fn to_payload(&self) -> Value {
        json!({
            "using": self.strategy().using(),
            "value": self.selector(),
        })
    }
}

impl fmt::Display for By {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}={:?}", self.strategy(), self.selector())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestMethod {
    Get,
    Post,
    Delete,
}

impl fmt::Display for RequestMethod {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let s = match self {
            RequestMethod::Get => "GET",
            RequestMethod::Post => "POST",
            RequestMethod::Delete => "DELETE",
        };
        write!(f, "{}", s)
    }
}

/// A formatted WebDriver request, ready for the HTTP layer.
#[derive(Debug, Clone)]
pub struct RequestData {
    pub method: RequestMethod,
    pub url: String,
    pub body: Option<Value>,
}

impl RequestData {
    pub fn new(method: RequestMethod, url: impl Into<String>) -> Self {
        RequestData {
            method,
            url: url.into(),
            body: None,
        }
    }

    pub fn add_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }
}

impl fmt::Display for RequestData {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} {}", self.method, self.url)?;
        if let Some(body) = &self.body {
            write!(f, " {}", body)?;
        }
        Ok(())
    }
}

/// All WebDriver commands this client issues.
#[derive(Debug, Clone)]
pub enum Command {
    NewSession(Value),
    DeleteSession,
    Status,
    NavigateTo(String),
    GetCurrentUrl,
    Back,
    Forward,
    Refresh,
    GetTitle,
    FindElement(By),
    FindElements(By),
    FindElementFromElement(ElementId, By),
    ElementClick(ElementId),
    ElementClear(ElementId),
    ElementSendKeys(ElementId, String),
    GetElementText(ElementId),
    GetElementAttribute(ElementId, String),
    GetElementProperty(ElementId, String),
    IsElementDisplayed(ElementId),
    IsElementEnabled(ElementId),
    IsElementSelected(ElementId),
    TakeScreenshot,
    TakeElementScreenshot(ElementId),
}

impl Command {
    /// Format this command into the method, route and payload for the
    /// given session.
    pub fn format(&self, session_id: &SessionId) -> RequestData {
        use Command::*;
        match self {
            NewSession(caps) => RequestData::new(RequestMethod::Post, "/session")
                .add_body(json!({ "capabilities": { "alwaysMatch": caps } })),
            DeleteSession => {
                RequestData::new(RequestMethod::Delete, format!("/session/{}", session_id))
            }
            Status => RequestData::new(RequestMethod::Get, "/status"),
            NavigateTo(url) => {
                RequestData::new(RequestMethod::Post, format!("/session/{}/url", session_id))
                    .add_body(json!({ "url": url }))
            }
            GetCurrentUrl => {
                RequestData::new(RequestMethod::Get, format!("/session/{}/url", session_id))
            }
            Back => RequestData::new(RequestMethod::Post, format!("/session/{}/back", session_id))
                .add_body(json!({})),
            Forward => {
                RequestData::new(RequestMethod::Post, format!("/session/{}/forward", session_id))
                    .add_body(json!({}))
            }
            Refresh => {
                RequestData::new(RequestMethod::Post, format!("/session/{}/refresh", session_id))
                    .add_body(json!({}))
            }
            GetTitle => {
                RequestData::new(RequestMethod::Get, format!("/session/{}/title", session_id))
            }
            FindElement(by) => {
                RequestData::new(RequestMethod::Post, format!("/session/{}/element", session_id))
                    .add_body(by.to_payload())
            }
            FindElements(by) => {
                RequestData::new(RequestMethod::Post, format!("/session/{}/elements", session_id))
                    .add_body(by.to_payload())
            }
            FindElementFromElement(element_id, by) => RequestData::new(
                RequestMethod::Post,
                format!("/session/{}/element/{}/element", session_id, element_id),
            )
            .add_body(by.to_payload()),
            ElementClick(element_id) => RequestData::new(
                RequestMethod::Post,
                format!("/session/{}/element/{}/click", session_id, element_id),
            )
            .add_body(json!({})),
            ElementClear(element_id) => RequestData::new(
                RequestMethod::Post,
                format!("/session/{}/element/{}/clear", session_id, element_id),
            )
            .add_body(json!({})),
            ElementSendKeys(element_id, text) => RequestData::new(
                RequestMethod::Post,
                format!("/session/{}/element/{}/value", session_id, element_id),
            )
            .add_body(json!({ "text": text })),
            GetElementText(element_id) => RequestData::new(
                RequestMethod::Get,
                format!("/session/{}/element/{}/text", session_id, element_id),
            ),
            GetElementAttribute(element_id, name) => RequestData::new(
                RequestMethod::Get,
                format!(
                    "/session/{}/element/{}/attribute/{}",
                    session_id, element_id, name
                ),
            ),
            GetElementProperty(element_id, name) => RequestData::new(
                RequestMethod::Get,
                format!(
                    "/session/{}/element/{}/property/{}",
                    session_id, element_id, name
                ),
            ),
            IsElementDisplayed(element_id) => RequestData::new(
                RequestMethod::Get,
                format!("/session/{}/element/{}/displayed", session_id, element_id),
            ),
            IsElementEnabled(element_id) => RequestData::new(
                RequestMethod::Get,
                format!("/session/{}/element/{}/enabled", session_id, element_id),
            ),
            IsElementSelected(element_id) => RequestData::new(
                RequestMethod::Get,
                format!("/session/{}/element/{}/selected", session_id, element_id),
            ),
            TakeScreenshot => RequestData::new(
                RequestMethod::Get,
                format!("/session/{}/screenshot", session_id),
            ),
            TakeElementScreenshot(element_id) => RequestData::new(
                RequestMethod::Get,
                format!(
                    "/session/{}/element/{}/screenshot",
                    session_id, element_id
                ),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn by_lowers_conveniences_to_css() {
        assert_eq!(By::Id("search".to_string()).selector(), r#"[id="search"]"#);
        assert_eq!(By::Id("search".to_string()).strategy(), SelectorStrategy::Css);
        assert_eq!(By::Name("q".to_string()).selector(), r#"[name="q"]"#);
        assert_eq!(By::ClassName("btn".to_string()).selector(), ".btn");
        assert_eq!(
            By::XPath("//div".to_string()).strategy().using(),
            "xpath"
        );
    }

    #[test]
    fn find_element_payload_uses_w3c_fields() {
        let data = Command::FindElement(By::Css("#q".to_string())).format(&"s1".into());
        assert_eq!(data.method, RequestMethod::Post);
        assert_eq!(data.url, "/session/s1/element");
        assert_eq!(
            data.body.unwrap(),
            serde_json::json!({ "using": "css selector", "value": "#q" })
        );
    }

    #[test]
    fn session_routes_include_session_id() {
        let session: SessionId = "abc".into();
        let data = Command::DeleteSession.format(&session);
        assert_eq!(data.method, RequestMethod::Delete);
        assert_eq!(data.url, "/session/abc");

        let data = Command::ElementSendKeys("e9".into(), "hi".to_string()).format(&session);
        assert_eq!(data.url, "/session/abc/element/e9/value");
        assert_eq!(data.body.unwrap(), serde_json::json!({ "text": "hi" }));
    }
}
