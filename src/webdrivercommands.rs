use std::fs::File;
use std::io::Write;
use std::path::Path;

use base64::decode;
use serde::Deserialize;
use serde_json::Value;

use crate::common::capabilities::DesiredCapabilities;
use crate::common::command::{By, Command};
use crate::common::response::ResponseValue;
use crate::common::types::SessionId;
use crate::error::WebDriverResult;
use crate::http::connection_sync::{execute_custom, WebDriverHttpClientSync};
use crate::session::WebDriverSession;
use crate::webelement::WebElement;

/// Create a new session on the server and return its id together with the
/// capabilities the server actually granted.
pub fn start_session(
    conn: &dyn WebDriverHttpClientSync,
    capabilities: &DesiredCapabilities,
) -> WebDriverResult<(SessionId, Value)> {
    #[derive(Deserialize)]
    struct Envelope {
        value: Body,
    }

    #[derive(Deserialize)]
    struct Body {
        #[serde(rename = "sessionId")]
        session_id: String,
        #[serde(default)]
        capabilities: Value,
    }

    let data = Command::NewSession(capabilities.as_value().clone()).format(&SessionId::null());
    let envelope: Envelope = execute_custom(conn, data)?;
    Ok((
        SessionId::from(envelope.value.session_id),
        envelope.value.capabilities,
    ))
}

/// Session-level WebDriver operations, implemented for everything that can
/// produce a [`WebDriverSession`].
///
/// Every operation routes failures through the session's error-handling
/// policy: under hard asserts an error deletes the remote session and
/// propagates; under soft asserts it is recorded and the operation returns
/// its zero value.
pub trait WebDriverCommands {
    /// The session backing these commands.
    fn session(&self) -> &WebDriverSession;

    /// Issue a command without applying the error-handling policy. Most
    /// callers want the named operations instead.
    fn cmd(&self, command: Command) -> WebDriverResult<ResponseValue> {
        self.session().execute(command)
    }

    /// Navigate to the given URL.
    ///
    /// # Example:
    /// ```no_run
    /// # use selenite::prelude::*;
    /// # fn main() -> WebDriverResult<()> {
    /// #     let caps = DesiredCapabilities::chrome();
    /// #     let driver = WebDriver::new("http://localhost:4444", &caps)?;
    /// driver.get("https://en.wikipedia.org")?;
    /// #     Ok(())
    /// # }
    /// ```
    fn get(&self, url: &str) -> WebDriverResult<()> {
        match self.cmd(Command::NavigateTo(url.to_string())) {
            Ok(_) => Ok(()),
            Err(e) => self.session().handle_error(e),
        }
    }

    /// The URL of the current browsing context.
    fn current_url(&self) -> WebDriverResult<String> {
        match self
            .cmd(Command::GetCurrentUrl)
            .and_then(|v| v.into_string())
        {
            Ok(url) => Ok(url),
            Err(e) => self.session().handle_error(e),
        }
    }

    /// The title of the current page.
    fn title(&self) -> WebDriverResult<String> {
        match self.cmd(Command::GetTitle).and_then(|v| v.into_string()) {
            Ok(title) => Ok(title),
            Err(e) => self.session().handle_error(e),
        }
    }

    /// Navigate back in the browser history.
    fn back(&self) -> WebDriverResult<()> {
        match self.cmd(Command::Back) {
            Ok(_) => Ok(()),
            Err(e) => self.session().handle_error(e),
        }
    }

    /// Navigate forward in the browser history.
    fn forward(&self) -> WebDriverResult<()> {
        match self.cmd(Command::Forward) {
            Ok(_) => Ok(()),
            Err(e) => self.session().handle_error(e),
        }
    }

    /// Refresh the current page.
    fn refresh(&self) -> WebDriverResult<()> {
        match self.cmd(Command::Refresh) {
            Ok(_) => Ok(()),
            Err(e) => self.session().handle_error(e),
        }
    }

    /// Create an element from a locator. This is declarative: no request
    /// is sent until the element is resolved by an operation or a wait.
    fn element<'a>(&'a self, by: By) -> WebElement<'a> {
        WebElement::new(self.session(), by)
    }

    /// Search for an element now, without retrying.
    ///
    /// For a find that waits for the element to appear, create the element
    /// with [`element`](WebDriverCommands::element) and use
    /// [`WebElement::resolve`] or a wait.
    fn find_element<'a>(&'a self, by: By) -> WebDriverResult<WebElement<'a>> {
        match self
            .cmd(Command::FindElement(by.clone()))
            .and_then(|v| v.into_element())
        {
            Ok(elem_ref) => Ok(WebElement::with_handle(
                self.session(),
                by,
                elem_ref.element_id(),
            )),
            Err(e) => {
                self.session().handle_error::<()>(e)?;
                Ok(WebElement::new(self.session(), by))
            }
        }
    }

    /// Search for all elements matching the locator, without retrying.
    fn find_elements<'a>(&'a self, by: By) -> WebDriverResult<Vec<WebElement<'a>>> {
        let decoded = self
            .cmd(Command::FindElements(by.clone()))
            .and_then(|v| v.into_list())
            .and_then(|items| {
                items
                    .into_iter()
                    .map(|item| item.into_element())
                    .collect::<WebDriverResult<Vec<_>>>()
            });
        match decoded {
            Ok(refs) => Ok(refs
                .into_iter()
                .map(|r| WebElement::with_handle(self.session(), by.clone(), r.element_id()))
                .collect()),
            Err(e) => self.session().handle_error(e),
        }
    }

    /// Take a screenshot of the current window and return it as a
    /// base64-encoded String.
    fn screenshot_as_base64(&self) -> WebDriverResult<String> {
        match self
            .cmd(Command::TakeScreenshot)
            .and_then(|v| v.into_string())
        {
            Ok(data) => Ok(data),
            Err(e) => self.session().handle_error(e),
        }
    }

    /// Take a screenshot of the current window and return it as PNG bytes.
    fn screenshot_as_png(&self) -> WebDriverResult<Vec<u8>> {
        let data = self.screenshot_as_base64()?;
        match decode(&data) {
            Ok(bytes) => Ok(bytes),
            Err(e) => self.session().handle_error(e.into()),
        }
    }

    /// Take a screenshot of the current window and write it to the
    /// specified filename.
    fn screenshot(&self, path: &Path) -> WebDriverResult<()> {
        let png = self.screenshot_as_png()?;
        let result = File::create(path).and_then(|mut file| file.write_all(&png));
        match result {
            Ok(()) => Ok(()),
            Err(e) => self.session().handle_error(e.into()),
        }
    }
}
