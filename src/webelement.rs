use std::fmt;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::sync::OnceLock;
use std::time::Duration;

use base64::decode;

use crate::common::command::{By, Command};
use crate::common::config::ElementPolicy;
use crate::common::response::ResponseValue;
use crate::common::types::ElementId;
use crate::error::{WebDriverError, WebDriverResult};
use crate::query::{ElementPoller, ElementWaiter};
use crate::session::WebDriverSession;

/// A single element on a page, identified by a locator.
///
/// Elements are declarative: creating one sends nothing to the server.
/// The first operation that needs the server-side handle resolves the
/// locator under the element's retry policy and memoizes the result; once
/// set, the handle is never cleared. If the underlying DOM node goes away
/// later, operations report `StaleElementReference` rather than silently
/// re-resolving onto a different node; create a fresh element from the
/// same locator to re-resolve.
///
/// # Example:
/// ```no_run
/// # use selenite::prelude::*;
/// # fn main() -> WebDriverResult<()> {
/// #     let caps = DesiredCapabilities::chrome();
/// #     let driver = WebDriver::new("http://localhost:4444", &caps)?;
/// #     driver.get("https://en.wikipedia.org")?;
/// let search = driver.element(By::Name("search".to_string()));
/// search.send_keys("selenium")?;
/// #     Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct WebElement<'a> {
    by: By,
    element_id: OnceLock<ElementId>,
    session: &'a WebDriverSession,
    policy: ElementPolicy,
}

impl<'a> WebElement<'a> {
    /// Create a new unresolved WebElement.
    ///
    /// Typically you would not call this directly but use
    /// `driver.element(by)` or `session.new_element(selector)`.
    pub fn new(session: &'a WebDriverSession, by: By) -> Self {
        WebElement {
            by,
            element_id: OnceLock::new(),
            session,
            policy: session.config().element_policy,
        }
    }

    /// Create a WebElement whose handle is already known, e.g. from a
    /// find-elements response.
    pub(crate) fn with_handle(
        session: &'a WebDriverSession,
        by: By,
        element_id: ElementId,
    ) -> Self {
        let element = WebElement::new(session, by);
        let _ = element.element_id.set(element_id);
        element
    }

    pub fn by(&self) -> &By {
        &self.by
    }

    /// The retry/poll policy this element resolves under.
    pub fn policy(&self) -> ElementPolicy {
        self.policy
    }

    /// Override the retry/poll policy for this element only.
    pub fn with_policy(mut self, policy: ElementPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// The memoized server-side handle, if this element has been resolved.
    pub fn element_id(&self) -> Option<&ElementId> {
        self.element_id.get()
    }

    pub(crate) fn session(&self) -> &'a WebDriverSession {
        self.session
    }

    fn cmd(&self, command: Command) -> WebDriverResult<ResponseValue> {
        self.session.execute(command)
    }

    /// Issue a single find request for this element's locator.
    ///
    /// Returns `Ok(None)` when the server reports "no such element" and
    /// the effective policy tolerates it. Every other failure, transport
    /// faults included, is an error: missing elements are the only
    /// transient state.
    fn fetch_element_id(&self, effective: ElementPolicy) -> WebDriverResult<Option<ElementId>> {
        match self.cmd(Command::FindElement(self.by.clone())) {
            Ok(value) => Ok(Some(value.into_element()?.element_id())),
            Err(e) if effective.ignore_not_found && e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Resolve this element's locator to a server-side handle.
    ///
    /// Idempotent: once a handle has been memoized it is returned without
    /// any network traffic. Otherwise the locator is retried under the
    /// element's policy, tolerating "no such element" for the duration of
    /// the loop, until a handle is found or the retry timeout elapses.
    pub fn resolve(&self) -> WebDriverResult<ElementId> {
        if let Some(id) = self.element_id.get() {
            return Ok(id.clone());
        }

        let effective = self.policy.with_ignore_not_found(true);
        let mut ticker =
            ElementPoller::TimeoutWithInterval(self.policy.retry_timeout, self.policy.poll_interval)
                .start();

        loop {
            if let Some(id) = self.fetch_element_id(effective)? {
                // First writer wins; a concurrent resolve returns the same
                // memoized handle.
                return Ok(self.element_id.get_or_init(|| id).clone());
            }
            if !ticker.tick() {
                return Err(WebDriverError::ElementNotFound {
                    selector: self.by.selector(),
                    strategy: self.by.strategy().to_string(),
                    elapsed: ticker.elapsed(),
                });
            }
        }
    }

    pub(crate) fn displayed_raw(&self) -> WebDriverResult<bool> {
        let id = self.resolve()?;
        self.cmd(Command::IsElementDisplayed(id))?.as_bool()
    }

    pub(crate) fn enabled_raw(&self) -> WebDriverResult<bool> {
        let id = self.resolve()?;
        self.cmd(Command::IsElementEnabled(id))?.as_bool()
    }

    pub(crate) fn selected_raw(&self) -> WebDriverResult<bool> {
        let id = self.resolve()?;
        self.cmd(Command::IsElementSelected(id))?.as_bool()
    }

    /// A memoized handle is proof of presence; otherwise probe with a
    /// single find. A successful probe memoizes the handle it found.
    pub(crate) fn present_raw(&self) -> WebDriverResult<bool> {
        if self.element_id.get().is_some() {
            return Ok(true);
        }
        match self.fetch_element_id(self.policy.with_ignore_not_found(true))? {
            Some(id) => {
                let _ = self.element_id.set(id);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Return true if the element is currently displayed, otherwise false.
    pub fn is_displayed(&self) -> WebDriverResult<bool> {
        match self.displayed_raw() {
            Ok(v) => Ok(v),
            Err(e) => self.session.handle_error(e),
        }
    }

    /// Return true if the element is currently enabled, otherwise false.
    pub fn is_enabled(&self) -> WebDriverResult<bool> {
        match self.enabled_raw() {
            Ok(v) => Ok(v),
            Err(e) => self.session.handle_error(e),
        }
    }

    /// Return true if the element is currently selected, otherwise false.
    pub fn is_selected(&self) -> WebDriverResult<bool> {
        match self.selected_raw() {
            Ok(v) => Ok(v),
            Err(e) => self.session.handle_error(e),
        }
    }

    /// Return true if the element currently exists in the DOM.
    pub fn is_present(&self) -> WebDriverResult<bool> {
        match self.present_raw() {
            Ok(v) => Ok(v),
            Err(e) => self.session.handle_error(e),
        }
    }

    /// Click the element.
    pub fn click(&self) -> WebDriverResult<()> {
        match self
            .resolve()
            .and_then(|id| self.cmd(Command::ElementClick(id)))
        {
            Ok(_) => Ok(()),
            Err(e) => self.session.handle_error(e),
        }
    }

    /// Clear the element's contents.
    pub fn clear(&self) -> WebDriverResult<()> {
        match self
            .resolve()
            .and_then(|id| self.cmd(Command::ElementClear(id)))
        {
            Ok(_) => Ok(()),
            Err(e) => self.session.handle_error(e),
        }
    }

    /// Send the specified input to the element.
    pub fn send_keys(&self, keys: impl Into<String>) -> WebDriverResult<()> {
        let keys = keys.into();
        match self
            .resolve()
            .and_then(|id| self.cmd(Command::ElementSendKeys(id, keys)))
        {
            Ok(_) => Ok(()),
            Err(e) => self.session.handle_error(e),
        }
    }

    /// Get the text contents of the element.
    pub fn text(&self) -> WebDriverResult<String> {
        match self
            .resolve()
            .and_then(|id| self.cmd(Command::GetElementText(id)))
            .and_then(|v| v.into_string())
        {
            Ok(text) => Ok(text),
            Err(e) => self.session.handle_error(e),
        }
    }

    /// Get the specified attribute, or `None` if the element lacks it.
    pub fn attribute(&self, name: &str) -> WebDriverResult<Option<String>> {
        match self
            .resolve()
            .and_then(|id| self.cmd(Command::GetElementAttribute(id, name.to_string())))
            .and_then(|v| v.into_opt_string())
        {
            Ok(value) => Ok(value),
            Err(e) => self.session.handle_error(e),
        }
    }

    /// Get the specified property, or `None` if the element lacks it.
    pub fn property(&self, name: &str) -> WebDriverResult<Option<String>> {
        match self
            .resolve()
            .and_then(|id| self.cmd(Command::GetElementProperty(id, name.to_string())))
            .and_then(|v| v.into_opt_string())
        {
            Ok(value) => Ok(value),
            Err(e) => self.session.handle_error(e),
        }
    }

    /// Search for a child of this element using the specified locator.
    /// One-shot, like [`find_element`](crate::WebDriverCommands::find_element).
    pub fn find_element(&self, by: By) -> WebDriverResult<WebElement<'a>> {
        match self
            .resolve()
            .and_then(|id| self.cmd(Command::FindElementFromElement(id, by.clone())))
            .and_then(|v| v.into_element())
        {
            Ok(elem_ref) => Ok(WebElement::with_handle(
                self.session,
                by,
                elem_ref.element_id(),
            )),
            Err(e) => {
                self.session.handle_error::<()>(e)?;
                Ok(WebElement::new(self.session, by))
            }
        }
    }

    /// Wait on this element with the given timeout, polling at the
    /// element's poll interval.
    ///
    /// # Example:
    /// ```no_run
    /// # use selenite::prelude::*;
    /// # use std::time::Duration;
    /// # fn main() -> WebDriverResult<()> {
    /// #     let caps = DesiredCapabilities::chrome();
    /// #     let driver = WebDriver::new("http://localhost:4444", &caps)?;
    /// let banner = driver.element(By::Css("#banner".to_string()));
    /// banner.wait_for(Duration::from_secs(5)).displayed()?.click()?;
    /// #     Ok(())
    /// # }
    /// ```
    pub fn wait_for(&self, timeout: Duration) -> ElementWaiter<'_> {
        ElementWaiter::new(
            self,
            ElementPoller::TimeoutWithInterval(timeout, self.policy.poll_interval),
        )
    }

    /// Wait on this element with the session's default poller.
    pub fn wait_until(&self) -> ElementWaiter<'_> {
        ElementWaiter::new(self, self.session.config().query_poller.clone())
    }

    /// Take a screenshot of this element and return it as a
    /// base64-encoded String.
    pub fn screenshot_as_base64(&self) -> WebDriverResult<String> {
        match self
            .resolve()
            .and_then(|id| self.cmd(Command::TakeElementScreenshot(id)))
            .and_then(|v| v.into_string())
        {
            Ok(data) => Ok(data),
            Err(e) => self.session.handle_error(e),
        }
    }

    /// Take a screenshot of this element and return it as PNG bytes.
    pub fn screenshot_as_png(&self) -> WebDriverResult<Vec<u8>> {
        let data = self.screenshot_as_base64()?;
        match decode(&data) {
            Ok(bytes) => Ok(bytes),
            Err(e) => self.session.handle_error(e.into()),
        }
    }

    /// Take a screenshot of this element and write it to the specified
    /// filename.
    pub fn screenshot(&self, path: &Path) -> WebDriverResult<()> {
        let png = self.screenshot_as_png()?;
        let result = File::create(path).and_then(|mut file| file.write_all(&png));
        match result {
            Ok(()) => Ok(()),
            Err(e) => self.session.handle_error(e.into()),
        }
    }
}

impl<'a> fmt::Display for WebElement<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.element_id.get() {
            Some(id) => write!(
                f,
                r#"(session="{}", element="{}")"#,
                self.session.session_id(),
                id
            ),
            None => write!(
                f,
                r#"(session="{}", locator="{}")"#,
                self.session.session_id(),
                self.by
            ),
        }
    }
}
