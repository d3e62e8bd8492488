use std::time::Duration;

use log::info;

use crate::error::{WebDriverError, WebDriverResult};
use crate::query::poller::ElementPoller;
use crate::webelement::WebElement;

/// High-level interface for performing explicit waits.
///
/// All waits are instances of one generic loop: evaluate a remote boolean
/// condition, compare it to the expected value, and poll until they match
/// or the deadline passes. While the wait is running, "element not there
/// yet" is just another way for the condition to be false; any other
/// failure ends the wait through the session's error-handling policy.
///
/// # Example:
/// ```no_run
/// # use selenite::prelude::*;
/// # use std::time::Duration;
/// # fn main() -> WebDriverResult<()> {
/// #     let caps = DesiredCapabilities::chrome();
/// #     let driver = WebDriver::new("http://localhost:4444", &caps)?;
/// let elem = driver.element(By::Id("submit".to_string()));
/// elem.wait_for(Duration::from_secs(10)).enabled()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ElementWaiter<'a> {
    element: &'a WebElement<'a>,
    poller: ElementPoller,
}

impl<'a> ElementWaiter<'a> {
    pub(crate) fn new(element: &'a WebElement<'a>, poller: ElementPoller) -> Self {
        Self { element, poller }
    }

    /// Use the specified poller for this waiter only.
    pub fn with_poller(mut self, poller: ElementPoller) -> Self {
        self.poller = poller;
        self
    }

    /// Poll once per `interval` up to `timeout`, overriding the poller for
    /// this waiter only.
    pub fn wait(self, timeout: Duration, interval: Duration) -> Self {
        self.with_poller(ElementPoller::TimeoutWithInterval(timeout, interval))
    }

    /// The one generic polling loop behind every named wait.
    fn wait_for_condition(
        &self,
        check: &dyn Fn(&WebElement<'a>) -> WebDriverResult<bool>,
        expected: bool,
        condition: &str,
    ) -> WebDriverResult<()> {
        let mut ticker = self.poller.start();
        loop {
            match check(self.element) {
                Ok(actual) if actual == expected => {
                    info!(
                        "element {} became {} after {}ms",
                        self.element.by(),
                        condition,
                        ticker.elapsed().as_millis()
                    );
                    return Ok(());
                }
                Ok(_) => {}
                // A not-yet-present element means the condition is not yet
                // true; keep polling until the deadline.
                Err(e) if e.is_not_found() => {}
                Err(e) => return Err(e),
            }

            if !ticker.tick() {
                return Err(WebDriverError::ConditionTimeout {
                    selector: self.element.by().selector(),
                    condition: condition.to_string(),
                    elapsed: ticker.elapsed(),
                });
            }
        }
    }

    /// Apply the session's error-handling policy to a finished wait and
    /// hand the element back for chaining.
    fn finish(self, result: WebDriverResult<()>) -> WebDriverResult<&'a WebElement<'a>> {
        match result {
            Ok(()) => Ok(self.element),
            Err(e) => {
                self.element.session().handle_error::<()>(e)?;
                Ok(self.element)
            }
        }
    }

    pub fn displayed(self) -> WebDriverResult<&'a WebElement<'a>> {
        let result = self.wait_for_condition(&|e| e.displayed_raw(), true, "displayed");
        self.finish(result)
    }

    pub fn not_displayed(self) -> WebDriverResult<&'a WebElement<'a>> {
        let result = self.wait_for_condition(&|e| e.displayed_raw(), false, "not displayed");
        self.finish(result)
    }

    pub fn enabled(self) -> WebDriverResult<&'a WebElement<'a>> {
        let result = self.wait_for_condition(&|e| e.enabled_raw(), true, "enabled");
        self.finish(result)
    }

    pub fn not_enabled(self) -> WebDriverResult<&'a WebElement<'a>> {
        let result = self.wait_for_condition(&|e| e.enabled_raw(), false, "not enabled");
        self.finish(result)
    }

    pub fn selected(self) -> WebDriverResult<&'a WebElement<'a>> {
        let result = self.wait_for_condition(&|e| e.selected_raw(), true, "selected");
        self.finish(result)
    }

    pub fn not_selected(self) -> WebDriverResult<&'a WebElement<'a>> {
        let result = self.wait_for_condition(&|e| e.selected_raw(), false, "not selected");
        self.finish(result)
    }

    pub fn present(self) -> WebDriverResult<&'a WebElement<'a>> {
        let result = self.wait_for_condition(&|e| e.present_raw(), true, "present");
        self.finish(result)
    }

    pub fn not_present(self) -> WebDriverResult<&'a WebElement<'a>> {
        let result = self.wait_for_condition(&|e| e.present_raw(), false, "not present");
        self.finish(result)
    }
}
