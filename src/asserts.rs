use log::info;
use stringmatch::Needle;

use crate::error::{WebDriverError, WebDriverResult};
use crate::webelement::WebElement;

/// Soft/hard assertions over an element's text, value and attributes.
///
/// The expected value is any [`Needle`]: a `&str` or `String` for exact
/// matching, or a `StringMatch`/`Regex` for partial and pattern matching.
/// A failed assertion goes through the session's error-handling policy:
/// recorded under soft asserts, session-terminating under hard asserts.
#[derive(Debug, Clone)]
pub struct ElementAsserter<'a> {
    element: &'a WebElement<'a>,
}

impl<'a> ElementAsserter<'a> {
    pub(crate) fn new(element: &'a WebElement<'a>) -> Self {
        Self { element }
    }

    fn check<N>(
        &self,
        property: &str,
        actual: &str,
        expected: N,
        should_match: bool,
    ) -> WebDriverResult<()>
    where
        N: Needle,
    {
        let matched = expected.is_match(actual);
        if matched == should_match {
            info!("element {} {} matched", self.element.by(), property);
            return Ok(());
        }

        let verdict = if should_match {
            "did not match"
        } else {
            "should not have matched"
        };
        self.element
            .session()
            .handle_error(WebDriverError::AssertionFailed(format!(
                "element {} {} {} the expected value (actual {:?})",
                self.element.by(),
                property,
                verdict,
                actual
            )))
    }

    /// Assert that the element's text matches the expected value.
    pub fn has_text<N: Needle>(&self, expected: N) -> WebDriverResult<()> {
        let actual = self.element.text()?;
        self.check("text", &actual, expected, true)
    }

    /// Assert that the element's text does not match the expected value.
    pub fn lacks_text<N: Needle>(&self, expected: N) -> WebDriverResult<()> {
        let actual = self.element.text()?;
        self.check("text", &actual, expected, false)
    }

    /// Assert that the element's `value` attribute matches the expected
    /// value. A missing attribute is treated as empty.
    pub fn has_value<N: Needle>(&self, expected: N) -> WebDriverResult<()> {
        let actual = self.element.attribute("value")?.unwrap_or_default();
        self.check("value", &actual, expected, true)
    }

    /// Assert that the element's `value` attribute does not match the
    /// expected value.
    pub fn lacks_value<N: Needle>(&self, expected: N) -> WebDriverResult<()> {
        let actual = self.element.attribute("value")?.unwrap_or_default();
        self.check("value", &actual, expected, false)
    }

    /// Assert that the given attribute matches the expected value.
    pub fn has_attribute<N: Needle>(&self, name: &str, expected: N) -> WebDriverResult<()> {
        let actual = self.element.attribute(name)?.unwrap_or_default();
        self.check(&format!("attribute {:?}", name), &actual, expected, true)
    }

    /// Assert that the given attribute does not match the expected value.
    pub fn lacks_attribute<N: Needle>(&self, name: &str, expected: N) -> WebDriverResult<()> {
        let actual = self.element.attribute(name)?.unwrap_or_default();
        self.check(&format!("attribute {:?}", name), &actual, expected, false)
    }
}

impl<'a> WebElement<'a> {
    /// Begin an assertion chain against this element.
    ///
    /// # Example:
    /// ```no_run
    /// # use selenite::prelude::*;
    /// # fn main() -> WebDriverResult<()> {
    /// #     let caps = DesiredCapabilities::chrome();
    /// #     let driver = WebDriver::new("http://localhost:4444", &caps)?;
    /// let result = driver.element(By::Id("result".to_string()));
    /// result.assert_that().has_text("selenium")?;
    /// #     Ok(())
    /// # }
    /// ```
    pub fn assert_that(&self) -> ElementAsserter<'_> {
        ElementAsserter::new(self)
    }
}
