//! Selenite is a synchronous W3C WebDriver client for Rust, for automated
//! website UI testing.
//!
//! It speaks the WebDriver wire protocol directly over HTTP/JSON. Tested
//! with Chrome and Firefox although any W3C-compatible WebDriver should
//! work.
//!
//! ## Features
//!
//! - Create a browser session directly against a WebDriver server
//!   (e.g. chromedriver, geckodriver) and launch the driver process for
//!   you if asked
//! - Declarative elements: build them from a selector, resolve them
//!   lazily under a configurable retry timeout and poll interval
//! - Explicit waits for displayed/enabled/selected/present conditions,
//!   all driven by one generic polling loop
//! - Soft-assert mode that records failures on the session instead of
//!   aborting the test
//! - Navigation, element actions, attribute/property access
//! - Capture screenshots of the browser or an individual element as PNG
//! - JSON config file for timeouts, selector strategy and capabilities
//!
//! ## Example:
//!
//! The following example assumes a WebDriver server running at
//! localhost:4444.
//!
//! ```no_run
//! use std::time::Duration;
//!
//! use selenite::prelude::*;
//!
//! fn main() -> WebDriverResult<()> {
//!     let caps = DesiredCapabilities::chrome();
//!     let driver = WebDriver::new("http://localhost:4444", &caps)?;
//!
//!     // Navigate to URL.
//!     driver.get("https://en.wikipedia.org")?;
//!
//!     // Elements are declarative; nothing is sent until they are used.
//!     let search = driver.element(By::Name("search".to_string()));
//!     search.send_keys("selenium")?;
//!
//!     let button = driver.element(By::Css("button[type='submit']".to_string()));
//!     button.wait_for(Duration::from_secs(5)).displayed()?.click()?;
//!
//!     // Assert on the result.
//!     let heading = driver.element(By::Id("firstHeading".to_string()));
//!     heading.assert_that().has_text("Selenium")?;
//!
//!     driver.quit()?;
//!     Ok(())
//! }
//! ```

#![forbid(unsafe_code)]
#![allow(clippy::needless_doctest_main)]

pub use common::capabilities::DesiredCapabilities;
pub use common::command::{By, SelectorStrategy};
pub use common::config::{ElementPolicy, WebDriverConfig};
pub use common::types::{ElementId, SessionId};
pub use config::ClientConfig;
pub use error::{WebDriverError, WebDriverErrorInfo, WebDriverResult};
pub use launcher::DriverLauncher;
pub use session::WebDriverSession;
pub use webdriver::{GenericWebDriver, WebDriver};
pub use webdrivercommands::{start_session, WebDriverCommands};
pub use webelement::WebElement;

pub mod prelude {
    pub use crate::asserts::ElementAsserter;
    pub use crate::common::capabilities::DesiredCapabilities;
    pub use crate::common::command::By;
    pub use crate::error::WebDriverResult;
    pub use crate::query::ElementWaiter;
    pub use crate::webdriver::WebDriver;
    pub use crate::webdrivercommands::WebDriverCommands;
    pub use crate::webelement::WebElement;
}

pub mod asserts;
pub mod common;
pub mod config;
pub mod error;
pub mod http {
    pub mod connection_sync;
    pub mod nulldriver_sync;
    pub mod reqwest_sync;
}
pub mod launcher;
pub mod query;
mod session;
mod webdriver;
mod webdrivercommands;
mod webelement;
