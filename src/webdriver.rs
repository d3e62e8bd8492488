use std::marker::PhantomData;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use log::error;
use serde_json::Value;

use crate::common::capabilities::DesiredCapabilities;
use crate::common::config::WebDriverConfig;
use crate::common::types::SessionId;
use crate::error::WebDriverResult;
use crate::http::connection_sync::{HttpClientCreateParams, WebDriverHttpClientSync};
use crate::http::reqwest_sync::ReqwestDriverSync;
use crate::session::WebDriverSession;
use crate::webdrivercommands::{start_session, WebDriverCommands};

/// The WebDriver struct represents a browser session.
///
/// For documentation of the operations it supports, see the
/// [`WebDriverCommands`] trait.
pub type WebDriver = GenericWebDriver<ReqwestDriverSync>;

/// A browser session generic over its HTTP client.
///
/// Use the [`WebDriver`] alias unless you are supplying your own
/// transport.
///
/// # Example:
/// ```no_run
/// use selenite::prelude::*;
///
/// fn main() -> WebDriverResult<()> {
///     let caps = DesiredCapabilities::chrome();
///     let driver = WebDriver::new("http://localhost:4444", &caps)?;
///     driver.get("https://en.wikipedia.org")?;
///     driver.quit()?;
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct GenericWebDriver<T: WebDriverHttpClientSync> {
    pub session: WebDriverSession,
    capabilities: Value,
    quit_on_drop: bool,
    phantom: PhantomData<T>,
}

impl<T: 'static> GenericWebDriver<T>
where
    T: WebDriverHttpClientSync,
{
    /// Start a new session on the given WebDriver server.
    pub fn new(server_url: &str, capabilities: &DesiredCapabilities) -> WebDriverResult<Self> {
        Self::new_with_timeout(server_url, capabilities, None)
    }

    /// Like [`new`](GenericWebDriver::new), with a configurable timeout
    /// for all HTTP requests including the session creation itself.
    pub fn new_with_timeout(
        server_url: &str,
        capabilities: &DesiredCapabilities,
        timeout: Option<Duration>,
    ) -> WebDriverResult<Self> {
        let params = HttpClientCreateParams {
            server_url: server_url.to_string(),
            timeout,
        };
        let conn = T::create(params)?;

        let (session_id, session_capabilities) = start_session(&conn, capabilities)?;

        Ok(GenericWebDriver {
            session: WebDriverSession::new(session_id, Arc::new(Mutex::new(conn))),
            capabilities: session_capabilities,
            quit_on_drop: true,
            phantom: PhantomData,
        })
    }

    /// The capabilities granted by the server at session creation.
    pub fn capabilities(&self) -> &Value {
        &self.capabilities
    }

    pub fn session_id(&self) -> &SessionId {
        self.session.session_id()
    }

    pub fn config(&self) -> &WebDriverConfig {
        self.session.config()
    }

    pub fn config_mut(&mut self) -> &mut WebDriverConfig {
        self.session.config_mut()
    }

    /// End the webdriver session.
    pub fn quit(mut self) -> WebDriverResult<()> {
        self.quit_on_drop = false;
        self.session.delete_session()
    }

    /// Set the request timeout for the HTTP client.
    pub fn set_request_timeout(&mut self, timeout: Duration) {
        self.session.set_request_timeout(timeout);
    }
}

impl<T> WebDriverCommands for GenericWebDriver<T>
where
    T: WebDriverHttpClientSync,
{
    fn session(&self) -> &WebDriverSession {
        &self.session
    }
}

impl<T> Drop for GenericWebDriver<T>
where
    T: WebDriverHttpClientSync,
{
    /// Delete the remote session when the driver goes out of scope. The
    /// delete is attempted even if the session is degraded.
    fn drop(&mut self) {
        if self.quit_on_drop && !self.session.session_id().is_empty() {
            if let Err(e) = self.session.delete_session() {
                error!("failed to close session: {:?}", e);
            }
        }
    }
}
