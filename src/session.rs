use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use log::error;

use crate::common::command::{Command, SelectorStrategy};
use crate::common::config::WebDriverConfig;
use crate::common::response::ResponseValue;
use crate::common::types::SessionId;
use crate::error::{WebDriverError, WebDriverResult};
use crate::http::connection_sync::{execute_command, WebDriverHttpClientSync};
use crate::webdrivercommands::WebDriverCommands;
use crate::webelement::WebElement;

/// A single browser session: the unit of lifetime for every element
/// derived from it.
///
/// The session owns the server-side session id, the transport shared with
/// its elements, the per-session configuration and the accumulated
/// soft-assert error list. It is driven by one thread at a time; run
/// independent sessions on independent threads.
#[derive(Debug)]
pub struct WebDriverSession {
    session_id: SessionId,
    conn: Arc<Mutex<dyn WebDriverHttpClientSync>>,
    config: WebDriverConfig,
    errors: Mutex<Vec<String>>,
    deleted: AtomicBool,
}

impl WebDriverSession {
    pub fn new(session_id: SessionId, conn: Arc<Mutex<dyn WebDriverHttpClientSync>>) -> Self {
        Self {
            session_id,
            conn,
            config: WebDriverConfig::new(),
            errors: Mutex::new(Vec::new()),
            deleted: AtomicBool::new(false),
        }
    }

    pub fn session_id(&self) -> &SessionId {
        &self.session_id
    }

    pub fn config(&self) -> &WebDriverConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut WebDriverConfig {
        &mut self.config
    }

    /// Use CSS as the default strategy for elements created from a bare
    /// selector string.
    pub fn use_css(&mut self) {
        self.config.default_selector = SelectorStrategy::Css;
    }

    /// Use XPath as the default strategy for elements created from a bare
    /// selector string.
    pub fn use_xpath(&mut self) {
        self.config.default_selector = SelectorStrategy::XPath;
    }

    pub fn set_request_timeout(&mut self, timeout: Duration) {
        self.lock_conn().set_request_timeout(timeout);
    }

    fn lock_conn(&self) -> std::sync::MutexGuard<'_, dyn WebDriverHttpClientSync + 'static> {
        // A poisoned transport lock only means another thread panicked
        // mid-request; the client itself holds no invalid state.
        self.conn
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Issue a command on this session's transport.
    pub fn execute(&self, command: Command) -> WebDriverResult<ResponseValue> {
        let data = command.format(&self.session_id);
        execute_command(&*self.lock_conn(), data)
    }

    /// Create an element from a bare selector string, using the session's
    /// default selector strategy. No network traffic happens until the
    /// element is resolved.
    pub fn new_element(&self, selector: impl Into<String>) -> WebElement<'_> {
        let by = self.config.default_selector.by(selector);
        WebElement::new(self, by)
    }

    /// Record a soft-assert failure.
    pub fn add_error(&self, message: impl Into<String>) {
        self.errors
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(message.into());
    }

    /// The soft-assert failures recorded so far, in order.
    pub fn errors(&self) -> Vec<String> {
        self.errors
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// All recorded failures joined into one report, empty if none.
    pub fn raise_errors(&self) -> String {
        self.errors().join("\n")
    }

    /// Whether the remote session has been deleted.
    pub fn is_deleted(&self) -> bool {
        self.deleted.load(Ordering::SeqCst)
    }

    /// Delete the remote session. Issued at most once; later calls are
    /// no-ops. The request is attempted even when the session is in a
    /// degraded state, and a failed delete still marks the session dead.
    pub fn delete_session(&self) -> WebDriverResult<()> {
        if self.deleted.swap(true, Ordering::SeqCst) {
            return Ok(());
        }
        self.execute(Command::DeleteSession).map(|_| ())
    }

    /// The single decision point for every failing operation.
    ///
    /// Library-level faults (bad parameters, transport or decode failures)
    /// always abort: they indicate a programming error, not a flaky
    /// browser. Classified failures are either recorded on the session
    /// (soft asserts), letting the caller continue with a zero value, or
    /// escalated by deleting the remote session and returning the error
    /// (hard asserts, the default).
    pub(crate) fn handle_error<T: Default>(&self, err: WebDriverError) -> WebDriverResult<T> {
        error!("{}", err);

        if !err.is_fatal() && self.config.soft_asserts {
            self.add_error(err.to_string());
            return Ok(T::default());
        }

        if let Err(delete_err) = self.delete_session() {
            error!("failed to delete session: {}", delete_err);
        }
        Err(err)
    }
}

impl WebDriverCommands for WebDriverSession {
    fn session(&self) -> &WebDriverSession {
        self
    }
}
