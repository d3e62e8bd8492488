use std::process::{Child, Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use log::{debug, error, info};
use serde::Deserialize;

use crate::common::command::Command as WebDriverCommand;
use crate::common::types::SessionId;
use crate::config::DriverSettings;
use crate::error::{WebDriverError, WebDriverResult};
use crate::http::connection_sync::{
    execute_custom, HttpClientCreateParams, WebDriverHttpClientSync,
};
use crate::http::reqwest_sync::ReqwestDriverSync;

const READY_POLL_INTERVAL: Duration = Duration::from_millis(250);

#[derive(Debug, Deserialize)]
struct StatusEnvelope {
    value: DriverStatus,
}

/// The server's readiness report from `GET /status`.
#[derive(Debug, Clone, Deserialize)]
pub struct DriverStatus {
    pub ready: bool,
    #[serde(default)]
    pub message: String,
}

/// Manages a locally launched browser-driver process (chromedriver,
/// geckodriver, ...).
///
/// The launcher owns the child process: `start` spawns the binary on the
/// port named in the server URL and blocks until the driver reports ready;
/// `stop` kills it. A launcher dropped with a running child stops it.
#[derive(Debug)]
pub struct DriverLauncher {
    binary_path: String,
    server_url: String,
    port: u16,
    startup_timeout: Duration,
    child: Option<Child>,
}

impl DriverLauncher {
    /// Create a launcher for the given driver binary, serving at the given
    /// URL. The URL must name the port the driver should listen on.
    pub fn new(binary_path: impl Into<String>, server_url: impl Into<String>) -> WebDriverResult<Self> {
        let binary_path = binary_path.into();
        let server_url = server_url.into();

        if binary_path.is_empty() {
            return Err(WebDriverError::InvalidParameters(
                "webdriver binary path cannot be empty".to_string(),
            ));
        }
        if server_url.is_empty() {
            return Err(WebDriverError::InvalidParameters(
                "remote URL cannot be empty".to_string(),
            ));
        }

        let url = reqwest::Url::parse(&server_url).map_err(|e| {
            WebDriverError::InvalidParameters(format!("failed to parse remote URL: {}", e))
        })?;
        let port = url.port().ok_or_else(|| {
            WebDriverError::InvalidParameters(format!(
                "remote URL {:?} must include a port",
                server_url
            ))
        })?;

        Ok(DriverLauncher {
            binary_path,
            server_url,
            port,
            startup_timeout: Duration::from_secs(10),
            child: None,
        })
    }

    /// Build a launcher from config-file driver settings.
    pub fn from_config(settings: &DriverSettings) -> WebDriverResult<Self> {
        let mut launcher = Self::new(&settings.binary_path, &settings.remote_url)?;
        launcher.startup_timeout = Duration::from_millis(settings.startup_timeout_ms);
        Ok(launcher)
    }

    pub fn with_startup_timeout(mut self, timeout: Duration) -> Self {
        self.startup_timeout = timeout;
        self
    }

    pub fn server_url(&self) -> &str {
        &self.server_url
    }

    /// Spawn the driver process and wait until it reports ready. A driver
    /// that is not ready within the startup timeout is stopped again.
    pub fn start(&mut self) -> WebDriverResult<()> {
        if self.child.is_some() {
            return Ok(());
        }

        info!("starting {} on port {}", self.binary_path, self.port);
        let child = Command::new(&self.binary_path)
            .arg(format!("--port={}", self.port))
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()?;
        self.child = Some(child);

        if let Err(e) = self.wait_until_ready(self.startup_timeout) {
            let _ = self.stop();
            return Err(e);
        }
        Ok(())
    }

    /// Poll the server's status endpoint until it is ready to create
    /// sessions, or the timeout passes.
    pub fn wait_until_ready(&self, timeout: Duration) -> WebDriverResult<()> {
        let conn = ReqwestDriverSync::create(HttpClientCreateParams {
            server_url: self.server_url.clone(),
            timeout: Some(Duration::from_secs(2)),
        })?;

        let deadline = Instant::now() + timeout;
        loop {
            match self.status(&conn) {
                Ok(status) if status.ready => return Ok(()),
                Ok(status) => debug!("driver not ready yet: {}", status.message),
                Err(e) => debug!("driver status check failed: {}", e),
            }

            if Instant::now() >= deadline {
                return Err(WebDriverError::FailedRequest(format!(
                    "driver was not ready within {}ms",
                    timeout.as_millis()
                )));
            }
            thread::sleep(READY_POLL_INTERVAL);
        }
    }

    fn status(&self, conn: &dyn WebDriverHttpClientSync) -> WebDriverResult<DriverStatus> {
        let data = WebDriverCommand::Status.format(&SessionId::null());
        let envelope: StatusEnvelope = execute_custom(conn, data)?;
        Ok(envelope.value)
    }

    /// Kill the driver process, if running.
    pub fn stop(&mut self) -> WebDriverResult<()> {
        if let Some(mut child) = self.child.take() {
            child.kill()?;
            child.wait()?;
        }
        Ok(())
    }
}

impl Drop for DriverLauncher {
    fn drop(&mut self) {
        if self.child.is_some() {
            if let Err(e) = self.stop() {
                error!("failed to stop driver process: {}", e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_binary_path() {
        let err = DriverLauncher::new("", "http://localhost:4444").unwrap_err();
        assert!(matches!(err, WebDriverError::InvalidParameters(_)));
    }

    #[test]
    fn rejects_empty_remote_url() {
        let err = DriverLauncher::new("chromedriver", "").unwrap_err();
        assert!(matches!(err, WebDriverError::InvalidParameters(_)));
    }

    #[test]
    fn rejects_url_without_port() {
        let err = DriverLauncher::new("chromedriver", "http://localhost").unwrap_err();
        assert!(matches!(err, WebDriverError::InvalidParameters(_)));
    }

    #[test]
    fn parses_port_from_url() {
        let launcher = DriverLauncher::new("chromedriver", "http://localhost:9515").unwrap();
        assert_eq!(launcher.port, 9515);
        assert_eq!(launcher.server_url(), "http://localhost:9515");
    }
}
