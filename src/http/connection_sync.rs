use std::fmt::Debug;
use std::time::Duration;

use log::debug;
use serde::de::DeserializeOwned;

use crate::common::command::RequestData;
use crate::common::response::{Response, ResponseValue};
use crate::error::{StatusClass, WebDriverError, WebDriverResult};

/// Parameters handed to an HTTP client implementation at creation time.
#[derive(Debug, Clone)]
pub struct HttpClientCreateParams {
    pub server_url: String,
    pub timeout: Option<Duration>,
}

/// The raw outcome of one HTTP exchange with the WebDriver server: the
/// status code and the unparsed body. Decoding and classification happen
/// in [`execute_command`], not in the client.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

/// Trait for executing HTTP requests against a WebDriver server.
/// As long as you have some struct that implements WebDriverHttpClientSync,
/// you can turn it into a WebDriver like this:
///
/// ```ignore
/// // Assuming MyHttpClient implements WebDriverHttpClientSync.
/// pub type MyWebDriver = GenericWebDriver<MyHttpClient>;
/// ```
pub trait WebDriverHttpClientSync: Debug + Send + Sync {
    fn create(params: HttpClientCreateParams) -> WebDriverResult<Self>
    where
        Self: Sized;

    /// Set the HTTP request timeout for subsequent commands.
    fn set_request_timeout(&mut self, timeout: Duration);

    /// Perform the HTTP exchange. Implementations report network-level
    /// failures only; any response with a status code is returned as-is.
    fn execute_raw(&self, request_data: RequestData) -> WebDriverResult<RawResponse>;
}

/// Execute a WebDriver command and decode the response envelope.
///
/// The body is parsed on every status code, because on failure the error
/// details live in the envelope's `value`. A non-2xx status is classified
/// into the error taxonomy together with that decoded value.
pub fn execute_command(
    conn: &dyn WebDriverHttpClientSync,
    request_data: RequestData,
) -> WebDriverResult<ResponseValue> {
    debug!("webdriver request: {}", request_data);
    let raw = conn.execute_raw(request_data)?;
    debug!("webdriver response [{}]: {}", raw.status, raw.body);

    let response: Response = serde_json::from_str(&raw.body)?;
    match StatusClass::of(raw.status) {
        StatusClass::Successful => Ok(response.value),
        _ => Err(WebDriverError::classify(raw.status, response.value)),
    }
}

/// Execute a command whose successful `value` is a plain JSON object
/// rather than a scalar, element reference or error: session creation and
/// the server status endpoint.
pub fn execute_custom<T>(
    conn: &dyn WebDriverHttpClientSync,
    request_data: RequestData,
) -> WebDriverResult<T>
where
    T: DeserializeOwned,
{
    debug!("webdriver request: {}", request_data);
    let raw = conn.execute_raw(request_data)?;
    debug!("webdriver response [{}]: {}", raw.status, raw.body);

    match StatusClass::of(raw.status) {
        StatusClass::Successful => Ok(serde_json::from_str(&raw.body)?),
        _ => {
            let response: Response = serde_json::from_str(&raw.body)?;
            Err(WebDriverError::classify(raw.status, response.value))
        }
    }
}
