use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONNECTION, CONTENT_TYPE, USER_AGENT};

use crate::common::command::{RequestData, RequestMethod};
use crate::error::WebDriverResult;
use crate::http::connection_sync::{HttpClientCreateParams, RawResponse, WebDriverHttpClientSync};

fn build_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    headers.insert(
        CONTENT_TYPE,
        HeaderValue::from_static("application/json; charset=utf-8"),
    );
    headers.insert(
        USER_AGENT,
        HeaderValue::from_static(concat!("selenite/", env!("CARGO_PKG_VERSION"))),
    );
    headers.insert(CONNECTION, HeaderValue::from_static("keep-alive"));
    headers
}

/// Synchronous connection to the remote WebDriver server.
#[derive(Debug)]
pub struct ReqwestDriverSync {
    url: String,
    client: reqwest::blocking::Client,
    timeout: Duration,
}

impl WebDriverHttpClientSync for ReqwestDriverSync {
    fn create(params: HttpClientCreateParams) -> WebDriverResult<Self> {
        let url = params.server_url.trim_end_matches('/').to_owned();
        Ok(ReqwestDriverSync {
            url,
            client: reqwest::blocking::Client::builder()
                .default_headers(build_headers())
                .build()?,
            timeout: params.timeout.unwrap_or_else(|| Duration::from_secs(120)),
        })
    }

    fn set_request_timeout(&mut self, timeout: Duration) {
        self.timeout = timeout;
    }

    /// Execute the specified request and return the status and body.
    fn execute_raw(&self, request_data: RequestData) -> WebDriverResult<RawResponse> {
        let url = self.url.clone() + &request_data.url;
        let mut request = match request_data.method {
            RequestMethod::Get => self.client.get(&url),
            RequestMethod::Post => self.client.post(&url),
            RequestMethod::Delete => self.client.delete(&url),
        };
        request = request.timeout(self.timeout);

        if let Some(x) = request_data.body {
            request = request.json(&x);
        }

        let resp = request.send()?;
        Ok(RawResponse {
            status: resp.status().as_u16(),
            body: resp.text()?,
        })
    }
}
