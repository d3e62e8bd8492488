use std::time::Duration;

use crate::common::command::RequestData;
use crate::error::WebDriverResult;
use crate::http::connection_sync::{HttpClientCreateParams, RawResponse, WebDriverHttpClientSync};

/// Null driver that satisfies the build but does nothing. Every command
/// succeeds with an empty envelope.
#[derive(Debug)]
pub struct NullDriverSync {
    url: String,
}

impl NullDriverSync {
    pub fn server_url(&self) -> &str {
        &self.url
    }
}

impl WebDriverHttpClientSync for NullDriverSync {
    fn create(params: HttpClientCreateParams) -> WebDriverResult<Self> {
        Ok(NullDriverSync {
            url: params.server_url,
        })
    }

    fn set_request_timeout(&mut self, _timeout: Duration) {}

    fn execute_raw(&self, _request_data: RequestData) -> WebDriverResult<RawResponse> {
        Ok(RawResponse {
            status: 200,
            body: r#"{"value":null}"#.to_string(),
        })
    }
}
