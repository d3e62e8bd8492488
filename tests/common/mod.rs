//! A scripted in-memory transport for exercising the client without a
//! WebDriver server. Responses are served from a queue, then from a
//! configurable fallback; every request is recorded for assertions.
#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use selenite::common::command::{RequestData, RequestMethod};
use selenite::error::WebDriverResult;
use selenite::http::connection_sync::{
    HttpClientCreateParams, RawResponse, WebDriverHttpClientSync,
};
use selenite::{SessionId, WebDriverSession};

pub const W3C_KEY: &str = "element-6066-11e4-a52e-4f735466cecf";

#[derive(Debug, Clone, Default)]
pub struct RequestLog(Arc<Mutex<Vec<RequestData>>>);

impl RequestLog {
    pub fn len(&self) -> usize {
        self.0.lock().unwrap().len()
    }

    /// Number of recorded requests with the given method and URL suffix.
    pub fn count(&self, method: RequestMethod, url_suffix: &str) -> usize {
        self.0
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.method == method && r.url.ends_with(url_suffix))
            .count()
    }

    fn record(&self, request: RequestData) {
        self.0.lock().unwrap().push(request);
    }
}

#[derive(Debug)]
pub struct FakeDriverSync {
    script: Mutex<VecDeque<RawResponse>>,
    fallback: RawResponse,
    log: RequestLog,
}

impl FakeDriverSync {
    pub fn new() -> Self {
        FakeDriverSync {
            script: Mutex::new(VecDeque::new()),
            fallback: ok_response(r#"{"value":null}"#),
            log: RequestLog::default(),
        }
    }

    /// Enqueue the next scripted response.
    pub fn push(self, status: u16, body: &str) -> Self {
        self.script.lock().unwrap().push_back(RawResponse {
            status,
            body: body.to_string(),
        });
        self
    }

    /// Response served once the script is exhausted.
    pub fn fallback(mut self, status: u16, body: &str) -> Self {
        self.fallback = RawResponse {
            status,
            body: body.to_string(),
        };
        self
    }

    pub fn log(&self) -> RequestLog {
        self.log.clone()
    }
}

impl WebDriverHttpClientSync for FakeDriverSync {
    fn create(_params: HttpClientCreateParams) -> WebDriverResult<Self> {
        Ok(FakeDriverSync::new())
    }

    fn set_request_timeout(&mut self, _timeout: Duration) {}

    fn execute_raw(&self, request_data: RequestData) -> WebDriverResult<RawResponse> {
        self.log.record(request_data);
        Ok(self
            .script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| self.fallback.clone()))
    }
}

fn ok_response(body: &str) -> RawResponse {
    RawResponse {
        status: 200,
        body: body.to_string(),
    }
}

pub fn session_with(fake: FakeDriverSync) -> (WebDriverSession, RequestLog) {
    let log = fake.log();
    let session = WebDriverSession::new(SessionId::from("sess1"), Arc::new(Mutex::new(fake)));
    (session, log)
}

pub fn element_body(id: &str) -> String {
    format!(r#"{{"value":{{"{}":"{}"}}}}"#, W3C_KEY, id)
}

pub fn no_such_element_body() -> String {
    r#"{"value":{"error":"no such element","message":"Unable to locate element"}}"#.to_string()
}

pub fn stale_element_body() -> String {
    r#"{"value":{"error":"stale element reference","message":"element is stale"}}"#.to_string()
}

pub fn bool_body(value: bool) -> String {
    format!(r#"{{"value":{}}}"#, value)
}

pub fn string_body(value: &str) -> String {
    format!(r#"{{"value":"{}"}}"#, value)
}
