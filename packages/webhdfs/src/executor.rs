//! HTTP execution abstraction.
//!
//! The protocol logic talks to an [`HttpExecutor`] so it can run against a
//! mock in tests, avoiding actual network calls.

use std::collections::HashMap;
use std::io::Write;
use std::time::Duration;

use reqwest::blocking::{Body, Client};
use reqwest::redirect::Policy;

use crate::config::DEFAULT_TIMEOUT;
use crate::error::Result;
use crate::types::{HttpRequest, HttpResponse, RequestBody};

/// Trait for executing HTTP requests.
pub trait HttpExecutor: Send + Sync {
    /// Execute a request and buffer the whole response body.
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse>;

    /// Execute a request and copy a successful response body into `sink`.
    ///
    /// The returned response has an empty `body` when it was streamed. Error
    /// responses keep their body so the caller can decode it.
    fn execute_into(&self, request: &HttpRequest, sink: &mut dyn Write) -> Result<HttpResponse> {
        let mut response = self.execute(request)?;
        if response.is_success() {
            sink.write_all(&response.body)?;
            response.body.clear();
        }
        Ok(response)
    }
}

/// Production HTTP executor using reqwest.
///
/// Redirects are never followed automatically and idle connections are not
/// kept, so every request opens its own connection and closes it when the
/// response is dropped.
pub struct ReqwestExecutor {
    client: Client,
}

impl ReqwestExecutor {
    /// Create a new executor with the given socket timeout.
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .redirect(Policy::none())
            .pool_max_idle_per_host(0)
            .build()?;

        Ok(Self { client })
    }

    /// Create with the default timeout of 600 seconds.
    pub fn with_default_timeout() -> Result<Self> {
        Self::new(DEFAULT_TIMEOUT)
    }

    fn send(&self, request: &HttpRequest) -> Result<reqwest::blocking::Response> {
        let method: http::Method = request.method.into();
        let mut req_builder = self.client.request(method, request.url()?);

        req_builder = match &request.body {
            RequestBody::Empty => req_builder,
            RequestBody::Bytes(bytes) => req_builder.body(bytes.clone()),
            RequestBody::File(path) => req_builder.body(Body::from(std::fs::File::open(path)?)),
        };

        Ok(req_builder.send()?)
    }
}

fn response_head(response: &reqwest::blocking::Response) -> HttpResponse {
    let status = response.status().as_u16();
    let status_text = response
        .status()
        .canonical_reason()
        .unwrap_or("Unknown")
        .to_string();

    let mut headers = HashMap::new();
    for (name, value) in response.headers() {
        if let Ok(v) = value.to_str() {
            headers.insert(name.to_string(), v.to_string());
        }
    }

    HttpResponse {
        status,
        status_text,
        headers,
        body: Vec::new(),
        content_length: response.content_length(),
    }
}

impl HttpExecutor for ReqwestExecutor {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse> {
        let response = self.send(request)?;
        let mut head = response_head(&response);
        head.body = response.bytes()?.to_vec();
        Ok(head)
    }

    fn execute_into(&self, request: &HttpRequest, sink: &mut dyn Write) -> Result<HttpResponse> {
        let mut response = self.send(request)?;
        let mut head = response_head(&response);
        if head.is_success() {
            response.copy_to(sink)?;
        } else {
            head.body = response.bytes()?.to_vec();
        }
        Ok(head)
    }
}
