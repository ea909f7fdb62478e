use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;

use serde::de::DeserializeOwned;
use url::Url;

use crate::error::{Error, Result};
use crate::query::Query;

/// HTTP methods used by the WebHDFS operations this client issues
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Method {
    #[default]
    GET,
    PUT,
    DELETE,
}

impl From<Method> for http::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::GET => http::Method::GET,
            Method::PUT => http::Method::PUT,
            Method::DELETE => http::Method::DELETE,
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let method: http::Method = (*self).into();
        f.write_str(method.as_str())
    }
}

/// A NameNode or DataNode address.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Endpoint {
    pub host: String,
    pub port: u16,
}

impl Endpoint {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

/// Payload sent with a request.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RequestBody {
    #[default]
    Empty,
    /// Fully buffered bytes.
    Bytes(Vec<u8>),
    /// A local file streamed as the body.
    File(PathBuf),
}

/// A single HTTP exchange against one endpoint.
#[derive(Debug, Clone, Default)]
pub struct HttpRequest {
    pub method: Method,

    /// Target host and port. Left empty only in tests that never execute.
    pub endpoint: Option<Endpoint>,

    /// Unencoded path; split on `/` and percent-encoded segment by segment.
    pub path: String,

    pub query: Query,

    pub body: RequestBody,
}

impl HttpRequest {
    pub fn new(method: Method, endpoint: Endpoint, path: impl Into<String>) -> Self {
        Self {
            method,
            endpoint: Some(endpoint),
            path: path.into(),
            ..Default::default()
        }
    }

    pub fn get(endpoint: Endpoint, path: impl Into<String>) -> Self {
        Self::new(Method::GET, endpoint, path)
    }

    pub fn put(endpoint: Endpoint, path: impl Into<String>) -> Self {
        Self::new(Method::PUT, endpoint, path)
    }

    pub fn delete(endpoint: Endpoint, path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, endpoint, path)
    }

    pub fn with_query(mut self, query: Query) -> Self {
        self.query = query;
        self
    }

    pub fn with_body(mut self, body: RequestBody) -> Self {
        self.body = body;
        self
    }

    /// Path and query as they go on the wire, e.g. `/webhdfs/v1/a?op=OPEN`.
    pub fn target(&self) -> String {
        let mut target = String::new();
        for segment in self.path.split('/').filter(|s| !s.is_empty()) {
            target.push('/');
            target.extend(percent_encoding::utf8_percent_encode(
                segment,
                PATH_SEGMENT,
            ));
        }
        if target.is_empty() {
            target.push('/');
        }
        if !self.query.is_empty() {
            target.push('?');
            target.push_str(&self.query.to_string());
        }
        target
    }

    /// Absolute `http://` URL for this request.
    pub fn url(&self) -> Result<Url> {
        let endpoint = self.endpoint.as_ref().ok_or_else(|| Error::Config {
            message: format!("request for '{}' has no endpoint", self.path),
        })?;
        Ok(Url::parse(&format!("http://{}{}", endpoint, self.target()))?)
    }
}

/// Characters escaped inside a single path segment.
const PATH_SEGMENT: &percent_encoding::AsciiSet = &percent_encoding::CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// HTTP response from a request
#[derive(Debug, Clone, Default)]
pub struct HttpResponse {
    /// HTTP status code
    pub status: u16,

    /// Status text (e.g., "OK", "Temporary Redirect")
    pub status_text: String,

    /// Response headers, names lowercased
    pub headers: HashMap<String, String>,

    /// Raw body. Empty when the body was streamed elsewhere.
    pub body: Vec<u8>,

    /// Declared `Content-Length`, if any
    pub content_length: Option<u64>,
}

impl HttpResponse {
    pub fn new(status: u16) -> Self {
        Self {
            status,
            status_text: http::StatusCode::from_u16(status)
                .ok()
                .and_then(|s| s.canonical_reason())
                .unwrap_or("Unknown")
                .to_string(),
            ..Default::default()
        }
    }

    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.insert(name.to_ascii_lowercase(), value.into());
        self
    }

    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        let body = body.into();
        self.content_length = Some(body.len() as u64);
        self.body = body;
        self
    }

    /// Check if the response status indicates success (2xx)
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Check if the response status indicates a redirect (3xx)
    pub fn is_redirect(&self) -> bool {
        (300..400).contains(&self.status)
    }

    /// Value of the `Location` header, if present.
    pub fn location(&self) -> Option<&str> {
        self.headers.get("location").map(String::as_str)
    }

    /// True when the response carries no payload at all.
    pub fn has_empty_body(&self) -> bool {
        self.body.is_empty() && self.content_length.unwrap_or(0) == 0
    }

    /// Try to deserialize the body into a specific type
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_slice(&self.body)?)
    }

    /// Turn a non-2xx/3xx response into `Error::Remote`.
    pub fn error_for_status(self) -> Result<Self> {
        if self.is_success() || self.is_redirect() {
            return Ok(self);
        }
        Err(Error::Remote {
            status: self.status,
            reason: self.status_text,
            exception: crate::error::RemoteException::from_body(&self.body),
        })
    }
}
