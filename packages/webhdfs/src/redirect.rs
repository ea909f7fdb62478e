//! Parsing of the `Location` header a NameNode answers with.
//!
//! The network location must match `host[:port]` where the host is made of
//! ASCII letters, digits, `.` and `-`, and the port, when given, has two to
//! five digits. The port stays `None` when the header omits it; choosing a
//! fallback is up to the caller.

use lazy_static::lazy_static;
use percent_encoding::percent_decode_str;
use regex::Regex;

use crate::error::{Error, Result};
use crate::query::Query;
use crate::types::Endpoint;

/// Where the data-plane request has to go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedirectTarget {
    pub scheme: String,
    pub host: String,
    pub port: Option<u16>,
    /// Percent-decoded path without leading or trailing `/`.
    pub path: String,
    /// Query string exactly as it appeared in the header.
    pub query: String,
}

impl RedirectTarget {
    /// Resolve the DataNode endpoint, using `fallback_port` only when the
    /// redirect named no port.
    pub fn endpoint(&self, fallback_port: u16) -> Endpoint {
        Endpoint::new(self.host.clone(), self.port.unwrap_or(fallback_port))
    }

    /// Port conventionally associated with the redirect's scheme.
    pub fn scheme_default_port(&self) -> Option<u16> {
        match self.scheme.as_str() {
            "http" => Some(80),
            "https" => Some(443),
            _ => None,
        }
    }

    pub fn query(&self) -> Query {
        Query::from_raw(&self.query)
    }
}

/// Split a redirect URL into host, port, decoded path and raw query.
pub fn parse_location(location: &str) -> Result<RedirectTarget> {
    lazy_static! {
        static ref NETLOC: Regex =
            Regex::new(r"^(?P<host>[A-Za-z0-9.\-]+)(?::(?P<port>[0-9]{2,5}))?$").unwrap();
    }

    let malformed = |reason: &str| Error::MalformedRedirect {
        location: location.to_string(),
        reason: reason.to_string(),
    };

    let (scheme, rest) = location
        .split_once("://")
        .ok_or_else(|| malformed("missing scheme"))?;
    if scheme.is_empty() || !scheme.chars().all(|c| c.is_ascii_alphanumeric() || c == '+') {
        return Err(malformed("invalid scheme"));
    }

    // Fragments never reach the server.
    let rest = rest.split('#').next().unwrap_or_default();
    let netloc_end = rest.find(|c: char| c == '/' || c == '?').unwrap_or(rest.len());
    let (netloc, path_and_query) = rest.split_at(netloc_end);

    let captures = NETLOC
        .captures(netloc)
        .ok_or_else(|| malformed("invalid host and/or port"))?;
    let host = captures["host"].to_string();
    let port = match captures.name("port") {
        Some(digits) => match digits.as_str().parse::<u16>() {
            Ok(port) if port > 0 => Some(port),
            _ => return Err(malformed("port out of range")),
        },
        None => None,
    };

    let (raw_path, query) = path_and_query
        .split_once('?')
        .unwrap_or((path_and_query, ""));
    let path = percent_decode_str(raw_path)
        .decode_utf8()
        .map_err(|_| malformed("path is not valid UTF-8"))?
        .trim_matches('/')
        .to_string();

    Ok(RedirectTarget {
        scheme: scheme.to_ascii_lowercase(),
        host,
        port,
        path,
        query: query.to_string(),
    })
}
