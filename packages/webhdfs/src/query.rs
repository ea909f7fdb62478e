//! Ordered query-string builder.
//!
//! Pairs keep insertion order. Values added through [`Query::push`] are
//! form-urlencoded; a query lifted from a redirect with [`Query::from_raw`]
//! is reproduced byte for byte.

use std::fmt;

use url::form_urlencoded::byte_serialize;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    /// Already-encoded `key=value` (or bare `key`) pieces.
    pieces: Vec<String>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adopt an encoded query string as-is, e.g. the query of a `Location` header.
    pub fn from_raw(raw: &str) -> Self {
        Self {
            pieces: raw
                .split('&')
                .filter(|piece| !piece.is_empty())
                .map(str::to_string)
                .collect(),
        }
    }

    pub fn push(&mut self, key: &str, value: impl fmt::Display) {
        let key: String = byte_serialize(key.as_bytes()).collect();
        let value = value.to_string();
        let value: String = byte_serialize(value.as_bytes()).collect();
        self.pieces.push(format!("{}={}", key, value));
    }

    pub fn with(mut self, key: &str, value: impl fmt::Display) -> Self {
        self.push(key, value);
        self
    }

    /// Append another query's pieces after this one's.
    pub fn extend(&mut self, other: Query) {
        self.pieces.extend(other.pieces);
    }

    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pieces.len()
    }

    /// Raw (still encoded) value of the first piece named `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pieces.iter().find_map(|piece| match piece.split_once('=') {
            Some((k, v)) if k == key => Some(v),
            None if piece == key => Some(""),
            _ => None,
        })
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.pieces.join("&"))
    }
}
