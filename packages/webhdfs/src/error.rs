use serde::{Deserialize, Serialize};

/// Exception payload returned by the NameNode or a DataNode on failure.
///
/// WebHDFS wraps it as `{"RemoteException": {...}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteException {
    pub exception: String,
    #[serde(default)]
    pub java_class_name: String,
    #[serde(default)]
    pub message: String,
}

impl RemoteException {
    /// Extract the exception from a response body, if it carries one.
    pub fn from_body(body: &[u8]) -> Option<Self> {
        #[derive(Deserialize)]
        struct Envelope {
            #[serde(rename = "RemoteException")]
            remote_exception: RemoteException,
        }

        serde_json::from_slice::<Envelope>(body)
            .ok()
            .map(|envelope| envelope.remote_exception)
    }
}

impl std::fmt::Display for RemoteException {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.exception, self.message)
    }
}

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Malformed redirect location '{location}': {reason}")]
    MalformedRedirect { location: String, reason: String },

    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Remote error: HTTP {status} {reason}{}", exception_suffix(.exception))]
    Remote {
        status: u16,
        reason: String,
        exception: Option<RemoteException>,
    },

    #[error("{op} did not redirect to a datanode")]
    MissingRedirect { op: &'static str },

    #[error("Unexpected {op} response: {message}")]
    UnexpectedResponse { op: &'static str, message: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    #[error("Invalid configuration: {message}")]
    Config { message: String },
}

impl Error {
    /// HTTP status of a remote failure, if this error carries one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Remote { status, .. } => Some(*status),
            Error::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

fn exception_suffix(exception: &Option<RemoteException>) -> String {
    exception
        .as_ref()
        .map(|e| format!(" ({})", e))
        .unwrap_or_default()
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
