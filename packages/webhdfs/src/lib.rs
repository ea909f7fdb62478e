//! # webhdfs
//!
//! Blocking client for the WebHDFS REST protocol.
//!
//! Metadata operations are a single request to the NameNode. Reads and
//! writes are a two-step handshake: the NameNode answers with a redirect
//! naming a DataNode, and the bytes move in a second request to that
//! DataNode.
//!
//! ```ignore
//! use webhdfs::{ReadRange, WebHdfsClient};
//!
//! let client = WebHdfsClient::new("namenode.example", 50070, "hadoop")?;
//!
//! client.mkdir("/user/hadoop/reports")?;
//! client.copy_from_local("report.csv", "/user/hadoop/reports/report.csv", 3, true)?;
//!
//! for entry in client.list_dir("/user/hadoop/reports")? {
//!     println!("{} ({} bytes)", entry.name, entry.length);
//! }
//!
//! // `.gz` files come back decompressed.
//! let text = client.read_file("/logs/app.log.gz", ReadRange::new(0, 64 * 1024))?;
//! ```
//!
//! ## Configuration
//!
//! [`WebHdfsConfig`] can be built in code or loaded from JSON. A custom
//! [`HttpExecutor`] replaces the reqwest transport, and a custom
//! [`Diagnostics`] sink receives the request log.

pub mod compression;
pub mod config;
pub mod control;
pub mod diagnostics;
pub mod error;
pub mod executor;
pub mod operation;
pub mod query;
pub mod redirect;
pub mod status;
pub mod types;

mod client;
mod data;

pub use client::WebHdfsClient;
pub use config::WebHdfsConfig;
pub use control::{ControlOutcome, WEBHDFS_CONTEXT_ROOT};
pub use diagnostics::{Diagnostics, LogDiagnostics, NoopDiagnostics};
pub use error::{Error, RemoteException, Result};
pub use executor::{HttpExecutor, ReqwestExecutor};
pub use operation::{Operation, ReadRange};
pub use query::Query;
pub use redirect::{parse_location, RedirectTarget};
pub use status::{DirEntry, FileType};
pub use types::{Endpoint, HttpRequest, HttpResponse, Method, RequestBody};
