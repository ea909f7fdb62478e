use std::fs::File;
use std::path::Path;

use log::Level;
use serde_json::Value;
use tempfile::NamedTempFile;

use crate::compression::{decompress_bounded, is_compressed};
use crate::config::WebHdfsConfig;
use crate::control::{ControlOutcome, ControlPlane};
use crate::data::DataPlane;
use crate::diagnostics::{Diagnostics, LogDiagnostics};
use crate::error::{Error, Result};
use crate::executor::{HttpExecutor, ReqwestExecutor};
use crate::operation::{Operation, ReadRange};
use crate::status::{parse_listing, take_file_status, DirEntry};
use crate::types::{Endpoint, RequestBody};

/// Client for one NameNode, acting as one user.
///
/// Each call opens its own connections and holds no mutable state, so a
/// client can be shared between threads.
///
/// # Example
///
/// ```ignore
/// use webhdfs::{ReadRange, WebHdfsClient};
///
/// let client = WebHdfsClient::new("namenode.hadoop.staging.corp", 50070, "hadoop_user")?;
/// for entry in client.list_dir("/data/product")? {
///     println!("{:?} {} {}", entry.kind, entry.length, entry.name);
/// }
/// let head = client.read_file("/data/product/file.log-2013-05-31.gz", ReadRange::default())?;
/// ```
pub struct WebHdfsClient {
    namenode: Endpoint,
    username: String,
    datanode_port: Option<u16>,
    executor: Box<dyn HttpExecutor>,
    diagnostics: Box<dyn Diagnostics>,
}

impl WebHdfsClient {
    pub fn new(namenode_host: &str, namenode_port: u16, username: &str) -> Result<Self> {
        Self::from_config(WebHdfsConfig::new(namenode_host, namenode_port, username))
    }

    /// Create a client talking HTTP through reqwest.
    pub fn from_config(config: WebHdfsConfig) -> Result<Self> {
        config.validate()?;
        let executor = ReqwestExecutor::new(config.timeout())?;
        Ok(Self::with_executor(config, executor))
    }

    /// Create a client with a custom executor.
    ///
    /// Diagnostics go to the `log` facade and stay silent until the
    /// application installs a `log` backend. Use [`Self::with_diagnostics`]
    /// to send them elsewhere.
    pub fn with_executor(config: WebHdfsConfig, executor: impl HttpExecutor + 'static) -> Self {
        Self {
            namenode: config.namenode(),
            username: config.username,
            datanode_port: config.datanode_port,
            executor: Box::new(executor),
            diagnostics: Box::new(LogDiagnostics),
        }
    }

    /// Replace the diagnostics sink.
    pub fn with_diagnostics(mut self, diagnostics: impl Diagnostics + 'static) -> Self {
        self.diagnostics = Box::new(diagnostics);
        self
    }

    pub fn namenode(&self) -> &Endpoint {
        &self.namenode
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    fn control(&self) -> ControlPlane<'_> {
        ControlPlane {
            executor: self.executor.as_ref(),
            diagnostics: self.diagnostics.as_ref(),
            namenode: &self.namenode,
            username: &self.username,
        }
    }

    fn data(&self) -> DataPlane<'_> {
        DataPlane {
            executor: self.executor.as_ref(),
            diagnostics: self.diagnostics.as_ref(),
            fallback_port: self.datanode_port,
        }
    }

    fn log(&self, level: Level, message: &str) {
        self.diagnostics.log(level, message);
    }

    /// Run a metadata operation and return its JSON document.
    fn metadata(&self, op: Operation, path: &str) -> Result<Value> {
        match self.control().call(&op, path)? {
            ControlOutcome::Metadata(document) => {
                self.log(Level::Trace, &format!("Data: {}", document));
                Ok(document)
            }
            ControlOutcome::EmptyBody { .. } => Err(Error::UnexpectedResponse {
                op: op.name(),
                message: "empty body".to_string(),
            }),
            ControlOutcome::Redirected(target) => Err(Error::UnexpectedResponse {
                op: op.name(),
                message: format!("unexpected redirect to {}", target.host),
            }),
        }
    }

    /// Create `path` and any missing parents. Returns `{"boolean": ..}`.
    pub fn mkdir(&self, path: &str) -> Result<Value> {
        self.log(Level::Debug, &format!("Create directory: {}", path));
        self.metadata(Operation::Mkdirs, path)
    }

    /// Delete `path` recursively. Returns `{"boolean": ..}`.
    pub fn rmdir(&self, path: &str) -> Result<Value> {
        self.log(Level::Debug, &format!("Delete directory: {}", path));
        self.metadata(Operation::Delete { recursive: true }, path)
    }

    /// List the entries of a directory in the order the NameNode returns them.
    pub fn list_dir(&self, path: &str) -> Result<Vec<DirEntry>> {
        self.log(Level::Debug, &format!("List directory: {}", path));
        let entries = parse_listing(self.metadata(Operation::ListStatus, path)?)?;
        for entry in &entries {
            self.log(Level::Trace, &format!("{:?}: {}", entry.kind, entry.name));
        }
        Ok(entries)
    }

    /// The `FileStatus` object of `path`, or `None` if the answer lacks one.
    pub fn get_file_status(&self, path: &str) -> Result<Option<Value>> {
        self.log(Level::Debug, &format!("File status: {}", path));
        Ok(take_file_status(
            self.metadata(Operation::GetFileStatus, path)?,
        ))
    }

    /// Upload a local file, buffering it in memory first.
    ///
    /// Returns the DataNode's JSON answer, or `Value::Null` when it has no
    /// body.
    pub fn copy_from_local(
        &self,
        source: impl AsRef<Path>,
        target: &str,
        replication: u16,
        overwrite: bool,
    ) -> Result<Value> {
        let body = std::fs::read(source)?;
        self.create(target, replication, overwrite, RequestBody::Bytes(body))
    }

    /// Upload a local file, streaming it from disk as the request body.
    pub fn copy_from_local_streaming(
        &self,
        source: impl AsRef<Path>,
        target: &str,
        replication: u16,
        overwrite: bool,
    ) -> Result<Value> {
        let source = source.as_ref();
        // Fail before touching the NameNode if the file cannot be read.
        File::open(source)?;
        self.create(
            target,
            replication,
            overwrite,
            RequestBody::File(source.to_path_buf()),
        )
    }

    fn create(
        &self,
        target: &str,
        replication: u16,
        overwrite: bool,
        body: RequestBody,
    ) -> Result<Value> {
        let op = Operation::Create { overwrite };
        let redirect = match self.control().call(&op, target)? {
            ControlOutcome::Redirected(redirect) => redirect,
            _ => return Err(Error::MissingRedirect { op: op.name() }),
        };

        let response = self.data().upload(&redirect, replication, body)?;
        if response.has_empty_body() {
            return Ok(Value::Null);
        }
        response.json()
    }

    /// Download `source` into the local file `target`, replacing it.
    ///
    /// The bytes land in a temporary file next to `target`, which replaces
    /// `target` only once the download succeeded. An empty remote file
    /// produces an empty local file without contacting a DataNode. Returns
    /// the HTTP status of the last response.
    pub fn copy_to_local(&self, source: &str, target: impl AsRef<Path>) -> Result<u16> {
        let target = target.as_ref();
        let op = Operation::Open { range: None };
        match self.control().call(&op, source)? {
            ControlOutcome::Redirected(redirect) => {
                let dir = match target.parent() {
                    Some(parent) if !parent.as_os_str().is_empty() => parent,
                    _ => Path::new("."),
                };
                let mut staged = NamedTempFile::new_in(dir)?;
                let status = self.data().download(&redirect, staged.as_file_mut())?;
                staged.persist(target).map_err(|e| e.error)?;
                Ok(status)
            }
            ControlOutcome::EmptyBody { status } => {
                File::create(target)?;
                Ok(status)
            }
            ControlOutcome::Metadata(_) => Err(Error::MissingRedirect { op: op.name() }),
        }
    }

    /// Read a byte window of `source` into memory.
    ///
    /// Files ending in `.gz` or `.deflate` are decompressed, and the
    /// decompressed output is cut at `range.length` bytes.
    pub fn read_file(&self, source: &str, range: ReadRange) -> Result<Vec<u8>> {
        let op = Operation::Open { range: Some(range) };
        match self.control().call(&op, source)? {
            ControlOutcome::Redirected(redirect) => {
                let data = self.data().fetch(&redirect)?;
                if !is_compressed(source) {
                    return Ok(data);
                }
                self.log(
                    Level::Debug,
                    &format!("Decompressing {} bytes from {}", data.len(), source),
                );
                Ok(decompress_bounded(&data, range.length)?)
            }
            ControlOutcome::EmptyBody { .. } => Ok(Vec::new()),
            ControlOutcome::Metadata(_) => Err(Error::MissingRedirect { op: op.name() }),
        }
    }
}
