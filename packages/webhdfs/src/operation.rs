//! WebHDFS operations and the query parameters each one carries.

use crate::query::Query;
use crate::types::Method;

/// Byte window requested from `OPEN`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadRange {
    pub offset: u64,
    pub length: u64,
    pub buffersize: u64,
}

impl ReadRange {
    pub fn new(offset: u64, length: u64) -> Self {
        Self {
            offset,
            length,
            ..Default::default()
        }
    }

    pub fn with_buffersize(mut self, buffersize: u64) -> Self {
        self.buffersize = buffersize;
        self
    }
}

impl Default for ReadRange {
    fn default() -> Self {
        Self {
            offset: 0,
            length: 10_000,
            buffersize: 10_000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    Mkdirs,
    Delete { recursive: bool },
    Create { overwrite: bool },
    Open { range: Option<ReadRange> },
    ListStatus,
    GetFileStatus,
}

impl Operation {
    /// Value of the `op` query parameter.
    pub fn name(&self) -> &'static str {
        match self {
            Operation::Mkdirs => "MKDIRS",
            Operation::Delete { .. } => "DELETE",
            Operation::Create { .. } => "CREATE",
            Operation::Open { .. } => "OPEN",
            Operation::ListStatus => "LISTSTATUS",
            Operation::GetFileStatus => "GETFILESTATUS",
        }
    }

    pub fn method(&self) -> Method {
        match self {
            Operation::Mkdirs | Operation::Create { .. } => Method::PUT,
            Operation::Delete { .. } => Method::DELETE,
            Operation::Open { .. } | Operation::ListStatus | Operation::GetFileStatus => {
                Method::GET
            }
        }
    }

    /// Whether the NameNode hands this operation off to a DataNode.
    pub fn redirects(&self) -> bool {
        matches!(self, Operation::Create { .. } | Operation::Open { .. })
    }

    /// `op=<NAME>` followed by the operation's own parameters.
    pub fn query(&self) -> Query {
        let mut query = Query::new().with("op", self.name());
        match self {
            Operation::Delete { recursive } => query.push("recursive", recursive),
            Operation::Create { overwrite } => query.push("overwrite", overwrite),
            Operation::Open { range: Some(range) } => {
                query.push("offset", range.offset);
                query.push("length", range.length);
                query.push("buffersize", range.buffersize);
            }
            _ => {}
        }
        query
    }
}
