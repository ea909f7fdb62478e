//! Typed views over WebHDFS status documents.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum FileType {
    File,
    Directory,
    Symlink,
    #[serde(other)]
    Other,
}

/// One entry of a directory listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirEntry {
    #[serde(rename = "pathSuffix")]
    pub name: String,
    pub length: u64,
    #[serde(rename = "type")]
    pub kind: FileType,
}

impl DirEntry {
    pub fn new(name: impl Into<String>, length: u64, kind: FileType) -> Self {
        Self {
            name: name.into(),
            length,
            kind,
        }
    }

    pub fn is_dir(&self) -> bool {
        self.kind == FileType::Directory
    }
}

#[derive(Deserialize)]
struct Listing {
    #[serde(rename = "FileStatuses")]
    file_statuses: FileStatuses,
}

#[derive(Deserialize)]
struct FileStatuses {
    #[serde(rename = "FileStatus")]
    file_status: Vec<DirEntry>,
}

/// Extract the entries of a `LISTSTATUS` document in the order given.
pub fn parse_listing(document: serde_json::Value) -> Result<Vec<DirEntry>> {
    let listing: Listing =
        serde_json::from_value(document).map_err(|e| Error::UnexpectedResponse {
            op: "LISTSTATUS",
            message: e.to_string(),
        })?;
    Ok(listing.file_statuses.file_status)
}

/// Take the `FileStatus` member of a `GETFILESTATUS` document, untouched.
pub fn take_file_status(mut document: serde_json::Value) -> Option<serde_json::Value> {
    document
        .as_object_mut()
        .and_then(|object| object.remove("FileStatus"))
}
