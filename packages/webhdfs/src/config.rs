//! Client configuration.
//!
//! NameNode host, port and username are required. Everything else has a
//! default:
//!
//! ```json
//! {
//!     "namenode_host": "namenode.hadoop.staging.corp",
//!     "namenode_port": 50070,
//!     "username": "hadoop_user",
//!     "timeout_secs": 600,
//!     "datanode_port": 50075
//! }
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::types::Endpoint;

/// Socket timeout applied to every connection unless overridden.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(600);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebHdfsConfig {
    pub namenode_host: String,
    pub namenode_port: u16,
    pub username: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Port used when a redirect `Location` names no port. `None` means the
    /// conventional port of the redirect's scheme.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub datanode_port: Option<u16>,
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT.as_secs()
}

impl WebHdfsConfig {
    pub fn new(
        namenode_host: impl Into<String>,
        namenode_port: u16,
        username: impl Into<String>,
    ) -> Self {
        Self {
            namenode_host: namenode_host.into(),
            namenode_port,
            username: username.into(),
            timeout_secs: default_timeout_secs(),
            datanode_port: None,
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    pub fn validate(&self) -> Result<()> {
        if self.namenode_host.trim().is_empty() {
            return Err(Error::Config {
                message: "namenode_host must not be empty".to_string(),
            });
        }
        if self.namenode_port == 0 {
            return Err(Error::Config {
                message: "namenode_port must be between 1 and 65535".to_string(),
            });
        }
        if self.username.trim().is_empty() {
            return Err(Error::Config {
                message: "username must not be empty".to_string(),
            });
        }
        if self.timeout_secs == 0 {
            return Err(Error::Config {
                message: "timeout_secs must be positive".to_string(),
            });
        }
        if self.datanode_port == Some(0) {
            return Err(Error::Config {
                message: "datanode_port must be between 1 and 65535".to_string(),
            });
        }
        Ok(())
    }

    pub fn namenode(&self) -> Endpoint {
        Endpoint::new(self.namenode_host.clone(), self.namenode_port)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
