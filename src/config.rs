//! Client Configuration
//!
//! Connection target and protocol settings shared by the transport and the
//! command-line front end.

use crate::protocol::parser::MAX_BULK_SIZE;
use crate::{DEFAULT_HOST, DEFAULT_NAMESPACE, DEFAULT_PORT};

/// Settings for connecting to a filter service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Host the service listens on
    pub host: String,
    /// Port the service listens on
    pub port: u16,
    /// Command namespace of the filter family, `BF` for scalable bloom filters
    pub namespace: String,
    /// Upper bound in bytes for a single buffered reply
    pub max_reply_size: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            namespace: DEFAULT_NAMESPACE.to_string(),
            max_reply_size: MAX_BULK_SIZE,
        }
    }
}

impl ClientConfig {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Self::default()
        }
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    pub fn with_max_reply_size(mut self, max_reply_size: usize) -> Self {
        self.max_reply_size = max_reply_size;
        self
    }

    /// Returns the `host:port` address to connect to
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
