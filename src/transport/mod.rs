//! Transport Module
//!
//! A transport delivers one [`Command`] and hands back the raw reply. It
//! knows nothing about filters: error replies come back as
//! `Ok(RespValue::Error(..))` and are classified by the client, while
//! `Err(TransportError)` is reserved for delivery failures.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────┐  Command   ┌──────────────────┐   RESP bytes   ┌─────────┐
//! │ ScalableBloom    │───────────>│  Transport       │───────────────>│ Service │
//! │ Filter           │<───────────│  (TcpTransport)  │<───────────────│         │
//! └──────────────────┘  RespValue └──────────────────┘                └─────────┘
//! ```
//!
//! The trait is object safe, so a client can also be built over
//! `Arc<dyn Transport>`.

pub mod tcp;

#[cfg(test)]
pub(crate) mod mock;

use crate::commands::Command;
use crate::error::TransportError;
use crate::protocol::RespValue;
use async_trait::async_trait;

pub use tcp::{TcpTransport, TransportStats};

/// Delivers commands to the filter service.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Sends one command and waits for its reply.
    async fn submit(&self, command: &Command) -> Result<RespValue, TransportError>;
}
