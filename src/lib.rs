//! # FlashBloom - An Async Client for Scalable Bloom Filter Services
//!
//! FlashBloom talks to a remote scalable bloom filter over RESP: a
//! server-hosted set that answers "might this item be a member?" with a
//! bounded false-positive rate, never a false negative, and grows its
//! capacity as items arrive.
//!
//! The crate owns the command contract and nothing else. The filter
//! algorithm lives in the service; this side turns typed operations into
//! positional commands and typed results back out of the replies.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                              FlashBloom                                 │
//! │                                                                         │
//! │  ┌─────────────────────┐    ┌─────────────┐    ┌─────────────┐          │
//! │  │ ScalableBloomFilter │───>│  Command    │───>│ Item        │          │
//! │  │  (one per filter)   │    │  Builder    │    │ Encoder     │          │
//! │  └──────┬───────▲──────┘    └─────────────┘    └─────────────┘          │
//! │         │       │                                                       │
//! │         ▼       │                                                       │
//! │  ┌─────────────┐│           ┌─────────────┐                             │
//! │  │ Transport   ││           │   Reply     │                             │
//! │  │ (TCP, RESP) │└───────────│   Decoder   │                             │
//! │  └──────┬──────┘            └─────────────┘                             │
//! └─────────┼───────────────────────────────────────────────────────────────┘
//!           ▼
//!     filter service
//! ```
//!
//! ## Quick Start
//!
//! ```ignore
//! use flashbloom::{ClientConfig, InsertOptions, ScalableBloomFilter, TcpTransport};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ClientConfig::default();
//!     let transport = Arc::new(TcpTransport::connect(&config).await?);
//!
//!     let seen = ScalableBloomFilter::new(transport, "seen-urls");
//!     seen.reserve(0.001, 100_000).await?;
//!
//!     seen.add("https://example.com").await?;
//!     let flags = seen.mexists(["https://example.com", "https://rust-lang.org"]).await?;
//!     assert_eq!(flags, vec![true, false]);
//!
//!     // Insert into a filter only if it already exists.
//!     seen.insert(["https://docs.rs"], &InsertOptions::new().no_create()).await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Supported Commands
//!
//! - `BF.RESERVE name rate capacity [NONSCALING | EXPANSION n]`
//! - `BF.ADD name item` / `BF.MADD name item [item ...]`
//! - `BF.EXISTS name item` / `BF.MEXISTS name item [item ...]`
//! - `BF.INFO name`
//! - `BF.INSERT name [ERROR r] [CAPACITY c] [NONSCALING | EXPANSION n] [NOCREATE] ITEMS item...`
//!
//! ## Module Overview
//!
//! - [`commands`]: Item encoding and command construction
//! - [`client`]: The filter client and reply decoding
//! - [`transport`]: The transport trait and its TCP implementation
//! - [`protocol`]: RESP serializer and reply parser
//! - [`error`]: Error taxonomy
//! - [`config`]: Connection settings
//!
//! ## Design Highlights
//!
//! ### One Round Trip Per Call
//!
//! Every method maps to exactly one command. Batch methods (`madd`,
//! `mexists`, `insert`) send all items in that one command; the service
//! answers with one result per item in the same order.
//!
//! ### Never Sent vs. Rejected
//!
//! Empty batches and out-of-range parameters fail before submission.
//! [`FilterError::was_sent`] tells the two apart.

pub mod client;
pub mod commands;
pub mod config;
pub mod error;
pub mod protocol;
pub mod transport;

// Re-export commonly used types for convenience
pub use client::{FilterFamily, FilterInfo, ScalableBloomFilter};
pub use commands::{Command, CommandBuilder, InsertOptions, Item};
pub use config::ClientConfig;
pub use error::{FilterError, Result, TransportError};
pub use protocol::{ParseError, RespParser, RespValue};
pub use transport::{TcpTransport, Transport, TransportStats};

/// The default port filter services listen on (same as Redis)
pub const DEFAULT_PORT: u16 = 6379;

/// The default host to connect to
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Command namespace of the scalable bloom filter family
pub const DEFAULT_NAMESPACE: &str = "BF";

/// Version of FlashBloom
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
