//! Filter Client Module
//!
//! The public surface: one async method per filter operation.
//!
//! ## Architecture
//!
//! ```text
//! caller
//!   │
//!   ▼
//! ┌─────────────────────┐   ┌─────────────────┐
//! │ ScalableBloomFilter │──>│ CommandBuilder  │  (commands module)
//! │   (this module)     │   └─────────────────┘
//! │                     │   ┌─────────────────┐
//! │                     │──>│ Transport       │  (transport module)
//! │                     │   └─────────────────┘
//! │                     │   ┌─────────────────┐
//! │                     │──>│ Reply decoder   │  (reply)
//! └─────────────────────┘   └─────────────────┘
//! ```
//!
//! Local precondition failures (empty batches, out-of-range parameters)
//! are returned before anything reaches the transport.

pub mod filter;
pub mod reply;

pub use filter::{FilterFamily, ScalableBloomFilter};
pub use reply::{FilterInfo, InfoField, InfoValue};
