//! RESP Protocol Implementation
//!
//! The wire codec shared by the transport and the reply decoder.
//!
//! ## Modules
//!
//! - `types`: The `RespValue` enum and its serializer
//! - `parser`: Resumable parser for replies read off a socket
//!
//! ## Example
//!
//! ```
//! use flashbloom::protocol::{parse_message, RespValue};
//!
//! // Outgoing command
//! let bytes = RespValue::command(["BF.EXISTS", "users", "alice"]).serialize();
//! assert!(bytes.starts_with(b"*3\r\n"));
//!
//! // Incoming reply
//! let (reply, _) = parse_message(b":1\r\n").unwrap().unwrap();
//! assert_eq!(reply.as_integer(), Some(1));
//! ```

pub mod parser;
pub mod types;

pub use parser::{parse_message, ParseError, ParseResult, RespParser};
pub use types::RespValue;
