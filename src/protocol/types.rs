//! RESP Value Types
//!
//! The client speaks RESP2 in both directions: every command leaves as an
//! array of bulk strings, and every reply comes back as one of the five
//! RESP2 types.
//!
//! ## Wire Prefixes
//!
//! - `+` Simple String (`+OK\r\n`)
//! - `-` Error (`-ERR not found\r\n`)
//! - `:` Integer (`:1\r\n`)
//! - `$` Bulk String (`$5\r\nhello\r\n`, null is `$-1\r\n`)
//! - `*` Array (`*2\r\n:1\r\n:0\r\n`, null is `*-1\r\n`)

use bytes::Bytes;
use std::fmt;

/// The CRLF terminator used in RESP protocol
pub const CRLF: &[u8] = b"\r\n";

/// RESP protocol type prefixes
pub mod prefix {
    pub const SIMPLE_STRING: u8 = b'+';
    pub const ERROR: u8 = b'-';
    pub const INTEGER: u8 = b':';
    pub const BULK_STRING: u8 = b'$';
    pub const ARRAY: u8 = b'*';
}

/// A single RESP2 value, either an outgoing command or an incoming reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RespValue {
    /// Short status reply such as `OK`.
    SimpleString(String),

    /// Error reply. The text is the service's diagnostic, usually starting
    /// with an error class such as `ERR`.
    Error(String),

    /// 64-bit signed integer.
    Integer(i64),

    /// Binary-safe string.
    BulkString(Bytes),

    /// Null bulk string or null array.
    Null,

    /// Ordered sequence of values, possibly nested.
    Array(Vec<RespValue>),
}

impl RespValue {
    /// Creates a simple string value.
    ///
    /// # Example
    /// ```
    /// use flashbloom::protocol::types::RespValue;
    /// let ok = RespValue::simple_string("OK");
    /// assert!(ok.is_ok());
    /// ```
    pub fn simple_string(s: impl Into<String>) -> Self {
        RespValue::SimpleString(s.into())
    }

    /// Creates an error value.
    pub fn error(s: impl Into<String>) -> Self {
        RespValue::Error(s.into())
    }

    pub fn integer(n: i64) -> Self {
        RespValue::Integer(n)
    }

    /// Creates a bulk string value.
    pub fn bulk_string(data: impl Into<Bytes>) -> Self {
        RespValue::BulkString(data.into())
    }

    pub fn array(values: Vec<RespValue>) -> Self {
        RespValue::Array(values)
    }

    /// The `+OK` acknowledgement.
    pub fn ok() -> Self {
        RespValue::SimpleString("OK".to_string())
    }

    /// Builds the array-of-bulk-strings form every command is sent in.
    pub fn command<I>(parts: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Bytes>,
    {
        RespValue::Array(
            parts
                .into_iter()
                .map(|part| RespValue::BulkString(part.into()))
                .collect(),
        )
    }

    /// Serializes the value to its wire form.
    pub fn serialize(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(self.encoded_len_hint());
        self.serialize_into(&mut buf);
        buf
    }

    /// Serializes the value into an existing buffer, so a connection can
    /// reuse one allocation across commands.
    pub fn serialize_into(&self, buf: &mut Vec<u8>) {
        match self {
            RespValue::SimpleString(s) => write_line(buf, prefix::SIMPLE_STRING, s.as_bytes()),
            RespValue::Error(s) => write_line(buf, prefix::ERROR, s.as_bytes()),
            RespValue::Integer(n) => write_line(buf, prefix::INTEGER, n.to_string().as_bytes()),
            RespValue::BulkString(data) => {
                write_line(buf, prefix::BULK_STRING, data.len().to_string().as_bytes());
                buf.extend_from_slice(data);
                buf.extend_from_slice(CRLF);
            }
            RespValue::Null => write_line(buf, prefix::BULK_STRING, b"-1"),
            RespValue::Array(values) => {
                write_line(buf, prefix::ARRAY, values.len().to_string().as_bytes());
                for value in values {
                    value.serialize_into(buf);
                }
            }
        }
    }

    /// Rough serialized size, used only to size buffers up front.
    fn encoded_len_hint(&self) -> usize {
        match self {
            RespValue::BulkString(data) => data.len() + 16,
            RespValue::Array(values) => 16 + values.iter().map(Self::encoded_len_hint).sum::<usize>(),
            RespValue::SimpleString(s) | RespValue::Error(s) => s.len() + 3,
            RespValue::Integer(_) | RespValue::Null => 24,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, RespValue::Null)
    }

    pub fn is_error(&self) -> bool {
        matches!(self, RespValue::Error(_))
    }

    /// Returns true for the `+OK` acknowledgement.
    pub fn is_ok(&self) -> bool {
        matches!(self, RespValue::SimpleString(s) if s == "OK")
    }

    /// Extracts text from a SimpleString or a UTF-8 BulkString.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            RespValue::SimpleString(s) => Some(s),
            RespValue::BulkString(b) => std::str::from_utf8(b).ok(),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            RespValue::BulkString(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            RespValue::Integer(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[RespValue]> {
        match self {
            RespValue::Array(arr) => Some(arr),
            _ => None,
        }
    }

    /// Consumes self and returns the inner array if this is an Array variant.
    pub fn into_array(self) -> Option<Vec<RespValue>> {
        match self {
            RespValue::Array(arr) => Some(arr),
            _ => None,
        }
    }
}

fn write_line(buf: &mut Vec<u8>, type_prefix: u8, content: &[u8]) {
    buf.push(type_prefix);
    buf.extend_from_slice(content);
    buf.extend_from_slice(CRLF);
}

impl fmt::Display for RespValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RespValue::SimpleString(s) => write!(f, "{}", s),
            RespValue::Error(s) => write!(f, "(error) {}", s),
            RespValue::Integer(n) => write!(f, "(integer) {}", n),
            RespValue::BulkString(data) => match std::str::from_utf8(data) {
                Ok(s) => write!(f, "\"{}\"", s),
                Err(_) => write!(f, "(binary data, {} bytes)", data.len()),
            },
            RespValue::Null => write!(f, "(nil)"),
            RespValue::Array(values) if values.is_empty() => write!(f, "(empty array)"),
            RespValue::Array(values) => {
                let rendered: Vec<String> = values.iter().map(|v| v.to_string()).collect();
                write!(f, "[{}]", rendered.join(", "))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_serializes_as_bulk_array() {
        let value = RespValue::command(["BF.ADD", "users", "alice"]);
        assert_eq!(
            value.serialize(),
            b"*3\r\n$6\r\nBF.ADD\r\n$5\r\nusers\r\n$5\r\nalice\r\n"
        );
    }

    #[test]
    fn test_error_serialize() {
        let value = RespValue::error("ERR not found");
        assert_eq!(value.serialize(), b"-ERR not found\r\n");
    }

    #[test]
    fn test_integer_serialize() {
        assert_eq!(RespValue::integer(1).serialize(), b":1\r\n");
        assert_eq!(RespValue::integer(-42).serialize(), b":-42\r\n");
    }

    #[test]
    fn test_null_serialize() {
        assert_eq!(RespValue::Null.serialize(), b"$-1\r\n");
    }

    #[test]
    fn test_nested_array_serialize() {
        let value = RespValue::array(vec![
            RespValue::integer(1),
            RespValue::array(vec![RespValue::integer(0), RespValue::error("ERR x")]),
        ]);
        assert_eq!(value.serialize(), b"*2\r\n:1\r\n*2\r\n:0\r\n-ERR x\r\n");
    }

    #[test]
    fn test_is_ok() {
        assert!(RespValue::ok().is_ok());
        assert!(!RespValue::simple_string("QUEUED").is_ok());
        assert!(!RespValue::bulk_string("OK").is_ok());
    }

    #[test]
    fn test_display_array() {
        let value = RespValue::array(vec![RespValue::integer(1), RespValue::Null]);
        assert_eq!(value.to_string(), "[(integer) 1, (nil)]");
    }
}
