//! Item Encoding
//!
//! Filter members arrive as text or numbers and leave as a single bulk
//! string. The service hashes the raw bytes, so `Item::from(42)` and
//! `Item::from("42")` address the same member.

use bytes::Bytes;
use std::fmt;

/// A numeric member value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    Int(i64),
    UInt(u64),
    Float(f64),
}

/// A member value of a filter.
#[derive(Debug, Clone, PartialEq)]
pub enum Item {
    Text(String),
    Number(Number),
}

impl Item {
    /// Encodes the item into its wire scalar.
    ///
    /// Text is passed through byte for byte. Integers use their decimal
    /// form, floats the shortest representation that parses back to the
    /// same value.
    pub fn encode(&self) -> Bytes {
        match self {
            Item::Text(s) => Bytes::copy_from_slice(s.as_bytes()),
            Item::Number(Number::Int(n)) => Bytes::from(n.to_string()),
            Item::Number(Number::UInt(n)) => Bytes::from(n.to_string()),
            Item::Number(Number::Float(x)) => Bytes::from(x.to_string()),
        }
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Item::Text(s) => write!(f, "{}", s),
            Item::Number(Number::Int(n)) => write!(f, "{}", n),
            Item::Number(Number::UInt(n)) => write!(f, "{}", n),
            Item::Number(Number::Float(x)) => write!(f, "{}", x),
        }
    }
}

impl From<&str> for Item {
    fn from(s: &str) -> Self {
        Item::Text(s.to_string())
    }
}

impl From<String> for Item {
    fn from(s: String) -> Self {
        Item::Text(s)
    }
}

impl From<&String> for Item {
    fn from(s: &String) -> Self {
        Item::Text(s.clone())
    }
}

impl From<&&str> for Item {
    fn from(s: &&str) -> Self {
        Item::Text(s.to_string())
    }
}

macro_rules! impl_from_int {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Item {
                fn from(n: $t) -> Self {
                    Item::Number(Number::Int(i64::from(n)))
                }
            }
        )*
    };
}

impl_from_int!(i8, i16, i32, i64, u8, u16, u32);

impl From<u64> for Item {
    fn from(n: u64) -> Self {
        Item::Number(Number::UInt(n))
    }
}

impl From<usize> for Item {
    fn from(n: usize) -> Self {
        Item::Number(Number::UInt(n as u64))
    }
}

impl From<isize> for Item {
    fn from(n: isize) -> Self {
        Item::Number(Number::Int(n as i64))
    }
}

impl From<f32> for Item {
    fn from(x: f32) -> Self {
        Item::Number(Number::Float(f64::from(x)))
    }
}

impl From<f64> for Item {
    fn from(x: f64) -> Self {
        Item::Number(Number::Float(x))
    }
}

/// Encodes a batch of items in call order.
pub fn encode_all(items: &[Item]) -> impl Iterator<Item = Bytes> + '_ {
    items.iter().map(Item::encode)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_passes_through() {
        assert_eq!(Item::from("héllo world").encode(), Bytes::from("héllo world"));
        assert_eq!(Item::from("").encode(), Bytes::new());
    }

    #[test]
    fn test_integers_are_decimal() {
        assert_eq!(Item::from(42).encode(), Bytes::from("42"));
        assert_eq!(Item::from(-7i64).encode(), Bytes::from("-7"));
        assert_eq!(Item::from(i64::MAX).encode(), Bytes::from(i64::MAX.to_string()));
    }

    #[test]
    fn test_unsigned_beyond_i64() {
        assert_eq!(Item::from(u64::MAX).encode(), Bytes::from("18446744073709551615"));
        assert_eq!(Item::from(5u64).encode(), Item::from(5).encode());
        assert_eq!(Item::from(7usize).encode(), Bytes::from("7"));
        assert_eq!(Item::from(-3isize).encode(), Bytes::from("-3"));
        assert_eq!(Item::from(u64::MAX).to_string(), "18446744073709551615");
    }

    #[test]
    fn test_borrowed_text() {
        let names = vec!["a", "b"];
        let items: Vec<Item> = names.iter().map(Item::from).collect();
        assert_eq!(items, vec![Item::from("a"), Item::from("b")]);
    }

    #[test]
    fn test_floats_round_trip() {
        assert_eq!(Item::from(0.01).encode(), Bytes::from("0.01"));
        let x = 1.0f64 / 3.0;
        let encoded = Item::from(x).encode();
        let parsed: f64 = std::str::from_utf8(&encoded).unwrap().parse().unwrap();
        assert_eq!(parsed, x);
    }

    #[test]
    fn test_number_and_text_share_encoding() {
        assert_eq!(Item::from(42).encode(), Item::from("42").encode());
    }

    #[test]
    fn test_encode_all_preserves_order() {
        let items: Vec<Item> = vec!["b".into(), 1.into(), "a".into()];
        let encoded: Vec<Bytes> = encode_all(&items).collect();
        assert_eq!(encoded, vec![Bytes::from("b"), Bytes::from("1"), Bytes::from("a")]);
    }
}
