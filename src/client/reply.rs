//! Reply Decoder
//!
//! Turns raw RESP replies into the shapes each filter operation promises.
//! Error replies are classified here; shape mismatches become
//! [`FilterError::UnexpectedReply`].

use crate::error::{FilterError, Result};
use crate::protocol::RespValue;
use std::fmt;

/// Lifts a top-level error reply into a classified [`FilterError`].
pub fn check_error(reply: RespValue) -> Result<RespValue> {
    match reply {
        RespValue::Error(message) => Err(FilterError::from_server_message(message)),
        other => Ok(other),
    }
}

/// `+OK` acknowledgement.
pub fn decode_ack(reply: RespValue) -> Result<()> {
    match check_error(reply)? {
        r if r.is_ok() => Ok(()),
        other => Err(unexpected("OK", &other)),
    }
}

/// A single 0/1 flag.
pub fn decode_flag(reply: RespValue) -> Result<bool> {
    match check_error(reply)? {
        RespValue::Integer(0) => Ok(false),
        RespValue::Integer(1) => Ok(true),
        other => Err(unexpected("0 or 1", &other)),
    }
}

/// One outcome per submitted item, in submission order. Per-item error
/// replies stay attached to their item.
pub fn decode_outcomes(reply: RespValue, expected: usize) -> Result<Vec<Result<bool>>> {
    let elements = expect_array(reply, expected)?;
    Ok(elements.into_iter().map(decode_flag).collect())
}

/// One flag per submitted item. Any error element fails the whole batch.
pub fn decode_flags(reply: RespValue, expected: usize) -> Result<Vec<bool>> {
    expect_array(reply, expected)?
        .into_iter()
        .map(decode_flag)
        .collect()
}

/// Alternating label/value pairs from `INFO`.
pub fn decode_info(reply: RespValue) -> Result<FilterInfo> {
    let elements = match check_error(reply)? {
        RespValue::Array(elements) => elements,
        other => return Err(unexpected("info array", &other)),
    };
    if elements.len() % 2 != 0 {
        return Err(FilterError::UnexpectedReply(format!(
            "info reply has an odd number of elements ({})",
            elements.len()
        )));
    }

    let mut fields = Vec::with_capacity(elements.len() / 2);
    let mut iter = elements.into_iter();
    while let (Some(label), Some(value)) = (iter.next(), iter.next()) {
        let label = match label.as_str() {
            Some(s) => s.to_string(),
            None => return Err(unexpected("info label", &label)),
        };
        let value = match value {
            RespValue::Integer(n) => InfoValue::Integer(n),
            RespValue::Null => InfoValue::Null,
            other => match other.as_str() {
                Some(s) => InfoValue::Text(s.to_string()),
                None => return Err(unexpected("info value", &other)),
            },
        };
        fields.push(InfoField { label, value });
    }

    Ok(FilterInfo { fields })
}

fn expect_array(reply: RespValue, expected: usize) -> Result<Vec<RespValue>> {
    match check_error(reply)? {
        RespValue::Array(elements) if elements.len() == expected => Ok(elements),
        RespValue::Array(elements) => Err(FilterError::UnexpectedReply(format!(
            "expected {} results, got {}",
            expected,
            elements.len()
        ))),
        other => Err(unexpected("array", &other)),
    }
}

fn unexpected(wanted: &str, got: &RespValue) -> FilterError {
    FilterError::UnexpectedReply(format!("expected {}, got {}", wanted, got))
}

/// The value half of an info field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InfoValue {
    Integer(i64),
    Text(String),
    /// Reported for settings that do not apply, such as the expansion rate
    /// of a non-scaling filter.
    Null,
}

impl fmt::Display for InfoValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InfoValue::Integer(n) => write!(f, "{}", n),
            InfoValue::Text(s) => write!(f, "{}", s),
            InfoValue::Null => write!(f, "(nil)"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InfoField {
    pub label: String,
    pub value: InfoValue,
}

/// Description of a filter as reported by `INFO`, in service order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterInfo {
    pub fields: Vec<InfoField>,
}

impl FilterInfo {
    /// Looks up a field by label, ignoring ASCII case.
    pub fn get(&self, label: &str) -> Option<&InfoValue> {
        self.fields
            .iter()
            .find(|f| f.label.eq_ignore_ascii_case(label))
            .map(|f| &f.value)
    }

    fn integer(&self, label: &str) -> Option<i64> {
        match self.get(label)? {
            InfoValue::Integer(n) => Some(*n),
            InfoValue::Text(s) => s.parse().ok(),
            InfoValue::Null => None,
        }
    }

    /// Total capacity across all sub-filters.
    pub fn capacity(&self) -> Option<i64> {
        self.integer("Capacity")
    }

    /// Memory used, in bytes.
    pub fn size(&self) -> Option<i64> {
        self.integer("Size")
    }

    /// Number of sub-filters allocated so far.
    pub fn number_of_filters(&self) -> Option<i64> {
        self.integer("Number of filters")
    }

    pub fn items_inserted(&self) -> Option<i64> {
        self.integer("Number of items inserted")
    }

    /// `None` for non-scaling filters.
    pub fn expansion_rate(&self) -> Option<i64> {
        self.integer("Expansion rate")
    }

    pub fn is_scaling(&self) -> bool {
        self.expansion_rate().is_some_and(|rate| rate > 0)
    }
}

impl fmt::Display for FilterInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for field in &self.fields {
            writeln!(f, "{}: {}", field.label, field.value)?;
        }
        Ok(())
    }
}
