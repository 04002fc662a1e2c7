//! Command Builder
//!
//! Assembles the positional argument list for each filter operation.
//! Argument order is part of the protocol: optional flags are a keyword
//! followed by their value, and an omitted flag is simply absent.
//!
//! ```text
//! RESERVE name rate capacity [NONSCALING | EXPANSION n]
//! INSERT  name [ERROR rate] [CAPACITY cap] [NONSCALING | EXPANSION n] [NOCREATE] ITEMS item...
//! ```

use crate::commands::item::{encode_all, Item};
use crate::error::FilterError;
use crate::protocol::RespValue;
use bytes::Bytes;

/// Protocol keywords. Case-sensitive on the wire.
pub mod keyword {
    pub const RESERVE: &str = "RESERVE";
    pub const ADD: &str = "ADD";
    pub const MADD: &str = "MADD";
    pub const EXISTS: &str = "EXISTS";
    pub const MEXISTS: &str = "MEXISTS";
    pub const INFO: &str = "INFO";
    pub const INSERT: &str = "INSERT";

    pub const ERROR: &str = "ERROR";
    pub const CAPACITY: &str = "CAPACITY";
    pub const EXPANSION: &str = "EXPANSION";
    pub const NONSCALING: &str = "NONSCALING";
    pub const NOCREATE: &str = "NOCREATE";
    pub const ITEMS: &str = "ITEMS";
}

/// Expansion rate used by `reserve` when the caller has no preference.
pub const DEFAULT_EXPANSION: i64 = 2;

/// One fully assembled command: `[name, filter, args...]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    name: String,
    args: Vec<Bytes>,
    items: usize,
}

impl Command {
    fn new(name: String, filter: &str) -> Self {
        Self {
            name,
            args: vec![Bytes::copy_from_slice(filter.as_bytes())],
            items: 0,
        }
    }

    fn arg(mut self, value: impl Into<Bytes>) -> Self {
        self.args.push(value.into());
        self
    }

    fn item(mut self, value: Bytes) -> Self {
        self.args.push(value);
        self.items += 1;
        self
    }

    fn items(mut self, values: impl Iterator<Item = Bytes>) -> Self {
        let before = self.args.len();
        self.args.extend(values);
        self.items += self.args.len() - before;
        self
    }

    /// The full operation name, e.g. `BF.INSERT`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Arguments after the operation name, filter name first.
    pub fn arguments(&self) -> &[Bytes] {
        &self.args
    }

    /// Number of items a batch command carries, i.e. the length its reply
    /// must have.
    pub fn item_count(&self) -> usize {
        self.items
    }

    /// Every token in order, operation name first.
    pub fn to_tokens(&self) -> Vec<Bytes> {
        let mut tokens = Vec::with_capacity(self.args.len() + 1);
        tokens.push(Bytes::copy_from_slice(self.name.as_bytes()));
        tokens.extend(self.args.iter().cloned());
        tokens
    }

    /// The RESP array this command is sent as.
    pub fn to_resp(&self) -> RespValue {
        RespValue::command(self.to_tokens())
    }
}

/// Optional knobs for `insert`. Each one is independent; unset knobs emit
/// no clause.
#[derive(Debug, Clone, PartialEq)]
pub struct InsertOptions {
    /// Error rate used if the filter gets created. Zero counts as unset.
    pub error_rate: Option<f64>,
    /// Initial capacity used if the filter gets created. Zero counts as unset.
    pub capacity: Option<u64>,
    /// Negative disables scaling, positive sets the rate. Zero counts as
    /// unset and emits nothing, unlike `reserve` where zero disables scaling.
    pub expansion: Option<i64>,
    /// Whether the filter may be created if missing.
    pub upsert: bool,
}

impl Default for InsertOptions {
    fn default() -> Self {
        Self {
            error_rate: None,
            capacity: None,
            expansion: None,
            upsert: true,
        }
    }
}

impl InsertOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn error_rate(mut self, rate: f64) -> Self {
        self.error_rate = Some(rate);
        self
    }

    pub fn capacity(mut self, capacity: u64) -> Self {
        self.capacity = Some(capacity);
        self
    }

    pub fn expansion(mut self, expansion: i64) -> Self {
        self.expansion = Some(expansion);
        self
    }

    /// Sets expansion to the non-scaling sentinel.
    pub fn non_scaling(self) -> Self {
        self.expansion(-1)
    }

    /// Forbids creating the filter (`NOCREATE`).
    pub fn no_create(mut self) -> Self {
        self.upsert = false;
        self
    }
}

/// Builds commands for one filter family, e.g. `BF` for scalable bloom
/// filters.
#[derive(Debug, Clone)]
pub struct CommandBuilder {
    namespace: String,
}

impl CommandBuilder {
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    fn command(&self, op: &str, filter: &str) -> Command {
        let name = if self.namespace.is_empty() {
            op.to_string()
        } else {
            format!("{}.{}", self.namespace, op)
        };
        Command::new(name, filter)
    }

    /// `RESERVE name rate capacity (NONSCALING | EXPANSION n)`
    ///
    /// An expansion of zero or less creates a non-scaling filter.
    pub fn reserve(
        &self,
        filter: &str,
        error_rate: f64,
        capacity: u64,
        expansion: i64,
    ) -> Result<Command, FilterError> {
        check_error_rate(error_rate)?;
        if capacity == 0 {
            return Err(FilterError::InvalidParameter {
                name: "capacity",
                reason: "must be greater than 0".to_string(),
            });
        }

        let cmd = self
            .command(keyword::RESERVE, filter)
            .arg(error_rate.to_string())
            .arg(capacity.to_string());

        Ok(if expansion <= 0 {
            cmd.arg(keyword::NONSCALING)
        } else {
            cmd.arg(keyword::EXPANSION).arg(expansion.to_string())
        })
    }

    pub fn add(&self, filter: &str, item: &Item) -> Command {
        self.command(keyword::ADD, filter).item(item.encode())
    }

    pub fn madd(&self, filter: &str, items: &[Item]) -> Result<Command, FilterError> {
        self.batch(keyword::MADD, filter, items)
    }

    pub fn exists(&self, filter: &str, item: &Item) -> Command {
        self.command(keyword::EXISTS, filter).item(item.encode())
    }

    pub fn mexists(&self, filter: &str, items: &[Item]) -> Result<Command, FilterError> {
        self.batch(keyword::MEXISTS, filter, items)
    }

    pub fn info(&self, filter: &str) -> Command {
        self.command(keyword::INFO, filter)
    }

    /// `INSERT name [ERROR r] [CAPACITY c] [NONSCALING | EXPANSION n] [NOCREATE] ITEMS item...`
    ///
    /// Clauses are emitted in exactly that order, each only when its knob
    /// is set.
    pub fn insert(
        &self,
        filter: &str,
        items: &[Item],
        options: &InsertOptions,
    ) -> Result<Command, FilterError> {
        if items.is_empty() {
            return Err(FilterError::EmptyBatch {
                op: keyword::INSERT,
            });
        }

        let mut cmd = self.command(keyword::INSERT, filter);

        if let Some(rate) = options.error_rate.filter(|r| *r != 0.0) {
            cmd = cmd.arg(keyword::ERROR).arg(rate.to_string());
        }
        if let Some(capacity) = options.capacity.filter(|c| *c != 0) {
            cmd = cmd.arg(keyword::CAPACITY).arg(capacity.to_string());
        }
        match options.expansion {
            Some(e) if e < 0 => cmd = cmd.arg(keyword::NONSCALING),
            Some(e) if e > 0 => cmd = cmd.arg(keyword::EXPANSION).arg(e.to_string()),
            _ => {}
        }
        if !options.upsert {
            cmd = cmd.arg(keyword::NOCREATE);
        }

        Ok(cmd.arg(keyword::ITEMS).items(encode_all(items)))
    }

    fn batch(&self, op: &'static str, filter: &str, items: &[Item]) -> Result<Command, FilterError> {
        if items.is_empty() {
            return Err(FilterError::EmptyBatch { op });
        }
        Ok(self.command(op, filter).items(encode_all(items)))
    }
}

fn check_error_rate(rate: f64) -> Result<(), FilterError> {
    if rate > 0.0 && rate < 1.0 {
        Ok(())
    } else {
        Err(FilterError::InvalidParameter {
            name: "error rate",
            reason: format!("{} is not in the open interval (0, 1)", rate),
        })
    }
}
