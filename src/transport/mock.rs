//! In-memory stand-in for a filter service, used by the client tests.
//!
//! Membership is exact (a `HashSet`), which is a valid bloom filter with a
//! false-positive rate of zero. Capacity growth is modelled just enough to
//! make `INFO` and non-scaling saturation observable.

use crate::commands::builder::keyword;
use crate::commands::Command;
use crate::error::TransportError;
use crate::protocol::RespValue;
use crate::transport::Transport;
use async_trait::async_trait;
use bytes::Bytes;
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Mutex;

const DEFAULT_CAPACITY: u64 = 100;
const DEFAULT_EXPANSION: u64 = 2;

struct MockFilter {
    capacity: u64,
    /// `None` for non-scaling filters
    expansion: Option<u64>,
    layers: u64,
    items: HashSet<Bytes>,
}

impl MockFilter {
    fn new(capacity: u64, expansion: Option<u64>) -> Self {
        Self {
            capacity,
            expansion,
            layers: 1,
            items: HashSet::new(),
        }
    }

    fn add(&mut self, item: &Bytes) -> RespValue {
        if self.items.contains(item) {
            return RespValue::integer(0);
        }
        if self.items.len() as u64 >= self.capacity {
            match self.expansion {
                Some(rate) => {
                    self.capacity += self.capacity * rate.max(1);
                    self.layers += 1;
                }
                None => return RespValue::error("ERR non scaling filter is full"),
            }
        }
        self.items.insert(item.clone());
        RespValue::integer(1)
    }

    fn info(&self) -> RespValue {
        RespValue::array(vec![
            RespValue::simple_string("Capacity"),
            RespValue::integer(self.capacity as i64),
            RespValue::simple_string("Size"),
            RespValue::integer((self.capacity * 2) as i64),
            RespValue::simple_string("Number of filters"),
            RespValue::integer(self.layers as i64),
            RespValue::simple_string("Number of items inserted"),
            RespValue::integer(self.items.len() as i64),
            RespValue::simple_string("Expansion rate"),
            match self.expansion {
                Some(rate) => RespValue::integer(rate as i64),
                None => RespValue::Null,
            },
        ])
    }
}

#[derive(Default)]
pub(crate) struct MockService {
    filters: Mutex<HashMap<String, MockFilter>>,
    submitted: Mutex<Vec<Command>>,
    canned: Mutex<VecDeque<RespValue>>,
}

impl MockService {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Queues a reply returned verbatim instead of emulating the next command.
    pub(crate) fn push_reply(&self, reply: RespValue) {
        self.canned.lock().unwrap().push_back(reply);
    }

    /// Every command received so far, in order.
    pub(crate) fn submitted(&self) -> Vec<Command> {
        self.submitted.lock().unwrap().clone()
    }

    pub(crate) fn item_count(&self, filter: &str) -> Option<usize> {
        self.filters.lock().unwrap().get(filter).map(|f| f.items.len())
    }

    fn execute(&self, command: &Command) -> RespValue {
        let args = command.arguments();
        let filter = String::from_utf8_lossy(&args[0]).into_owned();
        let rest = &args[1..];
        let op = command.name().rsplit('.').next().unwrap_or_default();
        let mut filters = self.filters.lock().unwrap();

        match op {
            keyword::RESERVE => {
                if filters.contains_key(&filter) {
                    return RespValue::error("ERR item exists");
                }
                let capacity = match rest.get(1).and_then(parse_u64) {
                    Some(c) if c > 0 => c,
                    _ => return RespValue::error("ERR (capacity should be larger than 0)"),
                };
                let expansion = match rest.get(2).map(|b| b.as_ref()) {
                    Some(b"NONSCALING") => None,
                    Some(b"EXPANSION") => rest.get(3).and_then(parse_u64),
                    _ => Some(DEFAULT_EXPANSION),
                };
                filters.insert(filter, MockFilter::new(capacity, expansion));
                RespValue::ok()
            }
            keyword::ADD => filters
                .entry(filter)
                .or_insert_with(|| MockFilter::new(DEFAULT_CAPACITY, Some(DEFAULT_EXPANSION)))
                .add(&rest[0]),
            keyword::MADD => {
                let f = filters
                    .entry(filter)
                    .or_insert_with(|| MockFilter::new(DEFAULT_CAPACITY, Some(DEFAULT_EXPANSION)));
                RespValue::array(rest.iter().map(|item| f.add(item)).collect())
            }
            keyword::EXISTS => RespValue::integer(contains(filters.get(&filter), &rest[0])),
            keyword::MEXISTS => {
                let f = filters.get(&filter);
                RespValue::array(
                    rest.iter()
                        .map(|item| RespValue::integer(contains(f, item)))
                        .collect(),
                )
            }
            keyword::INFO => match filters.get(&filter) {
                Some(f) => f.info(),
                None => RespValue::error("ERR not found"),
            },
            keyword::INSERT => {
                let mut capacity = DEFAULT_CAPACITY;
                let mut expansion = Some(DEFAULT_EXPANSION);
                let mut create = true;
                let mut i = 0;
                while i < rest.len() {
                    match rest[i].as_ref() {
                        b"ERROR" => i += 1,
                        b"CAPACITY" => {
                            i += 1;
                            capacity = rest.get(i).and_then(parse_u64).unwrap_or(capacity);
                        }
                        b"EXPANSION" => {
                            i += 1;
                            expansion = rest.get(i).and_then(parse_u64);
                        }
                        b"NONSCALING" => expansion = None,
                        b"NOCREATE" => create = false,
                        b"ITEMS" => break,
                        _ => return RespValue::error("ERR syntax error"),
                    }
                    i += 1;
                }
                let items = &rest[(i + 1).min(rest.len())..];
                if items.is_empty() {
                    return RespValue::error("ERR wrong number of arguments");
                }
                if !filters.contains_key(&filter) && !create {
                    return RespValue::error("ERR not found");
                }
                let f = filters
                    .entry(filter)
                    .or_insert_with(|| MockFilter::new(capacity, expansion));
                RespValue::array(items.iter().map(|item| f.add(item)).collect())
            }
            _ => RespValue::error(format!("ERR unknown command '{}'", command.name())),
        }
    }
}

fn parse_u64(b: &Bytes) -> Option<u64> {
    std::str::from_utf8(b).ok()?.parse().ok()
}

fn contains(filter: Option<&MockFilter>, item: &Bytes) -> i64 {
    filter.map_or(0, |f| f.items.contains(item) as i64)
}

#[async_trait]
impl Transport for MockService {
    async fn submit(&self, command: &Command) -> Result<RespValue, TransportError> {
        self.submitted.lock().unwrap().push(command.clone());
        if let Some(reply) = self.canned.lock().unwrap().pop_front() {
            return Ok(reply);
        }
        Ok(self.execute(command))
    }
}
