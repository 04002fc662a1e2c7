//! Scalable Bloom Filter Client
//!
//! A handle to one named filter on the remote service. Every method is a
//! single round trip: build the command, submit it, decode the reply. The
//! handle keeps no filter state; the service is the only source of truth.
//!
//! Ordering between concurrently issued calls is whatever the transport
//! gives. Await `reserve` before issuing calls that depend on it.

use crate::client::reply::{self, FilterInfo};
use crate::commands::builder::DEFAULT_EXPANSION;
use crate::commands::{Command, CommandBuilder, InsertOptions, Item};
use crate::config::ClientConfig;
use crate::error::Result;
use crate::protocol::RespValue;
use crate::transport::Transport;
use crate::DEFAULT_NAMESPACE;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

/// What every filter-family client shares: a filter name, a command
/// namespace and a way to submit commands.
#[async_trait]
pub trait FilterFamily: Send + Sync {
    /// Name of the remote filter this handle addresses.
    fn name(&self) -> &str;

    /// Builder producing this family's commands.
    fn builder(&self) -> &CommandBuilder;

    /// Sends one command and returns the raw reply.
    async fn submit(&self, command: &Command) -> Result<RespValue>;
}

/// Client for a scalable bloom filter (`BF.*` commands).
///
/// # Example
///
/// ```ignore
/// use flashbloom::{ClientConfig, ScalableBloomFilter, TcpTransport};
/// use std::sync::Arc;
///
/// let transport = Arc::new(TcpTransport::connect(&ClientConfig::default()).await?);
/// let users = ScalableBloomFilter::new(transport, "users");
///
/// users.reserve(0.001, 10_000).await?;
/// assert!(users.add("alice").await?);
/// assert!(users.exists("alice").await?);
/// ```
pub struct ScalableBloomFilter<T: Transport + ?Sized> {
    name: String,
    transport: Arc<T>,
    builder: CommandBuilder,
}

impl<T: Transport + ?Sized> Clone for ScalableBloomFilter<T> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            transport: Arc::clone(&self.transport),
            builder: self.builder.clone(),
        }
    }
}

impl<T: Transport + ?Sized> ScalableBloomFilter<T> {
    /// Creates a handle using the default `BF` namespace.
    pub fn new(transport: Arc<T>, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            transport,
            builder: CommandBuilder::new(DEFAULT_NAMESPACE),
        }
    }

    /// Creates a handle using the namespace from `config`.
    pub fn with_config(transport: Arc<T>, name: impl Into<String>, config: &ClientConfig) -> Self {
        Self {
            name: name.into(),
            transport,
            builder: CommandBuilder::new(config.namespace.clone()),
        }
    }

    /// Creates the filter with the default expansion rate.
    ///
    /// Fails with `FilterAlreadyExists` if the name is taken.
    pub async fn reserve(&self, error_rate: f64, capacity: u64) -> Result<()> {
        self.reserve_with_expansion(error_rate, capacity, DEFAULT_EXPANSION)
            .await
    }

    /// Creates the filter. An expansion of zero or less makes it
    /// non-scaling: once full, further adds are rejected.
    pub async fn reserve_with_expansion(
        &self,
        error_rate: f64,
        capacity: u64,
        expansion: i64,
    ) -> Result<()> {
        let cmd = self
            .builder
            .reserve(&self.name, error_rate, capacity, expansion)?;
        reply::decode_ack(self.submit(&cmd).await?)
    }

    /// Adds one item. Returns `true` if it was newly added, `false` if it
    /// may already have been present.
    pub async fn add(&self, item: impl Into<Item>) -> Result<bool> {
        let cmd = self.builder.add(&self.name, &item.into());
        reply::decode_flag(self.submit(&cmd).await?)
    }

    /// Adds several items in one round trip. Entry `i` of the result
    /// answers for item `i` only.
    pub async fn madd<I>(&self, items: impl IntoIterator<Item = I>) -> Result<Vec<Result<bool>>>
    where
        I: Into<Item>,
    {
        let items = collect_items(items);
        let cmd = self.builder.madd(&self.name, &items)?;
        reply::decode_outcomes(self.submit(&cmd).await?, cmd.item_count())
    }

    /// Returns `true` if the item may be in the filter, `false` if it
    /// definitely is not.
    pub async fn exists(&self, item: impl Into<Item>) -> Result<bool> {
        let cmd = self.builder.exists(&self.name, &item.into());
        reply::decode_flag(self.submit(&cmd).await?)
    }

    /// Queries several items in one round trip.
    pub async fn mexists<I>(&self, items: impl IntoIterator<Item = I>) -> Result<Vec<bool>>
    where
        I: Into<Item>,
    {
        let items = collect_items(items);
        let cmd = self.builder.mexists(&self.name, &items)?;
        reply::decode_flags(self.submit(&cmd).await?, cmd.item_count())
    }

    pub async fn info(&self) -> Result<FilterInfo> {
        let cmd = self.builder.info(&self.name);
        reply::decode_info(self.submit(&cmd).await?)
    }

    /// Adds items, creating the filter first if it is missing and
    /// `options.upsert` allows it. With `upsert` off and no such filter,
    /// the whole call fails with `FilterNotFound` and nothing is created.
    pub async fn insert<I>(
        &self,
        items: impl IntoIterator<Item = I>,
        options: &InsertOptions,
    ) -> Result<Vec<Result<bool>>>
    where
        I: Into<Item>,
    {
        let items = collect_items(items);
        let cmd = self.builder.insert(&self.name, &items, options)?;
        reply::decode_outcomes(self.submit(&cmd).await?, cmd.item_count())
    }
}

#[async_trait]
impl<T: Transport + ?Sized> FilterFamily for ScalableBloomFilter<T> {
    fn name(&self) -> &str {
        &self.name
    }

    fn builder(&self) -> &CommandBuilder {
        &self.builder
    }

    async fn submit(&self, command: &Command) -> Result<RespValue> {
        debug!(
            filter = %self.name,
            command = command.name(),
            items = command.item_count(),
            "Submitting command"
        );
        Ok(self.transport.submit(command).await?)
    }
}

fn collect_items<I: Into<Item>>(items: impl IntoIterator<Item = I>) -> Vec<Item> {
    items.into_iter().map(Into::into).collect()
}
