//! 批量保存模块：按操作类型和对象类型收集记录，并按上限分批提交。
//!
//! # Bulk Saving Module
//!
//! This module turns individual create / update / upsert / delete calls into
//! size-bounded batches for a [`RemoteClient`](crate::client::RemoteClient).
//!
//! ## Key Components
//!
//! | Component | Description |
//! |-----------|-------------|
//! | [`BulkSaver`] | Classifies, queues, auto-flushes and flushes records |
//! | [`BulkSaverConfig`] | Save and delete limits (default 200 each) |
//! | [`TypedQueue`] | Ordered pending items for one (kind, object type) |
//! | [`QueueFamily`] | Per-object-type queues in first-seen order |
//! | [`MatchFieldRegistry`] | Upsert match field per object type |
//! | [`AggregatedResults`] | Outcomes accumulated across flushes |
//!
//! ## Example
//!
//! ```rust,no_run
//! use bulk_saver::batch::BulkSaver;
//! use bulk_saver::transport::http::{RestClient, RestConfig};
//! use bulk_saver::types::SObject;
//!
//! # async fn run() -> bulk_saver::Result<()> {
//! let client = RestClient::new(RestConfig::from_env()?)?;
//! let mut saver = BulkSaver::new(client);
//!
//! saver.save(SObject::new().with_field("Name", "Acme"), "Account", None).await?;
//! saver.save(SObject::with_id("001000000000001").with_field("Phone", "555-0100"), "Account", None).await?;
//! saver.save(SObject::new().with_field("Email", "a@example.com"), "Contact", Some("Email")).await?;
//! saver.delete(&SObject::with_id("003000000000042")).await?;
//!
//! let results = saver.flush().await?;
//! for (kind, failure) in results.failures() {
//!     eprintln!("{kind} failed: {:?}", failure.first_error_message());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Flush order
//!
//! Deletes first, then creates, updates and upserts. Within each kind, object
//! types are flushed in the order they were first queued.

mod config;
mod queue;
mod registry;
mod results;
mod saver;

pub use config::{BulkSaverConfig, DEFAULT_DELETE_LIMIT, DEFAULT_SAVE_LIMIT};
pub use queue::{BatchKind, QueueFamily, TypedQueue};
pub use registry::MatchFieldRegistry;
pub use results::AggregatedResults;
pub use saver::BulkSaver;
