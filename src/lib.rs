//! # bulk-saver
//!
//! 面向记录型远程服务的客户端批量保存层：累积单条增删改操作，按上限分批提交。
//!
//! Client-side bulk batching for record-oriented remote services such as the
//! Salesforce sObject API.
//!
//! ## Overview
//!
//! Remote record services cap how many records one create, update, upsert or
//! delete call may carry (200 for sObject collections). This crate lets
//! callers save and delete records one at a time while the [`BulkSaver`]
//! groups them per operation kind and object type and submits them in
//! maximally packed batches.
//!
//! ## Key Features
//!
//! - **Automatic classification**: records with an identifier are updated, records
//!   saved with a match field are upserted, everything else is created
//! - **Auto-flush**: a full queue is submitted before the next item is added
//! - **Deterministic flush order**: deletes, creates, updates, upserts; object
//!   types in first-seen order
//! - **Partial failure reporting**: a failed remote call returns [`Error::Flush`]
//!   carrying the failed sub-batch and the results merged so far
//! - **Pluggable transport**: any [`RemoteClient`]; a REST implementation ships
//!   in [`transport::http`]
//! - **Hooks**: observe every remote call via [`hooks::BatchHook`]
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use bulk_saver::{BulkSaver, RestClient, RestConfig, SObject};
//!
//! #[tokio::main]
//! async fn main() -> bulk_saver::Result<()> {
//!     let client = RestClient::new(
//!         RestConfig::new("https://acme.my.salesforce.com").with_access_token("token"),
//!     )?;
//!     let mut saver = BulkSaver::new(client);
//!
//!     for i in 0..450 {
//!         let account = SObject::new().with_field("Name", format!("Account {i}"));
//!         saver.save(account, "Account", None).await?;
//!     }
//!
//!     let results = saver.flush().await?;
//!     println!("created {} accounts", results.created.len());
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`batch`] | Bulk saver engine, queues, limits and aggregated results |
//! | [`client`] | `RemoteClient` trait and the strict adapter |
//! | [`transport`] | REST implementation of `RemoteClient` |
//! | [`types`] | Records and outcomes |
//! | [`hooks`] | Request / response / fault observers |

pub mod batch;
pub mod client;
pub mod hooks;
pub mod transport;
pub mod types;

// Re-export main types for convenience
pub use batch::{AggregatedResults, BatchKind, BulkSaver, BulkSaverConfig};
pub use client::{RemoteClient, StrictClient};
pub use transport::{RestClient, RestConfig};
pub use types::{Outcome, OutcomeError, Record, SObject};

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for the library
pub mod error;
pub use error::{Error, ErrorContext, FlushError, SaveError};
