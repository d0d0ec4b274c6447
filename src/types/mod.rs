//! 类型模块：定义批量保存所需的记录与结果类型。
//!
//! # Types Module
//!
//! Core data types shared by the batching engine and remote clients.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Record`] | Anything with an optional identifier that can be queued |
//! | [`SObject`] | Generic record: optional `Id` plus a JSON field map |
//! | [`Outcome`] | Per-record result of a remote call |
//! | [`OutcomeError`] | Error descriptor attached to a failing outcome |
//!
//! ## Example
//!
//! ```rust
//! use bulk_saver::types::{Record, SObject};
//!
//! let account = SObject::new().with_field("Name", "Acme");
//! assert!(account.id().is_none());
//!
//! let existing = SObject::with_id("001000000000001").with_field("Name", "Acme Corp");
//! assert_eq!(existing.id(), Some("001000000000001"));
//! ```

pub mod outcome;
pub mod record;

pub use outcome::{Outcome, OutcomeError};
pub use record::{Record, SObject};
