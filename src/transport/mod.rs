//! 传输层模块：基于 HTTP 的远程客户端实现。
//!
//! Transport implementations of [`RemoteClient`](crate::client::RemoteClient).

pub mod http;

pub use http::{RestClient, RestConfig, TransportError};
