//! # Host Bridge Traits
//!
//! Platform abstraction traits implemented by each host environment.
//!
//! ## Overview
//!
//! This crate defines the contract between the gallery core and
//! environment-specific implementations. The sync pipeline only needs one
//! capability from its host: HTTP access to the remote storage gateway.
//!
//! - [`HttpClient`](http::HttpClient) - Async HTTP operations with retry and TLS
//!
//! Server deployments ship the reqwest-backed adapter from `bridge-native`;
//! tests substitute mock clients.
//!
//! ## Error Handling
//!
//! All bridge traits use the [`BridgeError`](error::BridgeError) type. Host
//! implementations should convert environment-specific errors to
//! `BridgeError` and provide actionable messages.
//!
//! ## Thread Safety
//!
//! All bridge traits require `Send + Sync` bounds to support safe concurrent
//! usage across async tasks.

pub mod error;
pub mod http;

pub use error::BridgeError;
pub use http::{HttpClient, HttpMethod, HttpRequest, HttpResponse, RetryPolicy};
