//! # Native Bridge Implementations
//!
//! Default implementations of bridge traits for native server and desktop
//! deployments.
//!
//! ## Overview
//!
//! This crate provides the production implementation of the one capability
//! the gallery core requires from its host:
//! - `HttpClient` using `reqwest`
//!
//! ## Usage
//!
//! ```ignore
//! use bridge_native::ReqwestHttpClient;
//! use bridge_traits::HttpClient;
//!
//! #[tokio::main]
//! async fn main() {
//!     let http_client = ReqwestHttpClient::new();
//!     // Hand to the sync service
//! }
//! ```

mod http;

pub use http::ReqwestHttpClient;
