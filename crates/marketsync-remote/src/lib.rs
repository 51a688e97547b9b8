//! Remote archive access for marketsync.
//!
//! - [`RemoteStorage`] - the provider trait the sync engine consumes
//! - [`RemoteClient`] - protocol client over an abstract [`RemoteTransport`]
//! - [`HttpTransport`] - HTTP/JSON transport with retries and backoff

#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod client;
mod error;
mod http;
mod provider;
mod transport;

pub use client::{DATES_CACHE_TTL, RemoteClient};
pub use error::{RemoteError, TransportError};
pub use http::{HttpTransport, TransportConfig};
pub use provider::RemoteStorage;
pub use transport::RemoteTransport;
