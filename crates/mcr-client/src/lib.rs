//! Transport client for MultiChain JSON-RPC nodes.
//!
//! [`MultiChainClient`] performs one request/response exchange per
//! [`invoke`](MultiChainClient::invoke): it encodes the request with the wire
//! codec, hands the body to a [`Transport`], and decodes the reply into the
//! caller's expected result shape.
//!
//! # Transports
//!
//! - [`HttpTransport`] -- HTTP POST with Basic authentication (`reqwest`)
//! - [`InMemoryLedger`] -- in-process node for tests and embedding
//!
//! There is no retry, pooling contract, or timeout in the exchange itself.
//! A request timeout can be configured on the HTTP transport; anything else
//! is the caller's business.

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod memory;
pub mod transport;

pub use client::MultiChainClient;
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use http::HttpTransport;
pub use memory::InMemoryLedger;
pub use transport::Transport;
