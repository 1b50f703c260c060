//! Foundation types for the MultiChain stream repository.
//!
//! Every other `mcr` crate depends on `mcr-types`. The types here carry the
//! validation rules that hold before any network traffic happens: stream
//! names and record keys are never blank, and entity encodings are always
//! well-formed lowercase hex.
//!
//! # Key Types
//!
//! - [`StreamName`] — Named, append-only collection on the ledger
//! - [`RecordKey`] — Logical key of one record inside a stream
//! - [`EntityEncoding`] — Hex of the UTF-8 JSON form of an entity
//! - [`RequestId`] — 128-bit random JSON-RPC request identifier
//! - [`StreamItem`] — One item returned by a stream key lookup

pub mod encoding;
pub mod error;
pub mod item;
pub mod request_id;
pub mod stream;

pub use encoding::EntityEncoding;
pub use error::TypeError;
pub use item::StreamItem;
pub use request_id::RequestId;
pub use stream::{RecordKey, StreamName};
