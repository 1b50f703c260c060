//! Entity persistence on MultiChain data streams.
//!
//! A MultiChain node only offers "publish a hex blob under stream + key" and
//! "list items under stream + key". This crate builds create-only,
//! unique-key repositories on top of that:
//!
//! - [`EntityCodec`] -- entity ⇄ hex of its UTF-8 JSON form
//! - [`Entity`] / [`EntityMetadata`] -- stream name and record key per type
//! - [`StreamRepository`] -- `exists_by_key`, `find_by_key`, `save`, `save_all`
//! - [`Repository`] -- the caller-facing trait implemented by every repository
//!
//! # Consistency
//!
//! Uniqueness is checked before publishing, but check-then-publish is not
//! atomic: two concurrent saves of one key can both succeed. The next lookup
//! of that key then fails with
//! [`RepositoryError::IncorrectResultSize`].

pub mod codec;
pub mod entity;
pub mod error;
pub mod repository;

pub use codec::EntityCodec;
pub use entity::{default_stream_name, Entity, EntityMetadata, JsonFieldMetadata, TypeMetadata};
pub use error::{CodecError, CodecResult, ErrorKind, RepositoryError, RepositoryResult};
pub use repository::{EmptyDataPolicy, Repository, StreamRepository};
