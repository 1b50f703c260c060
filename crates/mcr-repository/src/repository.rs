use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;
use mcr_client::{MultiChainClient, Transport};
use mcr_protocol::Request;
use mcr_types::{RecordKey, StreamItem, StreamName};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::codec::EntityCodec;
use crate::entity::{Entity, EntityMetadata, TypeMetadata};
use crate::error::{RepositoryError, RepositoryResult};

/// What a lookup does when the single matching item has an empty `data`
/// field.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum EmptyDataPolicy {
    /// Treat the record as absent.
    #[default]
    Absent,
    /// Fail with [`RepositoryError::EmptyRecord`].
    Reject,
}

/// Create-only store for entities of one type, over one stream.
#[async_trait]
pub trait Repository<E>: Send + Sync {
    async fn exists(&self, key: &str) -> RepositoryResult<bool>;

    async fn find_one(&self, key: &str) -> RepositoryResult<Option<E>>;

    async fn save(&self, entity: E) -> RepositoryResult<E>;

    async fn save_all(&self, entities: Vec<E>) -> RepositoryResult<Vec<E>>;
}

/// Repository engine for one entity type on one stream.
///
/// Holds no mutable state; every operation is one or two independent RPC
/// exchanges through the shared client.
pub struct StreamRepository<E, T, M = TypeMetadata<E>> {
    client: Arc<MultiChainClient<T>>,
    metadata: M,
    empty_data: EmptyDataPolicy,
    _entity: PhantomData<fn() -> E>,
}

impl<E: Entity, T: Transport> StreamRepository<E, T, TypeMetadata<E>> {
    /// Repository for a registered [`Entity`] type.
    pub fn new(client: Arc<MultiChainClient<T>>) -> RepositoryResult<Self> {
        Ok(Self::with_metadata(client, TypeMetadata::new()?))
    }
}

impl<E, T, M> StreamRepository<E, T, M>
where
    E: Serialize + DeserializeOwned + Send + Sync,
    T: Transport,
    M: EntityMetadata<E>,
{
    pub fn with_metadata(client: Arc<MultiChainClient<T>>, metadata: M) -> Self {
        Self {
            client,
            metadata,
            empty_data: EmptyDataPolicy::default(),
            _entity: PhantomData,
        }
    }

    pub fn with_empty_data_policy(mut self, policy: EmptyDataPolicy) -> Self {
        self.empty_data = policy;
        self
    }

    pub fn stream_name(&self) -> &StreamName {
        self.metadata.stream_name()
    }

    pub fn empty_data_policy(&self) -> EmptyDataPolicy {
        self.empty_data
    }

    /// Whether a readable record with `key` exists. Blank keys are rejected.
    ///
    /// Follows the [`EmptyDataPolicy`]: under `Absent` an item with empty
    /// `data` does not count.
    pub async fn exists_by_key(&self, key: &str) -> RepositoryResult<bool> {
        let key = RecordKey::new(key)?;
        Ok(self.lookup(&key).await?.is_some())
    }

    /// The entity stored under `key`, if any.
    ///
    /// Fails with [`RepositoryError::IncorrectResultSize`] if the stream holds
    /// more than one item for the key.
    pub async fn find_by_key(&self, key: &str) -> RepositoryResult<Option<E>> {
        let key = RecordKey::new(key)?;
        self.lookup(&key).await
    }

    /// Publish `entity` under its key, refusing keys that already exist.
    ///
    /// Any item stored under the key makes it taken, including items whose
    /// `data` is empty.
    ///
    /// The existence check and the publish are separate exchanges. A
    /// concurrent writer can publish the same key in between; both saves then
    /// succeed and later lookups of the key fail with
    /// [`RepositoryError::IncorrectResultSize`].
    pub async fn save(&self, entity: E) -> RepositoryResult<E> {
        let stream = self.stream_name();
        let key = self
            .metadata
            .key(&entity)
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| RepositoryError::MissingKey {
                stream: stream.to_string(),
            })?;
        let key = RecordKey::new(key)?;

        if !self.fetch_items(&key).await?.is_empty() {
            return Err(RepositoryError::DuplicateKey {
                stream: stream.to_string(),
                key: key.to_string(),
            });
        }

        let data = EntityCodec::serialize(&entity)?;
        let request = Request::publish(stream, &key, &data)?;
        let response = self.client.invoke::<Value>(&request).await?;
        if let Some(err) = response.error {
            warn!(stream = %stream, key = %key, code = err.code, "publish rejected by node");
            return Err(RepositoryError::Write {
                code: err.code,
                message: err.message,
            });
        }

        info!(stream = %stream, key = %key, bytes = data.byte_len(), "entity published");
        Ok(entity)
    }

    /// Save each entity in order. Stops at the first failure; entities saved
    /// before it stay on the ledger.
    pub async fn save_all<I>(&self, entities: I) -> RepositoryResult<Vec<E>>
    where
        I: IntoIterator<Item = E>,
    {
        let mut saved = Vec::new();
        for entity in entities {
            saved.push(self.save(entity).await?);
        }
        Ok(saved)
    }

    /// Items stored under `key`, at most [`mcr_protocol::LIST_ITEMS_LIMIT`] of them.
    async fn fetch_items(&self, key: &RecordKey) -> RepositoryResult<Vec<StreamItem>> {
        let stream = self.stream_name();
        debug!(stream = %stream, key = %key, "listing items for key");

        let request = Request::list_stream_key_items(stream, key);
        let response = self.client.invoke::<Vec<StreamItem>>(&request).await?;
        if let Some(err) = response.error {
            return Err(RepositoryError::Retrieval {
                code: err.code,
                message: err.message,
            });
        }
        Ok(response.result.unwrap_or_default())
    }

    async fn lookup(&self, key: &RecordKey) -> RepositoryResult<Option<E>> {
        let stream = self.stream_name();
        let mut items = self.fetch_items(key).await?;
        if items.len() > 1 {
            warn!(stream = %stream, key = %key, count = items.len(), "multiple records for key");
            return Err(RepositoryError::IncorrectResultSize {
                expected: 1,
                actual: items.len(),
            });
        }
        let Some(item) = items.pop() else {
            return Ok(None);
        };

        if item.data.is_empty() {
            return match self.empty_data {
                EmptyDataPolicy::Absent => {
                    debug!(stream = %stream, key = %key, "record has empty data, treating as absent");
                    Ok(None)
                }
                EmptyDataPolicy::Reject => Err(RepositoryError::EmptyRecord {
                    stream: stream.to_string(),
                    key: key.to_string(),
                }),
            };
        }
        Ok(EntityCodec::deserialize_encoding(&item.data)?)
    }
}

#[async_trait]
impl<E, T, M> Repository<E> for StreamRepository<E, T, M>
where
    E: Serialize + DeserializeOwned + Send + Sync + 'static,
    T: Transport + 'static,
    M: EntityMetadata<E> + 'static,
{
    async fn exists(&self, key: &str) -> RepositoryResult<bool> {
        self.exists_by_key(key).await
    }

    async fn find_one(&self, key: &str) -> RepositoryResult<Option<E>> {
        self.find_by_key(key).await
    }

    async fn save(&self, entity: E) -> RepositoryResult<E> {
        StreamRepository::save(self, entity).await
    }

    async fn save_all(&self, entities: Vec<E>) -> RepositoryResult<Vec<E>> {
        StreamRepository::save_all(self, entities).await
    }
}
