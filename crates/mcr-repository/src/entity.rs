use std::marker::PhantomData;

use mcr_types::{StreamName, TypeError};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

/// A domain type stored on a MultiChain stream.
///
/// Implementors name their record key; the stream name defaults to the
/// lowercase type name (`Contract` → `contract`).
///
/// ```
/// use mcr_repository::Entity;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Serialize, Deserialize)]
/// struct Contract {
///     id: String,
///     buyer: String,
/// }
///
/// impl Entity for Contract {
///     fn key(&self) -> Option<String> {
///         Some(self.id.clone())
///     }
/// }
///
/// assert_eq!(Contract::stream_name(), "contract");
/// ```
pub trait Entity: Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Record key of this instance. `None` or blank means the entity cannot
    /// be saved.
    fn key(&self) -> Option<String>;

    fn stream_name() -> String {
        default_stream_name::<Self>()
    }
}

/// Lowercase simple name of `T`, without module path or generic arguments.
pub fn default_stream_name<T: ?Sized>() -> String {
    let full = std::any::type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base).to_lowercase()
}

/// Supplies the stream name for an entity type and reads the record key of
/// an instance.
pub trait EntityMetadata<E>: Send + Sync {
    fn stream_name(&self) -> &StreamName;

    fn key(&self, entity: &E) -> Option<String>;
}

/// Metadata for a type registered through [`Entity`].
pub struct TypeMetadata<E> {
    stream: StreamName,
    _entity: PhantomData<fn() -> E>,
}

impl<E: Entity> TypeMetadata<E> {
    pub fn new() -> Result<Self, TypeError> {
        Ok(Self {
            stream: StreamName::new(E::stream_name())?,
            _entity: PhantomData,
        })
    }
}

impl<E: Entity> EntityMetadata<E> for TypeMetadata<E> {
    fn stream_name(&self) -> &StreamName {
        &self.stream
    }

    fn key(&self, entity: &E) -> Option<String> {
        entity.key()
    }
}

/// Metadata for untyped JSON documents: the key is read from a named
/// top-level field holding a string or a number.
#[derive(Clone, Debug)]
pub struct JsonFieldMetadata {
    stream: StreamName,
    field: Option<String>,
}

impl JsonFieldMetadata {
    pub fn new(stream: StreamName, field: impl Into<String>) -> Self {
        Self {
            stream,
            field: Some(field.into()),
        }
    }

    /// Metadata for reading a stream only. Documents have no key, so saving
    /// through it fails with a missing key.
    pub fn for_stream(stream: StreamName) -> Self {
        Self {
            stream,
            field: None,
        }
    }

    pub fn field(&self) -> Option<&str> {
        self.field.as_deref()
    }
}

impl EntityMetadata<Value> for JsonFieldMetadata {
    fn stream_name(&self) -> &StreamName {
        &self.stream
    }

    fn key(&self, entity: &Value) -> Option<String> {
        match entity.get(self.field.as_deref()?)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }
}
