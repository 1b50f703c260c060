use async_trait::async_trait;

use crate::error::ClientResult;

/// Carries one encoded JSON-RPC body to a node and returns the reply body.
///
/// Implementations perform exactly one exchange per call and never retry.
/// Failures reaching the node are reported as transport errors; a reply body
/// is returned as-is, even when it carries a JSON-RPC `error`.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn post(&self, body: Vec<u8>) -> ClientResult<Vec<u8>>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for std::sync::Arc<T> {
    async fn post(&self, body: Vec<u8>) -> ClientResult<Vec<u8>> {
        (**self).post(body).await
    }
}
