use mcr_protocol::{JsonRpcCodec, Request, Response};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::config::ClientConfig;
use crate::error::ClientResult;
use crate::http::HttpTransport;
use crate::transport::Transport;

/// JSON-RPC client over a [`Transport`].
#[derive(Debug)]
pub struct MultiChainClient<T> {
    transport: T,
}

impl MultiChainClient<HttpTransport> {
    /// Build an HTTP client from validated settings.
    pub fn connect(config: &ClientConfig) -> ClientResult<Self> {
        Ok(Self::new(HttpTransport::new(config)?))
    }
}

impl<T: Transport> MultiChainClient<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Send `request` and decode the reply into a response carrying `R`.
    ///
    /// A node-side `error` comes back inside the response; only encoding,
    /// transport and decoding failures are returned as `Err`.
    pub async fn invoke<R>(&self, request: &Request) -> ClientResult<Response<R>>
    where
        R: DeserializeOwned + Send,
    {
        let body = JsonRpcCodec::encode_request(request)?;
        debug!(id = %request.id(), method = %request.command(), "invoking rpc command");

        let reply = self.transport.post(body).await?;
        let response = JsonRpcCodec::decode_response::<R>(&reply)?;

        if !response.id.is_empty() && response.id != request.id().as_str() {
            warn!(
                sent = %request.id(),
                received = %response.id,
                "rpc response id does not match request"
            );
        }
        if let Some(err) = &response.error {
            debug!(method = %request.command(), code = err.code, error_message = %err.message, "node reported error");
        }
        Ok(response)
    }
}
