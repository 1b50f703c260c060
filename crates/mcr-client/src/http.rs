use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use tracing::debug;

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};
use crate::transport::Transport;

/// HTTP transport to a MultiChain RPC server.
///
/// Every call is a single POST to `scheme://host:port` with HTTP Basic
/// credentials. Settings are read-only after construction, so one transport
/// can be shared across tasks.
pub struct HttpTransport {
    http: reqwest::Client,
    endpoint: String,
    username: String,
    password: String,
}

impl HttpTransport {
    /// Validate `config` and build the transport. No connection is made.
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        config.validate()?;
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        Ok(Self {
            http: builder.build()?,
            endpoint: config.endpoint(),
            username: config.username.clone(),
            password: config.password.clone(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpTransport")
            .field("endpoint", &self.endpoint)
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn post(&self, body: Vec<u8>) -> ClientResult<Vec<u8>> {
        debug!(endpoint = %self.endpoint, bytes = body.len(), "posting rpc body");
        let response = self
            .http
            .post(&self.endpoint)
            .basic_auth(&self.username, Some(&self.password))
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = match response.text().await {
                Ok(body) => body,
                Err(e) => format!("<unreadable body: {e}>"),
            };
            return Err(ClientError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response.bytes().await?.to_vec())
    }
}
