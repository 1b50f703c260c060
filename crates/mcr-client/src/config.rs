use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ClientError, ClientResult};

/// Connection settings for a MultiChain RPC server.
///
/// Loaded from TOML or built in code. `secure` defaults to `false`;
/// `timeout_secs` is unset unless the caller wants one.
///
/// ```toml
/// host = "127.0.0.1"
/// port = 9560
/// username = "multichainrpc"
/// password = "secret"
/// secure = false
/// ```
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub secure: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

impl ClientConfig {
    pub fn new(
        host: impl Into<String>,
        port: u16,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            host: host.into(),
            port,
            username: username.into(),
            password: password.into(),
            secure: false,
            timeout_secs: None,
        }
    }

    pub fn with_secure(mut self, secure: bool) -> Self {
        self.secure = secure;
        self
    }

    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = Some(secs);
        self
    }

    /// Parse from a TOML document and validate.
    pub fn from_toml_str(s: &str) -> ClientResult<Self> {
        let config: Self = toml::from_str(s).map_err(|e| ClientError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read a TOML file and validate.
    pub fn load(path: impl AsRef<Path>) -> ClientResult<Self> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&contents)
    }

    /// Render as TOML.
    pub fn to_toml_string(&self) -> ClientResult<String> {
        toml::to_string(self).map_err(|e| ClientError::Config(e.to_string()))
    }

    /// Check every required setting. No connection is attempted.
    pub fn validate(&self) -> ClientResult<()> {
        if self.host.trim().is_empty() {
            return Err(ClientError::InvalidConfig("host must not be blank".into()));
        }
        if self.port == 0 {
            return Err(ClientError::InvalidConfig("port must be greater than zero".into()));
        }
        if self.username.trim().is_empty() {
            return Err(ClientError::InvalidConfig("username must not be blank".into()));
        }
        if self.password.trim().is_empty() {
            return Err(ClientError::InvalidConfig("password must not be blank".into()));
        }
        Ok(())
    }

    pub fn scheme(&self) -> &'static str {
        if self.secure {
            "https"
        } else {
            "http"
        }
    }

    /// `scheme://host:port`
    pub fn endpoint(&self) -> String {
        format!("{}://{}:{}", self.scheme(), self.host.trim(), self.port)
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("secure", &self.secure)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}
