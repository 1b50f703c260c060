use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mcr_protocol::{Command, ErrorInfo, JsonRpcCodec, Request, Response};
use mcr_types::{EntityEncoding, StreamItem};
use serde_json::Value;

use crate::error::ClientResult;
use crate::transport::Transport;

/// Node error code for a missing stream.
pub const STREAM_NOT_FOUND: i64 = -708;
/// Node error code for a bad parameter.
pub const INVALID_PARAMETER: i64 = -8;

/// Default item count when a lookup does not give one.
const DEFAULT_LIST_COUNT: usize = 10;

/// In-process MultiChain node speaking the real wire format.
///
/// Streams are append-only lists of items. Publishing never checks for an
/// existing key, exactly like a real node. Intended for tests and embedding:
/// it counts calls per command and can be primed to fail a command with a
/// node-side error.
pub struct InMemoryLedger {
    state: RwLock<LedgerState>,
}

#[derive(Default)]
struct LedgerState {
    streams: HashMap<String, Vec<StreamItem>>,
    calls: HashMap<Command, usize>,
    failures: HashMap<Command, ErrorInfo>,
    next_tx: u64,
}

impl LedgerState {
    fn append(&mut self, stream: &str, key: &str, data: EntityEncoding) -> Option<String> {
        self.next_tx += 1;
        let txid = format!("{:064x}", self.next_tx);
        let items = self.streams.get_mut(stream)?;
        items.push(StreamItem {
            transaction_id: txid.clone(),
            key: key.to_string(),
            time: Some(now_seconds()),
            data,
        });
        Some(txid)
    }
}

impl InMemoryLedger {
    /// Create a node with no streams.
    pub fn new() -> Self {
        Self {
            state: RwLock::new(LedgerState::default()),
        }
    }

    /// Create a node with the given streams already present.
    pub fn with_streams<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let ledger = Self::new();
        for name in names {
            ledger.create_stream(name);
        }
        ledger
    }

    /// Create a stream. Creating an existing stream is a no-op.
    pub fn create_stream(&self, name: impl Into<String>) {
        let mut state = self.state.write().expect("lock poisoned");
        state.streams.entry(name.into()).or_default();
    }

    /// Append an item directly, bypassing the RPC surface. Returns the txid,
    /// or `None` if the stream does not exist.
    pub fn insert_raw(&self, stream: &str, key: &str, data: EntityEncoding) -> Option<String> {
        let mut state = self.state.write().expect("lock poisoned");
        state.append(stream, key, data)
    }

    /// Make every subsequent `command` fail with `error` until cleared.
    pub fn fail_with(&self, command: Command, error: ErrorInfo) {
        let mut state = self.state.write().expect("lock poisoned");
        state.failures.insert(command, error);
    }

    pub fn clear_failures(&self) {
        self.state.write().expect("lock poisoned").failures.clear();
    }

    /// Items stored under `key` in `stream`, oldest first.
    pub fn items(&self, stream: &str, key: &str) -> Vec<StreamItem> {
        let state = self.state.read().expect("lock poisoned");
        state
            .streams
            .get(stream)
            .map(|items| items.iter().filter(|i| i.key == key).cloned().collect())
            .unwrap_or_default()
    }

    /// Total number of items in `stream`.
    pub fn stream_len(&self, stream: &str) -> usize {
        let state = self.state.read().expect("lock poisoned");
        state.streams.get(stream).map(Vec::len).unwrap_or(0)
    }

    /// Number of RPC calls received for `command`.
    pub fn call_count(&self, command: Command) -> usize {
        let state = self.state.read().expect("lock poisoned");
        state.calls.get(&command).copied().unwrap_or(0)
    }

    /// Number of RPC calls received for any command.
    pub fn total_calls(&self) -> usize {
        self.state.read().expect("lock poisoned").calls.values().sum()
    }

    fn handle(&self, request: &Request) -> Result<Value, ErrorInfo> {
        let mut state = self.state.write().expect("lock poisoned");
        *state.calls.entry(request.command()).or_insert(0) += 1;
        if let Some(err) = state.failures.get(&request.command()) {
            return Err(err.clone());
        }

        let stream = request
            .param_str(0)
            .ok_or_else(|| ErrorInfo::new(INVALID_PARAMETER, "stream name must be a string"))?;
        let key = request
            .param_str(1)
            .ok_or_else(|| ErrorInfo::new(INVALID_PARAMETER, "key must be a string"))?;
        if !state.streams.contains_key(stream) {
            return Err(stream_not_found());
        }

        match request.command() {
            Command::ListStreamKeyItems => {
                let count = request
                    .params()
                    .get(3)
                    .and_then(Value::as_u64)
                    .map(|c| c as usize)
                    .unwrap_or(DEFAULT_LIST_COUNT);
                let items: Vec<&StreamItem> = state.streams[stream]
                    .iter()
                    .filter(|i| i.key == key)
                    .take(count)
                    .collect();
                serde_json::to_value(items)
                    .map_err(|e| ErrorInfo::new(INVALID_PARAMETER, e.to_string()))
            }
            Command::Publish => {
                let data = request
                    .param_str(2)
                    .ok_or_else(|| ErrorInfo::new(INVALID_PARAMETER, "data must be a hex string"))
                    .and_then(|d| {
                        EntityEncoding::parse(d)
                            .map_err(|e| ErrorInfo::new(INVALID_PARAMETER, e.to_string()))
                    })?;
                let txid = state.append(stream, key, data).ok_or_else(stream_not_found)?;
                Ok(Value::String(txid))
            }
        }
    }
}

impl Default for InMemoryLedger {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for InMemoryLedger {
    async fn post(&self, body: Vec<u8>) -> ClientResult<Vec<u8>> {
        let request = JsonRpcCodec::decode_request(&body)?;
        let id = request.id().to_string();
        let response = match self.handle(&request) {
            Ok(result) => Response::success(id, result),
            Err(err) => Response::failure(id, err),
        };
        Ok(JsonRpcCodec::encode_response(&response)?)
    }
}

fn stream_not_found() -> ErrorInfo {
    ErrorInfo::new(STREAM_NOT_FOUND, "Stream with this name not found")
}

fn now_seconds() -> DateTime<Utc> {
    DateTime::from_timestamp(Utc::now().timestamp(), 0).unwrap_or_default()
}
