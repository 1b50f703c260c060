use std::fmt;

use mcr_types::{EntityEncoding, RecordKey, RequestId, StreamName};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::command::{Command, LIST_ITEMS_LIMIT};
use crate::error::{ProtocolError, ProtocolResult};

/// A JSON-RPC request to a MultiChain node.
///
/// Immutable once built. Every request gets a fresh random [`RequestId`].
#[derive(Clone, Debug, PartialEq)]
pub struct Request {
    id: RequestId,
    command: Command,
    params: Vec<Value>,
}

impl Request {
    /// Build a request with a freshly generated id.
    pub fn new(command: Command, params: Vec<Value>) -> Self {
        Self {
            id: RequestId::generate(),
            command,
            params,
        }
    }

    /// Rebuild a request received from the wire, keeping its id.
    pub fn with_id(id: RequestId, command: Command, params: Vec<Value>) -> Self {
        Self { id, command, params }
    }

    /// `liststreamkeyitems` for one key: non-verbose, at most
    /// [`LIST_ITEMS_LIMIT`] items.
    pub fn list_stream_key_items(stream: &StreamName, key: &RecordKey) -> Self {
        Self::new(
            Command::ListStreamKeyItems,
            vec![
                Value::from(stream.as_str()),
                Value::from(key.as_str()),
                Value::Bool(false),
                Value::from(LIST_ITEMS_LIMIT),
            ],
        )
    }

    /// `publish` of hex data under a key. Empty data is rejected.
    pub fn publish(
        stream: &StreamName,
        key: &RecordKey,
        data: &EntityEncoding,
    ) -> ProtocolResult<Self> {
        if data.is_empty() {
            return Err(ProtocolError::InvalidParams("data must not be blank".into()));
        }
        Ok(Self::new(
            Command::Publish,
            vec![
                Value::from(stream.as_str()),
                Value::from(key.as_str()),
                Value::from(data.as_str()),
            ],
        ))
    }

    pub fn id(&self) -> &RequestId {
        &self.id
    }

    pub fn command(&self) -> Command {
        self.command
    }

    pub fn params(&self) -> &[Value] {
        &self.params
    }

    /// String parameter at `idx`, if present and a string.
    pub fn param_str(&self, idx: usize) -> Option<&str> {
        self.params.get(idx).and_then(Value::as_str)
    }
}

/// Error object reported by the node.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    pub code: i64,
    pub message: String,
}

impl ErrorInfo {
    pub fn new(code: i64, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for ErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "code={}, message={}", self.code, self.message)
    }
}

/// A JSON-RPC response.
///
/// At most one of `error` and `result` is meaningful on a real exchange. Both
/// absent is a valid, empty success.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Response<T> {
    pub id: String,
    pub error: Option<ErrorInfo>,
    pub result: Option<T>,
}

impl<T> Response<T> {
    pub fn success(id: impl Into<String>, result: T) -> Self {
        Self {
            id: id.into(),
            error: None,
            result: Some(result),
        }
    }

    pub fn failure(id: impl Into<String>, error: ErrorInfo) -> Self {
        Self {
            id: id.into(),
            error: Some(error),
            result: None,
        }
    }

    /// `true` when the node reported no error.
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    /// Split into the node's error or the (possibly absent) result.
    pub fn into_result(self) -> Result<Option<T>, ErrorInfo> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(self.result),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn stream() -> StreamName {
        StreamName::new("orders").unwrap()
    }

    fn key() -> RecordKey {
        RecordKey::new("o-1").unwrap()
    }

    #[test]
    fn list_params_shape() {
        let req = Request::list_stream_key_items(&stream(), &key());
        assert_eq!(req.command(), Command::ListStreamKeyItems);
        assert_eq!(req.params(), &[json!("orders"), json!("o-1"), json!(false), json!(2)]);
    }

    #[test]
    fn publish_params_shape() {
        let data = EntityEncoding::parse("7b7d").unwrap();
        let req = Request::publish(&stream(), &key(), &data).unwrap();
        assert_eq!(req.command(), Command::Publish);
        assert_eq!(req.params(), &[json!("orders"), json!("o-1"), json!("7b7d")]);
        assert_eq!(req.param_str(2), Some("7b7d"));
    }

    #[test]
    fn publish_rejects_empty_data() {
        let err = Request::publish(&stream(), &key(), &EntityEncoding::empty()).unwrap_err();
        assert!(matches!(err, ProtocolError::InvalidParams(_)));
    }

    #[test]
    fn each_request_has_its_own_id() {
        let a = Request::list_stream_key_items(&stream(), &key());
        let b = Request::list_stream_key_items(&stream(), &key());
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn into_result_splits() {
        let ok: Response<u32> = Response::success("1", 7);
        assert!(ok.is_ok());
        assert_eq!(ok.into_result().unwrap(), Some(7));

        let err: Response<u32> = Response::failure("1", ErrorInfo::new(-8, "boom"));
        assert!(!err.is_ok());
        assert_eq!(err.into_result().unwrap_err().code, -8);
    }

    #[test]
    fn error_info_display() {
        let e = ErrorInfo::new(-708, "Stream not found");
        assert_eq!(e.to_string(), "code=-708, message=Stream not found");
    }
}
