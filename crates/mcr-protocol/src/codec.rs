use mcr_types::RequestId;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::command::Command;
use crate::error::{ProtocolError, ProtocolResult};
use crate::message::{ErrorInfo, Request, Response};

/// JSON-RPC protocol version spoken by MultiChain nodes.
pub const JSONRPC_VERSION: &str = "1.0";

/// Request envelope. Field order is the wire order.
#[derive(Serialize)]
struct RequestEnvelope<'a> {
    jsonrpc: &'static str,
    id: &'a RequestId,
    method: &'static str,
    params: &'a [Value],
}

#[derive(Deserialize)]
struct IncomingRequest {
    #[serde(default)]
    id: Option<Value>,
    method: String,
    #[serde(default)]
    params: Option<Vec<Value>>,
}

#[derive(Deserialize)]
struct IncomingResponse {
    #[serde(default)]
    id: Option<Value>,
    #[serde(default)]
    error: Option<Value>,
    #[serde(default)]
    result: Option<Value>,
}

/// Codec between [`Request`]/[`Response`] values and JSON-RPC bodies.
pub struct JsonRpcCodec;

impl JsonRpcCodec {
    /// Encode a request as `{"jsonrpc","id","method","params"}`.
    pub fn encode_request(request: &Request) -> ProtocolResult<Vec<u8>> {
        let envelope = RequestEnvelope {
            jsonrpc: JSONRPC_VERSION,
            id: request.id(),
            method: request.command().as_str(),
            params: request.params(),
        };
        serde_json::to_vec(&envelope).map_err(|e| ProtocolError::Serialization(e.to_string()))
    }

    /// Decode a request body (node side).
    pub fn decode_request(data: &[u8]) -> ProtocolResult<Request> {
        let incoming: IncomingRequest = serde_json::from_slice(data)
            .map_err(|e| ProtocolError::Deserialization(e.to_string()))?;
        let command: Command = incoming.method.parse()?;
        let id = RequestId::from_string(id_to_string(incoming.id));
        Ok(Request::with_id(id, command, incoming.params.unwrap_or_default()))
    }

    /// Encode a response body (node side). Absent fields are written as `null`.
    pub fn encode_response<T: Serialize>(response: &Response<T>) -> ProtocolResult<Vec<u8>> {
        serde_json::to_vec(response).map_err(|e| ProtocolError::Serialization(e.to_string()))
    }

    /// Decode a response body into the expected result shape `T`.
    ///
    /// `null` for `error` or `result` decodes to "absent". An `error` that is
    /// present but not `{code: int, message: string}` is rejected.
    pub fn decode_response<T: DeserializeOwned>(data: &[u8]) -> ProtocolResult<Response<T>> {
        let incoming: IncomingResponse = serde_json::from_slice(data)
            .map_err(|e| ProtocolError::Deserialization(e.to_string()))?;

        let error = match incoming.error {
            None | Some(Value::Null) => None,
            Some(value) => Some(decode_error(value)?),
        };

        let result = match incoming.result {
            None | Some(Value::Null) => None,
            Some(value) => Some(
                serde_json::from_value(value)
                    .map_err(|e| ProtocolError::Deserialization(e.to_string()))?,
            ),
        };

        Ok(Response {
            id: id_to_string(incoming.id),
            error,
            result,
        })
    }
}

fn decode_error(value: Value) -> ProtocolResult<ErrorInfo> {
    let Value::Object(map) = value else {
        return Err(ProtocolError::MalformedError(format!("expected object, got {value}")));
    };
    let code = map
        .get("code")
        .and_then(Value::as_i64)
        .ok_or_else(|| ProtocolError::MalformedError("missing integer `code`".into()))?;
    let message = map
        .get("message")
        .and_then(Value::as_str)
        .ok_or_else(|| ProtocolError::MalformedError("missing string `message`".into()))?;
    Ok(ErrorInfo::new(code, message))
}

fn id_to_string(id: Option<Value>) -> String {
    match id {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s,
        Some(other) => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use mcr_types::{EntityEncoding, RecordKey, StreamItem, StreamName};
    use serde_json::json;

    fn stream(s: &str) -> StreamName {
        StreamName::new(s).unwrap()
    }

    fn key(s: &str) -> RecordKey {
        RecordKey::new(s).unwrap()
    }

    #[test]
    fn request_keys_in_wire_order() {
        let req = Request::list_stream_key_items(&stream("orders"), &key("o-1"));
        let body = String::from_utf8(JsonRpcCodec::encode_request(&req).unwrap()).unwrap();
        let expected = format!(
            r#"{{"jsonrpc":"1.0","id":"{}","method":"liststreamkeyitems","params":["orders","o-1",false,2]}}"#,
            req.id()
        );
        assert_eq!(body, expected);
    }

    #[test]
    fn publish_body_params() {
        let data = EntityEncoding::parse("7b7d").unwrap();
        let req = Request::publish(&stream("orders"), &key("o-1"), &data).unwrap();
        let body: Value = serde_json::from_slice(&JsonRpcCodec::encode_request(&req).unwrap()).unwrap();
        assert_eq!(body["params"], json!(["orders", "o-1", "7b7d"]));
        assert_eq!(body["method"], json!("publish"));
        assert_eq!(body["jsonrpc"], json!("1.0"));
    }

    #[test]
    fn request_roundtrip_keeps_id() {
        let req = Request::list_stream_key_items(&stream("s"), &key("k"));
        let bytes = JsonRpcCodec::encode_request(&req).unwrap();
        let decoded = JsonRpcCodec::decode_request(&bytes).unwrap();
        assert_eq!(decoded, req);
    }

    #[test]
    fn decode_request_unknown_method() {
        let body = br#"{"jsonrpc":"1.0","id":"1","method":"getinfo","params":[]}"#;
        let err = JsonRpcCodec::decode_request(body).unwrap_err();
        assert!(matches!(err, ProtocolError::UnknownMethod(_)));
    }

    #[test]
    fn null_error_is_no_error() {
        let body = br#"{"id":"abc","error":null,"result":"txid"}"#;
        let resp: Response<String> = JsonRpcCodec::decode_response(body).unwrap();
        assert_eq!(resp.id, "abc");
        assert!(resp.error.is_none());
        assert_eq!(resp.result.as_deref(), Some("txid"));
    }

    #[test]
    fn null_result_is_no_result() {
        let body = br#"{"id":"abc","error":null,"result":null}"#;
        let resp: Response<Vec<StreamItem>> = JsonRpcCodec::decode_response(body).unwrap();
        assert!(resp.is_ok());
        assert!(resp.result.is_none());
    }

    #[test]
    fn missing_fields_are_absent() {
        let resp: Response<Value> = JsonRpcCodec::decode_response(b"{}").unwrap();
        assert_eq!(resp.id, "");
        assert!(resp.error.is_none());
        assert!(resp.result.is_none());
    }

    #[test]
    fn error_object_decoded() {
        let body = br#"{"id":"abc","error":{"code":-708,"message":"Stream not found"},"result":null}"#;
        let resp: Response<Value> = JsonRpcCodec::decode_response(body).unwrap();
        assert_eq!(resp.error, Some(ErrorInfo::new(-708, "Stream not found")));
    }

    #[test]
    fn malformed_error_rejected() {
        for body in [
            &br#"{"id":"a","error":"boom","result":null}"#[..],
            &br#"{"id":"a","error":{"message":"no code"},"result":null}"#[..],
            &br#"{"id":"a","error":{"code":"x","message":"bad code"},"result":null}"#[..],
            &br#"{"id":"a","error":{"code":1},"result":null}"#[..],
        ] {
            let err = JsonRpcCodec::decode_response::<Value>(body).unwrap_err();
            assert!(matches!(err, ProtocolError::MalformedError(_)), "{err}");
        }
    }

    #[test]
    fn invalid_json_rejected() {
        let err = JsonRpcCodec::decode_response::<Value>(b"<html>").unwrap_err();
        assert!(matches!(err, ProtocolError::Deserialization(_)));
    }

    #[test]
    fn wrong_result_shape_rejected() {
        let body = br#"{"id":"a","error":null,"result":{"not":"a list"}}"#;
        let err = JsonRpcCodec::decode_response::<Vec<StreamItem>>(body).unwrap_err();
        assert!(matches!(err, ProtocolError::Deserialization(_)));
    }

    #[test]
    fn stream_items_with_blocktime() {
        let body = br#"{"id":"a","error":null,"result":[{"txid":"t1","blocktime":1700000000,"key":"o-1","data":"7b7d"}]}"#;
        let resp: Response<Vec<StreamItem>> = JsonRpcCodec::decode_response(body).unwrap();
        let items = resp.result.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].time, Some(Utc.with_ymd_and_hms(2023, 11, 14, 22, 13, 20).unwrap()));

        let reencoded = JsonRpcCodec::encode_response(&Response::success("a", items)).unwrap();
        let value: Value = serde_json::from_slice(&reencoded).unwrap();
        assert_eq!(value["result"][0]["blocktime"], json!(1700000000));
    }

    #[test]
    fn encode_response_writes_nulls() {
        let resp: Response<String> = Response::failure("x", ErrorInfo::new(-1, "e"));
        let value: Value = serde_json::from_slice(&JsonRpcCodec::encode_response(&resp).unwrap()).unwrap();
        assert_eq!(value, json!({"id":"x","error":{"code":-1,"message":"e"},"result":null}));
    }

    #[test]
    fn numeric_id_accepted() {
        let resp: Response<Value> = JsonRpcCodec::decode_response(br#"{"id":7,"result":1}"#).unwrap();
        assert_eq!(resp.id, "7");
    }
}
