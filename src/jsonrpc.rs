//! JSON-RPC 2.0 wire types.
//!
//! The relay never interprets message content. The only structural guarantee
//! it needs is that a request's `id` survives decode and re-encode with its
//! exact wire shape, since the host correlates responses by that value.

use std::borrow::Cow;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// JSON-RPC 2.0 version constant.
pub const JSONRPC_VERSION: &str = "2.0";

/// Standard JSON-RPC 2.0 error code for undecodable input.
pub const PARSE_ERROR: i64 = -32700;

/// Standard JSON-RPC 2.0 error code for internal failures. All transport
/// failures surface under this code, distinguished only by message and data.
pub const INTERNAL_ERROR: i64 = -32603;

/// JSON-RPC 2.0 request ID.
///
/// JSON-RPC 2.0 allows number, string, or null IDs. The exact type is
/// preserved through the relay: if the host sends `"id": 1`, the response
/// carries
/// `"id": 1`, never `"id": "1"` or `"id": 1.0`.
///
/// `Number` holds [`serde_json::Number`] rather than an integer so that
/// float IDs re-encode with their original precision.
#[derive(Debug, Clone, PartialEq)]
pub enum JsonRpcId {
    /// Numeric ID, integer or float (e.g., `"id": 1`).
    Number(serde_json::Number),
    /// String ID (e.g., `"id": "abc-123"`).
    String(String),
    /// Explicit null ID. Valid but unusual; distinct from a missing `id`
    /// field, which marks a notification.
    Null,
}

impl Serialize for JsonRpcId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            JsonRpcId::Number(n) => n.serialize(serializer),
            JsonRpcId::String(s) => serializer.serialize_str(s),
            JsonRpcId::Null => serializer.serialize_none(),
        }
    }
}

impl<'de> Deserialize<'de> for JsonRpcId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        id_from_value(Value::deserialize(deserializer)?).map_err(serde::de::Error::custom)
    }
}

fn id_from_value(value: Value) -> Result<JsonRpcId, &'static str> {
    match value {
        Value::Number(n) => Ok(JsonRpcId::Number(n)),
        Value::String(s) => Ok(JsonRpcId::String(s)),
        Value::Null => Ok(JsonRpcId::Null),
        // Booleans, arrays, and objects are not valid IDs per JSON-RPC 2.0.
        _ => Err("JSON-RPC ID must be a number, string, or null"),
    }
}

/// Deserializer distinguishing a missing `id` field from an explicit null.
///
/// With `#[serde(default)]` on the field, a missing `id` stays `None`; this
/// function only runs when the field is present, mapping `null` to
/// `Some(JsonRpcId::Null)`.
fn deserialize_optional_id<'de, D>(deserializer: D) -> Result<Option<JsonRpcId>, D::Error>
where
    D: Deserializer<'de>,
{
    id_from_value(Value::deserialize(deserializer)?)
        .map(Some)
        .map_err(serde::de::Error::custom)
}

/// JSON-RPC 2.0 request envelope.
///
/// Decoded from one input line and re-serialized as the outbound POST body.
/// Unknown fields are dropped; the `jsonrpc` tag is re-emitted as received.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    /// Protocol version tag.
    pub jsonrpc: Cow<'static, str>,
    /// Request ID. Omitted on the wire when absent (a notification);
    /// `Some(JsonRpcId::Null)` when explicitly null.
    #[serde(
        default,
        deserialize_with = "deserialize_optional_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<JsonRpcId>,
    /// Method name.
    pub method: String,
    /// Method parameters.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
}

/// JSON-RPC 2.0 response envelope.
///
/// Unlike the request, the `id` field always serializes: a response to an
/// undecodable request carries `"id": null` per JSON-RPC 2.0.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    /// Protocol version tag.
    pub jsonrpc: Cow<'static, str>,
    /// Request ID echoed from the originating request; null when the request
    /// could not be decoded.
    #[serde(default, deserialize_with = "deserialize_optional_id")]
    pub id: Option<JsonRpcId>,
    /// Result value, mutually exclusive with `error`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    /// Error object, mutually exclusive with `result`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

impl JsonRpcResponse {
    /// Create a success response echoing `id`.
    pub fn success(id: Option<JsonRpcId>, result: Value) -> Self {
        Self {
            jsonrpc: Cow::Borrowed(JSONRPC_VERSION),
            id,
            result: Some(result),
            error: None,
        }
    }

    /// Create an error response echoing `id` (`None` serializes as null).
    pub fn error(id: Option<JsonRpcId>, error: JsonRpcError) -> Self {
        Self {
            jsonrpc: Cow::Borrowed(JSONRPC_VERSION),
            id,
            result: None,
            error: Some(error),
        }
    }
}

/// JSON-RPC 2.0 error object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcError {
    /// Error code.
    pub code: i64,
    /// Short human-readable message.
    pub message: String,
    /// Free-text diagnostics (underlying failure description).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
}

impl JsonRpcError {
    /// `-32700 Parse error`: undecodable input line or request serialization
    /// failure.
    pub fn parse_error(data: impl Into<String>) -> Self {
        Self {
            code: PARSE_ERROR,
            message: "Parse error".to_string(),
            data: Some(data.into()),
        }
    }

    /// `-32603 Internal error`: outbound call construction failure.
    pub fn internal_error(data: impl Into<String>) -> Self {
        Self {
            code: INTERNAL_ERROR,
            message: "Internal error".to_string(),
            data: Some(data.into()),
        }
    }

    /// `-32603 HTTP error`: network failure, timeout, or error status. The
    /// cause is recorded only in `data`.
    pub fn http_error(data: impl Into<String>) -> Self {
        Self {
            code: INTERNAL_ERROR,
            message: "HTTP error".to_string(),
            data: Some(data.into()),
        }
    }

    /// `-32603 Invalid JSON response from server`: undecodable downstream
    /// body.
    pub fn invalid_response(data: impl Into<String>) -> Self {
        Self {
            code: INTERNAL_ERROR,
            message: "Invalid JSON response from server".to_string(),
            data: Some(data.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn roundtrip(line: &str) -> String {
        let req: JsonRpcRequest = serde_json::from_str(line).unwrap();
        serde_json::to_string(&req).unwrap()
    }

    #[test]
    fn test_integer_id_roundtrips() {
        let out = roundtrip(r#"{"jsonrpc":"2.0","id":1,"method":"test"}"#);
        assert!(out.contains(r#""id":1"#), "got: {out}");
        assert!(!out.contains(r#""id":"1""#));
        assert!(!out.contains("1.0"));
    }

    #[test]
    fn test_string_id_roundtrips() {
        let out = roundtrip(r#"{"jsonrpc":"2.0","id":"abc-123","method":"test"}"#);
        assert!(out.contains(r#""id":"abc-123""#), "got: {out}");
    }

    #[test]
    fn test_explicit_null_id_roundtrips() {
        let req: JsonRpcRequest =
            serde_json::from_str(r#"{"jsonrpc":"2.0","id":null,"method":"test"}"#).unwrap();
        assert_eq!(req.id, Some(JsonRpcId::Null));
        let out = serde_json::to_string(&req).unwrap();
        assert!(out.contains(r#""id":null"#), "got: {out}");
    }

    #[test]
    fn test_absent_id_stays_absent() {
        let req: JsonRpcRequest =
            serde_json::from_str(r#"{"jsonrpc":"2.0","method":"notify"}"#).unwrap();
        assert!(req.id.is_none());
        let out = serde_json::to_string(&req).unwrap();
        assert!(!out.contains(r#""id""#), "got: {out}");
    }

    #[test]
    fn test_float_id_keeps_precision() {
        let out = roundtrip(r#"{"jsonrpc":"2.0","id":1.5,"method":"test"}"#);
        assert!(out.contains(r#""id":1.5"#), "got: {out}");
    }

    #[test]
    fn test_large_integer_id_exact() {
        let out = roundtrip(r#"{"jsonrpc":"2.0","id":9007199254740993,"method":"test"}"#);
        assert!(out.contains("9007199254740993"), "got: {out}");
    }

    #[test]
    fn test_boolean_id_rejected() {
        let err = serde_json::from_str::<JsonRpcRequest>(
            r#"{"jsonrpc":"2.0","id":true,"method":"test"}"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("number, string, or null"));
    }

    #[test]
    fn test_array_id_rejected() {
        assert!(
            serde_json::from_str::<JsonRpcRequest>(
                r#"{"jsonrpc":"2.0","id":[1],"method":"test"}"#
            )
            .is_err()
        );
    }

    #[test]
    fn test_missing_method_rejected() {
        assert!(serde_json::from_str::<JsonRpcRequest>(r#"{"jsonrpc":"2.0","id":1}"#).is_err());
    }

    #[test]
    fn test_params_roundtrip() {
        let out = roundtrip(
            r#"{"jsonrpc":"2.0","id":1,"method":"tools/call","params":{"name":"search","arguments":{"q":"x"}}}"#,
        );
        let parsed: Value = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed["params"]["name"], "search");
        assert_eq!(parsed["params"]["arguments"]["q"], "x");
    }

    #[test]
    fn test_response_id_always_serialized() {
        let resp = JsonRpcResponse::error(None, JsonRpcError::parse_error("bad input"));
        let out = serde_json::to_string(&resp).unwrap();
        assert!(out.contains(r#""id":null"#), "got: {out}");
    }

    #[test]
    fn test_success_response_has_no_error() {
        let resp = JsonRpcResponse::success(
            Some(JsonRpcId::Number(serde_json::Number::from(7))),
            json!("ok"),
        );
        let parsed = serde_json::to_value(&resp).unwrap();
        assert_eq!(parsed["id"], 7);
        assert_eq!(parsed["result"], "ok");
        assert!(parsed.get("error").is_none());
    }

    #[test]
    fn test_error_data_omitted_when_absent() {
        let error = JsonRpcError {
            code: INTERNAL_ERROR,
            message: "Internal error".to_string(),
            data: None,
        };
        let out = serde_json::to_string(&error).unwrap();
        assert!(!out.contains(r#""data""#));
    }

    #[test]
    fn test_downstream_error_response_decodes() {
        let resp: JsonRpcResponse = serde_json::from_str(
            r#"{"jsonrpc":"2.0","id":5,"error":{"code":-32601,"message":"Method not found"}}"#,
        )
        .unwrap();
        let error = resp.error.unwrap();
        assert_eq!(error.code, -32601);
        assert_eq!(error.message, "Method not found");
        assert!(error.data.is_none());
        assert_eq!(
            resp.id,
            Some(JsonRpcId::Number(serde_json::Number::from(5)))
        );
    }

    #[test]
    fn test_error_constructors() {
        assert_eq!(JsonRpcError::parse_error("x").code, PARSE_ERROR);
        assert_eq!(JsonRpcError::internal_error("x").message, "Internal error");
        assert_eq!(JsonRpcError::http_error("x").message, "HTTP error");
        assert_eq!(
            JsonRpcError::invalid_response("x").message,
            "Invalid JSON response from server"
        );
        assert_eq!(JsonRpcError::http_error("x").code, INTERNAL_ERROR);
    }
}
