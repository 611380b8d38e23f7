//! Response envelope codec
//!
//! The catalog service wraps every payload as
//! `{ "code": 200, "message": "success", "data": ..., "timestamp": ... }`.
//! A response succeeded iff `code` equals [`SUCCESS_CODE`]; `401` always means
//! the session is no longer valid, whatever the transport status said.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Business success sentinel
pub const SUCCESS_CODE: i64 = 200;

/// Business code for an invalid or expired session
pub const UNAUTHORIZED_CODE: i64 = 401;

/// Uniform response wrapper
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T = Value> {
    pub code: i64,
    #[serde(default)]
    pub message: String,
    pub data: T,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
}

impl<T> Envelope<T> {
    pub fn success(data: T) -> Self {
        Self {
            code: SUCCESS_CODE,
            message: "success".to_string(),
            data,
            timestamp: Some(chrono::Utc::now().timestamp_millis()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.code == SUCCESS_CODE
    }
}

/// Outcome of [`classify`]
#[derive(Debug, Clone, PartialEq)]
pub enum Classified {
    Success(Envelope),
    BusinessError(Envelope),
    DecodeFailure(DecodeFailure),
}

/// A body that is not an object with a numeric `code`
#[derive(Debug, Clone, PartialEq)]
pub struct DecodeFailure {
    pub reason: String,
    /// Whether a `code` field was present at all (just not numeric)
    pub has_code: bool,
    /// Best-effort view of the body: parsed JSON, the text, or null when empty
    pub raw: Value,
}

impl DecodeFailure {
    /// A raw payload with no envelope, eligible for pass-through on
    /// envelope-optional calls.
    pub fn is_unwrapped(&self) -> bool {
        !self.has_code
    }
}

/// Classify a raw response body.
pub fn classify(body: &[u8]) -> Classified {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Classified::DecodeFailure(DecodeFailure {
            reason: "empty body".to_string(),
            has_code: false,
            raw: Value::Null,
        });
    }

    match serde_json::from_slice::<Value>(body) {
        Ok(value) => classify_value(value),
        Err(e) => Classified::DecodeFailure(DecodeFailure {
            reason: format!("invalid JSON: {}", e),
            has_code: false,
            raw: Value::String(String::from_utf8_lossy(body).into_owned()),
        }),
    }
}

/// Classify an already-parsed body.
pub fn classify_value(value: Value) -> Classified {
    let Value::Object(mut obj) = value else {
        return Classified::DecodeFailure(DecodeFailure {
            reason: "body is not an object".to_string(),
            has_code: false,
            raw: value,
        });
    };

    let code = match obj.get("code") {
        None => {
            return Classified::DecodeFailure(DecodeFailure {
                reason: "missing code field".to_string(),
                has_code: false,
                raw: Value::Object(obj),
            });
        }
        Some(raw_code) => match as_code(raw_code) {
            Some(code) => code,
            None => {
                return Classified::DecodeFailure(DecodeFailure {
                    reason: format!("non-numeric code: {}", raw_code),
                    has_code: true,
                    raw: Value::Object(obj),
                });
            }
        },
    };

    let envelope = Envelope {
        code,
        message: message_of(&obj).unwrap_or_default(),
        timestamp: obj.get("timestamp").and_then(Value::as_i64),
        data: obj.remove("data").unwrap_or(Value::Null),
    };

    if envelope.is_success() {
        Classified::Success(envelope)
    } else {
        Classified::BusinessError(envelope)
    }
}

/// Non-empty `message` of a JSON object body, if any.
pub fn extract_message(body: &[u8]) -> Option<String> {
    match serde_json::from_slice::<Value>(body).ok()? {
        Value::Object(obj) => message_of(&obj),
        _ => None,
    }
}

/// Numeric `code` of a JSON object body, if any.
pub fn extract_code(body: &[u8]) -> Option<i64> {
    match serde_json::from_slice::<Value>(body).ok()? {
        Value::Object(obj) => obj.get("code").and_then(as_code),
        _ => None,
    }
}

fn message_of(obj: &Map<String, Value>) -> Option<String> {
    obj.get("message")
        .and_then(Value::as_str)
        .filter(|m| !m.is_empty())
        .map(str::to_string)
}

fn as_code(value: &Value) -> Option<i64> {
    if let Some(code) = value.as_i64() {
        return Some(code);
    }
    // 200.0 from loosely typed backends
    value
        .as_f64()
        .filter(|f| f.fract() == 0.0 && f.abs() < i64::MAX as f64)
        .map(|f| f as i64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_success_envelope() {
        let body = br#"{"code":200,"message":"success","data":{"id":7},"timestamp":1700000000000}"#;
        match classify(body) {
            Classified::Success(env) => {
                assert_eq!(env.data, json!({"id": 7}));
                assert_eq!(env.timestamp, Some(1_700_000_000_000));
            }
            other => panic!("expected success, got {:?}", other),
        }
    }

    #[test]
    fn test_only_200_is_success() {
        for code in [0, -1, 201, 401, 500, 1003] {
            let body = json!({"code": code, "message": "nope", "data": null}).to_string();
            match classify(body.as_bytes()) {
                Classified::BusinessError(env) => assert_eq!(env.code, code),
                other => panic!("code {} classified as {:?}", code, other),
            }
        }
    }

    #[test]
    fn test_missing_data_is_null() {
        match classify(br#"{"code":200}"#) {
            Classified::Success(env) => {
                assert_eq!(env.data, Value::Null);
                assert_eq!(env.message, "");
            }
            other => panic!("expected success, got {:?}", other),
        }
    }

    #[test]
    fn test_decode_failures() {
        let Classified::DecodeFailure(f) = classify(b"<html>Bad Gateway</html>") else {
            panic!("html must not decode");
        };
        assert!(f.is_unwrapped());
        assert_eq!(f.raw, Value::String("<html>Bad Gateway</html>".into()));

        let Classified::DecodeFailure(f) = classify(br#"[1,2,3]"#) else {
            panic!("array must not decode");
        };
        assert!(f.is_unwrapped());
        assert_eq!(f.raw, json!([1, 2, 3]));

        let Classified::DecodeFailure(f) = classify(br#"{"records":[],"total":0}"#) else {
            panic!("object without code must not decode");
        };
        assert!(f.is_unwrapped());

        let Classified::DecodeFailure(f) = classify(br#"{"code":"200","data":1}"#) else {
            panic!("string code must not decode");
        };
        assert!(!f.is_unwrapped());

        let Classified::DecodeFailure(f) = classify(b"  ") else {
            panic!("empty body must not decode");
        };
        assert_eq!(f.raw, Value::Null);
    }

    #[test]
    fn test_extract_helpers() {
        let body = br#"{"code":1002,"message":"user already exists"}"#;
        assert_eq!(extract_message(body).as_deref(), Some("user already exists"));
        assert_eq!(extract_code(body), Some(1002));

        assert_eq!(extract_message(br#"{"message":""}"#), None);
        assert_eq!(extract_message(b"Internal Server Error"), None);
        assert_eq!(extract_code(b""), None);
    }
}
