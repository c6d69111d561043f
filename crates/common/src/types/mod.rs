use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Interpolation parameters attached to a backend error, copied through untouched.
pub type ErrorParams = Map<String, Value>;

/// Error body the backend sends along with a non-2xx status.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorEnvelope {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<ErrorParams>,
}

impl ErrorEnvelope {
    /// Decode an error body leniently.
    ///
    /// Returns `None` when the body is empty, not JSON, or not a JSON object.
    /// Individual fields of the wrong type are dropped instead of failing the
    /// whole envelope, so an `errorCode` survives a malformed `message`.
    pub fn from_body(body: &[u8]) -> Option<Self> {
        let Value::Object(obj) = serde_json::from_slice::<Value>(body).ok()? else {
            return None;
        };
        Some(Self {
            message: obj
                .get("message")
                .and_then(Value::as_str)
                .filter(|m| !m.is_empty())
                .map(str::to_owned),
            error_code: obj
                .get("errorCode")
                .and_then(Value::as_str)
                .filter(|c| !c.is_empty())
                .map(str::to_owned),
            params: obj.get("params").and_then(Value::as_object).cloned(),
        })
    }
}
