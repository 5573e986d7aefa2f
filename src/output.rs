//! Wire types: the request body sent to the server and the confirmation it
//! sends back.

use crate::error::SubmitError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// JSON body of one diary submission.
///
/// Built fresh from [`crate::form::FormState`] at submit time; never stored.
/// Every text field is sent, empty or not.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionRequest {
    pub comments: String,
    pub date: String,
    pub area: String,
    pub category: String,
    pub tags: String,
    pub event: String,
    /// Wrapped base64 PNG text of every attached photo, in attachment order.
    #[serde(rename = "imageData")]
    pub image_data: Vec<String>,
}

/// Server acknowledgment of a created diary entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Confirmation {
    pub name: Option<String>,
    pub job: Option<String>,
    pub id: Option<String>,
    #[serde(rename = "createdAt")]
    pub created_at: Option<String>,
}

impl Confirmation {
    /// Decode a raw reply body.
    ///
    /// The body must be a JSON object. Each known key is taken only when its
    /// value is a string; a missing key or a value of any other type leaves
    /// the field `None` instead of failing the whole reply.
    pub fn from_body(body: &str) -> Result<Self, SubmitError> {
        let value: Value = serde_json::from_str(body).map_err(|e| SubmitError::Decode {
            detail: e.to_string(),
        })?;

        let map = match value {
            Value::Object(map) => map,
            other => {
                return Err(SubmitError::Decode {
                    detail: format!("expected a JSON object, got {}", json_kind(&other)),
                })
            }
        };

        let text = |key: &str| map.get(key).and_then(Value::as_str).map(str::to_owned);

        Ok(Self {
            name: text("name"),
            job: text("job"),
            id: text("id"),
            created_at: text("createdAt"),
        })
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
