//! Request handlers: parse an inbound event into a typed request, call Azure
//! DevOps, notify, and answer with a status-coded JSON envelope.

pub mod project;
pub mod work_item;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::azure::AzureClient;
use crate::error::HandlerError;
use crate::notify::Notifications;

/// Everything a handler needs, built once per process.
pub struct Services {
    pub azure: AzureClient,
    pub notifications: Notifications,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandlerResponse {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    pub body: String,
}

impl HandlerResponse {
    fn json(status_code: u16, body: &Value) -> Self {
        Self {
            status_code,
            body: body.to_string(),
        }
    }

    pub fn ok(message: String, result: Value) -> Self {
        Self::json(200, &json!({ "message": message, "result": result }))
    }

    pub fn error(err: &HandlerError) -> Self {
        Self::json(err.status_code(), &json!({ "error": err.to_string() }))
    }

    /// Parse `body` back into JSON. Bodies built by this module always parse.
    pub fn body_json(&self) -> Option<Value> {
        serde_json::from_str(&self.body).ok()
    }
}

/// Read the `action` field. Absent, null and empty all count as missing.
fn action_of(body: &Value) -> Result<&str, HandlerError> {
    match body.get("action") {
        None | Some(Value::Null) => Err(HandlerError::validation("Action is required.")),
        Some(Value::String(action)) if action.is_empty() => {
            Err(HandlerError::validation("Action is required."))
        }
        Some(Value::String(action)) => Ok(action),
        Some(other) => Err(unsupported(&other.to_string())),
    }
}

fn unsupported(action: &str) -> HandlerError {
    HandlerError::validation(format!("Unsupported action: {action}"))
}
