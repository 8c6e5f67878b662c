use serde_json::Value;

use super::{action_of, unsupported, HandlerResponse, Services};
use crate::azure::AzureClient;
use crate::error::{AzureError, HandlerError, UpstreamError};
use crate::model::work_item::{CreateWorkItem, WorkItemId, WorkItemUpdates};
use crate::notify::StatusMessage;
use crate::schema::validate_create_work_item;

const IDS_FORMAT_ERROR: &str =
    "Invalid format for ids. Must be a comma-separated string or array of numbers.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkItemRequest {
    Create(CreateWorkItem),
    Get { id: WorkItemId },
    Update { id: WorkItemId, updates: WorkItemUpdates },
    Delete { id: WorkItemId },
    List { ids: Vec<WorkItemId> },
}

impl WorkItemRequest {
    pub fn action(&self) -> &'static str {
        match self {
            WorkItemRequest::Create(_) => "create",
            WorkItemRequest::Get { .. } => "get",
            WorkItemRequest::Update { .. } => "update",
            WorkItemRequest::Delete { .. } => "delete",
            WorkItemRequest::List { .. } => "list",
        }
    }

    /// Build a request from `{ action, payload }`, coercing ids along the way.
    pub fn parse(event: &Value) -> Result<Self, HandlerError> {
        let action = action_of(event)?;
        let payload = event.get("payload").unwrap_or(&Value::Null);

        match action {
            "create" => validate_create_work_item(payload)
                .map(WorkItemRequest::Create)
                .map_err(|v| HandlerError::validation(format!("Invalid request data: {v}"))),
            "get" => Ok(WorkItemRequest::Get {
                id: required_id(payload, action)?,
            }),
            "update" => {
                let id = required_id(payload, action)?;
                let updates = match payload.get("updates") {
                    None | Some(Value::Null) => WorkItemUpdates::default(),
                    Some(raw) => serde_json::from_value(raw.clone()).map_err(|e| {
                        HandlerError::validation(format!("Invalid updates: {e}"))
                    })?,
                };
                if updates.to_patch().is_empty() {
                    return Err(HandlerError::validation("No valid update fields provided."));
                }
                Ok(WorkItemRequest::Update { id, updates })
            }
            "delete" => Ok(WorkItemRequest::Delete {
                id: required_id(payload, action)?,
            }),
            "list" => Ok(WorkItemRequest::List {
                ids: parse_ids(payload.get("ids"))?,
            }),
            other => Err(unsupported(other)),
        }
    }
}

/// Coerce a JSON number or numeric string into a work item id.
pub fn coerce_id(value: &Value) -> Option<WorkItemId> {
    match value {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| {
                n.as_f64()
                    .filter(|f| f.fract() == 0.0 && *f >= 0.0)
                    .map(|f| f as u64)
            })
            .and_then(|id| WorkItemId::try_from(id).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn required_id(payload: &Value, action: &str) -> Result<WorkItemId, HandlerError> {
    payload
        .get("id")
        .and_then(coerce_id)
        .ok_or_else(|| HandlerError::validation(format!("Invalid ID provided for {action} action.")))
}

/// Accepts `"1, 2,3"` or `[1, "2"]`.
pub fn parse_ids(value: Option<&Value>) -> Result<Vec<WorkItemId>, HandlerError> {
    let ids = match value {
        Some(Value::String(s)) if s.trim().is_empty() => Vec::new(),
        Some(Value::String(s)) => s
            .split(',')
            .map(|part| coerce_id(&Value::String(part.to_string())))
            .collect::<Option<Vec<_>>>()
            .ok_or_else(|| HandlerError::validation(IDS_FORMAT_ERROR))?,
        Some(Value::Array(items)) => items
            .iter()
            .map(coerce_id)
            .collect::<Option<Vec<_>>>()
            .ok_or_else(|| HandlerError::validation(IDS_FORMAT_ERROR))?,
        _ => return Err(HandlerError::validation(IDS_FORMAT_ERROR)),
    };
    if ids.is_empty() {
        return Err(HandlerError::validation(
            "You must provide an array of work item IDs.",
        ));
    }
    Ok(ids)
}

async fn dispatch(request: &WorkItemRequest, azure: &AzureClient) -> Result<Value, AzureError> {
    match request {
        WorkItemRequest::Create(create) => azure.create_work_item(create).await,
        WorkItemRequest::Get { id } => {
            let item = azure.get_work_item(*id).await?;
            serde_json::to_value(item).map_err(|e| {
                AzureError::failed(
                    "Failed to fetch work item",
                    UpstreamError::InvalidResponse(e.to_string()),
                )
            })
        }
        WorkItemRequest::Update { id, updates } => azure.update_work_item(*id, updates).await,
        WorkItemRequest::Delete { id } => azure.delete_work_item(*id).await,
        WorkItemRequest::List { ids } => azure.list_work_items(ids).await,
    }
}

pub async fn handle_work_item_event(event: &Value, services: &Services) -> HandlerResponse {
    let request = match WorkItemRequest::parse(event) {
        Ok(request) => request,
        Err(e) => {
            tracing::warn!(error = %e, "Rejected work item request");
            return HandlerResponse::error(&e);
        }
    };
    let action = request.action();
    tracing::info!(action, "Handling work item request");

    match dispatch(&request, &services.azure).await {
        Ok(result) => {
            services
                .notifications
                .chat(&format!(
                    "**Action:** {action} work item completed successfully."
                ))
                .await;
            HandlerResponse::ok(format!("{action} completed"), result)
        }
        Err(e) => {
            let message = e.to_string();
            tracing::error!(action, error = %message, "Work item action failed");
            services
                .notifications
                .publish_status(&StatusMessage::error(action, &message))
                .await;
            services
                .notifications
                .chat(&format!("**Action:** {action} failed. Error: {message}"))
                .await;
            HandlerResponse::error(&HandlerError::from(e))
        }
    }
}
