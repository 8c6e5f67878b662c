use serde_json::Value;

use super::{action_of, unsupported, HandlerResponse, Services};
use crate::azure::AzureClient;
use crate::error::{AzureError, HandlerError};
use crate::model::project::CreateProject;
use crate::schema::validate_create_project;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProjectRequest {
    Create(CreateProject),
    List,
    Get { project_id: String },
    Delete { project_id: String },
}

impl ProjectRequest {
    pub fn action(&self) -> &'static str {
        match self {
            ProjectRequest::Create(_) => "create",
            ProjectRequest::List => "list",
            ProjectRequest::Get { .. } => "get",
            ProjectRequest::Delete { .. } => "delete",
        }
    }

    /// Build a request from the decoded body `{ action, payload? }`.
    pub fn parse(body: &Value) -> Result<Self, HandlerError> {
        let action = action_of(body)?;
        let payload = body.get("payload").unwrap_or(&Value::Null);

        match action {
            "create" => {
                let present = |key: &str| {
                    payload
                        .get(key)
                        .and_then(Value::as_str)
                        .is_some_and(|v| !v.is_empty())
                };
                if !present("name") || !present("visibility") {
                    return Err(HandlerError::validation(
                        "'name' and 'visibility' are required for project creation.",
                    ));
                }
                let request = validate_create_project(payload)
                    .map_err(|v| HandlerError::validation(format!("Validation error: {v}")))?;
                Ok(ProjectRequest::Create(request))
            }
            "list" => Ok(ProjectRequest::List),
            "get" => Ok(ProjectRequest::Get {
                project_id: project_id(payload, action)?,
            }),
            "delete" => Ok(ProjectRequest::Delete {
                project_id: project_id(payload, action)?,
            }),
            other => Err(unsupported(other)),
        }
    }
}

fn project_id(payload: &Value, action: &str) -> Result<String, HandlerError> {
    payload
        .get("projectId")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(String::from)
        .ok_or_else(|| {
            HandlerError::validation(format!("'projectId' is required for {action} action."))
        })
}

/// Unwrap the event envelope. `body` may be a JSON string or an already-decoded object.
pub fn decode_body(event: &Value) -> Result<Value, HandlerError> {
    match event.get("body") {
        None | Some(Value::Null) => Err(HandlerError::validation("Request body is required.")),
        Some(Value::String(raw)) => serde_json::from_str::<Value>(raw)
            .ok()
            .filter(Value::is_object)
            .ok_or_else(|| HandlerError::validation("Invalid JSON")),
        Some(body @ Value::Object(_)) => Ok(body.clone()),
        Some(_) => Err(HandlerError::validation("Invalid JSON")),
    }
}

async fn dispatch(request: &ProjectRequest, azure: &AzureClient) -> Result<Value, AzureError> {
    match request {
        ProjectRequest::Create(create) => azure.create_project(create).await,
        ProjectRequest::List => azure.list_projects().await,
        ProjectRequest::Get { project_id } => azure.get_project(project_id).await,
        ProjectRequest::Delete { project_id } => azure.delete_project(project_id).await,
    }
}

pub async fn handle_project_event(event: &Value, services: &Services) -> HandlerResponse {
    let request = match decode_body(event).and_then(|body| ProjectRequest::parse(&body)) {
        Ok(request) => request,
        Err(e) => {
            tracing::warn!(error = %e, "Rejected project request");
            return HandlerResponse::error(&e);
        }
    };
    let action = request.action();
    tracing::info!(action, "Handling project request");

    match dispatch(&request, &services.azure).await {
        Ok(result) => {
            services
                .notifications
                .chat(&format!(
                    "✅ **Action:** `{action}` project completed successfully."
                ))
                .await;
            HandlerResponse::ok(format!("{action} operation completed."), result)
        }
        Err(e) => {
            tracing::error!(action, error = %e, "Project action failed");
            services
                .notifications
                .chat(&format!(
                    "❌ **Action:** `{action}` project failed. Error: {e}"
                ))
                .await;
            HandlerResponse::error(&HandlerError::from(e))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::project::Visibility;
    use serde_json::json;

    fn message(result: Result<ProjectRequest, HandlerError>) -> String {
        result.unwrap_err().to_string()
    }

    #[test]
    fn missing_action_is_required() {
        assert_eq!(message(ProjectRequest::parse(&json!({}))), "Action is required.");
        assert_eq!(
            message(ProjectRequest::parse(&json!({ "action": "" }))),
            "Action is required."
        );
    }

    #[test]
    fn create_requires_name_and_visibility() {
        let expected = "'name' and 'visibility' are required for project creation.";
        assert_eq!(
            message(ProjectRequest::parse(&json!({ "action": "create" }))),
            expected
        );
        assert_eq!(
            message(ProjectRequest::parse(
                &json!({ "action": "create", "payload": { "name": "Apollo" } })
            )),
            expected
        );
        assert_eq!(
            message(ProjectRequest::parse(
                &json!({ "action": "create", "payload": { "visibility": "public" } })
            )),
            expected
        );
    }

    #[test]
    fn create_rejects_unknown_visibility() {
        let err = message(ProjectRequest::parse(&json!({
            "action": "create",
            "payload": { "name": "Apollo", "visibility": "internal" }
        })));
        assert_eq!(
            err,
            "Validation error: visibility: Visibility must be either 'private' or 'public'"
        );
    }

    #[test]
    fn parses_create() {
        let request = ProjectRequest::parse(&json!({
            "action": "create",
            "payload": { "name": "Apollo", "visibility": "public" }
        }))
        .unwrap();
        assert_eq!(
            request,
            ProjectRequest::Create(CreateProject {
                name: "Apollo".into(),
                description: None,
                visibility: Visibility::Public,
            })
        );
        assert_eq!(request.action(), "create");
    }

    #[test]
    fn get_and_delete_need_project_id() {
        assert_eq!(
            message(ProjectRequest::parse(&json!({ "action": "get" }))),
            "'projectId' is required for get action."
        );
        assert_eq!(
            ProjectRequest::parse(&json!({ "action": "delete", "payload": { "projectId": "p-1" } }))
                .unwrap(),
            ProjectRequest::Delete {
                project_id: "p-1".into()
            }
        );
    }

    #[test]
    fn unknown_action_is_rejected() {
        assert_eq!(
            message(ProjectRequest::parse(&json!({ "action": "archive" }))),
            "Unsupported action: archive"
        );
    }

    #[test]
    fn decodes_string_and_object_bodies() {
        let from_string = decode_body(&json!({ "body": "{\"action\":\"list\"}" })).unwrap();
        let from_object = decode_body(&json!({ "body": { "action": "list" } })).unwrap();
        assert_eq!(from_string, from_object);
    }

    #[test]
    fn rejects_invalid_json_body() {
        let err = decode_body(&json!({ "body": "{not json" })).unwrap_err();
        assert_eq!(err.to_string(), "Invalid JSON");
        assert_eq!(err.status_code(), 400);

        let err = decode_body(&json!({})).unwrap_err();
        assert_eq!(err.to_string(), "Request body is required.");
    }
}
