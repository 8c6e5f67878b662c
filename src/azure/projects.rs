use reqwest::{Method, StatusCode};
use serde_json::Value;

use super::{take_value, AzureClient};
use crate::error::AzureError;
use crate::model::project::CreateProject;

impl AzureClient {
    fn projects_url(&self, id_or_name: Option<&str>) -> String {
        let path = match id_or_name {
            Some(id) => format!("_apis/projects/{}", urlencoding::encode(id)),
            None => "_apis/projects".to_string(),
        };
        format!("{}?{}", self.org_endpoint(&path), self.api_version_param())
    }

    /// Queue creation of a Git-backed project on the Agile process.
    pub async fn create_project(&self, request: &CreateProject) -> Result<Value, AzureError> {
        let url = self.projects_url(None);
        tracing::info!(name = %request.name, visibility = %request.visibility, "Creating project");
        self.send_json(Method::POST, &url, &request.to_body())
            .await
            .map_err(|e| AzureError::failed("Failed to create project", e))
    }

    pub async fn list_projects(&self) -> Result<Value, AzureError> {
        let url = self.projects_url(None);
        self.send_empty(Method::GET, &url)
            .await
            .and_then(take_value)
            .map_err(|e| AzureError::failed("Failed to list projects", e))
    }

    pub async fn get_project(&self, id_or_name: &str) -> Result<Value, AzureError> {
        let url = self.projects_url(Some(id_or_name));
        self.send_empty(Method::GET, &url)
            .await
            .map_err(|e| match e.status() {
                Some(StatusCode::NOT_FOUND) => AzureError::ProjectNotFound(id_or_name.to_string()),
                _ => AzureError::failed("Error fetching project details", e),
            })
    }

    pub async fn delete_project(&self, project_id: &str) -> Result<Value, AzureError> {
        let url = self.projects_url(Some(project_id));
        tracing::info!(project_id, "Deleting project");
        self.send_empty(Method::DELETE, &url)
            .await
            .map_err(|e| AzureError::failed(format!("Failed to delete project {project_id}"), e))
    }
}

#[cfg(test)]
mod tests {
    use super::super::testutils::{client, expected_auth};
    use super::*;
    use crate::model::project::{Visibility, AGILE_PROCESS_TEMPLATE_ID};
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn create_project_posts_full_body() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/_apis/projects"))
            .and(query_param("api-version", "7.1"))
            .and(header("authorization", expected_auth().as_str()))
            .and(header("content-type", "application/json"))
            .and(body_json(json!({
                "name": "Apollo",
                "description": "Moonshot",
                "capabilities": {
                    "versioncontrol": { "sourceControlType": "Git" },
                    "processTemplate": { "templateTypeId": AGILE_PROCESS_TEMPLATE_ID }
                },
                "visibility": "private"
            })))
            .respond_with(
                ResponseTemplate::new(202).set_body_json(json!({ "id": "op-1", "status": "queued" })),
            )
            .expect(1)
            .mount(&mock_server)
            .await;

        let request = CreateProject {
            name: "Apollo".into(),
            description: Some("Moonshot".into()),
            visibility: Visibility::Private,
        };
        let result = client(&mock_server.uri()).create_project(&request).await.unwrap();
        assert_eq!(result["status"], "queued");
    }

    #[tokio::test]
    async fn list_projects_returns_value_array() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/_apis/projects"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "count": 2,
                "value": [{ "name": "Apollo" }, { "name": "Gemini" }]
            })))
            .mount(&mock_server)
            .await;

        let result = client(&mock_server.uri()).list_projects().await.unwrap();
        assert_eq!(result, json!([{ "name": "Apollo" }, { "name": "Gemini" }]));
    }

    #[tokio::test]
    async fn get_project_maps_404_to_not_found() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/_apis/projects/Skylab"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "message": "TF200016: The following project does not exist: Skylab."
            })))
            .mount(&mock_server)
            .await;

        let err = client(&mock_server.uri()).get_project("Skylab").await.unwrap_err();
        assert_eq!(err.to_string(), "Project with ID or name \"Skylab\" not found.");
    }

    #[tokio::test]
    async fn get_project_wraps_other_failures() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/_apis/projects/Skylab"))
            .respond_with(ResponseTemplate::new(401).set_body_string("Access denied"))
            .mount(&mock_server)
            .await;

        let err = client(&mock_server.uri()).get_project("Skylab").await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "Error fetching project details: Azure DevOps responded with 401 Unauthorized: Access denied"
        );
    }

    #[tokio::test]
    async fn delete_project_encodes_id() {
        let mock_server = MockServer::start().await;

        Mock::given(method("DELETE"))
            .and(path("/_apis/projects/Old%20Project"))
            .respond_with(ResponseTemplate::new(202).set_body_json(json!({ "status": "queued" })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let result = client(&mock_server.uri())
            .delete_project("Old Project")
            .await
            .unwrap();
        assert_eq!(result["status"], "queued");
    }

    #[tokio::test]
    async fn delete_project_failure_names_project() {
        let mock_server = MockServer::start().await;

        Mock::given(method("DELETE"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&mock_server)
            .await;

        let err = client(&mock_server.uri()).delete_project("p-1").await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "Failed to delete project p-1: Azure DevOps responded with 500 Internal Server Error: no response body"
        );
    }
}
