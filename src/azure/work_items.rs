use reqwest::Method;
use serde_json::Value;

use super::{take_value, AzureClient};
use crate::error::{AzureError, UpstreamError};
use crate::model::work_item::{CreateWorkItem, WorkItem, WorkItemId, WorkItemUpdates};
use crate::schema::validate_work_item;

impl AzureClient {
    fn work_items_url(&self, suffix: &str) -> Result<String, UpstreamError> {
        let base = self.project_endpoint("_apis/wit/workitems")?;
        Ok(format!("{base}{suffix}"))
    }

    pub async fn create_work_item(&self, request: &CreateWorkItem) -> Result<Value, AzureError> {
        let result: Result<Value, UpstreamError> = async {
            let url = self.work_items_url(&format!(
                "/${}?{}",
                urlencoding::encode(&request.work_item_type),
                self.api_version_param()
            ))?;
            tracing::info!(work_item_type = %request.work_item_type, "Creating work item");
            self.send_patch(Method::POST, &url, &request.to_patch()).await
        }
        .await;
        result.map_err(|e| AzureError::failed("Failed to create work item in Azure", e))
    }

    /// Fetch a single work item and check the response shape before returning it.
    pub async fn get_work_item(&self, id: WorkItemId) -> Result<WorkItem, AzureError> {
        let result: Result<WorkItem, UpstreamError> = async {
            let url = self.work_items_url(&format!("/{id}?{}", self.api_version_param()))?;
            tracing::info!(%url, "Fetching work item");
            let body = self.send_empty(Method::GET, &url).await?;
            validate_work_item(&body).map_err(|violations| {
                tracing::error!(%violations, "Work item response failed validation");
                UpstreamError::InvalidResponse(violations.to_string())
            })
        }
        .await;
        result.map_err(|e| AzureError::failed("Failed to fetch work item", e))
    }

    pub async fn update_work_item(
        &self,
        id: WorkItemId,
        updates: &WorkItemUpdates,
    ) -> Result<Value, AzureError> {
        let result: Result<Value, UpstreamError> = async {
            let url = self.work_items_url(&format!("/{id}?{}", self.api_version_param()))?;
            self.send_patch(Method::PATCH, &url, &updates.to_patch()).await
        }
        .await;
        result.map_err(|e| AzureError::failed("Failed to update work item", e))
    }

    pub async fn list_work_items(&self, ids: &[WorkItemId]) -> Result<Value, AzureError> {
        let joined = ids
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(",");
        let result: Result<Value, UpstreamError> = async {
            let url = self.work_items_url(&format!("?ids={joined}&{}", self.api_version_param()))?;
            let body = self.send_empty(Method::GET, &url).await?;
            take_value(body)
        }
        .await;
        result.map_err(|e| AzureError::failed("Failed to list work items", e))
    }

    pub async fn delete_work_item(&self, id: WorkItemId) -> Result<Value, AzureError> {
        let result: Result<Value, UpstreamError> = async {
            let url = self.work_items_url(&format!("/{id}?{}", self.api_version_param()))?;
            tracing::info!(%url, "Deleting work item");
            self.send_empty(Method::DELETE, &url).await
        }
        .await;
        match result {
            Ok(body) => {
                tracing::info!(id, "Deleted work item");
                Ok(body)
            }
            Err(e) => {
                tracing::error!(id, error = %e, "Error deleting work item");
                Err(AzureError::failed(format!("Failed to delete Work Item {id}"), e))
            }
        }
    }
}
