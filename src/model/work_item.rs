use serde::{Deserialize, Serialize};

pub type WorkItemId = u32;

pub const TITLE_FIELD: &str = "System.Title";
pub const DESCRIPTION_FIELD: &str = "System.Description";
pub const DEFAULT_DESCRIPTION: &str = "No description provided";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateWorkItem {
    pub title: String,
    pub description: Option<String>,
    pub work_item_type: String,
}

impl CreateWorkItem {
    pub fn to_patch(&self) -> Vec<PatchOperation> {
        vec![
            PatchOperation::add(TITLE_FIELD, &self.title),
            PatchOperation::add(
                DESCRIPTION_FIELD,
                self.description
                    .as_deref()
                    .filter(|d| !d.is_empty())
                    .unwrap_or(DEFAULT_DESCRIPTION),
            ),
        ]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct WorkItemUpdates {
    pub title: Option<String>,
    pub description: Option<String>,
}

impl WorkItemUpdates {
    /// Patch operations for every non-empty field. Empty means nothing to send.
    pub fn to_patch(&self) -> Vec<PatchOperation> {
        [(TITLE_FIELD, &self.title), (DESCRIPTION_FIELD, &self.description)]
            .into_iter()
            .filter_map(|(field, value)| {
                value
                    .as_deref()
                    .filter(|v| !v.is_empty())
                    .map(|v| PatchOperation::add(field, v))
            })
            .collect()
    }
}

/// One entry of a JSON-patch document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PatchOperation {
    pub op: &'static str,
    pub path: String,
    pub value: String,
}

impl PatchOperation {
    pub fn add(field: &str, value: &str) -> Self {
        Self {
            op: "add",
            path: format!("/fields/{field}"),
            value: value.to_string(),
        }
    }
}

/// A fetched work item, reduced to the fields this service exposes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkItem {
    pub id: u64,
    pub rev: u64,
    pub fields: WorkItemFields,
    #[serde(rename = "_links")]
    pub links: WorkItemLinks,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkItemFields {
    #[serde(rename = "System.AreaPath")]
    pub area_path: String,
    #[serde(rename = "System.TeamProject")]
    pub team_project: String,
    #[serde(rename = "System.IterationPath")]
    pub iteration_path: String,
    #[serde(rename = "System.WorkItemType")]
    pub work_item_type: String,
    #[serde(rename = "System.State")]
    pub state: String,
    #[serde(rename = "System.Reason")]
    pub reason: String,
    #[serde(rename = "System.CreatedDate")]
    pub created_date: String,
    #[serde(rename = "System.CreatedBy")]
    pub created_by: IdentityRef,
    #[serde(rename = "System.ChangedDate")]
    pub changed_date: String,
    #[serde(rename = "System.ChangedBy")]
    pub changed_by: IdentityRef,
    #[serde(rename = "System.Title")]
    pub title: String,
    #[serde(
        rename = "Microsoft.VSTS.Common.ClosedDate",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub closed_date: Option<String>,
    #[serde(
        rename = "Microsoft.VSTS.Common.ClosedBy",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub closed_by: Option<IdentityRef>,
    #[serde(rename = "Microsoft.VSTS.Common.Priority")]
    pub priority: serde_json::Number,
    #[serde(
        rename = "System.Description",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentityRef {
    pub display_name: String,
    pub unique_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkItemLinks {
    pub html: Link,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub href: String,
}
