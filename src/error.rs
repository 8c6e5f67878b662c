//! Error types for each layer, from credential lookup up to the handler envelope.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SecretError {
    #[error("secret lookup failed: {0}")]
    Lookup(String),
    #[error("SecretString is empty or missing.")]
    Empty,
    #[error("secret is not a JSON object of strings: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("secret has no '{0}' key")]
    MissingKey(String),
}

/// The underlying cause of a failed upstream operation.
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("Failed to retrieve Azure API token.")]
    Token(#[source] SecretError),
    #[error("Azure DevOps responded with {status}: {message}")]
    Status {
        status: reqwest::StatusCode,
        message: String,
    },
    #[error("{0}")]
    Transport(#[from] reqwest::Error),
    #[error("Invalid response from Azure API. {0}")]
    InvalidResponse(String),
    #[error("AZURE_PROJECT is not configured")]
    MissingProject,
}

impl UpstreamError {
    pub fn status(&self) -> Option<reqwest::StatusCode> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[derive(Debug, Error)]
pub enum AzureError {
    #[error("Project with ID or name \"{0}\" not found.")]
    ProjectNotFound(String),
    #[error("{context}: {source}")]
    Failed {
        context: String,
        source: UpstreamError,
    },
}

impl AzureError {
    pub fn failed(context: impl Into<String>, source: UpstreamError) -> Self {
        Self::Failed {
            context: context.into(),
            source,
        }
    }
}

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("webhook request failed: {0}")]
    Webhook(#[from] reqwest::Error),
    #[error("topic publish failed: {0}")]
    Publish(String),
    #[error("could not serialise message: {0}")]
    Encode(#[from] serde_json::Error),
}

/// What a handler can fail with. Maps one-to-one onto response status codes.
#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("{0}")]
    Validation(String),
    #[error(transparent)]
    Operation(#[from] AzureError),
}

impl HandlerError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn status_code(&self) -> u16 {
        match self {
            Self::Validation(_) => 400,
            Self::Operation(_) => 500,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_message_names_the_project() {
        let err = AzureError::ProjectNotFound("Apollo".into());
        assert_eq!(err.to_string(), "Project with ID or name \"Apollo\" not found.");
    }

    #[test]
    fn failed_message_wraps_cause() {
        let err = AzureError::failed(
            "Failed to list projects",
            UpstreamError::Status {
                status: reqwest::StatusCode::UNAUTHORIZED,
                message: "TF400813: not authorized".into(),
            },
        );
        assert_eq!(
            err.to_string(),
            "Failed to list projects: Azure DevOps responded with 401 Unauthorized: TF400813: not authorized"
        );
    }

    #[test]
    fn token_failure_hides_secret_details() {
        let err = AzureError::failed(
            "Failed to fetch work item",
            UpstreamError::Token(SecretError::MissingKey("Azure-API-token".into())),
        );
        assert_eq!(
            err.to_string(),
            "Failed to fetch work item: Failed to retrieve Azure API token."
        );
    }

    #[test]
    fn status_codes() {
        assert_eq!(HandlerError::validation("bad").status_code(), 400);
        let op: HandlerError = AzureError::ProjectNotFound("x".into()).into();
        assert_eq!(op.status_code(), 500);
    }
}
