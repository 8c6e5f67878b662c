//! Azure DevOps REST client for projects and work items.
//!
//! Every call resolves the personal access token through the configured
//! [`SecretProvider`] and authenticates with HTTP Basic (empty user name,
//! token as password).

pub mod projects;
pub mod work_items;

use base64::Engine;
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Method, RequestBuilder, Response};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

use crate::config::AppConfig;
use crate::error::UpstreamError;
use crate::secrets::{resolve_token, SecretProvider};

pub const JSON_CONTENT_TYPE: &str = "application/json";
pub const JSON_PATCH_CONTENT_TYPE: &str = "application/json-patch+json";

pub struct AzureClient {
    http: reqwest::Client,
    org_url: String,
    project: Option<String>,
    api_version: String,
    token_key: String,
    secrets: Arc<dyn SecretProvider>,
}

impl AzureClient {
    pub fn new(config: &AppConfig, secrets: Arc<dyn SecretProvider>) -> Self {
        Self {
            http: reqwest::Client::new(),
            org_url: config.org_url.clone(),
            project: config.project.clone(),
            api_version: config.api_version.clone(),
            token_key: config.token_key.clone(),
            secrets,
        }
    }

    fn org_endpoint(&self, path: &str) -> String {
        format!("{}/{path}", self.org_url)
    }

    fn project_endpoint(&self, path: &str) -> Result<String, UpstreamError> {
        let project = self.project.as_deref().ok_or(UpstreamError::MissingProject)?;
        Ok(format!(
            "{}/{}/{path}",
            self.org_url,
            urlencoding::encode(project)
        ))
    }

    fn api_version_param(&self) -> String {
        format!("api-version={}", self.api_version)
    }

    async fn authorization(&self) -> Result<String, UpstreamError> {
        let token = resolve_token(self.secrets.as_ref(), &self.token_key)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Could not resolve Azure API token");
                UpstreamError::Token(e)
            })?;
        Ok(basic_auth(&token))
    }

    async fn request(&self, method: Method, url: &str) -> Result<RequestBuilder, UpstreamError> {
        let auth = self.authorization().await?;
        Ok(self
            .http
            .request(method, url)
            .header(AUTHORIZATION, auth)
            .header(ACCEPT, JSON_CONTENT_TYPE))
    }

    async fn send_empty(&self, method: Method, url: &str) -> Result<Value, UpstreamError> {
        let builder = self
            .request(method, url)
            .await?
            .header(CONTENT_TYPE, JSON_CONTENT_TYPE);
        read_response(builder.send().await?).await
    }

    async fn send_json<B>(&self, method: Method, url: &str, body: &B) -> Result<Value, UpstreamError>
    where
        B: Serialize + ?Sized,
    {
        let builder = self
            .request(method, url)
            .await?
            .header(CONTENT_TYPE, JSON_CONTENT_TYPE)
            .json(body);
        read_response(builder.send().await?).await
    }

    /// Same as [`Self::send_json`] but labelled as a JSON-patch document.
    async fn send_patch<B>(&self, method: Method, url: &str, body: &B) -> Result<Value, UpstreamError>
    where
        B: Serialize + ?Sized,
    {
        // reqwest's json() keeps an explicitly set content type.
        let builder = self
            .request(method, url)
            .await?
            .header(CONTENT_TYPE, JSON_PATCH_CONTENT_TYPE)
            .json(body);
        read_response(builder.send().await?).await
    }
}

pub fn basic_auth(token: &str) -> String {
    let encoded = base64::engine::general_purpose::STANDARD.encode(format!(":{token}"));
    format!("Basic {encoded}")
}

async fn read_response(response: Response) -> Result<Value, UpstreamError> {
    let status = response.status();
    let text = response.text().await?;

    if !status.is_success() {
        return Err(UpstreamError::Status {
            status,
            message: error_message(&text),
        });
    }
    if text.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_str(&text).map_err(|e| UpstreamError::InvalidResponse(e.to_string()))
}

/// Azure error bodies carry a `message` field; fall back to the raw text.
fn error_message(body: &str) -> String {
    let from_json = serde_json::from_str::<Value>(body).ok().and_then(|v| {
        v.get("message")
            .and_then(Value::as_str)
            .map(String::from)
    });
    match from_json {
        Some(message) => message,
        None if body.trim().is_empty() => "no response body".to_string(),
        None => body.trim().to_string(),
    }
}

/// Collection endpoints wrap results as `{ "count": n, "value": [...] }`.
fn take_value(mut body: Value) -> Result<Value, UpstreamError> {
    body.get_mut("value")
        .map(Value::take)
        .ok_or_else(|| UpstreamError::InvalidResponse("missing 'value' in collection response".into()))
}
