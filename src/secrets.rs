use async_trait::async_trait;
use std::collections::HashMap;

use crate::error::SecretError;

#[async_trait]
pub trait SecretProvider: Send + Sync {
    /// Fetch the credential blob as a flat key-value map.
    async fn fetch(&self) -> Result<HashMap<String, String>, SecretError>;
}

/// Reads a JSON secret string from AWS Secrets Manager.
pub struct AwsSecretsManager {
    client: aws_sdk_secretsmanager::Client,
    secret_id: String,
}

impl AwsSecretsManager {
    pub fn new(client: aws_sdk_secretsmanager::Client, secret_id: String) -> Self {
        Self { client, secret_id }
    }
}

#[async_trait]
impl SecretProvider for AwsSecretsManager {
    async fn fetch(&self) -> Result<HashMap<String, String>, SecretError> {
        let output = self
            .client
            .get_secret_value()
            .secret_id(&self.secret_id)
            .send()
            .await
            .map_err(|e| SecretError::Lookup(e.to_string()))?;

        let raw = output.secret_string().ok_or(SecretError::Empty)?;
        parse_secret_string(raw)
    }
}

/// A fixed secret map, for local runs with `AZURE_API_TOKEN` and for tests.
pub struct StaticSecrets {
    values: HashMap<String, String>,
}

impl StaticSecrets {
    pub fn new(values: HashMap<String, String>) -> Self {
        Self { values }
    }

    pub fn with_token(key: &str, token: &str) -> Self {
        Self::new(HashMap::from([(key.to_string(), token.to_string())]))
    }
}

#[async_trait]
impl SecretProvider for StaticSecrets {
    async fn fetch(&self) -> Result<HashMap<String, String>, SecretError> {
        Ok(self.values.clone())
    }
}

pub fn parse_secret_string(raw: &str) -> Result<HashMap<String, String>, SecretError> {
    if raw.trim().is_empty() {
        return Err(SecretError::Empty);
    }
    Ok(serde_json::from_str(raw)?)
}

/// Fetch the secret and pull out the token stored under `key`.
pub async fn resolve_token(
    provider: &dyn SecretProvider,
    key: &str,
) -> Result<String, SecretError> {
    let mut values = provider.fetch().await?;
    values
        .remove(key)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| SecretError::MissingKey(key.to_string()))
}
