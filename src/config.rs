use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::PathBuf;

pub const DEFAULT_TOKEN_KEY: &str = "Azure-API-token";

/// Runtime configuration shared by every handler. Built once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub region: String,
    pub secret_name: String,
    pub org_url: String,
    pub api_version: String,
    pub project: Option<String>,
    pub sns_topic_arn: Option<String>,
    pub discord_webhook_url: Option<String>,
    /// Key inside the secret blob that holds the personal access token.
    pub token_key: String,
}

/// Optional values read from `config.toml`. Environment variables win over these.
#[derive(Debug, Deserialize, Default)]
pub struct FileConfig {
    pub region: Option<String>,
    pub secret_name: Option<String>,
    pub org_url: Option<String>,
    pub api_version: Option<String>,
    pub project: Option<String>,
    pub sns_topic_arn: Option<String>,
    pub discord_webhook_url: Option<String>,
    pub token_key: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(FileConfig::default(), |key| std::env::var(key).ok())
    }

    /// Resolve each setting from `lookup` first, then from `file`.
    pub fn from_lookup<F>(file: FileConfig, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let pick = |key: &str, fallback: Option<String>| {
            non_empty(lookup(key)).or_else(|| non_empty(fallback))
        };

        let region = pick("MY_REGION", file.region);
        let secret_name = pick("AZURE_SECRET_NAME", file.secret_name);
        let (Some(region), Some(secret_name)) = (region, secret_name) else {
            bail!("MY_REGION and AZURE_SECRET_NAME must be configured");
        };

        let org_url = pick("AZURE_ORG_URL", file.org_url)
            .context("AZURE_ORG_URL must be configured")?
            .trim_end_matches('/')
            .to_string();
        let api_version =
            pick("AZURE_API_VERSION", file.api_version).context("AZURE_API_VERSION must be configured")?;

        let project = pick("AZURE_PROJECT", file.project);
        if project.is_none() {
            tracing::warn!("AZURE_PROJECT is not set; work item actions will fail");
        }
        let sns_topic_arn = pick("SNS_TOPIC_ARN", file.sns_topic_arn);
        if sns_topic_arn.is_none() {
            tracing::warn!("SNS_TOPIC_ARN is not set; status messages will not be published");
        }
        let discord_webhook_url = pick("DISCORD_WEBHOOK_URL", file.discord_webhook_url);
        if discord_webhook_url.is_none() {
            tracing::warn!("DISCORD_WEBHOOK_URL is not set; chat notifications are disabled");
        }

        Ok(Self {
            region,
            secret_name,
            org_url,
            api_version,
            project,
            sns_topic_arn,
            discord_webhook_url,
            token_key: pick("AZURE_TOKEN_KEY", file.token_key)
                .unwrap_or_else(|| DEFAULT_TOKEN_KEY.to_string()),
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn config_path() -> PathBuf {
    if let Some(path) = std::env::var_os("AZOPS_CONFIG") {
        return PathBuf::from(path);
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".azops")
        .join("config.toml")
}

pub fn read_file_config(path: &std::path::Path) -> Result<FileConfig> {
    if !path.exists() {
        return Ok(FileConfig::default());
    }
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config from {}", path.display()))?;
    let config: FileConfig =
        toml::from_str(&contents).with_context(|| "Failed to parse config.toml")?;
    Ok(config)
}

/// Load the config file (if any) and layer the environment on top. Used by the local CLI.
pub fn load_config() -> Result<AppConfig> {
    let file = read_file_config(&config_path())?;
    AppConfig::from_lookup(file, |key| std::env::var(key).ok())
}
