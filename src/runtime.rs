use std::sync::Arc;

use aws_config::{BehaviorVersion, Region};
use tracing_subscriber::EnvFilter;

use crate::azure::AzureClient;
use crate::config::AppConfig;
use crate::handlers::Services;
use crate::notify::discord::DiscordWebhook;
use crate::notify::sns::SnsPublisher;
use crate::notify::{ChatNotifier, Notifications, TopicPublisher};
use crate::secrets::{AwsSecretsManager, SecretProvider, StaticSecrets};

/// Plain stderr formatter without ANSI colours or timestamps; CloudWatch adds its own.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .without_time()
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Build the AWS clients and wire them into handler services.
///
/// When `token_override` is set the secret store is bypassed entirely.
pub async fn build_services(config: &AppConfig, token_override: Option<String>) -> Services {
    let aws = aws_config::defaults(BehaviorVersion::latest())
        .region(Region::new(config.region.clone()))
        .load()
        .await;

    let secrets: Arc<dyn SecretProvider> = match token_override {
        Some(token) => Arc::new(StaticSecrets::with_token(&config.token_key, &token)),
        None => Arc::new(AwsSecretsManager::new(
            aws_sdk_secretsmanager::Client::new(&aws),
            config.secret_name.clone(),
        )),
    };

    let topic = config.sns_topic_arn.clone().map(|arn| {
        Arc::new(SnsPublisher::new(aws_sdk_sns::Client::new(&aws), arn)) as Arc<dyn TopicPublisher>
    });
    let chat = config
        .discord_webhook_url
        .clone()
        .map(|url| Arc::new(DiscordWebhook::new(url)) as Arc<dyn ChatNotifier>);

    Services {
        azure: AzureClient::new(config, secrets),
        notifications: Notifications::new(topic, chat),
    }
}
