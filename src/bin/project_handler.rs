use azops::config::AppConfig;
use azops::handlers::project::handle_project_event;
use azops::handlers::HandlerResponse;
use azops::runtime::{build_services, init_tracing};
use lambda_runtime::{service_fn, Error, LambdaEvent};
use serde_json::Value;

#[tokio::main]
async fn main() -> Result<(), Error> {
    init_tracing();

    let config = AppConfig::from_env().map_err(|error| Error::from(error.to_string()))?;
    let services = build_services(&config, None).await;
    let services = &services;

    lambda_runtime::run(service_fn(move |event: LambdaEvent<Value>| async move {
        Ok::<HandlerResponse, Error>(handle_project_event(&event.payload, services).await)
    }))
    .await
}
