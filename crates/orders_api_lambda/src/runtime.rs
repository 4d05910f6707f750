//! Cold-start wiring shared by the Lambda binaries.

use lambda_runtime::{service_fn, Error, LambdaEvent};
use serde_json::Value;

use crate::adapters::dynamodb_store::DynamoDbTableStore;
use crate::adapters::table_store::TableStore;
use crate::config::ApiConfig;
use crate::handlers::ApiGatewayResponse;
use crate::telemetry::init_tracing;

/// Entry point a binary serves, e.g. [`crate::handlers::handle_users_event`].
pub type EventHandler = fn(Value, &dyn TableStore) -> ApiGatewayResponse;

/// Installs logging, loads configuration, builds the DynamoDB store once and
/// serves `handler` until the runtime shuts down.
pub async fn run(component: &'static str, handler: EventHandler) -> Result<(), Error> {
    init_tracing();

    let config = ApiConfig::from_env()?;
    let sdk_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
    let store = DynamoDbTableStore::from_sdk_config(&sdk_config, &config);
    tracing::info!(
        component,
        event = "cold_start",
        table_name = store.table_name(),
        status_index = %config.status_index,
    );

    lambda_runtime::run(service_fn(|event| handle_request(handler, &store, event))).await
}

async fn handle_request(
    handler: EventHandler,
    store: &DynamoDbTableStore,
    event: LambdaEvent<Value>,
) -> Result<ApiGatewayResponse, Error> {
    Ok(handler(event.payload, store))
}
