#![allow(dead_code)]

use orders_api_lambda::adapters::memory_store::InMemoryTableStore;
use orders_api_lambda::handlers::{handle_api_event, ApiGatewayResponse};
use serde_json::{json, Map, Value};

pub const ALICE_PROFILE: &str =
    r#"{"fullName":"Alice A","email":"a@b.com","addresses":[{"home":"123 Main Street"}]}"#;
pub const WIDGET_ORDER: &str =
    r#"{"orderStatus":"CREATED","items":[{"name":"Widget","value":9.99,"quantity":2}]}"#;

/// Builds an API Gateway proxy event the way the REST API delivers it.
pub fn proxy_event(
    method: &str,
    resource: &str,
    path_parameters: &[(&str, &str)],
    body: Option<&str>,
) -> Value {
    let parameters = if path_parameters.is_empty() {
        Value::Null
    } else {
        Value::Object(
            path_parameters
                .iter()
                .map(|(name, value)| (name.to_string(), Value::from(*value)))
                .collect::<Map<String, Value>>(),
        )
    };

    json!({
        "httpMethod": method,
        "resource": resource,
        "path": resource,
        "pathParameters": parameters,
        "headers": {"Content-Type": "application/json"},
        "requestContext": {"stage": "prod"},
        "isBase64Encoded": false,
        "body": body,
    })
}

pub fn send(
    store: &InMemoryTableStore,
    method: &str,
    resource: &str,
    path_parameters: &[(&str, &str)],
    body: Option<&str>,
) -> ApiGatewayResponse {
    handle_api_event(proxy_event(method, resource, path_parameters, body), store)
}

pub fn body_json(response: &ApiGatewayResponse) -> Value {
    serde_json::from_str(&response.body).expect("response body should be JSON")
}

pub fn create_user(store: &InMemoryTableStore, username: &str, profile: &str) -> Value {
    let response = send(
        store,
        "POST",
        "/users/username/{username}",
        &[("username", username)],
        Some(profile),
    );
    assert_eq!(response.status_code, 201, "create user: {}", response.body);
    body_json(&response)
}

pub fn create_order(store: &InMemoryTableStore, username: &str, order: &str) -> Value {
    let response = send(
        store,
        "POST",
        "/orders/username/{username}",
        &[("username", username)],
        Some(order),
    );
    assert_eq!(response.status_code, 201, "create order: {}", response.body);
    body_json(&response)
}

pub fn order_with_status(status: &str) -> String {
    format!(
        r#"{{"orderStatus":"{status}","items":[{{"name":"Gadget","value":2.5,"quantity":3}}]}}"#
    )
}

pub fn sorted_ids(listed: &Value) -> Vec<String> {
    let mut ids: Vec<String> = listed
        .as_array()
        .expect("listing should be an array")
        .iter()
        .filter_map(|record| record["id"].as_str().map(str::to_string))
        .collect();
    ids.sort_unstable();
    ids
}
